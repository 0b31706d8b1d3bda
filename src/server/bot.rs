use regex::Regex;
use tracing::debug;

use crate::client::Reply;
use crate::config::{BotConfig, ProductConfig};

/// What a message is asking for
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Reset,
    PriceFilter(Option<u64>),
    /// "price for 20 rings": a quantity and the category it applies to
    BulkOrder {
        qty: Option<u64>,
        category: Option<String>,
    },
    Greeting,
    BestSellers,
    /// Index into the configured business info entries
    BusinessInfo(usize),
    Category(String),
    Product(usize),
    Fallback,
}

/// Rule-based replies over a small product catalog.
pub struct ReplyEngine {
    config: BotConfig,
    number: Regex,
    /// Category synonyms, longest first so "necklace" wins over "lace"
    synonyms: Vec<(String, String)>,
}

impl ReplyEngine {
    pub fn new(config: BotConfig) -> Self {
        let mut synonyms: Vec<(String, String)> = config
            .categories
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect();
        synonyms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            config,
            number: Regex::new(r"\d+").expect("static regex"),
            synonyms,
        }
    }

    pub fn detect_intent(&self, msg: &str) -> Intent {
        let msg = msg.trim().to_lowercase();

        if self.config.reset_words.iter().any(|w| w.to_lowercase() == msg) {
            return Intent::Reset;
        }

        if msg.contains("under") || msg.contains("below") {
            let limit = self.first_number(&msg);
            return Intent::PriceFilter(limit);
        }

        if msg.contains("price for") || msg.contains("cost of") {
            return Intent::BulkOrder {
                qty: self.first_number(&msg),
                category: self.category_of(&msg).map(str::to_string),
            };
        }

        if matches_phrase(&msg, &self.config.greeting_phrases) {
            return Intent::Greeting;
        }

        if matches_phrase(&msg, &self.config.best_seller_phrases) {
            return Intent::BestSellers;
        }

        if let Some(index) = self
            .config
            .business_info
            .iter()
            .position(|info| matches_phrase(&msg, &info.keywords))
        {
            return Intent::BusinessInfo(index);
        }

        if let Some(category) = self.category_of(&msg) {
            if self.in_category(category).next().is_some() {
                return Intent::Category(category.to_string());
            }
        }

        if let Some(index) = self.find_product(&msg) {
            return Intent::Product(index);
        }

        Intent::Fallback
    }

    pub fn reply(&self, msg: &str) -> Reply {
        let intent = self.detect_intent(msg);
        debug!("Detected intent {:?}", intent);

        match intent {
            Intent::Reset => Reply::text(&self.config.reset),
            Intent::Greeting => Reply::text(&self.config.greeting),
            Intent::PriceFilter(None) => Reply::text(&self.config.fallback),
            Intent::PriceFilter(Some(limit)) => {
                let items: Vec<&ProductConfig> = self
                    .config
                    .products
                    .iter()
                    .filter(|p| p.price.is_some_and(|price| price <= limit as f64))
                    .take(self.config.max_results)
                    .collect();
                if items.is_empty() {
                    Reply::text(format!("❌ No items found under {}{}.", self.config.currency, limit))
                } else {
                    let header = format!("💎 Items under {}{}:", self.config.currency, limit);
                    Reply::text(self.format_list(&items, &header))
                }
            }
            Intent::BulkOrder { qty: Some(qty), category: Some(category) } => {
                let product = self.in_category(&category).find(|p| p.price.is_some());
                match product {
                    Some(product) => {
                        let total = product.price.unwrap_or_default() * qty as f64;
                        let reply = format!(
                            "📦 Bulk order quotation:<br>{} x {} = {}{:.2}",
                            qty, product.name, self.config.currency, total
                        );
                        match product.image.as_deref().filter(|url| !url.is_empty()) {
                            Some(url) => Reply::with_image(reply, url),
                            None => Reply::text(reply),
                        }
                    }
                    None => Reply::text("❌ Couldn't find the product for bulk order."),
                }
            }
            Intent::BulkOrder { .. } => {
                Reply::text("ℹ️ Please mention quantity and product, e.g. 'price for 20 rings'.")
            }
            Intent::BusinessInfo(index) => Reply::text(&self.config.business_info[index].reply),
            Intent::BestSellers => {
                let items: Vec<&ProductConfig> = self
                    .config
                    .products
                    .iter()
                    .filter(|p| p.best_seller)
                    .take(self.config.max_results)
                    .collect();
                if items.is_empty() {
                    Reply::text("🤔 Not enough data yet for best sellers.")
                } else {
                    Reply::text(self.format_list(&items, "🔥 Our best selling items:"))
                }
            }
            Intent::Category(category) => {
                let mut items: Vec<&ProductConfig> = self.in_category(&category).collect();
                items.sort_by(|a, b| {
                    let a = a.price.unwrap_or(f64::MAX);
                    let b = b.price.unwrap_or(f64::MAX);
                    a.total_cmp(&b)
                });
                items.truncate(self.config.max_results);
                Reply::text(self.format_list(&items, "🔎 Matching items:"))
            }
            Intent::Product(index) => {
                let product = &self.config.products[index];
                let reply = format!(
                    "Our {} is available. Price: {}. Description: {}",
                    product.name,
                    self.format_price(product),
                    product.description.as_deref().unwrap_or("No details"),
                );
                match product.image.as_deref().filter(|url| !url.is_empty()) {
                    Some(url) => Reply::with_image(reply, url),
                    None => Reply::text(reply),
                }
            }
            Intent::Fallback => Reply::text(&self.config.fallback),
        }
    }

    fn first_number(&self, msg: &str) -> Option<u64> {
        self.number.find(msg).and_then(|m| m.as_str().parse().ok())
    }

    /// Catalog category named by the first synonym found in `msg`.
    fn category_of(&self, msg: &str) -> Option<&str> {
        self.synonyms
            .iter()
            .find(|(key, _)| msg.contains(key.as_str()))
            .map(|(_, category)| category.as_str())
    }

    fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ProductConfig> + 'a {
        self.config
            .products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    fn find_product(&self, msg: &str) -> Option<usize> {
        let products = &self.config.products;
        products
            .iter()
            .position(|p| msg.contains(&p.name.to_lowercase()))
            .or_else(|| {
                if msg.chars().count() < 3 {
                    return None;
                }
                products.iter().position(|p| p.name.to_lowercase().contains(msg))
            })
    }

    fn format_price(&self, product: &ProductConfig) -> String {
        match product.price {
            Some(price) => format!("{}{:.2}", self.config.currency, price),
            None => "Price NA".to_string(),
        }
    }

    fn format_list(&self, items: &[&ProductConfig], header: &str) -> String {
        let mut reply = format!("{}<br>", header);
        for product in items {
            reply.push_str(&format!("- {} ({})<br>", product.name, self.format_price(product)));
        }
        reply.push_str("<br>💬 Ask about any item by name to see its details.");
        reply
    }
}

/// True when one of `phrases` appears in `msg` as whole words.
fn matches_phrase(msg: &str, phrases: &[String]) -> bool {
    let words = normalize(msg);
    if words.is_empty() {
        return false;
    }
    let haystack = format!(" {} ", words);
    phrases
        .iter()
        .map(|p| normalize(p))
        .filter(|p| !p.is_empty())
        .any(|p| p == words || haystack.contains(&format!(" {} ", p)))
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
