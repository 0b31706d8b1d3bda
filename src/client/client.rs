use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use super::types::Reply;
use crate::config::ClientConfig;
use crate::error::{ChatError, Result};

/// Maps a user's text to the bot's reply.
#[async_trait]
pub trait ReplyService: Send + Sync {
    async fn get_reply(&self, msg: &str) -> Result<Reply>;
}

/// Reply service reached over HTTP: `GET {base_url}{endpoint}?{query_param}=<text>`
pub struct HttpReplyService {
    client: Client,
    url: Url,
    query_param: String,
}

impl HttpReplyService {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let raw = format!(
            "{}{}",
            config.base_url.trim().trim_end_matches('/'),
            config.endpoint
        );
        let url = Url::parse(&raw).map_err(|e| ChatError::InvalidUrl(format!("{}: {}", raw, e)))?;
        info!("Reply service endpoint: {}", url);

        Ok(Self {
            client,
            url,
            query_param: config.query_param.clone(),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Resolves a possibly relative image path against the endpoint URL.
    fn resolve_image(&self, img: &str) -> String {
        match self.url.join(img) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Keeping unresolvable image URL {:?}: {}", img, e);
                img.to_string()
            }
        }
    }
}

#[async_trait]
impl ReplyService for HttpReplyService {
    async fn get_reply(&self, msg: &str) -> Result<Reply> {
        // reqwest percent-encodes query pairs
        let response = self
            .client
            .get(self.url.clone())
            .query(&[(self.query_param.as_str(), msg)])
            .send()
            .await?;

        let status = response.status();
        debug!("Reply service answered {}", status);
        if !status.is_success() {
            return Err(ChatError::Status { status });
        }

        let body = response.text().await?;
        let mut reply: Reply = serde_json::from_str(&body)?;
        reply.img = reply.image().map(|img| self.resolve_image(img));
        Ok(reply)
    }
}
