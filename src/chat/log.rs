use super::message::{Content, Message, Sender};

/// Ordered, append-only record of the conversation.
///
/// The log also tracks a view position. Entries appended after the last
/// [`ChatLog::scroll_to_bottom`] are "below the fold" until the view is
/// scrolled again; the terminal view prints exactly those entries.
#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    entries: Vec<Message>,
    /// Number of entries visible at the last scroll
    scroll_top: usize,
    /// Number of entries already handed out by `take_unseen`
    seen: usize,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.entries.extend(messages);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.entries.len();
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll_top == self.entries.len()
    }

    /// Returns entries that became visible since the previous call, in order.
    pub fn take_unseen(&mut self) -> Vec<Message> {
        let visible = self.scroll_top.min(self.entries.len());
        if visible <= self.seen {
            return Vec::new();
        }
        let fresh = self.entries[self.seen..visible].to_vec();
        self.seen = visible;
        fresh
    }

    /// Renders the log as HTML. All text and URLs are escaped, except the
    /// `<br>` line breaks in bot replies.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div id='chat-box'>\n");
        for message in &self.entries {
            html.push_str(&render_entry(message));
            html.push('\n');
        }
        html.push_str("</div>\n");
        html
    }
}

fn render_entry(message: &Message) -> String {
    let class = match (&message.sender, &message.content) {
        (_, Content::Error { .. }) => "bot error",
        (Sender::User, _) => "user",
        (Sender::Bot, _) => "bot",
    };
    match &message.content {
        Content::Text { text } if message.sender == Sender::Bot => {
            // The reply service breaks lines with <br>; nothing else survives
            let body = escape_html(text).replace("&lt;br&gt;", "<br>");
            format!("<div class='message {}'>{}</div>", class, body)
        }
        Content::Text { text } | Content::Error { text } => {
            format!("<div class='message {}'>{}</div>", class, escape_html(text))
        }
        Content::Image { url } => format!(
            "<div class='message {}'><img src=\"{}\" width=\"150\"></div>",
            class,
            escape_html(url)
        ),
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
