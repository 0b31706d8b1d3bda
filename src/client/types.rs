use serde::{Deserialize, Serialize};

/// Body returned by the reply endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl Reply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), img: None }
    }

    pub fn with_image(reply: impl Into<String>, img: impl Into<String>) -> Self {
        Self { reply: reply.into(), img: Some(img.into()) }
    }

    /// Image URL, treating an empty string as no image
    pub fn image(&self) -> Option<&str> {
        self.img.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn img_is_optional() {
        let reply: Reply = serde_json::from_str(r#"{"reply": "hi there"}"#).unwrap();
        assert_eq!(reply, Reply::text("hi there"));
        assert_eq!(reply.image(), None);
    }

    #[test]
    fn empty_img_counts_as_absent() {
        let reply: Reply = serde_json::from_str(r#"{"reply": "x", "img": ""}"#).unwrap();
        assert_eq!(reply.image(), None);

        let reply: Reply = serde_json::from_str(r#"{"reply": "x", "img": "http://x/y.png"}"#).unwrap();
        assert_eq!(reply.image(), Some("http://x/y.png"));
    }

    #[test]
    fn missing_reply_is_rejected() {
        assert!(serde_json::from_str::<Reply>(r#"{"img": "http://x/y.png"}"#).is_err());
    }

    #[test]
    fn serializes_without_null_img() {
        let body = serde_json::to_string(&Reply::text("ok")).unwrap();
        assert_eq!(body, r#"{"reply":"ok"}"#);
    }
}
