//! Types shared between the share flow, the HTML renderer, the CLI output and
//! the HTTP layer.

use serde::Serialize;

/// Where a request came from, as far as URL building is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    /// `Host` header value, port included when present.
    pub host: String,
    /// Protocol of the connection that reached us (`http` behind a proxy).
    pub protocol: String,
    /// Raw `X-Forwarded-Proto` value, when trusted and present.
    pub forwarded_proto: Option<String>,
}

impl RequestOrigin {
    pub fn new(host: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            protocol: protocol.into(),
            forwarded_proto: None,
        }
    }

    pub fn with_forwarded_proto(mut self, value: impl Into<String>) -> Self {
        self.forwarded_proto = Some(value.into());
        self
    }

    /// Protocol to put in public links.
    ///
    /// A TLS-terminating proxy reports the client-facing protocol in
    /// `X-Forwarded-Proto`; only its first comma-separated value counts, and
    /// only `http`/`https` are accepted from it.
    pub fn effective_protocol(&self) -> String {
        self.forwarded_proto
            .as_deref()
            .and_then(|header| header.split(',').next())
            .map(|first| first.trim().to_ascii_lowercase())
            .filter(|proto| proto == "http" || proto == "https")
            .unwrap_or_else(|| self.protocol.clone())
    }

    /// `{protocol}://{host}`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.effective_protocol(), self.host)
    }
}

/// Social-preview fields for Open Graph and Twitter cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialMeta {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub page_url: String,
    /// `twitter:card` value.
    pub card: String,
    /// `og:type` value.
    pub og_type: String,
}

/// Everything the share page needs to render one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub image_url: String,
    pub page_url: String,
    pub sibling_urls: Vec<String>,
    pub current_index: Option<usize>,
    /// Root-relative URL of the image shown on load.
    pub initial_url: String,
    /// `{protocol}://{host}`, target of the back and close buttons.
    pub home_url: String,
    pub meta: SocialMeta,
}

/// Result of a share-page request that passed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Send the client to this root-relative target with a 302.
    Redirect(String),
    Render(SharePayload),
}
