use skillforge_types::ContentId;

/// Public read gateway for pinned content.
///
/// Retrieval is by convention `https://<gateway>/<contentId>` and treated
/// as read-only and always available once pinned.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, id: &ContentId) -> String {
        id.gateway_url(&self.base_url)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ipfs.io/ipfs".to_string(),
        }
    }
}
