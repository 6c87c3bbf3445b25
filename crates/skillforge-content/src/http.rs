use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use skillforge_types::ContentId;

use crate::store::{ContentError, ContentStore};

/// API credentials for the pinning service.
#[derive(Clone, Debug)]
pub struct PinningCredentials {
    pub api_key: String,
    pub secret_api_key: String,
}

/// Response body of a successful pin.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// HTTP client for a Pinata-style pinning service.
pub struct HttpPinningClient {
    client: Client,
    endpoint: String,
    credentials: PinningCredentials,
}

impl HttpPinningClient {
    pub fn new(
        endpoint: impl Into<String>,
        credentials: PinningCredentials,
    ) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ContentError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        })
    }
}

#[async_trait]
impl ContentStore for HttpPinningClient {
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, ContentError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name("blob");
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .header("pinata_api_key", &self.credentials.api_key)
            .header("pinata_secret_api_key", &self.credentials.secret_api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ContentError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "pinning service rejected blob");
            return Err(ContentError::PinRejected(format!(
                "pinning service returned {}",
                status
            )));
        }

        let body: PinResponse = response
            .json()
            .await
            .map_err(|err| ContentError::Transport(err.to_string()))?;

        debug!(content_id = %body.ipfs_hash, "blob pinned");
        Ok(ContentId::new(body.ipfs_hash))
    }
}
