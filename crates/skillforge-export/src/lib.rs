//! Downloadable certificate rendering.
//!
//! A pure formatting function with no workflow state: given the already
//! fetched certificate image and the display strings, it produces a
//! fixed-page-size PDF. Fetching the image by content id from the public
//! gateway is the only networked helper here.

#![deny(unsafe_code)]

mod jpeg;
mod pdf;

use thiserror::Error;
use tracing::debug;

use skillforge_types::ContentId;

pub use pdf::render_certificate;

/// Inputs for one rendered certificate.
#[derive(Clone, Debug)]
pub struct CertificateDocument {
    /// Certificate image bytes (JPEG).
    pub image: Vec<u8>,
    pub student_name: String,
    pub course_title: String,
    /// Completion date already formatted for display.
    pub completion_date: String,
}

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("certificate image format is not supported (JPEG required)")]
    UnsupportedImage,

    #[error("failed to render certificate: {0}")]
    Render(String),

    #[error("failed to fetch certificate image: {0}")]
    Fetch(String),
}

/// Fetch the certificate image bytes from the public gateway.
pub async fn fetch_image(gateway_base: &str, id: &ContentId) -> Result<Vec<u8>, ExportError> {
    let url = id.gateway_url(gateway_base);
    debug!(%url, "fetching certificate image");

    let response = reqwest::get(&url)
        .await
        .map_err(|err| ExportError::Fetch(err.to_string()))?;
    if !response.status().is_success() {
        return Err(ExportError::Fetch(format!(
            "gateway returned {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ExportError::Fetch(err.to_string()))?;
    Ok(bytes.to_vec())
}
