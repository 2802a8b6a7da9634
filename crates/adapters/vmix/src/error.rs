//! vMix adapter error types.

use rundown_domain::error::ShowError;

/// Errors specific to the vMix adapter.
#[derive(Debug, thiserror::Error)]
pub enum VmixError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The configured host and port do not form a valid URL.
    #[error("invalid vMix address {0:?}")]
    InvalidUrl(String),

    /// The request could not be sent or timed out.
    #[error("request to vMix failed")]
    Transport(#[source] reqwest::Error),

    /// vMix answered with something other than `200 OK`.
    #[error("vMix answered with status {0}")]
    Status(u16),
}

impl From<VmixError> for ShowError {
    fn from(err: VmixError) -> Self {
        ShowError::Device(Box::new(err))
    }
}
