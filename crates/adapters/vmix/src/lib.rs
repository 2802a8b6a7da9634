//! # rundown-adapter-vmix
//!
//! vMix adapter: drives a vMix instance through its HTTP Web API.
//!
//! Every command becomes one request:
//!
//! ```text
//! GET http://{host}:{port}/api/?Function={name}[&Input={input}][&Value={value}]
//! ```
//!
//! Empty parameters are left out. vMix acknowledges a function with
//! `200 OK`; any other status is a failure.
//!
//! ## Dependency rule
//!
//! Depends on `rundown-app` (port traits) and `rundown-domain` only.

pub mod config;
pub mod error;

use std::future::Future;

use reqwest::{StatusCode, Url};

use rundown_app::ports::{DeviceCall, DeviceControl};
use rundown_domain::error::ShowError;

pub use config::VmixConfig;
pub use error::VmixError;

/// [`DeviceControl`] implementation for vMix.
#[derive(Debug, Clone)]
pub struct VmixClient {
    http: reqwest::Client,
    api_url: Url,
}

impl VmixClient {
    /// Build a client for the vMix instance described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VmixError::InvalidUrl`] for an unusable host or
    /// [`VmixError::Client`] when the HTTP client cannot be created.
    pub fn new(config: &VmixConfig) -> Result<Self, VmixError> {
        let api_url = config.api_url();
        let api_url = Url::parse(&api_url).map_err(|_| VmixError::InvalidUrl(api_url))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(VmixError::Client)?;
        Ok(Self { http, api_url })
    }

    /// The request URL for `call`.
    #[must_use]
    pub fn function_url(&self, call: &DeviceCall) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("Function", &call.function);
            if let Some(input) = &call.input {
                query.append_pair("Input", input);
            }
            if let Some(value) = &call.value {
                query.append_pair("Value", value);
            }
        }
        url
    }

    async fn call(&self, call: &DeviceCall) -> Result<(), VmixError> {
        let url = self.function_url(call);
        tracing::debug!(%url, "sending vMix function");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(VmixError::Transport)?;
        match response.status() {
            StatusCode::OK => Ok(()),
            other => Err(VmixError::Status(other.as_u16())),
        }
    }

    async fn answers_as_vmix(&self) -> Result<bool, VmixError> {
        let response = self
            .http
            .get(self.api_url.clone())
            .send()
            .await
            .map_err(VmixError::Transport)?;
        if response.status() != StatusCode::OK {
            return Ok(false);
        }
        let body = response.text().await.map_err(VmixError::Transport)?;
        Ok(body.contains("<vmix>") || body.contains("<vmixStatus>"))
    }
}

impl DeviceControl for VmixClient {
    fn send_command(
        &self,
        call: &DeviceCall,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        async move { self.call(call).await.map_err(ShowError::from) }
    }

    fn test_connection(&self) -> impl Future<Output = Result<bool, ShowError>> + Send {
        async move {
            let connected = self.answers_as_vmix().await?;
            if connected {
                tracing::info!(url = %self.api_url, "vMix connection verified");
            } else {
                tracing::warn!(url = %self.api_url, "endpoint answered but is not vMix");
            }
            Ok(connected)
        }
    }
}
