//! Device port: remote control of the video-production device.

use std::fmt;
use std::future::Future;

use rundown_domain::error::ShowError;

/// One request for the device: a function name and its optional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCall {
    pub function: String,
    pub input: Option<String>,
    pub value: Option<String>,
}

impl DeviceCall {
    /// A call without parameters.
    #[must_use]
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            input: None,
            value: None,
        }
    }

    /// A call aimed at one input.
    #[must_use]
    pub fn targeted(function: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(function).with_input(input)
    }

    /// A call aimed at one input with a numeric value, such as a volume.
    #[must_use]
    pub fn numeric(function: impl Into<String>, input: impl Into<String>, value: f64) -> Self {
        Self::targeted(function, input).with_value(value.to_string())
    }

    /// Set the target input. Empty strings are dropped.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// Set the value parameter. Empty strings are dropped.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into()).filter(|s: &String| !s.is_empty());
        self
    }
}

impl fmt::Display for DeviceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function)?;
        if let Some(input) = &self.input {
            write!(f, " input={input}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " value={value}")?;
        }
        Ok(())
    }
}

/// Sends commands to the external device.
///
/// Only [`send_command`](Self::send_command) carries behaviour. The named
/// helpers drive the device directly, without a rundown command; they build
/// the same [`DeviceCall`] the dispatcher resolves for that function name.
pub trait DeviceControl: Send + Sync {
    /// Issue one call. `Ok` means the device acknowledged it.
    fn send_command(
        &self,
        call: &DeviceCall,
    ) -> impl Future<Output = Result<(), ShowError>> + Send;

    /// Check that the device answers. `Ok(false)` means reachable but not
    /// recognised as the expected device.
    fn test_connection(&self) -> impl Future<Output = Result<bool, ShowError>> + Send;

    fn cut(&self, input: &str) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::targeted("Cut", input);
        async move { self.send_command(&call).await }
    }

    fn fade(&self, input: &str) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::targeted("Fade", input);
        async move { self.send_command(&call).await }
    }

    fn overlay_in(
        &self,
        overlay: u8,
        input: &str,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::targeted(format!("OverlayInput{overlay}In"), input);
        async move { self.send_command(&call).await }
    }

    fn overlay_out(&self, overlay: u8) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::new(format!("OverlayInput{overlay}Out"));
        async move { self.send_command(&call).await }
    }

    fn play_input(&self, input: &str) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::targeted("PlayInput", input);
        async move { self.send_command(&call).await }
    }

    fn pause_input(&self, input: &str) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::targeted("PauseInput", input);
        async move { self.send_command(&call).await }
    }

    fn set_volume(
        &self,
        input: &str,
        volume: f64,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::numeric("SetVolume", input, volume);
        async move { self.send_command(&call).await }
    }

    fn set_text(
        &self,
        input: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::targeted("SetText", input).with_value(text);
        async move { self.send_command(&call).await }
    }

    fn set_position(
        &self,
        input: &str,
        position: f64,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        let call = DeviceCall::numeric("SetPosition", input, position);
        async move { self.send_command(&call).await }
    }
}

impl<T: DeviceControl> DeviceControl for std::sync::Arc<T> {
    fn send_command(
        &self,
        call: &DeviceCall,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        (**self).send_command(call)
    }

    fn test_connection(&self) -> impl Future<Output = Result<bool, ShowError>> + Send {
        (**self).test_connection()
    }
}
