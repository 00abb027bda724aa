use crate::error::{AvrError, Result};
use crate::protocol::{Request, Service};
use crate::transport::Transport;
use crate::types::{
    ApiService, Input, PlayingContentInfo, PowerInfo, PowerStatus, SchemeInfo, SourceInfo,
    VolumeInfo,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Default control port of Sony SRS-class devices
pub const DEFAULT_PORT: u16 = 54480;

/// Client for controlling a Sony networked receiver
///
/// An `AvrClient` holds the target device's address and provides one method
/// per remote-control action. Calls are independent: each one issues a single
/// request to the device's local control API and returns once the reply has
/// been classified. No connection is held between calls, so the client can be
/// shared and reused freely.
#[derive(Debug)]
pub struct AvrClient {
    transport: Transport,
}

impl AvrClient {
    /// Create a client for the device at the given host, using the default port
    ///
    /// The address is only checked syntactically; reachability problems
    /// surface on the first call.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sony_avr::AvrClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let avr = AvrClient::new("192.168.1.100")?;
    ///     avr.turn_on().await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn new(host: impl Into<String>) -> Result<Self> {
        Self::with_port(host, DEFAULT_PORT)
    }

    /// Create a client for a device listening on a non-default port
    pub fn with_port(host: impl Into<String>, port: u16) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(host, port)?,
        })
    }

    /// Get the device's host address
    pub fn host(&self) -> &str {
        self.transport.host()
    }

    /// Get the device's control port
    pub fn port(&self) -> u16 {
        self.transport.port()
    }

    // ========== Power Control ==========

    /// Turn the device on
    pub async fn turn_on(&self) -> Result<()> {
        self.set_power_status("active").await
    }

    /// Turn the device off
    pub async fn turn_off(&self) -> Result<()> {
        self.set_power_status("off").await
    }

    async fn set_power_status(&self, status: &str) -> Result<()> {
        let request =
            Request::new("setPowerStatus", "1.1").with_param(json!({ "status": status }));
        self.transport.call(Service::System, request).await?;
        Ok(())
    }

    /// Get the current power status
    pub async fn power_status(&self) -> Result<PowerStatus> {
        let request = Request::new("getPowerStatus", "1.1");
        let payload = self.transport.call(Service::System, request).await?;
        let info: PowerInfo = first(payload)?;
        Ok(info.status)
    }

    /// Whether the device is currently on
    pub async fn is_on(&self) -> Result<bool> {
        Ok(self.power_status().await?.is_on())
    }

    // ========== Volume Control ==========

    /// Get the current volume levels, stepping and mute state
    pub async fn volume_info(&self) -> Result<VolumeInfo> {
        let request =
            Request::new("getVolumeInformation", "1.1").with_param(json!({ "output": "" }));
        let payload = self.transport.call(Service::Audio, request).await?;
        nested_first(payload)
    }

    /// Get the current volume level
    pub async fn volume(&self) -> Result<i32> {
        Ok(self.volume_info().await?.volume)
    }

    /// Set the volume to an absolute level
    pub async fn set_volume(&self, level: i32) -> Result<()> {
        self.send_volume(level.to_string()).await
    }

    /// Set the volume as a fraction of the device's maximum
    ///
    /// The fraction is clamped to `0.0..=1.0`. This queries the device for
    /// its volume range first, so it costs two round trips.
    pub async fn set_volume_fraction(&self, fraction: f64) -> Result<()> {
        let info = self.volume_info().await?;
        let fraction = fraction.clamp(0.0, 1.0);
        let level = (f64::from(info.max_volume) * fraction).round() as i32;
        self.set_volume(level).await
    }

    /// Adjust the volume by a relative number of units
    ///
    /// Positive deltas raise the volume, negative deltas lower it. The
    /// device clamps at its own floor and ceiling.
    pub async fn step_volume(&self, delta: i32) -> Result<()> {
        let volume = if delta >= 0 {
            format!("+{delta}")
        } else {
            delta.to_string()
        };
        self.send_volume(volume).await
    }

    /// Raise the volume by one unit
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use sony_avr::AvrClient;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let avr = AvrClient::new("192.168.1.100")?;
    /// avr.raise_volume().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn raise_volume(&self) -> Result<()> {
        self.step_volume(1).await
    }

    /// Lower the volume by one unit
    pub async fn lower_volume(&self) -> Result<()> {
        self.step_volume(-1).await
    }

    async fn send_volume(&self, volume: String) -> Result<()> {
        let request = Request::new("setAudioVolume", "1.1")
            .with_param(json!({ "output": "", "volume": volume }));
        self.transport.call(Service::Audio, request).await?;
        Ok(())
    }

    // ========== Mute Control ==========

    /// Set the mute state
    pub async fn set_mute(&self, mute: bool) -> Result<()> {
        let request = Request::new("setAudioMute", "1.1")
            .with_param(json!({ "output": "", "mute": if mute { "on" } else { "off" } }));
        self.transport.call(Service::Audio, request).await?;
        Ok(())
    }

    /// Mute the device
    pub async fn mute(&self) -> Result<()> {
        self.set_mute(true).await
    }

    /// Unmute the device
    pub async fn unmute(&self) -> Result<()> {
        self.set_mute(false).await
    }

    /// Whether the device is currently muted
    pub async fn is_muted(&self) -> Result<bool> {
        Ok(self.volume_info().await?.is_muted())
    }

    // ========== Input Selection ==========

    /// Route the device to the given input
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use sony_avr::{AvrClient, Input};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let avr = AvrClient::new("192.168.1.100")?;
    /// avr.set_input(Input::AudioIn).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_input(&self, input: Input) -> Result<()> {
        let request =
            Request::new("setPlayContent", "1.2").with_param(json!({ "uri": input.uri() }));
        self.transport.call(Service::AvContent, request).await?;
        Ok(())
    }

    /// Route the device to an input given by its human-readable name
    ///
    /// Names are matched case-insensitively against the recognized set
    /// ("audio in", "bluetooth audio", ...). An unrecognized name fails with
    /// [`AvrError::InvalidInput`] before any request is issued.
    pub async fn set_input_named(&self, name: &str) -> Result<()> {
        self.set_input(name.parse()?).await
    }

    /// Get details of the currently playing content
    pub async fn playing_content_info(&self) -> Result<PlayingContentInfo> {
        let request =
            Request::new("getPlayingContentInfo", "1.2").with_param(json!({ "output": "" }));
        let payload = self.transport.call(Service::AvContent, request).await?;
        nested_first(payload)
    }

    /// Get the currently active input, when it maps onto the recognized set
    pub async fn current_input(&self) -> Result<Option<Input>> {
        Ok(self.playing_content_info().await?.input())
    }

    /// Get the current playback state (playing, stopped, ...)
    pub async fn playback_state(&self) -> Result<Option<String>> {
        Ok(self.playing_content_info().await?.state().map(str::to_owned))
    }

    // ========== Source Enumeration ==========

    /// List the URI schemes the device can play from
    pub async fn schemes(&self) -> Result<Vec<String>> {
        let request = Request::new("getSchemeList", "1.0");
        let payload = self.transport.call(Service::AvContent, request).await?;
        let schemes: Vec<SchemeInfo> = first(payload)?;
        Ok(schemes.into_iter().map(|s| s.scheme).collect())
    }

    /// List the sources available under one scheme
    pub async fn sources(&self, scheme: &str) -> Result<Vec<SourceInfo>> {
        let request =
            Request::new("getSourceList", "1.2").with_param(json!({ "scheme": scheme }));
        let payload = self.transport.call(Service::AvContent, request).await?;
        first(payload)
    }

    /// List the sources available under every scheme the device reports
    pub async fn all_sources(&self) -> Result<Vec<SourceInfo>> {
        let mut sources = Vec::new();
        for scheme in self.schemes().await? {
            sources.extend(self.sources(&scheme).await?);
        }
        Ok(sources)
    }

    // ========== Introspection ==========

    /// Get the API surface the device advertises
    pub async fn supported_api_info(&self) -> Result<Vec<ApiService>> {
        let request = Request::new("getSupportedApiInfo", "1.0").with_param(json!({}));
        let payload = self.transport.call(Service::Guide, request).await?;
        first(payload)
    }

    /// List supported methods as `service.method` strings
    pub async fn supported_methods(&self) -> Result<Vec<String>> {
        let services = self.supported_api_info().await?;
        let mut methods = Vec::new();
        for service in &services {
            for api in &service.apis {
                methods.push(format!("{}.{}", service.service, api.name));
            }
        }
        Ok(methods)
    }
}

/// Decode the first element of a reply payload (`result[0]`)
fn first<T: DeserializeOwned>(payload: Value) -> Result<T> {
    decode_at_depth(payload, 1)
}

/// Decode the first element of the first element (`result[0][0]`), the shape
/// per-output replies use
fn nested_first<T: DeserializeOwned>(payload: Value) -> Result<T> {
    decode_at_depth(payload, 2)
}

fn decode_at_depth<T: DeserializeOwned>(mut payload: Value, depth: usize) -> Result<T> {
    for _ in 0..depth {
        payload = match payload {
            Value::Array(items) => match items.into_iter().next() {
                Some(item) => item,
                None => {
                    return Err(AvrError::InvalidResponse(
                        "reply payload array is empty".to_owned(),
                    ))
                }
            },
            other => {
                return Err(AvrError::InvalidResponse(format!(
                    "expected an array payload, got {other}"
                )))
            }
        };
    }
    serde_json::from_value(payload).map_err(AvrError::Json)
}
