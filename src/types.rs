use crate::error::AvrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectable input sources
///
/// Sony SRS-class devices expose a fixed set of sources; each maps to the
/// URI the control API expects in `setPlayContent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Analog line-in (the AUX jack)
    AudioIn,
    /// Bluetooth audio
    Bluetooth,
    /// HDMI input
    Hdmi,
    /// USB storage
    Usb,
    /// Network service (streaming)
    Network,
}

impl Input {
    /// Source URI understood by the device
    pub fn uri(&self) -> &'static str {
        match self {
            // There may be more than one AUX port; port 1 is the one
            // SRS devices expose
            Input::AudioIn => "extInput:line?port=1",
            Input::Bluetooth => "extInput:btAudio",
            Input::Hdmi => "extInput:hdmi",
            Input::Usb => "storage:usb1",
            Input::Network => "netService:audio",
        }
    }

    /// Display name as the device reports it
    pub fn title(&self) -> &'static str {
        match self {
            Input::AudioIn => "Audio in",
            Input::Bluetooth => "Bluetooth Audio",
            Input::Hdmi => "HDMI",
            Input::Usb => "USB",
            Input::Network => "Network",
        }
    }

    /// Map a source URI reported by the device back onto an input
    ///
    /// Returns `None` for URIs outside the recognized set. Port suffixes
    /// (`?port=N`) are ignored.
    pub fn from_uri(uri: &str) -> Option<Input> {
        let base = uri.split('?').next().unwrap_or(uri);
        // Some firmware revisions report "exInput:" instead of "extInput:"
        let normalized = match base.strip_prefix("exInput:") {
            Some(rest) => format!("extInput:{rest}"),
            None => base.to_string(),
        };
        match normalized.as_str() {
            "extInput:line" => Some(Input::AudioIn),
            "extInput:btAudio" => Some(Input::Bluetooth),
            "extInput:hdmi" => Some(Input::Hdmi),
            "storage:usb1" => Some(Input::Usb),
            "netService:audio" => Some(Input::Network),
            _ => None,
        }
    }
}

impl FromStr for Input {
    type Err = AvrError;

    /// Parse a human-readable input name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio in" | "aux" | "line in" => Ok(Input::AudioIn),
            "bluetooth" | "bluetooth audio" => Ok(Input::Bluetooth),
            "hdmi" => Ok(Input::Hdmi),
            "usb" => Ok(Input::Usb),
            "network" | "music service" => Ok(Input::Network),
            _ => Err(AvrError::InvalidInput(s.to_string())),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Device power status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerStatus {
    Active,
    Standby,
    Off,
    /// Transitional or unrecognized status string
    #[serde(other)]
    Unknown,
}

impl PowerStatus {
    /// Whether the device is powered on
    pub fn is_on(&self) -> bool {
        matches!(self, PowerStatus::Active)
    }
}

/// Power status payload from `getPowerStatus`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerInfo {
    pub status: PowerStatus,
}

/// Mute state as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuteState {
    On,
    Off,
}

impl MuteState {
    pub fn is_muted(&self) -> bool {
        matches!(self, MuteState::On)
    }
}

/// Volume levels, stepping and mute state from `getVolumeInformation`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    /// Output the values apply to (empty string for the main output)
    #[serde(default)]
    pub output: String,
    pub volume: i32,
    pub mute: MuteState,
    pub min_volume: i32,
    pub max_volume: i32,
    pub step: i32,
}

impl VolumeInfo {
    /// Whether this output is currently muted
    pub fn is_muted(&self) -> bool {
        self.mute.is_muted()
    }

    /// Current volume as a fraction of the maximum
    pub fn fraction(&self) -> f64 {
        if self.max_volume == 0 {
            return 0.0;
        }
        f64::from(self.volume) / f64::from(self.max_volume)
    }
}

/// Playback state details nested in `getPlayingContentInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInfo {
    pub state: String,
}

/// Currently playing content from `getPlayingContentInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayingContentInfo {
    /// Source URI the device is routed to
    #[serde(default)]
    pub source: Option<String>,
    /// Full content URI, including any port suffix
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub state_info: Option<StateInfo>,
}

impl PlayingContentInfo {
    /// Playback state (playing, stopped, ...), if reported
    pub fn state(&self) -> Option<&str> {
        self.state_info.as_ref().map(|s| s.state.as_str())
    }

    /// The active input, when the source URI maps onto the recognized set
    pub fn input(&self) -> Option<Input> {
        self.source.as_deref().and_then(Input::from_uri)
    }
}

/// One source row from `getSourceList`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub source: String,
    #[serde(default)]
    pub title: String,
}

/// One scheme row from `getSchemeList`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeInfo {
    pub scheme: String,
}

/// Supported methods of one service, from `getSupportedApiInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiService {
    pub service: String,
    #[serde(default)]
    pub apis: Vec<ApiMethod>,
}

/// One method row within an [`ApiService`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMethod {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_parses_device_titles() {
        assert_eq!("Audio in".parse::<Input>().unwrap(), Input::AudioIn);
        assert_eq!("audio in".parse::<Input>().unwrap(), Input::AudioIn);
        assert_eq!("AUX".parse::<Input>().unwrap(), Input::AudioIn);
        assert_eq!("Bluetooth Audio".parse::<Input>().unwrap(), Input::Bluetooth);
        assert_eq!("HDMI".parse::<Input>().unwrap(), Input::Hdmi);
        assert_eq!("usb".parse::<Input>().unwrap(), Input::Usb);
        assert_eq!("Network".parse::<Input>().unwrap(), Input::Network);
    }

    #[test]
    fn unknown_input_name_is_rejected() {
        let err = "tape deck".parse::<Input>().unwrap_err();
        assert!(matches!(err, AvrError::InvalidInput(name) if name == "tape deck"));
    }

    #[test]
    fn audio_in_targets_aux_port() {
        assert_eq!(Input::AudioIn.uri(), "extInput:line?port=1");
    }

    #[test]
    fn uri_mapping_ignores_port_suffix() {
        assert_eq!(Input::from_uri("extInput:line?port=1"), Some(Input::AudioIn));
        assert_eq!(Input::from_uri("extInput:line"), Some(Input::AudioIn));
    }

    #[test]
    fn uri_mapping_fixes_firmware_typo() {
        assert_eq!(Input::from_uri("exInput:hdmi"), Some(Input::Hdmi));
        assert_eq!(Input::from_uri("exInput:btAudio"), Some(Input::Bluetooth));
    }

    #[test]
    fn unrecognized_uri_maps_to_none() {
        assert_eq!(Input::from_uri("extInput:tuner"), None);
    }

    #[test]
    fn volume_info_from_device_json() {
        let info: VolumeInfo = serde_json::from_str(
            r#"{"output": "", "volume": 18, "mute": "off", "minVolume": 0, "maxVolume": 50, "step": 1}"#,
        )
        .unwrap();

        assert_eq!(info.volume, 18);
        assert_eq!(info.max_volume, 50);
        assert_eq!(info.step, 1);
        assert!(!info.is_muted());
        assert!((info.fraction() - 0.36).abs() < 1e-9);
    }

    #[test]
    fn power_status_strings() {
        let info: PowerInfo = serde_json::from_str(r#"{"status": "active"}"#).unwrap();
        assert!(info.status.is_on());

        let info: PowerInfo = serde_json::from_str(r#"{"status": "standby"}"#).unwrap();
        assert_eq!(info.status, PowerStatus::Standby);

        let info: PowerInfo = serde_json::from_str(r#"{"status": "shuttingDown"}"#).unwrap();
        assert_eq!(info.status, PowerStatus::Unknown);
    }

    #[test]
    fn playing_content_info_maps_source_to_input() {
        let info: PlayingContentInfo = serde_json::from_str(
            r#"{"source": "extInput:line?port=1", "uri": "extInput:line?port=1", "stateInfo": {"state": "PLAYING"}}"#,
        )
        .unwrap();

        assert_eq!(info.input(), Some(Input::AudioIn));
        assert_eq!(info.state(), Some("PLAYING"));
    }
}
