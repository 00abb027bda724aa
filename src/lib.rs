//! Rust library for controlling Sony networked speakers and AV receivers
//!
//! This library provides an async API for controlling Sony SRS-class devices
//! over their local HTTP control API. It supports:
//!
//! - Power control (on/off, status query)
//! - Volume control (absolute, relative stepping, fraction of maximum)
//! - Mute/unmute
//! - Input selection from a fixed set of sources
//! - Playback and source queries
//! - Enumeration of the API surface the device advertises
//!
//! # Quick Start
//!
//! ```no_run
//! use sony_avr::{AvrClient, Input};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One client per device; calls are independent requests
//!     let avr = AvrClient::new("192.168.1.100")?;
//!
//!     avr.turn_on().await?;
//!     avr.set_input(Input::AudioIn).await?;
//!     avr.raise_volume().await?;
//!
//!     let info = avr.volume_info().await?;
//!     println!("volume {}/{}", info.volume, info.max_volume);
//!
//!     avr.mute().await?;
//!     avr.unmute().await?;
//!     avr.turn_off().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized into several layers:
//!
//! - **Client**: One method per remote-control action
//! - **Transport**: One HTTP POST per call to `http://<host>:<port>/sony/<service>`
//! - **Protocol**: JSON request/response envelope structures
//! - **Types**: Domain types and data structures

mod client;
mod error;
mod protocol;
mod transport;
mod types;

// Public exports
pub use client::{AvrClient, DEFAULT_PORT};
pub use error::{AvrError, Result};
pub use protocol::{Request, Response, RpcError, Service};
pub use types::{
    ApiMethod, ApiService, Input, MuteState, PlayingContentInfo, PowerStatus, SchemeInfo,
    SourceInfo, StateInfo, VolumeInfo,
};
