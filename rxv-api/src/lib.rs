//! Client library for networked AV receivers speaking the YNC HTTP+XML protocol
//!
//! This crate provides a typed API over the private `ync-client` transport:
//! power, volume, inputs, scenes, HDMI outputs and playback as single round
//! trips, plus navigation of the receiver's on-screen content menus.
//!
//! ```rust,ignore
//! use rxv_api::{Receiver, ReceiverConfig};
//!
//! let receiver = Receiver::new(ReceiverConfig::new("http://10.0.0.2/YamahaRemoteControl/ctrl"))?;
//! receiver.set_on(true)?;
//! receiver.set_volume(-45.5)?;
//!
//! // Content menus: enumerate the media server, then play one entry
//! for path in receiver.server_paths()? {
//!     println!("{} -> {}", path.indices, path.names);
//! }
//! receiver.server_select("Fancy Server>Radio>Stream 17")?;
//! ```
//!
//! Menu navigation lives in [`menu`]; it only needs a [`menu::MenuDevice`],
//! so it can be driven against any implementation of that trait.

pub mod commands;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod logging;
pub mod menu;
pub mod receiver;
pub mod transport;
pub mod xml;

pub use config::{PollConfig, ReceiverConfig};
pub use descriptor::Descriptor;
pub use error::{ApiError, Result};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use menu::{MenuDevice, MenuEntry, MenuNavigator, MenuNode, MenuSnapshot, PathSpec, ServerPath};
pub use receiver::{BasicStatus, PlayStatus, PlaybackSupport, Receiver};
pub use transport::{HttpTransport, Transport};
pub use ync_client::Command;
