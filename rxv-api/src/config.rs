//! Configuration types for receiver handles
//!
//! [`ReceiverConfig`] controls where requests are sent, which zone they
//! address, and how long menu navigation waits for the receiver to settle.

use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::warn;

/// Retry budget of the menu readiness poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Number of re-checks after the initial check
    /// Default: 10
    pub attempts: u32,

    /// Delay before each re-check
    /// Default: 100 milliseconds
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_millis(100),
        }
    }
}

impl PollConfig {
    /// A poller that re-checks without sleeping, for scripted devices
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            interval: Duration::ZERO,
        }
    }
}

/// Configuration for a [`Receiver`](crate::Receiver)
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Control endpoint, e.g. `http://10.0.0.2/YamahaRemoteControl/ctrl`
    pub ctrl_url: String,

    /// Unit descriptor URL
    /// Default: `ctrl_url` with the trailing `ctrl` replaced by `desc.xml`
    pub desc_url: String,

    /// Zone addressed by zone-scoped requests
    /// Default: `Main_Zone`
    pub zone: String,

    /// Default: `Unknown`
    pub model_name: String,

    /// Default: `Unknown`
    pub friendly_name: String,

    /// Readiness poller budget used by menu navigation
    pub poll: PollConfig,

    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Default: 10 seconds
    pub read_timeout: Duration,

    /// Input selected before server path selection
    /// Default: `SERVER`
    pub content_source_input: String,

    /// Input selected before net radio selection
    /// Default: `NET RADIO`
    pub net_radio_input: String,

    /// Status reads made by net radio selection before it times out
    /// Default: 20
    pub net_radio_attempts: u32,

    /// Sleep between net radio attempts while the menu is busy
    /// Default: 1 second
    pub net_radio_interval: Duration,
}

impl ReceiverConfig {
    /// Create a configuration for the given control URL
    ///
    /// A bare IPv4 address is still accepted and expanded to the standard
    /// control URL, but this form is deprecated.
    pub fn new(ctrl_url: impl Into<String>) -> Self {
        let mut ctrl_url = ctrl_url.into();
        if ctrl_url.parse::<Ipv4Addr>().is_ok() {
            warn!("Using IP address as a control URL is deprecated");
            ctrl_url = format!("http://{}/YamahaRemoteControl/ctrl", ctrl_url);
        }
        let desc_url = default_desc_url(&ctrl_url);

        Self {
            ctrl_url,
            desc_url,
            zone: "Main_Zone".to_string(),
            model_name: "Unknown".to_string(),
            friendly_name: "Unknown".to_string(),
            poll: PollConfig::default(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            content_source_input: "SERVER".to_string(),
            net_radio_input: "NET RADIO".to_string(),
            net_radio_attempts: 20,
            net_radio_interval: Duration::from_secs(1),
        }
    }

    pub fn with_desc_url(mut self, desc_url: impl Into<String>) -> Self {
        self.desc_url = desc_url.into();
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = friendly_name.into();
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Configure net radio selection retries
    pub fn with_net_radio_retries(mut self, attempts: u32, interval: Duration) -> Self {
        self.net_radio_attempts = attempts;
        self.net_radio_interval = interval;
        self
    }
}

fn default_desc_url(ctrl_url: &str) -> String {
    match ctrl_url.strip_suffix("ctrl") {
        Some(base) => format!("{}desc.xml", base),
        None => ctrl_url.to_string(),
    }
}
