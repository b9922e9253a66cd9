//! Private YNC client for receiver communication
//!
//! This crate provides a minimal client for the HTTP+XML remote-control
//! protocol spoken by networked AV receivers. Every control request is a
//! `<YAMAHA_AV cmd="GET|PUT">` document POSTed to the control URL; the reply
//! carries an `RC` attribute where `"0"` means success. The device also
//! publishes a descriptor document (`desc.xml`) that is fetched with GET.

mod error;

pub use error::YncError;

use std::fmt;
use std::time::Duration;
use tracing::{debug, error};
use xmltree::Element;

/// The `cmd` attribute of a request envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Read a parameter (`GetParam` payloads)
    Get,
    /// Change a parameter or trigger an action
    Put,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Get => "GET",
            Command::Put => "PUT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A minimal YNC client for receiver communication
#[derive(Debug, Clone)]
pub struct YncClient {
    agent: ureq::Agent,
}

impl YncClient {
    /// Create a new client with default timeouts (5s connect, 10s read)
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a client with custom connect and read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// Send a control request and return the parsed response root
    ///
    /// # Arguments
    /// * `ctrl_url` - Full control URL, e.g. `http://10.0.0.2/YamahaRemoteControl/ctrl`
    /// * `command` - `GET` or `PUT`
    /// * `payload` - The XML fragment placed inside the `YAMAHA_AV` envelope
    ///
    /// # Errors
    /// `Network` on transport failures, `Parse` on malformed XML and
    /// `Response` when the receiver reports a non-zero `RC`.
    pub fn call(&self, ctrl_url: &str, command: Command, payload: &str) -> Result<Element, YncError> {
        let body = envelope(command, payload);

        debug!("REQ: POST | {} | {}", ctrl_url, body);
        let response = self
            .agent
            .post(ctrl_url)
            .set("Content-Type", "text/xml")
            .send_string(&body)
            .map_err(|e| YncError::Network(e.to_string()))?;

        let xml_text = response
            .into_string()
            .map_err(|e| YncError::Network(e.to_string()))?;
        debug!("RES: POST | {} | {}", ctrl_url, xml_text);

        let xml = Element::parse(xml_text.as_bytes()).map_err(|e| {
            error!("Invalid XML returned for request {}: {}", body, xml_text);
            YncError::Parse(e.to_string())
        })?;

        check_response(xml, &body, &xml_text)
    }

    /// Fetch and parse an XML document with a plain GET
    ///
    /// Used for the unit descriptor. An empty body means the device does not
    /// publish a descriptor and is reported as a parse error.
    pub fn fetch(&self, url: &str) -> Result<Element, YncError> {
        debug!("REQ: GET | {}", url);
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| YncError::Network(e.to_string()))?;

        let xml_text = response
            .into_string()
            .map_err(|e| YncError::Network(e.to_string()))?;
        debug!("RES: GET | {} | {} bytes", url, xml_text.len());

        if xml_text.trim().is_empty() {
            error!("Unsupported receiver? Failed to fetch {}", url);
            return Err(YncError::Parse(format!("Empty document returned by {}", url)));
        }

        Element::parse(xml_text.as_bytes()).map_err(|e| {
            error!("Invalid XML returned for request {}", url);
            YncError::Parse(e.to_string())
        })
    }
}

impl Default for YncClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a payload fragment in the request envelope
pub fn envelope(command: Command, payload: &str) -> String {
    format!(r#"<YAMAHA_AV cmd="{}">{}</YAMAHA_AV>"#, command, payload)
}

fn check_response(xml: Element, request: &str, raw: &str) -> Result<Element, YncError> {
    match xml.attributes.get("RC").map(String::as_str) {
        Some("0") => Ok(xml),
        code => {
            let code = code.unwrap_or("missing").to_string();
            error!("Request {} failed with RC={}", request, code);
            Err(YncError::Response {
                code,
                body: raw.to_string(),
            })
        }
    }
}
