//! The request/response seam between the receiver handle and the network

use crate::{ReceiverConfig, Result};
use ync_client::{Command, YncClient};
use xmltree::Element;

/// Executes single requests against one receiver
///
/// Implementations return the parsed reply root and fail with a transport or
/// protocol error; callers never see partially successful replies.
pub trait Transport {
    /// Send a payload fragment with the given command
    fn request(&self, command: Command, payload: &str) -> Result<Element>;

    /// Fetch the unit descriptor document
    fn descriptor(&self) -> Result<Element>;
}

/// HTTP transport backed by [`YncClient`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: YncClient,
    ctrl_url: String,
    desc_url: String,
}

impl HttpTransport {
    pub fn new(config: &ReceiverConfig) -> Self {
        Self {
            client: YncClient::with_timeouts(config.connect_timeout, config.read_timeout),
            ctrl_url: config.ctrl_url.clone(),
            desc_url: config.desc_url.clone(),
        }
    }
}

impl Transport for HttpTransport {
    fn request(&self, command: Command, payload: &str) -> Result<Element> {
        Ok(self.client.call(&self.ctrl_url, command, payload)?)
    }

    fn descriptor(&self) -> Result<Element> {
        Ok(self.client.fetch(&self.desc_url)?)
    }
}
