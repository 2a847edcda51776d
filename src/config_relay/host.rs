use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Error, Result};
use log::{debug, info};

use crate::config_relay::app_message::AppMessage;

/// The watch-companion environment: it opens URLs in a webview and carries
/// messages over to the watch.
pub trait HostRuntime {
    fn open_url(&mut self, url: &str) -> Result<()>;

    /// Hands a message to the host for delivery. Fire-and-forget: the host
    /// reports the outcome through `callbacks`, there is no retry.
    fn send_app_message(&mut self, message: &AppMessage, callbacks: SendCallbacks);
}

/// Outcome callbacks for one message send. The host resolves each send by
/// calling exactly one of the two.
pub struct SendCallbacks {
    on_success: Box<dyn FnOnce()>,
    on_failure: Box<dyn FnOnce(Error)>,
}

impl SendCallbacks {
    pub fn new(
        on_success: impl FnOnce() + 'static,
        on_failure: impl FnOnce(Error) + 'static,
    ) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        }
    }

    pub fn succeeded(self) {
        (self.on_success)()
    }

    pub fn failed(self, error: Error) {
        (self.on_failure)(error)
    }
}

/// Host used by the harness binary. URL opens are only logged; messages are
/// delivered by encoding them to a file, or dropped with a debug line when
/// no output file was given.
pub struct ConsoleHost {
    output: Option<PathBuf>,
}

impl ConsoleHost {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    fn deliver(&self, message: &AppMessage) -> Result<()> {
        let mut encoded = vec![];
        message.to_write(&mut encoded)?;

        match &self.output {
            Some(path) => {
                let mut file = File::create(path)
                    .context(format!("Could not create output file '{}'", path.display()))?;
                file.write_all(&encoded)?;

                info!(
                    "Wrote {} byte message to '{}'.",
                    encoded.len(),
                    path.display()
                );
            }
            None => debug!("Encoded message is {} bytes, discarding.", encoded.len()),
        }

        Ok(())
    }
}

impl HostRuntime for ConsoleHost {
    fn open_url(&mut self, url: &str) -> Result<()> {
        info!("Would open configuration page: {}", url);
        Ok(())
    }

    fn send_app_message(&mut self, message: &AppMessage, callbacks: SendCallbacks) {
        match self.deliver(message) {
            Ok(()) => callbacks.succeeded(),
            Err(e) => callbacks.failed(e),
        }
    }
}
