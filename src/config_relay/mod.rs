use anyhow::{Context, Result};
use log::{error, info};

pub use app_message::{AppMessage, AppMessageKey};
pub use color::BackgroundColor;
pub use event::HostEvent;
pub use host::{ConsoleHost, HostRuntime, SendCallbacks};
pub use payload::ConfigPayload;

mod app_message;
mod color;
mod event;
mod host;
mod payload;
mod test_relay_session;

/// Where the settings page lives. The page posts the chosen configuration
/// back through the webview-closed event.
pub const CONFIG_PAGE_URL: &str = "http://stuguru.github.io/fitface/index2.html";

/// Relays configuration from the settings page to the watch application.
///
/// The host runtime delivers events serially; each handler runs to
/// completion before the next event is dispatched, so there is no shared
/// mutable state to protect. At most one message send is in flight per
/// configuration session.
pub struct ConfigRelay<H: HostRuntime> {
    host: H,
}

impl<H: HostRuntime> ConfigRelay<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::Ready => {
                info!("Companion runtime ready.");
                Ok(())
            }
            HostEvent::ShowConfiguration => self.show_configuration(),
            HostEvent::WebviewClosed { response } => self.webview_closed(&response),
        }
    }

    fn show_configuration(&mut self) -> Result<()> {
        info!("Showing configuration page.");

        self.host
            .open_url(CONFIG_PAGE_URL)
            .context("Could not open the configuration page")
    }

    /// Failing to decode the payload or to build the message fails the
    /// whole handler; nothing is sent in that case. A failed send on the
    /// other hand is only logged, the watch will simply keep its current
    /// configuration.
    fn webview_closed(&mut self, response: &str) -> Result<()> {
        let payload = ConfigPayload::from_webview_response(response)?;

        match json5::to_string(&payload) {
            Ok(json) => info!("Configuration page returned: {}", json),
            Err(_) => info!("Configuration page returned: {:?}", payload),
        }

        let message = AppMessage::from_payload(&payload)?;

        let sent = message.to_string();
        self.host.send_app_message(
            &message,
            SendCallbacks::new(
                move || info!("Send successful: {}", sent),
                move |e| error!("Send failed: {}", e),
            ),
        );

        Ok(())
    }
}
