/// Lifecycle events delivered by the host runtime, one at a time.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The companion runtime has started up.
    Ready,
    /// The user asked for the settings page.
    ShowConfiguration,
    /// The settings webview closed; `response` is the URL-encoded JSON
    /// string the page handed back.
    WebviewClosed { response: String },
}
