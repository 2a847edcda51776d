use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// What the settings page hands back when its webview closes.
///
/// One of these exists per configuration session; it is turned into an
/// [`AppMessage`](crate::config_relay::AppMessage) and discarded.
#[derive(Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct ConfigPayload {
    #[serde(default)]
    pub high_contrast: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl ConfigPayload {
    /// Decodes the URL-encoded JSON string the webview returns on close.
    pub fn from_webview_response(response: &str) -> Result<Self> {
        let decoded = percent_decode(response)
            .context("Could not url-decode the configuration response")?;

        json5::from_str(&decoded).context("Could not parse the configuration response")
    }
}

/// Reverses the `encodeURIComponent` the settings page applies: `%XX` escapes
/// only. A `+` is a literal plus, not a space.
fn percent_decode(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let digits = match bytes.get(i + 1..i + 3) {
                Some(d) => d,
                None => bail!("Truncated percent escape at byte {}", i),
            };
            let digits = std::str::from_utf8(digits)
                .ok()
                .and_then(|d| u8::from_str_radix(d, 16).ok());

            match digits {
                Some(value) => decoded.push(value),
                None => bail!("Invalid percent escape at byte {}", i),
            }
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).context("Decoded configuration response is not valid UTF-8")
}
