use std::fmt;
use std::fmt::Formatter;

use anyhow::{bail, Context, Result};

/// Background color picked on the settings page.
///
/// The page reports it as a `0xRRGGBB` hex string; the watch wants the three
/// channels as separate integers.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BackgroundColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl BackgroundColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a `0xRRGGBB` string. Anything else is an error, a default
    /// color is never substituted.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = match hex.strip_prefix("0x") {
            Some(d) => d,
            None => bail!("Background color '{}' is missing the '0x' prefix", hex),
        };

        if digits.len() != 6 || !digits.is_ascii() {
            bail!(
                "Background color '{}' should have exactly 6 hex digits",
                hex
            );
        }

        let red = u8::from_str_radix(&digits[0..2], 16)
            .context(format!("Invalid red channel in background color '{}'", hex))?;
        let green = u8::from_str_radix(&digits[2..4], 16).context(format!(
            "Invalid green channel in background color '{}'",
            hex
        ))?;
        let blue = u8::from_str_radix(&digits[4..6], 16).context(format!(
            "Invalid blue channel in background color '{}'",
            hex
        ))?;

        Ok(Self::new(red, green, blue))
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod test {
    use crate::config_relay::color::BackgroundColor;

    #[test]
    fn from_hex_happy_flow() {
        let color = BackgroundColor::from_hex("0x1A2B3C").unwrap();
        assert_eq!(color, BackgroundColor::new(26, 43, 60));
    }

    #[test]
    fn from_hex_lowercase_digits() {
        let color = BackgroundColor::from_hex("0xff00aa").unwrap();
        assert_eq!(color, BackgroundColor::new(255, 0, 170));
    }

    #[test]
    fn from_hex_missing_prefix() {
        assert!(BackgroundColor::from_hex("1A2B3C").is_err());
        assert!(BackgroundColor::from_hex("#1A2B3C").is_err());
    }

    #[test]
    fn from_hex_wrong_length() {
        assert!(BackgroundColor::from_hex("0x1A2B").is_err());
        assert!(BackgroundColor::from_hex("0x1A2B3C4D").is_err());
        assert!(BackgroundColor::from_hex("0x").is_err());
    }

    #[test]
    fn from_hex_non_hex_digits() {
        assert!(BackgroundColor::from_hex("0xGGHHII").is_err());
        // Multi-byte characters must not panic the fixed-offset slicing.
        assert!(BackgroundColor::from_hex("0xééé").is_err());
    }

    #[test]
    fn display_round_trips() {
        let color = BackgroundColor::new(26, 43, 60);
        assert_eq!(color.to_string(), "0x1A2B3C");
        assert_eq!(
            BackgroundColor::from_hex(&color.to_string()).unwrap(),
            color
        );
    }
}
