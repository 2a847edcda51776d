use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use std::io::{Read, Write};

use anyhow::{anyhow, bail, Result};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::config_relay::color::BackgroundColor;
use crate::config_relay::payload::ConfigPayload;

/// Tuple type tag for a signed integer in the watch dictionary format.
const TUPLE_TYPE_INT: u8 = 3;
const TUPLE_INT_SIZE: u16 = 4;

/// Keys the watch side knows about. The numeric ids have to stay in sync
/// with the defines in the watch application.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum AppMessageKey {
    ColorRedBg,
    ColorGreenBg,
    ColorBlueBg,
    HighContrast,
}

impl AppMessageKey {
    pub fn id(self) -> u32 {
        match self {
            AppMessageKey::ColorRedBg => 0,
            AppMessageKey::ColorGreenBg => 1,
            AppMessageKey::ColorBlueBg => 2,
            AppMessageKey::HighContrast => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(AppMessageKey::ColorRedBg),
            1 => Some(AppMessageKey::ColorGreenBg),
            2 => Some(AppMessageKey::ColorBlueBg),
            3 => Some(AppMessageKey::HighContrast),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AppMessageKey::ColorRedBg => "KEY_COLOR_RED_BG",
            AppMessageKey::ColorGreenBg => "KEY_COLOR_GREEN_BG",
            AppMessageKey::ColorBlueBg => "KEY_COLOR_BLUE_BG",
            AppMessageKey::HighContrast => "KEY_HIGH_CONTRAST",
        }
    }
}

impl fmt::Display for AppMessageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flat key-value message for the watch application.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct AppMessage {
    entries: BTreeMap<AppMessageKey, i32>,
}

impl AppMessage {
    pub fn new() -> Self {
        AppMessage {
            entries: BTreeMap::new(),
        }
    }

    /// Builds the message for one configuration session.
    ///
    /// High contrast wins: when it is enabled the message carries only the
    /// flag (as an integer), and the background color is not even looked at.
    pub fn from_payload(payload: &ConfigPayload) -> Result<Self> {
        let mut message = AppMessage::new();

        if payload.high_contrast {
            message.insert(AppMessageKey::HighContrast, 1);
            return Ok(message);
        }

        let hex = payload.background_color.as_deref().ok_or_else(|| {
            anyhow!("Configuration has neither high contrast nor a background color")
        })?;

        let color = BackgroundColor::from_hex(hex)?;
        message.insert(AppMessageKey::ColorRedBg, i32::from(color.red));
        message.insert(AppMessageKey::ColorGreenBg, i32::from(color.green));
        message.insert(AppMessageKey::ColorBlueBg, i32::from(color.blue));

        Ok(message)
    }

    pub fn insert(&mut self, key: AppMessageKey, value: i32) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: AppMessageKey) -> Option<i32> {
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes into the watch dictionary format: a tuple count, then per
    /// tuple the key id, a type tag, the value length and the value itself.
    pub fn to_write<W: Write>(&self, data: &mut W) -> Result<()> {
        data.write_u8(self.entries.len() as u8)?;

        for (key, value) in self.entries.iter() {
            data.write_u32::<LE>(key.id())?;
            data.write_u8(TUPLE_TYPE_INT)?;
            data.write_u16::<LE>(TUPLE_INT_SIZE)?;
            data.write_i32::<LE>(*value)?;
        }

        Ok(())
    }

    pub fn from_read<R: Read>(data: &mut R) -> Result<Self> {
        let nr_of_tuples = data.read_u8()?;
        let mut entries = BTreeMap::new();

        for i in 0..nr_of_tuples {
            let id = data.read_u32::<LE>()?;
            let key = AppMessageKey::from_id(id)
                .ok_or_else(|| anyhow!("Unknown key id {} in tuple {}", id, i + 1))?;

            let tuple_type = data.read_u8()?;
            if tuple_type != TUPLE_TYPE_INT {
                bail!("Tuple {} has unsupported type tag {}", i + 1, tuple_type);
            }

            let length = data.read_u16::<LE>()?;
            if length != TUPLE_INT_SIZE {
                bail!("Tuple {} has unexpected value length {}", i + 1, length);
            }

            entries.insert(key, data.read_i32::<LE>()?);
        }

        Ok(AppMessage { entries })
    }
}

impl fmt::Display for AppMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;

        for (key, value) in self.entries.iter() {
            write!(f, "{}: {}, ", key, value)?;
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use byteorder::{WriteBytesExt, LE};

    use crate::config_relay::app_message::{AppMessage, AppMessageKey, TUPLE_TYPE_INT};
    use crate::config_relay::payload::ConfigPayload;

    #[test]
    fn from_payload_high_contrast_only_sends_the_flag() {
        let payload = ConfigPayload {
            high_contrast: true,
            background_color: Some("0x1A2B3C".to_string()),
        };

        let message = AppMessage::from_payload(&payload).unwrap();

        assert_eq!(message.len(), 1);
        assert_eq!(message.get(AppMessageKey::HighContrast), Some(1));
    }

    #[test]
    fn from_payload_color_sends_three_channels() {
        let payload = ConfigPayload {
            high_contrast: false,
            background_color: Some("0x1A2B3C".to_string()),
        };

        let message = AppMessage::from_payload(&payload).unwrap();

        assert_eq!(message.len(), 3);
        assert_eq!(message.get(AppMessageKey::ColorRedBg), Some(26));
        assert_eq!(message.get(AppMessageKey::ColorGreenBg), Some(43));
        assert_eq!(message.get(AppMessageKey::ColorBlueBg), Some(60));
        assert_eq!(message.get(AppMessageKey::HighContrast), None);
    }

    #[test]
    fn from_payload_without_color_or_contrast_fails_closed() {
        let payload = ConfigPayload::default();

        assert!(AppMessage::from_payload(&payload).is_err());
    }

    #[test]
    fn from_payload_malformed_color_fails_closed() {
        let payload = ConfigPayload {
            high_contrast: false,
            background_color: Some("purple".to_string()),
        };

        assert!(AppMessage::from_payload(&payload).is_err());
    }

    #[test]
    fn to_write_produces_the_dictionary_layout() {
        let mut message = AppMessage::new();
        message.insert(AppMessageKey::HighContrast, 1);

        let mut written = vec![];
        message.to_write(&mut written).unwrap();

        let mut expected: Vec<u8> = vec![];
        expected.write_u8(1).unwrap();
        expected.write_u32::<LE>(3).unwrap(); // KEY_HIGH_CONTRAST
        expected.write_u8(TUPLE_TYPE_INT).unwrap();
        expected.write_u16::<LE>(4).unwrap();
        expected.write_i32::<LE>(1).unwrap();

        assert_eq!(written, expected);
    }

    #[test]
    fn write_read_equivalence_check() {
        let mut message = AppMessage::new();
        message.insert(AppMessageKey::ColorRedBg, 26);
        message.insert(AppMessageKey::ColorGreenBg, 43);
        message.insert(AppMessageKey::ColorBlueBg, 60);

        let mut written = vec![];
        message.to_write(&mut written).unwrap();

        let re_read = AppMessage::from_read(&mut Cursor::new(written)).unwrap();

        assert_eq!(message, re_read);
    }

    #[test]
    fn from_read_rejects_unknown_key() {
        let mut data: Vec<u8> = vec![];
        data.write_u8(1).unwrap();
        data.write_u32::<LE>(99).unwrap();
        data.write_u8(TUPLE_TYPE_INT).unwrap();
        data.write_u16::<LE>(4).unwrap();
        data.write_i32::<LE>(0).unwrap();

        assert!(AppMessage::from_read(&mut Cursor::new(data)).is_err());
    }

    #[test]
    fn from_read_rejects_non_integer_tuple() {
        let mut data: Vec<u8> = vec![];
        data.write_u8(1).unwrap();
        data.write_u32::<LE>(0).unwrap();
        data.write_u8(1).unwrap(); // cstring type tag
        data.write_u16::<LE>(4).unwrap();
        data.write_i32::<LE>(0).unwrap();

        assert!(AppMessage::from_read(&mut Cursor::new(data)).is_err());
    }

    #[test]
    fn display_uses_watch_key_names() {
        let mut message = AppMessage::new();
        message.insert(AppMessageKey::HighContrast, 1);

        assert_eq!(message.to_string(), "{ KEY_HIGH_CONTRAST: 1, }");
    }
}
