//! Boundary text that has not been proven to be well-formed UTF-8 yet.
//!
//! Request fields arrive from outside the process (forms, JSON bodies,
//! UTF-16 host strings). [`RequestText`] keeps the exact bytes so that the
//! validator can decide, instead of silently repairing them on the way in.

use crate::core::string::is_round_trip_utf8;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Raw request text.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestText {
    bytes: Vec<u8>,
}

impl RequestText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
        }
    }

    /// Wrap raw bytes as received; no validation is performed.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Encode UTF-16 code units.
    ///
    /// Well-formed pairs become regular UTF-8. An unpaired surrogate is kept
    /// in its generalized three-byte form so the text is recognisably
    /// ill-formed rather than replaced with U+FFFD.
    pub fn from_utf16(units: &[u16]) -> Self {
        let mut bytes = Vec::with_capacity(units.len() * 3);
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                Err(e) => {
                    let unit = e.unpaired_surrogate();
                    bytes.extend_from_slice(&[
                        0xE0 | (unit >> 12) as u8,
                        0x80 | ((unit >> 6) & 0x3F) as u8,
                        0x80 | (unit & 0x3F) as u8,
                    ]);
                }
            }
        }
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The text as `&str`, if it is well-formed UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Lossy view for logs and display.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Empty or whitespace-only text counts as missing.
    pub fn is_blank(&self) -> bool {
        self.as_str()
            .map(|s| s.trim().is_empty())
            .unwrap_or(self.bytes.is_empty())
    }

    pub fn is_valid_utf8(&self) -> bool {
        is_round_trip_utf8(&self.bytes)
    }
}

impl From<&str> for RequestText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RequestText {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RequestText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for RequestText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{:?}", s),
            None => write!(f, "RequestText(invalid: {:02x?})", self.bytes),
        }
    }
}

impl Serialize for RequestText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl<'de> Deserialize<'de> for RequestText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
