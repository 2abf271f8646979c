//! Protocol versions and the sequence framing each one uses.
//!
//! Versions differ only in how Sequence rows are delimited on the wire. The
//! codec looks the framing up once per sequence from [`FRAMING`] instead of
//! branching on the version during traversal.
use std::str::FromStr;

use crate::error::DapError;

/// Marker written before every sequence row.
pub const START_OF_INSTANCE: u8 = 0x5A;
/// Marker written after the last sequence row.
pub const END_OF_SEQUENCE: u8 = 0xA5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    V1,
    #[default]
    V2,
    V3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFraming {
    /// A u32 row count precedes the rows; no markers.
    Counted,
    /// Each row is preceded by [`START_OF_INSTANCE`] and the sequence is
    /// closed by [`END_OF_SEQUENCE`], each padded to `width` bytes.
    Markers { width: usize },
}

/// Indexed by `ProtocolVersion as usize`.
const FRAMING: [SequenceFraming; 3] = [
    SequenceFraming::Counted,
    SequenceFraming::Markers { width: 4 },
    SequenceFraming::Markers { width: 1 },
];

impl ProtocolVersion {
    pub fn sequence_framing(self) -> SequenceFraming {
        FRAMING[self as usize]
    }
}

/// Accepts `"2"`, `"2.0"`, `"3.2"` or `"DAP/2.0"` style version strings.
impl FromStr for ProtocolVersion {
    type Err = DapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_prefix("DAP/")
            .or_else(|| trimmed.strip_prefix("dods/"))
            .unwrap_or(trimmed);
        let major = number.split('.').next().unwrap_or_default();

        match major {
            "1" => Ok(ProtocolVersion::V1),
            "2" => Ok(ProtocolVersion::V2),
            "3" => Ok(ProtocolVersion::V3),
            _ => Err(DapError::UnsupportedVersion(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_from_string() {
        let inputs = vec![
            ("1", ProtocolVersion::V1),
            ("2.0", ProtocolVersion::V2),
            ("DAP/2.0", ProtocolVersion::V2),
            ("dods/3.2", ProtocolVersion::V3),
            (" 3 ", ProtocolVersion::V3),
        ];

        for (text, expected) in inputs {
            let version: ProtocolVersion = text.parse().unwrap();
            assert_eq!(version, expected);
        }
    }

    #[test]
    #[should_panic(expected = "UnsupportedVersion")]
    fn unknown_version() {
        let _: ProtocolVersion = "4.0".parse().unwrap();
    }

    #[test]
    fn framing_table() {
        assert_eq!(
            ProtocolVersion::V1.sequence_framing(),
            SequenceFraming::Counted
        );
        assert_eq!(
            ProtocolVersion::V2.sequence_framing(),
            SequenceFraming::Markers { width: 4 }
        );
        assert_eq!(
            ProtocolVersion::V3.sequence_framing(),
            SequenceFraming::Markers { width: 1 }
        );
        assert_eq!(ProtocolVersion::default(), ProtocolVersion::V2);
    }
}
