// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for EMV QR payload decoding.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use thiserror::Error;

/// The reason a payload could not be decoded.
///
/// The `Display` output of each variant is the short reason string shown to
/// the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// Fewer than two bytes remained where a tag was expected.
    #[error("truncated tag")]
    TruncatedTag,
    /// The tag was not two ASCII digits.
    #[error("non-numeric tag")]
    NonNumericTag,
    /// Fewer than two bytes remained where a length was expected.
    #[error("truncated length")]
    TruncatedLength,
    /// The length was not two ASCII digits.
    #[error("non-numeric length")]
    NonNumericLength,
    /// The declared length runs past the end of the input.
    #[error("value exceeds input bounds")]
    ValueExceedsBounds,
    /// The value would end inside a multi-byte character.
    #[error("value splits a multi-byte character")]
    SplitCharacter,
    /// Container templates are nested deeper than the profile allows.
    #[error("nesting too deep")]
    NestingTooDeep,
    /// The input is longer than the profile allows.
    #[error("payload too long")]
    PayloadTooLong,
}

/// Errors returned by [crate::decoder::decode].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not valid TLV. `offset` is the byte offset, within the
    /// top-level input, of the field being read when decoding failed. Inputs
    /// rejected for their length report offset 0.
    #[error("malformed payload at offset {offset}: {reason}")]
    MalformedPayload { reason: Malformed, offset: usize },
}

impl DecodeError {
    /// The reason decoding failed.
    pub fn reason(&self) -> Malformed {
        match self {
            DecodeError::MalformedPayload { reason, .. } => *reason,
        }
    }
}

/// Errors returned while loading a [crate::profile::Profile].
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid tag {0:?} on line {1}")]
    InvalidTag(String, u64),

    #[error("invalid container flag {0:?} on line {1}")]
    InvalidContainerFlag(String, u64),
}

/// Errors returned by [crate::interpreter::MerchantPayload::from_document].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InterpretError {
    #[error("missing mandatory field {0}")]
    MissingField(&'static str),

    #[error("field {0} is a template where a value was expected")]
    UnexpectedTemplate(String),

    #[error("invalid point of initiation method {0:?}")]
    InvalidPointOfInitiation(String),

    #[error("invalid transaction amount {0:?}")]
    InvalidAmount(String),
}

/// Errors returned by [crate::scan::scan].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScanError {
    /// The image did not contain a readable QR symbol.
    #[error("no code found")]
    NoCodeFound,

    /// A symbol was read, but its payload was not valid.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(Malformed::TruncatedTag.to_string(), "truncated tag");
        assert_eq!(Malformed::TruncatedLength.to_string(), "truncated length");
        assert_eq!(
            Malformed::NonNumericLength.to_string(),
            "non-numeric length"
        );
        assert_eq!(
            Malformed::ValueExceedsBounds.to_string(),
            "value exceeds input bounds"
        );
        assert_eq!(Malformed::NestingTooDeep.to_string(), "nesting too deep");
    }

    #[test]
    fn test_scan_errors_are_distinct() {
        let decode = ScanError::from(DecodeError::MalformedPayload {
            reason: Malformed::TruncatedTag,
            offset: 6,
        });
        assert_eq!(
            decode.to_string(),
            "malformed payload at offset 6: truncated tag"
        );
        assert_eq!(ScanError::NoCodeFound.to_string(), "no code found");
        assert_ne!(decode, ScanError::NoCodeFound);
    }
}
