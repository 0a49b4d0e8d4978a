// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/interpreter.rs - Interpreter for decoded EMV QR payment payloads.
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

/*!
 * # `interpreter` Module
 *
 * This module provides functionality to interpret a decoded payload as a
 * merchant-presented payment request.
 *
 * ## Usage Example
 *
 * ```no_run
 * use emvqr::decoder::decode;
 * use emvqr::interpreter::MerchantPayload;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let document = decode("000201010212540512.505911CAFE MANILA")?;
 *     let payload = MerchantPayload::from_document(&document)?;
 *
 *     if let Some(amount) = payload.transaction_amount {
 *         println!("Pay {} to {:?}", amount, payload.merchant_name);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::decoder::{Document, TlvField, Value};
use crate::error::InterpretError;

/// How the code is meant to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOfInitiation {
    /// The same code is used for every transaction ("11").
    Static,
    /// The code is generated for a single transaction ("12").
    Dynamic,
}

/// A merchant account information field.
///
/// Tags `02` to `25` usually hold a plain payment network identifier; tags
/// `26` to `51` are templates when the profile says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantAccount {
    pub tag: String,
    /// The raw identifier, or the decoded template contents.
    pub value: Value,
}

impl MerchantAccount {
    /// The decoded template contents, if this account is a template.
    pub fn fields(&self) -> Option<&Document> {
        match &self.value {
            Value::Template(d) => Some(d),
            Value::Text(_) => None,
        }
    }
}

/// A decoded payload, interpreted as a merchant-presented payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantPayload {
    pub payload_format_indicator: String,
    pub point_of_initiation: Option<PointOfInitiation>,
    /// Merchant account information fields (tags 02 to 51), in payload order.
    pub merchant_accounts: Vec<MerchantAccount>,
    pub merchant_category_code: Option<String>,
    /// ISO 4217 numeric currency code.
    pub transaction_currency: Option<String>,
    pub transaction_amount: Option<Decimal>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_city: Option<String>,
    pub postal_code: Option<String>,
    /// The CRC field as it appears in the payload. It is not checked.
    pub crc: Option<String>,
}

impl MerchantPayload {
    /// Interprets a decoded payload.
    ///
    /// # Arguments
    ///
    /// * `document` - The top level of a decoded payload.
    ///
    /// # Returns
    ///
    /// A `Result` containing the interpreted payload or an error.
    pub fn from_document(document: &Document) -> Result<Self, InterpretError> {
        let payload_format_indicator = text(document, "00")?
            .ok_or(InterpretError::MissingField("Payload Format Indicator"))?;

        let point_of_initiation = match text(document, "01")? {
            None => None,
            Some(s) if s == "11" => Some(PointOfInitiation::Static),
            Some(s) if s == "12" => Some(PointOfInitiation::Dynamic),
            Some(s) => return Err(InterpretError::InvalidPointOfInitiation(s)),
        };

        let merchant_accounts = document
            .iter()
            .filter(|field| is_merchant_account_tag(&field.tag))
            .map(|field| MerchantAccount {
                tag: field.tag.clone(),
                value: field.value.clone(),
            })
            .collect();

        let transaction_amount = match text(document, "54")? {
            Some(s) => Some(parse_amount(&s)?),
            None => None,
        };

        Ok(Self {
            payload_format_indicator,
            point_of_initiation,
            merchant_accounts,
            merchant_category_code: text(document, "52")?,
            transaction_currency: text(document, "53")?,
            transaction_amount,
            country_code: text(document, "58")?,
            merchant_name: text(document, "59")?,
            merchant_city: text(document, "60")?,
            postal_code: text(document, "61")?,
            crc: text(document, "63")?,
        })
    }
}

// Tags 02 through 51 are reserved for merchant account information.
fn is_merchant_account_tag(tag: &str) -> bool {
    matches!(tag.parse::<u8>(), Ok(2..=51))
}

fn text(document: &Document, tag: &str) -> Result<Option<String>, InterpretError> {
    match document.get(tag) {
        None => Ok(None),
        Some(field) => leaf(field).map(Some),
    }
}

fn leaf(field: &TlvField) -> Result<String, InterpretError> {
    field
        .as_str()
        .map(String::from)
        .ok_or_else(|| InterpretError::UnexpectedTemplate(field.tag.clone()))
}

fn parse_amount(s: &str) -> Result<Decimal, InterpretError> {
    // Amounts are digits with an optional single "." separator.
    let valid = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && s.bytes().filter(|&b| b == b'.').count() <= 1
        && s != ".";
    if !valid {
        return Err(InterpretError::InvalidAmount(s.to_string()));
    }
    Decimal::from_str(s).map_err(|_| InterpretError::InvalidAmount(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_from_document() {
        let document = decode(concat!(
            "000201",
            "010212",
            "2627",
            "0011COM.EXAMPLE",
            "0108ABCD1234",
            "52045812",
            "5303608",
            "540512.50",
            "5802PH",
            "5911CAFE MANILA",
            "6006MANILA",
            "61041000",
            "6304ABCD",
        ))
        .unwrap();
        let payload = MerchantPayload::from_document(&document).unwrap();

        assert_eq!(payload.payload_format_indicator, "01");
        assert_eq!(
            payload.point_of_initiation,
            Some(PointOfInitiation::Dynamic)
        );
        assert_eq!(payload.merchant_accounts.len(), 1);
        assert_eq!(payload.merchant_accounts[0].tag, "26");
        assert_eq!(
            payload.merchant_accounts[0]
                .fields()
                .and_then(|fields| fields.get("00"))
                .and_then(TlvField::as_str),
            Some("COM.EXAMPLE")
        );
        assert_eq!(payload.merchant_category_code.as_deref(), Some("5812"));
        assert_eq!(payload.transaction_currency.as_deref(), Some("608"));
        assert_eq!(payload.transaction_amount, Some(Decimal::new(1250, 2)));
        assert_eq!(payload.country_code.as_deref(), Some("PH"));
        assert_eq!(payload.merchant_name.as_deref(), Some("CAFE MANILA"));
        assert_eq!(payload.merchant_city.as_deref(), Some("MANILA"));
        assert_eq!(payload.postal_code.as_deref(), Some("1000"));
        assert_eq!(payload.crc.as_deref(), Some("ABCD"));
    }

    #[test]
    fn test_minimal_static() {
        let document = decode("000201010211").unwrap();
        let payload = MerchantPayload::from_document(&document).unwrap();
        assert_eq!(payload.point_of_initiation, Some(PointOfInitiation::Static));
        assert!(payload.merchant_accounts.is_empty());
        assert_eq!(payload.transaction_amount, None);
        assert_eq!(payload.crc, None);
    }

    #[test]
    fn test_missing_payload_format_indicator() {
        let document = decode("52045812").unwrap();
        assert_eq!(
            MerchantPayload::from_document(&document),
            Err(InterpretError::MissingField("Payload Format Indicator"))
        );
    }

    #[test]
    fn test_invalid_point_of_initiation() {
        let document = decode("000201010213").unwrap();
        assert_eq!(
            MerchantPayload::from_document(&document),
            Err(InterpretError::InvalidPointOfInitiation("13".to_string()))
        );
    }

    #[test]
    fn test_amounts() {
        assert_eq!(parse_amount("100"), Ok(Decimal::new(100, 0)));
        assert_eq!(parse_amount("99.9"), Ok(Decimal::new(999, 1)));
        assert_eq!(parse_amount("0.01"), Ok(Decimal::new(1, 2)));
        for bad in ["", ".", "1,00", "-5", "1.2.3", "1e5"] {
            assert_eq!(
                parse_amount(bad),
                Err(InterpretError::InvalidAmount(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_unreserved_template_is_not_an_account() {
        let mut profile = crate::profile::Profile::emv_mpm();
        profile.container_tags.insert("80".to_string());
        let document = crate::decoder::decode_with("00020180080004TEST", &profile).unwrap();
        let payload = MerchantPayload::from_document(&document).unwrap();
        assert!(payload.merchant_accounts.is_empty());
    }

    #[test]
    fn test_plain_network_accounts_are_kept() {
        let document = decode("0002010216VISA12345678901226060002CN").unwrap();
        let payload = MerchantPayload::from_document(&document).unwrap();
        assert_eq!(payload.merchant_accounts.len(), 2);

        let visa = &payload.merchant_accounts[0];
        assert_eq!(visa.tag, "02");
        assert_eq!(visa.value, Value::Text("VISA123456789012".to_string()));
        assert_eq!(visa.fields(), None);

        let template = &payload.merchant_accounts[1];
        assert_eq!(template.tag, "26");
        assert_eq!(
            template
                .fields()
                .and_then(|fields| fields.get("00"))
                .and_then(TlvField::as_str),
            Some("CN")
        );
    }
}
