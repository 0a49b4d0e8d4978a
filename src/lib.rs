// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder library for EMV QR payment payloads.
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
 * # `emvqr` Crate
 *
 * A library for decoding and interpreting the payloads of EMV
 * merchant-presented QR payment codes.
 *
 * This crate provides a full pipeline for working with these payloads:
 *
 * 1. [scan]: Hands an image to a QR symbol reader (not provided here).
 * 2. [decoder]: Decodes the TLV text into a tree of tagged fields, using the
 *    tag tables from a [profile].
 * 3. [interpreter]: Transforms the decoded fields into a payment request.
 * 4. [render]: Formats the decoded fields as text or JSON.
 *
 * ## Usage Example
 *
 * ```no_run
 * use emvqr::decoder::decode;
 * use emvqr::interpreter::MerchantPayload;
 * use emvqr::render::to_text;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let text = "00020101021230060002CN52045812530315654031.05802CN5905SHOP16007BEIJING6304ABCD";
 *
 *     // Decode the payload
 *     let document = decode(text)?;
 *     print!("{}", to_text(&document));
 *
 *     // Interpret the decoded fields
 *     let payload = MerchantPayload::from_document(&document)?;
 *     println!("Merchant: {:?}", payload.merchant_name);
 *     println!("Amount: {:?}", payload.transaction_amount);
 *
 *     Ok(())
 * }
 * ```
 */

pub mod decoder;
pub mod error;
pub mod interpreter;
pub mod profile;
pub mod render;
pub mod scan;

pub use decoder::{Document, TlvField, Value, decode, decode_with};
pub use error::{DecodeError, Malformed};
pub use profile::Profile;
