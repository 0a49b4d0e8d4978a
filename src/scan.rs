// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/scan.rs - Decoding EMV QR payloads straight from images.
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

use log::debug;

use crate::decoder::{Document, decode_with};
use crate::error::ScanError;
use crate::profile::Profile;

/// Something that can find and read a QR symbol in an image.
///
/// This crate does not read QR symbols itself.
pub trait SymbolReader {
    /// Reads the text of the first QR symbol in an RGBA image.
    ///
    /// `rgba` holds `width * height` pixels, four bytes each. Returns `None`
    /// if no symbol was found.
    fn read(&self, width: u32, height: u32, rgba: &[u8]) -> Option<String>;
}

impl<F> SymbolReader for F
where
    F: Fn(u32, u32, &[u8]) -> Option<String>,
{
    fn read(&self, width: u32, height: u32, rgba: &[u8]) -> Option<String> {
        self(width, height, rgba)
    }
}

/// Reads a QR symbol from an image and decodes its payload.
///
/// An image with no symbol gives [ScanError::NoCodeFound]; a symbol whose
/// text is not a valid payload gives [ScanError::Decode].
pub fn scan<R: SymbolReader + ?Sized>(
    reader: &R,
    width: u32,
    height: u32,
    rgba: &[u8],
    profile: &Profile,
) -> Result<Document, ScanError> {
    let text = reader
        .read(width, height, rgba)
        .ok_or(ScanError::NoCodeFound)?;
    debug!("Read {} bytes from a {}x{} image", text.len(), width, height);
    Ok(decode_with(&text, profile)?)
}
