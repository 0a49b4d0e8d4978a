// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/render.rs - Human-readable output for decoded EMV QR payloads.
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

use crate::decoder::{Document, Value};

/// Renders `document` as an indented tree, one field per line.
///
/// ```text
/// 00 Payload Format Indicator (02): 01
/// 26 Merchant Account Information (14):
///   00 Unknown (10): COM.EXAMPL
/// ```
pub fn to_text(document: &Document) -> String {
    let mut out = String::new();
    write_level(document, 0, &mut out);
    out
}

fn write_level(document: &Document, indent: usize, out: &mut String) {
    for field in document {
        out.push_str(&"  ".repeat(indent));
        out.push_str(&format!("{} {} ({:02}):", field.tag, field.name, field.length));
        match &field.value {
            Value::Text(s) => {
                out.push(' ');
                out.push_str(s);
                out.push('\n');
            }
            Value::Template(nested) => {
                out.push('\n');
                write_level(nested, indent + 1, out);
            }
        }
    }
}

/// Renders `document` as pretty-printed JSON, keyed by tag in payload order.
pub fn to_json(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_to_text() {
        let document = decode("00020126140010COM.EXAMPL6304ABCD").unwrap();
        assert_eq!(
            to_text(&document),
            "\
00 Payload Format Indicator (02): 01
26 Merchant Account Information (14):
  00 Unknown (10): COM.EXAMPL
63 CRC (04): ABCD
"
        );
    }

    #[test]
    fn test_to_text_nested() {
        let document = decode("00020130060002CN").unwrap();
        assert_eq!(
            to_text(&document),
            "\
00 Payload Format Indicator (02): 01
30 Merchant Account Information (06):
  00 Unknown (02): CN
"
        );
    }

    #[test]
    fn test_to_json() {
        let document = decode("30060002CN000201").unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&document).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "30": {
                    "tag": "30",
                    "name": "Merchant Account Information",
                    "length": 6,
                    "value": {
                        "00": {"tag": "00", "name": "Unknown", "length": 2, "value": "CN"}
                    }
                },
                "00": {"tag": "00", "name": "Payload Format Indicator", "length": 2, "value": "01"}
            })
        );
    }

    #[test]
    fn test_to_json_keeps_order() {
        let document = decode("5802PH000201").unwrap();
        let json = to_json(&document).unwrap();
        let country = json.find("\"58\"").unwrap();
        let format = json.find("\"00\"").unwrap();
        assert!(country < format);
    }

    #[test]
    fn test_empty() {
        let document = decode("").unwrap();
        assert_eq!(to_text(&document), "");
        assert_eq!(to_json(&document).unwrap(), "{}");
    }
}
