// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/profile.rs - Tag tables for EMV QR payload decoding.
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
 * # `profile` Module
 *
 * A [Profile] tells the decoder which tags are templates (and so get decoded
 * recursively) and what each tag is called. Profiles can be built in code or
 * loaded from a CSV file with one row per tag:
 *
 * ```text
 * 00,Payload Format Indicator
 * 26,Merchant Account Information,container
 * 26/00,Globally Unique Identifier
 * ```
 *
 * A tag of the form `PP/TT` names the child `TT` of template `PP`. The
 * optional third column marks a tag as a template (`container`, `yes`, `1`)
 * or as a plain value (`leaf`, `no`, `0`, or empty). A `PP/TT` row marked as
 * a template only makes `TT` a template inside `PP`.
 */

use std::collections::HashMap;
use std::collections::HashSet;
use std::io::Read;

use crate::error::ProfileError;

/// Name reported for tags that a profile does not know about.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Default limit on template nesting.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default limit on input length, in bytes.
pub const DEFAULT_MAX_INPUT_LEN: usize = 4096;

const EMV_MPM_NAMES: [(&str, &str); 15] = [
    ("00", "Payload Format Indicator"),
    ("01", "Point of Initiation Method"),
    ("26", "Merchant Account Information"),
    ("30", "Merchant Account Information"),
    ("51", "Merchant Account Information"),
    ("52", "Merchant Category Code"),
    ("53", "Transaction Currency"),
    ("54", "Transaction Amount"),
    ("58", "Country Code"),
    ("59", "Merchant Name"),
    ("60", "Merchant City"),
    ("61", "Postal Code"),
    ("62", "Additional Data Field Template"),
    ("63", "CRC"),
    ("80", "Unreserved Templates"),
];

const EMV_MPM_CONTAINERS: [&str; 3] = ["26", "30", "51"];

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Tags whose values are decoded as nested TLV, at any level.
    pub container_tags: HashSet<String>,
    /// Child tags decoded as nested TLV only inside the template keyed here.
    pub template_containers: HashMap<String, HashSet<String>>,
    /// Names of top-level tags.
    pub names: HashMap<String, String>,
    /// Names of child tags, keyed by the tag of the template containing them.
    pub template_names: HashMap<String, HashMap<String, String>>,
    /// Maximum template nesting. The top level is depth 0.
    pub max_depth: usize,
    /// Maximum input length in bytes, if any.
    pub max_input_len: Option<usize>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::emv_mpm()
    }
}

impl Profile {
    /// A profile that knows no tags and has no templates.
    pub fn empty() -> Self {
        Self {
            container_tags: HashSet::new(),
            template_containers: HashMap::new(),
            names: HashMap::new(),
            template_names: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: Some(DEFAULT_MAX_INPUT_LEN),
        }
    }

    /// The merchant-presented mode profile.
    ///
    /// Tags `26`, `30` and `51` are templates; names of their children are
    /// not known, so they are reported as [UNKNOWN_NAME].
    pub fn emv_mpm() -> Self {
        let mut profile = Self::empty();
        for (tag, name) in EMV_MPM_NAMES {
            profile.names.insert(tag.to_string(), name.to_string());
        }
        for tag in 81..=99 {
            profile
                .names
                .insert(tag.to_string(), "Unreserved Templates".to_string());
        }
        for tag in EMV_MPM_CONTAINERS {
            profile.container_tags.insert(tag.to_string());
        }
        profile
    }

    /// Loads a profile from CSV rows of `tag,name[,container]`.
    ///
    /// The loaded profile uses the default depth and length limits.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, ProfileError> {
        let mut profile = Self::empty();

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        for result in reader.byte_records() {
            let record = result?;
            if record.is_empty() || record[0].is_empty() {
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let tag_field = String::from_utf8_lossy(&record[0]).to_string();
            let name = match record.get(1) {
                Some(n) => String::from_utf8_lossy(n).to_string(),
                None => UNKNOWN_NAME.to_string(),
            };

            let container = match record.get(2) {
                None | Some(b"") | Some(b"leaf") | Some(b"no") | Some(b"0") => false,
                Some(b"container") | Some(b"yes") | Some(b"1") => true,
                Some(other) => {
                    return Err(ProfileError::InvalidContainerFlag(
                        String::from_utf8_lossy(other).to_string(),
                        line,
                    ));
                }
            };

            match tag_field.split_once('/') {
                Some((parent, child)) => {
                    if !is_tag(parent) || !is_tag(child) {
                        return Err(ProfileError::InvalidTag(tag_field, line));
                    }
                    profile
                        .template_names
                        .entry(parent.to_string())
                        .or_default()
                        .insert(child.to_string(), name);
                    if container {
                        profile
                            .template_containers
                            .entry(parent.to_string())
                            .or_default()
                            .insert(child.to_string());
                    }
                }
                None => {
                    if !is_tag(&tag_field) {
                        return Err(ProfileError::InvalidTag(tag_field, line));
                    }
                    if container {
                        profile.container_tags.insert(tag_field.clone());
                    }
                    profile.names.insert(tag_field, name);
                }
            }
        }

        Ok(profile)
    }

    /// Whether values of `tag` are decoded as nested TLV.
    ///
    /// `parent` is the tag of the enclosing template, or `None` at the top
    /// level.
    pub fn is_container(&self, parent: Option<&str>, tag: &str) -> bool {
        if self.container_tags.contains(tag) {
            return true;
        }
        parent
            .and_then(|p| self.template_containers.get(p))
            .is_some_and(|tags| tags.contains(tag))
    }

    /// Resolves the name of `tag`.
    ///
    /// `parent` is the tag of the enclosing template, or `None` at the top
    /// level.
    pub fn name_of(&self, parent: Option<&str>, tag: &str) -> &str {
        let table = match parent {
            Some(p) => self.template_names.get(p),
            None => Some(&self.names),
        };
        table
            .and_then(|t| t.get(tag))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_NAME)
    }
}

fn is_tag(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emv_mpm_names() {
        let profile = Profile::emv_mpm();
        assert_eq!(profile.name_of(None, "00"), "Payload Format Indicator");
        assert_eq!(profile.name_of(None, "30"), "Merchant Account Information");
        assert_eq!(profile.name_of(None, "63"), "CRC");
        assert_eq!(profile.name_of(None, "95"), "Unreserved Templates");
        assert_eq!(profile.name_of(None, "77"), UNKNOWN_NAME);
        assert_eq!(profile.name_of(Some("30"), "00"), UNKNOWN_NAME);
    }

    #[test]
    fn test_emv_mpm_containers() {
        let profile = Profile::emv_mpm();
        for tag in ["26", "30", "51"] {
            assert!(profile.is_container(None, tag));
            assert!(profile.is_container(Some("26"), tag));
        }
        assert!(!profile.is_container(None, "62"));
        assert!(!profile.is_container(None, "00"));
    }

    #[test]
    fn test_from_csv() {
        let csv = "\
# tag,name,container
00,Payload Format Indicator
62,Additional Data Field Template,container
62/05,Reference Label
62/50,Payment System Specific,yes
";
        let profile = Profile::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(profile.name_of(None, "00"), "Payload Format Indicator");
        assert_eq!(profile.name_of(Some("62"), "05"), "Reference Label");
        assert_eq!(profile.name_of(Some("26"), "05"), UNKNOWN_NAME);
        assert!(profile.is_container(None, "62"));
        assert!(profile.is_container(Some("62"), "50"));
        assert!(!profile.is_container(None, "50"));
        assert!(!profile.is_container(Some("26"), "50"));
        assert!(!profile.is_container(None, "26"));
        assert_eq!(profile.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_from_csv_rejects_bad_rows() {
        match Profile::from_csv("0A,Bad".as_bytes()) {
            Err(ProfileError::InvalidTag(tag, 1)) => assert_eq!(tag, "0A"),
            other => panic!("unexpected result: {:?}", other),
        }
        match Profile::from_csv("00,Name\n26,MAI,maybe".as_bytes()) {
            Err(ProfileError::InvalidContainerFlag(flag, 2)) => assert_eq!(flag, "maybe"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_child_container_stays_scoped() {
        let csv = "\
62,Additional Data Field Template,container
62/05,Reference Label,container
";
        let profile = Profile::from_csv(csv.as_bytes()).unwrap();

        let document = crate::decoder::decode_with("0504ABCD", &profile).unwrap();
        assert_eq!(document.get("05").unwrap().as_str(), Some("ABCD"));

        let document = crate::decoder::decode_with("621205080004ABCD", &profile).unwrap();
        let label = document
            .get("62")
            .and_then(|f| f.as_document())
            .and_then(|d| d.get("05"))
            .unwrap();
        assert_eq!(label.name, "Reference Label");
        let inner = label.as_document().unwrap();
        assert_eq!(inner.get("00").unwrap().as_str(), Some("ABCD"));
    }
}
