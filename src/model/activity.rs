// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Record of label texts the user inserted into the query from image label buttons.
//!
//! Wire form is a sequence of `text:id|` entries. The backend receives it alongside text queries
//! to attribute query terms to the images they were copied from. A `|` or `\` inside the text is
//! written with a leading `\`.

use std::fmt::{self, Write as _};

use memchr::memchr2_iter;

use super::ImageId;

const ENTRY_TERMINATOR: u8 = b'|';
const ESCAPE: u8 = b'\\';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub text: String,
    pub source: ImageId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, text: impl Into<String>, source: ImageId) {
        self.entries.push(ActivityEntry {
            text: text.into(),
            source,
        });
    }

    /// Parses the wire form. Segments without a parseable `:id` suffix are skipped.
    ///
    /// The text part may itself contain `:`; the id is taken after the last one. A trailing
    /// escape with nothing after it is dropped.
    pub fn parse(raw: &str) -> Self {
        let bytes = raw.as_bytes();
        let mut entries = Vec::new();
        let mut segment = String::new();
        let mut copied = 0usize;

        for pos in memchr2_iter(ESCAPE, ENTRY_TERMINATOR, bytes) {
            if pos < copied {
                // taken literally by the preceding escape
                continue;
            }
            segment.push_str(&raw[copied..pos]);
            if bytes[pos] == ESCAPE {
                match raw[pos + 1..].chars().next() {
                    Some(ch) => {
                        segment.push(ch);
                        copied = pos + 1 + ch.len_utf8();
                    }
                    None => copied = pos + 1,
                }
            } else {
                push_segment(&mut entries, &segment);
                segment.clear();
                copied = pos + 1;
            }
        }
        segment.push_str(&raw[copied..]);
        push_segment(&mut entries, &segment);

        Self { entries }
    }
}

fn push_segment(entries: &mut Vec<ActivityEntry>, segment: &str) {
    let Some((text, id)) = segment.rsplit_once(':') else {
        return;
    };
    let Ok(source) = id.parse::<ImageId>() else {
        return;
    };
    entries.push(ActivityEntry {
        text: text.to_owned(),
        source,
    });
}

impl fmt::Display for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            for ch in entry.text.chars() {
                if ch == char::from(ESCAPE) || ch == char::from(ENTRY_TERMINATOR) {
                    f.write_char(char::from(ESCAPE))?;
                }
                f.write_char(ch)?;
            }
            write!(f, ":{}|", entry.source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityLog;
    use crate::model::ImageId;

    #[test]
    fn display_terminates_every_entry() {
        let mut log = ActivityLog::new();
        log.push("dog", ImageId::new(5));
        log.push("beach", ImageId::new(17));
        assert_eq!(log.to_string(), "dog:5|beach:17|");
    }

    #[test]
    fn parse_reads_entries_in_order() {
        let log = ActivityLog::parse("dog:5|beach:17|");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].text, "dog");
        assert_eq!(log.entries()[0].source, ImageId::new(5));
        assert_eq!(log.entries()[1].text, "beach");
        assert_eq!(log.entries()[1].source, ImageId::new(17));
    }

    #[test]
    fn parse_keeps_colons_inside_text() {
        let log = ActivityLog::parse("time: noon:3|");
        assert_eq!(log.entries()[0].text, "time: noon");
        assert_eq!(log.entries()[0].source, ImageId::new(3));
    }

    #[test]
    fn parse_skips_malformed_segments_and_tolerates_missing_terminator() {
        let log = ActivityLog::parse("||junk|cat:x|tree:9");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].text, "tree");
    }

    #[test]
    fn terminator_and_escape_in_text_survive_display_and_parse() {
        let mut log = ActivityLog::new();
        log.push("sea|lion", ImageId::new(4));
        log.push(r"back\slash", ImageId::new(6));
        assert_eq!(log.to_string(), r"sea\|lion:4|back\\slash:6|");

        let parsed = ActivityLog::parse(&log.to_string());
        assert_eq!(parsed, log);
    }

    #[test]
    fn dangling_escape_is_dropped() {
        let log = ActivityLog::parse(r"fish:2|cat\");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].text, "fish");
    }

    #[test]
    fn empty_input_is_empty_log() {
        assert!(ActivityLog::parse("").is_empty());
        assert_eq!(ActivityLog::new().to_string(), "");
    }
}
