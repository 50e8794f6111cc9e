// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Editing operations on the query input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Text of the query input plus a cursor counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuffer {
    text: String,
    cursor: usize,
}

impl QueryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Appends a term, joined by `connective` when the buffer already has text.
    pub fn append_term(&mut self, term: &str, connective: &str) {
        if !self.text.is_empty() {
            self.text.push_str(connective);
        }
        self.text.push_str(term);
        self.cursor = self.len_chars();
    }

    pub fn apply(&mut self, edit: QueryEdit) {
        match edit {
            QueryEdit::Insert(ch) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
            }
            QueryEdit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            QueryEdit::Delete => {
                if self.cursor < self.len_chars() {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            QueryEdit::Left => self.cursor = self.cursor.saturating_sub(1),
            QueryEdit::Right => self.cursor = (self.cursor + 1).min(self.len_chars()),
            QueryEdit::Home => self.cursor = 0,
            QueryEdit::End => self.cursor = self.len_chars(),
        }
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }
}
