//! Iterator that drives [`crate::parse_tl_file`].

use std::str::FromStr;

use crate::errors::{LineError, ParseError};
use crate::tl::{Category, Definition};

pub(crate) struct TlIterator<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    /// Current category context. Flips on `---functions---` / `---types---`.
    category: Category,
    /// Accumulates multi-line definitions (lines without `;` terminator).
    pending: String,
    /// 1-based line where `pending` started.
    pending_line: usize,
    /// Set once an error was yielded; parsing never resumes after one.
    failed: bool,
}

impl<'a> TlIterator<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines().enumerate(),
            category: Category::Types,
            pending: String::new(),
            pending_line: 0,
            failed: false,
        }
    }

    fn handle_separator(&mut self, line: &str) -> bool {
        match line {
            "---functions---" => { self.category = Category::Functions; true }
            "---types---"     => { self.category = Category::Types;     true }
            _ => false,
        }
    }

    fn fail(&mut self, line: usize, content: String, error: ParseError) -> Option<Result<Definition, LineError>> {
        self.failed = true;
        Some(Err(LineError { line, content, error }))
    }
}

impl Iterator for TlIterator<'_> {
    type Item = Result<Definition, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let Some((index, line)) = self.lines.next() else {
                // A definition left open at end of input is malformed.
                if self.pending.trim().is_empty() {
                    return None;
                }
                let content = std::mem::take(&mut self.pending).trim().to_owned();
                return self.fail(self.pending_line, content, ParseError::Unterminated);
            };

            // Inline `//` comments are stripped along with whole-line ones.
            let trimmed = match line.find("//") {
                Some(pos) => line[..pos].trim(),
                None => line.trim(),
            };

            if trimmed.is_empty() {
                continue;
            }

            if self.pending.is_empty() && self.handle_separator(trimmed) {
                continue;
            }

            if self.pending.is_empty() {
                self.pending_line = index + 1;
            } else {
                self.pending.push(' ');
            }
            self.pending.push_str(trimmed);

            if !trimmed.ends_with(';') {
                continue;
            }

            let raw = std::mem::take(&mut self.pending);
            let raw = raw.trim();

            return match Definition::from_str(raw) {
                Ok(mut def) => {
                    def.category = self.category;
                    def.source = Some(raw.to_owned());
                    Some(Ok(def))
                }
                Err(error) => self.fail(self.pending_line, raw.to_owned(), error),
            };
        }
    }
}
