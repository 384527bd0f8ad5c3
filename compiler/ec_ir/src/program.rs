//! The line table.
//!
//! A [`Program`] is the source split into lines, each with its command word
//! already resolved. Lines are addressed by 0-based index; diagnostics add one.

use crate::Keyword;

/// What the first word of a line turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineHead {
    /// Empty or whitespace-only.
    Blank,
    /// Starts with `#` or `//` after leading whitespace.
    Comment,
    Keyword(Keyword),
    /// A first word that is not a command, kept verbatim for the error.
    Unknown(String),
}

/// One line of source with its head resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    text: String,
    head: LineHead,
    args: String,
}

impl SourceLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();

        let (head, args) = if trimmed.is_empty() {
            (LineHead::Blank, String::new())
        } else if trimmed.starts_with('#') || trimmed.starts_with("//") {
            (LineHead::Comment, String::new())
        } else {
            let (word, rest) = trimmed
                .split_once(char::is_whitespace)
                .unwrap_or((trimmed, ""));
            let head = match Keyword::from_word(word) {
                Some(keyword) => LineHead::Keyword(keyword),
                None => LineHead::Unknown(word.to_string()),
            };
            (head, rest.trim().to_string())
        };

        SourceLine { text, head, args }
    }

    /// The raw line, without its terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn head(&self) -> &LineHead {
        &self.head
    }

    /// Everything after the command word, trimmed.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// The resolved keyword, if the line has one.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.head {
            LineHead::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}

/// An immutable sequence of source lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<SourceLine>,
}

impl Program {
    /// Split source text on line terminators (`\n` or `\r\n`).
    pub fn parse(source: &str) -> Self {
        Program {
            lines: source.lines().map(SourceLine::new).collect(),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Program {
            lines: lines.into_iter().map(SourceLine::new).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn line(&self, index: usize) -> Option<&SourceLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Keyword of the line at `index`, `None` for anything else.
    #[inline]
    pub fn keyword_at(&self, index: usize) -> Option<Keyword> {
        self.lines.get(index).and_then(SourceLine::keyword)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn heads_are_resolved() {
        let program = Program::parse("  out \"hi\"  \r\n\n# note\n// also\nprint 1\nENDLOOP");
        let heads: Vec<_> = program.lines().iter().map(|l| l.head().clone()).collect();
        assert_eq!(
            heads,
            vec![
                LineHead::Keyword(Keyword::Out),
                LineHead::Blank,
                LineHead::Comment,
                LineHead::Comment,
                LineHead::Unknown("print".to_string()),
                LineHead::Keyword(Keyword::EndLoop),
            ]
        );
        assert_eq!(program.line(0).map(SourceLine::args), Some("\"hi\""));
        assert_eq!(program.line(0).map(SourceLine::text), Some("  out \"hi\"  "));
    }

    #[test]
    fn tabs_separate_the_command_word() {
        let line = SourceLine::new("SET\tx   5");
        assert_eq!(line.keyword(), Some(Keyword::Set));
        assert_eq!(line.args(), "x   5");
    }

    #[test]
    fn empty_source_has_no_lines() {
        assert!(Program::parse("").is_empty());
        assert_eq!(Program::parse("OUT 1\n").len(), 1);
    }
}
