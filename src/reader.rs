//! Line-oriented reading of beatmap and storyboard text.
//!
//! Parsers pull lines through [`LineSource`], which skips `//` comment lines, strips line
//! endings, and can un-read exactly one line. [`TextReader`] implements it over an
//! in-memory string.

use std::{borrow::Cow, ops::Range};

/// A forward-only line cursor with one line of pushback.
pub trait LineSource<'a> {
    /// Returns the next line that is not a comment, without its line ending, or `None` at
    /// the end of input. Empty lines are returned as `""`: they end a section.
    fn read_line(&mut self) -> Option<&'a str>;

    /// Makes the next [`LineSource::read_line`] return the last line again. Only one line
    /// can be pushed back.
    fn pushback(&mut self);

    /// Replaces `$name` tokens by their values.
    fn substitute_variables(&self, line: &'a str) -> Cow<'a, str>;

    /// 1-based number of the last line returned, or 0 before the first read.
    fn line_number(&self) -> usize;

    /// Byte range of the last line returned.
    fn line_range(&self) -> Range<usize>;
}

/// `$name=value` definitions from a `[Variables]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variables {
    /// Names include the leading `$`, in definition order.
    entries: Vec<(String, String)>,
}

impl Variables {
    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Splits a `$name=value` line. Returns `None` for anything else.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<(&str, &str)> {
        let (name, value) = line.trim().split_once('=')?;
        (name.len() > 1 && name.starts_with('$')).then_some((name, value))
    }

    /// Defines or redefines a variable. `name` includes the leading `$`.
    pub fn insert(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            value.clone_into(&mut entry.1);
        } else {
            self.entries.push((name.to_owned(), value.to_owned()));
        }
    }

    /// Looks up a value by name, including the leading `$`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no variable is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Definitions in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Replaces every defined `$name` in `line`. Longer names are replaced first, so
    /// `$ab` is not clobbered by `$a`.
    #[must_use]
    pub fn substitute<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if self.entries.is_empty() || !line.contains('$') {
            return Cow::Borrowed(line);
        }
        let mut names: Vec<_> = self.entries.iter().collect();
        names.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
        let mut ret = Cow::Borrowed(line);
        for (name, value) in names {
            if ret.contains(name.as_str()) {
                ret = Cow::Owned(ret.replace(name.as_str(), value));
            }
        }
        ret
    }
}

/// A [`LineSource`] over a string.
///
/// ```
/// use osu_fmt::reader::{LineSource, TextReader};
///
/// let mut reader = TextReader::new("// comment\nSprite,Foreground\r\n F,0,0,100,1\n");
/// assert_eq!(reader.read_line(), Some("Sprite,Foreground"));
/// assert_eq!(reader.line_number(), 2);
/// assert_eq!(reader.read_line(), Some(" F,0,0,100,1"));
/// reader.pushback();
/// assert_eq!(reader.read_line(), Some(" F,0,0,100,1"));
/// assert_eq!(reader.read_line(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TextReader<'a> {
    source: &'a str,
    /// Byte offset of the next unread line.
    offset: usize,
    /// Lines consumed so far, comments included.
    consumed: usize,
    last: Option<LastLine<'a>>,
    pushed_back: bool,
    variables: Variables,
}

#[derive(Debug, Clone)]
struct LastLine<'a> {
    text: &'a str,
    number: usize,
    range: Range<usize>,
}

impl<'a> TextReader<'a> {
    /// Starts reading `source` from the beginning. A leading byte order mark is skipped.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let offset = if source.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        Self {
            source,
            offset,
            consumed: 0,
            last: None,
            pushed_back: false,
            variables: Variables::new(),
        }
    }

    /// The variable table used by [`LineSource::substitute_variables`].
    #[must_use]
    pub const fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Mutable access to the variable table, filled while a `[Variables]` section is read.
    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    fn next_physical_line(&mut self) -> Option<(&'a str, Range<usize>)> {
        let rest = self.source.get(self.offset..).filter(|rest| !rest.is_empty())?;
        let start = self.offset;
        let (raw, advance) = match rest.find('\n') {
            Some(newline) => (rest.get(..newline)?, newline + 1),
            None => (rest, rest.len()),
        };
        self.offset += advance;
        self.consumed += 1;
        let text = raw.trim_end_matches('\r');
        Some((text, start..start + text.len()))
    }
}

impl<'a> LineSource<'a> for TextReader<'a> {
    fn read_line(&mut self) -> Option<&'a str> {
        if self.pushed_back {
            self.pushed_back = false;
            return self.last.as_ref().map(|last| last.text);
        }
        loop {
            let (text, range) = self.next_physical_line()?;
            if text.trim_start().starts_with("//") {
                continue;
            }
            let text = text.trim_end();
            self.last = Some(LastLine {
                text,
                number: self.consumed,
                range: range.start..range.start + text.len(),
            });
            return Some(text);
        }
    }

    fn pushback(&mut self) {
        if self.last.is_some() {
            self.pushed_back = true;
        }
    }

    fn substitute_variables(&self, line: &'a str) -> Cow<'a, str> {
        self.variables.substitute(line)
    }

    fn line_number(&self) -> usize {
        self.last.as_ref().map_or(0, |last| last.number)
    }

    fn line_range(&self) -> Range<usize> {
        self.last
            .as_ref()
            .map_or(self.offset..self.offset, |last| last.range.clone())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn skips_comments_and_keeps_blank_lines() {
        let mut reader = TextReader::new("a\r\n//x\n  // y\n\nb");
        assert_eq!(reader.read_line(), Some("a"));
        assert_eq!(reader.read_line(), Some(""));
        assert_eq!(reader.line_number(), 4);
        assert_eq!(reader.read_line(), Some("b"));
        assert_eq!(reader.line_range(), 15..16);
        assert_eq!(reader.read_line(), None);
        assert_eq!(reader.read_line(), None);
    }

    #[test]
    fn single_pushback() {
        let mut reader = TextReader::new("a\nb\n");
        reader.pushback();
        assert_eq!(reader.read_line(), Some("a"));
        assert_eq!(reader.read_line(), Some("b"));
        reader.pushback();
        reader.pushback();
        assert_eq!(reader.read_line(), Some("b"));
        assert_eq!(reader.line_number(), 2);
        assert_eq!(reader.read_line(), None);
    }

    #[test]
    fn byte_order_mark() {
        let mut reader = TextReader::new("\u{feff}osu file format v14");
        assert_eq!(reader.read_line(), Some("osu file format v14"));
        assert_eq!(reader.line_range(), 3..22);
    }

    #[test]
    fn longest_variable_first() {
        let mut vars = Variables::new();
        vars.insert("$a", "1");
        vars.insert("$ab", "2");
        assert_eq!(vars.substitute("F,0,$a,$ab"), "F,0,1,2");
        assert!(matches!(vars.substitute("F,0,0,1"), Cow::Borrowed(_)));
        vars.insert("$a", "3");
        assert_eq!(vars.get("$a"), Some("3"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn variable_lines() {
        assert_eq!(Variables::parse_line("$pos=320,240"), Some(("$pos", "320,240")));
        assert_eq!(Variables::parse_line("pos=1"), None);
        assert_eq!(Variables::parse_line("$=1"), None);
    }
}
