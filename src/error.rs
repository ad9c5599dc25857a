//! Error types shared by the line codecs, and a wrapper attaching a source position.

use thiserror::Error;

use crate::{reader::LineSource, storyboard::trigger::UnknownTriggerNameError};

/// A failure while decoding a line.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Too few comma-separated fields for the grammar, or an indentation that has no
    /// container to nest under.
    #[error("malformed line: {0}")]
    MalformedLine(String),
    /// A command line started with an unrecognized tag.
    #[error("unknown command type `{0}`")]
    UnknownCommandType(String),
    /// An object line started with an unrecognized event type.
    #[error("unknown event type `{0}`")]
    UnknownEventType(String),
    /// The trigger name of a `T` command could not be decoded.
    #[error(transparent)]
    UnknownTriggerName(#[from] UnknownTriggerNameError),
    /// A field did not hold a value of the expected kind.
    #[error("invalid {field} `{value}`")]
    InvalidFieldValue {
        /// What the field holds, such as `"time"` or `"easing"`.
        field: &'static str,
        /// The offending text.
        value: String,
    },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedLine(reason.into())
    }

    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        Self::InvalidFieldValue {
            field,
            value: value.to_owned(),
        }
    }
}

/// A state that has no representation in the target text grammar.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializationError {
    /// NaN and infinities cannot be written as numbers.
    #[error("non-finite number {0}")]
    NonFiniteNumber(f64),
    /// A path containing a double quote, a comma outside quotes, or a line break.
    #[error("path `{0}` cannot be written to a line")]
    UnrepresentablePath(String),
    /// Slider edge samples only carry a sample set and an addition set.
    #[error("slider edge sample cannot carry index {index}, volume {volume} or file `{filename}`")]
    EdgeSampleExtras {
        /// The custom sample index.
        index: u32,
        /// The sample volume.
        volume: u32,
        /// The custom sample file.
        filename: String,
    },
}

/// A value paired with the line it came from.
///
/// `line` is 1-based. `start` and `end` are byte offsets of the whole line in the source
/// text, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Positioned<T> {
    content: T,
    line: usize,
    start: usize,
    end: usize,
}

impl<T> Positioned<T> {
    /// Attaches a position.
    pub const fn new(content: T, line: usize, start: usize, end: usize) -> Self {
        Self {
            content,
            line,
            start,
            end,
        }
    }

    /// Attaches the position of the line `source` returned last.
    pub fn at<'a>(content: T, source: &impl LineSource<'a>) -> Self {
        let range = source.line_range();
        Self::new(content, source.line_number(), range.start, range.end)
    }

    /// Returns the wrapped content.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Takes the content out of the wrapper.
    pub fn into_content(self) -> T {
        self.content
    }

    /// The 1-based line number.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the source span as `start..end`.
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Maps the content, keeping the position.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Positioned<U> {
        Positioned::new(f(self.content), self.line, self.start, self.end)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Positioned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.content, self.line)
    }
}

impl<T: std::error::Error + 'static> std::error::Error for Positioned<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// Result of the section parsers.
pub type ParseResult<T> = Result<T, Positioned<ParseError>>;
