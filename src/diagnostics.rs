//! Fancy diagnostics support using `ariadne`.
//!
//! Errors wrapped in [`Positioned`] carry the byte range of the offending line, so they
//! convert to `ariadne::Report` directly and ariadne works out rows and columns.
//!
//! # Usage Example
//!
//! ```rust
//! use osu_fmt::{config::ParseConfig, diagnostics::emit_parse_error, storyboard::Storyboard};
//!
//! let source = "[Events]\nSprite,Pass,Centre,\"a.png\",0,0\n Z,0,0,100,1\n";
//! if let Err(error) = Storyboard::parse(source, &ParseConfig::default()) {
//!     emit_parse_error("storyboard.osb", source, &error);
//! }
//! ```

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::error::{ParseError, Positioned};

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use osu_fmt::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("map.osb", "[Events]\n");
/// assert_eq!(source.name(), "map.osb");
/// assert_eq!(source.text(), "[Events]\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for Positioned<ParseError> {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let title = match self.content() {
            ParseError::MalformedLine(_) => "malformed line",
            ParseError::UnknownCommandType(_) => "unknown command",
            ParseError::UnknownEventType(_) => "unknown event",
            ParseError::UnknownTriggerName(_) => "unknown trigger",
            ParseError::InvalidFieldValue { .. } => "invalid value",
        };
        build_report(
            src,
            ReportKind::Error,
            self.range(),
            title,
            self.content(),
            Color::Red,
        )
    }
}

/// Prints a parse error with the offending line highlighted.
pub fn emit_parse_error(name: &str, source: &str, error: &Positioned<ParseError>) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}

/// Collect `ariadne::Report` instances for parse errors without printing.
#[must_use]
pub fn collect_reports<'a>(
    name: &'a str,
    source: &'a str,
    errors: impl IntoIterator<Item = &'a Positioned<ParseError>>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    errors.into_iter().map(|e| e.to_report(&simple)).collect()
}
