//! Options for parsing and rendering.

/// The newest `osu file format vN` version.
pub const LATEST_FORMAT_VERSION: u32 = 14;

/// Files older than format version 5 store times 24 ms early.
pub const LEGACY_TIME_OFFSET: i32 = 24;

const fn time_offset(format_version: u32) -> i32 {
    if format_version < 5 {
        LEGACY_TIME_OFFSET
    } else {
        0
    }
}

/// Options for the line parsers.
///
/// ```
/// use osu_fmt::config::ParseConfig;
///
/// let config = ParseConfig::default().format_version(4);
/// assert_eq!(config.time_offset(), 24);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseConfig {
    /// Version of the file being read, used for the legacy time offset.
    pub format_version: u32,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            format_version: LATEST_FORMAT_VERSION,
        }
    }
}

impl ParseConfig {
    /// Sets the file format version.
    #[must_use]
    pub const fn format_version(mut self, version: u32) -> Self {
        self.format_version = version;
        self
    }

    /// Milliseconds added to every absolute time read.
    #[must_use]
    pub const fn time_offset(&self) -> i32 {
        time_offset(self.format_version)
    }
}

/// Character repeated once per nesting depth before a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Indent {
    /// `' '`, what the game writes.
    #[default]
    Space,
    /// `'_'`, common in hand-written scripts.
    Underscore,
}

impl Indent {
    /// The marker character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Space => ' ',
            Self::Underscore => '_',
        }
    }
}

/// Options for the line renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderConfig {
    /// Version of the file being written, used for the legacy time offset.
    pub format_version: u32,
    /// Indentation marker for commands.
    pub indent: Indent,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format_version: LATEST_FORMAT_VERSION,
            indent: Indent::Space,
        }
    }
}

impl RenderConfig {
    /// Sets the file format version.
    #[must_use]
    pub const fn format_version(mut self, version: u32) -> Self {
        self.format_version = version;
        self
    }

    /// Sets the indentation marker.
    #[must_use]
    pub const fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Milliseconds subtracted from every absolute time written.
    #[must_use]
    pub const fn time_offset(&self) -> i32 {
        time_offset(self.format_version)
    }

    pub(crate) fn indentation(&self, depth: usize) -> String {
        std::iter::repeat_n(self.indent.as_char(), depth).collect()
    }
}
