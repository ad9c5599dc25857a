//! Whole `.osu` beatmap files.
//!
//! A beatmap starts with an `osu file format vN` line followed by bracketed sections:
//!
//! ```text
//! osu file format v14
//!
//! [General]
//! AudioFilename: audio.mp3
//!
//! [Metadata]
//! Title:Lanterns
//!
//! [TimingPoints]
//! 0,500,4,2,0,80,1,0
//!
//! [HitObjects]
//! 256,192,1000,5,0,0:0:0:0:
//! ```
//!
//! The `key: value` sections live in `sections`. `[Events]` reuses the storyboard
//! reader, and `[TimingPoints]` and `[HitObjects]` the line codecs of [`crate::timing`]
//! and [`crate::hit_object`]. The format version of the header decides the legacy time
//! offset of every timed line.

use std::fmt::Write as _;

pub mod sections;

pub use self::sections::{
    Colours, Countdown, Difficulty, Editor, General, KeyValueSection, Metadata,
    OverlayPosition,
};
use crate::{
    config::{LATEST_FORMAT_VERSION, ParseConfig, RenderConfig},
    error::{ParseError, ParseResult, Positioned, SerializationError},
    hit_object::HitObject,
    reader::{LineSource, TextReader, Variables},
    storyboard::{
        FORMAT_HEADER, StoryboardObject, parse_events, read_variables, write_events,
        write_variables,
    },
    timing::TimingPoint,
    util::parse_int,
};

/// A whole beatmap file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beatmap {
    /// Version from the `osu file format v` header. It takes precedence over the
    /// configured version, both when parsing and when rendering.
    pub format_version: u32,
    #[allow(missing_docs)]
    pub general: General,
    #[allow(missing_docs)]
    pub editor: Editor,
    #[allow(missing_docs)]
    pub metadata: Metadata,
    #[allow(missing_docs)]
    pub difficulty: Difficulty,
    /// Definitions of a `[Variables]` section, rare outside `.osb` files.
    pub variables: Variables,
    /// Objects of the `[Events]` section in file order.
    pub events: Vec<StoryboardObject>,
    /// Timing points in file order.
    pub timing_points: Vec<TimingPoint>,
    #[allow(missing_docs)]
    pub colours: Colours,
    /// Hit objects in file order.
    pub hit_objects: Vec<HitObject>,
}

impl Default for Beatmap {
    fn default() -> Self {
        Self {
            format_version: LATEST_FORMAT_VERSION,
            general: General::default(),
            editor: Editor::default(),
            metadata: Metadata::default(),
            difficulty: Difficulty::default(),
            variables: Variables::default(),
            events: vec![],
            timing_points: vec![],
            colours: Colours::default(),
            hit_objects: vec![],
        }
    }
}

impl Beatmap {
    /// Parses a `.osu` file. Unknown sections and unknown keys are skipped.
    ///
    /// ```
    /// use osu_fmt::{beatmap::Beatmap, config::ParseConfig, hit_object::HitObjectParams};
    ///
    /// let source = "osu file format v14\n\n[Metadata]\nTitle:Lanterns\n\n[HitObjects]\n256,192,1000,12,0,2000,0:0:0:0:\n";
    /// let beatmap = Beatmap::parse(source, &ParseConfig::default()).unwrap();
    /// assert_eq!(beatmap.metadata.title, "Lanterns");
    /// assert_eq!(beatmap.hit_objects[0].params, HitObjectParams::Spinner { end_time: 2000 });
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] when the file does not start with a format
    /// header or a section line has no `key: value` form, and otherwise the first error
    /// of a line codec. Every error carries the position of the offending line.
    pub fn parse(source: &str, config: &ParseConfig) -> ParseResult<Self> {
        let mut reader = TextReader::new(source);
        let format_version = read_header(&mut reader)?;
        let config = config.format_version(format_version);
        let mut beatmap = Self {
            format_version,
            ..Self::default()
        };
        while let Some(line) = reader.read_line() {
            match line.trim() {
                "[General]" => read_pairs(&mut reader, &mut beatmap.general)?,
                "[Editor]" => read_pairs(&mut reader, &mut beatmap.editor)?,
                "[Metadata]" => read_pairs(&mut reader, &mut beatmap.metadata)?,
                "[Difficulty]" => read_pairs(&mut reader, &mut beatmap.difficulty)?,
                "[Colours]" => read_pairs(&mut reader, &mut beatmap.colours)?,
                "[Variables]" => read_variables(&mut reader),
                "[Events]" => beatmap.events.extend(parse_events(&mut reader, &config)?),
                "[TimingPoints]" => beatmap
                    .timing_points
                    .extend(read_lines(&mut reader, |line| TimingPoint::parse(line, &config))?),
                "[HitObjects]" => beatmap
                    .hit_objects
                    .extend(read_lines(&mut reader, |line| HitObject::parse(line, &config))?),
                section if section.starts_with('[') => {
                    log::debug!("skipping section {section}");
                }
                _ => {}
            }
        }
        beatmap.variables = reader.variables().clone();
        log::debug!(
            "parsed beatmap v{format_version}: {} timing points, {} hit objects",
            beatmap.timing_points.len(),
            beatmap.hit_objects.len()
        );
        Ok(beatmap)
    }

    /// Writes the file: the header, `[General]`, `[Editor]`, `[Metadata]`,
    /// `[Difficulty]`, `[Variables]` when any, `[Events]`, `[TimingPoints]`, `[Colours]`
    /// when any colour is set, and `[HitObjects]`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] when any value has no textual form.
    pub fn render(&self, config: &RenderConfig) -> Result<String, SerializationError> {
        let config = config.format_version(self.format_version);
        let mut out = format!("{FORMAT_HEADER}{}\n\n", self.format_version);
        write_section(&mut out, &self.general)?;
        write_section(&mut out, &self.editor)?;
        write_section(&mut out, &self.metadata)?;
        write_section(&mut out, &self.difficulty)?;
        write_variables(&mut out, &self.variables);
        write_events(&mut out, &self.events, &config)?;
        out.push_str("\n[TimingPoints]\n");
        for point in &self.timing_points {
            out.push_str(&point.render(&config)?);
            out.push('\n');
        }
        out.push('\n');
        if !self.colours.is_empty() {
            write_section(&mut out, &self.colours)?;
        }
        out.push_str("[HitObjects]\n");
        for object in &self.hit_objects {
            out.push_str(&object.render(&config)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Reads the format version from the first non-empty line.
fn read_header(reader: &mut TextReader<'_>) -> ParseResult<u32> {
    while let Some(line) = reader.read_line() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(version) = line.strip_prefix(FORMAT_HEADER) else {
            break;
        };
        return parse_int(version, "format version").map_err(|e| Positioned::at(e, &*reader));
    }
    Err(Positioned::at(
        ParseError::malformed(format!("expected a `{FORMAT_HEADER}N` header")),
        &*reader,
    ))
}

/// Reads `key: value` lines until an empty line or the next section.
fn read_pairs<S: KeyValueSection>(reader: &mut TextReader<'_>, section: &mut S) -> ParseResult<()> {
    while let Some(line) = reader.read_line() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with('[') {
            reader.pushback();
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            let reason = format!("expected `key: value` in [{}]", S::NAME);
            return Err(Positioned::at(ParseError::malformed(reason), &*reader));
        };
        let key = key.trim();
        let known = section
            .set(key, value.trim())
            .map_err(|e| Positioned::at(e, &*reader))?;
        if !known {
            log::debug!("ignoring unknown key {key} at line {}", reader.line_number());
        }
    }
    Ok(())
}

/// Reads and decodes lines until an empty line or the next section.
fn read_lines<T>(
    reader: &mut TextReader<'_>,
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> ParseResult<Vec<T>> {
    let mut items = vec![];
    while let Some(line) = reader.read_line() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with('[') {
            reader.pushback();
            break;
        }
        items.push(parse(line).map_err(|e| Positioned::at(e, &*reader))?);
    }
    Ok(items)
}

fn write_section<S: KeyValueSection>(
    out: &mut String,
    section: &S,
) -> Result<(), SerializationError> {
    let _ = writeln!(out, "[{}]", S::NAME);
    section.write_pairs(out)?;
    out.push('\n');
    Ok(())
}
