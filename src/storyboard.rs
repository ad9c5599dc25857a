//! Storyboard scripts: the `[Events]` section of `.osu` and `.osb` files.
//!
//! An event section is a list of unindented object lines, each followed by command lines
//! indented one marker (a space or an underscore) per nesting depth:
//!
//! ```text
//! Sprite,Foreground,Centre,"sb/star.png",320,240
//!  F,0,1000,2000,0,1
//!  L,2000,4
//!   R,0,0,500,0,3.14
//! ```
//!
//! `object` holds the object lines, `command` and `container` the command tree, `trigger`
//! the names accepted by `T` commands, and `parse` the indentation-driven reader. The
//! tree renders back to lines with consecutive compatible commands grouped on one line.
//!
//! Our policies are:
//!
//! - Parsing stops at the first error. No partially built object is returned.
//! - Variables are substituted while reading and are not reintroduced when writing.
//! - Times are whole milliseconds.

use std::fmt::Write as _;

pub mod command;
pub mod container;
pub mod object;
pub mod parse;
pub mod trigger;

pub use self::{
    command::{Command, Easing, Rgb},
    container::CommandContainer,
    object::{Layer, ObjectKind, Origin, StoryboardObject},
    parse::parse_events,
    trigger::Trigger,
};
use crate::{
    config::{ParseConfig, RenderConfig},
    error::{ParseResult, Positioned, SerializationError},
    reader::{LineSource, TextReader, Variables},
    util::parse_int,
};

pub(crate) const FORMAT_HEADER: &str = "osu file format v";

/// Comment lines introducing each group of objects, in file order.
const GROUP_HEADERS: [&str; 9] = [
    "//Background and Video events",
    "//Break Periods",
    "//Storyboard Layer 0 (Background)",
    "//Storyboard Layer 1 (Fail)",
    "//Storyboard Layer 2 (Pass)",
    "//Storyboard Layer 3 (Foreground)",
    "//Storyboard Layer 4 (Overlay)",
    "//Storyboard Sound Samples",
    "//Background Colour Transformations",
];

/// Index into [`GROUP_HEADERS`].
fn group_of(kind: &ObjectKind) -> usize {
    match kind {
        ObjectKind::Background(_) | ObjectKind::Video(_) => 0,
        ObjectKind::Break { .. } => 1,
        ObjectKind::Sprite(_) | ObjectKind::Animation(_) => {
            2 + kind.layer().map_or(0, |layer| layer as usize)
        }
        ObjectKind::Sample(_) => 7,
        ObjectKind::BackgroundColour { .. } => 8,
    }
}

/// A whole storyboard file.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Storyboard {
    /// Version from the `osu file format v` header. When present it takes precedence over
    /// the configured version, both when parsing and when rendering.
    pub format_version: Option<u32>,
    /// Definitions of the `[Variables]` section.
    pub variables: Variables,
    /// Objects of the `[Events]` section in file order.
    pub objects: Vec<StoryboardObject>,
}

impl Storyboard {
    /// Parses the `[Variables]` and `[Events]` sections of a file. Other sections are
    /// skipped; [`Beatmap`](crate::beatmap::Beatmap) reads a whole `.osu` file.
    ///
    /// ```
    /// use osu_fmt::{config::ParseConfig, storyboard::Storyboard};
    ///
    /// let source = "[Variables]\n$star=\"sb/star.png\"\n\n[Events]\nSprite,Pass,Centre,$star,0,0\n F,0,0,100,1\n";
    /// let storyboard = Storyboard::parse(source, &ParseConfig::default()).unwrap();
    /// assert_eq!(storyboard.objects.len(), 1);
    /// assert_eq!(storyboard.variables.get("$star"), Some("\"sb/star.png\""));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first error with the position of the offending line.
    pub fn parse(source: &str, config: &ParseConfig) -> ParseResult<Self> {
        let mut reader = TextReader::new(source);
        let mut format_version = None;
        let mut objects = vec![];
        while let Some(line) = reader.read_line() {
            let line = line.trim();
            if let Some(version) = line.strip_prefix(FORMAT_HEADER) {
                let version =
                    parse_int(version, "format version").map_err(|e| Positioned::at(e, &reader))?;
                format_version = Some(version);
                continue;
            }
            match line {
                "[Variables]" => read_variables(&mut reader),
                "[Events]" => {
                    let config = format_version.map_or(*config, |v| config.format_version(v));
                    objects.extend(parse_events(&mut reader, &config)?);
                }
                section if section.starts_with('[') => {
                    log::debug!("skipping section {section}");
                }
                _ => {}
            }
        }
        Ok(Self {
            format_version,
            variables: reader.variables().clone(),
            objects,
        })
    }

    /// Objects drawn on `layer`, sprites and animations only, in file order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &StoryboardObject> {
        self.objects.iter().filter(move |object| {
            matches!(object.kind, ObjectKind::Sprite(_) | ObjectKind::Animation(_))
                && object.kind.layer() == Some(layer)
        })
    }

    /// Writes the file with objects grouped under the game's comment headers. Objects
    /// keep their relative order within a group.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] when any value has no textual form.
    pub fn render(&self, config: &RenderConfig) -> Result<String, SerializationError> {
        let config = self
            .format_version
            .map_or(*config, |v| config.format_version(v));
        let mut out = String::new();
        if let Some(version) = self.format_version {
            let _ = writeln!(out, "{FORMAT_HEADER}{version}\n");
        }
        write_variables(&mut out, &self.variables);
        write_events(&mut out, &self.objects, &config)?;
        Ok(out)
    }
}

/// Writes a `[Variables]` section followed by a blank line, unless there are none.
pub(crate) fn write_variables(out: &mut String, variables: &Variables) {
    if variables.is_empty() {
        return;
    }
    out.push_str("[Variables]\n");
    for (name, value) in variables.iter() {
        let _ = writeln!(out, "{name}={value}");
    }
    out.push('\n');
}

/// Writes an `[Events]` section with objects under the game's group comments.
pub(crate) fn write_events(
    out: &mut String,
    objects: &[StoryboardObject],
    config: &RenderConfig,
) -> Result<(), SerializationError> {
    out.push_str("[Events]\n");
    for (index, header) in GROUP_HEADERS.iter().enumerate() {
        let mut members = objects
            .iter()
            .filter(|object| group_of(&object.kind) == index)
            .peekable();
        if index == GROUP_HEADERS.len() - 1 && members.peek().is_none() {
            continue;
        }
        out.push_str(header);
        out.push('\n');
        for object in members {
            for line in object.render(config)? {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
    Ok(())
}

pub(crate) fn read_variables(reader: &mut TextReader<'_>) {
    while let Some(line) = reader.read_line() {
        if line.is_empty() {
            break;
        }
        if line.starts_with('[') {
            reader.pushback();
            break;
        }
        match Variables::parse_line(line) {
            Some((name, value)) => reader.variables_mut().insert(name, value),
            None => log::trace!("ignoring line {} in [Variables]", reader.line_number()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SOURCE: &str = "osu file format v14

[Variables]
$bg=\"sb/bg.png\"

[Events]
//Background and Video events
0,0,\"bg.jpg\",0,0
//Break Periods
2,1000,5000
//Storyboard Layer 0 (Background)
Sprite,Background,TopLeft,$bg,0,0
 F,0,0,1000,1
//Storyboard Layer 1 (Fail)
//Storyboard Layer 2 (Pass)
//Storyboard Layer 3 (Foreground)
Sprite,Foreground,Centre,\"sb/a.png\",320,240
 L,0,2
  F,0,0,100,0,1
//Storyboard Layer 4 (Overlay)
//Storyboard Sound Samples
Sample,500,Background,\"hit.wav\",80

[TimingPoints]
0,500,4,1,0,100,1,0
";

    #[test]
    fn whole_file() {
        let storyboard = Storyboard::parse(SOURCE, &ParseConfig::default()).unwrap();
        assert_eq!(storyboard.format_version, Some(14));
        assert_eq!(storyboard.variables.len(), 1);
        assert_eq!(storyboard.objects.len(), 5);
        assert_eq!(storyboard.layer(Layer::Foreground).count(), 1);

        let rendered = storyboard.render(&RenderConfig::default()).unwrap();
        assert_eq!(
            rendered,
            "osu file format v14

[Variables]
$bg=\"sb/bg.png\"

[Events]
//Background and Video events
Background,0,\"bg.jpg\",0,0
//Break Periods
Break,1000,5000
//Storyboard Layer 0 (Background)
Sprite,Background,TopLeft,\"sb/bg.png\",0,0
 F,0,0,1000,1,1
//Storyboard Layer 1 (Fail)
//Storyboard Layer 2 (Pass)
//Storyboard Layer 3 (Foreground)
Sprite,Foreground,Centre,\"sb/a.png\",320,240
 L,0,2
  F,0,0,100,0,1
//Storyboard Layer 4 (Overlay)
//Storyboard Sound Samples
Sample,500,Background,\"hit.wav\",80
"
        );
        assert_eq!(
            Storyboard::parse(&rendered, &ParseConfig::default()).unwrap(),
            storyboard
        );
    }

    #[test]
    fn groups_by_layer() {
        let storyboard = Storyboard::parse(
            "[Events]\nColour,0,1,2,3\nSprite,Overlay,Centre,\"b.png\",0,0\nSprite,Pass,Centre,\"a.png\",0,0\n",
            &ParseConfig::default(),
        )
        .unwrap();
        let rendered = storyboard.render(&RenderConfig::default()).unwrap();
        let pass = rendered.find("a.png").unwrap();
        let overlay = rendered.find("b.png").unwrap();
        assert!(pass < overlay);
        assert!(rendered.ends_with("//Background Colour Transformations\nColour,0,1,2,3\n"));
    }

    #[test]
    fn header_version_wins() {
        let source = "osu file format v4\n[Events]\nBreak,1024,2024\n";
        let storyboard = Storyboard::parse(source, &ParseConfig::default()).unwrap();
        assert_eq!(storyboard.objects[0].kind.time(), Some(1048));
        let rendered = storyboard.render(&RenderConfig::default()).unwrap();
        assert!(rendered.contains("Break,1024,2024"));
    }

    #[test]
    fn errors_carry_lines() {
        let error =
            Storyboard::parse("[Events]\nSprite,0,0,\"a.png\",0,0\n F,0,x,1,1\n", &ParseConfig::default())
                .unwrap_err();
        assert_eq!(error.line(), 3);
    }
}
