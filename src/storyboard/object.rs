//! Drawable objects: the unindented lines of an `[Events]` section.

use std::fmt;

use strum::{EnumIter, EnumString, FromRepr, IntoStaticStr};

use super::{command::Rgb, container::CommandContainer};
use crate::{
    config::RenderConfig,
    error::{ParseError, SerializationError},
    util::{check_path, format_float, parse_float, parse_int, parse_time, unquote},
};

/// The storyboard layer a sprite or sample belongs to. Later layers draw on top.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, EnumString, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Layer {
    #[allow(missing_docs)]
    #[default]
    Background = 0,
    /// Shown only while the player is failing.
    Fail = 1,
    /// Shown only while the player is passing.
    Pass = 2,
    #[allow(missing_docs)]
    Foreground = 3,
    /// Drawn above hit objects.
    Overlay = 4,
}

/// The point of a sprite placed at its position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, EnumString, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Origin {
    TopLeft = 0,
    TopCentre = 1,
    TopRight = 2,
    CentreLeft = 3,
    #[default]
    Centre = 4,
    CentreRight = 5,
    BottomLeft = 6,
    BottomCentre = 7,
    BottomRight = 8,
}

/// Accepts a numeric code or a name.
fn parse_named<T: std::str::FromStr>(
    field: &str,
    what: &'static str,
    from_repr: fn(u8) -> Option<T>,
) -> Result<T, ParseError> {
    let field = field.trim();
    field
        .parse()
        .ok()
        .and_then(from_repr)
        .or_else(|| field.parse().ok())
        .ok_or_else(|| ParseError::invalid(what, field))
}

/// Whether an animation restarts after its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LoopType {
    /// Restart from the first frame.
    #[default]
    LoopForever = 0,
    /// Stop on the last frame.
    LoopOnce = 1,
}

impl LoopType {
    fn parse(field: &str) -> Result<Self, ParseError> {
        match field.trim() {
            "LoopForever" | "Forever" => Ok(Self::LoopForever),
            "LoopOnce" | "Once" => Ok(Self::LoopOnce),
            other => other
                .parse()
                .ok()
                .and_then(Self::from_repr)
                .ok_or_else(|| ParseError::invalid("loop type", field)),
        }
    }
}

impl fmt::Display for LoopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoopForever => "LoopForever",
            Self::LoopOnce => "LoopOnce",
        })
    }
}

/// A background image or video placed behind the playfield.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Backdrop {
    /// Start time; videos may start before the audio.
    pub time: i32,
    /// File relative to the beatmap folder.
    pub path: String,
    /// Horizontal offset from the centre.
    pub x: i32,
    /// Vertical offset from the centre.
    pub y: i32,
}

/// Placement shared by sprites and animations.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sprite {
    #[allow(missing_docs)]
    pub layer: Layer,
    #[allow(missing_docs)]
    pub origin: Origin,
    /// Image file relative to the beatmap folder.
    pub path: String,
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
}

/// A sound played at a fixed time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    #[allow(missing_docs)]
    pub time: i32,
    #[allow(missing_docs)]
    pub layer: Layer,
    /// Audio file relative to the beatmap folder.
    pub path: String,
    /// Volume percentage, 100 when omitted.
    pub volume: u32,
}

/// A sprite cycling through numbered frames `name0.png`, `name1.png`, ...
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    /// Placement; `path` names the frames without their index.
    pub sprite: Sprite,
    #[allow(missing_docs)]
    pub frame_count: u32,
    /// Milliseconds per frame.
    pub frame_delay: f64,
    #[allow(missing_docs)]
    pub loop_type: LoopType,
}

/// What an unindented event line declares.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// `Background` or `0`.
    Background(Backdrop),
    /// `Video` or `1`.
    Video(Backdrop),
    /// `Break` or `2`: a pause in gameplay.
    Break {
        #[allow(missing_docs)]
        start_time: i32,
        #[allow(missing_docs)]
        end_time: i32,
    },
    /// `Colour` or `3`: a background colour change.
    BackgroundColour {
        #[allow(missing_docs)]
        time: i32,
        #[allow(missing_docs)]
        colour: Rgb,
    },
    /// `Sprite` or `4`.
    Sprite(Sprite),
    /// `Sample` or `5`.
    Sample(Sample),
    /// `Animation` or `6`.
    Animation(Animation),
}

type HeaderParser = fn(&[&str]) -> Result<ObjectKind, ParseError>;

/// Event type dispatch table: name, numeric code, parser of the fields after the type.
const EVENT_TABLE: [(&str, &str, HeaderParser); 7] = [
    ("Background", "0", |fields| {
        parse_backdrop(fields).map(ObjectKind::Background)
    }),
    ("Video", "1", |fields| parse_backdrop(fields).map(ObjectKind::Video)),
    ("Break", "2", parse_break),
    ("Colour", "3", parse_colour),
    ("Sprite", "4", |fields| parse_sprite(fields).map(ObjectKind::Sprite)),
    ("Sample", "5", parse_sample),
    ("Animation", "6", parse_animation),
];

fn too_short(what: &str) -> ParseError {
    ParseError::malformed(format!("{what} line is too short"))
}

fn parse_backdrop(fields: &[&str]) -> Result<Backdrop, ParseError> {
    let [time, path, rest @ ..] = fields else {
        return Err(too_short("background"));
    };
    let (x, y) = match rest {
        [] | [""] => (0, 0),
        [x, y, ..] => (parse_int(x, "x")?, parse_int(y, "y")?),
        [_] => return Err(too_short("background")),
    };
    Ok(Backdrop {
        time: parse_time(time)?,
        path: unquote(path.trim()).to_owned(),
        x,
        y,
    })
}

fn parse_break(fields: &[&str]) -> Result<ObjectKind, ParseError> {
    let [start_time, end_time, ..] = fields else {
        return Err(too_short("break"));
    };
    Ok(ObjectKind::Break {
        start_time: parse_time(start_time)?,
        end_time: parse_time(end_time)?,
    })
}

fn parse_colour(fields: &[&str]) -> Result<ObjectKind, ParseError> {
    let [time, r, g, b, ..] = fields else {
        return Err(too_short("colour"));
    };
    Ok(ObjectKind::BackgroundColour {
        time: parse_time(time)?,
        colour: Rgb::from_fields(r, g, b)?,
    })
}

fn parse_sprite(fields: &[&str]) -> Result<Sprite, ParseError> {
    let [layer, origin, path, x, y, ..] = fields else {
        return Err(too_short("sprite"));
    };
    Ok(Sprite {
        layer: parse_named(layer, "layer", Layer::from_repr)?,
        origin: parse_named(origin, "origin", Origin::from_repr)?,
        path: unquote(path.trim()).to_owned(),
        x: parse_float(x, "x")?,
        y: parse_float(y, "y")?,
    })
}

fn parse_sample(fields: &[&str]) -> Result<ObjectKind, ParseError> {
    let [time, layer, path, rest @ ..] = fields else {
        return Err(too_short("sample"));
    };
    let volume = match rest.first() {
        Some(volume) if !volume.trim().is_empty() => parse_int(volume, "volume")?,
        _ => 100,
    };
    Ok(ObjectKind::Sample(Sample {
        time: parse_time(time)?,
        layer: parse_named(layer, "layer", Layer::from_repr)?,
        path: unquote(path.trim()).to_owned(),
        volume,
    }))
}

fn parse_animation(fields: &[&str]) -> Result<ObjectKind, ParseError> {
    let Some((sprite, rest)) = fields.split_at_checked(5) else {
        return Err(too_short("animation"));
    };
    let [frame_count, frame_delay, rest @ ..] = rest else {
        return Err(too_short("animation"));
    };
    Ok(ObjectKind::Animation(Animation {
        sprite: parse_sprite(sprite)?,
        frame_count: parse_int(frame_count, "frame count")?,
        frame_delay: parse_float(frame_delay, "frame delay")?,
        loop_type: rest
            .first()
            .map_or(Ok(LoopType::LoopForever), |field| LoopType::parse(field))?,
    }))
}

impl ObjectKind {
    /// Parses an object line.
    ///
    /// # Errors
    ///
    /// - [`ParseError::UnknownEventType`] for an unrecognized type.
    /// - [`ParseError::MalformedLine`] for missing fields.
    /// - [`ParseError::InvalidFieldValue`] for an invalid number, layer, origin or loop type.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').collect();
        let [event_type, rest @ ..] = fields.as_slice() else {
            return Err(ParseError::malformed("empty event"));
        };
        let event_type = event_type.trim();
        let (_, _, parser) = EVENT_TABLE
            .iter()
            .find(|(name, code, _)| *name == event_type || *code == event_type)
            .ok_or_else(|| ParseError::UnknownEventType(event_type.to_owned()))?;
        parser(rest)
    }

    /// The time of the object line itself, if it has one.
    #[must_use]
    pub const fn time(&self) -> Option<i32> {
        match self {
            Self::Background(b) | Self::Video(b) => Some(b.time),
            Self::Break { start_time, .. } => Some(*start_time),
            Self::BackgroundColour { time, .. } => Some(*time),
            Self::Sample(s) => Some(s.time),
            Self::Sprite(_) | Self::Animation(_) => None,
        }
    }

    /// The layer of sprites, animations and samples.
    #[must_use]
    pub const fn layer(&self) -> Option<Layer> {
        match self {
            Self::Sprite(s) | Self::Animation(Animation { sprite: s, .. }) => Some(s.layer),
            Self::Sample(s) => Some(s.layer),
            _ => None,
        }
    }

    pub(crate) fn shift_times(&mut self, delta: i32) {
        match self {
            Self::Background(b) | Self::Video(b) => b.time = b.time.saturating_add(delta),
            Self::Break {
                start_time,
                end_time,
            } => {
                *start_time = start_time.saturating_add(delta);
                *end_time = end_time.saturating_add(delta);
            }
            Self::BackgroundColour { time, .. } => *time = time.saturating_add(delta),
            Self::Sample(s) => s.time = s.time.saturating_add(delta),
            Self::Sprite(_) | Self::Animation(_) => {}
        }
    }

    /// Renders the object line with the literal type name.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] for a path that cannot be written or a non-finite
    /// position or frame delay.
    pub fn render(&self) -> Result<String, SerializationError> {
        fn sprite(s: &Sprite) -> Result<String, SerializationError> {
            Ok(format!(
                "{},{},\"{}\",{},{}",
                <&str>::from(s.layer),
                <&str>::from(s.origin),
                check_path(&s.path)?,
                format_float(s.x)?,
                format_float(s.y)?,
            ))
        }
        Ok(match self {
            Self::Background(b) => format!(
                "Background,{},\"{}\",{},{}",
                b.time,
                check_path(&b.path)?,
                b.x,
                b.y
            ),
            Self::Video(b) => format!(
                "Video,{},\"{}\",{},{}",
                b.time,
                check_path(&b.path)?,
                b.x,
                b.y
            ),
            Self::Break {
                start_time,
                end_time,
            } => format!("Break,{start_time},{end_time}"),
            Self::BackgroundColour { time, colour } => format!("Colour,{time},{colour}"),
            Self::Sprite(s) => format!("Sprite,{}", sprite(s)?),
            Self::Sample(s) => format!(
                "Sample,{},{},\"{}\",{}",
                s.time,
                <&str>::from(s.layer),
                check_path(&s.path)?,
                s.volume
            ),
            Self::Animation(a) => format!(
                "Animation,{},{},{},{}",
                sprite(&a.sprite)?,
                a.frame_count,
                format_float(a.frame_delay)?,
                a.loop_type
            ),
        })
    }
}

/// A drawable object and the commands animating it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoryboardObject {
    /// The object line.
    pub kind: ObjectKind,
    /// Commands at depth 1.
    pub commands: CommandContainer,
}

impl StoryboardObject {
    /// An object with no commands.
    #[must_use]
    pub const fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            commands: CommandContainer::new(),
        }
    }

    /// Renders the object line followed by its command lines.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] when any value has no textual form.
    pub fn render(&self, config: &RenderConfig) -> Result<Vec<String>, SerializationError> {
        let delta = -config.time_offset();
        let mut kind = self.kind.clone();
        kind.shift_times(delta);
        let mut lines = vec![kind.render()?];
        self.commands.render_into(1, delta, config, &mut lines)?;
        Ok(lines)
    }
}
