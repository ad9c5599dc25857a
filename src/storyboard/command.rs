//! Storyboard commands and their line grammar.
//!
//! A command line is a tag followed by comma-separated fields. Transform commands share
//! the header `easing,startTime,endTime` and then carry one or more value groups:
//!
//! | Tag  | Variant                 | Value group                           |
//! |------|-------------------------|---------------------------------------|
//! | `F`  | [`Command::Fade`]       | `opacity[,endOpacity]`                |
//! | `M`  | [`Command::Move`]       | `x,y[,endX,endY]`                     |
//! | `MX` | [`Command::MoveX`]      | `x[,endX]`                            |
//! | `MY` | [`Command::MoveY`]      | `y[,endY]`                            |
//! | `S`  | [`Command::Scale`]      | `scale[,endScale]`                    |
//! | `V`  | [`Command::VectorScale`]| `scaleX,scaleY[,endScaleX,endScaleY]` |
//! | `R`  | [`Command::Rotate`]     | `angle[,endAngle]`                    |
//! | `C`  | [`Command::Colour`]     | `r,g,b[,endR,endG,endB]`              |
//! | `P`  | [`Command::Parameters`] | `H`, `V` or `A`                       |
//!
//! An omitted end value repeats the start value, except for colours where it is black.
//! An empty `endTime` repeats `startTime`. `L,startTime,loopCount` and
//! `T,triggerName[,startTime,endTime[,group]]` open a nested block. A trigger without
//! times listens for the whole map.
//!
//! ```
//! use osu_fmt::storyboard::command::{Command, Easing, parse_commands};
//!
//! let commands = parse_commands("F,0,100,200,0,1").unwrap();
//! let Command::Fade(fade) = &commands[0] else { unreachable!() };
//! assert_eq!((fade.easing, fade.start_time, fade.end_time), (Easing::Linear, 100, 200));
//! assert_eq!((fade.start, fade.end), (0.0, 1.0));
//! assert_eq!(commands[0].render().unwrap(), "F,0,100,200,0,1");
//! ```

use std::fmt::{self, Write as _};

use strum::{EnumIter, FromRepr, IntoStaticStr};

use super::{container::CommandContainer, trigger::Trigger};
use crate::{
    error::{ParseError, SerializationError},
    util::{format_float, parse_int, parse_time},
};

/// The interpolation curve between a command's start and end values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Easing {
    #[default]
    Linear = 0,
    /// Decelerating, also known as "slow down".
    Out = 1,
    /// Accelerating, also known as "speed up".
    In = 2,
    QuadIn = 3,
    QuadOut = 4,
    QuadInOut = 5,
    CubicIn = 6,
    CubicOut = 7,
    CubicInOut = 8,
    QuartIn = 9,
    QuartOut = 10,
    QuartInOut = 11,
    QuintIn = 12,
    QuintOut = 13,
    QuintInOut = 14,
    SineIn = 15,
    SineOut = 16,
    SineInOut = 17,
    ExpoIn = 18,
    ExpoOut = 19,
    ExpoInOut = 20,
    CircIn = 21,
    CircOut = 22,
    CircInOut = 23,
    ElasticIn = 24,
    ElasticOut = 25,
    ElasticHalfOut = 26,
    ElasticQuarterOut = 27,
    ElasticInOut = 28,
    BackIn = 29,
    BackOut = 30,
    BackInOut = 31,
    BounceIn = 32,
    BounceOut = 33,
    BounceInOut = 34,
}

impl Easing {
    /// The numeric code written in command lines.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    fn parse(field: &str) -> Result<Self, ParseError> {
        parse_int(field, "easing")
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| ParseError::invalid("easing", field))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The effect toggled by a `P` command for its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ParameterEffect {
    /// `H`
    HorizontalFlip = 0,
    /// `V`
    VerticalFlip = 1,
    /// `A`
    AdditiveBlend = 2,
}

impl ParameterEffect {
    /// The letter written in command lines.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::HorizontalFlip => 'H',
            Self::VerticalFlip => 'V',
            Self::AdditiveBlend => 'A',
        }
    }

    /// Accepts the letter or the numeric code.
    fn parse(field: &str) -> Result<Self, ParseError> {
        match field.trim() {
            "H" => Ok(Self::HorizontalFlip),
            "V" => Ok(Self::VerticalFlip),
            "A" => Ok(Self::AdditiveBlend),
            other => other
                .parse()
                .ok()
                .and_then(Self::from_repr)
                .ok_or_else(|| ParseError::invalid("parameter", field)),
        }
    }
}

impl fmt::Display for ParameterEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.letter())
    }
}

/// An RGB colour with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Creates a colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn from_fields(r: &str, g: &str, b: &str) -> Result<Self, ParseError> {
        Ok(Self {
            r: parse_int(r, "colour component")?,
            g: parse_int(g, "colour component")?,
            b: parse_int(b, "colour component")?,
        })
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// A value animated by a transform command, spanning `WIDTH` fields.
trait TransformValue: Copy {
    const WIDTH: usize;

    fn parse(fields: &[&str]) -> Result<Self, ParseError>;

    fn write(&self, out: &mut String) -> Result<(), SerializationError>;
}

fn value_count_mismatch() -> ParseError {
    ParseError::malformed("value group has the wrong number of fields")
}

impl TransformValue for f64 {
    const WIDTH: usize = 1;

    fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let [value] = fields else {
            return Err(value_count_mismatch());
        };
        crate::util::parse_float(value, "number")
    }

    fn write(&self, out: &mut String) -> Result<(), SerializationError> {
        out.push(',');
        out.push_str(&format_float(*self)?);
        Ok(())
    }
}

impl TransformValue for (f64, f64) {
    const WIDTH: usize = 2;

    fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let [x, y] = fields else {
            return Err(value_count_mismatch());
        };
        Ok((f64::parse(&[*x])?, f64::parse(&[*y])?))
    }

    fn write(&self, out: &mut String) -> Result<(), SerializationError> {
        self.0.write(out)?;
        self.1.write(out)
    }
}

impl TransformValue for Rgb {
    const WIDTH: usize = 3;

    fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let [r, g, b] = fields else {
            return Err(value_count_mismatch());
        };
        Self::from_fields(r, g, b)
    }

    fn write(&self, out: &mut String) -> Result<(), SerializationError> {
        let _ = write!(out, ",{self}");
        Ok(())
    }
}

/// A timed interpolation of a value from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform<T> {
    /// Interpolation curve.
    pub easing: Easing,
    /// Start time in milliseconds.
    pub start_time: i32,
    /// End time in milliseconds.
    pub end_time: i32,
    /// Value at `start_time`.
    pub start: T,
    /// Value at `end_time`.
    pub end: T,
}

impl<T: Copy> Transform<T> {
    /// A transform holding `value` over the whole span.
    pub const fn constant(easing: Easing, start_time: i32, end_time: i32, value: T) -> Self {
        Self {
            easing,
            start_time,
            end_time,
            start: value,
            end: value,
        }
    }
}

/// A `P` command: an effect held from `start_time` to `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// Interpolation curve, meaningless for parameters but preserved.
    pub easing: Easing,
    /// Start time in milliseconds.
    pub start_time: i32,
    /// End time in milliseconds. Equal to `start_time` for a permanent effect.
    pub end_time: i32,
    /// The toggled effect.
    pub effect: ParameterEffect,
}

/// An `L` command: repeats its children `loop_count` times from `start_time`.
///
/// Child times are relative to the start of each iteration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loop {
    /// Start of the first iteration.
    pub start_time: i32,
    /// Number of iterations.
    pub loop_count: u32,
    /// The repeated commands.
    pub commands: CommandContainer,
}

impl Loop {
    /// Length of one iteration: the latest child end time.
    #[must_use]
    pub fn iteration_length(&self) -> i32 {
        self.commands
            .iter()
            .map(Command::end_time)
            .max()
            .unwrap_or(0)
            .max(0)
    }
}

/// A `T` command: runs its children whenever `trigger` fires between `start_time` and
/// `end_time`.
///
/// A line without times opens the window from [`i32::MIN`] to [`i32::MAX`]. Those open
/// ends are not moved by the legacy time offset and are left out when rendering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerLoop {
    /// The firing condition.
    pub trigger: Trigger,
    /// Start of the listening window.
    pub start_time: i32,
    /// End of the listening window.
    pub end_time: i32,
    /// Only one trigger of a nonzero group runs at a time. `None` when the line has no
    /// group field, which the game reads as group 0.
    pub group: Option<i32>,
    /// Commands run on each firing, timed relative to it.
    pub commands: CommandContainer,
}

impl TriggerLoop {
    /// Whether the listening window was given, rather than covering the whole map.
    #[must_use]
    pub const fn has_window(&self) -> bool {
        !(self.start_time == i32::MIN && self.end_time == i32::MAX)
    }

    /// The group number, 0 when none was written.
    #[must_use]
    pub fn group_number(&self) -> i32 {
        self.group.unwrap_or(0)
    }

    fn shift_window(&mut self, delta: i32) {
        if self.has_window() {
            self.start_time = self.start_time.saturating_add(delta);
            self.end_time = self.end_time.saturating_add(delta);
        }
    }
}

/// One storyboard command.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// `F`: opacity.
    Fade(Transform<f64>),
    /// `M`: position on both axes.
    Move(Transform<(f64, f64)>),
    /// `MX`: horizontal position.
    MoveX(Transform<f64>),
    /// `MY`: vertical position.
    MoveY(Transform<f64>),
    /// `S`: uniform scale.
    Scale(Transform<f64>),
    /// `V`: scale per axis.
    VectorScale(Transform<(f64, f64)>),
    /// `R`: rotation in radians.
    Rotate(Transform<f64>),
    /// `C`: tint colour.
    Colour(Transform<Rgb>),
    /// `P`: flip or blend mode.
    Parameters(Parameters),
    /// `L`: a repeated block.
    Loop(Loop),
    /// `T`: a triggered block.
    Trigger(TriggerLoop),
}

/// Parses the fields after the tag, appending every command of the line.
type LineParser = fn(&[&str], &mut Vec<Command>) -> Result<(), ParseError>;

/// Tag dispatch table.
const COMMAND_TABLE: [(&str, LineParser); 11] = [
    ("F", |fields, out| parse_run(fields, out, Command::Fade, same)),
    ("M", |fields, out| parse_run(fields, out, Command::Move, same)),
    ("MX", |fields, out| parse_run(fields, out, Command::MoveX, same)),
    ("MY", |fields, out| parse_run(fields, out, Command::MoveY, same)),
    ("S", |fields, out| parse_run(fields, out, Command::Scale, same)),
    ("V", |fields, out| parse_run(fields, out, Command::VectorScale, same)),
    ("R", |fields, out| parse_run(fields, out, Command::Rotate, same)),
    ("C", |fields, out| parse_run(fields, out, Command::Colour, |_| Rgb::default())),
    ("P", parse_parameters),
    ("L", parse_loop),
    ("T", parse_trigger),
];

const fn same<T>(value: T) -> T {
    value
}

fn parse_header<'f, 's>(
    fields: &'f [&'s str],
) -> Result<(Easing, i32, i32, &'f [&'s str]), ParseError> {
    let [easing, start_time, end_time, rest @ ..] = fields else {
        return Err(ParseError::malformed(
            "expected easing, start time and end time",
        ));
    };
    let easing = Easing::parse(easing)?;
    let start_time = parse_time(start_time)?;
    let end_time = if end_time.trim().is_empty() {
        start_time
    } else {
        parse_time(end_time)?
    };
    if rest.is_empty() {
        return Err(ParseError::malformed("missing values"));
    }
    Ok((easing, start_time, end_time, rest))
}

/// Reads value groups after the shared header. Each group takes its full width when
/// enough fields remain, otherwise only its start value.
fn parse_run<T: TransformValue>(
    fields: &[&str],
    out: &mut Vec<Command>,
    wrap: fn(Transform<T>) -> Command,
    elided_end: fn(T) -> T,
) -> Result<(), ParseError> {
    let (easing, start_time, end_time, mut rest) = parse_header(fields)?;
    while !rest.is_empty() {
        let (start, end, tail) = if let Some((group, tail)) = rest.split_at_checked(2 * T::WIDTH)
        {
            let (start, end) = group.split_at(T::WIDTH);
            (T::parse(start)?, T::parse(end)?, tail)
        } else if let Some((group, tail)) = rest.split_at_checked(T::WIDTH) {
            let start = T::parse(group)?;
            (start, elided_end(start), tail)
        } else {
            return Err(ParseError::malformed(format!(
                "expected {} more value fields, found {}",
                T::WIDTH,
                rest.len()
            )));
        };
        out.push(wrap(Transform {
            easing,
            start_time,
            end_time,
            start,
            end,
        }));
        rest = tail;
    }
    Ok(())
}

fn parse_parameters(fields: &[&str], out: &mut Vec<Command>) -> Result<(), ParseError> {
    let (easing, start_time, end_time, rest) = parse_header(fields)?;
    for effect in rest {
        out.push(Command::Parameters(Parameters {
            easing,
            start_time,
            end_time,
            effect: ParameterEffect::parse(effect)?,
        }));
    }
    Ok(())
}

fn parse_loop(fields: &[&str], out: &mut Vec<Command>) -> Result<(), ParseError> {
    let [start_time, loop_count] = fields else {
        return Err(ParseError::malformed("expected start time and loop count"));
    };
    out.push(Command::Loop(Loop {
        start_time: parse_time(start_time)?,
        loop_count: parse_int(loop_count, "loop count")?,
        commands: CommandContainer::new(),
    }));
    Ok(())
}

fn parse_trigger(fields: &[&str], out: &mut Vec<Command>) -> Result<(), ParseError> {
    let (name, window, group) = match fields {
        [name] => (name, None, None),
        [name, start_time, end_time] => (name, Some((start_time, end_time)), None),
        [name, start_time, end_time, group] => {
            (name, Some((start_time, end_time)), Some(group))
        }
        _ => {
            return Err(ParseError::malformed(
                "expected trigger name, then optional start time, end time and group",
            ));
        }
    };
    let (start_time, end_time) = match window {
        Some((start_time, end_time)) => (parse_time(start_time)?, parse_time(end_time)?),
        None => (i32::MIN, i32::MAX),
    };
    out.push(Command::Trigger(TriggerLoop {
        trigger: Trigger::decode(name.trim())?,
        start_time,
        end_time,
        group: group
            .map(|group| parse_int(group, "trigger group"))
            .transpose()?,
        commands: CommandContainer::new(),
    }));
    Ok(())
}

/// Parses one command line, without indentation, into the commands it carries.
///
/// A line with several value groups yields one command per group. `L` and `T` lines
/// yield one container with no children.
///
/// # Errors
///
/// - [`ParseError::UnknownCommandType`] for an unrecognized tag.
/// - [`ParseError::MalformedLine`] for missing fields.
/// - [`ParseError::InvalidFieldValue`] for a field that is not a valid number or name.
/// - [`ParseError::UnknownTriggerName`] for an unknown trigger.
pub fn parse_commands(line: &str) -> Result<Vec<Command>, ParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    let [tag, rest @ ..] = fields.as_slice() else {
        return Err(ParseError::malformed("empty command"));
    };
    let tag = tag.trim();
    let (_, parser) = COMMAND_TABLE
        .iter()
        .find(|(name, _)| *name == tag)
        .ok_or_else(|| ParseError::UnknownCommandType(tag.to_owned()))?;
    let mut out = vec![];
    parser(rest, &mut out)?;
    Ok(out)
}

/// Commands that may share a line: same tag, easing and times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunKey {
    tag: &'static str,
    easing: Easing,
    start_time: i32,
    end_time: i32,
}

impl Command {
    /// The tag letter(s) starting this command's line.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Fade(_) => "F",
            Self::Move(_) => "M",
            Self::MoveX(_) => "MX",
            Self::MoveY(_) => "MY",
            Self::Scale(_) => "S",
            Self::VectorScale(_) => "V",
            Self::Rotate(_) => "R",
            Self::Colour(_) => "C",
            Self::Parameters(_) => "P",
            Self::Loop(_) => "L",
            Self::Trigger(_) => "T",
        }
    }

    /// The easing of a transform, `None` for loops and triggers.
    #[must_use]
    pub const fn easing(&self) -> Option<Easing> {
        match self {
            Self::Fade(t) | Self::MoveX(t) | Self::MoveY(t) | Self::Scale(t) | Self::Rotate(t) => {
                Some(t.easing)
            }
            Self::Move(t) | Self::VectorScale(t) => Some(t.easing),
            Self::Colour(t) => Some(t.easing),
            Self::Parameters(p) => Some(p.easing),
            Self::Loop(_) | Self::Trigger(_) => None,
        }
    }

    /// Start time in milliseconds.
    #[must_use]
    pub const fn start_time(&self) -> i32 {
        match self {
            Self::Fade(t) | Self::MoveX(t) | Self::MoveY(t) | Self::Scale(t) | Self::Rotate(t) => {
                t.start_time
            }
            Self::Move(t) | Self::VectorScale(t) => t.start_time,
            Self::Colour(t) => t.start_time,
            Self::Parameters(p) => p.start_time,
            Self::Loop(l) => l.start_time,
            Self::Trigger(t) => t.start_time,
        }
    }

    /// End time in milliseconds. For a loop, the end of its last iteration.
    #[must_use]
    pub fn end_time(&self) -> i32 {
        match self {
            Self::Fade(t) | Self::MoveX(t) | Self::MoveY(t) | Self::Scale(t) | Self::Rotate(t) => {
                t.end_time
            }
            Self::Move(t) | Self::VectorScale(t) => t.end_time,
            Self::Colour(t) => t.end_time,
            Self::Parameters(p) => p.end_time,
            Self::Loop(l) => {
                let iterations = i32::try_from(l.loop_count.max(1)).unwrap_or(i32::MAX);
                l.start_time
                    .saturating_add(l.iteration_length().saturating_mul(iterations))
            }
            Self::Trigger(t) => t.end_time,
        }
    }

    /// Nested commands of a loop or trigger.
    #[must_use]
    pub const fn children(&self) -> Option<&CommandContainer> {
        match self {
            Self::Loop(l) => Some(&l.commands),
            Self::Trigger(t) => Some(&t.commands),
            _ => None,
        }
    }

    /// Mutable nested commands of a loop or trigger.
    pub fn children_mut(&mut self) -> Option<&mut CommandContainer> {
        match self {
            Self::Loop(l) => Some(&mut l.commands),
            Self::Trigger(t) => Some(&mut t.commands),
            _ => None,
        }
    }

    /// Whether this command nests others.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Loop(_) | Self::Trigger(_))
    }

    pub(crate) fn run_key(&self) -> Option<RunKey> {
        let easing = self.easing()?;
        Some(RunKey {
            tag: self.tag(),
            easing,
            start_time: self.start_time(),
            end_time: self.end_time(),
        })
    }

    /// Moves the command's own times by `delta`. Children keep their relative times.
    pub(crate) fn shift_times(&mut self, delta: i32) {
        fn shift<T>(t: &mut Transform<T>, delta: i32) {
            t.start_time = t.start_time.saturating_add(delta);
            t.end_time = t.end_time.saturating_add(delta);
        }
        match self {
            Self::Fade(t) | Self::MoveX(t) | Self::MoveY(t) | Self::Scale(t) | Self::Rotate(t) => {
                shift(t, delta);
            }
            Self::Move(t) | Self::VectorScale(t) => shift(t, delta),
            Self::Colour(t) => shift(t, delta),
            Self::Parameters(p) => {
                p.start_time = p.start_time.saturating_add(delta);
                p.end_time = p.end_time.saturating_add(delta);
            }
            Self::Loop(l) => l.start_time = l.start_time.saturating_add(delta),
            Self::Trigger(t) => t.shift_window(delta),
        }
    }

    /// Appends this transform's full value group, `,start,end` or `,effect`.
    pub(crate) fn write_values(&self, out: &mut String) -> Result<(), SerializationError> {
        fn pair<T: TransformValue>(
            t: &Transform<T>,
            out: &mut String,
        ) -> Result<(), SerializationError> {
            t.start.write(out)?;
            t.end.write(out)
        }
        match self {
            Self::Fade(t) | Self::MoveX(t) | Self::MoveY(t) | Self::Scale(t) | Self::Rotate(t) => {
                pair(t, out)
            }
            Self::Move(t) | Self::VectorScale(t) => pair(t, out),
            Self::Colour(t) => pair(t, out),
            Self::Parameters(p) => {
                out.push(',');
                out.push(p.effect.letter());
                Ok(())
            }
            Self::Loop(_) | Self::Trigger(_) => Ok(()),
        }
    }

    /// The line head: `tag,easing,start,end` for transforms, the full header for
    /// loops and triggers. Times are moved by `delta`.
    pub(crate) fn head(&self, delta: i32) -> String {
        let start_time = self.start_time().saturating_add(delta);
        match self {
            Self::Loop(l) => format!("L,{start_time},{}", l.loop_count),
            Self::Trigger(t) => {
                let mut head = format!("T,{}", t.trigger);
                if t.has_window() {
                    let end_time = t.end_time.saturating_add(delta);
                    let _ = write!(head, ",{start_time},{end_time}");
                } else if t.group.is_some() {
                    let _ = write!(head, ",{},{}", t.start_time, t.end_time);
                }
                if let Some(group) = t.group {
                    let _ = write!(head, ",{group}");
                }
                head
            }
            _ => {
                let easing = self.easing().unwrap_or_default();
                let end_time = self.end_time().saturating_add(delta);
                format!("{},{easing},{start_time},{end_time}", self.tag())
            }
        }
    }

    /// Renders this command alone on one line, without indentation or children.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::NonFiniteNumber`] for a NaN or infinite value.
    pub fn render(&self) -> Result<String, SerializationError> {
        let mut line = self.head(0);
        self.write_values(&mut line)?;
        Ok(line)
    }
}
