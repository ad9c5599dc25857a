//! Lines of the `[HitObjects]` section.
//!
//! A hit object line reads `x,y,time,type,hitSound,objectParams...,hitSample`. The
//! object-specific parameters are returned untouched by [`HitObjectHeader::split`];
//! [`HitObject`] decodes them per kind:
//!
//! ```text
//! 256,192,1000,1,0,0:0:0:0:                          circle
//! 100,100,2000,2,0,B|200:200|300:100,2,240,2|0|0,1:0|0:0|0:0,0:0:0:0:    slider
//! 256,192,3000,12,0,4000,0:0:0:0:                    spinner
//! 64,192,5000,128,0,5500:0:0:0:0:                    hold note
//! ```

use std::fmt::Write as _;

use strum::{EnumString, IntoStaticStr};

use crate::{
    config::{ParseConfig, RenderConfig},
    error::{ParseError, SerializationError},
    flags::{HitObjectKind, HitSoundFlags, SampleSet},
    util::{check_path, format_float, parse_float, parse_int, parse_time},
};

/// The first five fields of a hit object line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObjectHeader {
    /// Playfield position in osu!pixels.
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
    /// Time in milliseconds.
    pub time: i32,
    /// Object kind, new combo flag and combo colour skip.
    pub kind: HitObjectKind,
    /// Sounds played on hit.
    pub hit_sound: HitSoundFlags,
}

impl HitObjectHeader {
    /// Parses the header and returns it with the rest of the line after the fifth field,
    /// empty when there is none.
    ///
    /// ```
    /// use osu_fmt::{config::ParseConfig, flags::HitObjectKind, hit_object::HitObjectHeader};
    ///
    /// let (header, rest) =
    ///     HitObjectHeader::split("256,192,1000,5,2,0:0:0:0:", &ParseConfig::default()).unwrap();
    /// assert_eq!(header.kind, HitObjectKind::CIRCLE | HitObjectKind::NEW_COMBO);
    /// assert_eq!(rest, "0:0:0:0:");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] with fewer than five fields and
    /// [`ParseError::InvalidFieldValue`] for an invalid number.
    pub fn split<'l>(line: &'l str, config: &ParseConfig) -> Result<(Self, &'l str), ParseError> {
        let mut fields = line.splitn(6, ',');
        let (Some(x), Some(y), Some(time), Some(kind), Some(hit_sound)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(ParseError::malformed("hit object needs x, y, time, type and hit sound"));
        };
        let header = Self {
            x: parse_float(x, "x")?,
            y: parse_float(y, "y")?,
            time: parse_time(time)?.saturating_add(config.time_offset()),
            kind: HitObjectKind::new(parse_int(kind, "type")?),
            hit_sound: HitSoundFlags::new(parse_int(hit_sound, "hit sound")?),
        };
        Ok((header, fields.next().unwrap_or_default()))
    }

    /// Renders the five header fields.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::NonFiniteNumber`] for a NaN or infinite position.
    pub fn render(&self, config: &RenderConfig) -> Result<String, SerializationError> {
        Ok(format!(
            "{},{},{},{},{}",
            format_float(self.x)?,
            format_float(self.y)?,
            self.time.saturating_sub(config.time_offset()),
            self.kind,
            self.hit_sound
        ))
    }
}

/// Sample overrides of a hit object: `normalSet:additionSet:index:volume:filename`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSample {
    /// Sample set of the normal sound.
    pub normal_set: SampleSet,
    /// Sample set of whistle, finish and clap.
    pub addition_set: SampleSet,
    /// Custom sample index, 0 to inherit.
    pub index: u32,
    /// Volume percentage, 0 to inherit.
    pub volume: u32,
    /// A sample file replacing the skin's, empty for none.
    pub filename: String,
}

fn parse_sample_set(field: &str) -> Result<SampleSet, ParseError> {
    parse_int(field, "sample set")
        .ok()
        .and_then(SampleSet::from_code)
        .ok_or_else(|| ParseError::invalid("sample set", field))
}

impl HitSample {
    /// Parses the colon-separated extras. Missing trailing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidFieldValue`] for an invalid number or sample set.
    pub fn parse(field: &str) -> Result<Self, ParseError> {
        let mut sample = Self::default();
        if field.trim().is_empty() {
            return Ok(sample);
        }
        let mut parts = field.splitn(5, ':');
        if let Some(normal_set) = parts.next() {
            sample.normal_set = parse_sample_set(normal_set)?;
        }
        if let Some(addition_set) = parts.next() {
            sample.addition_set = parse_sample_set(addition_set)?;
        }
        if let Some(index) = parts.next() {
            sample.index = parse_int(index, "sample index")?;
        }
        if let Some(volume) = parts.next() {
            sample.volume = parse_int(volume, "volume")?;
        }
        if let Some(filename) = parts.next() {
            filename.clone_into(&mut sample.filename);
        }
        Ok(sample)
    }

    /// Renders all five parts.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnrepresentablePath`] for a filename containing a
    /// comma, a quote or a line break.
    pub fn render(&self) -> Result<String, SerializationError> {
        Ok(format!(
            "{}:{}:{}:{}:{}",
            self.normal_set,
            self.addition_set,
            self.index,
            self.volume,
            check_path(&self.filename)?
        ))
    }

    /// Renders the `normal:addition` pair of a slider edge.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::EdgeSampleExtras`] when an index, a volume or a
    /// filename is set: edges have no place for them.
    pub fn render_edge(&self) -> Result<String, SerializationError> {
        if self.index != 0 || self.volume != 0 || !self.filename.is_empty() {
            return Err(SerializationError::EdgeSampleExtras {
                index: self.index,
                volume: self.volume,
                filename: self.filename.clone(),
            });
        }
        Ok(format!("{}:{}", self.normal_set, self.addition_set))
    }
}

/// Parses slider edge samples `n:a|n:a|...`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidFieldValue`] for an invalid sample set and
/// [`ParseError::MalformedLine`] for a pair without a colon.
pub fn parse_edge_samples(field: &str) -> Result<Vec<HitSample>, ParseError> {
    field
        .split('|')
        .map(|pair| {
            let (normal_set, addition_set) = pair
                .split_once(':')
                .ok_or_else(|| ParseError::malformed(format!("edge sample `{pair}` needs a colon")))?;
            Ok(HitSample {
                normal_set: parse_sample_set(normal_set)?,
                addition_set: parse_sample_set(addition_set)?,
                ..HitSample::default()
            })
        })
        .collect()
}

/// Renders slider edge samples joined by `|`.
///
/// # Errors
///
/// See [`HitSample::render_edge`].
pub fn render_edge_samples(samples: &[HitSample]) -> Result<String, SerializationError> {
    let mut out = String::new();
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        out.push_str(&sample.render_edge()?);
    }
    Ok(out)
}

/// Parses slider edge sounds `2|0|8`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidFieldValue`] for a value that is not an integer.
pub fn parse_edge_sounds(field: &str) -> Result<Vec<HitSoundFlags>, ParseError> {
    field
        .split('|')
        .map(|sound| parse_int(sound, "edge sound").map(HitSoundFlags::new))
        .collect()
}

/// Renders slider edge sounds joined by `|`.
#[must_use]
pub fn render_edge_sounds(sounds: &[HitSoundFlags]) -> String {
    let mut out = String::new();
    for (i, sound) in sounds.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        let _ = write!(out, "{sound}");
    }
    out
}

/// Path shape of a slider, written as its first letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveType {
    /// Bezier curve, split into segments at repeated points.
    #[default]
    #[strum(serialize = "B")]
    Bezier,
    /// Centripetal Catmull-Rom spline, only found in old maps.
    #[strum(serialize = "C")]
    Catmull,
    /// Straight line segments.
    #[strum(serialize = "L")]
    Linear,
    /// Arc through three points.
    #[strum(serialize = "P")]
    PerfectCircle,
}

/// The parameters of a slider line after the header.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderParams {
    #[allow(missing_docs)]
    pub curve_type: CurveType,
    /// Anchor points after the head position.
    pub curve_points: Vec<(f64, f64)>,
    /// Number of times the ball travels the path, 1 without repeats.
    pub slides: u32,
    /// Visual length in osu!pixels.
    pub length: f64,
    /// Sounds on the head, each repeat and the tail. Empty when the line has none.
    pub edge_sounds: Vec<HitSoundFlags>,
    /// Sample sets per edge. Empty when the line has none.
    pub edge_samples: Vec<HitSample>,
}

impl SliderParams {
    fn parse(rest: &str) -> Result<(Self, HitSample), ParseError> {
        let mut fields = rest.splitn(6, ',');
        let (Some(curve), Some(slides), Some(length)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(ParseError::malformed(
                "slider needs curve points, slides and a length",
            ));
        };
        let mut anchors = curve.split('|');
        let letter = anchors.next().unwrap_or_default();
        let curve_type = letter
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid("curve type", letter))?;
        let curve_points = anchors
            .map(|point| {
                let (x, y) = point.split_once(':').ok_or_else(|| {
                    ParseError::malformed(format!("curve point `{point}` needs a colon"))
                })?;
                Ok((parse_float(x, "curve point")?, parse_float(y, "curve point")?))
            })
            .collect::<Result<_, ParseError>>()?;
        let params = Self {
            curve_type,
            curve_points,
            slides: parse_int(slides, "slides")?,
            length: parse_float(length, "slider length")?,
            edge_sounds: match fields.next() {
                Some(sounds) if !sounds.trim().is_empty() => parse_edge_sounds(sounds)?,
                _ => vec![],
            },
            edge_samples: match fields.next() {
                Some(samples) if !samples.trim().is_empty() => parse_edge_samples(samples)?,
                _ => vec![],
            },
        };
        let sample = HitSample::parse(fields.next().unwrap_or_default())?;
        Ok((params, sample))
    }

    fn write(&self, out: &mut String, sample: &HitSample) -> Result<(), SerializationError> {
        let letter: &'static str = self.curve_type.into();
        out.push(',');
        out.push_str(letter);
        for &(x, y) in &self.curve_points {
            let _ = write!(out, "|{}:{}", format_float(x)?, format_float(y)?);
        }
        let _ = write!(out, ",{},{}", self.slides, format_float(self.length)?);
        if self.edge_sounds.is_empty()
            && self.edge_samples.is_empty()
            && *sample == HitSample::default()
        {
            return Ok(());
        }
        let _ = write!(
            out,
            ",{},{},{}",
            render_edge_sounds(&self.edge_sounds),
            render_edge_samples(&self.edge_samples)?,
            sample.render()?
        );
        Ok(())
    }
}

/// What follows the header of a hit object line, by object kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitObjectParams {
    /// A hit circle, or a note in taiko, catch and mania.
    Circle,
    #[allow(missing_docs)]
    Slider(SliderParams),
    /// A spinner lasting until `end_time`.
    Spinner {
        /// End time in milliseconds.
        end_time: i32,
    },
    /// An osu!mania hold note lasting until `end_time`.
    Hold {
        /// End time in milliseconds.
        end_time: i32,
    },
}

/// A whole `[HitObjects]` line.
///
/// ```
/// use osu_fmt::{
///     config::{ParseConfig, RenderConfig},
///     hit_object::{HitObject, HitObjectParams},
/// };
///
/// let line = "256,192,3000,12,0,4000,0:0:0:0:";
/// let spinner = HitObject::parse(line, &ParseConfig::default()).unwrap();
/// assert_eq!(spinner.params, HitObjectParams::Spinner { end_time: 4000 });
/// assert_eq!(spinner.end_time(), 4000);
/// assert_eq!(spinner.render(&RenderConfig::default()).unwrap(), line);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObject {
    #[allow(missing_docs)]
    pub header: HitObjectHeader,
    #[allow(missing_docs)]
    pub params: HitObjectParams,
    /// Sample overrides of the whole object.
    pub sample: HitSample,
}

impl HitObject {
    /// Parses a line. The kind is taken from the first of the circle, slider, spinner and
    /// hold bits that is set. With a legacy format version the end times of spinners and
    /// hold notes move by the legacy offset like the start time.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] for missing fields and
    /// [`ParseError::InvalidFieldValue`] for an invalid value or a type without an object
    /// kind bit.
    pub fn parse(line: &str, config: &ParseConfig) -> Result<Self, ParseError> {
        let (header, rest) = HitObjectHeader::split(line, config)?;
        let shifted = |field: &str| -> Result<i32, ParseError> {
            Ok(parse_time(field)?.saturating_add(config.time_offset()))
        };
        let kind = header.kind;
        let (params, sample) = if kind.contains(HitObjectKind::CIRCLE) {
            (HitObjectParams::Circle, HitSample::parse(rest)?)
        } else if kind.contains(HitObjectKind::SLIDER) {
            let (params, sample) = SliderParams::parse(rest)?;
            (HitObjectParams::Slider(params), sample)
        } else if kind.contains(HitObjectKind::SPINNER) {
            let (end, sample) = rest.split_once(',').unwrap_or((rest, ""));
            let end_time = shifted(end)?;
            (HitObjectParams::Spinner { end_time }, HitSample::parse(sample)?)
        } else if kind.contains(HitObjectKind::HOLD) {
            let (end, sample) = rest.split_once(':').unwrap_or((rest, ""));
            let end_time = shifted(end)?;
            (HitObjectParams::Hold { end_time }, HitSample::parse(sample)?)
        } else {
            return Err(ParseError::invalid("hit object type", &kind.to_string()));
        };
        Ok(Self {
            header,
            params,
            sample,
        })
    }

    /// Renders the line. The kind bits of the header are written as they are. Sliders
    /// omit their edge and sample fields when all of them are empty or default.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] for a non-finite number, a sample filename without
    /// a line form or edge samples with extras.
    pub fn render(&self, config: &RenderConfig) -> Result<String, SerializationError> {
        let mut out = self.header.render(config)?;
        let offset = config.time_offset();
        match &self.params {
            HitObjectParams::Circle => {
                let _ = write!(out, ",{}", self.sample.render()?);
            }
            HitObjectParams::Slider(params) => params.write(&mut out, &self.sample)?,
            HitObjectParams::Spinner { end_time } => {
                let _ = write!(
                    out,
                    ",{},{}",
                    end_time.saturating_sub(offset),
                    self.sample.render()?
                );
            }
            HitObjectParams::Hold { end_time } => {
                let _ = write!(
                    out,
                    ",{}:{}",
                    end_time.saturating_sub(offset),
                    self.sample.render()?
                );
            }
        }
        Ok(out)
    }

    /// End time of spinners and hold notes, the start time otherwise. Slider duration
    /// depends on timing points and is not computed here.
    #[must_use]
    pub const fn end_time(&self) -> i32 {
        match self.params {
            HitObjectParams::Spinner { end_time } | HitObjectParams::Hold { end_time } => end_time,
            HitObjectParams::Circle | HitObjectParams::Slider(_) => self.header.time,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bitfield::BitFieldSet;

    #[test]
    fn header_round_trip() {
        let line = "64,320.5,1500,38,8,B|100:100,1,140";
        let (header, rest) = HitObjectHeader::split(line, &ParseConfig::default()).unwrap();
        assert!(header.kind.contains(HitObjectKind::SLIDER));
        assert_eq!(header.kind.combo_skip(), 2);
        assert!(header.hit_sound.get("Clap").unwrap());
        assert_eq!(rest, "B|100:100,1,140");
        assert_eq!(
            header.render(&RenderConfig::default()).unwrap(),
            "64,320.5,1500,38,8"
        );
    }

    #[test]
    fn header_errors() {
        assert!(matches!(
            HitObjectHeader::split("1,2,3,4", &ParseConfig::default()),
            Err(ParseError::MalformedLine(_))
        ));
        let (_, rest) = HitObjectHeader::split("1,2,3,1,0", &ParseConfig::default()).unwrap();
        assert_eq!(rest, "");
    }

    #[test]
    fn samples() {
        let sample = HitSample::parse("1:2:3:70:kick.wav").unwrap();
        assert_eq!(
            sample,
            HitSample {
                normal_set: SampleSet::Normal,
                addition_set: SampleSet::Soft,
                index: 3,
                volume: 70,
                filename: "kick.wav".into(),
            }
        );
        assert_eq!(sample.render().unwrap(), "1:2:3:70:kick.wav");
        assert_eq!(HitSample::parse("2:0").unwrap().render().unwrap(), "2:0:0:0:");
        assert_eq!(HitSample::parse("").unwrap(), HitSample::default());
    }

    #[test]
    fn edge_samples() {
        let edges = parse_edge_samples("1:0|2:3|0:0").unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[1].addition_set, SampleSet::Drum);
        assert_eq!(render_edge_samples(&edges).unwrap(), "1:0|2:3|0:0");
        assert!(matches!(
            parse_edge_samples("1:0|2"),
            Err(ParseError::MalformedLine(_))
        ));

        let sounds = parse_edge_sounds("2|0|8").unwrap();
        assert_eq!(sounds[2], HitSoundFlags::CLAP);
        assert_eq!(render_edge_sounds(&sounds), "2|0|8");
    }

    #[test]
    fn edge_extras_are_rejected() {
        for sample in [
            HitSample {
                index: 2,
                ..HitSample::default()
            },
            HitSample {
                volume: 50,
                ..HitSample::default()
            },
            HitSample {
                filename: "a.wav".into(),
                ..HitSample::default()
            },
        ] {
            assert!(matches!(
                render_edge_samples(&[sample]),
                Err(SerializationError::EdgeSampleExtras { .. })
            ));
        }
    }

    fn object(line: &str) -> HitObject {
        HitObject::parse(line, &ParseConfig::default()).unwrap()
    }

    #[test]
    fn object_kinds() {
        let circle = object("256,192,1000,5,2,0:0:0:0:");
        assert_eq!(circle.params, HitObjectParams::Circle);
        assert_eq!(circle.sample, HitSample::default());

        let slider = object("100,100,2000,2,0,B|200:200|300:100.5,2,240,2|0|8,1:0|0:0|3:2,0:0:0:0:");
        let HitObjectParams::Slider(params) = &slider.params else {
            panic!("expected a slider, got {:?}", slider.params);
        };
        assert_eq!(params.curve_type, CurveType::Bezier);
        assert_eq!(params.curve_points, [(200.0, 200.0), (300.0, 100.5)]);
        assert_eq!(params.slides, 2);
        assert_eq!(params.length, 240.0);
        assert_eq!(params.edge_sounds[2], HitSoundFlags::CLAP);
        assert_eq!(params.edge_samples[2].addition_set, SampleSet::Soft);

        let spinner = object("256,192,3000,12,0,4000,0:0:0:0:");
        assert_eq!(spinner.end_time(), 4000);

        let hold = object("64,192,5000,128,0,5500:1:0:0:0:");
        assert_eq!(hold.params, HitObjectParams::Hold { end_time: 5500 });
        assert_eq!(hold.sample.normal_set, SampleSet::Normal);
    }

    #[test]
    fn kind_dispatch_order() {
        // Circle wins over every other kind bit.
        let odd = object("0,0,0,3,0,0:0:0:0:");
        assert_eq!(odd.params, HitObjectParams::Circle);
        assert!(matches!(
            HitObject::parse("0,0,0,4,0", &ParseConfig::default()),
            Err(ParseError::InvalidFieldValue {
                field: "hit object type",
                ..
            })
        ));
    }

    #[test]
    fn object_lines_render_back() {
        for line in [
            "256,192,1000,5,2,0:0:0:0:",
            "100,100,2000,2,0,B|200:200|300:100.5,2,240,2|0|8,1:0|0:0|3:2,0:0:0:0:",
            "100,100,2000,6,0,P|150:50|200:100,1,157.5",
            "0,0,500,2,0,L|100:0,1,100,,,1:0:0:60:",
            "256,192,3000,12,0,4000,0:0:0:0:",
            "64,192,5000,128,0,5500:1:0:0:0:",
        ] {
            assert_eq!(object(line).render(&RenderConfig::default()).unwrap(), line);
        }
        assert_eq!(
            object("256,192,1000,1,0").render(&RenderConfig::default()).unwrap(),
            "256,192,1000,1,0,0:0:0:0:"
        );
    }

    #[test]
    fn legacy_end_times() {
        let legacy = ParseConfig::default().format_version(4);
        let spinner = HitObject::parse("256,192,100,8,0,900", &legacy).unwrap();
        assert_eq!(spinner.header.time, 124);
        assert_eq!(spinner.end_time(), 924);
        let hold = HitObject::parse("64,192,100,128,0,300:0:0:0:0:", &legacy).unwrap();
        assert_eq!(hold.end_time(), 324);
        assert_eq!(
            hold.render(&RenderConfig::default().format_version(4)).unwrap(),
            "64,192,100,128,0,300:0:0:0:0:"
        );
    }

    #[test]
    fn slider_errors() {
        for (line, expected) in [
            ("0,0,0,2,0,B|1:1,1", "malformed"),
            ("0,0,0,2,0,X|1:1,1,100", "curve type"),
            ("0,0,0,2,0,B|1,1,100", "malformed"),
            ("0,0,0,2,0,B|1:1,one,100", "slides"),
        ] {
            let error = HitObject::parse(line, &ParseConfig::default()).unwrap_err();
            let field = match error {
                ParseError::MalformedLine(_) => "malformed",
                ParseError::InvalidFieldValue { field, .. } => field,
                other => panic!("unexpected error {other:?}"),
            };
            assert_eq!(field, expected, "{line}");
        }
    }

    #[test]
    fn filenames_without_a_line_form() {
        let sample = HitSample {
            filename: "a,b.wav".into(),
            ..HitSample::default()
        };
        assert!(matches!(
            sample.render(),
            Err(SerializationError::UnrepresentablePath(_))
        ));
    }
}
