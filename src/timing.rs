//! Lines of the `[TimingPoints]` section.

use crate::{
    config::{ParseConfig, RenderConfig},
    error::{ParseError, SerializationError},
    flags::{EffectFlags, SampleSet},
    util::{format_float, parse_float, parse_int},
};

/// A timing point: a tempo change when uninherited, a slider velocity and sample change
/// otherwise.
///
/// ```
/// use osu_fmt::{config::{ParseConfig, RenderConfig}, timing::TimingPoint};
///
/// let point = TimingPoint::parse("1000,500,4,2,0,80,1,1", &ParseConfig::default()).unwrap();
/// assert_eq!(point.bpm(), Some(120.0));
/// assert_eq!(point.render(&RenderConfig::default()).unwrap(), "1000,500,4,2,0,80,1,1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoint {
    /// Start time in milliseconds. May be fractional.
    pub time: f64,
    /// Milliseconds per beat when uninherited. Otherwise a negative inverse slider
    /// velocity percentage.
    pub beat_length: f64,
    /// Beats per measure.
    pub meter: u32,
    /// Default sample set of hit objects.
    pub sample_set: SampleSet,
    /// Custom sample index, 0 for the skin's samples.
    pub sample_index: u32,
    /// Volume percentage.
    pub volume: u32,
    /// Whether this point sets a new tempo.
    pub uninherited: bool,
    #[allow(missing_docs)]
    pub effects: EffectFlags,
}

impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_length: 1000.0,
            meter: 4,
            sample_set: SampleSet::None,
            sample_index: 0,
            volume: 100,
            uninherited: true,
            effects: EffectFlags::default(),
        }
    }
}

impl TimingPoint {
    /// Parses a line. Fields after `time,beatLength` may be omitted and take their
    /// defaults: meter 4, inherited sample set, index 0, volume 100, uninherited.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] with fewer than two fields and
    /// [`ParseError::InvalidFieldValue`] for a field of the wrong kind.
    pub fn parse(line: &str, config: &ParseConfig) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').collect();
        let [time, beat_length, rest @ ..] = fields.as_slice() else {
            return Err(ParseError::malformed("timing point needs a time and a beat length"));
        };
        let mut point = Self {
            time: parse_float(time, "time")? + f64::from(config.time_offset()),
            beat_length: parse_float(beat_length, "beat length")?,
            ..Self::default()
        };
        let mut rest = rest.iter();
        if let Some(meter) = rest.next() {
            point.meter = parse_int(meter, "meter")?;
        }
        if let Some(sample_set) = rest.next() {
            point.sample_set = parse_int(sample_set, "sample set")
                .ok()
                .and_then(SampleSet::from_code)
                .ok_or_else(|| ParseError::invalid("sample set", sample_set))?;
        }
        if let Some(index) = rest.next() {
            point.sample_index = parse_int(index, "sample index")?;
        }
        if let Some(volume) = rest.next() {
            point.volume = parse_int(volume, "volume")?;
        }
        if let Some(uninherited) = rest.next() {
            point.uninherited = parse_int::<i32>(uninherited, "uninherited")? != 0;
        }
        if let Some(effects) = rest.next() {
            point.effects = EffectFlags::new(parse_int(effects, "effects")?);
        }
        Ok(point)
    }

    /// Renders the full eight-field line.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::NonFiniteNumber`] for a NaN or infinite time or beat
    /// length.
    pub fn render(&self, config: &RenderConfig) -> Result<String, SerializationError> {
        Ok(format!(
            "{},{},{},{},{},{},{},{}",
            format_float(self.time - f64::from(config.time_offset()))?,
            format_float(self.beat_length)?,
            self.meter,
            self.sample_set,
            self.sample_index,
            self.volume,
            u8::from(self.uninherited),
            self.effects,
        ))
    }

    /// Beats per minute of an uninherited point.
    #[must_use]
    pub fn bpm(&self) -> Option<f64> {
        (self.uninherited && self.beat_length > 0.0).then(|| 60_000.0 / self.beat_length)
    }

    /// Slider velocity multiplier of an inherited point, clamped to `0.1..=10`.
    #[must_use]
    pub fn slider_velocity(&self) -> Option<f64> {
        (!self.uninherited && self.beat_length < 0.0)
            .then(|| (-100.0 / self.beat_length).clamp(0.1, 10.0))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bitfield::BitFieldSet;

    #[test]
    fn short_form() {
        let point = TimingPoint::parse("250,333.33", &ParseConfig::default()).unwrap();
        assert_eq!(point.meter, 4);
        assert!(point.uninherited);
        assert_eq!(
            point.render(&RenderConfig::default()).unwrap(),
            "250,333.33,4,0,0,100,1,0"
        );
    }

    #[test]
    fn inherited_points() {
        let point = TimingPoint::parse("5000,-50,4,3,1,60,0,9", &ParseConfig::default()).unwrap();
        assert_eq!(point.bpm(), None);
        assert_eq!(point.slider_velocity(), Some(2.0));
        assert_eq!(point.sample_set, SampleSet::Drum);
        assert!(point.effects.get("Kiai").unwrap());
        assert!(point.effects.contains(EffectFlags::OMIT_FIRST_BARLINE));
    }

    #[test]
    fn legacy_offset() {
        let point = TimingPoint::parse("100,500", &ParseConfig::default().format_version(3))
            .unwrap();
        assert_eq!(point.time, 124.0);
        assert_eq!(
            point
                .render(&RenderConfig::default().format_version(3))
                .unwrap(),
            "100,500,4,0,0,100,1,0"
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(
            TimingPoint::parse("100", &ParseConfig::default()),
            Err(ParseError::MalformedLine(_))
        ));
        assert!(matches!(
            TimingPoint::parse("100,500,4,7", &ParseConfig::default()),
            Err(ParseError::InvalidFieldValue { field: "sample set", .. })
        ));
    }
}
