//! The `key: value` sections of a beatmap: `[General]`, `[Editor]`, `[Metadata]`,
//! `[Difficulty]` and `[Colours]`.
//!
//! Each section type applies one pair at a time through [`KeyValueSection::set`], so
//! unknown keys from newer clients are skipped instead of failing the file.

use std::{collections::BTreeMap, fmt::Write as _};

use itertools::Itertools;
use strum::{EnumIter, EnumString, FromRepr, IntoStaticStr, IntoEnumIterator};

use crate::{
    error::{ParseError, SerializationError},
    flags::SampleSet,
    mods::Mode,
    storyboard::Rgb,
    util::{format_float, parse_float, parse_int},
};

/// A section of `key: value` lines.
pub trait KeyValueSection {
    /// The name between the brackets of the section header.
    const NAME: &'static str;

    /// Applies one pair. Returns `false` for a key the section does not know.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidFieldValue`] when a known key has an invalid value.
    fn set(&mut self, key: &str, value: &str) -> Result<bool, ParseError>;

    /// Writes the section body, one line per pair.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::NonFiniteNumber`] for a NaN or infinite number.
    fn write_pairs(&self, out: &mut String) -> Result<(), SerializationError>;
}

fn parse_bool(value: &str, what: &'static str) -> Result<bool, ParseError> {
    Ok(parse_int::<i32>(value, what)? != 0)
}

/// Countdown before the first hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Countdown {
    #[allow(missing_docs)]
    None = 0,
    #[allow(missing_docs)]
    #[default]
    Normal = 1,
    #[allow(missing_docs)]
    Half = 2,
    #[allow(missing_docs)]
    Double = 3,
}

/// Where hit circle overlays draw relative to the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayPosition {
    /// Use the skin's setting.
    #[default]
    NoChange,
    #[allow(missing_docs)]
    Below,
    #[allow(missing_docs)]
    Above,
}

/// The `[General]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct General {
    /// Audio file relative to the beatmap folder.
    pub audio_filename: String,
    /// Milliseconds of silence before the audio starts.
    pub audio_lead_in: i32,
    /// MD5 of the audio file. Deprecated.
    pub audio_hash: String,
    /// Song select preview start in milliseconds, -1 for the default.
    pub preview_time: i32,
    #[allow(missing_docs)]
    pub countdown: Countdown,
    /// Sample set of hit objects without a timing point override. Written by name.
    pub sample_set: SampleSet,
    /// How close objects must be to stack, `0..=1`.
    pub stack_leniency: f64,
    #[allow(missing_docs)]
    pub mode: Mode,
    #[allow(missing_docs)]
    pub letterbox_in_breaks: bool,
    /// Whether the storyboard draws under combo fire.
    pub story_fire_in_front: bool,
    /// Whether the storyboard may load sprites from the skin.
    pub use_skin_sprites: bool,
    /// Deprecated.
    pub always_show_playfield: bool,
    #[allow(missing_docs)]
    pub overlay_position: OverlayPosition,
    /// Preferred skin name, empty for none.
    pub skin_preference: String,
    /// Whether a flashing colours warning shows before the map.
    pub epilepsy_warning: bool,
    /// Beats the countdown is moved earlier.
    pub countdown_offset: i32,
    /// osu!mania N+1 key layout.
    pub special_style: bool,
    #[allow(missing_docs)]
    pub widescreen_storyboard: bool,
    /// Whether samples speed up with rate-changing mods.
    pub samples_match_playback_rate: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            audio_filename: String::new(),
            audio_lead_in: 0,
            audio_hash: String::new(),
            preview_time: -1,
            countdown: Countdown::Normal,
            sample_set: SampleSet::Normal,
            stack_leniency: 0.7,
            mode: Mode::Osu,
            letterbox_in_breaks: false,
            story_fire_in_front: true,
            use_skin_sprites: false,
            always_show_playfield: false,
            overlay_position: OverlayPosition::NoChange,
            skin_preference: String::new(),
            epilepsy_warning: false,
            countdown_offset: 0,
            special_style: false,
            widescreen_storyboard: false,
            samples_match_playback_rate: false,
        }
    }
}

impl KeyValueSection for General {
    const NAME: &'static str = "General";

    fn set(&mut self, key: &str, value: &str) -> Result<bool, ParseError> {
        match key {
            "AudioFilename" => value.clone_into(&mut self.audio_filename),
            "AudioLeadIn" => self.audio_lead_in = parse_int(value, "audio lead-in")?,
            "AudioHash" => value.clone_into(&mut self.audio_hash),
            "PreviewTime" => self.preview_time = parse_int(value, "preview time")?,
            "Countdown" => {
                self.countdown = parse_int(value, "countdown")
                    .ok()
                    .and_then(Countdown::from_repr)
                    .ok_or_else(|| ParseError::invalid("countdown", value))?;
            }
            "SampleSet" => {
                self.sample_set = SampleSet::iter()
                    .find(|&set| <&str>::from(set) == value)
                    .ok_or_else(|| ParseError::invalid("sample set", value))?;
            }
            "StackLeniency" => self.stack_leniency = parse_float(value, "stack leniency")?,
            "Mode" => {
                self.mode = parse_int(value, "mode")
                    .ok()
                    .and_then(Mode::from_code)
                    .ok_or_else(|| ParseError::invalid("mode", value))?;
            }
            "LetterboxInBreaks" => {
                self.letterbox_in_breaks = parse_bool(value, "letterbox in breaks")?;
            }
            "StoryFireInFront" => {
                self.story_fire_in_front = parse_bool(value, "story fire in front")?;
            }
            "UseSkinSprites" => self.use_skin_sprites = parse_bool(value, "use skin sprites")?,
            "AlwaysShowPlayfield" => {
                self.always_show_playfield = parse_bool(value, "always show playfield")?;
            }
            "OverlayPosition" => {
                self.overlay_position = value
                    .parse()
                    .map_err(|_| ParseError::invalid("overlay position", value))?;
            }
            "SkinPreference" => value.clone_into(&mut self.skin_preference),
            "EpilepsyWarning" => self.epilepsy_warning = parse_bool(value, "epilepsy warning")?,
            "CountdownOffset" => self.countdown_offset = parse_int(value, "countdown offset")?,
            "SpecialStyle" => self.special_style = parse_bool(value, "special style")?,
            "WidescreenStoryboard" => {
                self.widescreen_storyboard = parse_bool(value, "widescreen storyboard")?;
            }
            "SamplesMatchPlaybackRate" => {
                self.samples_match_playback_rate =
                    parse_bool(value, "samples match playback rate")?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Writes only the keys that differ from their defaults.
    fn write_pairs(&self, out: &mut String) -> Result<(), SerializationError> {
        let default = Self::default();
        if !self.audio_filename.is_empty() {
            let _ = writeln!(out, "AudioFilename: {}", self.audio_filename);
        }
        if self.audio_lead_in != 0 {
            let _ = writeln!(out, "AudioLeadIn: {}", self.audio_lead_in);
        }
        if !self.audio_hash.is_empty() {
            let _ = writeln!(out, "AudioHash: {}", self.audio_hash);
        }
        if self.preview_time != default.preview_time {
            let _ = writeln!(out, "PreviewTime: {}", self.preview_time);
        }
        if self.countdown != default.countdown {
            let _ = writeln!(out, "Countdown: {}", self.countdown as u8);
        }
        if self.sample_set != default.sample_set {
            let _ = writeln!(out, "SampleSet: {}", <&str>::from(self.sample_set));
        }
        if self.stack_leniency.to_bits() != default.stack_leniency.to_bits() {
            let _ = writeln!(out, "StackLeniency: {}", format_float(self.stack_leniency)?);
        }
        if self.mode != default.mode {
            let _ = writeln!(out, "Mode: {}", self.mode as u8);
        }
        let flags = [
            ("LetterboxInBreaks", self.letterbox_in_breaks, false),
            ("StoryFireInFront", self.story_fire_in_front, true),
            ("UseSkinSprites", self.use_skin_sprites, false),
            ("AlwaysShowPlayfield", self.always_show_playfield, false),
        ];
        for (key, value, default) in flags {
            if value != default {
                let _ = writeln!(out, "{key}: {}", u8::from(value));
            }
        }
        if self.overlay_position != default.overlay_position {
            let _ = writeln!(
                out,
                "OverlayPosition: {}",
                <&str>::from(self.overlay_position)
            );
        }
        if !self.skin_preference.is_empty() {
            let _ = writeln!(out, "SkinPreference: {}", self.skin_preference);
        }
        if self.epilepsy_warning {
            out.push_str("EpilepsyWarning: 1\n");
        }
        if self.countdown_offset != 0 {
            let _ = writeln!(out, "CountdownOffset: {}", self.countdown_offset);
        }
        let flags = [
            ("SpecialStyle", self.special_style),
            ("WidescreenStoryboard", self.widescreen_storyboard),
            ("SamplesMatchPlaybackRate", self.samples_match_playback_rate),
        ];
        for (key, _) in flags.iter().filter(|(_, value)| *value) {
            let _ = writeln!(out, "{key}: 1");
        }
        Ok(())
    }
}

/// The `[Editor]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Editor {
    /// Bookmark times in milliseconds.
    pub bookmarks: Vec<i32>,
    /// Distance snap multiplier.
    pub distance_spacing: f64,
    /// Beat snap divisor.
    pub beat_divisor: u32,
    #[allow(missing_docs)]
    pub grid_size: u32,
    #[allow(missing_docs)]
    pub timeline_zoom: f64,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            bookmarks: vec![],
            distance_spacing: 1.0,
            beat_divisor: 4,
            grid_size: 4,
            timeline_zoom: 1.0,
        }
    }
}

impl KeyValueSection for Editor {
    const NAME: &'static str = "Editor";

    fn set(&mut self, key: &str, value: &str) -> Result<bool, ParseError> {
        match key {
            "Bookmarks" => {
                self.bookmarks = value
                    .split(',')
                    .filter(|time| !time.trim().is_empty())
                    .map(|time| parse_int(time, "bookmark"))
                    .collect::<Result<_, _>>()?;
            }
            "DistanceSpacing" => self.distance_spacing = parse_float(value, "distance spacing")?,
            "BeatDivisor" => self.beat_divisor = parse_int(value, "beat divisor")?,
            "GridSize" => self.grid_size = parse_int(value, "grid size")?,
            "TimelineZoom" => self.timeline_zoom = parse_float(value, "timeline zoom")?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn write_pairs(&self, out: &mut String) -> Result<(), SerializationError> {
        if !self.bookmarks.is_empty() {
            let _ = writeln!(out, "Bookmarks: {}", self.bookmarks.iter().join(","));
        }
        let _ = writeln!(out, "DistanceSpacing: {}", format_float(self.distance_spacing)?);
        let _ = writeln!(out, "BeatDivisor: {}", self.beat_divisor);
        let _ = writeln!(out, "GridSize: {}", self.grid_size);
        let _ = writeln!(out, "TimelineZoom: {}", format_float(self.timeline_zoom)?);
        Ok(())
    }
}

/// The `[Metadata]` section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Romanised title.
    pub title: String,
    #[allow(missing_docs)]
    pub title_unicode: String,
    /// Romanised artist.
    pub artist: String,
    #[allow(missing_docs)]
    pub artist_unicode: String,
    /// Mapper name.
    pub creator: String,
    /// Difficulty name.
    pub version: String,
    /// Original media the song comes from.
    pub source: String,
    /// Space-separated search terms.
    pub tags: String,
    /// Online difficulty id, 0 when not submitted.
    pub beatmap_id: i32,
    /// Online set id, -1 when not submitted.
    pub beatmap_set_id: i32,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_unicode: String::new(),
            artist: String::new(),
            artist_unicode: String::new(),
            creator: String::new(),
            version: String::new(),
            source: String::new(),
            tags: String::new(),
            beatmap_id: 0,
            beatmap_set_id: -1,
        }
    }
}

impl KeyValueSection for Metadata {
    const NAME: &'static str = "Metadata";

    fn set(&mut self, key: &str, value: &str) -> Result<bool, ParseError> {
        let text = match key {
            "Title" => &mut self.title,
            "TitleUnicode" => &mut self.title_unicode,
            "Artist" => &mut self.artist,
            "ArtistUnicode" => &mut self.artist_unicode,
            "Creator" => &mut self.creator,
            "Version" => &mut self.version,
            "Source" => &mut self.source,
            "Tags" => &mut self.tags,
            "BeatmapID" => {
                self.beatmap_id = parse_int(value, "beatmap id")?;
                return Ok(true);
            }
            "BeatmapSetID" => {
                self.beatmap_set_id = parse_int(value, "beatmap set id")?;
                return Ok(true);
            }
            _ => return Ok(false),
        };
        value.clone_into(text);
        Ok(true)
    }

    fn write_pairs(&self, out: &mut String) -> Result<(), SerializationError> {
        let texts = [
            ("Title", &self.title),
            ("TitleUnicode", &self.title_unicode),
            ("Artist", &self.artist),
            ("ArtistUnicode", &self.artist_unicode),
            ("Creator", &self.creator),
            ("Version", &self.version),
            ("Source", &self.source),
            ("Tags", &self.tags),
        ];
        for (key, value) in texts {
            let _ = writeln!(out, "{key}:{value}");
        }
        let _ = writeln!(out, "BeatmapID:{}", self.beatmap_id);
        let _ = writeln!(out, "BeatmapSetID:{}", self.beatmap_set_id);
        Ok(())
    }
}

/// The `[Difficulty]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Difficulty {
    #[allow(missing_docs)]
    pub hp_drain_rate: f64,
    #[allow(missing_docs)]
    pub circle_size: f64,
    #[allow(missing_docs)]
    pub overall_difficulty: f64,
    #[allow(missing_docs)]
    pub approach_rate: f64,
    /// Base slider velocity in hundreds of osu!pixels per beat.
    pub slider_multiplier: f64,
    /// Slider ticks per beat.
    pub slider_tick_rate: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            hp_drain_rate: 5.0,
            circle_size: 5.0,
            overall_difficulty: 5.0,
            approach_rate: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
        }
    }
}

impl KeyValueSection for Difficulty {
    const NAME: &'static str = "Difficulty";

    fn set(&mut self, key: &str, value: &str) -> Result<bool, ParseError> {
        let (target, what) = match key {
            "HPDrainRate" => (&mut self.hp_drain_rate, "HP drain rate"),
            "CircleSize" => (&mut self.circle_size, "circle size"),
            "OverallDifficulty" => (&mut self.overall_difficulty, "overall difficulty"),
            "ApproachRate" => (&mut self.approach_rate, "approach rate"),
            "SliderMultiplier" => (&mut self.slider_multiplier, "slider multiplier"),
            "SliderTickRate" => (&mut self.slider_tick_rate, "slider tick rate"),
            _ => return Ok(false),
        };
        *target = parse_float(value, what)?;
        Ok(true)
    }

    fn write_pairs(&self, out: &mut String) -> Result<(), SerializationError> {
        let values = [
            ("HPDrainRate", self.hp_drain_rate),
            ("CircleSize", self.circle_size),
            ("OverallDifficulty", self.overall_difficulty),
            ("ApproachRate", self.approach_rate),
            ("SliderMultiplier", self.slider_multiplier),
            ("SliderTickRate", self.slider_tick_rate),
        ];
        for (key, value) in values {
            let _ = writeln!(out, "{key}:{}", format_float(value)?);
        }
        Ok(())
    }
}

/// The `[Colours]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colours {
    /// Combo colours by their `ComboN` number.
    pub combo: BTreeMap<u32, Rgb>,
    /// Colour of the slider track, replacing the combo colour.
    pub slider_track_override: Option<Rgb>,
    #[allow(missing_docs)]
    pub slider_border: Option<Rgb>,
    #[allow(missing_docs)]
    pub slider_body: Option<Rgb>,
}

impl Colours {
    /// Whether no colour is set, in which case the section is not written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combo.is_empty()
            && self.slider_track_override.is_none()
            && self.slider_border.is_none()
            && self.slider_body.is_none()
    }
}

fn parse_colour(value: &str) -> Result<Rgb, ParseError> {
    let fields: Vec<&str> = value.split(',').collect();
    let [r, g, b] = fields.as_slice() else {
        return Err(ParseError::invalid("colour", value));
    };
    Rgb::from_fields(r, g, b)
}

impl KeyValueSection for Colours {
    const NAME: &'static str = "Colours";

    fn set(&mut self, key: &str, value: &str) -> Result<bool, ParseError> {
        let slot = match key {
            "SliderTrackOverride" => &mut self.slider_track_override,
            "SliderBorder" => &mut self.slider_border,
            "SliderBody" => &mut self.slider_body,
            _ => {
                let Some(number) = key.strip_prefix("Combo") else {
                    return Ok(false);
                };
                let number = parse_int(number, "combo number")?;
                self.combo.insert(number, parse_colour(value)?);
                return Ok(true);
            }
        };
        *slot = Some(parse_colour(value)?);
        Ok(true)
    }

    fn write_pairs(&self, out: &mut String) -> Result<(), SerializationError> {
        for (number, colour) in &self.combo {
            let _ = writeln!(out, "Combo{number} : {colour}");
        }
        let named = [
            ("SliderTrackOverride", self.slider_track_override),
            ("SliderBorder", self.slider_border),
            ("SliderBody", self.slider_body),
        ];
        for (key, colour) in named {
            if let Some(colour) = colour {
                let _ = writeln!(out, "{key} : {colour}");
            }
        }
        Ok(())
    }
}
