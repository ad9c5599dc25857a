//! Trigger names of `T` commands.
//!
//! A trigger is one of the fixed names `Passing`, `Failing` and `HitObjectHit`, or a
//! hit-sound trigger spelled `HitSound[SampleSet][AdditionSet][SoundType][CustomIndex]`:
//!
//! ```
//! use osu_fmt::{
//!     flags::{HitSoundFlags, SampleSet},
//!     storyboard::trigger::{HitSoundTrigger, Trigger},
//! };
//!
//! let trigger: Trigger = "HitSoundSoftClap2".parse().unwrap();
//! assert_eq!(
//!     trigger,
//!     Trigger::HitSound(HitSoundTrigger {
//!         sample_set: SampleSet::Soft,
//!         addition_set: SampleSet::None,
//!         sound_type: HitSoundFlags::CLAP,
//!         custom_index: 2,
//!     })
//! );
//! assert_eq!(trigger.to_string(), "HitSoundSoftClap2");
//! ```
//!
//! Two triggers are equal when they render to the same name, so `HitSoundNoneClap` equals
//! `HitSoundClap`. Rendering spells out `None` sets when the `Normal` sound would
//! otherwise read as a set name: `HitSoundDrumNoneNormal`, `HitSoundNoneNoneNormal`.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    flags::{HitSoundFlags, SampleSet},
    util::StrExtension,
};

/// A trigger name matching no known combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown trigger name `{name}`")]
pub struct UnknownTriggerNameError {
    /// The name as written.
    pub name: String,
}

const HIT_SOUND_PREFIX: &str = "HitSound";

const SAMPLE_SET_NAMES: [(&str, SampleSet); 5] = [
    ("Any", SampleSet::All),
    ("None", SampleSet::None),
    ("Normal", SampleSet::Normal),
    ("Soft", SampleSet::Soft),
    ("Drum", SampleSet::Drum),
];

const SOUND_TYPE_NAMES: [(&str, HitSoundFlags); 5] = [
    ("None", HitSoundFlags::new(0)),
    ("Normal", HitSoundFlags::NORMAL),
    ("Whistle", HitSoundFlags::WHISTLE),
    ("Finish", HitSoundFlags::FINISH),
    ("Clap", HitSoundFlags::CLAP),
];

/// Consumes the longest table entry that prefixes `rest`, ignoring case.
fn match_longest<'s, T: Copy>(rest: &'s str, table: &[(&str, T)]) -> Option<(T, &'s str)> {
    table
        .iter()
        .filter(|(name, _)| rest.starts_with_ignore_case(name))
        .max_by_key(|(name, _)| name.len())
        .and_then(|&(name, value)| Some((value, rest.strip_prefix_ignore_case(name)?)))
}

fn sample_set_name(set: SampleSet) -> &'static str {
    SAMPLE_SET_NAMES
        .iter()
        .find(|&&(_, s)| s == set)
        .map_or("", |&(name, _)| name)
}

/// The structured form of a `HitSound...` trigger.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSoundTrigger {
    /// Sample set the hit must use. [`SampleSet::All`] is spelled `Any`.
    pub sample_set: SampleSet,
    /// Addition set the hit must use.
    pub addition_set: SampleSet,
    /// Sounds the hit must play. Only the first set flag is rendered.
    pub sound_type: HitSoundFlags,
    /// Custom sample index, 0 for any.
    pub custom_index: u32,
}

impl HitSoundTrigger {
    /// Decodes the part after `HitSound`.
    fn decode(rest: &str) -> Option<Self> {
        let mut ret = Self::default();
        let mut rest = rest;
        if let Some((set, tail)) = match_longest(rest, &SAMPLE_SET_NAMES) {
            ret.sample_set = set;
            rest = tail;
            if let Some((addition, tail)) = match_longest(rest, &SAMPLE_SET_NAMES) {
                ret.addition_set = addition;
                rest = tail;
            }
        }
        if let Some((sound, tail)) = match_longest(rest, &SOUND_TYPE_NAMES) {
            ret.sound_type = sound;
            rest = tail;
        }
        if !rest.is_empty() {
            if !rest.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            ret.custom_index = rest.parse().ok()?;
        }
        Some(ret)
    }

    /// The parts actually written, after the recomposition rules.
    fn normalized(&self) -> (SampleSet, SampleSet, HitSoundFlags) {
        let (mut sample_set, mut addition_set) = (self.sample_set, self.addition_set);
        if !self.sound_type.is_empty()
            && sample_set == SampleSet::All
            && addition_set != SampleSet::None
        {
            std::mem::swap(&mut sample_set, &mut addition_set);
        }
        if sample_set == SampleSet::None {
            addition_set = SampleSet::None;
        }
        let sound_type = SOUND_TYPE_NAMES
            .iter()
            .skip(1)
            .map(|&(_, flag)| flag)
            .find(|&flag| self.sound_type.contains(flag))
            .unwrap_or_default();
        (sample_set, addition_set, sound_type)
    }
}

impl fmt::Display for HitSoundTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sample_set, addition_set, sound_type) = self.normalized();
        // A bare `Normal` sound right after the sets would decode as a set name.
        let spell_none = sound_type == HitSoundFlags::NORMAL && addition_set == SampleSet::None;
        f.write_str(HIT_SOUND_PREFIX)?;
        for set in [sample_set, addition_set] {
            if set != SampleSet::None || spell_none {
                f.write_str(sample_set_name(set))?;
            }
        }
        if let Some(&(name, _)) = SOUND_TYPE_NAMES
            .iter()
            .skip(1)
            .find(|&&(_, flag)| flag == sound_type)
        {
            f.write_str(name)?;
        }
        if self.custom_index != 0 {
            write!(f, "{}", self.custom_index)?;
        }
        Ok(())
    }
}

impl PartialEq for HitSoundTrigger {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized() && self.custom_index == other.custom_index
    }
}

impl Eq for HitSoundTrigger {}

impl Hash for HitSoundTrigger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
        self.custom_index.hash(state);
    }
}

/// The condition that starts a `T` command group.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub enum Trigger {
    /// The player is passing (health above half).
    Passing,
    /// The player is failing.
    Failing,
    /// Any hit object is hit.
    HitObjectHit,
    /// A hit object playing a matching hit sound is hit.
    HitSound(HitSoundTrigger),
}

impl Trigger {
    const NAMED: [(&'static str, Self); 3] = [
        ("Passing", Self::Passing),
        ("Failing", Self::Failing),
        ("HitObjectHit", Self::HitObjectHit),
    ];

    /// Decodes a trigger name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTriggerNameError`] when the name is neither a fixed trigger nor a
    /// well-formed `HitSound` name.
    pub fn decode(name: &str) -> Result<Self, UnknownTriggerNameError> {
        let unknown = || UnknownTriggerNameError {
            name: name.to_owned(),
        };
        if let Some(&(_, trigger)) = Self::NAMED
            .iter()
            .find(|(fixed, _)| fixed.eq_ignore_ascii_case(name))
        {
            return Ok(trigger);
        }
        let rest = name
            .strip_prefix_ignore_case(HIT_SOUND_PREFIX)
            .ok_or_else(unknown)?;
        HitSoundTrigger::decode(rest)
            .map(Self::HitSound)
            .ok_or_else(unknown)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passing => f.write_str("Passing"),
            Self::Failing => f.write_str("Failing"),
            Self::HitObjectHit => f.write_str("HitObjectHit"),
            Self::HitSound(hit_sound) => hit_sound.fmt(f),
        }
    }
}

impl FromStr for Trigger {
    type Err = UnknownTriggerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<String> for Trigger {
    type Error = UnknownTriggerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        trigger.to_string()
    }
}

impl PartialEq for Trigger {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::HitSound(a), Self::HitSound(b)) => a == b,
            (Self::Passing, Self::Passing)
            | (Self::Failing, Self::Failing)
            | (Self::HitObjectHit, Self::HitObjectHit) => true,
            _ => false,
        }
    }
}

impl Eq for Trigger {}

impl Hash for Trigger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Self::HitSound(hit_sound) = self {
            hit_sound.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn hit_sound(
        sample_set: SampleSet,
        addition_set: SampleSet,
        sound_type: HitSoundFlags,
        custom_index: u32,
    ) -> Trigger {
        Trigger::HitSound(HitSoundTrigger {
            sample_set,
            addition_set,
            sound_type,
            custom_index,
        })
    }

    #[test]
    fn fixed_names() {
        assert_eq!("Passing".parse::<Trigger>().unwrap(), Trigger::Passing);
        assert_eq!("failing".parse::<Trigger>().unwrap(), Trigger::Failing);
        assert_eq!(Trigger::HitObjectHit.to_string(), "HitObjectHit");
        assert_ne!(Trigger::Passing, Trigger::Failing);
    }

    #[test]
    fn decode_parts() {
        let trigger = Trigger::decode("HitSoundDrumWhistle").unwrap();
        assert_eq!(
            trigger,
            hit_sound(SampleSet::Drum, SampleSet::None, HitSoundFlags::WHISTLE, 0)
        );

        let Trigger::HitSound(parts) = Trigger::decode("HitSoundNormalSoftFinish12").unwrap()
        else {
            panic!("expected a hit sound trigger");
        };
        assert_eq!(parts.sample_set, SampleSet::Normal);
        assert_eq!(parts.addition_set, SampleSet::Soft);
        assert_eq!(parts.sound_type, HitSoundFlags::FINISH);
        assert_eq!(parts.custom_index, 12);

        assert_eq!(Trigger::decode("HitSound").unwrap().to_string(), "HitSound");
        assert_eq!(Trigger::decode("HitSound7").unwrap().to_string(), "HitSound7");
        assert_eq!(
            Trigger::decode("hitsoundsoftclap").unwrap().to_string(),
            "HitSoundSoftClap"
        );
    }

    #[test]
    fn unknown_names() {
        for name in ["", "Pass", "HitSoundClapX", "HitSoundSoft-1", "Hit", "Kiai"] {
            let err = Trigger::decode(name).unwrap_err();
            assert_eq!(err.name, name);
        }
    }

    #[test]
    fn recomposition() {
        let any_soft = hit_sound(SampleSet::All, SampleSet::Soft, HitSoundFlags::CLAP, 0);
        assert_eq!(any_soft.to_string(), "HitSoundSoftAnyClap");

        let forced = hit_sound(SampleSet::None, SampleSet::Drum, HitSoundFlags::CLAP, 0);
        assert_eq!(forced.to_string(), "HitSoundClap");
        assert_eq!(forced, Trigger::decode("HitSoundClap").unwrap());

        let first_flag = hit_sound(
            SampleSet::Soft,
            SampleSet::None,
            HitSoundFlags::CLAP | HitSoundFlags::WHISTLE,
            0,
        );
        assert_eq!(first_flag.to_string(), "HitSoundSoftWhistle");
    }

    #[test]
    fn round_trip_of_decoded_names() {
        for name in [
            "HitSoundSoftClap2",
            "HitSoundAnyDrumFinish",
            "HitSoundNoneNormal",
            "HitSoundNormalWhistle",
            "HitSoundDrumNone3",
            "HitSoundAnyClap",
        ] {
            let decoded = Trigger::decode(name).unwrap();
            let encoded = decoded.to_string();
            assert_eq!(Trigger::decode(&encoded).unwrap(), decoded, "{name}");
        }
        assert_eq!(
            Trigger::decode("HitSoundSoftClap2").unwrap().to_string(),
            "HitSoundSoftClap2"
        );
    }

    #[test]
    fn normal_sound_keeps_its_sets() {
        for (name, rendered) in [
            ("HitSoundDrumNoneNormal", "HitSoundDrumNoneNormal"),
            ("HitSoundNoneNoneNormal", "HitSoundNoneNoneNormal"),
            ("HitSoundAnyNoneNormal", "HitSoundAnyNoneNormal"),
            ("HitSoundSoftNoneNormal2", "HitSoundSoftNoneNormal2"),
            ("HitSoundNoneSoftNormal", "HitSoundNoneNoneNormal"),
            ("HitSoundDrumSoftNormal", "HitSoundDrumSoftNormal"),
        ] {
            let decoded = Trigger::decode(name).unwrap();
            assert_eq!(decoded.to_string(), rendered, "{name}");
            assert_eq!(Trigger::decode(rendered).unwrap(), decoded, "{name}");
        }
        assert_ne!(
            Trigger::decode("HitSoundDrumNoneNormal").unwrap(),
            Trigger::decode("HitSoundDrumNormal").unwrap()
        );
    }

    #[test]
    fn hash_follows_rendered_name() {
        use std::collections::HashSet;

        let set: HashSet<Trigger> = ["HitSoundClap", "HitSoundNoneClap", "HitSoundNoneDrumClap"]
            .into_iter()
            .map(|name| Trigger::decode(name).unwrap())
            .collect();
        assert_eq!(set.len(), 1);
    }
}
