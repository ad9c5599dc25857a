//! Gameplay modifiers ("mods") packed in a 32-bit integer.
//!
//! [`ModifierSet`] is the integer stored in score and replay records. It is a
//! [`BitFieldSet`], so every modifier can also be reached by acronym or long name:
//!
//! ```
//! use osu_fmt::{bitfield::BitFieldSet, mods::{Mod, Mode, ModifierSet}};
//!
//! let mods: ModifierSet = "HD,HR,DT".parse().unwrap();
//! assert_eq!(mods.bits(), 88);
//! assert!(mods.get("Hidden").unwrap());
//! assert_eq!(
//!     mods.difficulty_changing_subset(Mode::Osu),
//!     ModifierSet::from_iter([Mod::HardRock, Mod::DoubleTime]),
//! );
//! ```

use std::{fmt, str::FromStr};

use strum::{EnumIter, FromRepr, IntoStaticStr};

use crate::bitfield::{BitFieldSet, FieldDef, FieldKind, UnknownFieldError};

/// A game mode, with its numeric code in beatmap and database files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Mode {
    /// osu!standard.
    #[default]
    Osu = 0,
    /// osu!taiko.
    Taiko = 1,
    /// osu!catch.
    Catch = 2,
    /// osu!mania.
    Mania = 3,
}

impl Mode {
    /// Looks up a mode by its numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }
}

/// A single named modifier. The discriminant is its bit index in [`ModifierSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromRepr, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Mod {
    #[strum(serialize = "NF")]
    NoFail = 0,
    #[strum(serialize = "EZ")]
    Easy = 1,
    #[strum(serialize = "TD")]
    TouchDevice = 2,
    #[strum(serialize = "HD")]
    Hidden = 3,
    #[strum(serialize = "HR")]
    HardRock = 4,
    #[strum(serialize = "SD")]
    SuddenDeath = 5,
    #[strum(serialize = "DT")]
    DoubleTime = 6,
    #[strum(serialize = "RL")]
    Relax = 7,
    #[strum(serialize = "HT")]
    HalfTime = 8,
    /// Always stored together with [`Mod::DoubleTime`].
    #[strum(serialize = "NC")]
    Nightcore = 9,
    #[strum(serialize = "FL")]
    Flashlight = 10,
    #[strum(serialize = "AT")]
    Autoplay = 11,
    #[strum(serialize = "SO")]
    SpunOut = 12,
    #[strum(serialize = "AP")]
    Autopilot = 13,
    /// Always stored together with [`Mod::SuddenDeath`].
    #[strum(serialize = "PF")]
    Perfect = 14,
    #[strum(serialize = "4K")]
    Key4 = 15,
    #[strum(serialize = "5K")]
    Key5 = 16,
    #[strum(serialize = "6K")]
    Key6 = 17,
    #[strum(serialize = "7K")]
    Key7 = 18,
    #[strum(serialize = "8K")]
    Key8 = 19,
    #[strum(serialize = "FI")]
    FadeIn = 20,
    #[strum(serialize = "RD")]
    Random = 21,
    #[strum(serialize = "CN")]
    Cinema = 22,
    #[strum(serialize = "TP")]
    TargetPractice = 23,
    #[strum(serialize = "9K")]
    Key9 = 24,
    #[strum(serialize = "Coop")]
    Coop = 25,
    #[strum(serialize = "1K")]
    Key1 = 26,
    #[strum(serialize = "3K")]
    Key3 = 27,
    #[strum(serialize = "2K")]
    Key2 = 28,
    #[strum(serialize = "V2")]
    ScoreV2 = 29,
    #[strum(serialize = "MR")]
    Mirror = 30,
}

impl Mod {
    /// The bit of this modifier.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self as u8
    }

    /// The short display name, such as `HD` or `Coop`.
    #[must_use]
    pub fn acronym(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Mod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.acronym())
    }
}

use Mod::*;

/// Order used when rendering a set for humans. `NM` is not listed; it stands for the
/// empty set.
pub const DISPLAY_ORDER: [Mod; 31] = [
    Easy,
    NoFail,
    HalfTime,
    HardRock,
    SuddenDeath,
    Perfect,
    DoubleTime,
    Nightcore,
    FadeIn,
    Hidden,
    Flashlight,
    SpunOut,
    TouchDevice,
    Mirror,
    Random,
    Coop,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Relax,
    Autopilot,
    Cinema,
    TargetPractice,
    Autoplay,
    ScoreV2,
];

/// Key-count modifiers in the priority order used for difficulty lookups.
const KEY_PRIORITY: [Mod; 10] = [
    Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9, Coop,
];

const KEY_MODS: &[Mod] = &KEY_PRIORITY;
const AUTO_MODS: &[Mod] = &[Relax, Autopilot, Autoplay, Cinema];
const UNRANKED_MANIA_MODS: &[Mod] = &[Random, Coop, Key1, Key2, Key3];
const UNRANKED_EXTRA: &[Mod] = &[TargetPractice, ScoreV2];
const SCORE_INCREASING: &[Mod] = &[Hidden, HardRock, DoubleTime, Flashlight, FadeIn];
const SCORE_DECREASING: &[Mod] = &[NoFail, Easy, HalfTime, SpunOut];

/// A combination of modifiers.
///
/// Any `u32` round-trips through [`ModifierSet::from_bits`] and [`ModifierSet::bits`],
/// including bit 31 which has no name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModifierSet(u32);

impl BitFieldSet for ModifierSet {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::bit("NF", 0).alias(&["NoFail"]),
        FieldDef::bit("EZ", 1).alias(&["Easy"]),
        FieldDef::bit("TD", 2).alias(&["TouchDevice", "TouchScreen"]),
        FieldDef::bit("HD", 3).alias(&["Hidden"]),
        FieldDef::bit("HR", 4).alias(&["HardRock"]),
        FieldDef::bit("SD", 5).alias(&["SuddenDeath"]),
        FieldDef::bit("DT", 6).alias(&["DoubleTime"]),
        FieldDef::bit("RL", 7).alias(&["Relax", "RX"]),
        FieldDef::bit("HT", 8).alias(&["HalfTime"]),
        FieldDef::implies("NC", 9, &["DT"]).alias(&["Nightcore", "NightCore"]),
        FieldDef::bit("FL", 10).alias(&["Flashlight"]),
        FieldDef::bit("AT", 11).alias(&["Autoplay", "Auto"]),
        FieldDef::bit("SO", 12).alias(&["SpunOut", "SpinOut"]),
        FieldDef::bit("AP", 13).alias(&["Autopilot", "AutoPilot"]),
        FieldDef::implies("PF", 14, &["SD"]).alias(&["Perfect"]),
        FieldDef::bit("4K", 15).alias(&["Key4", "Mania4K"]),
        FieldDef::bit("5K", 16).alias(&["Key5", "Mania5K"]),
        FieldDef::bit("6K", 17).alias(&["Key6", "Mania6K"]),
        FieldDef::bit("7K", 18).alias(&["Key7", "Mania7K"]),
        FieldDef::bit("8K", 19).alias(&["Key8", "Mania8K"]),
        FieldDef::bit("FI", 20).alias(&["FadeIn"]),
        FieldDef::bit("RD", 21).alias(&["Random"]),
        FieldDef::bit("CN", 22).alias(&["Cinema"]),
        FieldDef::bit("TP", 23).alias(&["TargetPractice"]),
        FieldDef::bit("9K", 24).alias(&["Key9", "Mania9K"]),
        FieldDef::bit("Coop", 25).alias(&["ManiaCoop"]),
        FieldDef::bit("1K", 26).alias(&["Key1", "Mania1K"]),
        FieldDef::bit("3K", 27).alias(&["Key3", "Mania3K"]),
        FieldDef::bit("2K", 28).alias(&["Key2", "Mania2K"]),
        FieldDef::bit("V2", 29).alias(&["ScoreV2"]),
        FieldDef::bit("MR", 30).alias(&["Mirror"]),
        FieldDef::any_of(
            "KeyMods",
            &["1K", "2K", "3K", "4K", "5K", "6K", "7K", "8K", "9K", "Coop"],
        ),
        FieldDef::any_of("AutoMods", &["RL", "AP", "AT", "CN"]),
        FieldDef::any_of("UnrankedManiaMods", &["RD", "Coop", "1K", "2K", "3K"]),
        FieldDef::any_of(
            "Unranked",
            &["AutoMods", "UnrankedManiaMods", "TP", "V2"],
        ),
        FieldDef::any_of("ScoreIncreasing", &["HD", "HR", "DT", "FL", "FI"]),
        FieldDef::any_of("ScoreDecreasing", &["NF", "EZ", "HT", "SO"]),
    ];

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

impl ModifierSet {
    /// No modifiers (`NM`).
    pub const NONE: Self = Self(0);

    /// Wraps a raw integer, as stored in score and replay records.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Whether no bit at all is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `m` is set.
    #[must_use]
    pub const fn contains(self, m: Mod) -> bool {
        self.0 & m.mask() != 0
    }

    /// Sets `m` and the modifiers it requires (`NC` requires `DT`, `PF` requires `SD`).
    pub fn insert(&mut self, m: Mod) {
        self.insert_bit(m as u8);
    }

    /// Clears `m` only. Clearing `DT` leaves `NC` set.
    pub fn remove(&mut self, m: Mod) {
        self.remove_bit(m as u8);
    }

    /// Returns a copy with `m` inserted.
    #[must_use]
    pub fn with(mut self, m: Mod) -> Self {
        self.insert(m);
        self
    }

    fn intersects(self, mods: &[Mod]) -> bool {
        mods.iter().any(|&m| self.contains(m))
    }

    /// Any key-count modifier or co-op.
    #[must_use]
    pub fn has_key_mods(self) -> bool {
        self.intersects(KEY_MODS)
    }

    /// Relax, autopilot, autoplay or cinema.
    #[must_use]
    pub fn has_auto_mods(self) -> bool {
        self.intersects(AUTO_MODS)
    }

    /// Random, co-op, 1K, 2K or 3K.
    #[must_use]
    pub fn has_unranked_mania_mods(self) -> bool {
        self.intersects(UNRANKED_MANIA_MODS)
    }

    /// Whether a score with these modifiers is excluded from rankings.
    #[must_use]
    pub fn is_unranked(self) -> bool {
        self.has_auto_mods() || self.has_unranked_mania_mods() || self.intersects(UNRANKED_EXTRA)
    }

    /// Negation of [`ModifierSet::is_unranked`].
    #[must_use]
    pub fn is_ranked(self) -> bool {
        !self.is_unranked()
    }

    /// Hidden, hard rock, double time, flashlight or fade in.
    #[must_use]
    pub fn is_score_increasing(self) -> bool {
        self.intersects(SCORE_INCREASING)
    }

    /// No fail, easy, half time or spun out.
    #[must_use]
    pub fn is_score_decreasing(self) -> bool {
        self.intersects(SCORE_DECREASING)
    }

    /// Projects the modifiers that change a beatmap's computed difficulty in `mode`.
    ///
    /// Keeps at most one of HT/DT (HT wins), one of HR/EZ (HR wins) and, in mania only,
    /// the first key modifier in the order 1K..9K, Coop. Everything else is dropped,
    /// including NC and PF. The result is used as a difficulty-cache key.
    #[must_use]
    pub fn difficulty_changing_subset(self, mode: Mode) -> Self {
        let mut ret = Self::NONE;
        if self.contains(HalfTime) {
            ret.0 |= HalfTime.mask();
        } else if self.contains(DoubleTime) {
            ret.0 |= DoubleTime.mask();
        }
        if self.contains(HardRock) {
            ret.0 |= HardRock.mask();
        } else if self.contains(Easy) {
            ret.0 |= Easy.mask();
        }
        if mode == Mode::Mania
            && let Some(key) = KEY_PRIORITY.iter().find(|&&key| self.contains(key))
        {
            ret.0 |= key.mask();
        }
        ret
    }

    /// The modifiers in display order, with `DT` hidden under `NC`.
    pub fn display_mods(self) -> impl Iterator<Item = Mod> + Clone {
        DISPLAY_ORDER.into_iter().filter(move |&m| {
            self.contains(m) && !(m == DoubleTime && self.contains(Nightcore))
        })
    }
}

impl From<u32> for ModifierSet {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<ModifierSet> for u32 {
    fn from(mods: ModifierSet) -> Self {
        mods.0
    }
}

impl From<Mod> for ModifierSet {
    fn from(m: Mod) -> Self {
        Self::NONE.with(m)
    }
}

impl FromIterator<Mod> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Mod>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mods = self.display_mods().peekable();
        if mods.peek().is_none() {
            return f.write_str("NM");
        }
        for (i, m) in mods.enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            f.write_str(m.acronym())?;
        }
        Ok(())
    }
}

impl fmt::Debug for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModifierSet({self})")
    }
}

impl FromStr for ModifierSet {
    type Err = UnknownFieldError;

    /// Parses comma-separated names (`HD,DT`, `Hidden,DoubleTime`) or concatenated
    /// acronyms (`HDDT`). `NM` and the empty string give the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ret = Self::NONE;
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            if part == "NM" {
                continue;
            }
            if let Ok(def) = Self::field_def(part)
                && matches!(def.kind, FieldKind::Bit { .. })
            {
                ret.set(def.name, true)?;
                continue;
            }
            let mut rest = part;
            while !rest.is_empty() {
                let (m, tail) = DISPLAY_ORDER
                    .iter()
                    .find_map(|&m| rest.strip_prefix(m.acronym()).map(|tail| (m, tail)))
                    .ok_or_else(|| UnknownFieldError::new(part, "modifier"))?;
                ret.insert(m);
                rest = tail;
            }
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn table_matches_typed_mods() {
        for m in Mod::iter() {
            match ModifierSet::field_def(m.acronym()).unwrap().kind {
                FieldKind::Bit { index, .. } => assert_eq!(index, m as u8, "{m}"),
                other => panic!("{m} is not a bit: {other:?}"),
            }
        }
        assert_eq!(DISPLAY_ORDER.len(), Mod::iter().count());
    }

    #[test]
    fn composites_match_table() {
        for m in Mod::iter() {
            let set = ModifierSet::from_bits(m.mask());
            assert_eq!(set.has_key_mods(), set.get("KeyMods").unwrap(), "{m}");
            assert_eq!(set.has_auto_mods(), set.get("AutoMods").unwrap(), "{m}");
            assert_eq!(
                set.has_unranked_mania_mods(),
                set.get("UnrankedManiaMods").unwrap(),
                "{m}"
            );
            assert_eq!(set.is_unranked(), set.get("Unranked").unwrap(), "{m}");
            assert_eq!(
                set.is_score_increasing(),
                set.get("ScoreIncreasing").unwrap(),
                "{m}"
            );
            assert_eq!(
                set.is_score_decreasing(),
                set.get("ScoreDecreasing").unwrap(),
                "{m}"
            );
        }
    }

    #[test]
    fn bits_round_trip() {
        for shift in 0..32 {
            let n = 1u32 << shift;
            assert_eq!(ModifierSet::from_bits(n).bits(), n);
        }
        for n in [0, u32::MAX, 0xdead_beef, 0x8000_0001, 88, 1 << 31] {
            assert_eq!(ModifierSet::from_bits(n).bits(), n);
            assert_eq!(u32::from(ModifierSet::from(n)), n);
        }
    }

    #[test]
    fn nightcore_keeps_double_time() {
        let mut mods = ModifierSet::NONE;
        mods.insert(Nightcore);
        assert!(mods.contains(DoubleTime));

        mods.remove(DoubleTime);
        assert!(mods.contains(Nightcore));
        assert!(!mods.contains(DoubleTime));

        let mut mods = ModifierSet::NONE;
        mods.set("PF", true).unwrap();
        assert!(mods.contains(SuddenDeath));
        mods.set("SD", false).unwrap();
        assert!(mods.contains(Perfect));
    }

    #[test]
    fn display_order() {
        assert_eq!(ModifierSet::NONE.to_string(), "NM");
        assert_eq!(ModifierSet::new(1 << 31).to_string(), "NM");
        let mods: ModifierSet = [Hidden, DoubleTime, HardRock, Easy].into_iter().collect();
        assert_eq!(mods.to_string(), "EZ,HR,DT,HD");
        assert_eq!(ModifierSet::from(Nightcore).to_string(), "NC");
        let mods: ModifierSet = [Key7, Coop, Autoplay, ScoreV2, Mirror].into_iter().collect();
        assert_eq!(mods.to_string(), "MR,Coop,7K,AT,V2");
        assert_eq!(format!("{:?}", ModifierSet::from(Perfect)), "ModifierSet(SD,PF)");
    }

    #[test]
    fn parse() {
        assert_eq!("NM".parse::<ModifierSet>().unwrap(), ModifierSet::NONE);
        assert_eq!("".parse::<ModifierSet>().unwrap(), ModifierSet::NONE);
        assert_eq!("HD,DT".parse::<ModifierSet>().unwrap().bits(), 72);
        assert_eq!("HDDT".parse::<ModifierSet>().unwrap().bits(), 72);
        assert_eq!("Hidden, DoubleTime".parse::<ModifierSet>().unwrap().bits(), 72);
        assert_eq!(
            "NC".parse::<ModifierSet>().unwrap(),
            ModifierSet::from_iter([Nightcore, DoubleTime])
        );
        assert_eq!(
            "Coop4K".parse::<ModifierSet>().unwrap(),
            ModifierSet::from_iter([Coop, Key4])
        );
        let err = "HDXX".parse::<ModifierSet>().unwrap_err();
        assert_eq!(err.name, "HDXX");

        let mods: ModifierSet = "EZ,HR,DT,HD,MR,Coop,7K".parse().unwrap();
        assert_eq!(mods.to_string().parse::<ModifierSet>().unwrap(), mods);
    }

    #[test]
    fn difficulty_subset() {
        let mods = ModifierSet::from_iter([HardRock, Hidden, DoubleTime]);
        assert_eq!(
            mods.difficulty_changing_subset(Mode::Osu),
            ModifierSet::from_iter([HardRock, DoubleTime])
        );

        let mods = ModifierSet::from_iter([HalfTime, Nightcore, Easy, HardRock, Flashlight]);
        assert_eq!(
            mods.difficulty_changing_subset(Mode::Taiko),
            ModifierSet::from_iter([HalfTime, HardRock])
        );

        let mods = ModifierSet::from_iter([Key7, Key2, Coop, SpunOut]);
        assert_eq!(
            mods.difficulty_changing_subset(Mode::Mania),
            ModifierSet::from(Key2)
        );
        assert_eq!(
            mods.difficulty_changing_subset(Mode::Catch),
            ModifierSet::NONE
        );
        assert_eq!(
            ModifierSet::from(Coop).difficulty_changing_subset(Mode::Mania),
            ModifierSet::from(Coop)
        );
    }

    #[test]
    fn difficulty_subset_is_idempotent() {
        let allowed = HalfTime.mask()
            | DoubleTime.mask()
            | HardRock.mask()
            | Easy.mask()
            | KEY_PRIORITY.iter().fold(0, |acc, m| acc | m.mask());
        let mut state = 0x2545_f491_u32;
        for _ in 0..2000 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            for mode in [Mode::Osu, Mode::Taiko, Mode::Catch, Mode::Mania] {
                let once = ModifierSet::new(state).difficulty_changing_subset(mode);
                assert_eq!(once.difficulty_changing_subset(mode), once);
                assert_eq!(once.bits() & !allowed, 0);
                assert!(!once.contains(Hidden) && !once.contains(Flashlight));
                assert!(!once.contains(SpunOut));
            }
        }
    }

    #[test]
    fn ranked() {
        assert!(ModifierSet::from_iter([Hidden, HardRock]).is_ranked());
        assert!(ModifierSet::from(Relax).is_unranked());
        assert!(ModifierSet::from(Key2).is_unranked());
        assert!(!ModifierSet::from(Key4).is_unranked());
        assert!(ModifierSet::from(ScoreV2).is_unranked());
        assert!(ModifierSet::from(TargetPractice).is_unranked());
        assert!(ModifierSet::from(FadeIn).is_score_increasing());
        assert!(ModifierSet::from(SpunOut).is_score_decreasing());
    }

    #[test]
    fn members_in_declaration_order() {
        let mods = ModifierSet::from_iter([Mirror, Hidden, NoFail]);
        assert_eq!(mods.members().collect::<Vec<_>>(), ["NF", "HD", "MR"]);
        assert_eq!(mods.members().clone().count(), 3);
    }
}
