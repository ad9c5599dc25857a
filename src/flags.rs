//! Small flag sets found in beatmap lines, all on [`BitFieldSet`].

use std::fmt;

use strum::{EnumIter, FromRepr, IntoStaticStr};

use crate::bitfield::{BitFieldSet, FieldDef};

/// The timbre family of a hit sound. Written as its numeric code in beatmap lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum SampleSet {
    /// Matches every sample set. Only meaningful in storyboard triggers.
    All = -1,
    /// Inherit from the timing point, also called "auto".
    #[default]
    None = 0,
    #[allow(missing_docs)]
    Normal = 1,
    #[allow(missing_docs)]
    Soft = 2,
    #[allow(missing_docs)]
    Drum = 3,
}

impl SampleSet {
    /// The numeric code.
    #[must_use]
    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Looks up a sample set by numeric code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        i8::try_from(code).ok().and_then(Self::from_repr)
    }
}

impl fmt::Display for SampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

macro_rules! flag_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw integer.
            #[must_use]
            pub const fn new(bits: u32) -> Self {
                Self(bits)
            }

            /// Whether every bit of `other` is set here.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Whether no bit is set.
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

flag_newtype!(
    /// Sounds played when an object is hit, the `hitSound` column of a hit object.
    HitSoundFlags
);

impl HitSoundFlags {
    /// The plain hit sound.
    pub const NORMAL: Self = Self(1);
    #[allow(missing_docs)]
    pub const WHISTLE: Self = Self(1 << 1);
    #[allow(missing_docs)]
    pub const FINISH: Self = Self(1 << 2);
    #[allow(missing_docs)]
    pub const CLAP: Self = Self(1 << 3);
}

impl BitFieldSet for HitSoundFlags {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::bit("Normal", 0),
        FieldDef::bit("Whistle", 1),
        FieldDef::bit("Finish", 2),
        FieldDef::bit("Clap", 3),
    ];

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

flag_newtype!(
    /// The `type` column of a hit object.
    ///
    /// Besides the object kind bits it carries `ComboSkip`, a 3-bit count of combo colours
    /// to skip at a new combo.
    HitObjectKind
);

impl HitObjectKind {
    #[allow(missing_docs)]
    pub const CIRCLE: Self = Self(1);
    #[allow(missing_docs)]
    pub const SLIDER: Self = Self(1 << 1);
    /// Starts a new combo.
    pub const NEW_COMBO: Self = Self(1 << 2);
    #[allow(missing_docs)]
    pub const SPINNER: Self = Self(1 << 3);
    /// osu!mania hold note.
    pub const HOLD: Self = Self(1 << 7);

    /// Number of combo colours skipped, `0..8`.
    #[must_use]
    pub const fn combo_skip(self) -> u8 {
        ((self.0 >> 4) & 0b111) as u8
    }

    /// Replaces the combo-colour skip count. Values above 7 keep their low 3 bits.
    #[must_use]
    pub const fn with_combo_skip(self, skip: u8) -> Self {
        Self((self.0 & !(0b111 << 4)) | ((skip as u32 & 0b111) << 4))
    }
}

impl BitFieldSet for HitObjectKind {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::bit("Circle", 0).alias(&["HitCircle"]),
        FieldDef::bit("Slider", 1),
        FieldDef::bit("NewCombo", 2).alias(&["ComboStart"]),
        FieldDef::bit("Spinner", 3),
        FieldDef::field("ComboSkip", 4, 3).alias(&["ComboColourSkip"]),
        FieldDef::bit("Hold", 7).alias(&["ManiaHold"]),
        FieldDef::any_of("Object", &["Circle", "Slider", "Spinner", "Hold"]),
    ];

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

flag_newtype!(
    /// The `effects` column of a timing point.
    EffectFlags
);

impl EffectFlags {
    /// Kiai time.
    pub const KIAI: Self = Self(1);
    /// Hides the first bar line of the section in osu!taiko and osu!mania.
    pub const OMIT_FIRST_BARLINE: Self = Self(1 << 3);
}

impl BitFieldSet for EffectFlags {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::bit("Kiai", 0),
        FieldDef::bit("OmitFirstBarline", 3),
    ];

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_codes() {
        assert_eq!(SampleSet::from_code(-1), Some(SampleSet::All));
        assert_eq!(SampleSet::from_code(3), Some(SampleSet::Drum));
        assert_eq!(SampleSet::from_code(4), None);
        assert_eq!(SampleSet::from_code(300), None);
        assert_eq!(SampleSet::Soft.to_string(), "2");
    }

    #[test]
    fn hit_sounds() {
        let sounds = HitSoundFlags::WHISTLE | HitSoundFlags::CLAP;
        assert_eq!(sounds.bits(), 10);
        assert_eq!(sounds.members().collect::<Vec<_>>(), ["Whistle", "Clap"]);
        assert!(sounds.contains(HitSoundFlags::CLAP));
        assert!(!sounds.contains(HitSoundFlags::NORMAL));
        assert_eq!(sounds.to_string(), "10");
    }

    #[test]
    fn combo_skip_field() {
        let kind = HitObjectKind::CIRCLE | HitObjectKind::NEW_COMBO;
        let kind = kind.with_combo_skip(5);
        assert_eq!(kind.bits(), 0b101_0101);
        assert_eq!(kind.get_field("ComboSkip").unwrap(), 5);
        assert_eq!(kind.combo_skip(), 5);

        let mut kind = kind;
        kind.set_field("ComboColourSkip", 9).unwrap();
        assert_eq!(kind.combo_skip(), 1);
        assert!(kind.get("Object").unwrap());
        assert!(!HitObjectKind::NEW_COMBO.get("Object").unwrap());
        assert_eq!(HitObjectKind::new(128).members().collect::<Vec<_>>(), ["Hold"]);
    }

    #[test]
    fn effects() {
        let effects = EffectFlags::new(9);
        assert!(effects.get("Kiai").unwrap());
        assert!(effects.get("OmitFirstBarline").unwrap());
        let mut effects = effects;
        effects.set("Kiai", false).unwrap();
        assert_eq!(effects, EffectFlags::OMIT_FIRST_BARLINE);
        assert!(effects.set("Unknown", true).is_err());
    }
}
