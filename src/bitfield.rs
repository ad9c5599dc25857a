//! Table-driven bit-field sets over a single `u32`.
//!
//! A flag type declares its members once, as a static table of [`FieldDef`] entries, and
//! implements [`BitFieldSet`] by exposing how it wraps its integer. Every named accessor
//! is then a table lookup followed by plain mask arithmetic:
//!
//! - [`FieldKind::Bit`] is a single boolean bit. It may declare other bits it implies,
//!   which are set together with it (transitively) but never cleared together with it.
//! - [`FieldKind::Field`] is an unsigned sub-field of `width` bits starting at `shift`.
//! - [`FieldKind::AnyOf`] is a derived predicate that is true when any of the listed
//!   members is set. It has no storage of its own.
//!
//! ```
//! use osu_fmt::{bitfield::BitFieldSet, mods::ModifierSet};
//!
//! let mut mods = ModifierSet::default();
//! mods.set("NC", true).unwrap();
//! assert!(mods.get("DoubleTime").unwrap());
//! assert_eq!(mods.members().collect::<Vec<_>>(), ["DT", "NC"]);
//! ```

use thiserror::Error;

/// A name that does not denote a member of the required kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown {expected} `{name}`")]
pub struct UnknownFieldError {
    /// The name that was looked up.
    pub name: String,
    /// The kind of member that was expected, e.g. `"member"` or `"bit"`.
    pub expected: &'static str,
}

impl UnknownFieldError {
    pub(crate) fn new(name: &str, expected: &'static str) -> Self {
        Self {
            name: name.to_owned(),
            expected,
        }
    }
}

/// How a member of a [`BitFieldSet`] is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single bit at `index`, setting which also sets every member in `implies`.
    Bit {
        /// Bit index, `0..32`.
        index: u8,
        /// Names of bits set together with this one.
        implies: &'static [&'static str],
    },
    /// An unsigned integer occupying `width` bits from `shift`.
    Field {
        /// Position of the lowest bit.
        shift: u8,
        /// Number of bits.
        width: u8,
    },
    /// True when any listed member is set. Members may themselves be `AnyOf`.
    AnyOf(&'static [&'static str]),
}

/// One row of a member table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDef {
    /// Primary name, used by [`BitFieldSet::members`].
    pub name: &'static str,
    /// Alternative names accepted by lookups.
    pub aliases: &'static [&'static str],
    /// Storage of the member.
    pub kind: FieldKind,
}

impl FieldDef {
    /// A plain single-bit member.
    #[must_use]
    pub const fn bit(name: &'static str, index: u8) -> Self {
        Self::implies(name, index, &[])
    }

    /// A single-bit member that sets `implies` along with itself.
    #[must_use]
    pub const fn implies(name: &'static str, index: u8, implies: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::Bit { index, implies },
        }
    }

    /// A multi-bit unsigned sub-field.
    #[must_use]
    pub const fn field(name: &'static str, shift: u8, width: u8) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::Field { shift, width },
        }
    }

    /// A derived "any of" predicate.
    #[must_use]
    pub const fn any_of(name: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::AnyOf(members),
        }
    }

    /// Attaches alternative names.
    #[must_use]
    pub const fn alias(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// Whether `name` is the primary name or one of the aliases.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

const fn field_mask(shift: u8, width: u8) -> u32 {
    let low = if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    low << shift
}

/// A value given to [`BitFieldSet::from_named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// For single-bit members.
    Flag(bool),
    /// For sub-fields.
    Int(u32),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(value)
    }
}

/// Named access to the bits of a single `u32`, driven by [`BitFieldSet::FIELDS`].
pub trait BitFieldSet: Sized + Copy {
    /// The member table, in declaration order.
    const FIELDS: &'static [FieldDef];

    /// Wraps a raw integer. Must be lossless.
    fn from_bits(bits: u32) -> Self;

    /// Returns the raw integer.
    fn bits(self) -> u32;

    /// Looks up a member by primary name or alias.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if no member has that name.
    fn field_def(name: &str) -> Result<&'static FieldDef, UnknownFieldError> {
        Self::FIELDS
            .iter()
            .find(|def| def.matches(name))
            .ok_or_else(|| UnknownFieldError::new(name, "member"))
    }

    /// The storage mask covered by a member. For `AnyOf` this is the union of its
    /// members' masks.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if the name, or any name it refers to, is unknown.
    fn mask_of(name: &str) -> Result<u32, UnknownFieldError> {
        let mut mask = 0;
        let mut visited: Vec<&str> = vec![];
        let mut pending = vec![Self::field_def(name)?];
        while let Some(def) = pending.pop() {
            if visited.contains(&def.name) {
                continue;
            }
            visited.push(def.name);
            match def.kind {
                FieldKind::Bit { index, .. } => mask |= 1 << index,
                FieldKind::Field { shift, width } => mask |= field_mask(shift, width),
                FieldKind::AnyOf(members) => {
                    for member in members {
                        pending.push(Self::field_def(member)?);
                    }
                }
            }
        }
        Ok(mask)
    }

    /// The bit of a single-bit member together with every bit it implies.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if the name is not a single-bit member, or implies a
    /// name that is not one.
    fn implied_mask(name: &str) -> Result<u32, UnknownFieldError> {
        let mut mask = 0;
        let mut pending = vec![name];
        while let Some(name) = pending.pop() {
            let def = Self::field_def(name)?;
            let FieldKind::Bit { index, implies } = def.kind else {
                return Err(UnknownFieldError::new(name, "bit"));
            };
            if mask & (1 << index) != 0 {
                continue;
            }
            mask |= 1 << index;
            pending.extend_from_slice(implies);
        }
        Ok(mask)
    }

    /// Whether any bit covered by the member is set.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if the name is unknown.
    fn get(self, name: &str) -> Result<bool, UnknownFieldError> {
        Ok(self.bits() & Self::mask_of(name)? != 0)
    }

    /// Sets or clears a single-bit member.
    ///
    /// Setting also sets every implied bit, transitively. Clearing touches only the named
    /// bit, so bits that declared it as a prerequisite stay set.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if the name is not a single-bit member.
    fn set(&mut self, name: &str, value: bool) -> Result<(), UnknownFieldError> {
        let bits = if value {
            self.bits() | Self::implied_mask(name)?
        } else {
            let FieldKind::Bit { index, .. } = Self::field_def(name)?.kind else {
                return Err(UnknownFieldError::new(name, "bit"));
            };
            self.bits() & !(1 << index)
        };
        *self = Self::from_bits(bits);
        Ok(())
    }

    /// Reads a sub-field. A single-bit member reads as a 1-bit field.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if the name is unknown or an `AnyOf` predicate.
    fn get_field(self, name: &str) -> Result<u32, UnknownFieldError> {
        let (shift, width) = sub_field(Self::field_def(name)?, name)?;
        Ok((self.bits() & field_mask(shift, width)) >> shift)
    }

    /// Writes a sub-field. Bits of `value` beyond the field width are silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if the name is unknown or an `AnyOf` predicate.
    fn set_field(&mut self, name: &str, value: u32) -> Result<(), UnknownFieldError> {
        let (shift, width) = sub_field(Self::field_def(name)?, name)?;
        let mask = field_mask(shift, width);
        let shifted = value.checked_shl(u32::from(shift)).unwrap_or(0);
        *self = Self::from_bits((self.bits() & !mask) | (shifted & mask));
        Ok(())
    }

    /// Whether any of the named members is set.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] on the first unknown name.
    fn any_of(self, names: &[&str]) -> Result<bool, UnknownFieldError> {
        let mut mask = 0;
        for name in names {
            mask |= Self::mask_of(name)?;
        }
        Ok(self.bits() & mask != 0)
    }

    /// Names of the set single-bit members, in declaration order.
    fn members(self) -> Members {
        Members {
            bits: self.bits(),
            fields: Self::FIELDS.iter(),
        }
    }

    /// Builds a set from named values, applied in order on top of zero.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] for a name that is unknown or does not accept the
    /// given kind of value.
    fn from_named(values: &[(&str, FieldValue)]) -> Result<Self, UnknownFieldError> {
        let mut set = Self::from_bits(0);
        for &(name, value) in values {
            match value {
                FieldValue::Flag(flag) => set.set(name, flag)?,
                FieldValue::Int(int) => set.set_field(name, int)?,
            }
        }
        Ok(set)
    }

    /// Whether the bit at `index` is set.
    fn contains_bit(self, index: u8) -> bool {
        self.bits() & (1 << index) != 0
    }

    /// Sets the bit at `index` and every bit its table entry implies.
    fn insert_bit(&mut self, index: u8) {
        let declared = Self::FIELDS.iter().find(
            |def| matches!(def.kind, FieldKind::Bit { index: declared, .. } if declared == index),
        );
        let mask = declared
            .and_then(|def| Self::implied_mask(def.name).ok())
            .unwrap_or(1 << index);
        *self = Self::from_bits(self.bits() | mask);
    }

    /// Clears the bit at `index` only.
    fn remove_bit(&mut self, index: u8) {
        *self = Self::from_bits(self.bits() & !(1 << index));
    }
}

fn sub_field(def: &FieldDef, name: &str) -> Result<(u8, u8), UnknownFieldError> {
    match def.kind {
        FieldKind::Bit { index, .. } => Ok((index, 1)),
        FieldKind::Field { shift, width } => Ok((shift, width)),
        FieldKind::AnyOf(_) => Err(UnknownFieldError::new(name, "field")),
    }
}

/// Iterator over the names of set single-bit members. See [`BitFieldSet::members`].
///
/// Clone the iterator to walk the members again.
#[derive(Debug, Clone)]
pub struct Members {
    bits: u32,
    fields: std::slice::Iter<'static, FieldDef>,
}

impl Iterator for Members {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        let bits = self.bits;
        self.fields.by_ref().find_map(|def| match def.kind {
            FieldKind::Bit { index, .. } if bits & (1 << index) != 0 => Some(def.name),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct Sample(u32);

    impl BitFieldSet for Sample {
        const FIELDS: &'static [FieldDef] = &[
            FieldDef::bit("A", 0).alias(&["Alpha"]),
            FieldDef::implies("B", 1, &["A"]),
            FieldDef::implies("C", 2, &["B"]),
            FieldDef::field("Level", 4, 3),
            FieldDef::any_of("AorC", &["A", "C"]),
            FieldDef::any_of("Any", &["AorC", "B", "Level"]),
        ];

        fn from_bits(bits: u32) -> Self {
            Self(bits)
        }

        fn bits(self) -> u32 {
            self.0
        }
    }

    #[test]
    fn implies_is_transitive_and_asymmetric() {
        let mut set = Sample::default();
        set.set("C", true).unwrap();
        assert_eq!(set.bits(), 0b111);

        set.set("A", false).unwrap();
        assert_eq!(set.bits(), 0b110);
        assert!(set.get("C").unwrap());
    }

    #[test]
    fn sub_field_truncates() {
        let mut set = Sample(0b1);
        set.set_field("Level", 5).unwrap();
        assert_eq!(set.get_field("Level").unwrap(), 5);
        assert_eq!(set.bits(), 0b101_0001);

        set.set_field("Level", 0b1111_1010).unwrap();
        assert_eq!(set.get_field("Level").unwrap(), 0b010);
        assert_eq!(set.bits(), 0b010_0001);
    }

    #[test]
    fn any_of_is_derived() {
        let set = Sample::from_bits(1 << 2);
        assert!(set.get("AorC").unwrap());
        assert!(set.get("Any").unwrap());
        assert!(!Sample::default().get("Any").unwrap());
        assert!(Sample::from_bits(1 << 5).get("Any").unwrap());
        assert!(set.any_of(&["A", "C"]).unwrap());
        assert!(!set.any_of(&["A", "Level"]).unwrap());
        let mut copy = set;
        assert!(copy.set("AorC", true).is_err());
        assert!(set.get_field("AorC").is_err());
    }

    #[test]
    fn members_restart() {
        let set = Sample::from_bits(0b101 | (7 << 4));
        let members = set.members();
        assert_eq!(members.clone().collect::<Vec<_>>(), ["A", "C"]);
        assert_eq!(members.count(), 2);
    }

    #[test]
    fn from_named() {
        let set = Sample::from_named(&[
            ("Alpha", true.into()),
            ("Level", 3.into()),
        ])
        .unwrap();
        assert_eq!(set.bits(), 0b011_0001);

        let err = Sample::from_named(&[("Zeta", true.into())]).unwrap_err();
        assert_eq!(err.name, "Zeta");
        assert_eq!(err.to_string(), "unknown member `Zeta`");
    }

    #[test]
    fn typed_bits() {
        let mut set = Sample::default();
        set.insert_bit(2);
        assert_eq!(set.bits(), 0b111);
        set.remove_bit(1);
        assert!(!set.contains_bit(1));
        set.insert_bit(9);
        assert!(set.contains_bit(9));
    }
}
