//! Properties of the modifier set and the bit-field tables behind it.

use osu_fmt::{
    bitfield::{BitFieldSet, FieldValue},
    mods::{Mod, Mode, ModifierSet},
};
use pretty_assertions::assert_eq;

/// Deterministic spread of test values.
fn xorshift(mut state: u32) -> impl Iterator<Item = u32> {
    std::iter::repeat_with(move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    })
}

#[test]
fn bits_round_trip() {
    for bits in xorshift(0x9e37_79b9).take(1000).chain([0, u32::MAX, 1 << 31]) {
        assert_eq!(ModifierSet::from_bits(bits).bits(), bits);
    }
}

#[test]
fn setting_a_bit_sets_its_implications() {
    for bits in xorshift(7).take(200) {
        let mut mods = ModifierSet::from_bits(bits);
        mods.set("NC", true).unwrap();
        assert!(mods.contains(Mod::Nightcore) && mods.contains(Mod::DoubleTime));
        mods.set("PF", true).unwrap();
        assert!(mods.contains(Mod::Perfect) && mods.contains(Mod::SuddenDeath));
    }
}

#[test]
fn clearing_leaves_dependents() {
    let mut mods: ModifierSet = "NC".parse().unwrap();
    mods.set("DT", false).unwrap();
    assert_eq!(mods.bits(), Mod::Nightcore.mask());
    mods.set("NC", false).unwrap();
    assert!(mods.is_empty());
}

#[test]
fn set_then_get() {
    for name in ["HD", "Hidden", "ScoreV2", "9K", "Coop", "MR"] {
        for bits in xorshift(name.len() as u32).take(20) {
            let mut mods = ModifierSet::from_bits(bits);
            mods.set(name, true).unwrap();
            assert!(mods.get(name).unwrap(), "{name}");
            mods.set(name, false).unwrap();
            assert!(!mods.get(name).unwrap(), "{name}");
        }
    }
}

#[test]
fn display_and_parse() {
    let mods: ModifierSet = "HD,DT,HR".parse().unwrap();
    assert_eq!(mods.to_string(), "HR,DT,HD");
    assert_eq!("HDHRDT".parse::<ModifierSet>().unwrap(), mods);
    assert_eq!(
        "Hidden, HardRock, DoubleTime".parse::<ModifierSet>().unwrap(),
        mods
    );
    assert_eq!(ModifierSet::NONE.to_string(), "NM");
    assert_eq!("NM".parse::<ModifierSet>().unwrap(), ModifierSet::NONE);
    assert_eq!(ModifierSet::from(Mod::Nightcore).to_string(), "NC");
    assert_eq!(ModifierSet::from(Mod::Perfect).to_string(), "SD,PF");

    let error = "HDXX".parse::<ModifierSet>().unwrap_err();
    assert_eq!(error.name, "HDXX");
}

#[test]
fn composites() {
    let mods: ModifierSet = [Mod::Autoplay, Mod::Hidden].into_iter().collect();
    assert!(mods.has_auto_mods());
    assert!(mods.is_unranked());
    assert!(!mods.is_ranked());
    assert!(mods.is_score_increasing());
    assert!(mods.get("AutoMods").unwrap());
    assert!(!mods.get("KeyMods").unwrap());
    assert!(mods.any_of(&["KeyMods", "ScoreIncreasing"]).unwrap());

    let mania = ModifierSet::from(Mod::Key3);
    assert!(mania.has_key_mods());
    assert!(mania.has_unranked_mania_mods());
    assert!(ModifierSet::from(Mod::Key7).is_ranked());
    assert!(ModifierSet::from(Mod::SpunOut).is_score_decreasing());
}

#[test]
fn difficulty_subset() {
    let mods: ModifierSet = "EZ,HR,HT,DT,NC,HD,4K,2K".parse().unwrap();
    assert_eq!(
        mods.difficulty_changing_subset(Mode::Mania).to_string(),
        "HT,HR,2K"
    );
    assert_eq!(
        mods.difficulty_changing_subset(Mode::Osu).to_string(),
        "HT,HR"
    );
    for bits in xorshift(42).take(500) {
        let mods = ModifierSet::from_bits(bits);
        for mode in [Mode::Osu, Mode::Taiko, Mode::Catch, Mode::Mania] {
            let subset = mods.difficulty_changing_subset(mode);
            assert_eq!(subset.difficulty_changing_subset(mode), subset);
            assert_eq!(subset.bits() & !mods.bits(), 0);
        }
    }
}

#[test]
fn named_construction() {
    let mods = ModifierSet::from_named(&[
        ("HD", FieldValue::Flag(true)),
        ("Nightcore", true.into()),
        ("DT", false.into()),
    ])
    .unwrap();
    assert_eq!(mods.bits(), Mod::Hidden.mask() | Mod::Nightcore.mask());
    assert!(ModifierSet::from_named(&[("KeyMods", true.into())]).is_err());
    assert_eq!(
        mods.members().collect::<Vec<_>>(),
        ["HD", "NC"]
    );
}
