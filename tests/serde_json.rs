//! Model types through JSON.
#![cfg(feature = "serde")]

use osu_fmt::{
    beatmap::Beatmap,
    config::{ParseConfig, RenderConfig},
    mods::ModifierSet,
    storyboard::{Storyboard, Trigger},
};
use pretty_assertions::assert_eq;

#[test]
fn storyboard_through_json() {
    let source = "[Variables]\n$s=\"sb/s.png\"\n\n[Events]\nSprite,Pass,Centre,$s,1.5,2\n F,0,0,100,0,1\n T,HitSoundDrumClap,0,100\n  C,0,0,10,1,2,3\n";
    let storyboard = Storyboard::parse(source, &ParseConfig::default()).unwrap();
    let json = serde_json::to_string(&storyboard).unwrap();
    assert!(json.contains("\"HitSoundDrumClap\""));
    let back: Storyboard = serde_json::from_str(&json).unwrap();
    assert_eq!(back, storyboard);
    assert_eq!(
        back.render(&RenderConfig::default()).unwrap(),
        storyboard.render(&RenderConfig::default()).unwrap()
    );
}

#[test]
fn transparent_wrappers() {
    let mods: ModifierSet = "HD,DT".parse().unwrap();
    assert_eq!(serde_json::to_string(&mods).unwrap(), "72");
    assert_eq!(serde_json::from_str::<ModifierSet>("72").unwrap(), mods);

    let trigger: Trigger = serde_json::from_str("\"HitSoundSoft\"").unwrap();
    assert_eq!(trigger.to_string(), "HitSoundSoft");
    assert!(serde_json::from_str::<Trigger>("\"Sometimes\"").is_err());
}

#[test]
fn beatmap_through_json() {
    let source = include_str!("files/lanterns.osu");
    let beatmap = Beatmap::parse(source, &ParseConfig::default()).unwrap();
    let json = serde_json::to_string(&beatmap).unwrap();
    assert!(json.contains("\"PerfectCircle\""));
    let back: Beatmap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, beatmap);
}
