//! Prelude module for the crate.
//!
//! Re-exports the types most callers need. `use osu_fmt::prelude::*;` imports them at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_parse_error};
pub use crate::{
    beatmap::{
        Beatmap, Colours, Countdown, Difficulty, Editor, General, Metadata, OverlayPosition,
    },
    bitfield::{BitFieldSet, FieldDef, FieldKind, FieldValue, UnknownFieldError},
    config::{Indent, ParseConfig, RenderConfig},
    error::{ParseError, ParseResult, Positioned, SerializationError},
    flags::{EffectFlags, HitObjectKind, HitSoundFlags, SampleSet},
    hit_object::{CurveType, HitObject, HitObjectHeader, HitObjectParams, HitSample, SliderParams},
    mods::{Mod, Mode, ModifierSet},
    reader::{LineSource, TextReader, Variables},
    storyboard::{
        Command, CommandContainer, Easing, Layer, ObjectKind, Origin, Rgb, Storyboard,
        StoryboardObject, Trigger, parse_events,
        command::{Loop, ParameterEffect, Parameters, Transform, TriggerLoop},
        object::{Animation, Backdrop, LoopType, Sample, Sprite},
        trigger::{HitSoundTrigger, UnknownTriggerNameError},
    },
    timing::TimingPoint,
};
