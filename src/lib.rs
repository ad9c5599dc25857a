//! Readers and writers for the text formats of osu! beatmaps and storyboards.
//!
//! # Modules
//!
//! - [`bitfield`]: a table-driven bit-field primitive with named bits, multi-bit fields,
//!   implied bits and composite "any of" queries.
//! - [`mods`]: gameplay modifiers as a 32-bit [`mods::ModifierSet`].
//! - [`flags`]: the smaller flag sets of hit objects and timing points.
//! - [`storyboard`]: the command tree of `[Events]` sections, with a parser driven by
//!   indentation and a renderer that regroups compatible commands.
//! - [`timing`] and [`hit_object`]: line codecs of `[TimingPoints]` and `[HitObjects]`,
//!   with typed circles, sliders, spinners and hold notes.
//! - [`beatmap`]: whole `.osu` files, from the `key: value` sections to the hit objects.
//! - [`reader`]: the line source the parsers read from.
//!
//! # Example
//!
//! ```
//! use osu_fmt::{
//!     config::{ParseConfig, RenderConfig},
//!     storyboard::Storyboard,
//! };
//!
//! let source = "[Events]\nSprite,Foreground,Centre,\"sb/star.png\",320,240\n F,0,0,500,0,1\n F,0,0,500,1,0\n";
//! let storyboard = Storyboard::parse(source, &ParseConfig::default()).unwrap();
//! let rendered = storyboard.render(&RenderConfig::default()).unwrap();
//! assert!(rendered.contains(" F,0,0,500,0,1,1,0\n"));
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize` and `Deserialize` on model types.
//! - `diagnostics` (default): `ariadne` reports for parse errors in the `diagnostics`
//!   module.

pub mod beatmap;
pub mod bitfield;
pub mod config;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod error;
pub mod flags;
pub mod hit_object;
pub mod mods;
pub mod prelude;
pub mod reader;
pub mod storyboard;
pub mod timing;
mod util;

pub use self::error::{ParseError, ParseResult, Positioned, SerializationError};
