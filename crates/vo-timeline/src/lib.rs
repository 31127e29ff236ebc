//! Timeline import, normalization, and validation.
//!
//! Turns a hand-authored narration script — SRT, timestamped text, or a raw
//! canonical JSON document — into the normalized, schema-valid `Timeline`
//! that the rest of the system operates on. The data types themselves live
//! in `vo_models::timeline`; this crate is pure logic over them.

pub mod error;
pub mod importers;
pub mod normalizer;
pub mod parsers_srt;
pub mod parsers_timestamped_txt;
pub mod validator;

pub use error::{TimelineImportError, TimelineResult};
pub use importers::{detect_import_format, import_timeline, import_timeline_as, ImportFormat};
pub use normalizer::normalize_narration_events;
pub use parsers_srt::parse_srt;
pub use parsers_timestamped_txt::parse_timestamped_txt;
pub use validator::{validate_cross_field, validate_timeline_json};
