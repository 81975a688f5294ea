//! C++ converter emission.
//!
//! - [`traits`] - the [`ConversionEmitter`] trait and emitter configuration
//! - [`string`] - `to_string` / `from_string`
//! - [`json`] - nlohmann `to_json` / `from_json`
//! - [`registry`] - kind to emitter lookup
//! - [`files`] - header/source assembly and output naming

pub mod cpp;
pub mod files;
pub mod json;
pub mod registry;
pub mod string;
pub mod traits;

pub use files::{render_files, FileCase, FileNaming, OutputLayout, RenderedFiles, GENERATED_BANNER};
pub use json::JsonEmitter;
pub use registry::EmitterRegistry;
pub use string::StringEmitter;
pub use traits::{ConversionEmitter, EmitConfig, GeneratedUnit, IndentStyle};
