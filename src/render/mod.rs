//! Rendering module: body serialization and scan report output.

mod json;
mod serialize;
mod text;

pub use json::{to_json, JsonFormat};
pub use serialize::serialize;
pub use text::to_text;
