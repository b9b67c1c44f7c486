//! Body XML parsing module.

mod body;
mod scan;

pub use body::{parse, BodyParser};
