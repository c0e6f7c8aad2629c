//! Presentational helpers for rendered pages.
//!
//! - `class_names!` / `class_names` - Join truthy class names
//! - `colour_palette` - Fixed background/text colour pairs
//! - `random_int` - Uniform random integer in a half-open range

mod class_names;
mod palette;
mod random;

pub use class_names::*;
pub use palette::*;
pub use random::*;
