//! Helper functions shared by the renderer, templates and generator

mod date;
mod html;

pub use date::*;
pub use html::*;
