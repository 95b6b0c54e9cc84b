//! Helper functions shared by content processing, templates and generators

mod date;
mod html;
mod slugify;
mod url;

pub use date::*;
pub use html::*;
pub use slugify::*;
pub use url::*;
