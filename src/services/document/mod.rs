//! Compiles an approved narrative plus brand settings into a paginated,
//! styled DOCX document.

mod blocks;
mod builder;
mod color;
mod filename;
mod inline;

pub use builder::build_document;
pub use color::{resolve_color, DEFAULT_ACCENT};
pub use filename::sanitize_filename;
