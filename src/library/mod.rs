//! EndNote library module
//!
//! Locates an EndNote library's `.Data` folder and reads references and
//! attachment paths out of its SQLite database.

#[cfg(test)]
pub(crate) mod fixtures;
mod models;
mod reader;

pub use models::{LibraryPaths, Reference};
pub use reader::EndnoteLibrary;
