//! Zotero output module
//!
//! Turns EndNote references into the EndNote-XML dialect that Zotero imports:
//! - field mapping into `<record>` elements
//! - added/modified dates folded into `<notes>`
//! - attachment paths rewritten as absolute `<pdf-urls>`

mod record;
mod writer;

pub use record::*;
pub use writer::ZoteroXmlWriter;
