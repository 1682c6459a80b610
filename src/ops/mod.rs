//! Command handlers that combine the store with files and the editor.
//!
//! The library modules work on strings and in-memory values; the functions
//! here add the side effects the binary needs: reading and writing files and
//! launching the editor.

pub mod edit;
pub mod export;

pub use edit::{edit_entry, EditOutcome};
pub use export::{import_file, write_backup, write_export, write_multi_export};
