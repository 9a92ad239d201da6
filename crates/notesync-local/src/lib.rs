//! Local filesystem backends for notesync: the note container reader and
//! the JSON settings file.

mod settings;
mod sqlite;

pub use settings::JsonSettings;
pub use sqlite::SqliteStore;
