//! In-memory adapters for every persistence and delivery port.
//!
//! Used by handler tests, the HTTP integration tests and local runs that
//! have no database.

mod ajo_store;
mod member_directory;
mod recorders;

pub use ajo_store::InMemoryAjoStore;
pub use member_directory::InMemoryMemberDirectory;
pub use recorders::{InMemoryActivityLog, RecordingEmailSender, RecordingNotificationSender};
