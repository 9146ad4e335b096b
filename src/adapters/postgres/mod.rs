//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAjoRepository` - Ajo writes, transactional where rows move together
//! - `PostgresAjoReader` - Read-side queries with roster and payment counts
//! - `PostgresMemberDirectory` - Cooperative members joined with their accounts
//! - `PostgresActivityLog` - Append-only audit rows
//! - `PostgresNotificationSender` - In-app notifications with optional push

mod activity_log;
mod ajo_reader;
mod ajo_repository;
mod member_directory;
mod notification_sender;
mod rows;

pub use activity_log::PostgresActivityLog;
pub use ajo_reader::PostgresAjoReader;
pub use ajo_repository::PostgresAjoRepository;
pub use member_directory::PostgresMemberDirectory;
pub use notification_sender::PostgresNotificationSender;
