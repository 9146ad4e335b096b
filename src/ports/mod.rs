//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `AjoRepository` - Ajo writes (settings, create, update, payments)
//! - `AjoReader` - Ajo queries (lists, roster, payment history, invitations)
//! - `MemberDirectory` - Cooperative member lookups
//! - `ActivityLog` - Append-only audit trail
//!
//! ## Delivery Ports
//!
//! - `NotificationSender` - In-app notification + push
//! - `EmailSender` - Transactional HTML email
//!
//! ## Auth Ports
//!
//! - `SessionValidator` - Bearer token validation

mod activity_log;
mod ajo_reader;
mod ajo_repository;
mod email_sender;
mod member_directory;
mod notification_sender;
mod session_validator;

pub use activity_log::ActivityLog;
pub use ajo_reader::{AjoReader, AjoSummary, PendingInvitation};
pub use ajo_repository::AjoRepository;
pub use email_sender::{EmailError, EmailMessage, EmailSender};
pub use member_directory::MemberDirectory;
pub use notification_sender::{Notification, NotificationKind, NotificationSender};
pub use session_validator::SessionValidator;
