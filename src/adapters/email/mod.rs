//! Email delivery adapters.

mod resend;

pub use resend::{ResendConfig, ResendEmailSender, DEFAULT_RESEND_ENDPOINT};
