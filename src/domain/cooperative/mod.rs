//! Cooperative module - the member records other modules read.

mod member;

pub use member::{LinkedUser, Member, MemberIdentity, MemberRole, OfflineContact};
