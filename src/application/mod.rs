//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, command handlers (write) and query handlers (read) are
//! separate types, each holding only the ports it needs.

pub mod handlers;

pub use handlers::ajo::{
    // Settings
    GetSettingsHandler, GetSettingsQuery, UpdateSettingsCommand, UpdateSettingsHandler,
    // Ajo lifecycle
    CloseAjoCommand, CloseAjoHandler, CreateAjoCommand, CreateAjoHandler, CreateAjoResult,
    UpdateAjoCommand, UpdateAjoHandler,
    // Queries
    AjoDetail, GetAjoHandler, GetAjoQuery, GetMemberStatementHandler, GetMemberStatementQuery,
    ListAjosHandler, ListAjosQuery, ListPendingInvitationsHandler, MemberStatement,
    // Membership and payments
    RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult, RespondToInvitationCommand,
    RespondToInvitationHandler, RosterEntry,
    // Delivery
    AjoNotifier, Deliveries, DeliveryMode,
};
