//! HTTP routes for the Ajo endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    close_ajo, create_ajo, get_ajo, get_member_statement, get_settings, list_ajos,
    list_pending_invitations, record_payment, respond_to_invitation, update_ajo, update_settings,
    AjoHandlers,
};

/// Creates the Ajo router. Mount it under `/ajo`.
pub fn ajo_routes(handlers: AjoHandlers) -> Router {
    Router::new()
        .route(
            "/cooperatives/:id/settings",
            get(get_settings).put(update_settings),
        )
        .route("/cooperatives/:id", post(create_ajo).get(list_ajos))
        .route("/my/pending-invitations", get(list_pending_invitations))
        .route("/:ajo_id", get(get_ajo).put(update_ajo))
        .route("/:ajo_id/respond", post(respond_to_invitation))
        .route("/:ajo_id/payments", post(record_payment))
        .route("/:ajo_id/close", post(close_ajo))
        .route(
            "/:ajo_id/members/:member_id/statement",
            get(get_member_statement),
        )
        .with_state(handlers)
}
