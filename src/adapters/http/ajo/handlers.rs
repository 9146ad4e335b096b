//! HTTP handlers for the Ajo endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    AjoNotifier, CloseAjoCommand, CloseAjoHandler, CreateAjoCommand, CreateAjoHandler,
    GetAjoHandler, GetAjoQuery, GetMemberStatementHandler, GetMemberStatementQuery,
    GetSettingsHandler, GetSettingsQuery, ListAjosHandler, ListAjosQuery,
    ListPendingInvitationsHandler, RecordPaymentCommand, RecordPaymentHandler,
    RespondToInvitationCommand, RespondToInvitationHandler, UpdateAjoCommand, UpdateAjoHandler,
    UpdateSettingsCommand, UpdateSettingsHandler,
};
use crate::domain::ajo::{AjoError, NewPayment};
use crate::domain::foundation::{
    AjoId, AuthenticatedUser, CommandMetadata, CooperativeId, MemberId, Timestamp,
};
use crate::ports::{ActivityLog, AjoReader, AjoRepository, MemberDirectory};

use super::dto::{
    parse_optional, AjoDetailResponse, AjoListItemResponse, AjoMemberResponse, AjoResponse,
    CloseAjoRequest, CreateAjoRequest, ErrorResponse, PendingInvitationResponse,
    RecordPaymentRequest, RecordPaymentResponse, RespondToInvitationRequest, SettingsResponse,
    StatementResponse, UpdateAjoRequest, UpdateSettingsRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// The collaborators every Ajo handler is built from.
#[derive(Clone)]
pub struct AjoPorts {
    pub repository: Arc<dyn AjoRepository>,
    pub reader: Arc<dyn AjoReader>,
    pub directory: Arc<dyn MemberDirectory>,
    pub activity: Arc<dyn ActivityLog>,
    pub notifier: AjoNotifier,
}

#[derive(Clone)]
pub struct AjoHandlers {
    get_settings: Arc<GetSettingsHandler>,
    update_settings: Arc<UpdateSettingsHandler>,
    create_ajo: Arc<CreateAjoHandler>,
    list_ajos: Arc<ListAjosHandler>,
    get_ajo: Arc<GetAjoHandler>,
    update_ajo: Arc<UpdateAjoHandler>,
    respond: Arc<RespondToInvitationHandler>,
    record_payment: Arc<RecordPaymentHandler>,
    statement: Arc<GetMemberStatementHandler>,
    pending_invitations: Arc<ListPendingInvitationsHandler>,
    close_ajo: Arc<CloseAjoHandler>,
}

impl AjoHandlers {
    pub fn new(ports: AjoPorts) -> Self {
        let AjoPorts {
            repository,
            reader,
            directory,
            activity,
            notifier,
        } = ports;

        Self {
            get_settings: Arc::new(GetSettingsHandler::new(repository.clone(), directory.clone())),
            update_settings: Arc::new(UpdateSettingsHandler::new(
                repository.clone(),
                directory.clone(),
                activity.clone(),
            )),
            create_ajo: Arc::new(CreateAjoHandler::new(
                repository.clone(),
                directory.clone(),
                activity.clone(),
                notifier.clone(),
            )),
            list_ajos: Arc::new(ListAjosHandler::new(reader.clone(), directory.clone())),
            get_ajo: Arc::new(GetAjoHandler::new(reader.clone(), directory.clone())),
            update_ajo: Arc::new(UpdateAjoHandler::new(
                repository.clone(),
                reader.clone(),
                directory.clone(),
                activity.clone(),
            )),
            respond: Arc::new(RespondToInvitationHandler::new(
                repository.clone(),
                reader.clone(),
                directory.clone(),
                activity.clone(),
                notifier.clone(),
            )),
            record_payment: Arc::new(RecordPaymentHandler::new(
                repository.clone(),
                reader.clone(),
                directory.clone(),
                activity.clone(),
                notifier.clone(),
            )),
            statement: Arc::new(GetMemberStatementHandler::new(
                repository.clone(),
                reader.clone(),
                directory.clone(),
            )),
            pending_invitations: Arc::new(ListPendingInvitationsHandler::new(
                reader.clone(),
                directory.clone(),
            )),
            close_ajo: Arc::new(CloseAjoHandler::new(
                repository, reader, directory, activity, notifier,
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════

fn metadata(user: AuthenticatedUser) -> CommandMetadata {
    CommandMetadata::new(user.id).with_correlation_id(uuid::Uuid::new_v4().to_string())
}

fn parse_cooperative_id(raw: &str) -> Result<CooperativeId, Response> {
    raw.parse()
        .map_err(|_| bad_request("Invalid cooperative ID"))
}

fn parse_ajo_id(raw: &str) -> Result<AjoId, Response> {
    raw.parse().map_err(|_| bad_request("Invalid ajo ID"))
}

fn parse_member_id(raw: &str) -> Result<MemberId, Response> {
    raw.parse().map_err(|_| bad_request("Invalid member ID"))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

/// Short-circuits a handler with the rejection response.
macro_rules! try_response {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return response,
        }
    };
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /ajo/cooperatives/:id/settings
pub async fn get_settings(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(cooperative_id): Path<String>,
) -> Response {
    let cooperative_id = try_response!(parse_cooperative_id(&cooperative_id));

    match handlers
        .get_settings
        .handle(GetSettingsQuery { cooperative_id }, metadata(user))
        .await
    {
        Ok(settings) => Json(SettingsResponse::from(settings)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// PUT /ajo/cooperatives/:id/settings
pub async fn update_settings(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(cooperative_id): Path<String>,
    body: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Response {
    let cooperative_id = try_response!(parse_cooperative_id(&cooperative_id));
    let req = try_response!(json_body(body));

    let cmd = UpdateSettingsCommand {
        cooperative_id,
        commission_rate: req.commission_rate,
        interest_rate: req.interest_rate,
    };

    match handlers.update_settings.handle(cmd, metadata(user)).await {
        Ok(settings) => Json(SettingsResponse::from(settings)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// POST /ajo/cooperatives/:id
pub async fn create_ajo(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(cooperative_id): Path<String>,
    body: Result<Json<CreateAjoRequest>, JsonRejection>,
) -> Response {
    let cooperative_id = try_response!(parse_cooperative_id(&cooperative_id));
    let req = try_response!(json_body(body));

    let start_date = match Timestamp::parse("startDate", &req.start_date) {
        Ok(date) => date,
        Err(e) => return handle_ajo_error(e.into()),
    };
    let end_date = match parse_optional("endDate", req.end_date) {
        Ok(date) => date,
        Err(e) => return handle_ajo_error(e.into()),
    };

    let cmd = CreateAjoCommand {
        cooperative_id,
        title: req.title,
        description: req.description,
        amount: req.amount,
        frequency: req.frequency,
        start_date,
        end_date,
        is_continuous: req.is_continuous,
        member_ids: req.member_ids,
    };

    match handlers.create_ajo.handle(cmd, metadata(user)).await {
        Ok(result) => (StatusCode::CREATED, Json(AjoDetailResponse::from(result))).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// GET /ajo/cooperatives/:id
pub async fn list_ajos(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(cooperative_id): Path<String>,
) -> Response {
    let cooperative_id = try_response!(parse_cooperative_id(&cooperative_id));

    match handlers
        .list_ajos
        .handle(ListAjosQuery { cooperative_id }, metadata(user))
        .await
    {
        Ok(summaries) => {
            let items: Vec<AjoListItemResponse> = summaries.into_iter().map(Into::into).collect();
            Json(items).into_response()
        }
        Err(e) => handle_ajo_error(e),
    }
}

/// GET /ajo/:ajoId
pub async fn get_ajo(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(ajo_id): Path<String>,
) -> Response {
    let ajo_id = try_response!(parse_ajo_id(&ajo_id));

    match handlers.get_ajo.handle(GetAjoQuery { ajo_id }, metadata(user)).await {
        Ok(detail) => Json(AjoDetailResponse::from(detail)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// PUT /ajo/:ajoId
pub async fn update_ajo(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(ajo_id): Path<String>,
    body: Result<Json<UpdateAjoRequest>, JsonRejection>,
) -> Response {
    let ajo_id = try_response!(parse_ajo_id(&ajo_id));
    let req = try_response!(json_body(body));

    let changes = match req.into_changes() {
        Ok(changes) => changes,
        Err(e) => return handle_ajo_error(e.into()),
    };

    match handlers
        .update_ajo
        .handle(UpdateAjoCommand { ajo_id, changes }, metadata(user))
        .await
    {
        Ok(ajo) => Json(AjoResponse::from(ajo)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// POST /ajo/:ajoId/respond
pub async fn respond_to_invitation(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(ajo_id): Path<String>,
    body: Result<Json<RespondToInvitationRequest>, JsonRejection>,
) -> Response {
    let ajo_id = try_response!(parse_ajo_id(&ajo_id));
    let req = try_response!(json_body(body));

    let cmd = RespondToInvitationCommand {
        ajo_id,
        status: req.status,
    };

    match handlers.respond.handle(cmd, metadata(user)).await {
        Ok(membership) => Json(AjoMemberResponse::from(membership)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// POST /ajo/:ajoId/payments
pub async fn record_payment(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(ajo_id): Path<String>,
    body: Result<Json<RecordPaymentRequest>, JsonRejection>,
) -> Response {
    let ajo_id = try_response!(parse_ajo_id(&ajo_id));
    let req = try_response!(json_body(body));

    let payment_date = match parse_optional("paymentDate", req.payment_date) {
        Ok(date) => date,
        Err(e) => return handle_ajo_error(e.into()),
    };

    let cmd = RecordPaymentCommand {
        ajo_id,
        payment: NewPayment {
            member_id: req.member_id,
            amount: req.amount,
            payment_method: req.payment_method,
            reference_number: req.reference_number,
            notes: req.notes,
            payment_date,
        },
    };

    match handlers.record_payment.handle(cmd, metadata(user)).await {
        Ok(result) => {
            (StatusCode::CREATED, Json(RecordPaymentResponse::from(result))).into_response()
        }
        Err(e) => handle_ajo_error(e),
    }
}

/// GET /ajo/:ajoId/members/:memberId/statement
pub async fn get_member_statement(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path((ajo_id, member_id)): Path<(String, String)>,
) -> Response {
    let ajo_id = try_response!(parse_ajo_id(&ajo_id));
    let member_id = try_response!(parse_member_id(&member_id));

    match handlers
        .statement
        .handle(GetMemberStatementQuery { ajo_id, member_id }, metadata(user))
        .await
    {
        Ok(statement) => Json(StatementResponse::from(statement)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

/// GET /ajo/my/pending-invitations
pub async fn list_pending_invitations(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.pending_invitations.handle(metadata(user)).await {
        Ok(invitations) => {
            let items: Vec<PendingInvitationResponse> =
                invitations.into_iter().map(Into::into).collect();
            Json(items).into_response()
        }
        Err(e) => handle_ajo_error(e),
    }
}

/// POST /ajo/:ajoId/close
pub async fn close_ajo(
    State(handlers): State<AjoHandlers>,
    RequireAuth(user): RequireAuth,
    Path(ajo_id): Path<String>,
    body: Result<Json<CloseAjoRequest>, JsonRejection>,
) -> Response {
    let ajo_id = try_response!(parse_ajo_id(&ajo_id));
    let req = try_response!(json_body(body));

    let cmd = CloseAjoCommand {
        ajo_id,
        status: req.status,
    };

    match handlers.close_ajo.handle(cmd, metadata(user)).await {
        Ok(ajo) => Json(AjoResponse::from(ajo)).into_response(),
        Err(e) => handle_ajo_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

pub fn handle_ajo_error(error: AjoError) -> Response {
    match error {
        AjoError::NotFound { resource, .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("{} not found", resource))),
        )
            .into_response(),
        AjoError::Forbidden(message) => {
            (StatusCode::FORBIDDEN, Json(ErrorResponse::forbidden(message))).into_response()
        }
        AjoError::BadRequest(message) => bad_request(message),
        AjoError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(&field, message)),
        )
            .into_response(),
        AjoError::Infrastructure(message) => {
            tracing::error!(error = %message, "Ajo request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An internal error occurred")),
            )
                .into_response()
        }
    }
}
