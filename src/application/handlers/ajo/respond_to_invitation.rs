//! RespondToInvitationHandler - Command handler for accepting or declining
//! an Ajo invitation.

use std::sync::Arc;

use serde_json::json;

use crate::domain::activity::{actions, ActivityRecord};
use crate::domain::ajo::{Ajo, AjoError, AjoMember, InvitationStatus};
use crate::domain::cooperative::Member;
use crate::domain::foundation::{AjoId, CommandMetadata, Timestamp};
use crate::ports::{
    ActivityLog, AjoReader, AjoRepository, MemberDirectory, Notification, NotificationKind,
};

use super::{load_ajo, record_activity, templates, AjoNotifier, Deliveries};

#[derive(Debug, Clone)]
pub struct RespondToInvitationCommand {
    pub ajo_id: AjoId,
    pub status: InvitationStatus,
}

pub struct RespondToInvitationHandler {
    repository: Arc<dyn AjoRepository>,
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
    activity: Arc<dyn ActivityLog>,
    notifier: AjoNotifier,
}

impl RespondToInvitationHandler {
    pub fn new(
        repository: Arc<dyn AjoRepository>,
        reader: Arc<dyn AjoReader>,
        directory: Arc<dyn MemberDirectory>,
        activity: Arc<dyn ActivityLog>,
        notifier: AjoNotifier,
    ) -> Self {
        Self {
            repository,
            reader,
            directory,
            activity,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: RespondToInvitationCommand,
        metadata: CommandMetadata,
    ) -> Result<AjoMember, AjoError> {
        let ajo = load_ajo(self.reader.as_ref(), &cmd.ajo_id).await?;

        let member = self
            .directory
            .find_in_cooperative(&ajo.cooperative_id, &metadata.user_id)
            .await?
            .ok_or_else(|| AjoError::not_found("Member", &metadata.user_id))?;

        let mut invitation = self
            .reader
            .find_member(&ajo.id, &member.id)
            .await?
            .ok_or_else(|| AjoError::not_found("Ajo invitation", member.id))?;

        invitation.respond(cmd.status, Timestamp::now())?;
        self.repository.update_member(&invitation).await?;

        tracing::info!(
            ajo_id = %ajo.id,
            member_id = %member.id,
            status = %invitation.status,
            correlation_id = %metadata.correlation_id(),
            "Ajo invitation answered"
        );

        record_activity(
            self.activity.as_ref(),
            ActivityRecord::new(
                metadata.user_id.clone(),
                actions::INVITATION_RESPONDED,
                format!("{} invitation to \"{}\"", capitalize(invitation.status.as_str()), ajo.title),
                Some(ajo.cooperative_id),
                json!({
                    "ajoId": ajo.id,
                    "memberId": member.id,
                    "status": invitation.status,
                }),
            ),
        )
        .await;

        match self.directory.find_admins(&ajo.cooperative_id).await {
            Ok(admins) => {
                self.notifier
                    .dispatch(admin_updates(&ajo, &member, invitation.status, &admins))
                    .await;
            }
            Err(e) => {
                tracing::warn!(
                    ajo_id = %ajo.id,
                    error = %e,
                    "Failed to load admins for invitation response"
                );
            }
        }

        Ok(invitation)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn admin_updates(
    ajo: &Ajo,
    responder: &Member,
    status: InvitationStatus,
    admins: &[Member],
) -> Deliveries {
    let name = responder.display_name();
    let mut deliveries = Deliveries::new();

    for admin in admins.iter().filter(|a| a.id != responder.id) {
        if let Some(user_id) = admin.user_id() {
            deliveries.notify(Notification {
                user_id: user_id.clone(),
                kind: NotificationKind::AjoInvitationResponse,
                title: format!("Invitation {}", status),
                body: format!("{} {} the invitation to {}", name, status, ajo.title),
                data: json!({ "ajoId": ajo.id, "memberId": responder.id, "status": status }),
            });
        }
        if let Some(email) = admin.email() {
            deliveries.email(templates::invitation_response(
                email,
                &admin.display_name(),
                &name,
                ajo,
                status,
            ));
        }
    }

    deliveries
}
