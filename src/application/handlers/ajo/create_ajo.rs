//! CreateAjoHandler - Command handler for starting a new Ajo.

use std::sync::Arc;

use serde_json::json;

use crate::domain::activity::{actions, ActivityRecord};
use crate::domain::ajo::{Ajo, AjoError, AjoFrequency, AjoMember, NewAjo};
use crate::domain::cooperative::Member;
use crate::domain::foundation::{CommandMetadata, CooperativeId, MemberId, Timestamp};
use crate::ports::{
    ActivityLog, AjoRepository, MemberDirectory, Notification, NotificationKind,
};

use super::{join_roster, record_activity, require_admin, templates, AjoNotifier, Deliveries, RosterEntry};

#[derive(Debug, Clone)]
pub struct CreateAjoCommand {
    pub cooperative_id: CooperativeId,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub frequency: AjoFrequency,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_continuous: bool,
    pub member_ids: Vec<MemberId>,
}

#[derive(Debug, Clone)]
pub struct CreateAjoResult {
    pub ajo: Ajo,
    pub members: Vec<RosterEntry>,
}

/// Creates an Ajo with its invited members.
///
/// Offline members are accepted on creation; online members are left
/// pending and invited in-app and by email.
pub struct CreateAjoHandler {
    repository: Arc<dyn AjoRepository>,
    directory: Arc<dyn MemberDirectory>,
    activity: Arc<dyn ActivityLog>,
    notifier: AjoNotifier,
}

impl CreateAjoHandler {
    pub fn new(
        repository: Arc<dyn AjoRepository>,
        directory: Arc<dyn MemberDirectory>,
        activity: Arc<dyn ActivityLog>,
        notifier: AjoNotifier,
    ) -> Self {
        Self {
            repository,
            directory,
            activity,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateAjoCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateAjoResult, AjoError> {
        let admin =
            require_admin(self.directory.as_ref(), &cmd.cooperative_id, &metadata.user_id).await?;

        // Every requested id must resolve inside this cooperative.
        let members = self
            .directory
            .find_many_in_cooperative(&cmd.cooperative_id, &cmd.member_ids)
            .await?;
        if members.len() != cmd.member_ids.len() {
            return Err(AjoError::bad_request(
                "One or more members do not belong to this cooperative",
            ));
        }

        let ajo = Ajo::create(NewAjo {
            cooperative_id: cmd.cooperative_id,
            title: cmd.title,
            description: cmd.description,
            amount: cmd.amount,
            frequency: cmd.frequency,
            start_date: cmd.start_date,
            end_date: cmd.end_date,
            is_continuous: cmd.is_continuous,
            created_by: metadata.user_id.clone(),
        })?;

        let now = Timestamp::now();
        let memberships: Vec<AjoMember> = members
            .iter()
            .map(|member| AjoMember::invite(ajo.id, member, now))
            .collect();

        self.repository.create(&ajo, &memberships).await?;

        tracing::info!(
            ajo_id = %ajo.id,
            cooperative_id = %ajo.cooperative_id,
            member_count = memberships.len(),
            correlation_id = %metadata.correlation_id(),
            "Ajo created"
        );

        record_activity(
            self.activity.as_ref(),
            ActivityRecord::new(
                metadata.user_id.clone(),
                actions::AJO_CREATED,
                format!(
                    "Created Ajo \"{}\" with {} members",
                    ajo.title,
                    memberships.len()
                ),
                Some(ajo.cooperative_id),
                json!({
                    "ajoId": ajo.id,
                    "title": ajo.title,
                    "memberCount": memberships.len(),
                }),
            ),
        )
        .await;

        self.notifier
            .dispatch(invitations(&ajo, &admin, &members, &metadata))
            .await;

        Ok(CreateAjoResult {
            members: join_roster(memberships, &members),
            ajo,
        })
    }
}

fn invitations(ajo: &Ajo, admin: &Member, members: &[Member], metadata: &CommandMetadata) -> Deliveries {
    let inviter = admin.display_name();
    let mut deliveries = Deliveries::new();

    for member in members.iter().filter(|m| m.is_online()) {
        let Some(user_id) = member.user_id() else {
            continue;
        };
        if user_id == &metadata.user_id {
            continue;
        }

        deliveries.notify(Notification {
            user_id: user_id.clone(),
            kind: NotificationKind::AjoInvitation,
            title: "New Ajo invitation".to_string(),
            body: format!("{} invited you to join {}", inviter, ajo.title),
            data: json!({ "ajoId": ajo.id, "cooperativeId": ajo.cooperative_id }),
        });

        if let Some(email) = member.email() {
            deliveries.email(templates::invitation(
                email,
                &member.display_name(),
                &inviter,
                ajo,
            ));
        }
    }

    deliveries
}
