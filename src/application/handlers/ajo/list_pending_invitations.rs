//! ListPendingInvitationsHandler - Query handler for the caller's open
//! invitations across every cooperative they belong to.

use std::sync::Arc;

use crate::domain::ajo::AjoError;
use crate::domain::foundation::{CommandMetadata, MemberId};
use crate::ports::{AjoReader, MemberDirectory, PendingInvitation};

pub struct ListPendingInvitationsHandler {
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
}

impl ListPendingInvitationsHandler {
    pub fn new(reader: Arc<dyn AjoReader>, directory: Arc<dyn MemberDirectory>) -> Self {
        Self { reader, directory }
    }

    /// Newest invitation first. A caller with no member record anywhere
    /// simply has no invitations.
    pub async fn handle(
        &self,
        metadata: CommandMetadata,
    ) -> Result<Vec<PendingInvitation>, AjoError> {
        let members = self.directory.find_all_for_user(&metadata.user_id).await?;
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<MemberId> = members.iter().map(|m| m.id).collect();
        Ok(self.reader.pending_invitations(&ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ajo::test_support::{metadata_for, online_member, outsider, World};
    use crate::domain::ajo::aggregate::test_support::new_ajo_input;
    use crate::domain::ajo::{Ajo, AjoMember, InvitationStatus};
    use crate::domain::cooperative::MemberRole;
    use crate::domain::foundation::{CooperativeId, Timestamp};
    use crate::ports::AjoRepository;

    #[tokio::test]
    async fn no_member_record_yields_empty_list() {
        let world = World::new();
        world.seed_ajo(&[&world.online]).await;
        let handler = ListPendingInvitationsHandler::new(world.store.clone(), world.directory.clone());

        assert!(handler.handle(outsider()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn spans_cooperatives_and_skips_answered() {
        let world = World::new();
        let answered = world.seed_ajo(&[&world.online]).await;
        world.set_invitation(&answered, &world.online, InvitationStatus::Accepted).await;
        let open = world.seed_ajo(&[&world.online, &world.offline]).await;

        // Same user, member of a second cooperative.
        let elsewhere = online_member(CooperativeId::new(), "ada", None, MemberRole::Member);
        world.directory.add(elsewhere.clone());
        let mut other_input = new_ajo_input(elsewhere.cooperative_id);
        other_input.title = "Other coop".to_string();
        let other = Ajo::create(other_input).unwrap();
        let row = AjoMember::invite(other.id, &elsewhere, Timestamp::now());
        world.store.create(&other, &[row]).await.unwrap();

        let handler = ListPendingInvitationsHandler::new(world.store.clone(), world.directory.clone());
        let invitations = handler.handle(metadata_for(&world.online)).await.unwrap();

        let titles: Vec<&str> = invitations.iter().map(|i| i.ajo.title.as_str()).collect();
        assert_eq!(titles, vec!["Other coop", "January Ajo"]);
        assert_eq!(invitations[1].ajo.id, open.id);
        assert_eq!(invitations[1].member_count, 2);
    }
}
