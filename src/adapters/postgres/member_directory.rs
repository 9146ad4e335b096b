//! PostgreSQL implementation of MemberDirectory.
//!
//! Reads `cooperative_members` joined with `users`. Both tables belong to
//! the cooperative module; this adapter never writes to them.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cooperative::{LinkedUser, Member, MemberRole, OfflineContact};
use crate::domain::foundation::{CooperativeId, DomainError, MemberId, UserId};
use crate::ports::MemberDirectory;

use super::rows::{db_error, parse_user_id};

pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, filter: &str, bind: MemberFilter<'_>) -> Result<Vec<Member>, DomainError> {
        let sql = format!("{} WHERE {} ORDER BY cm.created_at, cm.id", SELECT_MEMBERS, filter);
        let query = sqlx::query_as::<_, MemberRow>(&sql);

        let query = match bind {
            MemberFilter::Id(id) => query.bind(id),
            MemberFilter::CooperativeAndUser(cooperative_id, user_id) => {
                query.bind(cooperative_id).bind(user_id)
            }
            MemberFilter::CooperativeAndIds(cooperative_id, ids) => {
                query.bind(cooperative_id).bind(ids)
            }
            MemberFilter::User(user_id) => query.bind(user_id),
            MemberFilter::Cooperative(cooperative_id) => query.bind(cooperative_id),
        };

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load cooperative members"))?;

        rows.into_iter().map(Member::try_from).collect()
    }
}

enum MemberFilter<'a> {
    Id(Uuid),
    CooperativeAndUser(Uuid, &'a str),
    CooperativeAndIds(Uuid, Vec<Uuid>),
    User(&'a str),
    Cooperative(Uuid),
}

const SELECT_MEMBERS: &str = r#"
    SELECT cm.id, cm.cooperative_id, cm.role, cm.is_offline_member,
           cm.first_name, cm.last_name, cm.email, cm.phone,
           u.id AS user_id, u.first_name AS user_first_name, u.last_name AS user_last_name,
           u.email AS user_email, u.phone AS user_phone
    FROM cooperative_members cm
    LEFT JOIN users u ON u.id = cm.user_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    cooperative_id: Uuid,
    role: String,
    is_offline_member: bool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    user_id: Option<String>,
    user_first_name: Option<String>,
    user_last_name: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let user = match row.user_id {
            Some(id) => Some(LinkedUser {
                id: parse_user_id("user_id", id)?,
                first_name: row.user_first_name.unwrap_or_default(),
                last_name: row.user_last_name.unwrap_or_default(),
                email: row.user_email,
                phone: row.user_phone,
            }),
            None => None,
        };

        Ok(Member {
            id: MemberId::from_uuid(row.id),
            cooperative_id: CooperativeId::from_uuid(row.cooperative_id),
            role: MemberRole::from_db(&row.role),
            user,
            offline: OfflineContact {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
            },
            is_offline_member: row.is_offline_member,
        })
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        let mut members = self
            .fetch("cm.id = $1", MemberFilter::Id(*id.as_uuid()))
            .await?;
        Ok(members.pop())
    }

    async fn find_in_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        user_id: &UserId,
    ) -> Result<Option<Member>, DomainError> {
        let members = self
            .fetch(
                "cm.cooperative_id = $1 AND cm.user_id = $2",
                MemberFilter::CooperativeAndUser(*cooperative_id.as_uuid(), user_id.as_str()),
            )
            .await?;
        Ok(members.into_iter().next())
    }

    async fn find_many_in_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        ids: &[MemberId],
    ) -> Result<Vec<Member>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        self.fetch(
            "cm.cooperative_id = $1 AND cm.id = ANY($2)",
            MemberFilter::CooperativeAndIds(*cooperative_id.as_uuid(), ids),
        )
        .await
    }

    async fn find_all_for_user(&self, user_id: &UserId) -> Result<Vec<Member>, DomainError> {
        self.fetch("cm.user_id = $1", MemberFilter::User(user_id.as_str()))
            .await
    }

    async fn find_admins(&self, cooperative_id: &CooperativeId) -> Result<Vec<Member>, DomainError> {
        self.fetch(
            "cm.cooperative_id = $1 AND cm.role = 'admin'",
            MemberFilter::Cooperative(*cooperative_id.as_uuid()),
        )
        .await
    }
}
