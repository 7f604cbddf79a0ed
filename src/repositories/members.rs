use crate::models::members::{Member, NewMember, ReferralEdge};

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct MemberRepository {
    conn: PgPool,
}

impl MemberRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    /// Registers a member. The presented referral code is resolved to the
    /// recruiter once, here; `recruiter_id` is immutable afterwards. An
    /// unknown code registers the member with no recruiter.
    pub async fn insert_member(&self, new: NewMember) -> Result<Member, anyhow::Error> {
        let member_id = Uuid::new_v4().hyphenated().to_string();
        let own_code = generate_referral_code();

        let recruiter_id: Option<String> = match new.referral_code {
            Some(code) => self
                .get_member_by_referral_code(&code)
                .await?
                .map(|recruiter| recruiter.id),
            None => None,
        };

        let member = sqlx::query_as::<_, Member>(
            r#"
                INSERT INTO members (id, full_name, email, phone, referral_code, recruiter_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(new.full_name)
        .bind(new.email)
        .bind(new.phone)
        .bind(own_code)
        .bind(recruiter_id)
        .fetch_one(&self.conn)
        .await?;

        Ok(member)
    }

    pub async fn get_member_by_id(&self, member_id: &str) -> Result<Option<Member>, anyhow::Error> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(member)
    }

    pub async fn get_member_by_referral_code(
        &self,
        code: &str,
    ) -> Result<Option<Member>, anyhow::Error> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE referral_code = $1")
            .bind(code)
            .fetch_optional(&self.conn)
            .await?;

        Ok(member)
    }

    /// Opts a member into the 7th Heaven Club. Returns false when the
    /// member does not exist.
    pub async fn join_club(&self, member_id: &str) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            "UPDATE members SET club_member = true, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(member_id)
        .execute(&self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_club_members(&self) -> Result<Vec<Member>, anyhow::Error> {
        let members =
            sqlx::query_as::<_, Member>("SELECT * FROM members WHERE club_member = true")
                .fetch_all(&self.conn)
                .await?;

        Ok(members)
    }

    /// One flat load of the recruiter graph, a consistent snapshot for
    /// the traversal engine.
    pub async fn load_edges(&self) -> Result<Vec<ReferralEdge>, anyhow::Error> {
        let edges = sqlx::query_as::<_, ReferralEdge>("SELECT id, recruiter_id FROM members")
            .fetch_all(&self.conn)
            .await?;

        Ok(edges)
    }
}

/// Short uppercase code handed to new members, collision-checked by the
/// unique constraint on members.referral_code.
fn generate_referral_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("HVN{}", &raw[..8].to_uppercase())
}
