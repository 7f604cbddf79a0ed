use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, Deserialize, Serialize, FromRow)]
pub struct Member {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub referral_code: String,
    pub recruiter_id: Option<String>,
    pub club_member: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMember {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Referral code of the recruiter, if one was presented at signup.
    pub referral_code: Option<String>,
}

/// Flat parent edge of the recruiter graph, one row per member.
#[derive(Clone, Debug, FromRow)]
pub struct ReferralEdge {
    pub id: String,
    pub recruiter_id: Option<String>,
}
