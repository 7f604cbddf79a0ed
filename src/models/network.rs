use serde::Serialize;

/// Progress against a single reward tier, recomputed on every request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub count: u64,
    pub target: u64,
    pub progress: f64,
    pub complete: bool,
    pub reward: String,
}

/// Drill-down view of one member's referral network.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReport {
    pub member_id: String,
    /// Descendant counts for depths 1..=7, index 0 being level 1.
    pub level_counts: Vec<u64>,
    pub total_team_within_tier_depth: u64,
    pub total_team_all_depths: u64,
    pub odd_level_progress: Vec<LevelProgress>,
    pub completed_levels: Vec<u32>,
}

/// One row of the club leaders list. Unsorted by contract, the
/// consuming UI applies its own ordering.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderSummary {
    pub member_id: String,
    pub full_name: String,
    pub email: String,
    pub referral_code: String,
    pub level1_count: u64,
    pub level7_progress: f64,
    pub total_team_within_tier_depth: u64,
    pub total_team_all_depths: u64,
    pub completed_levels: Vec<u32>,
}
