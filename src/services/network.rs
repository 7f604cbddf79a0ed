use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::members::Member;
use crate::models::network::{LeaderSummary, NetworkReport};
use crate::network::graph::{GraphError, LevelTally, ReferralGraph};
use crate::network::tiers::TierTable;
use crate::repositories::members::MemberRepository;

pub enum NetworkRequest {
    GetReport {
        target_user_id: String,
        response: oneshot::Sender<Result<NetworkReport, ServiceError>>,
    },
    ListLeaders {
        search: Option<String>,
        response: oneshot::Sender<Result<Vec<LeaderSummary>, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct NetworkRequestHandler {
    repository: MemberRepository,
    tiers: TierTable,
    visited_cap: usize,
}

impl NetworkRequestHandler {
    pub fn new(sql_conn: PgPool, tiers: TierTable, visited_cap: usize) -> Self {
        let repository = MemberRepository::new(sql_conn);

        NetworkRequestHandler {
            repository,
            tiers,
            visited_cap,
        }
    }

    async fn snapshot(&self) -> Result<ReferralGraph, ServiceError> {
        let edges = self
            .repository
            .load_edges()
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        ReferralGraph::from_edges(&edges, self.visited_cap).map_err(integrity)
    }

    async fn get_report(&self, target_user_id: &str) -> Result<NetworkReport, ServiceError> {
        let graph = self.snapshot().await?;
        if !graph.contains(target_user_id) {
            return Err(ServiceError::NotFound(format!(
                "member {}",
                target_user_id
            )));
        }

        let tally = graph.descend(target_user_id).map_err(integrity)?;

        Ok(build_network_report(target_user_id, &tally, &self.tiers))
    }

    /// One edge load, one memoized pass over the whole forest. Never a
    /// fresh traversal per member.
    async fn list_leaders(
        &self,
        search: Option<String>,
    ) -> Result<Vec<LeaderSummary>, ServiceError> {
        let members = self
            .repository
            .list_club_members()
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        let graph = self.snapshot().await?;
        let tallies = graph.descend_all().map_err(integrity)?;

        Ok(build_leader_summaries(
            &members,
            &tallies,
            &self.tiers,
            search.as_deref(),
        ))
    }
}

fn integrity(e: GraphError) -> ServiceError {
    ServiceError::DataIntegrity(e.to_string())
}

fn build_network_report(member_id: &str, tally: &LevelTally, tiers: &TierTable) -> NetworkReport {
    let report = tiers.evaluate(tally);

    NetworkReport {
        member_id: member_id.to_string(),
        level_counts: tally.level_counts.to_vec(),
        total_team_within_tier_depth: tally.total_within_tier_depth,
        total_team_all_depths: tally.total_all_depths,
        odd_level_progress: report.progress,
        completed_levels: report.completed_levels,
    }
}

fn build_leader_summaries(
    members: &[Member],
    tallies: &HashMap<String, LevelTally>,
    tiers: &TierTable,
    search: Option<&str>,
) -> Vec<LeaderSummary> {
    let empty = LevelTally::default();

    members
        .iter()
        .filter(|m| matches_search(m, search))
        .map(|m| {
            let tally = tallies.get(&m.id).unwrap_or(&empty);
            let report = tiers.evaluate(tally);
            let level7_progress = report
                .progress
                .iter()
                .find(|p| p.level == 7)
                .map(|p| p.progress)
                .unwrap_or(0.0);

            LeaderSummary {
                member_id: m.id.clone(),
                full_name: m.full_name.clone(),
                email: m.email.clone(),
                referral_code: m.referral_code.clone(),
                level1_count: tally.level_counts[0],
                level7_progress,
                total_team_within_tier_depth: tally.total_within_tier_depth,
                total_team_all_depths: tally.total_all_depths,
                completed_levels: report.completed_levels,
            }
        })
        .collect()
}

/// Case-insensitive substring match over name, email and referral code.
fn matches_search(member: &Member, search: Option<&str>) -> bool {
    let Some(query) = search else {
        return true;
    };
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    member.full_name.to_lowercase().contains(&query)
        || member.email.to_lowercase().contains(&query)
        || member.referral_code.to_lowercase().contains(&query)
}

#[async_trait]
impl RequestHandler<NetworkRequest> for NetworkRequestHandler {
    async fn handle_request(&self, request: NetworkRequest) {
        match request {
            NetworkRequest::GetReport {
                target_user_id,
                response,
            } => {
                let report = self.get_report(&target_user_id).await;
                let _ = response.send(report);
            }
            NetworkRequest::ListLeaders { search, response } => {
                let leaders = self.list_leaders(search).await;
                let _ = response.send(leaders);
            }
        }
    }
}

pub struct NetworkService;

impl NetworkService {
    pub fn new() -> Self {
        NetworkService {}
    }
}

#[async_trait]
impl Service<NetworkRequest, NetworkRequestHandler> for NetworkService {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::members::ReferralEdge;

    fn member(id: &str, name: &str, email: &str, code: &str) -> Member {
        let now = chrono::NaiveDateTime::default();
        Member {
            id: id.to_string(),
            full_name: name.to_string(),
            email: email.to_string(),
            phone: "9000000000".to_string(),
            referral_code: code.to_string(),
            recruiter_id: None,
            club_member: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn tallies_for(edges: &[(&str, Option<&str>)]) -> HashMap<String, LevelTally> {
        let edges: Vec<ReferralEdge> = edges
            .iter()
            .map(|(id, r)| ReferralEdge {
                id: id.to_string(),
                recruiter_id: r.map(|p| p.to_string()),
            })
            .collect();
        ReferralGraph::from_edges(&edges, 10_000)
            .unwrap()
            .descend_all()
            .unwrap()
    }

    #[test]
    fn leaders_carry_counts_and_completed_levels() {
        let members = vec![member("root", "Asha Rao", "asha@example.com", "HVNAAAA0001")];
        let tallies = tallies_for(&[
            ("root", None),
            ("a", Some("root")),
            ("b", Some("root")),
            ("c", Some("root")),
            ("d", Some("root")),
            ("e", Some("root")),
        ]);

        let leaders = build_leader_summaries(
            &members,
            &tallies,
            &TierTable::heaven_club_defaults(),
            None,
        );

        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].level1_count, 5);
        assert_eq!(leaders[0].total_team_all_depths, 5);
        assert_eq!(leaders[0].completed_levels, vec![1]);
        assert_eq!(leaders[0].level7_progress, 0.0);
    }

    #[test]
    fn search_filters_on_name_email_and_code() {
        let members = vec![
            member("m1", "Asha Rao", "asha@example.com", "HVNAAAA0001"),
            member("m2", "Vikram Shah", "vikram@example.com", "HVNBBBB0002"),
        ];
        let tallies = tallies_for(&[("m1", None), ("m2", None)]);
        let tiers = TierTable::heaven_club_defaults();

        let by_name = build_leader_summaries(&members, &tallies, &tiers, Some("asha"));
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].member_id, "m1");

        let by_email = build_leader_summaries(&members, &tallies, &tiers, Some("VIKRAM@"));
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].member_id, "m2");

        let by_code = build_leader_summaries(&members, &tallies, &tiers, Some("bbbb"));
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].member_id, "m2");

        let blank = build_leader_summaries(&members, &tallies, &tiers, Some("  "));
        assert_eq!(blank.len(), 2);
    }

    #[test]
    fn report_carries_both_team_totals() {
        // root -> a1 -> ... -> a8, one past the tier depth
        let tallies = tallies_for(&[
            ("root", None),
            ("a1", Some("root")),
            ("a2", Some("a1")),
            ("a3", Some("a2")),
            ("a4", Some("a3")),
            ("a5", Some("a4")),
            ("a6", Some("a5")),
            ("a7", Some("a6")),
            ("a8", Some("a7")),
        ]);

        let report =
            build_network_report("root", &tallies["root"], &TierTable::heaven_club_defaults());
        assert_eq!(report.level_counts, vec![1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(report.total_team_within_tier_depth, 7);
        assert_eq!(report.total_team_all_depths, 8);
        assert!(report.completed_levels.is_empty());
    }
}
