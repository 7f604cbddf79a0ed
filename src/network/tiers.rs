use crate::models::network::LevelProgress;
use crate::settings::Tier;

use super::graph::{LevelTally, MAX_TIER_DEPTH};

/// Static tier configuration: level number to target count and reward.
/// Reward amounts are display strings only, never computed on.
#[derive(Clone, Debug)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

pub struct TierReport {
    pub progress: Vec<LevelProgress>,
    pub completed_levels: Vec<u32>,
}

impl TierTable {
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        tiers.retain(|t| t.level >= 1 && t.level as usize <= MAX_TIER_DEPTH);
        tiers.sort_by_key(|t| t.level);

        TierTable { tiers }
    }

    /// The 7th Heaven Club ladder: odd levels with a x5 target progression.
    pub fn heaven_club_defaults() -> Self {
        TierTable::new(vec![
            Tier {
                level: 1,
                target: 5,
                reward: "₹5,000".to_string(),
            },
            Tier {
                level: 3,
                target: 25,
                reward: "₹25,000".to_string(),
            },
            Tier {
                level: 5,
                target: 125,
                reward: "₹1,25,000".to_string(),
            },
            Tier {
                level: 7,
                target: 625,
                reward: "₹6,25,000".to_string(),
            },
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Pure and total: completion is a strict >= check against the target,
    /// progress is capped at 100 and rounded to one decimal for display.
    pub fn evaluate(&self, tally: &LevelTally) -> TierReport {
        let mut progress = Vec::with_capacity(self.tiers.len());
        let mut completed_levels = Vec::new();

        for tier in &self.tiers {
            let count = tally.level_counts[(tier.level - 1) as usize];
            let pct = if tier.target == 0 {
                100.0
            } else {
                let raw = count as f64 / tier.target as f64 * 100.0;
                (raw.min(100.0) * 10.0).round() / 10.0
            };
            let complete = count >= tier.target;
            if complete {
                completed_levels.push(tier.level);
            }

            progress.push(LevelProgress {
                level: tier.level,
                count,
                target: tier.target,
                progress: pct,
                complete,
                reward: tier.reward.clone(),
            });
        }

        TierReport {
            progress,
            completed_levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_with_level_one(count: u64) -> LevelTally {
        let mut tally = LevelTally::default();
        tally.level_counts[0] = count;
        tally.total_within_tier_depth = count;
        tally.total_all_depths = count;
        tally
    }

    #[test]
    fn below_target_is_incomplete() {
        let report = TierTable::heaven_club_defaults().evaluate(&tally_with_level_one(4));

        let level1 = &report.progress[0];
        assert_eq!(level1.level, 1);
        assert_eq!(level1.progress, 80.0);
        assert!(!level1.complete);
        assert!(report.completed_levels.is_empty());
    }

    #[test]
    fn exact_target_completes() {
        let report = TierTable::heaven_club_defaults().evaluate(&tally_with_level_one(5));

        let level1 = &report.progress[0];
        assert_eq!(level1.progress, 100.0);
        assert!(level1.complete);
        assert_eq!(report.completed_levels, vec![1]);
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let report = TierTable::heaven_club_defaults().evaluate(&tally_with_level_one(7));

        let level1 = &report.progress[0];
        assert_eq!(level1.progress, 100.0);
        assert!(level1.complete);
    }

    #[test]
    fn zero_counts_complete_nothing() {
        let report = TierTable::heaven_club_defaults().evaluate(&LevelTally::default());

        assert!(report.completed_levels.is_empty());
        for tier in &report.progress {
            assert_eq!(tier.progress, 0.0);
            assert!(!tier.complete);
        }
    }

    #[test]
    fn scenario_five_direct_five_grandchildren() {
        let mut tally = LevelTally::default();
        tally.level_counts = [5, 5, 0, 0, 0, 0, 0];
        tally.total_within_tier_depth = 10;
        tally.total_all_depths = 10;

        let report = TierTable::heaven_club_defaults().evaluate(&tally);
        assert_eq!(report.completed_levels, vec![1]);

        let level3 = &report.progress[1];
        assert_eq!(level3.level, 3);
        assert_eq!(level3.count, 0);
        assert!(!level3.complete);
    }

    #[test]
    fn out_of_range_tiers_are_dropped() {
        let table = TierTable::new(vec![
            Tier {
                level: 9,
                target: 10,
                reward: "₹1".to_string(),
            },
            Tier {
                level: 0,
                target: 10,
                reward: "₹1".to_string(),
            },
        ]);
        assert!(table.is_empty());
    }

    #[test]
    fn progress_rounds_to_one_decimal() {
        // 1 of 3 -> 33.333..., displayed as 33.3
        let table = TierTable::new(vec![Tier {
            level: 1,
            target: 3,
            reward: "₹1".to_string(),
        }]);
        let report = table.evaluate(&tally_with_level_one(1));
        assert_eq!(report.progress[0].progress, 33.3);
    }
}
