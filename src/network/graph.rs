use std::collections::{HashMap, HashSet};

use crate::models::members::ReferralEdge;

/// Deepest level carrying reward significance.
pub const MAX_TIER_DEPTH: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Referral graph integrity violation: {0}")]
    DataIntegrity(String),
}

/// Descendant counts for one root member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelTally {
    /// Counts for depths 1..=7, index 0 being level 1.
    pub level_counts: [u64; MAX_TIER_DEPTH],
    pub total_within_tier_depth: u64,
    pub total_all_depths: u64,
}

/// Per-request snapshot of the recruiter forest, held as a child index.
/// Rebuilt from the live edge table on every request; there is no shared
/// cache across requests.
#[derive(Debug)]
pub struct ReferralGraph {
    children: HashMap<String, Vec<String>>,
    members: HashSet<String>,
    visited_cap: usize,
}

impl ReferralGraph {
    /// Builds the snapshot from one flat edge load. An edge whose
    /// recruiter is absent from the member set is a corrupt row and is
    /// rejected here rather than silently dropped.
    pub fn from_edges(edges: &[ReferralEdge], visited_cap: usize) -> Result<Self, GraphError> {
        let members: HashSet<String> = edges.iter().map(|e| e.id.clone()).collect();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();

        for edge in edges {
            if let Some(recruiter_id) = &edge.recruiter_id {
                if !members.contains(recruiter_id) {
                    return Err(GraphError::DataIntegrity(format!(
                        "member {} references missing recruiter {}",
                        edge.id, recruiter_id
                    )));
                }
                children
                    .entry(recruiter_id.clone())
                    .or_default()
                    .push(edge.id.clone());
            }
        }

        Ok(ReferralGraph {
            children,
            members,
            visited_cap,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Breadth-first expansion from `root`. Level 1 is the root's direct
    /// children, level k the children of level k-1. Counts are recorded
    /// up to [`MAX_TIER_DEPTH`]; the walk continues past it so that
    /// `total_all_depths` covers the whole team. A revisited member or a
    /// blown visited cap means the stored forest is corrupt.
    pub fn descend(&self, root: &str) -> Result<LevelTally, GraphError> {
        if !self.members.contains(root) {
            return Err(GraphError::DataIntegrity(format!(
                "member {} is absent from the edge snapshot",
                root
            )));
        }

        let mut tally = LevelTally::default();
        let mut visited: HashSet<&str> = HashSet::from([root]);
        let mut frontier: Vec<&str> = vec![root];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            depth += 1;
            let mut next: Vec<&str> = Vec::new();

            for id in &frontier {
                if let Some(kids) = self.children.get(*id) {
                    for kid in kids {
                        if !visited.insert(kid.as_str()) {
                            return Err(GraphError::DataIntegrity(format!(
                                "cycle detected at member {}",
                                kid
                            )));
                        }
                        next.push(kid.as_str());
                    }
                }
            }

            if visited.len() > self.visited_cap {
                return Err(GraphError::DataIntegrity(format!(
                    "traversal exceeded the visited cap of {}",
                    self.visited_cap
                )));
            }

            let count = next.len() as u64;
            if depth <= MAX_TIER_DEPTH {
                tally.level_counts[depth - 1] = count;
                tally.total_within_tier_depth += count;
            }
            tally.total_all_depths += count;
            frontier = next;
        }

        Ok(tally)
    }

    /// Tallies every member in one post-order pass over the forest:
    /// a node's level-k count is the sum of its children's level-(k-1)
    /// counts. Equivalent to [`descend`](Self::descend) per root but
    /// avoids repeating a full traversal for each member.
    pub fn descend_all(&self) -> Result<HashMap<String, LevelTally>, GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Gray,
            Black,
        }

        enum Frame<'a> {
            Enter(&'a str),
            Exit(&'a str),
        }

        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.members.len());
        let mut tallies: HashMap<String, LevelTally> = HashMap::with_capacity(self.members.len());

        for start in &self.members {
            if marks.contains_key(start.as_str()) {
                continue;
            }

            let mut stack = vec![Frame::Enter(start.as_str())];
            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter(id) => {
                        match marks.get(id) {
                            Some(Mark::Black) => continue,
                            Some(Mark::Gray) => {
                                return Err(GraphError::DataIntegrity(format!(
                                    "cycle detected at member {}",
                                    id
                                )));
                            }
                            None => {}
                        }
                        marks.insert(id, Mark::Gray);
                        stack.push(Frame::Exit(id));

                        if let Some(kids) = self.children.get(id) {
                            for kid in kids {
                                match marks.get(kid.as_str()) {
                                    Some(Mark::Gray) => {
                                        return Err(GraphError::DataIntegrity(format!(
                                            "cycle detected at member {}",
                                            kid
                                        )));
                                    }
                                    Some(Mark::Black) => {}
                                    None => stack.push(Frame::Enter(kid.as_str())),
                                }
                            }
                        }
                    }
                    Frame::Exit(id) => {
                        let mut tally = LevelTally::default();
                        if let Some(kids) = self.children.get(id) {
                            tally.level_counts[0] = kids.len() as u64;
                            for kid in kids {
                                let kid_tally = &tallies[kid.as_str()];
                                for d in 1..MAX_TIER_DEPTH {
                                    tally.level_counts[d] += kid_tally.level_counts[d - 1];
                                }
                                tally.total_all_depths += kid_tally.total_all_depths + 1;
                            }
                        }
                        tally.total_within_tier_depth = tally.level_counts.iter().sum();
                        marks.insert(id, Mark::Black);
                        tallies.insert(id.to_string(), tally);
                    }
                }
            }
        }

        Ok(tallies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, Option<&str>)]) -> Vec<ReferralEdge> {
        pairs
            .iter()
            .map(|(id, recruiter)| ReferralEdge {
                id: id.to_string(),
                recruiter_id: recruiter.map(|r| r.to_string()),
            })
            .collect()
    }

    fn graph(pairs: &[(&str, Option<&str>)]) -> ReferralGraph {
        ReferralGraph::from_edges(&edges(pairs), 10_000).unwrap()
    }

    #[test]
    fn childless_member_tallies_zero() {
        let g = graph(&[("root", None)]);
        let tally = g.descend("root").unwrap();

        assert_eq!(tally.level_counts, [0; MAX_TIER_DEPTH]);
        assert_eq!(tally.total_within_tier_depth, 0);
        assert_eq!(tally.total_all_depths, 0);
    }

    #[test]
    fn five_children_each_with_one_child() {
        let mut pairs: Vec<(String, Option<String>)> = vec![("root".to_string(), None)];
        for i in 0..5 {
            pairs.push((format!("c{}", i), Some("root".to_string())));
            pairs.push((format!("g{}", i), Some(format!("c{}", i))));
        }
        let flat: Vec<(&str, Option<&str>)> = pairs
            .iter()
            .map(|(id, r)| (id.as_str(), r.as_deref()))
            .collect();
        let g = graph(&flat);

        let tally = g.descend("root").unwrap();
        assert_eq!(tally.level_counts, [5, 5, 0, 0, 0, 0, 0]);
        assert_eq!(tally.total_within_tier_depth, 10);
        assert_eq!(tally.total_all_depths, 10);
    }

    #[test]
    fn deep_chain_counts_past_tier_depth() {
        // root -> a1 -> ... -> a9, nine descendants in a single line
        let mut pairs = vec![("root", None), ("a1", Some("root"))];
        let names = ["a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9"];
        let parents = ["a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8"];
        for i in 0..8 {
            pairs.push((names[i], Some(parents[i])));
        }
        let g = graph(&pairs);

        let tally = g.descend("root").unwrap();
        assert_eq!(tally.level_counts, [1; MAX_TIER_DEPTH]);
        assert_eq!(tally.total_within_tier_depth, 7);
        assert_eq!(tally.total_all_depths, 9);
    }

    #[test]
    fn descend_is_idempotent() {
        let g = graph(&[
            ("root", None),
            ("a", Some("root")),
            ("b", Some("root")),
            ("c", Some("a")),
        ]);

        let first = g.descend("root").unwrap();
        let second = g.descend("root").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn new_descendant_never_decreases_counts() {
        let base = [("root", None), ("a", Some("root")), ("b", Some("a"))];
        let before = graph(&base).descend("root").unwrap();

        let mut grown = base.to_vec();
        grown.push(("c", Some("b")));
        let after = graph(&grown).descend("root").unwrap();

        for d in 0..MAX_TIER_DEPTH {
            assert!(after.level_counts[d] >= before.level_counts[d]);
        }
        assert!(after.total_all_depths > before.total_all_depths);
    }

    #[test]
    fn cycle_terminates_with_integrity_error() {
        let g = graph(&[("a", Some("b")), ("b", Some("a"))]);

        let err = g.descend("a").unwrap_err();
        assert!(matches!(err, GraphError::DataIntegrity(_)));

        let err = g.descend_all().unwrap_err();
        assert!(matches!(err, GraphError::DataIntegrity(_)));
    }

    #[test]
    fn missing_recruiter_is_rejected_at_build() {
        let err = ReferralGraph::from_edges(&edges(&[("a", Some("ghost"))]), 100).unwrap_err();
        assert!(matches!(err, GraphError::DataIntegrity(_)));
    }

    #[test]
    fn visited_cap_bounds_traversal() {
        let pairs = [
            ("root", None),
            ("a", Some("root")),
            ("b", Some("root")),
            ("c", Some("a")),
        ];
        let g = ReferralGraph::from_edges(&edges(&pairs), 2).unwrap();

        let err = g.descend("root").unwrap_err();
        assert!(matches!(err, GraphError::DataIntegrity(_)));
    }

    #[test]
    fn descend_all_agrees_with_per_root_descend() {
        let pairs = [
            ("r1", None),
            ("r2", None),
            ("a", Some("r1")),
            ("b", Some("r1")),
            ("c", Some("a")),
            ("d", Some("c")),
            ("e", Some("r2")),
        ];
        let g = graph(&pairs);

        let all = g.descend_all().unwrap();
        for (id, _) in &pairs {
            assert_eq!(all[*id], g.descend(id).unwrap(), "mismatch for {}", id);
        }
    }

    #[test]
    fn absent_root_is_an_integrity_error() {
        let g = graph(&[("root", None)]);
        let err = g.descend("nobody").unwrap_err();
        assert!(matches!(err, GraphError::DataIntegrity(_)));
    }
}
