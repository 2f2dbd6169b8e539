//! Borda-count tally
//!
//! With `N` agents, the ballot position `i` (0-based) is worth `N - 1 - i`
//! points. Positions at or past `N - 1` are worth nothing. Every agent is
//! seeded at zero, so agents nobody ranked still appear in the scores.
//!
//! The top score decides the outcome: one leader is the winner, two or more
//! leaders are a tie. Ties are a valid result and are never broken.

use super::agent_id::AgentId;
use super::entities::Vote;
use std::collections::BTreeMap;

/// Result of folding every ballot into per-agent points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyOutcome {
    /// Points per agent, one entry for every id in `[1, N]`
    pub scores: BTreeMap<AgentId, u32>,
    /// Sole leader, if there is exactly one
    pub winner_id: Option<AgentId>,
    pub is_tie: bool,
    /// Every leader in ascending order when tied, empty otherwise
    pub tied_agents: Vec<AgentId>,
}

/// Borda-count scoring
pub struct BordaTally;

impl BordaTally {
    /// Points awarded for ballot position `position` in a council of `agent_count`
    pub fn points_for_position(agent_count: u32, position: usize) -> u32 {
        let position = u32::try_from(position).unwrap_or(u32::MAX);
        agent_count.saturating_sub(1).saturating_sub(position)
    }

    /// Total points a single ballot hands out
    pub fn ballot_weight(agent_count: u32, vote: &Vote) -> u32 {
        (0..vote.rankings.len())
            .map(|i| Self::points_for_position(agent_count, i))
            .sum()
    }

    /// Fold every ballot into scores and decide winner or tie
    pub fn compute(agent_count: u32, votes: &[Vote]) -> TallyOutcome {
        let mut scores: BTreeMap<AgentId, u32> =
            AgentId::all(agent_count).map(|id| (id, 0)).collect();

        for vote in votes {
            for (position, ranked) in vote.rankings.iter().enumerate() {
                // Ballot validation keeps ids in range; anything else is not scored
                if let Some(score) = scores.get_mut(ranked) {
                    *score += Self::points_for_position(agent_count, position);
                }
            }
        }

        let leaders: Vec<AgentId> = match scores.values().max() {
            Some(&max) => scores
                .iter()
                .filter(|&(_, &points)| points == max)
                .map(|(&id, _)| id)
                .collect(),
            None => Vec::new(),
        };

        match leaders.as_slice() {
            [winner] => TallyOutcome {
                winner_id: Some(*winner),
                is_tie: false,
                tied_agents: Vec::new(),
                scores,
            },
            [] => TallyOutcome {
                winner_id: None,
                is_tie: false,
                tied_agents: Vec::new(),
                scores,
            },
            _ => TallyOutcome {
                winner_id: None,
                is_tie: true,
                tied_agents: leaders,
                scores,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<AgentId> {
        raw.iter().copied().map(AgentId::new).collect()
    }

    fn vote(voter: u32, rankings: &[u32]) -> Vote {
        Vote::new(AgentId::new(voter), ids(rankings), "")
    }

    fn score(outcome: &TallyOutcome, id: u32) -> u32 {
        outcome.scores[&AgentId::new(id)]
    }

    #[test]
    fn test_points_for_position() {
        assert_eq!(BordaTally::points_for_position(3, 0), 2);
        assert_eq!(BordaTally::points_for_position(3, 1), 1);
        assert_eq!(BordaTally::points_for_position(3, 2), 0);
        assert_eq!(BordaTally::points_for_position(3, 10), 0);
        assert_eq!(BordaTally::points_for_position(5, 0), 4);
    }

    #[test]
    fn test_cyclic_votes_produce_three_way_tie() {
        // Every agent gets one first place (2) and one second place (1)
        let votes = vec![vote(1, &[2, 3]), vote(2, &[3, 1]), vote(3, &[1, 2])];
        let outcome = BordaTally::compute(3, &votes);

        assert_eq!(score(&outcome, 1), 3);
        assert_eq!(score(&outcome, 2), 3);
        assert_eq!(score(&outcome, 3), 3);
        assert!(outcome.is_tie);
        assert!(outcome.winner_id.is_none());
        assert_eq!(outcome.tied_agents, ids(&[1, 2, 3]));
    }

    #[test]
    fn test_single_winner() {
        let votes = vec![vote(1, &[2, 3]), vote(2, &[1, 3]), vote(3, &[2, 1])];
        let outcome = BordaTally::compute(3, &votes);

        // 1: 2 (from 2) + 1 (from 3) = 3; 2: 2 + 2 = 4; 3: 1 + 1 = 2
        assert_eq!(score(&outcome, 1), 3);
        assert_eq!(score(&outcome, 2), 4);
        assert_eq!(score(&outcome, 3), 2);
        assert_eq!(outcome.winner_id, Some(AgentId::new(2)));
        assert!(!outcome.is_tie);
        assert!(outcome.tied_agents.is_empty());
    }

    #[test]
    fn test_four_agent_winner() {
        let votes = vec![
            vote(1, &[4, 2, 3]),
            vote(2, &[1, 3, 4]),
            vote(3, &[4, 1, 2]),
            vote(4, &[1, 2, 3]),
        ];
        let outcome = BordaTally::compute(4, &votes);
        assert_eq!(score(&outcome, 1), 8);
        assert_eq!(score(&outcome, 2), 5);
        assert_eq!(score(&outcome, 3), 4);
        assert_eq!(score(&outcome, 4), 7);
        assert_eq!(outcome.winner_id, Some(AgentId::new(1)));
    }

    #[test]
    fn test_two_way_tie_is_reported_ascending() {
        let votes = vec![vote(4, &[2, 1]), vote(3, &[1, 2])];
        let outcome = BordaTally::compute(4, &votes);
        assert_eq!(score(&outcome, 1), 5);
        assert_eq!(score(&outcome, 2), 5);
        assert!(outcome.is_tie);
        assert!(outcome.winner_id.is_none());
        assert_eq!(outcome.tied_agents, ids(&[1, 2]));
    }

    #[test]
    fn test_zero_vote_agents_are_seeded() {
        let outcome = BordaTally::compute(5, &[vote(1, &[2])]);
        assert_eq!(outcome.scores.len(), 5);
        assert!(outcome.scores.keys().all(|id| id.is_within(5)));
        assert_eq!(score(&outcome, 2), 4);
        assert_eq!(score(&outcome, 5), 0);
        assert_eq!(outcome.winner_id, Some(AgentId::new(2)));
    }

    #[test]
    fn test_no_votes_ties_everyone() {
        let outcome = BordaTally::compute(3, &[]);
        assert!(outcome.is_tie);
        assert_eq!(outcome.tied_agents, ids(&[1, 2, 3]));
        assert!(outcome.scores.values().all(|&p| p == 0));
    }

    #[test]
    fn test_empty_ballots_do_not_score() {
        let votes = vec![
            Vote::failed(AgentId::new(1)),
            vote(2, &[3, 1]),
            Vote::failed(AgentId::new(3)),
        ];
        let outcome = BordaTally::compute(3, &votes);
        assert_eq!(score(&outcome, 3), 2);
        assert_eq!(score(&outcome, 1), 1);
        assert_eq!(outcome.winner_id, Some(AgentId::new(3)));
    }

    #[test]
    fn test_total_points_equal_sum_of_ballot_weights() {
        let agent_count = 6;
        let votes = vec![
            vote(1, &[2, 3, 4, 5, 6]),
            vote(2, &[6, 5]),
            vote(3, &[1]),
            Vote::failed(AgentId::new(4)),
            vote(5, &[4, 3, 2, 1, 6]),
            vote(6, &[5, 4, 3]),
        ];
        let outcome = BordaTally::compute(agent_count, &votes);

        let total: u32 = outcome.scores.values().sum();
        let expected: u32 = votes
            .iter()
            .map(|v| BordaTally::ballot_weight(agent_count, v))
            .sum();
        assert_eq!(total, expected);
        assert_eq!(outcome.scores.len(), agent_count as usize);
    }

    #[test]
    fn test_winner_or_tie_matches_maximum() {
        let votes = vec![vote(1, &[3, 2]), vote(2, &[3, 1]), vote(3, &[1, 2])];
        let outcome = BordaTally::compute(3, &votes);
        // 3: 2 + 2 = 4 is the unique maximum
        assert_eq!(outcome.winner_id, Some(AgentId::new(3)));
        assert_eq!(score(&outcome, 3), 4);
        assert!(!outcome.is_tie);
    }
}
