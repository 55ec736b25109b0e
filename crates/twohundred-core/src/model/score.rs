use crate::error::EngineError;
use crate::model::bidding::Bid;
use crate::model::player::{PlayerPosition, Team};
use serde::{Deserialize, Serialize};

/// Score at which the match ends.
pub const TARGET_SCORE: i64 = 200;

/// Card points taken in tricks during one round, per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPoints {
    totals: [u32; 2],
}

impl TeamPoints {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub const fn from_totals(totals: [u32; 2]) -> Self {
        Self { totals }
    }

    pub fn credit(&mut self, winner: PlayerPosition, points: u32) {
        self.totals[winner.team().index()] += points;
    }

    pub fn team(&self, team: Team) -> u32 {
        self.totals[team.index()]
    }

    pub fn totals(&self) -> [u32; 2] {
        self.totals
    }
}

/// Signed score change produced by settling one round. Wide enough to hold
/// any bid exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub changes: [i64; 2],
    pub contract_made: bool,
}

impl ScoreDelta {
    /// A made contract scores the points actually taken; a failed one costs
    /// the full bid. The defending team always keeps what it took.
    pub fn settle(contract: Bid, points: TeamPoints) -> Self {
        let bidders = contract.player.team();
        let defenders = bidders.opponent();
        let taken = points.team(bidders);
        let contract_made = taken >= contract.amount;

        let mut changes = [0i64; 2];
        changes[bidders.index()] = if contract_made {
            i64::from(taken)
        } else {
            -i64::from(contract.amount)
        };
        changes[defenders.index()] = i64::from(points.team(defenders));

        Self {
            changes,
            contract_made,
        }
    }

    pub fn team(&self, team: Team) -> i64 {
        self.changes[team.index()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScores {
    totals: [i64; 2],
}

impl MatchScores {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn score(&self, team: Team) -> i64 {
        self.totals[team.index()]
    }

    pub fn standings(&self) -> &[i64; 2] {
        &self.totals
    }

    pub fn set_totals(&mut self, totals: [i64; 2]) {
        self.totals = totals;
    }

    /// Adds a settled round. Scores are left untouched if either total would
    /// leave the `i64` range.
    pub fn apply(&mut self, delta: &ScoreDelta) -> Result<(), EngineError> {
        let mut next = self.totals;
        for team in Team::BOTH {
            next[team.index()] = next[team.index()]
                .checked_add(delta.team(team))
                .ok_or_else(|| {
                    EngineError::illegal_state(format!("score overflow for {team}"))
                })?;
        }
        self.totals = next;
        Ok(())
    }

    pub fn target_reached(&self) -> bool {
        self.totals.iter().any(|&score| score >= TARGET_SCORE)
    }

    /// Strictly higher score, or `None` on a tie.
    pub fn leader(&self) -> Option<Team> {
        let [north_south, east_west] = self.totals;
        match north_south.cmp(&east_west) {
            std::cmp::Ordering::Greater => Some(Team::NorthSouth),
            std::cmp::Ordering::Less => Some(Team::EastWest),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchScores, ScoreDelta, TeamPoints};
    use crate::error::EngineError;
use crate::model::bidding::Bid;
    use crate::model::player::{PlayerPosition, Team};

    #[test]
    fn trick_points_accrue_to_the_winners_team() {
        let mut points = TeamPoints::new();
        points.credit(PlayerPosition::North, 20);
        points.credit(PlayerPosition::South, 15);
        points.credit(PlayerPosition::West, 10);
        assert_eq!(points.team(Team::NorthSouth), 35);
        assert_eq!(points.team(Team::EastWest), 10);
    }

    #[test]
    fn made_contract_scores_points_taken_not_bid() {
        let delta = ScoreDelta::settle(
            Bid::new(PlayerPosition::East, 60),
            TeamPoints::from_totals([35, 85]),
        );
        assert!(delta.contract_made);
        assert_eq!(delta.team(Team::EastWest), 85);
        assert_eq!(delta.team(Team::NorthSouth), 35);
    }

    #[test]
    fn contract_met_exactly_is_made() {
        let delta = ScoreDelta::settle(
            Bid::new(PlayerPosition::South, 60),
            TeamPoints::from_totals([60, 60]),
        );
        assert!(delta.contract_made);
        assert_eq!(delta.changes, [60, 60]);
    }

    #[test]
    fn failed_contract_costs_full_bid() {
        let delta = ScoreDelta::settle(
            Bid::new(PlayerPosition::North, 80),
            TeamPoints::from_totals([75, 45]),
        );
        assert!(!delta.contract_made);
        assert_eq!(delta.team(Team::NorthSouth), -80);
        assert_eq!(delta.team(Team::EastWest), 45);
    }

    #[test]
    fn scores_apply_deltas_and_detect_target() {
        let mut scores = MatchScores::new();
        scores.set_totals([150, 180]);
        assert!(!scores.target_reached());
        scores
            .apply(&ScoreDelta {
                changes: [-50, 25],
                contract_made: false,
            })
            .unwrap();
        assert_eq!(scores.standings(), &[100, 205]);
        assert!(scores.target_reached());
        assert_eq!(scores.leader(), Some(Team::EastWest));
    }

    #[test]
    fn tied_scores_have_no_leader() {
        let mut scores = MatchScores::new();
        scores.set_totals([210, 210]);
        assert_eq!(scores.leader(), None);
    }

    #[test]
    fn failed_contract_above_i32_range_costs_the_exact_bid() {
        let delta = ScoreDelta::settle(
            Bid::new(PlayerPosition::North, 3_000_000_000),
            TeamPoints::from_totals([0, 0]),
        );
        assert_eq!(delta.team(Team::NorthSouth), -3_000_000_000);

        let mut scores = MatchScores::new();
        scores.apply(&delta).unwrap();
        scores.apply(&delta).unwrap();
        assert_eq!(scores.score(Team::NorthSouth), -6_000_000_000);
    }

    #[test]
    fn repeated_maximum_failures_accumulate_without_overflow() {
        let delta = ScoreDelta::settle(
            Bid::new(PlayerPosition::West, u32::MAX),
            TeamPoints::from_totals([70, 50]),
        );
        let mut scores = MatchScores::new();
        scores.apply(&delta).unwrap();
        scores.apply(&delta).unwrap();
        assert_eq!(scores.score(Team::EastWest), -2 * i64::from(u32::MAX));
        assert_eq!(scores.score(Team::NorthSouth), 140);
    }

    #[test]
    fn overflowing_total_is_rejected_and_scores_kept() {
        let mut scores = MatchScores::new();
        scores.set_totals([i64::MIN + 10, 5]);
        let err = scores
            .apply(&ScoreDelta {
                changes: [-20, 15],
                contract_made: false,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::IllegalState(_)));
        assert_eq!(scores.standings(), &[i64::MIN + 10, 5]);
    }
}
