use crate::bot::{BidPlanner, BotContext, BotDifficulty, BotParams, PlayPlanner};
use tracing::{Level, event};
use twohundred_core::model::card::Card;
use twohundred_core::model::suit::Suit;
use twohundred_core::{Agent, AgentView};

/// Adapter that drives the bid and play planners through the engine's
/// `Agent` interface.
pub struct HeuristicAgent {
    name: String,
    difficulty: BotDifficulty,
    params: BotParams,
}

impl HeuristicAgent {
    pub fn new(name: impl Into<String>, difficulty: BotDifficulty, params: BotParams) -> Self {
        Self {
            name: name.into(),
            difficulty,
            params,
        }
    }

    pub fn normal(name: impl Into<String>) -> Self {
        Self::new(name, BotDifficulty::Normal, BotParams::default())
    }

    pub fn easy(name: impl Into<String>) -> Self {
        Self::new(name, BotDifficulty::Easy, BotParams::default())
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_bid(&mut self, view: &AgentView<'_>) -> u32 {
        let ctx = BotContext::new(view, self.difficulty, &self.params);
        let amount = BidPlanner::choose(&ctx);
        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "twohundred_bot::bid",
                Level::DEBUG,
                agent = %self.name,
                seat = %view.seat,
                minimum = view.round.auction().minimum_raise(),
                amount
            );
        }
        amount
    }

    fn choose_trump(&mut self, view: &AgentView<'_>) -> Suit {
        let (trump, estimate) = BidPlanner::best_trump(view.hand, &self.params);
        event!(
            target: "twohundred_bot::bid",
            Level::DEBUG,
            agent = %self.name,
            seat = %view.seat,
            trump = %trump,
            estimate
        );
        trump
    }

    fn play_card(&mut self, view: &AgentView<'_>) -> Card {
        let legal = view.legal_cards();
        let ctx = BotContext::new(view, self.difficulty, &self.params);
        let chosen = PlayPlanner::choose(&legal, &ctx)
            .or_else(|| view.hand.cards().first().copied())
            .unwrap_or_else(|| panic!("{} asked to play from an empty hand", self.name));
        log_play_decision(&self.name, view, &legal, chosen);
        chosen
    }
}

fn log_play_decision(name: &str, view: &AgentView<'_>, legal: &[Card], chosen: Card) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let legal = legal
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    event!(
        target: "twohundred_bot::play",
        Level::DEBUG,
        agent = %name,
        seat = %view.seat,
        trick = view.round.tricks_completed(),
        leading = view.is_leading(),
        legal = %legal,
        chosen = %chosen
    );
}

#[cfg(test)]
mod tests {
    use super::HeuristicAgent;
    use crate::bot::BotDifficulty;
    use twohundred_core::{Agent, MatchLimits, MatchState, RoundOutcome, Table};

    fn table() -> Table {
        std::array::from_fn(|seat| {
            Box::new(HeuristicAgent::normal(format!("heuristic-{seat}"))) as Box<dyn Agent>
        })
    }

    #[test]
    fn constructors_set_difficulty() {
        assert_eq!(HeuristicAgent::easy("e").difficulty(), BotDifficulty::Easy);
        let normal = HeuristicAgent::normal("n");
        assert_eq!(normal.difficulty(), BotDifficulty::Normal);
        assert_eq!(normal.name(), "n");
        assert_eq!(normal.params().aggression, 1.0);
    }

    #[test]
    fn heuristic_table_plays_legal_rounds() {
        let mut table = table();
        let mut state = MatchState::with_seed(31);
        for _ in 0..20 {
            let outcome = state.play_round(&mut table).unwrap();
            if let RoundOutcome::Settled(summary) = outcome {
                assert_eq!(summary.trick_points.totals().iter().sum::<u32>(), 120);
                assert!(summary.contract.amount >= 25);
            }
        }
    }

    #[test]
    fn heuristic_match_reaches_a_winner() {
        let mut table = table();
        let outcome = MatchState::with_seed(8)
            .play_to_completion(&mut table, MatchLimits::default())
            .unwrap();
        let winning = outcome.scores[outcome.winner.index()];
        let losing = outcome.scores[outcome.winner.opponent().index()];
        assert!(winning >= 200);
        assert!(winning >= losing);
    }
}
