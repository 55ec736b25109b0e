use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::PlayerPosition;
use crate::model::round::RoundState;
use crate::model::score::MatchScores;
use crate::model::suit::Suit;

/// Read-only view handed to an agent at each decision point.
#[derive(Debug, Clone, Copy)]
pub struct AgentView<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a Hand,
    pub round: &'a RoundState,
    pub scores: &'a MatchScores,
}

impl AgentView<'_> {
    /// Cards the seat may play into the current trick.
    pub fn legal_cards(&self) -> Vec<Card> {
        self.hand.legal_cards(self.round.led_suit())
    }

    pub fn is_leading(&self) -> bool {
        self.round
            .current_trick()
            .is_none_or(|trick| trick.plays().is_empty())
    }
}

/// Decision-making capability for one seat. The engine calls each method
/// exactly once per decision and validates whatever comes back.
pub trait Agent: Send {
    fn name(&self) -> &str;

    /// Amount to bid; 0 passes.
    fn make_bid(&mut self, view: &AgentView<'_>) -> u32;

    /// Trump for the round, asked only of the contract holder.
    fn choose_trump(&mut self, view: &AgentView<'_>) -> Suit;

    /// Card to play; must be held and must follow suit when possible.
    fn play_card(&mut self, view: &AgentView<'_>) -> Card;
}

/// Agents in seat order, North first.
pub type Table = [Box<dyn Agent>; 4];
