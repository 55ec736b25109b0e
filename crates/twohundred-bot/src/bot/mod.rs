mod bid;
mod params;
mod play;

pub use bid::BidPlanner;
pub use params::BotParams;
pub use play::PlayPlanner;

use twohundred_core::model::card::Card;
use twohundred_core::model::hand::Hand;
use twohundred_core::model::player::PlayerPosition;
use twohundred_core::model::rank::Rank;
use twohundred_core::model::round::RoundState;
use twohundred_core::AgentView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Plays its first legal card and bids off the raw estimate.
    Easy,
    #[default]
    Normal,
}

impl BotDifficulty {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "normal" | "default" => Some(Self::Normal),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
        }
    }
}

pub struct BotContext<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a Hand,
    pub round: &'a RoundState,
    pub difficulty: BotDifficulty,
    pub params: &'a BotParams,
}

impl<'a> BotContext<'a> {
    pub fn new(view: &AgentView<'a>, difficulty: BotDifficulty, params: &'a BotParams) -> Self {
        Self {
            seat: view.seat,
            hand: view.hand,
            round: view.round,
            difficulty,
            params,
        }
    }

    /// Whether this seat's team holds the contract for the round.
    pub fn is_declaring(&self) -> bool {
        self.round
            .contract()
            .is_some_and(|bid| bid.player.team() == self.seat.team())
    }

    /// True when no card above `card` in its suit is still out in other hands.
    pub fn is_master(&self, card: Card) -> bool {
        Rank::ORDERED
            .iter()
            .filter(|rank| **rank > card.rank)
            .map(|&rank| Card::new(rank, card.suit))
            .all(|higher| self.hand.contains(higher) || self.round.is_played(higher))
    }
}

/// Cheapest card first: fewer points, then lower rank.
pub(crate) fn card_sort_key(card: Card) -> (u32, u8) {
    (card.points(), card.rank.value())
}

#[cfg(test)]
mod tests {
    use super::{BotContext, BotDifficulty, BotParams, card_sort_key};
    use twohundred_core::model::card::Card;
    use twohundred_core::model::hand::Hand;
    use twohundred_core::model::player::PlayerPosition;
    use twohundred_core::model::round::RoundState;

    fn hand(tokens: &[&str]) -> Hand {
        Hand::with_cards(tokens.iter().map(|t| t.parse().unwrap()).collect())
    }

    #[test]
    fn difficulty_labels_parse_loosely() {
        assert_eq!(BotDifficulty::from_label(" Easy "), Some(BotDifficulty::Easy));
        assert_eq!(BotDifficulty::from_label("default"), Some(BotDifficulty::Normal));
        assert_eq!(BotDifficulty::from_label("hard"), None);
        assert_eq!(BotDifficulty::Normal.label(), "normal");
    }

    #[test]
    fn sort_key_orders_counters_after_plain_cards() {
        let mut cards: Vec<Card> = ["AH", "6H", "5S", "KD"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        cards.sort_by_key(|&card| card_sort_key(card));
        let labels: Vec<String> = cards.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["6H", "KD", "5S", "AH"]);
    }

    #[test]
    fn master_card_accounts_for_own_hand() {
        let held = hand(&["AH", "KH", "5C"]);
        let round = RoundState::new();
        let params = BotParams::default();
        let ctx = BotContext {
            seat: PlayerPosition::North,
            hand: &held,
            round: &round,
            difficulty: BotDifficulty::Normal,
            params: &params,
        };
        assert!(ctx.is_master("AH".parse().unwrap()));
        assert!(ctx.is_master("KH".parse().unwrap()));
        assert!(!ctx.is_master("5C".parse().unwrap()));
        assert!(!ctx.is_declaring());
    }
}
