use crate::error::EngineError;
use crate::model::card::Card;
use crate::model::suit::Suit;
use std::vec::Vec;

/// Cards held by one seat, kept grouped by suit then ascending rank. The
/// ordering is for presentation only and carries no rule meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn remove(&mut self, card: Card) -> Result<(), EngineError> {
        match self.cards.iter().position(|&c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                Ok(())
            }
            None => Err(EngineError::illegal_state(format!(
                "cannot remove {card}: not in hand"
            ))),
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    /// Follow-suit check: a held card of the led suit is required whenever
    /// the hand can follow; leading or being void allows any held card.
    pub fn validate_play(&self, card: Card, led_suit: Option<Suit>) -> bool {
        if !self.contains(card) {
            return false;
        }
        match led_suit {
            Some(led) if self.has_suit(led) => card.suit == led,
            _ => true,
        }
    }

    pub fn legal_cards(&self, led_suit: Option<Suit>) -> Vec<Card> {
        self.cards
            .iter()
            .copied()
            .filter(|&card| self.validate_play(card, led_suit))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn count_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|c| c.suit == suit).count()
    }

    pub fn points(&self) -> u32 {
        self.cards.iter().map(|c| c.points()).sum()
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}
