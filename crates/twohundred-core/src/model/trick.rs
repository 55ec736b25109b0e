use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: PlayerPosition,
    trump: Suit,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub position: PlayerPosition,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
}

impl Trick {
    pub fn new(leader: PlayerPosition, trump: Suit) -> Self {
        Self {
            leader,
            trump,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    pub fn trump(&self) -> Suit {
        self.trump
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn expected_position(&self) -> PlayerPosition {
        self.leader.advance(self.plays.len())
    }

    pub fn play(&mut self, position: PlayerPosition, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        let expected = self.expected_position();
        if expected != position {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }

        self.plays.push(Play { position, card });
        Ok(())
    }

    /// Seat holding the trick so far; the leader for an empty trick.
    pub fn winner(&self) -> PlayerPosition {
        let cards: Vec<Card> = self.cards().collect();
        trick_winner(self.leader, self.trump, &cards)
    }

    pub fn winning_card(&self) -> Option<Card> {
        let winner = self.winner();
        self.plays
            .iter()
            .find(|play| play.position == winner)
            .map(|play| play.card)
    }

    pub fn points(&self) -> u32 {
        self.plays.iter().map(|play| play.card.points()).sum()
    }
}

/// Resolves who takes a trick from the cards in play order. The i-th card
/// belongs to the seat `i` places clockwise from `leader`.
pub fn trick_winner(leader: PlayerPosition, trump: Suit, cards: &[Card]) -> PlayerPosition {
    let Some((&first, rest)) = cards.split_first() else {
        return leader;
    };

    let led = first.suit;
    let mut winner = leader;
    let mut winning = first;
    for (offset, &card) in rest.iter().enumerate() {
        if beats(card, winning, led, trump) {
            winning = card;
            winner = leader.advance(offset + 1);
        }
    }
    winner
}

/// Whether `challenger` takes the trick from the card currently winning it.
pub fn beats(challenger: Card, winning: Card, led: Suit, trump: Suit) -> bool {
    let challenger_trump = challenger.suit == trump;
    let winning_trump = winning.suit == trump;
    match (challenger_trump, winning_trump) {
        (true, false) => true,
        (true, true) => challenger.rank > winning.rank,
        (false, true) => false,
        (false, false) => {
            challenger.suit == led && winning.suit == led && challenger.rank > winning.rank
        }
    }
}
