use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use core::fmt;
use thiserror::Error;

/// Failures raised while running a round. Neither kind is recoverable: an
/// illegal play is a broken agent, an illegal state is a broken engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("illegal play by {player}: {card} ({reason}, led suit {})", LedSuit(.led_suit))]
    IllegalPlay {
        player: PlayerPosition,
        card: Card,
        led_suit: Option<Suit>,
        reason: IllegalPlayReason,
    },
    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl EngineError {
    pub fn illegal_state(message: impl Into<String>) -> Self {
        EngineError::IllegalState(message.into())
    }

    /// Seat responsible for an illegal play, if that is what this error is.
    pub fn offending_player(&self) -> Option<PlayerPosition> {
        match self {
            EngineError::IllegalPlay { player, .. } => Some(*player),
            EngineError::IllegalState(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalPlayReason {
    #[error("card not in hand")]
    NotInHand,
    #[error("must follow suit")]
    MustFollowSuit,
}

struct LedSuit<'a>(&'a Option<Suit>);

impl fmt::Display for LedSuit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(suit) => write!(f, "{suit}"),
            None => f.write_str("none"),
        }
    }
}
