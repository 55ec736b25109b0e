use crate::error::EngineError;
use crate::model::player::PlayerPosition;
use serde::{Deserialize, Serialize};

/// Consecutive non-improving calls that close the auction.
pub const PASSES_TO_CLOSE: u8 = 3;

/// A player's commitment that their team will take at least `amount` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub player: PlayerPosition,
    pub amount: u32,
}

impl Bid {
    pub const fn new(player: PlayerPosition, amount: u32) -> Self {
        Self { player, amount }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionState {
    Bidding {
        current: PlayerPosition,
        consecutive_passes: u8,
        high_bid: Option<Bid>,
    },
    Contracted(Bid),
    NoContract,
}

/// One recorded turn: what the seat asked for and whether it raised the bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub player: PlayerPosition,
    pub amount: u32,
    pub raised: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    state: AuctionState,
    calls: Vec<Call>,
}

impl Auction {
    pub fn new() -> Self {
        Self::starting_with(PlayerPosition::North)
    }

    pub fn starting_with(first: PlayerPosition) -> Self {
        Self {
            state: AuctionState::Bidding {
                current: first,
                consecutive_passes: 0,
                high_bid: None,
            },
            calls: Vec::new(),
        }
    }

    pub fn state(&self) -> AuctionState {
        self.state
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self.state, AuctionState::Bidding { .. })
    }

    /// Seat whose call is awaited, `None` once closed.
    pub fn current_player(&self) -> Option<PlayerPosition> {
        match self.state {
            AuctionState::Bidding { current, .. } => Some(current),
            _ => None,
        }
    }

    pub fn high_bid(&self) -> Option<Bid> {
        match self.state {
            AuctionState::Bidding { high_bid, .. } => high_bid,
            AuctionState::Contracted(bid) => Some(bid),
            AuctionState::NoContract => None,
        }
    }

    /// Smallest amount that would currently raise the bid. Saturates at
    /// `u32::MAX`, which then no longer raises anything.
    pub fn minimum_raise(&self) -> u32 {
        self.high_bid().map_or(1, |bid| bid.amount.saturating_add(1))
    }

    pub fn contract(&self) -> Option<Bid> {
        match self.state {
            AuctionState::Contracted(bid) => Some(bid),
            _ => None,
        }
    }

    /// Records the current seat's call. Zero, or anything not strictly above
    /// the high bid, counts toward the passes that close the auction.
    pub fn submit(&mut self, amount: u32) -> Result<AuctionState, EngineError> {
        let AuctionState::Bidding {
            current,
            consecutive_passes,
            high_bid,
        } = self.state
        else {
            return Err(EngineError::illegal_state(
                "bid submitted after the auction closed",
            ));
        };

        let high_amount = high_bid.map_or(0, |bid| bid.amount);
        let raised = amount > high_amount;
        self.calls.push(Call {
            player: current,
            amount,
            raised,
        });

        let (passes, high_bid) = if raised {
            (0, Some(Bid::new(current, amount)))
        } else {
            (consecutive_passes + 1, high_bid)
        };

        self.state = if passes >= PASSES_TO_CLOSE {
            match high_bid {
                Some(bid) => AuctionState::Contracted(bid),
                None => AuctionState::NoContract,
            }
        } else {
            AuctionState::Bidding {
                current: current.next(),
                consecutive_passes: passes,
                high_bid,
            }
        };
        Ok(self.state)
    }
}

impl Default for Auction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Auction, AuctionState, Bid};
    use crate::error::EngineError;
    use crate::model::player::PlayerPosition;

    fn run(amounts: &[u32]) -> Auction {
        let mut auction = Auction::new();
        for &amount in amounts {
            if auction.is_closed() {
                break;
            }
            auction.submit(amount).unwrap();
        }
        auction
    }

    #[test]
    fn single_bid_then_three_passes_contracts() {
        let auction = run(&[40, 0, 0, 0]);
        assert_eq!(
            auction.state(),
            AuctionState::Contracted(Bid::new(PlayerPosition::North, 40))
        );
    }

    #[test]
    fn raise_resets_pass_counter() {
        let auction = run(&[40, 60, 0, 0, 0]);
        assert_eq!(
            auction.contract(),
            Some(Bid::new(PlayerPosition::East, 60))
        );
        assert_eq!(auction.calls().len(), 5);
    }

    #[test]
    fn all_passes_yield_no_contract() {
        let auction = run(&[0, 0, 0, 0]);
        assert_eq!(auction.state(), AuctionState::NoContract);
        assert_eq!(auction.calls().len(), 3, "closes on the third pass");
        assert_eq!(auction.contract(), None);
    }

    #[test]
    fn non_improving_bid_counts_as_pass() {
        let auction = run(&[50, 50, 30, 0]);
        assert_eq!(
            auction.state(),
            AuctionState::Contracted(Bid::new(PlayerPosition::North, 50))
        );
        assert!(!auction.calls()[1].raised);
    }

    #[test]
    fn pass_counter_tracks_consecutive_non_raises() {
        let mut auction = Auction::new();
        auction.submit(25).unwrap();
        auction.submit(0).unwrap();
        let state = auction.submit(30).unwrap();
        assert_eq!(
            state,
            AuctionState::Bidding {
                current: PlayerPosition::West,
                consecutive_passes: 0,
                high_bid: Some(Bid::new(PlayerPosition::South, 30)),
            }
        );
        assert_eq!(auction.minimum_raise(), 31);
    }

    #[test]
    fn maximum_bid_cannot_be_raised() {
        let mut auction = Auction::new();
        auction.submit(u32::MAX).unwrap();
        assert_eq!(auction.minimum_raise(), u32::MAX);
        auction.submit(u32::MAX).unwrap();
        assert!(!auction.calls()[1].raised);
        assert_eq!(
            auction.high_bid(),
            Some(Bid::new(PlayerPosition::North, u32::MAX))
        );
    }

    #[test]
    fn auction_wraps_around_the_table() {
        let auction = run(&[0, 0, 35, 0, 40, 0, 0, 0]);
        assert_eq!(
            auction.contract(),
            Some(Bid::new(PlayerPosition::North, 40))
        );
    }

    #[test]
    fn submitting_after_close_is_illegal_state() {
        let mut auction = run(&[0, 0, 0]);
        assert!(auction.is_closed());
        assert!(matches!(
            auction.submit(10),
            Err(EngineError::IllegalState(_))
        ));
        assert_eq!(auction.current_player(), None);
    }
}
