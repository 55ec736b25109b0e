use crate::error::{EngineError, IllegalPlayReason};
use crate::game::agent::{AgentView, Table};
use crate::model::bidding::{AuctionState, Bid};
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::{PlayerPosition, Team};
use crate::model::round::RoundState;
use crate::model::score::{MatchScores, ScoreDelta, TeamPoints};
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{Level, event};

/// Result of one deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Nobody bid; nothing is scored and the cards are redealt.
    Void,
    Settled(RoundSummary),
}

impl RoundOutcome {
    pub fn summary(&self) -> Option<&RoundSummary> {
        match self {
            RoundOutcome::Void => None,
            RoundOutcome::Settled(summary) => Some(summary),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub contract: Bid,
    pub trump: Suit,
    pub trick_points: TeamPoints,
    pub tricks_won: [usize; 2],
    pub delta: ScoreDelta,
}

impl RoundSummary {
    pub fn contract_team(&self) -> Team {
        self.contract.player.team()
    }
}

/// Runs a single deal: auction, trump, tricks, settlement. Owns the hands
/// and the round state for the duration; agents only ever borrow them.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    hands: [Hand; 4],
    state: RoundState,
}

impl RoundEngine {
    pub fn deal(deck: &Deck) -> Self {
        Self {
            hands: deck.deal(),
            state: RoundState::new(),
        }
    }

    /// Starts from preset hands. They must be the same size and share no card.
    pub fn with_hands(hands: [Hand; 4]) -> Result<Self, EngineError> {
        let size = hands[0].len();
        if hands.iter().any(|hand| hand.len() != size) {
            return Err(EngineError::illegal_state("hands differ in size"));
        }
        let mut seen = HashSet::new();
        for card in hands.iter().flat_map(Hand::iter) {
            if !seen.insert(*card) {
                return Err(EngineError::illegal_state(format!(
                    "{card} dealt to more than one hand"
                )));
            }
        }
        Ok(Self {
            hands,
            state: RoundState::new(),
        })
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn run(
        mut self,
        table: &mut Table,
        scores: &MatchScores,
    ) -> Result<RoundOutcome, EngineError> {
        let Some(contract) = self.run_auction(table, scores)? else {
            event!(target: "twohundred_core::engine", Level::DEBUG, "no bids, round void");
            return Ok(RoundOutcome::Void);
        };

        let trump = self.name_trump(table, scores, contract.player);

        let tricks = self.hands[0].len();
        let mut leader = contract.player;
        for _ in 0..tricks {
            leader = self.play_trick(table, scores, leader)?;
        }

        let trick_points = self.state.trick_points();
        let delta = ScoreDelta::settle(contract, trick_points);
        event!(
            target: "twohundred_core::engine",
            Level::INFO,
            bidder = %contract.player,
            amount = contract.amount,
            trump = %trump,
            north_south = trick_points.team(Team::NorthSouth),
            east_west = trick_points.team(Team::EastWest),
            made = delta.contract_made,
            "round settled"
        );

        Ok(RoundOutcome::Settled(RoundSummary {
            contract,
            trump,
            trick_points,
            tricks_won: Team::BOTH.map(|team| self.state.tricks_won(team)),
            delta,
        }))
    }

    fn view<'a>(&'a self, seat: PlayerPosition, scores: &'a MatchScores) -> AgentView<'a> {
        AgentView {
            seat,
            hand: &self.hands[seat.index()],
            round: &self.state,
            scores,
        }
    }

    fn run_auction(
        &mut self,
        table: &mut Table,
        scores: &MatchScores,
    ) -> Result<Option<Bid>, EngineError> {
        loop {
            let seat = match self.state.auction().state() {
                AuctionState::Bidding { current, .. } => current,
                AuctionState::Contracted(bid) => return Ok(Some(bid)),
                AuctionState::NoContract => return Ok(None),
            };
            let amount = table[seat.index()].make_bid(&self.view(seat, scores));
            let state = self.state.auction_mut().submit(amount)?;
            event!(
                target: "twohundred_core::auction",
                Level::DEBUG,
                seat = %seat,
                amount,
                state = ?state
            );
        }
    }

    fn name_trump(
        &mut self,
        table: &mut Table,
        scores: &MatchScores,
        holder: PlayerPosition,
    ) -> Suit {
        let trump = table[holder.index()].choose_trump(&self.view(holder, scores));
        event!(target: "twohundred_core::engine", Level::DEBUG, seat = %holder, trump = %trump);
        self.state.set_trump(trump);
        trump
    }

    fn play_trick(
        &mut self,
        table: &mut Table,
        scores: &MatchScores,
        leader: PlayerPosition,
    ) -> Result<PlayerPosition, EngineError> {
        self.state.start_trick(leader)?;
        for offset in 0..4 {
            let seat = leader.advance(offset);
            let card = table[seat.index()].play_card(&self.view(seat, scores));
            let led_suit = self.state.led_suit();
            let hand = &mut self.hands[seat.index()];
            if !hand.validate_play(card, led_suit) {
                let reason = if hand.contains(card) {
                    IllegalPlayReason::MustFollowSuit
                } else {
                    IllegalPlayReason::NotInHand
                };
                return Err(EngineError::IllegalPlay {
                    player: seat,
                    card,
                    led_suit,
                    reason,
                });
            }
            hand.remove(card)?;
            self.state.record_play(seat, card)?;
        }

        let (winner, points) = self.state.finish_trick()?;
        event!(
            target: "twohundred_core::engine",
            Level::DEBUG,
            trick = self.state.tricks_completed(),
            winner = %winner,
            points
        );
        Ok(winner)
    }
}
