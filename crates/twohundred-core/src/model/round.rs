use crate::error::EngineError;
use crate::model::bidding::{Auction, Bid};
use crate::model::card::Card;
use crate::model::player::{PlayerPosition, Team};
use crate::model::score::TeamPoints;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use std::collections::HashSet;

/// Everything about the deal in progress except the hands. Agents see it
/// through a shared reference; only the engine mutates it.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    auction: Auction,
    trump: Option<Suit>,
    trick_points: TeamPoints,
    played: HashSet<Card>,
    current_trick: Option<Trick>,
    trick_history: Vec<Trick>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn contract(&self) -> Option<Bid> {
        self.auction.contract()
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn trick_points(&self) -> TeamPoints {
        self.trick_points
    }

    pub fn is_played(&self, card: Card) -> bool {
        self.played.contains(&card)
    }

    pub fn current_trick(&self) -> Option<&Trick> {
        self.current_trick.as_ref()
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.current_trick.as_ref().and_then(Trick::lead_suit)
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn tricks_won(&self, team: Team) -> usize {
        self.trick_history
            .iter()
            .filter(|trick| trick.winner().team() == team)
            .count()
    }

    pub(crate) fn auction_mut(&mut self) -> &mut Auction {
        &mut self.auction
    }

    pub(crate) fn set_trump(&mut self, trump: Suit) {
        self.trump = Some(trump);
    }

    pub(crate) fn start_trick(&mut self, leader: PlayerPosition) -> Result<(), EngineError> {
        let trump = self
            .trump
            .ok_or_else(|| EngineError::illegal_state("trick started before trump was named"))?;
        if self.current_trick.is_some() {
            return Err(EngineError::illegal_state(
                "trick started while another is in progress",
            ));
        }
        self.current_trick = Some(Trick::new(leader, trump));
        Ok(())
    }

    /// Adds an already validated card to the open trick.
    pub(crate) fn record_play(
        &mut self,
        seat: PlayerPosition,
        card: Card,
    ) -> Result<(), EngineError> {
        if self.played.contains(&card) {
            return Err(EngineError::illegal_state(format!("{card} played twice")));
        }
        let trick = self
            .current_trick
            .as_mut()
            .ok_or_else(|| EngineError::illegal_state("card played with no open trick"))?;
        trick
            .play(seat, card)
            .map_err(|err| EngineError::illegal_state(err.to_string()))?;
        self.played.insert(card);
        Ok(())
    }

    /// Closes the open trick, credits its points to the winning team and
    /// returns the winner with the points taken.
    pub(crate) fn finish_trick(&mut self) -> Result<(PlayerPosition, u32), EngineError> {
        let trick = self
            .current_trick
            .take()
            .ok_or_else(|| EngineError::illegal_state("no trick to finish"))?;
        if !trick.is_complete() {
            return Err(EngineError::illegal_state(format!(
                "trick finished with {} of 4 cards",
                trick.plays().len()
            )));
        }
        let winner = trick.winner();
        let points = trick.points();
        self.trick_points.credit(winner, points);
        self.trick_history.push(trick);
        Ok((winner, points))
    }
}
