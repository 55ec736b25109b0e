use super::{BotContext, BotDifficulty, BotParams};
use twohundred_core::model::bidding::Auction;
use twohundred_core::model::deck::TOTAL_POINTS;
use twohundred_core::model::hand::Hand;
use twohundred_core::model::player::PlayerPosition;
use twohundred_core::model::rank::Rank;
use twohundred_core::model::suit::Suit;

pub struct BidPlanner;

impl BidPlanner {
    pub fn choose(ctx: &BotContext<'_>) -> u32 {
        Self::bid_for(
            ctx.hand,
            ctx.round.auction(),
            ctx.seat,
            ctx.difficulty,
            ctx.params,
        )
    }

    /// Smallest step-aligned raise the hand can support, or 0 to pass.
    /// Never outbids a partner who already holds the high bid.
    pub fn bid_for(
        hand: &Hand,
        auction: &Auction,
        seat: PlayerPosition,
        difficulty: BotDifficulty,
        params: &BotParams,
    ) -> u32 {
        if let Some(high) = auction.high_bid()
            && high.player.team() == seat.team()
        {
            return 0;
        }

        let (_, estimate) = Self::best_trump(hand, params);
        let ceiling = match difficulty {
            BotDifficulty::Easy => estimate,
            BotDifficulty::Normal => scale(estimate, params.aggression),
        }
        .min(TOTAL_POINTS);

        match round_up(auction.minimum_raise().max(params.min_bid), params.bid_step) {
            Some(raise) if raise <= ceiling => raise,
            _ => 0,
        }
    }

    /// Suit that maximises the hand estimate, with that estimate. Ties go to
    /// the longer suit, then to the earlier suit in `Suit::ALL`.
    pub fn best_trump(hand: &Hand, params: &BotParams) -> (Suit, u32) {
        let mut best = (Suit::ALL[0], 0, 0);
        for suit in Suit::ALL {
            let estimate = estimate_points(hand, suit, params);
            let length = hand.count_suit(suit);
            if (estimate, length) > (best.1, best.2) {
                best = (suit, estimate, length);
            }
        }
        (best.0, best.1)
    }
}

/// Rough count of the points the team can expect with `trump` named.
pub(crate) fn estimate_points(hand: &Hand, trump: Suit, params: &BotParams) -> u32 {
    let mut estimate = hand.points() / 2;
    for card in hand.iter() {
        if card.suit == trump {
            estimate += params.trump_card_value;
            if card.rank >= Rank::Queen {
                estimate += params.trump_honour_value;
            }
        } else if card.rank == Rank::Ace {
            estimate += params.side_ace_value;
        }
    }
    estimate
}

fn scale(estimate: u32, aggression: f32) -> u32 {
    let scaled = (estimate as f32 * aggression.max(0.0)).round();
    if scaled >= TOTAL_POINTS as f32 {
        TOTAL_POINTS
    } else {
        scaled as u32
    }
}

fn round_up(amount: u32, step: u32) -> Option<u32> {
    if step <= 1 {
        return Some(amount);
    }
    amount.div_ceil(step).checked_mul(step)
}
