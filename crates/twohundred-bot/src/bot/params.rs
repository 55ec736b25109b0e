/// Tunable weights for the heuristic planners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Multiplier on the hand estimate before bidding. Above 1.0 overbids.
    pub aggression: f32,
    /// Lowest amount the bot will open with.
    pub min_bid: u32,
    /// Bids are rounded up to a multiple of this.
    pub bid_step: u32,

    // Hand evaluation
    pub trump_card_value: u32,
    pub trump_honour_value: u32,
    pub side_ace_value: u32,

    // Play scoring
    pub capture_mult: i32,
    pub slough_penalty_mult: i32,
    pub trump_spend_cost: i32,
    pub lead_master_bonus: i32,
    pub lead_trump_bonus: i32,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            aggression: 1.0,
            min_bid: 25,
            bid_step: 5,
            trump_card_value: 8,
            trump_honour_value: 6,
            side_ace_value: 12,
            capture_mult: 4,
            slough_penalty_mult: 4,
            trump_spend_cost: 12,
            lead_master_bonus: 80,
            lead_trump_bonus: 40,
        }
    }
}

impl BotParams {
    pub fn with_aggression(aggression: f32) -> Self {
        Self {
            aggression,
            ..Self::default()
        }
    }
}
