use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use twohundred_core::model::card::Card;
use twohundred_core::model::deck::TOTAL_POINTS;
use twohundred_core::model::suit::Suit;
use twohundred_core::{Agent, AgentView};

const DEFAULT_BID_CHANCE: f64 = 0.25;
const BID_STEP: u32 = 5;

/// Baseline agent: bids the minimum raise now and then, names a suit it
/// holds and plays any legal card. Seeded so benchmark runs replay exactly.
pub struct RandomAgent {
    name: String,
    rng: SmallRng,
    bid_chance: f64,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: SmallRng::seed_from_u64(seed),
            bid_chance: DEFAULT_BID_CHANCE,
        }
    }

    /// Probability of raising on any given turn, clamped to `0.0..=1.0`.
    pub fn with_bid_chance(mut self, chance: f64) -> Self {
        self.bid_chance = if chance.is_nan() {
            DEFAULT_BID_CHANCE
        } else {
            chance.clamp(0.0, 1.0)
        };
        self
    }

    pub fn bid_chance(&self) -> f64 {
        self.bid_chance
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_bid(&mut self, view: &AgentView<'_>) -> u32 {
        let raise = view
            .round
            .auction()
            .minimum_raise()
            .div_ceil(BID_STEP)
            .checked_mul(BID_STEP);
        match raise {
            Some(raise) if raise <= TOTAL_POINTS && self.rng.gen_bool(self.bid_chance) => raise,
            _ => 0,
        }
    }

    fn choose_trump(&mut self, view: &AgentView<'_>) -> Suit {
        let held: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|&suit| view.hand.has_suit(suit))
            .collect();
        let pool: &[Suit] = if held.is_empty() { &Suit::ALL } else { &held };
        pool.choose(&mut self.rng).copied().unwrap_or(Suit::Hearts)
    }

    fn play_card(&mut self, view: &AgentView<'_>) -> Card {
        view.legal_cards()
            .choose(&mut self.rng)
            .copied()
            .or_else(|| view.hand.cards().first().copied())
            .unwrap_or_else(|| panic!("{} asked to play from an empty hand", self.name))
    }
}
