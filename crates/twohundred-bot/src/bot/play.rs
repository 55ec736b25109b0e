use super::{BotContext, BotDifficulty, card_sort_key};
use twohundred_core::model::card::Card;
use twohundred_core::model::player::PlayerPosition;
use twohundred_core::model::suit::Suit;
use twohundred_core::model::trick::trick_winner;

pub struct PlayPlanner;

impl PlayPlanner {
    /// Picks the best scoring card from `legal`; ties go to the cheaper card.
    pub fn choose(legal: &[Card], ctx: &BotContext<'_>) -> Option<Card> {
        if legal.len() <= 1 || ctx.difficulty == BotDifficulty::Easy {
            return legal.first().copied();
        }
        let trump = ctx.round.trump()?;
        let (leader, plays): (PlayerPosition, Vec<Card>) = match ctx.round.current_trick() {
            Some(trick) => (trick.leader(), trick.cards().collect()),
            None => (ctx.seat, Vec::new()),
        };

        let mut best: Option<(Card, i32)> = None;
        for &card in legal {
            let score = if plays.is_empty() {
                lead_score(ctx, card, trump)
            } else {
                follow_score(ctx, card, trump, leader, &plays)
            };
            let better = best.is_none_or(|(held, top)| {
                score > top || (score == top && card_sort_key(card) < card_sort_key(held))
            });
            if better {
                best = Some((card, score));
            }
        }
        best.map(|(card, _)| card)
    }
}

/// What it costs to part with a card regardless of the trick outcome.
fn spend_cost(ctx: &BotContext<'_>, card: Card, trump: Suit) -> i32 {
    let mut cost = i32::from(card.rank.value());
    if card.suit == trump {
        cost += ctx.params.trump_spend_cost;
    }
    cost
}

fn lead_score(ctx: &BotContext<'_>, card: Card, trump: Suit) -> i32 {
    let params = ctx.params;
    let points = card.points() as i32;
    let cost = spend_cost(ctx, card, trump);

    if ctx.is_master(card) {
        // Masters in trump cannot lose; a side master can still be ruffed.
        let bonus = if card.suit == trump {
            params.lead_master_bonus
        } else {
            params.lead_master_bonus / 2
        };
        return bonus + points * params.capture_mult - cost;
    }

    let mut score = -points * params.slough_penalty_mult - cost;
    if card.suit == trump && ctx.is_declaring() {
        // Pull the defenders' trumps while the master trumps are ours.
        score += params.lead_trump_bonus;
    }
    score
}

fn follow_score(
    ctx: &BotContext<'_>,
    card: Card,
    trump: Suit,
    leader: PlayerPosition,
    plays: &[Card],
) -> i32 {
    let params = ctx.params;
    let mut cards = plays.to_vec();
    cards.push(card);
    let winner = trick_winner(leader, trump, &cards);
    let pot: i32 = cards.iter().map(|c| c.points() as i32).sum();
    let opponents_to_play = cards.len() < 4;

    if winner.team() != ctx.seat.team() {
        return -(card.points() as i32) * params.slough_penalty_mult - spend_cost(ctx, card, trump);
    }

    let mut capture = pot * params.capture_mult;
    if opponents_to_play {
        capture /= 2;
    }
    if winner == ctx.seat {
        capture - spend_cost(ctx, card, trump)
    } else {
        // Partner keeps the trick; feed it points and keep the high cards.
        capture - i32::from(card.rank.value())
    }
}

#[cfg(test)]
mod tests {
    use super::{PlayPlanner, follow_score};
    use crate::bot::{BotContext, BotDifficulty, BotParams};
    use twohundred_core::model::card::Card;
    use twohundred_core::model::hand::Hand;
    use twohundred_core::model::player::PlayerPosition;
    use twohundred_core::model::round::RoundState;
    use twohundred_core::model::suit::Suit;

    fn cards(tokens: &[&str]) -> Vec<Card> {
        tokens.iter().map(|t| t.parse().unwrap()).collect()
    }

    /// Picks the best follow among `legal` given the trick so far.
    fn best_follow(
        seat: PlayerPosition,
        leader: PlayerPosition,
        trump: Suit,
        plays: &[&str],
        legal: &[&str],
    ) -> Card {
        let hand = Hand::with_cards(cards(legal));
        let round = RoundState::new();
        let params = BotParams::default();
        let ctx = BotContext {
            seat,
            hand: &hand,
            round: &round,
            difficulty: BotDifficulty::Normal,
            params: &params,
        };
        let plays = cards(plays);
        cards(legal)
            .into_iter()
            .max_by_key(|&card| follow_score(&ctx, card, trump, leader, &plays))
            .unwrap()
    }

    #[test]
    fn last_seat_dumps_counters_on_partner() {
        // Partner East holds the trick with the ace; West plays last.
        let card = best_follow(
            PlayerPosition::West,
            PlayerPosition::North,
            Suit::Spades,
            &["6H", "AH", "7H"],
            &["10H", "8H"],
        );
        assert_eq!(card.to_string(), "10H");
    }

    #[test]
    fn cheapest_winner_takes_a_fat_trick() {
        let card = best_follow(
            PlayerPosition::West,
            PlayerPosition::North,
            Suit::Spades,
            &["10H", "9H", "5H"],
            &["JH", "KH", "6H"],
        );
        assert_eq!(card.to_string(), "JH");
    }

    #[test]
    fn hopeless_trick_gets_the_lowest_card() {
        let card = best_follow(
            PlayerPosition::East,
            PlayerPosition::North,
            Suit::Clubs,
            &["AD"],
            &["5D", "6D", "10D"],
        );
        assert_eq!(card.to_string(), "6D");
    }

    #[test]
    fn void_in_led_suit_ruffs_a_valuable_trick() {
        let card = best_follow(
            PlayerPosition::West,
            PlayerPosition::North,
            Suit::Clubs,
            &["AH", "10H", "KH"],
            &["6C", "7S"],
        );
        assert_eq!(card.to_string(), "6C");
    }

    #[test]
    fn easy_bot_plays_first_legal_card() {
        let hand = Hand::with_cards(cards(&["AH", "5C"]));
        let round = RoundState::new();
        let params = BotParams::default();
        let ctx = BotContext {
            seat: PlayerPosition::North,
            hand: &hand,
            round: &round,
            difficulty: BotDifficulty::Easy,
            params: &params,
        };
        let legal = cards(&["5C", "AH"]);
        assert_eq!(PlayPlanner::choose(&legal, &ctx), Some(legal[0]));
        assert_eq!(PlayPlanner::choose(&[], &ctx), None);
    }
}
