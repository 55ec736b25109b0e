use twohundred_core::model::player::Team;

/// Which configured team (index into `teams`) sits on each side for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    north_south: usize,
    east_west: usize,
}

impl Seating {
    pub const fn new(north_south: usize, east_west: usize) -> Self {
        Self {
            north_south,
            east_west,
        }
    }

    /// Team 0 sits North/South unless sides swap on odd-numbered matches.
    pub fn for_match(match_index: usize, swap_sides: bool) -> Self {
        if swap_sides && match_index % 2 == 1 {
            Self::new(1, 0)
        } else {
            Self::new(0, 1)
        }
    }

    pub fn team_index(self, team: Team) -> usize {
        match team {
            Team::NorthSouth => self.north_south,
            Team::EastWest => self.east_west,
        }
    }
}

/// Per-seat RNG seed derived from the match seed.
pub fn seat_seed(match_seed: u64, seat_index: usize) -> u64 {
    match_seed ^ (seat_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
