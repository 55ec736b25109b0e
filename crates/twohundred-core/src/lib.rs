pub mod error;
pub mod game;
pub mod model;

pub use error::{EngineError, IllegalPlayReason};
pub use game::agent::{Agent, AgentView, Table};
pub use game::engine::{RoundEngine, RoundOutcome, RoundSummary};
pub use game::match_state::{MatchError, MatchLimits, MatchOutcome, MatchState};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "twohundred"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
