pub mod bot;
pub mod policy;

pub use bot::{BidPlanner, BotContext, BotDifficulty, BotParams, PlayPlanner};
pub use policy::{HeuristicAgent, RandomAgent};
