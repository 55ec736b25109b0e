pub mod agent;
pub mod engine;
pub mod match_state;
