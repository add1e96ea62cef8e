pub mod agent;
pub mod random;
pub mod heuristic;

pub use agent::{Commander, CommanderKind, Decision, UnknownCommander};
pub use random::RandomCommander;
pub use heuristic::HeuristicCommander;
