//! Chess core for the session coordinator.
//!
//! - [`Move`]: long-form move notation (`e2e4`, `e7e8q`)
//! - [`Position`]: board state plus the history needed for repetition and
//!   engine synchronisation
//! - [`RulesOracle`] / [`StandardRules`]: legality and termination predicates
//! - [`classify`]: turns a position into a [`SessionState`]
//! - [`position_args`] / [`parse_position_args`]: the `position` command of
//!   the UCI protocol

pub mod board;
pub mod rules;
pub mod status;
pub mod types;
pub mod uci;

pub use board::*;
pub use rules::*;
pub use status::*;
pub use types::*;
pub use uci::*;

// Square and piece names used to build moves by hand.
pub use shakmaty::{Role, Square};
