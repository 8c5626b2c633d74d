pub mod controller;
pub mod hints;
pub mod share;

pub use controller::{GameController, GuessRejected, GuessRow, Key, KeyOutcome, RoundOutcome, RoundState};
pub use hints::HintReveal;
