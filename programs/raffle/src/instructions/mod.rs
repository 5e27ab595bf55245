#![allow(ambiguous_glob_reexports)]

pub mod initialize;
pub mod enter_raffle;
pub mod perform_upkeep;
pub mod fulfill_random_words;
pub mod views;

pub use initialize::*;
pub use enter_raffle::*;
pub use perform_upkeep::*;
pub use fulfill_random_words::*;
pub use views::*;
