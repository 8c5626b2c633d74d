pub mod constants;
pub mod shared_word_game;
pub mod validation;
pub mod word_bank;
