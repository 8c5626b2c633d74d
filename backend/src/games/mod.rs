pub mod backend_word_game;
