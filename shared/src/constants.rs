pub const MAX_GUESSES: usize = 6;
pub const HINT_TIERS: u32 = 3;

pub const GET_WORD_ENDPOINT: &str = "/api/get-word";
pub const UPDATE_PROGRESS_ENDPOINT: &str = "/api/update-progress";
pub const LOG_INVALID_WORD_ENDPOINT: &str = "/api/log-invalid-word";

pub const GAME_TITLE: &str = "GeoWordle";
pub const DEFAULT_PLAY_LINK: &str = "https://geowordle.mananagarwal.in/";

pub const UNKNOWN_WORD_ERROR: &str = "Not a valid country or city name";
pub const LOAD_GAME_ERROR: &str = "Error loading game. Please try again.";
pub const UPDATE_STATS_ERROR: &str = "Error updating stats.";
pub const LOAD_STATS_ERROR: &str = "Error loading stats. Using default values.";
pub const FINISH_ROUND_FIRST: &str = "Finish the current word first.";
pub const WIN_MESSAGE: &str = "Congratulations! You guessed it!";
