use shared::constants::{GAME_TITLE, MAX_GUESSES};

use super::controller::GuessRow;

pub fn emoji_grid(rows: &[GuessRow]) -> String {
    rows.iter()
        .map(|row| row.tiles.iter().map(|tile| tile.status.emoji()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Spoiler-free summary of a finished round for pasting elsewhere.
pub fn share_text(rows: &[GuessRow], play_link: &str) -> String {
    format!(
        "{} {}/{}\n\n{}\n\nCan you beat my score? Play here: {}",
        GAME_TITLE,
        rows.len(),
        MAX_GUESSES,
        emoji_grid(rows),
        play_link
    )
}
