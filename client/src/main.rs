use geowordle_client::api::HttpApi;
use geowordle_client::config;
use geowordle_client::game::{GameController, RoundState};
use geowordle_client::session::{Notice, NoticeKind, Session};
use geowordle_client::storage::FileStorage;
use shared::constants::{GAME_TITLE, MAX_GUESSES};
use shared::word_bank::{GeoDictionary, WordBank};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "Type a guess and press Enter. Commands: :hint :share :stats :next :quit";

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => println!("✅ {}", notice.message),
            NoticeKind::Error => println!("⚠️  {}", notice.message),
        }
    }
}

fn print_board(game: &GameController) {
    for row in game.rows() {
        let marks: String = row.tiles.iter().map(|tile| tile.status.emoji()).collect();
        println!("  {}  {}", row.word, marks);
    }
    let keys: Vec<String> = game
        .keyboard()
        .iter()
        .map(|(letter, status)| format!("{}{}", letter, status.emoji()))
        .collect();
    if !keys.is_empty() {
        println!("  Keys: {}", keys.join(" "));
    }
    if game.state() == RoundState::Playing {
        println!(
            "  Guess {}/{} ({} letters)",
            game.rows().len() + 1,
            MAX_GUESSES,
            game.answer_len()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let storage = FileStorage::open(config::get_state_path())?;
    let api = HttpApi::new(config::get_api_base_url());
    let dictionary = GeoDictionary::new(&WordBank::embedded()?);
    let mut session = Session::new(api, storage, dictionary, config::get_play_link());

    println!("🌍 {}", GAME_TITLE);
    if session.take_welcome() {
        println!("Guess the country or city in {} tries. Hints are there if you need them.", MAX_GUESSES);
    }
    println!("{}", HELP);
    print_notices(&session.take_notices());

    if let Err(notice) = session.next_word().await {
        print_notices(&[notice]);
    } else {
        print_board(session.controller());
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            ":quit" => break,
            ":hint" => {
                if session.reveal_hint().is_none() && session.controller().state() == RoundState::Playing {
                    println!("No more hints for this word.");
                }
                for (level, hint) in session.controller().visible_hints().iter().enumerate() {
                    println!("  Hint {}: {}", level + 1, hint);
                }
            }
            ":share" => match session.share_text() {
                Some(text) => println!("{}", text),
                None => println!("Finish the round to share it."),
            },
            ":stats" => {
                let stats = session.stats();
                let current = session.session_stats();
                println!(
                    "  Played {}  Win % {}  Streak {}  Max streak {}",
                    stats.played,
                    stats.win_percentage(),
                    stats.streak,
                    stats.max_streak
                );
                for (attempts, count) in &stats.guesses {
                    println!("  {}: {}", attempts, count);
                }
                println!(
                    "  This session: {} words, {} hints",
                    current.words_played, current.hints_used
                );
            }
            ":next" => match session.next_word().await {
                Ok(()) => print_board(session.controller()),
                Err(notice) => print_notices(&[notice]),
            },
            guess if session.controller().state() == RoundState::Playing => {
                let notices = session.submit_line(guess).await;
                print_notices(&notices);
                print_board(session.controller());
                if session.controller().state().is_over() {
                    println!("Type :next for another word or :share to share.");
                }
            }
            _ => println!("{}", HELP),
        }
    }

    Ok(())
}
