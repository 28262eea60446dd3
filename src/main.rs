//! Terminal front end
//!
//! Thin presentation layer over [`lmchess::GameSession`]: a line-oriented
//! command loop with an ASCII board. All rules, networking and recovery
//! logic live in the library.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use shakmaty::{Chess, File, Position, Rank, Role, Square};
use tracing_subscriber::EnvFilter;

use lmchess::ai::{ConnectionMonitor, RemoteMoveSource};
use lmchess::config::{PlayerColor, Settings};
use lmchess::game::{GameSession, HumanMoveOutcome};
use lmchess::storage::{SavedGame, SavedGameStore};

#[derive(Parser, Debug)]
#[command(name = "lmchess", about = "Play chess against an OpenAI-style move server")]
struct Cli {
    /// Base URL of the move server, including any API prefix
    #[arg(long)]
    base_url: Option<String>,

    /// Which side to play
    #[arg(long, value_enum)]
    color: Option<PlayerColor>,

    /// Pacing delay before each AI move, milliseconds
    #[arg(long)]
    move_delay_ms: Option<u64>,

    /// Seconds between connectivity probes
    #[arg(long)]
    probe_interval_secs: Option<u64>,

    /// Optional JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lmchess=warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref());
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(color) = cli.color {
        settings.human_color = color;
    }
    if let Some(delay) = cli.move_delay_ms {
        settings.move_delay_ms = delay;
    }
    if let Some(interval) = cli.probe_interval_secs {
        settings.probe_interval_secs = interval;
    }

    let client = reqwest::Client::new();
    let mut monitor = ConnectionMonitor::start(
        client.clone(),
        settings.base_url.clone(),
        settings.probe_interval(),
    );
    let source = RemoteMoveSource::new(
        client,
        settings.base_url.clone(),
        monitor.shared(),
        settings.move_delay(),
    );
    let store = SavedGameStore::open_default()?;
    let mut session = GameSession::new(settings.human_color.to_color());

    println!("lmchess - playing against {}", settings.base_url);
    println!("Commands: e2e4 | undo | redo | new | save <name> | games | load <n> | delete <n> | fen | moves | quit");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        if session.turn_state().is_remote_turn() {
            render(&session, &source);
            println!("AI is thinking...");
            session.play_remote_turn(&source).await?;
            continue;
        }

        render(&session, &source);
        if session.turn_state().is_over() {
            println!("{}", session.turn_state().describe());
        }

        if let Some((from, to)) = session.turn_state().awaiting_promotion() {
            print!("promote {from}{to} to [q/r/b/n, or cancel]: ");
        } else {
            print!("> ");
        }
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if session.turn_state().awaiting_promotion().is_some() {
            handle_promotion_input(&mut session, input);
            continue;
        }

        match input {
            "quit" | "exit" => break,
            "new" => session.new_game(),
            "undo" => {
                if !session.undo() {
                    println!("Nothing to undo.");
                }
            }
            "redo" => {
                if !session.redo() {
                    println!("Nothing to redo.");
                }
            }
            "fen" => println!("{}", session.fen()),
            "moves" => println!("{}", session.move_log().rendered()),
            "games" => list_games(&store),
            _ => {
                if let Some(name) = input.strip_prefix("save ") {
                    save_game(&store, &session, name.trim());
                } else if let Some(index) = input.strip_prefix("load ") {
                    load_game(&store, &mut session, index.trim(), settings.human_color);
                } else if let Some(index) = input.strip_prefix("delete ") {
                    delete_game(&store, index.trim());
                } else if let Some((from, to)) = parse_move(input) {
                    submit_move(&mut session, from, to);
                } else {
                    println!("Unrecognized command: {input:?}");
                }
            }
        }
    }

    monitor.stop();
    Ok(())
}

fn submit_move(session: &mut GameSession, from: Square, to: Square) {
    match session.submit_human_move(from, to) {
        Ok(HumanMoveOutcome::Played(_)) => {}
        Ok(HumanMoveOutcome::PromotionNeeded { .. }) => {}
        Err(err) => println!("Rejected: {err}"),
    }
}

fn handle_promotion_input(session: &mut GameSession, input: &str) {
    let kind = match input {
        "q" | "Q" => Some(Role::Queen),
        "r" | "R" => Some(Role::Rook),
        "b" | "B" => Some(Role::Bishop),
        "n" | "N" => Some(Role::Knight),
        "cancel" => None,
        _ => {
            println!("Choose one of q, r, b, n, or cancel.");
            return;
        }
    };
    match kind {
        Some(kind) => {
            if let Err(err) = session.choose_promotion(kind) {
                println!("Rejected: {err}");
            }
        }
        None => session.cancel_promotion(),
    }
}

fn list_games(store: &SavedGameStore) {
    match store.list() {
        Ok(games) if games.is_empty() => println!("No saved games."),
        Ok(games) => {
            for (index, game) in games.iter().enumerate() {
                println!(
                    "{index}: {} ({})",
                    game.name,
                    game.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Err(err) => println!("Storage error: {err}"),
    }
}

fn save_game(store: &SavedGameStore, session: &GameSession, name: &str) {
    if name.is_empty() {
        println!("Usage: save <name>");
        return;
    }
    let record = SavedGame {
        name: name.to_string(),
        fen: session.fen(),
        timestamp: chrono::Utc::now(),
    };
    match store.save(record) {
        Ok(()) => println!("Saved."),
        Err(err) => println!("Storage error: {err}"),
    }
}

fn load_game(store: &SavedGameStore, session: &mut GameSession, index: &str, color: PlayerColor) {
    let Ok(index) = index.parse::<usize>() else {
        println!("Usage: load <number>");
        return;
    };
    match store.list() {
        Ok(games) => match games.get(index) {
            Some(record) => match GameSession::from_fen(&record.fen, color.to_color()) {
                Ok(loaded) => {
                    *session = loaded;
                    println!("Loaded {:?}.", record.name);
                }
                Err(err) => println!("Saved game is corrupt: {err}"),
            },
            None => println!("No saved game {index}."),
        },
        Err(err) => println!("Storage error: {err}"),
    }
}

fn delete_game(store: &SavedGameStore, index: &str) {
    let Ok(index) = index.parse::<usize>() else {
        println!("Usage: delete <number>");
        return;
    };
    match store.delete(index) {
        Ok(Some(removed)) => println!("Deleted {:?}.", removed.name),
        Ok(None) => println!("No saved game {index}."),
        Err(err) => println!("Storage error: {err}"),
    }
}

/// Parse "e2e4" or "e2 e4" into a square pair
fn parse_move(input: &str) -> Option<(Square, Square)> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() != 4 || !compact.is_ascii() {
        return None;
    }
    let from = compact[0..2].parse::<Square>().ok()?;
    let to = compact[2..4].parse::<Square>().ok()?;
    Some((from, to))
}

fn render(session: &GameSession, source: &RemoteMoveSource) {
    println!();
    println!("{}", render_board(session.position()));
    println!("Status: {}", session.status_line());

    let connection = source.connection_state();
    if connection.connected {
        println!(
            "Server: connected ({})",
            connection.model_id.as_deref().unwrap_or("Unknown")
        );
    } else {
        println!("Server: offline - fallback strategy will answer");
    }

    let captured = session.captured();
    let white = captured.summary(shakmaty::Color::White);
    let black = captured.summary(shakmaty::Color::Black);
    if !white.is_empty() || !black.is_empty() {
        println!("Captured - White: [{white}]  Black: [{black}]");
    }
}

fn render_board(position: &Chess) -> String {
    let board = position.board();
    let mut out = String::new();
    for rank in (0..8).rev() {
        out.push_str(&format!("{} |", rank + 1));
        for file in 0..8 {
            let square = Square::from_coords(File::new(file), Rank::new(rank));
            let symbol = board.piece_at(square).map(|p| p.char()).unwrap_or('.');
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }
    out.push_str("   ----------------\n");
    out.push_str("    a b c d e f g h");
    out
}
