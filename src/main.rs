//! Example driver: registers the Othello controller, sets up two players,
//! and plays a short scripted exchange the way a UI layer would.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use board_games::controller::OthelloController;
use board_games::core::othello::Othello;
use board_games::core::Game;
use board_games::server::GameServer;
use board_games::storage::Database;

#[derive(Parser, Debug)]
#[command(about = "Turn-based board game server demo")]
struct Args {
    /// Path to the JSON database file.
    #[arg(long, env = "BOARD_GAMES_DB", default_value = "database.json")]
    database: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let db = Database::open(&args.database)?;
    let mut server = GameServer::new(db);
    // could register more games here
    server.register_game(Box::new(OthelloController::new()));

    let bob = find_or_register(&server, "bob", "bob@example.com")?;
    let alice = find_or_register(&server, "alice", "alice@example.com")?;

    let id = server.create_game(&[bob.clone(), alice.clone()], Othello::TYPE)?;
    info!(id = %id, "created a fresh othello game");

    // moves as they would arrive from a UI layer; the last one is a repeat
    // and gets rejected
    let script = [
        (&bob, "3,2"),
        (&alice, "2,4"),
        (&bob, "3,5"),
        (&alice, "2,4"),
    ];
    for (player, input) in script {
        if let Err(err) = server.user_input(player, Othello::TYPE, &id, input) {
            error!(%err, player = %player, input, "move was not accepted");
        }
    }

    Ok(())
}

fn find_or_register(
    server: &GameServer,
    name: &str,
    email: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Ok(id) = server.find_user(email) {
        return Ok(id);
    }
    Ok(server.register_user(name, email)?)
}
