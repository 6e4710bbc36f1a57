//! End-to-end flow: registry, controller, storage, and the othello rules
//! driven through raw move strings, the way the example binary does it.

use board_games::controller::{ControllerError, OthelloController};
use board_games::core::othello::{Othello, PieceCount};
use board_games::core::{FinishedState, Game, GameError, GameState};
use board_games::server::{GameServer, ServerError};
use board_games::storage::Database;

fn setup(db: Database) -> (GameServer, String, String) {
    let mut server = GameServer::new(db);
    server.register_game(Box::new(OthelloController::new()));
    let bob = server.register_user("bob", "bob@example.com").unwrap();
    let alice = server.register_user("alice", "alice@example.com").unwrap();
    (server, bob, alice)
}

#[test]
fn scripted_exchange() {
    let (server, bob, alice) = setup(Database::in_memory());
    let id = server
        .create_game(&[bob.clone(), alice.clone()], Othello::TYPE)
        .unwrap();

    // black captures (3,3), white captures (3,4), black recaptures (3,4)
    server.user_input(&bob, Othello::TYPE, &id, "3,2").unwrap();
    server.user_input(&alice, Othello::TYPE, &id, "2,4").unwrap();
    let rendered = server.user_input(&bob, Othello::TYPE, &id, "3,5").unwrap();

    let rows: Vec<&str> = rendered.split('\n').collect();
    assert_eq!(rows[2], "....W...");
    assert_eq!(rows[3], "..BBBB..");
    assert_eq!(rows[4], "...BW...");

    // replaying white's earlier move hits an occupied cell and changes nothing
    assert!(matches!(
        server
            .user_input(&alice, Othello::TYPE, &id, "2,4")
            .unwrap_err(),
        ServerError::Controller(ControllerError::Game(GameError::CellIsOccupied {
            row: 2,
            col: 4
        }))
    ));
    // (2,2) brackets (3,3) diagonally against the white piece at (4,4)
    let after = server.user_input(&alice, Othello::TYPE, &id, "2,2").unwrap();
    assert_ne!(after, rendered);
}

#[test]
fn game_survives_a_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");

    let (id, bob, alice) = {
        let (server, bob, alice) = setup(Database::open(&path).unwrap());
        let id = server
            .create_game(&[bob.clone(), alice.clone()], Othello::TYPE)
            .unwrap();
        server.user_input(&bob, Othello::TYPE, &id, "3,2").unwrap();
        (id, bob, alice)
    };

    // a fresh server over the same file picks the game up mid-flight
    let db = Database::open(&path).unwrap();
    let controller = OthelloController::new();
    let game = controller.load_game(&db, &id).unwrap();
    assert_eq!(game.counts(), PieceCount { black: 4, white: 1 });
    assert_eq!(game.state(), GameState::Turn(alice.clone()));
    assert_eq!(game.player_ids(), [alice.clone(), bob.clone()]);

    let mut server = GameServer::new(db);
    server.register_game(Box::new(OthelloController::new()));
    server.user_input(&alice, Othello::TYPE, &id, "2,4").unwrap();
    let game = controller.load_game(&Database::open(&path).unwrap(), &id).unwrap();
    assert_eq!(game.counts(), PieceCount { black: 3, white: 3 });
}

#[test]
fn finished_game_stays_finished() {
    let mut db = Database::in_memory();
    let bob = db.add_player("bob", "bob@example.com").unwrap().id;
    let alice = db.add_player("alice", "alice@example.com").unwrap().id;

    // a persisted record of a game bob already won
    let mut board = vec![vec![serde_json::Value::Null; 8]; 8];
    board[3][3] = serde_json::json!("White");
    board[3][4] = serde_json::json!("Black");
    board[4][3] = serde_json::json!("Black");
    board[4][4] = serde_json::json!("White");
    let state = serde_json::json!({
        "board": board,
        "black": bob,
        "white": alice,
        "winner": { "Win": bob },
    });
    db.put_game(board_games::storage::GameRecord {
        id: "game-1".to_string(),
        game_type: Othello::TYPE.to_string(),
        players: vec![bob.clone(), alice.clone()],
        state: state.to_string(),
    })
    .unwrap();

    let controller = OthelloController::new();
    let game = controller.load_game(&db, "game-1").unwrap();
    assert_eq!(game.winner(), Some(FinishedState::Win(bob.clone())));

    let mut server = GameServer::new(db);
    server.register_game(Box::new(OthelloController::new()));
    for player in [&bob, &alice] {
        assert!(matches!(
            server
                .user_input(player, Othello::TYPE, "game-1", "2,3")
                .unwrap_err(),
            ServerError::Controller(ControllerError::Game(GameError::GameIsFinished))
        ));
    }
}
