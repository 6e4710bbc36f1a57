//! Per-game-type factory and loader.
//!
//! A [`TypedController`] knows one concrete [`Game`] type; boxed behind the
//! [`GameController`] trait it lets the host create games, and load, advance,
//! and re-persist them, without ever branching on the game's rules.

use std::marker::PhantomData;

use tracing::info;

use crate::core::othello::Othello;
use crate::core::{Game, GameError, GameId, PlayerId};
use crate::storage::{Database, GameRecord, StorageError};

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("game {id} has type {found:?}, this controller handles {expected:?}")]
    TypeMismatch {
        id: GameId,
        expected: &'static str,
        found: String,
    },
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What the host needs from a game type, independent of its rules.
pub trait GameController {
    /// The type tag this controller creates and loads.
    fn game_type(&self) -> &'static str;

    /// Validates the roster, persists a fresh game, and returns its id.
    fn create_game(&self, db: &mut Database, players: &[PlayerId]) -> ControllerResult<GameId>;

    /// Loads the game, applies one raw move, and saves the result back.
    /// The caller must hold the store lock for the whole call.
    fn handle_input(
        &self,
        db: &mut Database,
        game_id: &str,
        player: &PlayerId,
        input: &str,
    ) -> ControllerResult<String>;
}

/// Controller for the concrete game type `G`.
pub struct TypedController<G> {
    _game: PhantomData<G>,
}

pub type OthelloController = TypedController<Othello>;

impl<G> TypedController<G> {
    pub fn new() -> Self {
        Self { _game: PhantomData }
    }
}

impl<G> Default for TypedController<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> TypedController<G> {
    /// Reconstitutes a game from its persisted record, validating the stored
    /// type tag against `G`.
    pub fn load_game(&self, db: &Database, game_id: &str) -> ControllerResult<G> {
        let record = db.get_game(game_id)?;
        if record.game_type != G::TYPE {
            return Err(ControllerError::TypeMismatch {
                id: record.id,
                expected: G::TYPE,
                found: record.game_type,
            });
        }
        let state: G::State = serde_json::from_str(&record.state).map_err(StorageError::from)?;
        let mut game = G::from_parts(record.players, state)?;
        game.set_id(record.id);
        Ok(game)
    }

    /// Persists the game's current snapshot and player list.
    pub fn save_game(&self, db: &mut Database, game: &G) -> ControllerResult<()> {
        let state = serde_json::to_string(&game.state_snapshot()).map_err(StorageError::from)?;
        db.put_game(GameRecord {
            id: game.id().to_string(),
            game_type: G::TYPE.to_string(),
            players: game.player_ids(),
            state,
        })?;
        Ok(())
    }
}

impl<G: Game> GameController for TypedController<G> {
    fn game_type(&self) -> &'static str {
        G::TYPE
    }

    fn create_game(&self, db: &mut Database, players: &[PlayerId]) -> ControllerResult<GameId> {
        let mut game = G::new(players)?;
        game.set_id(db.allocate_game_id());
        self.save_game(db, &game)?;
        info!(game_type = G::TYPE, id = game.id(), "created game\n{game}");
        Ok(game.id().to_string())
    }

    fn handle_input(
        &self,
        db: &mut Database,
        game_id: &str,
        player: &PlayerId,
        input: &str,
    ) -> ControllerResult<String> {
        let mut game = self.load_game(db, game_id)?;
        game.handle_input(player, input)?;
        self.save_game(db, &game)?;
        Ok(game.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::othello::PieceCount;
    use crate::core::{FinishedState, GameState};

    fn players() -> Vec<PlayerId> {
        vec!["player-1".to_string(), "player-2".to_string()]
    }

    #[test]
    fn test_create_and_load() {
        let mut db = Database::in_memory();
        let controller = OthelloController::new();
        let id = controller.create_game(&mut db, &players()).unwrap();

        let game = controller.load_game(&db, &id).unwrap();
        assert_eq!(game.id(), id);
        assert_eq!(game.player_ids(), players());
        assert_eq!(game.counts(), PieceCount { black: 2, white: 2 });
    }

    #[test]
    fn test_create_rejects_bad_rosters() {
        let mut db = Database::in_memory();
        let controller = OthelloController::new();
        assert!(matches!(
            controller
                .create_game(&mut db, &["solo".to_string()])
                .unwrap_err(),
            ControllerError::Game(GameError::InvalidPlayersNumber { .. })
        ));
        assert!(matches!(
            controller
                .create_game(&mut db, &["p".to_string(), "p".to_string()])
                .unwrap_err(),
            ControllerError::Game(GameError::DuplicatePlayerId)
        ));
    }

    #[test]
    fn test_load_validates_the_type_tag() {
        let mut db = Database::in_memory();
        db.put_game(GameRecord {
            id: "game-1".to_string(),
            game_type: "checkers".to_string(),
            players: players(),
            state: "{}".to_string(),
        })
        .unwrap();

        assert!(matches!(
            OthelloController::new().load_game(&db, "game-1").unwrap_err(),
            ControllerError::TypeMismatch {
                expected: "othello",
                ..
            }
        ));
    }

    #[test]
    fn test_load_missing_game() {
        let db = Database::in_memory();
        assert!(matches!(
            OthelloController::new().load_game(&db, "game-404").unwrap_err(),
            ControllerError::Storage(StorageError::GameNotFound { .. })
        ));
    }

    #[test]
    fn test_handle_input_advances_and_persists() {
        let mut db = Database::in_memory();
        let controller = OthelloController::new();
        let id = controller.create_game(&mut db, &players()).unwrap();

        controller
            .handle_input(&mut db, &id, &"player-1".to_string(), "2,3")
            .unwrap();

        // the persisted record reflects the move and the rotated turn order
        let game = controller.load_game(&db, &id).unwrap();
        assert_eq!(game.counts(), PieceCount { black: 4, white: 1 });
        assert_eq!(
            game.player_ids(),
            ["player-2".to_string(), "player-1".to_string()]
        );
        assert_eq!(game.state(), GameState::Turn("player-2".to_string()));
        assert_eq!(game.winner(), None::<FinishedState>);
    }

    #[test]
    fn test_rejected_input_leaves_the_record_unchanged() {
        let mut db = Database::in_memory();
        let controller = OthelloController::new();
        let id = controller.create_game(&mut db, &players()).unwrap();
        let before = db.get_game(&id).unwrap();

        for (player, input) in [
            ("player-2", "2,3"),     // not their turn
            ("player-1", "0,0"),     // captures nothing
            ("player-1", "3,3"),     // occupied
            ("player-1", "8,8"),     // out of bounds
            ("player-1", "garbage"), // malformed
        ] {
            assert!(controller
                .handle_input(&mut db, &id, &player.to_string(), input)
                .is_err());
        }
        assert_eq!(db.get_game(&id).unwrap(), before);
    }
}
