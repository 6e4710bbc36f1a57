//! Process-wide context tying the registry, storage, and controllers
//! together. Constructed once at startup and passed around explicitly; there
//! is no ambient global state.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{error, info};

use crate::controller::{ControllerError, GameController};
use crate::core::{GameId, PlayerId};
use crate::storage::{Database, StorageError};

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("unknown game type: {game_type:?}")]
    UnknownGameType { game_type: String },
    #[error("failed to lock the store: {reason}")]
    MutexPoison { reason: String },
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl<T> From<PoisonError<T>> for ServerError {
    fn from(value: PoisonError<T>) -> Self {
        Self::MutexPoison {
            reason: value.to_string(),
        }
    }
}

pub type BoxedController = Box<dyn GameController + Send + Sync>;

pub struct GameServer {
    db: Mutex<Database>,
    controllers: HashMap<&'static str, BoxedController>,
}

impl GameServer {
    pub fn new(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            controllers: HashMap::new(),
        }
    }

    /// Registers a game-type controller. Registering two controllers under
    /// the same tag is a startup configuration bug and panics rather than
    /// silently overwriting.
    pub fn register_game(&mut self, controller: BoxedController) {
        let tag = controller.game_type();
        if self.controllers.insert(tag, controller).is_some() {
            panic!("game controller {tag:?} already registered");
        }
        info!(game_type = tag, "registered game controller");
    }

    fn controller(&self, game_type: &str) -> ServerResult<&BoxedController> {
        self.controllers
            .get(game_type)
            .ok_or_else(|| ServerError::UnknownGameType {
                game_type: game_type.to_string(),
            })
    }

    fn lock_db(&self) -> ServerResult<MutexGuard<'_, Database>> {
        Ok(self.db.lock()?)
    }

    pub fn register_user(&self, name: &str, email: &str) -> ServerResult<PlayerId> {
        let mut db = self.lock_db()?;
        Ok(db.add_player(name, email)?.id)
    }

    pub fn find_user(&self, email: &str) -> ServerResult<PlayerId> {
        let db = self.lock_db()?;
        Ok(db.find_player_by_email(email)?.id)
    }

    pub fn create_game(&self, players: &[PlayerId], game_type: &str) -> ServerResult<GameId> {
        let controller = self.controller(game_type)?;
        let mut db = self.lock_db()?;
        Ok(controller.create_game(&mut db, players)?)
    }

    /// Routes one raw move to the right controller and returns the rendered
    /// board. Load → apply → save runs under a single store-wide lock, so two
    /// moves racing on the same game can never both start from the same
    /// pre-move board.
    pub fn user_input(
        &self,
        player: &PlayerId,
        game_type: &str,
        game_id: &str,
        input: &str,
    ) -> ServerResult<String> {
        let controller = self.controller(game_type)?;
        let mut db = self.lock_db()?;
        match controller.handle_input(&mut db, game_id, player, input) {
            Ok(rendered) => {
                info!(player = %player, game_id, "move accepted\n{rendered}");
                Ok(rendered)
            }
            Err(err) => {
                error!(player = %player, game_id, %err, "move rejected");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controller::OthelloController;
    use crate::core::othello::Othello;
    use crate::core::{Game, GameError};

    fn server() -> GameServer {
        let mut server = GameServer::new(Database::in_memory());
        server.register_game(Box::new(OthelloController::new()));
        server
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut server = server();
        server.register_game(Box::new(OthelloController::new()));
    }

    #[test]
    fn test_unknown_game_type() {
        let server = server();
        let players = ["a".to_string(), "b".to_string()];
        assert!(matches!(
            server.create_game(&players, "checkers").unwrap_err(),
            ServerError::UnknownGameType { .. }
        ));
        assert!(matches!(
            server
                .user_input(&players[0], "checkers", "game-1", "0,0")
                .unwrap_err(),
            ServerError::UnknownGameType { .. }
        ));
    }

    #[test]
    fn test_users_and_games() {
        let server = server();
        let bob = server.register_user("bob", "bob@example.com").unwrap();
        let alice = server.register_user("alice", "alice@example.com").unwrap();
        assert_eq!(server.find_user("bob@example.com").unwrap(), bob);
        assert!(matches!(
            server.find_user("carol@example.com").unwrap_err(),
            ServerError::Storage(StorageError::PlayerNotFound)
        ));

        let id = server
            .create_game(&[bob.clone(), alice.clone()], Othello::TYPE)
            .unwrap();
        let rendered = server.user_input(&bob, Othello::TYPE, &id, "2,3").unwrap();
        assert!(rendered.contains("...BB..."));

        // a rejection surfaces its specific reason
        assert!(matches!(
            server.user_input(&bob, Othello::TYPE, &id, "2,4").unwrap_err(),
            ServerError::Controller(ControllerError::Game(GameError::NotYourTurn { .. }))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let server = std::sync::Arc::new(server());
        let bob = server.register_user("bob", "bob@example.com").unwrap();
        let alice = server.register_user("alice", "alice@example.com").unwrap();
        let id = server
            .create_game(&[bob.clone(), alice.clone()], Othello::TYPE)
            .unwrap();

        // both threads race the same move; the store lock guarantees exactly
        // one of them observes the pre-move board and wins
        let handles: Vec<_> = [bob, alice]
            .into_iter()
            .map(|player| {
                let server = server.clone();
                let id = id.clone();
                std::thread::spawn(move || server.user_input(&player, Othello::TYPE, &id, "2,3"))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    }
}
