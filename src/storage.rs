//! Flat-file JSON store for player and game records.
//!
//! Every mutation rewrites the whole file; there are no durability guarantees
//! beyond that. The store holds plain data and does no locking itself: the
//! owning [`GameServer`](crate::server::GameServer) wraps it in a mutex held
//! across each load → apply → save cycle.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{GameId, PlayerId};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("game not found: {id}")]
    GameNotFound { id: GameId },
    #[error("player not found")]
    PlayerNotFound,
    #[error("player with email {email:?} already exists")]
    PlayerExists { email: String },
    #[error("game {id} is stored with type {found:?}, not {expected:?}")]
    TypeMismatch {
        id: GameId,
        expected: String,
        found: String,
    },
    #[error("failed to serialize store data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to access store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Registered player, as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub email: String,
}

/// Persisted form of one game: identity, dispatch tag, the player list in
/// turn order, and the opaque state blob produced by the game itself. The
/// store never interprets the blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub game_type: String,
    pub players: Vec<PlayerId>,
    pub state: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageData {
    players: HashMap<PlayerId, PlayerRecord>,
    games: HashMap<GameId, GameRecord>,
    next_id: u64,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct Database {
    path: Option<PathBuf>,
    data: StorageData,
}

impl Database {
    /// Opens the store at `path`, initializing a fresh one if the file is
    /// missing. A file that exists but doesn't parse is an error, never
    /// silently replaced.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no database found, initializing");
                StorageData::default()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StorageData::default(),
        }
    }

    fn save(&mut self) -> StorageResult<()> {
        self.data.updated_at = Some(Utc::now());
        if let Some(path) = &self.path {
            let contents = serde_json::to_string_pretty(&self.data)?;
            fs::write(path, contents)?;
            debug!(path = %path.display(), "wrote database");
        }
        Ok(())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.data.next_id += 1;
        format!("{}-{}", prefix, self.data.next_id)
    }

    /// Allocates a fresh game id. Ids are opaque to everything but the store.
    pub fn allocate_game_id(&mut self) -> GameId {
        self.next_id("game")
    }

    /// Registers a player, rejecting duplicate emails.
    pub fn add_player(&mut self, name: &str, email: &str) -> StorageResult<PlayerRecord> {
        if self.data.players.values().any(|p| p.email == email) {
            return Err(StorageError::PlayerExists {
                email: email.to_string(),
            });
        }
        let record = PlayerRecord {
            id: self.next_id("player"),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.data.players.insert(record.id.clone(), record.clone());
        self.save()?;
        info!(id = %record.id, name, "added player");
        Ok(record)
    }

    /// Returns an owned copy of the player record.
    pub fn get_player(&self, id: &str) -> StorageResult<PlayerRecord> {
        self.data
            .players
            .get(id)
            .cloned()
            .ok_or(StorageError::PlayerNotFound)
    }

    pub fn find_player_by_email(&self, email: &str) -> StorageResult<PlayerRecord> {
        self.data
            .players
            .values()
            .find(|p| p.email == email)
            .cloned()
            .ok_or(StorageError::PlayerNotFound)
    }

    /// Stores `record`, overwriting any previous state of the same game.
    /// A stored game never changes type.
    pub fn put_game(&mut self, record: GameRecord) -> StorageResult<()> {
        if let Some(old) = self.data.games.get(&record.id) {
            if old.game_type != record.game_type {
                return Err(StorageError::TypeMismatch {
                    id: record.id,
                    expected: old.game_type.clone(),
                    found: record.game_type,
                });
            }
        }
        self.data.games.insert(record.id.clone(), record);
        self.save()
    }

    /// Returns an owned copy of the game record: mutating it never affects
    /// the stored one.
    pub fn get_game(&self, id: &str) -> StorageResult<GameRecord> {
        self.data
            .games
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::GameNotFound { id: id.to_string() })
    }
}
