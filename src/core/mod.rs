pub mod othello;

mod encoding;
mod error;
mod grid;
mod player_pool;

use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use encoding::{DecodeError, DecodeMove, DecodeResult};
pub use error::GameError;
pub use grid::{Direction, Grid, GridIndex, LineIter};
pub use player_pool::{Player, PlayerQueue, PlayerRotation};

pub type GameResult<T> = Result<T, GameError>;

/// Opaque identity of a registered player, assigned by the storage layer.
pub type PlayerId = String;
/// Identity of a persisted game, assigned by the storage layer.
pub type GameId = String;

/// A board cell: empty, or occupied by a piece of type `T`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardCell<T>(pub Option<T>);

impl<T> Default for BoardCell<T> {
    fn default() -> Self {
        Self(Option::default())
    }
}

impl<T: Display> Display for BoardCell<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(val) => write!(f, "{}", val),
            None => f.write_str("."),
        }
    }
}

impl<T> From<T> for BoardCell<T> {
    fn from(value: T) -> Self {
        Self(Option::from(value))
    }
}

impl<T> Deref for BoardCell<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for BoardCell<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishedState {
    Win(PlayerId),
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Turn(PlayerId),
    Finished(FinishedState),
}

/// The capability every game type implements so a host can create, persist,
/// reload, and advance games without knowing their rules.
///
/// The serializable [`Game::State`] deliberately excludes the player list and
/// turn order: those are persisted separately by the storage collaborator, so
/// a record is always `(id, type tag, players in turn order, state blob)`.
pub trait Game: Sized + Display {
    /// Stable tag identifying this game type in persisted records and dispatch.
    const TYPE: &'static str;

    type TurnData: DecodeMove;
    type Players: PlayerQueue<Id = PlayerId>;
    type State: Serialize + DeserializeOwned;

    /// Starts a new game between exactly two distinct players.
    fn new(players: &[PlayerId]) -> GameResult<Self>;

    /// Rebuilds a game from its persisted parts. The head of `players` is the
    /// player whose move is expected next.
    fn from_parts(players: Vec<PlayerId>, state: Self::State) -> GameResult<Self>;

    /// Snapshot of the rule state to persist. Owned copy: mutating it never
    /// affects the live game.
    fn state_snapshot(&self) -> Self::State;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: GameId);

    /// Applies one decoded move submitted by `player`.
    fn update(&mut self, player: &PlayerId, data: Self::TurnData) -> GameResult<GameState>;

    fn players(&self) -> &Self::Players;
    fn players_mut(&mut self) -> &mut Self::Players;

    fn state(&self) -> GameState;
    fn set_state(&mut self, state: GameState);

    /// Decodes a raw move string and applies it.
    fn handle_input(&mut self, player: &PlayerId, input: &str) -> GameResult<GameState> {
        let data = Self::TurnData::decode_move(input)?;
        self.update(player, data)
    }

    fn is_finished(&self) -> bool {
        matches!(self.state(), GameState::Finished(_))
    }

    fn winner(&self) -> Option<FinishedState> {
        match self.state() {
            GameState::Finished(outcome) => Some(outcome),
            GameState::Turn(_) => None,
        }
    }

    fn set_draw(&mut self) -> GameState {
        self.set_state(GameState::Finished(FinishedState::Draw));
        self.state()
    }

    fn set_winner(&mut self, id: PlayerId) -> GameState {
        self.set_state(GameState::Finished(FinishedState::Win(id)));
        self.state()
    }

    fn get_current_player(&self) -> GameResult<&<Self::Players as PlayerQueue>::Item> {
        self.players()
            .get_current()
            .ok_or(GameError::PlayerPoolCorrupted)
    }

    /// Player ids in turn order, head first. Owned copy.
    fn player_ids(&self) -> Vec<PlayerId> {
        self.players()
            .in_turn_order()
            .iter()
            .map(Player::id)
            .collect()
    }

    fn switch_player(&mut self) -> GameResult<GameState> {
        let next_player = self
            .players_mut()
            .advance()
            .ok_or(GameError::PlayerPoolCorrupted)?
            .id();
        self.set_state(GameState::Turn(next_player));
        Ok(self.state())
    }
}
