use super::encoding::DecodeError;
use super::PlayerId;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GameError {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) is occupied")]
    CellIsOccupied { row: usize, col: usize },
    #[error("move ({row}, {col}) captures no opposing pieces")]
    IllegalMove { row: usize, col: usize },
    #[error("other player's turn (expected: {expected}, found: {found})")]
    NotYourTurn { expected: PlayerId, found: PlayerId },
    #[error("can't make turn on a finished game")]
    GameIsFinished,
    #[error(transparent)]
    InvalidMoveEncoding(#[from] DecodeError),
    #[error("invalid players number (expected: {expected}, found: {found})")]
    InvalidPlayersNumber { expected: usize, found: usize },
    #[error("duplicate player id")]
    DuplicatePlayerId,
    #[error("persisted state is corrupted: {reason}")]
    CorruptedState { reason: String },
    #[error("failed to switch players in the pool")]
    PlayerPoolCorrupted,
}

impl GameError {
    pub fn out_of_bounds(row: usize, col: usize) -> Self {
        Self::OutOfBounds { row, col }
    }

    pub fn cell_is_occupied(row: usize, col: usize) -> Self {
        Self::CellIsOccupied { row, col }
    }

    pub fn illegal_move(row: usize, col: usize) -> Self {
        Self::IllegalMove { row, col }
    }

    pub fn not_your_turn(expected: PlayerId, found: PlayerId) -> Self {
        Self::NotYourTurn { expected, found }
    }

    pub fn invalid_players_number(expected: usize, found: usize) -> Self {
        Self::InvalidPlayersNumber { expected, found }
    }

    pub fn corrupted_state(reason: impl Into<String>) -> Self {
        Self::CorruptedState {
            reason: reason.into(),
        }
    }
}
