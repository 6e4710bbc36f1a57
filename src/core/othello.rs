//! Reversi/Othello rules on an 8x8 board.
//!
//! A move is legal only if it brackets at least one contiguous run of
//! opposing pieces between the played cell and a friendly piece; every
//! bracketed run flips to the mover's color. The game ends when the board
//! fills, the winner being the color with the strictly higher piece count.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use generic_array::typenum::U8;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    BoardCell, Direction, FinishedState, Game, GameError, GameId, GameResult, GameState, Grid,
    GridIndex, PlayerId, PlayerRotation,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => f.write_str("B"),
            Color::White => f.write_str("W"),
        }
    }
}

pub type Cell = BoardCell<Color>;
pub type Board = Grid<Cell, U8, U8>;

/// Piece totals per color, derived from the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PieceCount {
    pub black: usize,
    pub white: usize,
}

impl PieceCount {
    pub fn total(&self) -> usize {
        self.black + self.white
    }
}

/// Persisted rule state: the board, which player holds which color, and the
/// winner if any. The player list in turn order is persisted separately by
/// the storage collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OthelloState {
    board: Vec<Vec<Cell>>,
    black: PlayerId,
    white: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<FinishedState>,
}

#[derive(Clone, Debug)]
pub struct Othello {
    id: GameId,
    players: PlayerRotation<PlayerId>,
    board: Board,
    black: PlayerId,
    white: PlayerId,
    state: GameState,
}

/// The canonical starting position: center four cells in the alternating
/// pattern, Black on the (3,4)/(4,3) diagonal.
fn initial_board() -> Board {
    let mut board = Board::default();
    board[GridIndex::new(3, 3)] = Color::White.into();
    board[GridIndex::new(3, 4)] = Color::Black.into();
    board[GridIndex::new(4, 3)] = Color::Black.into();
    board[GridIndex::new(4, 4)] = Color::White.into();
    board
}

fn roster(players: &[PlayerId]) -> GameResult<(PlayerId, PlayerId)> {
    let [first, second]: &[PlayerId; 2] = players
        .try_into()
        .map_err(|_| GameError::invalid_players_number(2, players.len()))?;
    if first == second {
        return Err(GameError::DuplicatePlayerId);
    }
    Ok((first.clone(), second.clone()))
}

fn board_from_rows(rows: Vec<Vec<Cell>>) -> GameResult<Board> {
    if rows.len() != Board::rows() || rows.iter().any(|row| row.len() != Board::cols()) {
        return Err(GameError::corrupted_state(format!(
            "expected a {}x{} board",
            Board::rows(),
            Board::cols()
        )));
    }
    let mut board = Board::default();
    for (row, cells) in rows.into_iter().enumerate() {
        for (col, cell) in cells.into_iter().enumerate() {
            board[GridIndex::new(row, col)] = cell;
        }
    }
    Ok(board)
}

impl Display for Othello {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl Game for Othello {
    const TYPE: &'static str = "othello";

    type TurnData = GridIndex;
    type Players = PlayerRotation<PlayerId>;
    type State = OthelloState;

    fn new(players: &[PlayerId]) -> GameResult<Self> {
        let (black, white) = roster(players)?;
        Ok(Self {
            id: GameId::default(),
            players: PlayerRotation::new(vec![black.clone(), white.clone()]),
            board: initial_board(),
            state: GameState::Turn(black.clone()),
            black,
            white,
        })
    }

    fn from_parts(players: Vec<PlayerId>, state: OthelloState) -> GameResult<Self> {
        let (head, tail) = roster(&players)?;
        if (state.black != head || state.white != tail) && (state.black != tail || state.white != head)
        {
            return Err(GameError::corrupted_state(
                "color assignment doesn't match the player list",
            ));
        }
        let board = board_from_rows(state.board)?;
        let game_state = match state.winner {
            Some(outcome) => GameState::Finished(outcome),
            None => GameState::Turn(head.clone()),
        };
        Ok(Self {
            id: GameId::default(),
            players: PlayerRotation::new(vec![head, tail]),
            board,
            black: state.black,
            white: state.white,
            state: game_state,
        })
    }

    fn state_snapshot(&self) -> OthelloState {
        OthelloState {
            board: self.board.to_rows(),
            black: self.black.clone(),
            white: self.white.clone(),
            winner: self.winner(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: GameId) {
        self.id = id;
    }

    fn update(&mut self, player: &PlayerId, pos: GridIndex) -> GameResult<GameState> {
        if self.is_finished() {
            return Err(GameError::GameIsFinished);
        }
        let expected = self.get_current_player()?.clone();
        if *player != expected {
            return Err(GameError::not_your_turn(expected, player.clone()));
        }
        let color = self.color_of(player).ok_or(GameError::PlayerPoolCorrupted)?;

        let cell = self
            .board
            .get(pos)
            .ok_or_else(|| GameError::out_of_bounds(pos.row(), pos.col()))?;
        if cell.is_some() {
            return Err(GameError::cell_is_occupied(pos.row(), pos.col()));
        }

        // all 8 directions are resolved before any flip is committed, so a
        // rejected move leaves the board untouched
        let captured = self.captures(pos, color);
        if captured.is_empty() {
            return Err(GameError::illegal_move(pos.row(), pos.col()));
        }

        self.board[pos] = color.into();
        for index in captured {
            self.board[index] = color.into();
        }

        let count = self.counts();
        if count.total() == Board::size() {
            let winner = match count.black.cmp(&count.white) {
                Ordering::Greater => Some(self.black.clone()),
                Ordering::Less => Some(self.white.clone()),
                Ordering::Equal => None,
            };
            return Ok(match winner {
                Some(id) => self.set_winner(id),
                None => self.set_draw(),
            });
        }
        self.switch_player()
    }

    fn players(&self) -> &Self::Players {
        &self.players
    }

    fn players_mut(&mut self) -> &mut Self::Players {
        &mut self.players
    }

    fn state(&self) -> GameState {
        self.state.clone()
    }

    fn set_state(&mut self, state: GameState) {
        self.state = state;
    }
}

impl Othello {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current piece totals, used for win detection.
    pub fn counts(&self) -> PieceCount {
        let mut count = PieceCount::default();
        for cell in self.board.iter().flatten() {
            match cell.0 {
                Some(Color::Black) => count.black += 1,
                Some(Color::White) => count.white += 1,
                None => {}
            }
        }
        count
    }

    /// The id of the player holding `color`.
    pub fn player_of(&self, color: Color) -> &PlayerId {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// The color held by `player`, if they are in this game.
    pub fn color_of(&self, player: &PlayerId) -> Option<Color> {
        if *player == self.black {
            Some(Color::Black)
        } else if *player == self.white {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Diagnostic rendering: one glyph per cell, rows separated by newlines.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// All indices captured by playing `color` at `pos`, across every
    /// direction. Empty when no direction brackets an opposing run.
    fn captures(&self, pos: GridIndex, color: Color) -> Vec<GridIndex> {
        Direction::ALL
            .iter()
            .flat_map(|&dir| self.bracketed_run(pos, dir, color))
            .collect()
    }

    /// Walks outward from `pos` in `dir`, collecting the contiguous run of
    /// opposing pieces. The run counts only when it is terminated by a piece
    /// of `color`; an empty cell or the board edge discards it.
    fn bracketed_run(&self, pos: GridIndex, dir: Direction, color: Color) -> SmallVec<[GridIndex; 6]> {
        let mut run = SmallVec::new();
        for (index, cell) in self.board.line_iter(pos, dir) {
            match cell.0 {
                None => return SmallVec::new(),
                Some(c) if c == color => return run,
                Some(_) => run.push(index),
            }
        }
        // ran off the edge without a terminating piece
        SmallVec::new()
    }
}
