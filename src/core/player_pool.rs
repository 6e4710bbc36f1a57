use smallvec::SmallVec;

pub trait Player {
    type Id: PartialEq + Clone;

    fn id(&self) -> Self::Id;
}

impl Player for String {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.clone()
    }
}

/// Ordered roster of the players in a game. The head is the player whose
/// move is currently expected; an accepted move rotates the head to the tail.
pub trait PlayerQueue {
    type Id: PartialEq;
    type Item: Player<Id = Self::Id> + Clone;

    /// Roster in seating order, regardless of whose turn it is.
    fn as_slice(&self) -> &[Self::Item];

    /// The player whose move is currently expected.
    fn get_current(&self) -> Option<&Self::Item>;

    /// Rotate the roster and return the new head.
    fn advance(&mut self) -> Option<&Self::Item>;

    /// Roster starting from the player to move. Owned copy: mutating it never
    /// affects the live queue.
    fn in_turn_order(&self) -> Vec<Self::Item>;

    fn find(&self, id: &Self::Id) -> Option<&Self::Item> {
        self.as_slice().iter().find(|player| player.id() == *id)
    }

    fn find_if<F>(&self, f: F) -> Option<&Self::Item>
    where
        F: FnMut(&&Self::Item) -> bool,
    {
        self.as_slice().iter().find(f)
    }
}

/// Fixed roster cycled in turn order. The roster never grows or shrinks after
/// construction; only the head position moves.
#[derive(Clone, Debug)]
pub struct PlayerRotation<T> {
    players: SmallVec<[T; 2]>,
    current: usize,
}

impl<T> PlayerRotation<T> {
    /// Constructs a rotation with the head at the first element of `players`.
    pub fn new(players: Vec<T>) -> Self {
        Self {
            players: SmallVec::from_vec(players),
            current: 0,
        }
    }
}

impl<T: Player + Clone> PlayerQueue for PlayerRotation<T> {
    type Id = T::Id;
    type Item = T;

    fn as_slice(&self) -> &[T] {
        &self.players
    }

    fn get_current(&self) -> Option<&T> {
        self.players.get(self.current)
    }

    fn advance(&mut self) -> Option<&T> {
        if self.players.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.players.len();
        self.players.get(self.current)
    }

    fn in_turn_order(&self) -> Vec<T> {
        let mut ordered: Vec<T> = self.players[self.current..].to_vec();
        ordered.extend_from_slice(&self.players[..self.current]);
        ordered
    }
}
