use std::fmt::{Display, Formatter};
use std::ops::{Deref, Index, IndexMut};

use generic_array::{ArrayLength, GenericArray};

/// Index struct to access elements in the [`Grid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridIndex {
    row: usize,
    col: usize,
}

impl From<(usize, usize)> for GridIndex {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for GridIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl GridIndex {
    /// Constructs a new [`GridIndex`].
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns value of `self.row`
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns value of `self.col`
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the index one step away in `dir`, or [`None`] if the step
    /// leaves the `rows` × `cols` grid.
    fn step(self, dir: Direction, rows: usize, cols: usize) -> Option<GridIndex> {
        let (dr, dc) = dir.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some(GridIndex::new(row, col))
    }
}

/// One of the 8 compass directions a line on the board can run in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// `(row, col)` delta of one step in this direction.
    fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::UpRight => (-1, 1),
            Direction::Right => (0, 1),
            Direction::DownRight => (1, 1),
            Direction::Down => (1, 0),
            Direction::DownLeft => (1, -1),
            Direction::Left => (0, -1),
            Direction::UpLeft => (-1, -1),
        }
    }
}

/// Two-dimensional fixed-length array that stores values and allows to mutate them.
/// Length of array is defined by generic parameters `R` and `C`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T, R: ArrayLength, C: ArrayLength> {
    contents: GenericArray<GenericArray<T, C>, R>,
}

impl<T: Default, R: ArrayLength, C: ArrayLength> Default for Grid<T, R, C> {
    fn default() -> Self {
        Self {
            contents: Default::default(),
        }
    }
}

impl<T, R: ArrayLength, C: ArrayLength> Deref for Grid<T, R, C> {
    type Target = [GenericArray<T, C>];

    fn deref(&self) -> &Self::Target {
        self.contents.as_slice()
    }
}

impl<T: Display, R: ArrayLength, C: ArrayLength> Display for Grid<T, R, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.contents.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for val in row {
                write!(f, "{}", val)?;
            }
        }
        Ok(())
    }
}

impl<T, R: ArrayLength, C: ArrayLength> Index<GridIndex> for Grid<T, R, C> {
    type Output = T;

    fn index(&self, index: GridIndex) -> &Self::Output {
        &self.contents[index.row()][index.col()]
    }
}

impl<T, R: ArrayLength, C: ArrayLength> IndexMut<GridIndex> for Grid<T, R, C> {
    fn index_mut(&mut self, index: GridIndex) -> &mut Self::Output {
        &mut self.contents[index.row()][index.col()]
    }
}

impl<T, R: ArrayLength, C: ArrayLength> Grid<T, R, C> {
    /// Number of rows in the grid.
    pub fn rows() -> usize {
        R::to_usize()
    }

    /// Number of columns in the grid.
    pub fn cols() -> usize {
        C::to_usize()
    }

    /// Total number of cells in the grid.
    pub fn size() -> usize {
        R::to_usize() * C::to_usize()
    }

    /// Whether `index` names a cell of the grid.
    /// The valid range is `[0, R)` × `[0, C)`, exclusive at the far edge.
    pub fn contains(index: GridIndex) -> bool {
        index.row() < R::to_usize() && index.col() < C::to_usize()
    }

    /// Returns a reference to the cell at `index`, or [`None`] if out of bounds.
    pub fn get(&self, index: GridIndex) -> Option<&T> {
        Self::contains(index).then(|| &self[index])
    }

    /// Returns a mutable reference to the cell at `index`, or [`None`] if out of bounds.
    pub fn get_mut(&mut self, index: GridIndex) -> Option<&mut T> {
        Self::contains(index).then(|| &mut self[index])
    }

    /// Returns an iterator to indexed grid elements row by row.
    pub fn all_indexed(&self) -> impl Iterator<Item = (GridIndex, &T)> {
        self.contents.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (GridIndex::new(row, col), cell))
        })
    }

    /// Returns the grid contents as owned rows, row by row.
    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.contents
            .iter()
            .map(|row| row.iter().cloned().collect())
            .collect()
    }

    /// Returns an iterator over the cells strictly after `from` in direction `dir`.
    /// Stops when the walk leaves the grid.
    pub fn line_iter(&self, from: GridIndex, dir: Direction) -> LineIter<'_, T, R, C> {
        LineIter {
            current: Some(from),
            dir,
            grid: self,
        }
    }
}

/// An iterator walking one cell at a time in a fixed [`Direction`].
/// The starting index itself is not yielded.
pub struct LineIter<'a, T, R: ArrayLength, C: ArrayLength> {
    current: Option<GridIndex>,
    dir: Direction,
    grid: &'a Grid<T, R, C>,
}

impl<'a, T, R: ArrayLength, C: ArrayLength> Iterator for LineIter<'a, T, R, C> {
    type Item = (GridIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self
            .current?
            .step(self.dir, R::to_usize(), C::to_usize());
        self.current = next;
        let index = next?;
        Some((index, &self.grid[index]))
    }
}
