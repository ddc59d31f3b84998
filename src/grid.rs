//! Rectangular warehouse grid in which every cell is either free floor or a
//! shelf. Shelves are obstacles; items sit on shelf cells and are picked up
//! from an adjacent free cell.

use indexmap::IndexSet;
use std::fmt;

/// A cell coordinate `(x, y)` with `0 <= x < width` and `0 <= y < height`.
pub type Pos = (usize, usize);

/// The four cardinal directions, used both to label the pickable sides of a
/// shelf and to describe movement between adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dir {
    /// Towards larger `y`.
    North,
    /// Towards larger `x`.
    East,
    /// Towards smaller `y`.
    South,
    /// Towards smaller `x`.
    West,
}

impl Dir {
    /// All four directions, in the order used for access-point slots.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The `(dx, dy)` offset of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Slot index of this direction within a node's access-point block.
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// The word used for this direction in printed instructions: `y` grows
    /// upwards, `x` grows to the right.
    #[must_use]
    pub const fn movement(self) -> &'static str {
        match self {
            Self::North => "up",
            Self::East => "right",
            Self::South => "down",
            Self::West => "left",
        }
    }

    /// Direction of the single step from `from` to `to`, or `None` if the
    /// two cells are not orthogonally adjacent.
    #[must_use]
    pub const fn between(from: Pos, to: Pos) -> Option<Self> {
        let dx = to.0 as isize - from.0 as isize;
        let dy = to.1 as isize - from.1 as isize;
        match (dx, dy) {
            (0, 1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, -1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }

    /// The cell one step in this direction from `cell`, if it stays within
    /// a `width x height` grid.
    #[must_use]
    pub(crate) fn step(self, cell: Pos, width: usize, height: usize) -> Option<Pos> {
        let (dx, dy) = self.offset();
        let x = cell.0.checked_add_signed(dx)?;
        let y = cell.1.checked_add_signed(dy)?;
        (x < width && y < height).then_some((x, y))
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.movement())
    }
}

/// Representation of a rectangular warehouse. Cells are free by default;
/// shelves are added one by one or in bulk from an already-parsed product
/// table. Edges exist implicitly between orthogonally adjacent free cells.
///
/// # Example
///
/// ```
/// use pickroute::grid::Grid;
///
/// let mut grid = Grid::new(3, 2);
/// grid.add_shelf((1, 0));
/// assert!(grid.is_free(&(0, 0)));
/// assert!(!grid.is_free(&(1, 0)));
/// assert_eq!(grid.free_neighbours((0, 0)), vec![(0, 1)]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    /// The grid width.
    pub width: usize,
    /// The grid height.
    pub height: usize,
    shelves: IndexSet<Pos>,
}

impl Grid {
    /// Create a grid of the given dimensions with no shelves.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            shelves: IndexSet::new(),
        }
    }

    /// Create a grid and place a shelf on every listed cell. Cells outside
    /// the dimensions are ignored.
    #[must_use]
    pub fn from_shelves(width: usize, height: usize, shelves: impl IntoIterator<Item = Pos>) -> Self {
        let mut grid = Self::new(width, height);
        for cell in shelves {
            grid.add_shelf(cell);
        }
        grid
    }

    /// Place a shelf on `cell`. Return `true` if the cell was free before.
    pub fn add_shelf(&mut self, cell: Pos) -> bool {
        self.is_inside(&cell) && self.shelves.insert(cell)
    }

    /// Check whether a cell lies within the grid bounds.
    #[inline]
    #[must_use]
    pub const fn is_inside(&self, cell: &Pos) -> bool {
        cell.0 < self.width && cell.1 < self.height
    }

    /// Check whether a cell holds a shelf.
    #[inline]
    #[must_use]
    pub fn is_shelf(&self, cell: &Pos) -> bool {
        self.shelves.contains(cell)
    }

    /// Check whether a cell is inside the grid and walkable.
    #[inline]
    #[must_use]
    pub fn is_free(&self, cell: &Pos) -> bool {
        self.is_inside(cell) && !self.shelves.contains(cell)
    }

    /// Number of shelves placed so far.
    #[must_use]
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// The free cells orthogonally adjacent to `cell`, in [`Dir::ALL`] order.
    #[must_use]
    pub fn free_neighbours(&self, cell: Pos) -> Vec<Pos> {
        Dir::ALL
            .iter()
            .filter_map(|dir| dir.step(cell, self.width, self.height))
            .filter(|next| self.is_free(next))
            .collect()
    }
}

impl fmt::Debug for Grid {
    /// Render the grid with `y` growing upwards, `#` for shelves and `.`
    /// for free cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                f.write_str(if self.is_shelf(&(x, y)) { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
