//! Bit-packed representation of a single 3x3 sub-board.
//!
//! A sub-board is two 9-bit occupancy planes packed into one `u32`:
//!
//! ```text
//! bits 0-8  : circle plane (bit i set = circle on cell i)
//! bits 9-17 : cross plane  (bit i set = cross on cell i)
//! ```
//!
//! Cells are numbered row-major:
//!
//! ```text
//! 0 | 1 | 2
//! 3 | 4 | 5
//! 6 | 7 | 8
//! ```

/// Number of cells in a sub-board (and number of sub-boards in the game).
pub const CELLS: usize = 9;

/// Mask covering all nine cells of one plane.
pub const FULL_MASK: u16 = 0x1FF;

const CROSS_SHIFT: u32 = 9;

/// The eight winning lines as 9-bit cell masks.
pub const LINES: [u16; 8] = [
    0b000_000_111, // row 0
    0b000_111_000, // row 1
    0b111_000_000, // row 2
    0b001_001_001, // column 0
    0b010_010_010, // column 1
    0b100_100_100, // column 2
    0b100_010_001, // diagonal 0-4-8
    0b001_010_100, // diagonal 2-4-6
];

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Circle = 1,
    Cross = 2,
}

impl Side {
    /// The other player (`3 - side` in the two-valued encoding).
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Circle => Side::Cross,
            Side::Cross => Side::Circle,
        }
    }

    /// Symbol used when rendering boards.
    pub fn symbol(self) -> char {
        match self {
            Side::Circle => 'O',
            Side::Cross => 'X',
        }
    }
}

/// Contents of a single cell, derived from the occupancy planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Circle,
    Cross,
}

/// A 3x3 sub-board stored as two exclusive occupancy planes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubBoard(u32);

impl SubBoard {
    pub const EMPTY: SubBoard = SubBoard(0);

    /// Build a sub-board from explicit planes.
    ///
    /// Panics if the planes overlap or use bits outside the nine cells.
    pub fn from_planes(circles: u16, crosses: u16) -> Self {
        assert!(
            circles & !FULL_MASK == 0 && crosses & !FULL_MASK == 0,
            "occupancy planes must fit in 9 bits: circles={:#b} crosses={:#b}",
            circles,
            crosses
        );
        assert!(
            circles & crosses == 0,
            "a cell cannot hold both sides: circles={:#b} crosses={:#b}",
            circles,
            crosses
        );
        SubBoard(circles as u32 | ((crosses as u32) << CROSS_SHIFT))
    }

    /// Raw packed representation.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn circles(self) -> u16 {
        (self.0 & FULL_MASK as u32) as u16
    }

    #[inline]
    pub fn crosses(self) -> u16 {
        ((self.0 >> CROSS_SHIFT) & FULL_MASK as u32) as u16
    }

    /// Occupancy plane of `side`.
    #[inline]
    pub fn plane(self, side: Side) -> u16 {
        match side {
            Side::Circle => self.circles(),
            Side::Cross => self.crosses(),
        }
    }

    /// Union of both planes.
    #[inline]
    pub fn occupied(self) -> u16 {
        self.circles() | self.crosses()
    }

    /// Mask of empty cells. Bit i set means cell i is a legal move.
    #[inline]
    pub fn legal_moves_mask(self) -> u16 {
        !self.occupied() & FULL_MASK
    }

    /// Legal moves on this sub-board.
    #[inline]
    pub fn legal_moves(self) -> MoveSet {
        MoveSet(self.legal_moves_mask())
    }

    /// Number of marks on this sub-board.
    #[inline]
    pub fn marks(self) -> u32 {
        self.0.count_ones()
    }

    /// True iff every cell is occupied. Branch-free union-and-compare.
    #[inline]
    pub fn is_full(self) -> bool {
        self.occupied() == FULL_MASK
    }

    /// True iff `side` owns a complete row, column or diagonal.
    #[inline]
    pub fn is_won(self, side: Side) -> bool {
        let plane = self.plane(side);
        // No short-circuit: all eight lines are tested.
        LINES
            .iter()
            .fold(false, |won, &line| won | (plane & line == line))
    }

    pub fn cell(self, index: u8) -> Cell {
        assert!((index as usize) < CELLS, "cell index {} out of range", index);
        let bit = 1u16 << index;
        if self.circles() & bit != 0 {
            Cell::Circle
        } else if self.crosses() & bit != 0 {
            Cell::Cross
        } else {
            Cell::Empty
        }
    }

    /// Return a copy with `side` marked on `index`.
    ///
    /// Panics if the cell is out of range or already occupied: callers must
    /// only pass legal moves.
    #[inline]
    pub fn with_mark(self, index: u8, side: Side) -> SubBoard {
        assert!((index as usize) < CELLS, "cell index {} out of range", index);
        assert!(
            self.occupied() & (1u16 << index) == 0,
            "cell {} is already occupied",
            index
        );
        let shift = match side {
            Side::Circle => 0,
            Side::Cross => CROSS_SHIFT,
        };
        SubBoard(self.0 | (1u32 << (index as u32 + shift)))
    }
}

/// A set of move indices backed by a 9-bit mask.
///
/// Iterates in ascending cell order and never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSet(u16);

impl MoveSet {
    pub fn from_mask(mask: u16) -> Self {
        MoveSet(mask & FULL_MASK)
    }

    #[inline]
    pub fn mask(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, cell: u8) -> bool {
        (cell as usize) < CELLS && self.0 & (1u16 << cell) != 0
    }

    /// The `k`-th move in ascending order, if any.
    #[inline]
    pub fn nth_move(self, k: usize) -> Option<u8> {
        let mut mask = self.0;
        for _ in 0..k {
            if mask == 0 {
                return None;
            }
            mask &= mask - 1;
        }
        if mask == 0 {
            None
        } else {
            Some(mask.trailing_zeros() as u8)
        }
    }
}

impl Iterator for MoveSet {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let cell = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MoveSet {}
