//! Tetromino definitions and shapes
//!
//! All 7 standard tetrominoes with their rotation matrices. Shapes are stored
//! as occupancy matrices (I: 4x4, O: 2x2, the rest 3x3) with the piece position
//! addressing the matrix's top-left corner in board coordinates.

use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::O => Color::Yellow,
            TetrominoType::T => Color::Magenta,
            TetrominoType::S => Color::Green,
            TetrominoType::Z => Color::Red,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
        }
    }

    /// All tetromino types, in canonical order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Get the occupancy matrix for this tetromino at a given rotation
    pub fn shape(&self, rotation: Rotation) -> Shape {
        let shapes = match self {
            TetrominoType::I => &I_SHAPES,
            TetrominoType::O => &O_SHAPES,
            TetrominoType::T => &T_SHAPES,
            TetrominoType::S => &S_SHAPES,
            TetrominoType::Z => &Z_SHAPES,
            TetrominoType::J => &J_SHAPES,
            TetrominoType::L => &L_SHAPES,
        };
        shapes[rotation.index()]
    }

    /// Spawn column: pieces spawn horizontally centered at the top of the board
    pub fn spawn_x(&self) -> i32 {
        let width = self.shape(Rotation::North).size() as i32;
        crate::board::BOARD_COLS as i32 / 2 - (width + 1) / 2
    }
}

/// An occupancy matrix for one piece type + rotation.
///
/// Only the top-left `size`x`size` cells are meaningful; the backing array is
/// padded to 4x4 so every shape shares one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    grid: [[u8; 4]; 4],
}

impl Shape {
    /// Side length of the matrix (4 for I, 2 for O, 3 otherwise)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix cell at (col, row) is occupied
    pub fn filled(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.grid[row][col] != 0
    }

    /// Iterate the occupied cells as (dx, dy) offsets from the matrix's top-left
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (0..self.size).flat_map(move |row| {
            (0..self.size)
                .filter(move |&col| self.grid[row][col] != 0)
                .map(move |col| (col as i32, row as i32))
        })
    }
}

const fn shape2(rows: [[u8; 2]; 2]) -> Shape {
    let mut grid = [[0u8; 4]; 4];
    let mut r = 0;
    while r < 2 {
        let mut c = 0;
        while c < 2 {
            grid[r][c] = rows[r][c];
            c += 1;
        }
        r += 1;
    }
    Shape { size: 2, grid }
}

const fn shape3(rows: [[u8; 3]; 3]) -> Shape {
    let mut grid = [[0u8; 4]; 4];
    let mut r = 0;
    while r < 3 {
        let mut c = 0;
        while c < 3 {
            grid[r][c] = rows[r][c];
            c += 1;
        }
        r += 1;
    }
    Shape { size: 3, grid }
}

const fn shape4(rows: [[u8; 4]; 4]) -> Shape {
    Shape { size: 4, grid: rows }
}

const I_SHAPES: [Shape; 4] = [
    shape4([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    shape4([[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]),
    shape4([[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]]),
    shape4([[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]]),
];

// O does not meaningfully rotate
const O_SHAPES: [Shape; 4] = [
    shape2([[1, 1], [1, 1]]),
    shape2([[1, 1], [1, 1]]),
    shape2([[1, 1], [1, 1]]),
    shape2([[1, 1], [1, 1]]),
];

const T_SHAPES: [Shape; 4] = [
    shape3([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
    shape3([[0, 1, 0], [0, 1, 1], [0, 1, 0]]),
    shape3([[0, 0, 0], [1, 1, 1], [0, 1, 0]]),
    shape3([[0, 1, 0], [1, 1, 0], [0, 1, 0]]),
];

const S_SHAPES: [Shape; 4] = [
    shape3([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
    shape3([[0, 1, 0], [0, 1, 1], [0, 0, 1]]),
    shape3([[0, 0, 0], [0, 1, 1], [1, 1, 0]]),
    shape3([[1, 0, 0], [1, 1, 0], [0, 1, 0]]),
];

const Z_SHAPES: [Shape; 4] = [
    shape3([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
    shape3([[0, 0, 1], [0, 1, 1], [0, 1, 0]]),
    shape3([[0, 0, 0], [1, 1, 0], [0, 1, 1]]),
    shape3([[0, 1, 0], [1, 1, 0], [1, 0, 0]]),
];

const J_SHAPES: [Shape; 4] = [
    shape3([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
    shape3([[0, 1, 1], [0, 1, 0], [0, 1, 0]]),
    shape3([[0, 0, 0], [1, 1, 1], [0, 0, 1]]),
    shape3([[0, 1, 0], [0, 1, 0], [1, 1, 0]]),
];

const L_SHAPES: [Shape; 4] = [
    shape3([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
    shape3([[0, 1, 0], [0, 1, 0], [0, 1, 1]]),
    shape3([[0, 0, 0], [1, 1, 1], [1, 0, 0]]),
    shape3([[1, 1, 0], [0, 1, 0], [0, 1, 0]]),
];

/// Rotation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    /// Numeric rotation index 0-3, used to key the wall-kick tables
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise: North → West → South → East → North
    pub fn ccw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROTATIONS: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    #[test]
    fn every_shape_has_four_cells() {
        for piece in TetrominoType::all() {
            for rotation in ALL_ROTATIONS {
                let count = piece.shape(rotation).cells().count();
                assert_eq!(count, 4, "{:?} {:?}", piece, rotation);
            }
        }
    }

    #[test]
    fn spawn_is_horizontally_centered() {
        // floor(10/2) - ceil(width/2)
        assert_eq!(TetrominoType::I.spawn_x(), 3);
        assert_eq!(TetrominoType::O.spawn_x(), 4);
        assert_eq!(TetrominoType::T.spawn_x(), 3);
        assert_eq!(TetrominoType::L.spawn_x(), 3);
    }

    #[test]
    fn rotation_cycles() {
        for rotation in ALL_ROTATIONS {
            assert_eq!(rotation.cw().ccw(), rotation);
            assert_eq!(rotation.cw().cw().cw().cw(), rotation);
            assert_eq!(rotation.ccw().ccw().ccw().ccw(), rotation);
        }
    }

    #[test]
    fn o_piece_rotations_are_identical() {
        let base = TetrominoType::O.shape(Rotation::North);
        for rotation in ALL_ROTATIONS {
            assert_eq!(TetrominoType::O.shape(rotation), base);
        }
    }

    #[test]
    fn t_north_matches_table() {
        let cells: Vec<_> = TetrominoType::T.shape(Rotation::North).cells().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
    }
}
