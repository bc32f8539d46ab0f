//! Active falling piece logic

use crate::board::Board;
use crate::srs::kick_offsets;
use crate::tetromino::{Rotation, RotationDirection, Shape, TetrominoType};

/// An active falling piece
///
/// (x, y) addresses the top-left corner of the piece's occupancy matrix in
/// board coordinates, y increasing downward.
#[derive(Debug, Clone)]
pub struct Piece {
    pub piece_type: TetrominoType,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a piece at its spawn position: rotation 0, horizontally centered,
    /// at the top of the board
    pub fn spawn(piece_type: TetrominoType) -> Self {
        Self {
            piece_type,
            rotation: Rotation::North,
            x: piece_type.spawn_x(),
            y: 0,
        }
    }

    /// The occupancy matrix for the current rotation
    pub fn shape(&self) -> Shape {
        self.piece_type.shape(self.rotation)
    }

    /// Absolute board coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x, self.y);
        self.shape().cells().map(move |(dx, dy)| (x + dx, y + dy))
    }

    fn try_shift(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        if board.can_place(self.shape(), self.x + dx, self.y + dy) {
            self.x += dx;
            self.y += dy;
            true
        } else {
            false
        }
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_shift(board, -1, 0)
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_shift(board, 1, 0)
    }

    /// Try to move down, returns true if successful
    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_shift(board, 0, 1)
    }

    /// Whether the piece can no longer move down (grounded)
    pub fn is_grounded(&self, board: &Board) -> bool {
        !board.can_place(self.shape(), self.x, self.y + 1)
    }

    /// Try to rotate using the wall-kick tables.
    ///
    /// On success position and rotation update atomically and `Some(kicked)`
    /// reports whether a non-zero offset was needed. On failure the piece is
    /// unchanged and None is returned.
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> Option<bool> {
        let target = match direction {
            RotationDirection::Clockwise => self.rotation.cw(),
            RotationDirection::CounterClockwise => self.rotation.ccw(),
        };
        let target_shape = self.piece_type.shape(target);
        let kicks = kick_offsets(self.piece_type, self.rotation, target, direction);

        for (index, (dx, dy)) in kicks.iter().enumerate() {
            if board.can_place(target_shape, self.x + dx, self.y + dy) {
                self.x += dx;
                self.y += dy;
                self.rotation = target;
                return Some(index > 0);
            }
        }
        None
    }

    /// Move down as far as possible and return the number of cells dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }

    /// Lowest valid y for this piece at its current x (ghost position)
    pub fn ghost_y(&self, board: &Board) -> i32 {
        let shape = self.shape();
        let mut y = self.y;
        while board.can_place(shape, self.x, y + 1) {
            y += 1;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_ROWS, Cell};
    use ratatui::style::Color;

    #[test]
    fn spawn_position() {
        let piece = Piece::spawn(TetrominoType::T);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.y, 0);
    }

    #[test]
    fn move_down_on_empty_board() {
        let board = Board::new();
        let mut piece = Piece::spawn(TetrominoType::T);
        assert!(piece.move_down(&board));
        assert_eq!(piece.y, 1);
    }

    #[test]
    fn blocked_moves_leave_piece_unchanged() {
        let mut board = Board::new();
        let mut piece = Piece::spawn(TetrominoType::O);
        // Wall the O in on both sides at its spawn rows
        board.set(3, 0, Cell::Filled(Color::Red));
        board.set(3, 1, Cell::Filled(Color::Red));
        board.set(6, 0, Cell::Filled(Color::Red));
        board.set(6, 1, Cell::Filled(Color::Red));
        assert!(!piece.move_left(&board));
        assert!(!piece.move_right(&board));
        assert_eq!((piece.x, piece.y), (4, 0));
    }

    #[test]
    fn plain_rotation_uses_no_kick() {
        let board = Board::new();
        let mut piece = Piece::spawn(TetrominoType::T);
        piece.y = 5;
        assert_eq!(piece.rotate(RotationDirection::Clockwise, &board), Some(false));
        assert_eq!(piece.rotation, Rotation::East);
        assert_eq!((piece.x, piece.y), (3, 5));
    }

    #[test]
    fn failed_rotation_changes_nothing() {
        let mut board = Board::new();
        // Box a T in completely so no kick candidate fits
        let mut piece = Piece::spawn(TetrominoType::T);
        piece.x = 0;
        piece.y = 17;
        for y in 14..BOARD_ROWS as i32 {
            for x in 0..10 {
                board.set(x, y, Cell::Filled(Color::Red));
            }
        }
        for (x, y) in piece.cells() {
            board.set(x, y, Cell::Empty);
        }
        let before = (piece.x, piece.y, piece.rotation);
        assert_eq!(piece.rotate(RotationDirection::Clockwise, &board), None);
        assert_eq!((piece.x, piece.y, piece.rotation), before);
    }

    #[test]
    fn rotation_against_wall_kicks() {
        let board = Board::new();
        // Vertical I hugging the left wall: the plain rotation back to
        // horizontal would poke out of bounds, so a kick must apply
        let mut piece = Piece {
            piece_type: TetrominoType::I,
            rotation: Rotation::East,
            x: -2,
            y: 5,
        };
        let kicked = piece.rotate(RotationDirection::Clockwise, &board);
        assert_eq!(kicked, Some(true));
        assert_eq!(piece.rotation, Rotation::South);
        // Every cell landed in bounds
        assert!(board.can_place(piece.shape(), piece.x, piece.y));
    }

    #[test]
    fn hard_drop_reaches_the_floor() {
        let board = Board::new();
        let mut piece = Piece::spawn(TetrominoType::I);
        let distance = piece.hard_drop(&board);
        // I spawns with its cells on matrix row 1: y runs 0..=18
        assert_eq!(distance, 18);
        assert!(piece.is_grounded(&board));
    }

    #[test]
    fn ghost_matches_hard_drop() {
        let mut board = Board::new();
        board.set(4, 19, Cell::Filled(Color::Red));
        let piece = Piece::spawn(TetrominoType::T);
        let ghost = piece.ghost_y(&board);
        let mut dropped = piece.clone();
        dropped.hard_drop(&board);
        assert_eq!(ghost, dropped.y);
    }
}
