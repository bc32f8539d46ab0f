//! SRS-style wall kick data
//!
//! When a rotation would collide, these positional offsets are tried in order;
//! the first one that fits wins. The tables are keyed by the rotation-transition
//! index: the *from* rotation for clockwise turns, the *to* rotation for
//! counter-clockwise turns, with the offset signs adjusted per direction.

use crate::tetromino::{Rotation, RotationDirection, TetrominoType};

/// Kick offsets shared by J, L, S, T and Z
const JLSTZ_KICKS: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// Kick offsets for the I piece
const I_KICKS: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Get the ordered (dx, dy) candidate offsets for a rotation attempt.
///
/// The first entry is always (0, 0): plain rotation is preferred over any kick.
pub fn kick_offsets(
    piece_type: TetrominoType,
    from: Rotation,
    to: Rotation,
    direction: RotationDirection,
) -> [(i32, i32); 5] {
    let table = match piece_type {
        // O has no meaningful rotation; every candidate is the identity
        TetrominoType::O => return [(0, 0); 5],
        TetrominoType::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };

    let row = match direction {
        RotationDirection::Clockwise => table[from.index()],
        RotationDirection::CounterClockwise => table[to.index()],
    };

    row.map(|(dx, dy)| match direction {
        RotationDirection::Clockwise => (dx, -dy),
        RotationDirection::CounterClockwise => (-dx, dy),
    })
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
    fn first_candidate_is_identity() {
        for piece in TetrominoType::all() {
            for from in ALL_ROTATIONS {
                for (direction, to) in [
                    (RotationDirection::Clockwise, from.cw()),
                    (RotationDirection::CounterClockwise, from.ccw()),
                ] {
                    let kicks = kick_offsets(piece, from, to, direction);
                    assert_eq!(kicks[0], (0, 0), "{:?} {:?} {:?}", piece, from, direction);
                }
            }
        }
    }

    #[test]
    fn o_piece_kicks_are_all_identity() {
        let kicks = kick_offsets(
            TetrominoType::O,
            Rotation::North,
            Rotation::East,
            RotationDirection::Clockwise,
        );
        assert_eq!(kicks, [(0, 0); 5]);
    }

    #[test]
    fn clockwise_negates_dy() {
        // Table row 0 is [(0,0), (-1,0), (-1,1), (0,-2), (-1,-2)]
        let kicks = kick_offsets(
            TetrominoType::T,
            Rotation::North,
            Rotation::East,
            RotationDirection::Clockwise,
        );
        assert_eq!(kicks, [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]);
    }

    #[test]
    fn counter_clockwise_negates_dx_and_keys_on_target() {
        // East → North keys table row 0 and negates dx
        let kicks = kick_offsets(
            TetrominoType::T,
            Rotation::East,
            Rotation::North,
            RotationDirection::CounterClockwise,
        );
        assert_eq!(kicks, [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]);
    }

    #[test]
    fn i_piece_uses_its_own_table() {
        let kicks = kick_offsets(
            TetrominoType::I,
            Rotation::North,
            Rotation::East,
            RotationDirection::Clockwise,
        );
        assert_eq!(kicks, [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)]);
    }
}
