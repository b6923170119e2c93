//! Hole filling for binary masks.

use crate::grid::Grid2;

/// Set every background pixel that cannot reach the grid border through
/// 4-connected background pixels.
pub fn fill_holes(mask: &Grid2<bool>) -> Grid2<bool> {
    let (rows, cols) = (mask.rows(), mask.cols());
    let mut outside = Grid2::new_filled(rows, cols, false);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let seed = |r: usize, c: usize, outside: &mut Grid2<bool>, stack: &mut Vec<(usize, usize)>| {
        if !mask[(r, c)] && !outside[(r, c)] {
            outside[(r, c)] = true;
            stack.push((r, c));
        }
    };

    for r in 0..rows {
        seed(r, 0, &mut outside, &mut stack);
        if cols > 1 {
            seed(r, cols - 1, &mut outside, &mut stack);
        }
    }
    for c in 0..cols {
        seed(0, c, &mut outside, &mut stack);
        if rows > 1 {
            seed(rows - 1, c, &mut outside, &mut stack);
        }
    }

    while let Some((r, c)) = stack.pop() {
        let neighbors = [
            (r.wrapping_sub(1), c),
            (r + 1, c),
            (r, c.wrapping_sub(1)),
            (r, c + 1),
        ];
        for (nr, nc) in neighbors {
            if nr < rows && nc < cols {
                seed(nr, nc, &mut outside, &mut stack);
            }
        }
    }

    outside.map(|&o| !o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mask_from_ascii;

    #[test]
    fn test_ring_is_filled() {
        let mask = mask_from_ascii(&[".....", ".###.", ".#.#.", ".###.", "....."]);
        let filled = fill_holes(&mask);
        assert!(filled[(2, 2)]);
        assert_eq!(filled.count_set(), 9);
    }

    #[test]
    fn test_open_ring_is_not_filled() {
        let mask = mask_from_ascii(&[".....", ".###.", ".#...", ".###.", "....."]);
        let filled = fill_holes(&mask);
        assert!(!filled[(2, 2)]);
        assert_eq!(filled, mask);
    }

    #[test]
    fn test_diagonal_gap_does_not_leak() {
        // Background only touches the hole diagonally, which does not count.
        let mask = mask_from_ascii(&[".#..", "#.#.", ".#..", "...."]);
        let filled = fill_holes(&mask);
        assert!(filled[(1, 1)]);
    }

    #[test]
    fn test_empty_and_full_masks() {
        let empty = Grid2::new_filled(3, 3, false);
        assert_eq!(fill_holes(&empty).count_set(), 0);
        let full = Grid2::new_filled(3, 3, true);
        assert_eq!(fill_holes(&full).count_set(), 9);
        let nothing: Grid2<bool> = Grid2::new(0, 0, vec![]);
        assert!(fill_holes(&nothing).is_empty());
    }
}
