//! Sliding-tile puzzle
//!
//! Square grid of numbered tiles and one gap (0), stored row-major. The
//! start layout is produced by walking the gap randomly from the solved
//! layout, so every shuffle is solvable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MechanismFrame, PuzzleMechanism};
use crate::core::DeterministicRng;

/// Random gap moves applied by a shuffle.
pub const SHUFFLE_MOVES: usize = 200;

/// Direction a tile slid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMove {
    Right,
    Left,
    Down,
    Up,
}

/// Grid state of the puzzle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlidingPuzzle {
    size: usize,
    tiles: Vec<u8>,
    activated: bool,
    rng: DeterministicRng,
}

impl SlidingPuzzle {
    /// Solved `size` x `size` puzzle. Call [`PuzzleMechanism::reset`] to shuffle.
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => DeterministicRng::new(seed),
            None => DeterministicRng::from_clock(),
        };
        Self { size, tiles: solved_layout(size), activated: true, rng }
    }

    /// Edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tile numbers row by row, 0 for the gap.
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Tile at `row`, `col`.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.size && col < self.size {
            self.tiles.get(row * self.size + col).copied()
        } else {
            None
        }
    }

    /// Slide tile `k` into the gap if they are adjacent.
    ///
    /// Neighbours are checked right, left, down, up, in that order.
    pub fn move_tile(&mut self, k: u8) -> Option<TileMove> {
        if !self.activated || k == 0 {
            return None;
        }
        let pos = self.tiles.iter().position(|t| *t == k)?;
        let (row, col) = (pos / self.size, pos % self.size);

        let candidates = [
            (col + 1 < self.size).then(|| (pos + 1, TileMove::Right)),
            (col > 0).then(|| (pos - 1, TileMove::Left)),
            (row + 1 < self.size).then(|| (pos + self.size, TileMove::Down)),
            (row > 0).then(|| (pos - self.size, TileMove::Up)),
        ];

        let (gap, direction) = candidates
            .into_iter()
            .flatten()
            .find(|(target, _)| self.tiles[*target] == 0)?;
        self.tiles.swap(pos, gap);
        Some(direction)
    }

    /// Tiles 1..n²-1 are in reading order.
    pub fn is_in_order(&self) -> bool {
        let last = self.tiles.len().saturating_sub(1);
        self.tiles[..last]
            .iter()
            .enumerate()
            .all(|(i, tile)| *tile as usize == i + 1)
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    fn shuffle(&mut self) {
        self.tiles = solved_layout(self.size);
        let mut gap = self.tiles.len() - 1;
        let mut moves = 0;

        while moves < SHUFFLE_MOVES || self.is_in_order() {
            let (row, col) = (gap / self.size, gap % self.size);
            let mut neighbours = Vec::with_capacity(4);
            if col + 1 < self.size {
                neighbours.push(gap + 1);
            }
            if col > 0 {
                neighbours.push(gap - 1);
            }
            if row + 1 < self.size {
                neighbours.push(gap + self.size);
            }
            if row > 0 {
                neighbours.push(gap - self.size);
            }

            if let Some(next) = self.rng.choose(&neighbours).copied() {
                self.tiles.swap(gap, next);
                gap = next;
                moves += 1;
            }
        }
        debug!(size = self.size, moves, "Sliding puzzle shuffled");
    }
}

fn solved_layout(size: usize) -> Vec<u8> {
    let n = size * size;
    (1..n).map(|k| k as u8).chain(std::iter::once(0)).collect()
}

impl PuzzleMechanism for SlidingPuzzle {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        self.is_in_order()
    }

    fn reset(&mut self) {
        self.shuffle();
        self.activated = true;
    }

    fn on_skip(&mut self) {
        self.tiles = solved_layout(self.size);
        self.activated = false;
    }

    fn on_solve(&mut self) {
        self.activated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_layout(tiles: Vec<u8>) -> SlidingPuzzle {
        let mut puzzle = SlidingPuzzle::new(3, Some(1));
        puzzle.tiles = tiles;
        puzzle
    }

    #[test]
    fn test_new_is_solved_layout() {
        let puzzle = SlidingPuzzle::new(3, Some(5));
        assert_eq!(puzzle.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(puzzle.is_in_order());
        assert_eq!(puzzle.tile_at(2, 2), Some(0));
        assert_eq!(puzzle.tile_at(3, 0), None);
    }

    #[test]
    fn test_move_directions() {
        // Gap in the centre
        let mut p = from_layout(vec![1, 2, 3, 4, 0, 5, 6, 7, 8]);
        assert_eq!(p.move_tile(4), Some(TileMove::Right));
        assert_eq!(p.tiles(), &[1, 2, 3, 0, 4, 5, 6, 7, 8]);
        assert_eq!(p.move_tile(4), Some(TileMove::Left));
        assert_eq!(p.move_tile(2), Some(TileMove::Down));
        assert_eq!(p.move_tile(2), Some(TileMove::Up));
        assert_eq!(p.tiles(), &[1, 2, 3, 4, 0, 5, 6, 7, 8]);
    }

    #[test]
    fn test_non_adjacent_tile_does_not_move() {
        let mut p = from_layout(vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(p.move_tile(1), None);
        assert_eq!(p.move_tile(0), None);
        assert_eq!(p.move_tile(42), None);
        assert_eq!(p.move_tile(8), Some(TileMove::Right));
    }

    #[test]
    fn test_gap_position_does_not_matter_for_order() {
        let p = from_layout(vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(p.is_in_order());
        let p = from_layout(vec![1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert!(!p.is_in_order());
    }

    #[test]
    fn test_shuffle_is_seeded_permutation() {
        let mut a = SlidingPuzzle::new(3, Some(77));
        let mut b = SlidingPuzzle::new(3, Some(77));
        a.reset();
        b.reset();
        assert_eq!(a.tiles(), b.tiles());
        assert!(!a.is_in_order());

        let mut sorted = a.tiles().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_skip_and_solve_deactivate() {
        let mut p = SlidingPuzzle::new(3, Some(3));
        p.reset();
        p.on_skip();
        assert!(p.is_in_order());
        assert!(!p.is_activated());
        assert_eq!(p.move_tile(8), None);

        p.reset();
        assert!(p.is_activated());
        p.on_solve();
        assert!(!p.is_activated());
    }
}
