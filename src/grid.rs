// --- File: grid.rs ---
//! Uniform bucket grid rebuilt for every pass that needs neighbor lookups.
//!
//! Each pass builds its own grid with a cell size matched to its interaction
//! radius. Buckets store arena indices into the body slice the grid was built
//! from, together with the body id so pairs can be deduplicated without going
//! back to the bodies.

use crate::body::{Body, BodyId};
use glam::Vec2;
use std::collections::{HashMap, HashSet};

pub type GridKey = (i32, i32);

/// Unordered pair of bodies in canonical (min id, max id) order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(pub BodyId, pub BodyId);

impl PairKey {
    #[inline]
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridEntry {
    pub index: usize,
    pub id: BodyId,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<GridKey, Vec<GridEntry>>,
    len: usize,
}

impl SpatialGrid {
    pub fn build(bodies: &[Body], cell_size: f32) -> Self {
        let mut cells: HashMap<GridKey, Vec<GridEntry>> = HashMap::new();
        for (index, body) in bodies.iter().enumerate() {
            cells
                .entry(grid_key(body.position, cell_size))
                .or_default()
                .push(GridEntry { index, id: body.id });
        }
        Self {
            cell_size,
            cells,
            len: bodies.len(),
        }
    }

    #[inline]
    pub fn key_for(&self, position: Vec2) -> GridKey {
        grid_key(position, self.cell_size)
    }

    /// Number of bodies bucketed.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cell(&self, key: GridKey) -> &[GridEntry] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridKey, &[GridEntry])> + '_ {
        self.cells.iter().map(|(key, entries)| (*key, entries.as_slice()))
    }

    /// Entries in `key`'s cell and its 8 neighbors.
    pub fn neighborhood(&self, key: GridKey) -> impl Iterator<Item = &GridEntry> + '_ {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (key.0 + dx, key.1 + dy)))
            .flat_map(move |neighbor| self.cell(neighbor).iter())
    }

    /// Every unordered pair of bodies sharing a 3x3 neighborhood, each reported
    /// exactly once as `(index_a, index_b)`. Cells are visited in sorted key
    /// order so the result is reproducible.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut keys: Vec<GridKey> = self.cells.keys().copied().collect();
        keys.sort_unstable();

        let mut checked: HashSet<PairKey> = HashSet::new();
        let mut pairs = Vec::new();
        for key in keys {
            for a in self.cell(key) {
                for b in self.neighborhood(key) {
                    if a.index == b.index {
                        continue;
                    }
                    if checked.insert(PairKey::new(a.id, b.id)) {
                        pairs.push((a.index, b.index));
                    }
                }
            }
        }
        pairs
    }
}

#[inline]
pub fn grid_key(position: Vec2, cell_size: f32) -> GridKey {
    (
        (position.x / cell_size).floor() as i32,
        (position.y / cell_size).floor() as i32,
    )
}

/// Mutable references to two distinct bodies of the arena.
pub(crate) fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = bodies.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

// --- End of File: grid.rs ---
