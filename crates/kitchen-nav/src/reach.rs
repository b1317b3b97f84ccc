use kitchen_core::Cell;

use crate::{NavGrid, Occupants};

/// Walking distances from one origin, as produced by [`NavGrid::reachable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reach {
    width: i32,
    height: i32,
    dist: Vec<u32>,
}

impl Reach {
    pub(crate) fn new(width: i32, height: i32, dist: Vec<u32>) -> Self {
        Self {
            width,
            height,
            dist,
        }
    }

    pub fn distance(&self, cell: Cell) -> Option<u32> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        let d = self.dist[(cell.y * self.width + cell.x) as usize];
        (d != u32::MAX).then_some(d)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.distance(cell).is_some()
    }

    /// Best stand cell for interacting with `target` and the walking distance to it.
    pub fn approach(&self, grid: &NavGrid, target: Cell, occupants: Occupants) -> Option<(Cell, u32)> {
        if grid.is_passable(target, occupants) || self.distance(target) == Some(0) {
            return self.distance(target).map(|d| (target, d));
        }

        let mut best: Option<(Cell, u32)> = None;
        for n in target.neighbors() {
            let Some(d) = self.distance(n) else { continue };
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((n, d));
            }
        }
        best
    }
}
