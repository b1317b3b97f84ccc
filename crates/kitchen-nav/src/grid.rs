use core::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use kitchen_core::{Cell, Layout};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Reach;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellState {
    Open,
    Blocked,
    /// Walkable floor with an agent on it.
    Occupied,
}

/// How `Occupied` cells are treated by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupants {
    Block,
    Ignore,
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    from_start: u32,
    g: u32,
    cell: Cell,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, u32, Cell, u64) {
        (self.f, self.from_start, self.g, self.cell, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavGrid {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
}

impl NavGrid {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        let width = width as i32;
        let height = height as i32;
        Self {
            width,
            height,
            cells: vec![CellState::Open; (width * height) as usize],
        }
    }

    /// Static passability: only floor is open.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut grid = NavGrid::new(layout.width().max(1) as u32, layout.height().max(1) as u32);
        for (cell, tile) in layout.cells() {
            grid.set_blocked(cell, !tile.is_walkable());
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if let Some(idx) = self.idx(cell) {
            self.cells[idx] = if blocked {
                CellState::Blocked
            } else {
                CellState::Open
            };
        }
    }

    /// Paint an agent. Blocked cells stay blocked.
    pub fn set_occupied(&mut self, cell: Cell) {
        if let Some(idx) = self.idx(cell) {
            if self.cells[idx] == CellState::Open {
                self.cells[idx] = CellState::Occupied;
            }
        }
    }

    pub fn state(&self, cell: Cell) -> CellState {
        self.idx(cell)
            .map(|idx| self.cells[idx])
            .unwrap_or(CellState::Blocked)
    }

    pub fn is_passable(&self, cell: Cell, occupants: Occupants) -> bool {
        match self.state(cell) {
            CellState::Open => true,
            CellState::Occupied => occupants == Occupants::Ignore,
            CellState::Blocked => false,
        }
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub(crate) fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }

    pub(crate) fn cell_from_idx(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell::new(idx % self.width, idx / self.width)
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    fn reconstruct_path(&self, came_from: &[Option<usize>], mut current: usize) -> Vec<Cell> {
        let mut out = vec![self.cell_from_idx(current)];
        while let Some(prev) = came_from[current] {
            current = prev;
            out.push(self.cell_from_idx(current));
        }
        out.reverse();
        out
    }

    /// Shortest 4-connected path with other agents treated as obstacles.
    ///
    /// Returns `[start, .., goal]`, `[start]` when `start == goal`, and an empty vector when the
    /// goal cannot be reached.
    pub fn shortest_path(&self, start: Cell, goal: Cell) -> Vec<Cell> {
        self.shortest_path_with(start, goal, Occupants::Block)
    }

    pub fn shortest_path_with(&self, start: Cell, goal: Cell, occupants: Occupants) -> Vec<Cell> {
        let (Some(start_idx), Some(goal_idx)) = (self.idx(start), self.idx(goal)) else {
            return Vec::new();
        };
        if start == goal {
            return vec![start];
        }
        if !self.is_passable(goal, occupants) {
            return Vec::new();
        }

        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        let mut g_score = vec![u32::MAX; self.len()];
        let mut came_from: Vec<Option<usize>> = vec![None; self.len()];

        g_score[start_idx] = 0;
        open.push(OpenNode {
            f: start.manhattan(goal),
            from_start: 0,
            g: 0,
            cell: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.cell == goal {
                return self.reconstruct_path(&came_from, goal_idx);
            }

            let Some(node_idx) = self.idx(node.cell) else {
                continue;
            };
            if node.g != g_score[node_idx] {
                // Stale heap entry.
                continue;
            }

            for n in node.cell.neighbors() {
                let Some(n_idx) = self.idx(n) else { continue };
                if !self.is_passable(n, occupants) {
                    continue;
                }

                let tentative_g = node.g.saturating_add(1);
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node_idx);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(n.manhattan(goal)),
                    from_start: n.manhattan(start),
                    g: tentative_g,
                    cell: n,
                    tie,
                });
                tie += 1;
            }
        }

        Vec::new()
    }

    /// Breadth-first distances from `start`. The start cell always counts as reachable.
    pub fn reachable(&self, start: Cell, occupants: Occupants) -> Reach {
        let mut dist = vec![u32::MAX; self.len()];
        let Some(start_idx) = self.idx(start) else {
            return Reach::new(self.width, self.height, dist);
        };

        let mut queue = VecDeque::new();
        dist[start_idx] = 0;
        queue.push_back(start);
        while let Some(cell) = queue.pop_front() {
            let Some(idx) = self.idx(cell) else { continue };
            let d = dist[idx];
            for n in cell.neighbors() {
                let Some(n_idx) = self.idx(n) else { continue };
                if dist[n_idx] != u32::MAX || !self.is_passable(n, occupants) {
                    continue;
                }
                dist[n_idx] = d + 1;
                queue.push_back(n);
            }
        }

        Reach::new(self.width, self.height, dist)
    }

    /// The cell to stand on to interact with `target`, as seen from `from`.
    ///
    /// A passable target is its own stand cell. Otherwise this is the reachable passable
    /// neighbour with the shortest walking distance (ties in neighbour order).
    pub fn nearest_approach(&self, from: Cell, target: Cell) -> Option<Cell> {
        self.nearest_approach_with(from, target, Occupants::Block)
    }

    pub fn nearest_approach_with(
        &self,
        from: Cell,
        target: Cell,
        occupants: Occupants,
    ) -> Option<Cell> {
        self.reachable(from, occupants)
            .approach(self, target, occupants)
            .map(|(cell, _)| cell)
    }
}
