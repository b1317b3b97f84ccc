//! Static tiles and the ASCII layout format.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, FoodKind};

/// The static object occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tile {
    Floor,
    /// `center` counters are the only pass-through between the two halves of the kitchen.
    Counter { center: bool },
    CutBoard,
    Pan,
    Dustbin,
    DeliverSquare,
    Station(FoodKind),
    PlateStation,
}

impl Tile {
    pub fn from_glyph(glyph: char) -> Option<Tile> {
        let tile = match glyph {
            '.' | ' ' => Tile::Floor,
            '-' => Tile::Counter { center: false },
            '=' => Tile::Counter { center: true },
            '/' => Tile::CutBoard,
            'P' => Tile::Pan,
            'D' => Tile::Dustbin,
            '*' => Tile::DeliverSquare,
            'L' => Tile::Station(FoodKind::Lettuce),
            'B' => Tile::Station(FoodKind::Beef),
            'R' => Tile::Station(FoodKind::Bread),
            'O' => Tile::PlateStation,
            _ => return None,
        };
        Some(tile)
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Counter { center: false } => '-',
            Tile::Counter { center: true } => '=',
            Tile::CutBoard => '/',
            Tile::Pan => 'P',
            Tile::Dustbin => 'D',
            Tile::DeliverSquare => '*',
            Tile::Station(FoodKind::Lettuce) => 'L',
            Tile::Station(FoodKind::Beef) => 'B',
            Tile::Station(_) => 'R',
            Tile::PlateStation => 'O',
        }
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor)
    }

    pub fn is_counter(self) -> bool {
        matches!(self, Tile::Counter { .. })
    }

    pub fn is_center_counter(self) -> bool {
        matches!(self, Tile::Counter { center: true })
    }

    pub fn is_edge_counter(self) -> bool {
        matches!(self, Tile::Counter { center: false })
    }

    /// Surfaces dynamic objects can rest on.
    pub fn holds_objects(self) -> bool {
        matches!(
            self,
            Tile::Counter { .. } | Tile::CutBoard | Tile::Pan | Tile::DeliverSquare
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

/// Fixed-size rectangular grid of static tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Layout {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Layout, LayoutError> {
        let first = rows.first().ok_or(LayoutError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(LayoutError::UnknownGlyph { glyph, x, y })?;
                tiles.push(tile);
            }
        }

        Ok(Layout {
            width: width as i32,
            height: rows.len() as i32,
            tiles,
        })
    }

    /// Parse a newline-separated block, ignoring blank lines.
    pub fn from_ascii(text: &str) -> Result<Layout, LayoutError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        Layout::parse(&rows)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.tiles.get((cell.y * self.width + cell.x) as usize).copied()
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.tile(cell).is_some_and(Tile::is_walkable)
    }

    /// Row-major iteration over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let i = i as i32;
            (Cell::new(i % self.width, i / self.width), *tile)
        })
    }

    pub fn cells_where(&self, pred: impl Fn(Tile) -> bool) -> Vec<Cell> {
        self.cells()
            .filter(|(_, tile)| pred(*tile))
            .map(|(cell, _)| cell)
            .collect()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let glyph = self.tile(Cell::new(x, y)).map_or('?', Tile::glyph);
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
