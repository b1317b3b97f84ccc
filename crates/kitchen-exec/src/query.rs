use kitchen_core::{Cell, FoodKind, FoodStatus, ObjectKind, Tile, WorldObject};

/// Whether a food must sit on a plate, must be loose, or either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Plating {
    Loose,
    Plated,
    Either,
}

/// What an object must be to match a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemMatch {
    Food {
        kind: FoodKind,
        status: Option<FoodStatus>,
        plating: Plating,
    },
    EmptyPlate,
    Extinguisher,
    Fire,
    /// Anything an agent can carry.
    Pickable,
}

impl ItemMatch {
    pub fn food(kind: FoodKind, status: Option<FoodStatus>) -> Self {
        ItemMatch::Food {
            kind,
            status,
            plating: Plating::Either,
        }
    }

    pub fn loose(kind: FoodKind, status: Option<FoodStatus>) -> Self {
        ItemMatch::Food {
            kind,
            status,
            plating: Plating::Loose,
        }
    }

    pub fn plated(kind: FoodKind, status: Option<FoodStatus>) -> Self {
        ItemMatch::Food {
            kind,
            status,
            plating: Plating::Plated,
        }
    }

    pub fn matches(&self, object: &WorldObject) -> bool {
        match *self {
            ItemMatch::Food {
                kind,
                status,
                plating,
            } => {
                let placed_ok = match plating {
                    Plating::Loose => matches!(object.kind, ObjectKind::Food(_)),
                    Plating::Plated => object.is_plate(),
                    Plating::Either => true,
                };
                placed_ok && object.carries(kind, status)
            }
            ItemMatch::EmptyPlate => object.is_empty_plate(),
            ItemMatch::Extinguisher => object.is_extinguisher(),
            ItemMatch::Fire => object.is_fire(),
            ItemMatch::Pickable => object.is_pickable(),
        }
    }
}

/// Which static tiles an object may sit on to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Surface {
    /// Any tile that holds objects; held objects also count.
    Anywhere,
    Counter,
    CenterCounter,
    EdgeCounter,
    CutBoard,
    Pan,
    /// Anything but a pan: pan contents can only be scooped with a plate.
    NotPan,
    At(Cell),
}

impl Surface {
    pub fn matches(self, cell: Cell, tile: Tile) -> bool {
        match self {
            Surface::Anywhere => tile.holds_objects(),
            Surface::Counter => tile.is_counter(),
            Surface::CenterCounter => tile.is_center_counter(),
            Surface::EdgeCounter => tile.is_edge_counter(),
            Surface::CutBoard => tile == Tile::CutBoard,
            Surface::Pan => tile == Tile::Pan,
            Surface::NotPan => tile.holds_objects() && tile != Tile::Pan,
            Surface::At(at) => at == cell,
        }
    }
}

/// An object pattern plus where it must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Query {
    pub item: ItemMatch,
    pub on: Surface,
}

impl Query {
    pub fn new(item: ItemMatch) -> Self {
        Self {
            item,
            on: Surface::Anywhere,
        }
    }

    pub fn on(mut self, on: Surface) -> Self {
        self.on = on;
        self
    }
}
