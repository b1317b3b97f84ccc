use kitchen_core::{FoodKind, FoodStatus, ObjectId};
use kitchen_exec::{ItemMatch, Query, Scene, Surface};

/// A read-only predicate over the scene, attached to plan edges and completion rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// A matching object is reachable (or held, for [`Surface::Anywhere`]).
    Exists(Query),
    Absent(Query),
    StationReachable(FoodKind),
    FreeSurface(Surface),
    FireExists,
    DustbinReachable,
    /// The planning agent has this exact object in hand.
    Holding(ObjectId),
    Not(Box<Guard>),
    All(Vec<Guard>),
    Any(Vec<Guard>),
}

impl Guard {
    pub fn eval(&self, scene: &Scene<'_>) -> bool {
        match self {
            Guard::Always => true,
            Guard::Exists(query) => scene.exists(query),
            Guard::Absent(query) => !scene.exists(query),
            Guard::StationReachable(food) => scene.station_reachable(*food),
            Guard::FreeSurface(on) => scene.has_free(*on),
            Guard::FireExists => !scene.world().fires().is_empty(),
            Guard::DustbinReachable => scene.dustbin_reachable(),
            Guard::Holding(id) => scene.held().is_some_and(|o| o.id == *id),
            Guard::Not(inner) => !inner.eval(scene),
            Guard::All(all) => all.iter().all(|g| g.eval(scene)),
            Guard::Any(any) => any.iter().any(|g| g.eval(scene)),
        }
    }

    pub fn exists(item: ItemMatch) -> Guard {
        Guard::Exists(Query::new(item))
    }

    pub fn exists_on(item: ItemMatch, on: Surface) -> Guard {
        Guard::Exists(Query::new(item).on(on))
    }

    pub fn absent(item: ItemMatch) -> Guard {
        Guard::Absent(Query::new(item))
    }

    pub fn absent_on(item: ItemMatch, on: Surface) -> Guard {
        Guard::Absent(Query::new(item).on(on))
    }

    /// A fresh instance can be had: from a reachable station or lying around.
    pub fn obtainable(food: FoodKind) -> Guard {
        Guard::Any(vec![
            Guard::StationReachable(food),
            Guard::exists(ItemMatch::food(food, Some(food.initial_status()))),
        ])
    }

    /// A ready instance exists, loose or plated.
    pub fn ready(food: FoodKind) -> Guard {
        let status = match food {
            FoodKind::Lettuce | FoodKind::Beef => Some(FoodStatus::Done),
            _ => None,
        };
        Guard::exists(ItemMatch::food(food, status))
    }

    /// Either `self` or `other`; merges nested `Any`s.
    pub fn or(self, other: Guard) -> Guard {
        match (self, other) {
            (Guard::Always, _) | (_, Guard::Always) => Guard::Always,
            (Guard::Any(mut a), Guard::Any(b)) => {
                a.extend(b);
                Guard::Any(a)
            }
            (Guard::Any(mut a), g) | (g, Guard::Any(mut a)) => {
                a.push(g);
                Guard::Any(a)
            }
            (a, b) => Guard::Any(vec![a, b]),
        }
    }
}

impl core::ops::Not for Guard {
    type Output = Guard;

    fn not(self) -> Guard {
        Guard::Not(Box::new(self))
    }
}
