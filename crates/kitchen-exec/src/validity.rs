//! Pure checks over a [`Scene`]: which sub-tasks are legal, where they act, and whether their
//! goal already holds.

use std::collections::BTreeSet;

use kitchen_core::{Cell, FoodKind, FoodStatus, ObjectId, Tile, WorldObject};

use crate::{ItemMatch, Query, Scene, SubTask, Surface};

/// A place the executor can walk up to and interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub cell: Cell,
    pub object: Option<ObjectId>,
    /// Higher is more pressing (cooking progress for beef).
    pub urgency: u32,
}

/// How the held object relates to a sub-task's hand precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hands {
    Ready,
    /// Hands must be emptied onto a counter first.
    Park,
    Wrong,
}

fn ready_status(food: FoodKind) -> Option<FoodStatus> {
    match food {
        FoodKind::Lettuce | FoodKind::Beef => Some(FoodStatus::Done),
        _ => None,
    }
}

pub(crate) fn hands(task: SubTask, scene: &Scene<'_>) -> Hands {
    let held = scene.held();
    if task.needs_empty_hands() {
        return if held.is_some() { Hands::Park } else { Hands::Ready };
    }
    if task == SubTask::Wait {
        return Hands::Ready;
    }
    let Some(held) = held else {
        return Hands::Wrong;
    };

    let ok = match task {
        SubTask::PutOntoCutboard => held.loose_food().is_some_and(|f| f.kind == FoodKind::Lettuce),
        SubTask::PutOntoPan => held
            .loose_food()
            .is_some_and(|f| f.kind == FoodKind::Beef && f.status == FoodStatus::Fresh),
        SubTask::PutOntoCounter | SubTask::PutOntoCenterCounter | SubTask::PutOntoEdgeCounter => {
            true
        }
        SubTask::PutOntoPlate => held.loose_food().is_some_and(|f| f.is_plateable()),
        SubTask::PutOntoPlateWith(other) => held
            .food()
            .is_some_and(|f| f.is_ready() && f.kind.combine(other).is_some()),
        SubTask::Plate { .. } => held.is_empty_plate(),
        SubTask::DropFood => held.food().is_some(),
        SubTask::PutOutFire => held.is_extinguisher(),
        SubTask::Deliver => held.is_plate() && held.food().is_some_and(|f| f.is_deliverable()),
        _ => false,
    };
    if ok {
        Hands::Ready
    } else {
        Hands::Wrong
    }
}

fn urgency(object: &WorldObject) -> u32 {
    object
        .food()
        .filter(|f| f.kind == FoodKind::Beef)
        .map_or(0, |f| f.progress)
}

fn object_targets(scene: &Scene<'_>, query: Query) -> Vec<Target> {
    scene
        .find(&query)
        .into_iter()
        .filter_map(|o| {
            Some(Target {
                cell: o.cell()?,
                object: Some(o.id),
                urgency: urgency(o),
            })
        })
        .collect()
}

fn cell_targets(cells: Vec<Cell>) -> Vec<Target> {
    cells
        .into_iter()
        .map(|cell| Target {
            cell,
            object: None,
            urgency: 0,
        })
        .collect()
}

/// Every reachable place `task` could be carried out at, unranked.
pub fn targets(task: SubTask, scene: &Scene<'_>) -> Vec<Target> {
    match task {
        SubTask::GetFromStation(food) => cell_targets(scene.tiles(|t| t == Tile::Station(food))),
        SubTask::Pickup { food, status } => object_targets(
            scene,
            Query::new(ItemMatch::food(food, status)).on(Surface::NotPan),
        ),
        SubTask::PickupPlate => {
            let mut out = object_targets(scene, Query::new(ItemMatch::EmptyPlate).on(Surface::NotPan));
            out.extend(cell_targets(scene.tiles(|t| t == Tile::PlateStation)));
            out
        }
        SubTask::PickupBreadInPlate => object_targets(
            scene,
            Query::new(ItemMatch::plated(FoodKind::Bread, None)).on(Surface::NotPan),
        ),
        SubTask::PickupFireExtinguisher => {
            object_targets(scene, Query::new(ItemMatch::Extinguisher))
        }
        SubTask::PutOntoCutboard => cell_targets(scene.free_surfaces(Surface::CutBoard)),
        SubTask::PutOntoPan => cell_targets(scene.free_surfaces(Surface::Pan)),
        SubTask::PutOntoCounter => cell_targets(scene.free_surfaces(Surface::Counter)),
        SubTask::PutOntoCenterCounter => cell_targets(scene.free_surfaces(Surface::CenterCounter)),
        SubTask::PutOntoEdgeCounter => cell_targets(scene.free_surfaces(Surface::EdgeCounter)),
        SubTask::PutOntoPlate => {
            object_targets(scene, Query::new(ItemMatch::EmptyPlate).on(Surface::NotPan))
        }
        SubTask::PutOntoPlateWith(food) => object_targets(
            scene,
            Query::new(ItemMatch::plated(food, ready_status(food))).on(Surface::NotPan),
        ),
        SubTask::ChopLettuce => object_targets(
            scene,
            Query::new(ItemMatch::loose(FoodKind::Lettuce, Some(FoodStatus::Fresh)))
                .on(Surface::CutBoard),
        ),
        SubTask::Plate {
            food,
            overcooked,
            from,
        } => {
            let status = if overcooked {
                Some(FoodStatus::Overcooked)
            } else {
                ready_status(food)
            };
            let on = from.map_or(Surface::Anywhere, |s| s.surface());
            object_targets(scene, Query::new(ItemMatch::loose(food, status)).on(on))
        }
        SubTask::DropFood => cell_targets(scene.tiles(|t| t == Tile::Dustbin)),
        SubTask::PutOutFire => object_targets(scene, Query::new(ItemMatch::Fire)),
        SubTask::Deliver => {
            let squares = scene.tiles(|t| t == Tile::DeliverSquare);
            cell_targets(squares.into_iter().filter(|&c| scene.is_clear(c)).collect())
        }
        SubTask::Wait => Vec::new(),
    }
}

/// Whether `task` may be started now: hands fit (or can be emptied onto a free counter) and a
/// reachable target exists.
pub fn is_valid(task: SubTask, scene: &Scene<'_>) -> bool {
    if task == SubTask::Wait {
        return true;
    }
    let hands_ok = match hands(task, scene) {
        Hands::Ready => true,
        Hands::Park => scene.has_free(Surface::Counter),
        Hands::Wrong => false,
    };
    hands_ok && !targets(task, scene).is_empty()
}

/// The subset of the alphabet currently legal.
pub fn valid_actions(scene: &Scene<'_>) -> BTreeSet<SubTask> {
    SubTask::ALL
        .into_iter()
        .filter(|&task| is_valid(task, scene))
        .collect()
}

/// Goal test for verbs whose outcome is visible in the world alone. Verbs judged by a change
/// of the held object report `false`; the executor tracks those itself.
pub fn is_satisfied(task: SubTask, scene: &Scene<'_>) -> bool {
    match task {
        SubTask::GetFromStation(food) => {
            scene.holds(&ItemMatch::loose(food, Some(food.initial_status())))
        }
        SubTask::Pickup { food, status } => scene.holds(&ItemMatch::food(food, status)),
        SubTask::PickupPlate => scene.holds(&ItemMatch::EmptyPlate),
        SubTask::PickupBreadInPlate => scene.holds(&ItemMatch::plated(FoodKind::Bread, None)),
        SubTask::PickupFireExtinguisher => scene.holds(&ItemMatch::Extinguisher),
        SubTask::PutOutFire => scene.world().fires().is_empty(),
        _ => false,
    }
}
