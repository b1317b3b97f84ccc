use core::fmt;
use core::str::FromStr;

use kitchen_core::{FoodKind, FoodStatus};
use thiserror::Error;

use crate::Surface;

/// Where a `plate_*` sub-task takes its food from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Pan,
    CutBoard,
    Counter,
}

impl Source {
    pub fn token(self) -> &'static str {
        match self {
            Source::Pan => "pan",
            Source::CutBoard => "cutboard",
            Source::Counter => "counter",
        }
    }

    pub fn surface(self) -> Surface {
        match self {
            Source::Pan => Surface::Pan,
            Source::CutBoard => Surface::CutBoard,
            Source::Counter => Surface::Counter,
        }
    }
}

/// One verb of the executor's closed alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubTask {
    GetFromStation(FoodKind),
    /// `status` is `None` for bread and compounds.
    Pickup {
        food: FoodKind,
        status: Option<FoodStatus>,
    },
    PickupPlate,
    PickupBreadInPlate,
    PickupFireExtinguisher,
    PutOntoCutboard,
    PutOntoPan,
    PutOntoCounter,
    PutOntoCenterCounter,
    PutOntoEdgeCounter,
    PutOntoPlate,
    PutOntoPlateWith(FoodKind),
    ChopLettuce,
    /// Scoop a loose food into the held empty plate.
    Plate {
        food: FoodKind,
        overcooked: bool,
        from: Option<Source>,
    },
    DropFood,
    PutOutFire,
    Deliver,
    Wait,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sub-task: {0}")]
pub struct UnknownSubTask(pub String);

const fn pickup(food: FoodKind, status: Option<FoodStatus>) -> SubTask {
    SubTask::Pickup { food, status }
}

const fn plate(food: FoodKind, overcooked: bool, from: Option<Source>) -> SubTask {
    SubTask::Plate {
        food,
        overcooked,
        from,
    }
}

impl SubTask {
    pub const ALL: [SubTask; 41] = [
        SubTask::GetFromStation(FoodKind::Lettuce),
        SubTask::GetFromStation(FoodKind::Beef),
        SubTask::GetFromStation(FoodKind::Bread),
        pickup(FoodKind::Lettuce, Some(FoodStatus::Fresh)),
        pickup(FoodKind::Lettuce, Some(FoodStatus::Done)),
        pickup(FoodKind::Beef, Some(FoodStatus::Fresh)),
        pickup(FoodKind::Beef, Some(FoodStatus::Done)),
        pickup(FoodKind::Beef, Some(FoodStatus::Overcooked)),
        pickup(FoodKind::Bread, None),
        pickup(FoodKind::BeefLettuce, None),
        pickup(FoodKind::LettuceBurger, None),
        pickup(FoodKind::BeefBurger, None),
        pickup(FoodKind::BeefLettuceBurger, None),
        SubTask::PickupPlate,
        SubTask::PickupBreadInPlate,
        SubTask::PickupFireExtinguisher,
        SubTask::PutOntoCutboard,
        SubTask::PutOntoPan,
        SubTask::PutOntoCounter,
        SubTask::PutOntoCenterCounter,
        SubTask::PutOntoEdgeCounter,
        SubTask::PutOntoPlate,
        SubTask::PutOntoPlateWith(FoodKind::Lettuce),
        SubTask::PutOntoPlateWith(FoodKind::Beef),
        SubTask::PutOntoPlateWith(FoodKind::Bread),
        SubTask::PutOntoPlateWith(FoodKind::BeefLettuce),
        SubTask::PutOntoPlateWith(FoodKind::BeefBurger),
        SubTask::PutOntoPlateWith(FoodKind::LettuceBurger),
        SubTask::ChopLettuce,
        plate(FoodKind::Lettuce, false, None),
        plate(FoodKind::Lettuce, false, Some(Source::CutBoard)),
        plate(FoodKind::Lettuce, false, Some(Source::Counter)),
        plate(FoodKind::Beef, false, None),
        plate(FoodKind::Beef, false, Some(Source::Pan)),
        plate(FoodKind::Beef, false, Some(Source::Counter)),
        plate(FoodKind::Beef, true, Some(Source::Pan)),
        plate(FoodKind::Bread, false, None),
        SubTask::DropFood,
        SubTask::PutOutFire,
        SubTask::Deliver,
        SubTask::Wait,
    ];

    /// `pickup_<food>_<status>` for a base food in the given status, `pickup_<food>` otherwise.
    /// `None` when the alphabet has no such verb.
    pub fn pickup_for(food: FoodKind, status: FoodStatus) -> Option<SubTask> {
        let status = match food {
            FoodKind::Lettuce | FoodKind::Beef => Some(status),
            _ => None,
        };
        let task = pickup(food, status);
        SubTask::ALL.contains(&task).then_some(task)
    }

    /// `plate_<food>` for a food the agent can scoop onto a plate.
    pub fn plate_for(food: FoodKind) -> Option<SubTask> {
        let task = plate(food, false, None);
        SubTask::ALL.contains(&task).then_some(task)
    }

    /// Whether the verb starts with empty hands (possibly after parking what is held).
    pub fn needs_empty_hands(self) -> bool {
        matches!(
            self,
            SubTask::GetFromStation(_)
                | SubTask::Pickup { .. }
                | SubTask::PickupPlate
                | SubTask::PickupBreadInPlate
                | SubTask::PickupFireExtinguisher
                | SubTask::ChopLettuce
        )
    }

    /// Verbs whose success is "the held object changed".
    pub fn changes_hands(self) -> bool {
        matches!(
            self,
            SubTask::PutOntoCutboard
                | SubTask::PutOntoPan
                | SubTask::PutOntoCounter
                | SubTask::PutOntoCenterCounter
                | SubTask::PutOntoEdgeCounter
                | SubTask::PutOntoPlate
                | SubTask::PutOntoPlateWith(_)
                | SubTask::Plate { .. }
                | SubTask::DropFood
                | SubTask::Deliver
        )
    }
}

impl fmt::Display for SubTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SubTask::GetFromStation(food) => write!(f, "get_{}_from_station", food.token()),
            SubTask::Pickup { food, status } => {
                write!(f, "pickup_{}", food.token())?;
                if let Some(status) = status {
                    write!(f, "_{}", status.token())?;
                }
                Ok(())
            }
            SubTask::PickupPlate => f.write_str("pickup_plate"),
            SubTask::PickupBreadInPlate => f.write_str("pickup_bread_in_plate"),
            SubTask::PickupFireExtinguisher => f.write_str("pickup_fireextinguisher"),
            SubTask::PutOntoCutboard => f.write_str("put_onto_cutboard"),
            SubTask::PutOntoPan => f.write_str("put_onto_pan"),
            SubTask::PutOntoCounter => f.write_str("put_onto_counter"),
            SubTask::PutOntoCenterCounter => f.write_str("put_onto_center_counter"),
            SubTask::PutOntoEdgeCounter => f.write_str("put_onto_edge_counter"),
            SubTask::PutOntoPlate => f.write_str("put_onto_plate"),
            SubTask::PutOntoPlateWith(food) => write!(f, "put_onto_plate_with_{}", food.token()),
            SubTask::ChopLettuce => f.write_str("chop_lettuce"),
            SubTask::Plate {
                food,
                overcooked,
                from,
            } => {
                write!(f, "plate_{}", food.token())?;
                if overcooked {
                    f.write_str("_overcooked")?;
                }
                if let Some(from) = from {
                    write!(f, "_from_{}", from.token())?;
                }
                Ok(())
            }
            SubTask::DropFood => f.write_str("drop_food"),
            SubTask::PutOutFire => f.write_str("put_out_fire"),
            SubTask::Deliver => f.write_str("deliver"),
            SubTask::Wait => f.write_str("wait"),
        }
    }
}

impl FromStr for SubTask {
    type Err = UnknownSubTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SubTask::ALL
            .into_iter()
            .find(|task| task.to_string() == needle)
            .ok_or_else(|| UnknownSubTask(s.to_string()))
    }
}
