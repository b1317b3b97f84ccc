use core::fmt;
use core::str::FromStr;

use kitchen_core::{FoodKind, FoodStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Something that can be handed over a center counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Thing {
    Food(FoodKind),
    Plate,
    FireExtinguisher,
}

impl Thing {
    pub fn food(self) -> Option<FoodKind> {
        match self {
            Thing::Food(food) => Some(food),
            _ => None,
        }
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thing::Food(food) => write!(f, "{food}"),
            Thing::Plate => f.write_str("Plate"),
            Thing::FireExtinguisher => f.write_str("FireExtinguisher"),
        }
    }
}

impl FromStr for Thing {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Plate" => Ok(Thing::Plate),
            "FireExtinguisher" => Ok(Thing::FireExtinguisher),
            other => other
                .parse::<FoodKind>()
                .map(Thing::Food)
                .map_err(|_| IntentError::InvalidKwargs),
        }
    }
}

/// A mid-level intent with validated arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum Intent {
    Prepare {
        food: FoodKind,
        plate: bool,
    },
    Assemble {
        food: FoodKind,
    },
    Serve {
        food: FoodKind,
    },
    PassOn {
        thing: Thing,
        #[serde(default)]
        status: Option<FoodStatus>,
    },
    PutoutFire,
    CleanACounter {
        center: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentVerb {
    Prepare,
    Assemble,
    Serve,
    PassOn,
    PutoutFire,
    CleanACounter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("no such action")]
    NoSuchAction,
    #[error("invalid kwargs")]
    InvalidKwargs,
    #[error("too many args")]
    TooManyArgs,
}

const PREPARABLE: [FoodKind; 3] = FoodKind::BASE;

const ASSEMBLABLE: [FoodKind; 4] = [
    FoodKind::LettuceBurger,
    FoodKind::BeefBurger,
    FoodKind::BeefLettuce,
    FoodKind::BeefLettuceBurger,
];

const SERVABLE: [FoodKind; 3] = [
    FoodKind::BeefBurger,
    FoodKind::LettuceBurger,
    FoodKind::BeefLettuceBurger,
];

impl IntentVerb {
    pub const ALL: [IntentVerb; 6] = [
        IntentVerb::Prepare,
        IntentVerb::Assemble,
        IntentVerb::Serve,
        IntentVerb::PassOn,
        IntentVerb::PutoutFire,
        IntentVerb::CleanACounter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IntentVerb::Prepare => "prepare",
            IntentVerb::Assemble => "assemble",
            IntentVerb::Serve => "serve",
            IntentVerb::PassOn => "pass_on",
            IntentVerb::PutoutFire => "putout_fire",
            IntentVerb::CleanACounter => "clean_a_counter",
        }
    }

    /// Keyword arguments the verb accepts.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            IntentVerb::Prepare => &["food", "plate"],
            IntentVerb::Assemble | IntentVerb::Serve => &["food"],
            IntentVerb::PassOn => &["thing", "thing_status"],
            IntentVerb::PutoutFire => &[],
            IntentVerb::CleanACounter => &["center"],
        }
    }
}

impl fmt::Display for IntentVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentVerb {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentVerb::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or(IntentError::NoSuchAction)
    }
}

fn food_arg(value: Option<&Value>, allowed: &[FoodKind]) -> Result<FoodKind, IntentError> {
    let food = value
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<FoodKind>().ok())
        .ok_or(IntentError::InvalidKwargs)?;
    if allowed.contains(&food) {
        Ok(food)
    } else {
        Err(IntentError::InvalidKwargs)
    }
}

fn bool_arg(value: Option<&Value>, default: bool) -> Result<bool, IntentError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(_) => Err(IntentError::InvalidKwargs),
    }
}

/// Statuses a passed thing may be asked for: only lettuce and beef have a meaningful one.
fn status_arg(thing: Thing, value: Option<&Value>) -> Result<Option<FoodStatus>, IntentError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(IntentError::InvalidKwargs),
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let status = FoodStatus::parse(raw).map_err(|_| IntentError::InvalidKwargs)?;
    match (thing, status) {
        (Thing::Food(FoodKind::Lettuce | FoodKind::Beef), FoodStatus::Fresh | FoodStatus::Done) => {
            Ok(Some(status))
        }
        _ => Err(IntentError::InvalidKwargs),
    }
}

impl Intent {
    pub fn verb(&self) -> IntentVerb {
        match self {
            Intent::Prepare { .. } => IntentVerb::Prepare,
            Intent::Assemble { .. } => IntentVerb::Assemble,
            Intent::Serve { .. } => IntentVerb::Serve,
            Intent::PassOn { .. } => IntentVerb::PassOn,
            Intent::PutoutFire => IntentVerb::PutoutFire,
            Intent::CleanACounter { .. } => IntentVerb::CleanACounter,
        }
    }

    /// Validate a verb plus keyword arguments from the string surface.
    pub fn from_kwargs(verb: &str, kwargs: &Map<String, Value>) -> Result<Intent, IntentError> {
        let verb: IntentVerb = verb.parse()?;
        let params = verb.params();
        if kwargs.len() > params.len() {
            return Err(IntentError::TooManyArgs);
        }
        if kwargs.keys().any(|k| !params.contains(&k.as_str())) {
            return Err(IntentError::InvalidKwargs);
        }

        let intent = match verb {
            IntentVerb::Prepare => {
                let food = food_arg(kwargs.get("food"), &PREPARABLE)?;
                let plate = bool_arg(kwargs.get("plate"), food == FoodKind::Beef)?;
                Intent::Prepare { food, plate }
            }
            IntentVerb::Assemble => Intent::Assemble {
                food: food_arg(kwargs.get("food"), &ASSEMBLABLE)?,
            },
            IntentVerb::Serve => Intent::Serve {
                food: food_arg(kwargs.get("food"), &SERVABLE)?,
            },
            IntentVerb::PassOn => {
                let thing: Thing = kwargs
                    .get("thing")
                    .and_then(Value::as_str)
                    .ok_or(IntentError::InvalidKwargs)?
                    .parse()?;
                let status = status_arg(thing, kwargs.get("thing_status"))?;
                Intent::PassOn { thing, status }
            }
            IntentVerb::PutoutFire => Intent::PutoutFire,
            IntentVerb::CleanACounter => Intent::CleanACounter {
                center: bool_arg(kwargs.get("center"), false)?,
            },
        };
        Ok(intent)
    }

    /// Every argument combination the verb accepts, in a stable order.
    pub fn variants(verb: IntentVerb) -> Vec<Intent> {
        match verb {
            IntentVerb::Prepare => PREPARABLE
                .into_iter()
                .flat_map(|food| [true, false].map(|plate| Intent::Prepare { food, plate }))
                .collect(),
            IntentVerb::Assemble => ASSEMBLABLE
                .into_iter()
                .map(|food| Intent::Assemble { food })
                .collect(),
            IntentVerb::Serve => SERVABLE
                .into_iter()
                .map(|food| Intent::Serve { food })
                .collect(),
            IntentVerb::PassOn => {
                let mut out = vec![
                    Intent::PassOn {
                        thing: Thing::Plate,
                        status: None,
                    },
                    Intent::PassOn {
                        thing: Thing::FireExtinguisher,
                        status: None,
                    },
                ];
                for food in FoodKind::ALL {
                    let thing = Thing::Food(food);
                    out.push(Intent::PassOn { thing, status: None });
                    if matches!(food, FoodKind::Lettuce | FoodKind::Beef) {
                        for status in [FoodStatus::Fresh, FoodStatus::Done] {
                            out.push(Intent::PassOn {
                                thing,
                                status: Some(status),
                            });
                        }
                    }
                }
                out
            }
            IntentVerb::PutoutFire => vec![Intent::PutoutFire],
            IntentVerb::CleanACounter => [false, true]
                .map(|center| Intent::CleanACounter { center })
                .to_vec(),
        }
    }

    /// Whether satisfying the intent goes through the recipe stack.
    pub fn is_compound(&self) -> bool {
        matches!(self, Intent::Assemble { .. })
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Intent::Prepare { food, plate } => write!(f, "prepare(food={food}, plate={plate})"),
            Intent::Assemble { food } => write!(f, "assemble(food={food})"),
            Intent::Serve { food } => write!(f, "serve(food={food})"),
            Intent::PassOn { thing, status } => match (thing.food(), status) {
                (Some(food), Some(status)) => write!(
                    f,
                    "pass_on(thing={thing}, thing_status={})",
                    status.alias_for(food)
                ),
                _ => write!(f, "pass_on(thing={thing})"),
            },
            Intent::PutoutFire => f.write_str("putout_fire()"),
            Intent::CleanACounter { center } => write!(f, "clean_a_counter(center={center})"),
        }
    }
}
