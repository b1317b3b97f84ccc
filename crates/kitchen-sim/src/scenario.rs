use std::path::Path;

use kitchen_core::{
    Cell, Direction, Food, FoodKind, FoodStatus, Layout, LayoutError, ObjectKind, UnknownFood,
    UnknownStatus,
};
use serde::Deserialize;
use thiserror::Error;

use crate::{Kitchen, SimConfig};

/// Names accepted by [`builtin`].
pub const BUILTIN_SCENARIOS: [&str; 6] = [
    "partial_divider_salad",
    "fire_drill",
    "burger_backtrack",
    "pass_lettuce",
    "clean_center",
    "walled_station",
];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    UnknownFood(#[from] UnknownFood),
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),
    #[error("unknown object kind: {0}")]
    UnknownKind(String),
    #[error("unknown facing: {0}")]
    UnknownFacing(String),
    #[error("cannot place {what} at ({x}, {y})")]
    BadPlacement { what: String, x: i32, y: i32 },
    #[error("no built-in scenario named {0:?}")]
    UnknownLayout(String),
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    kind: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    content: Option<Box<RawItem>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawObject {
    #[serde(flatten)]
    item: RawItem,
    at: [i32; 2],
}

#[derive(Debug, Clone, Deserialize)]
struct RawAgent {
    at: [i32; 2],
    #[serde(default = "default_facing")]
    facing: String,
    #[serde(default)]
    holding: Option<RawItem>,
}

fn default_facing() -> String {
    "U".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct RawScenario {
    #[serde(default)]
    name: Option<String>,
    grid: Vec<String>,
    #[serde(default)]
    objects: Vec<RawObject>,
    #[serde(default)]
    agents: Vec<RawAgent>,
    #[serde(default)]
    sim: Option<SimConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioAgent {
    pub at: Cell,
    pub facing: Direction,
    pub holding: Option<ObjectKind>,
}

/// A validated starting state: layout, loose objects, and agents in id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub layout: Layout,
    pub objects: Vec<(ObjectKind, Cell)>,
    pub agents: Vec<ScenarioAgent>,
    pub sim: SimConfig,
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Scenario, ScenarioError> {
        let raw: RawScenario = serde_yaml::from_str(text)?;
        let layout = Layout::parse(&raw.grid)?;

        let mut objects = Vec::with_capacity(raw.objects.len());
        for obj in &raw.objects {
            let kind = parse_item(&obj.item)?;
            let cell = Cell::new(obj.at[0], obj.at[1]);
            let holds = layout.tile(cell).is_some_and(|t| t.holds_objects());
            if !holds {
                return Err(ScenarioError::BadPlacement {
                    what: obj.item.kind.clone(),
                    x: cell.x,
                    y: cell.y,
                });
            }
            objects.push((kind, cell));
        }

        let mut agents: Vec<ScenarioAgent> = Vec::with_capacity(raw.agents.len());
        for agent in &raw.agents {
            let at = Cell::new(agent.at[0], agent.at[1]);
            if !layout.is_walkable(at) || agents.iter().any(|a| a.at == at) {
                return Err(ScenarioError::BadPlacement {
                    what: "agent".to_string(),
                    x: at.x,
                    y: at.y,
                });
            }
            let facing = agent
                .facing
                .trim()
                .chars()
                .next()
                .and_then(Direction::from_glyph)
                .ok_or_else(|| ScenarioError::UnknownFacing(agent.facing.clone()))?;
            let holding = agent.holding.as_ref().map(parse_item).transpose()?;
            agents.push(ScenarioAgent {
                at,
                facing,
                holding,
            });
        }

        Ok(Scenario {
            name: raw.name.unwrap_or_else(|| "custom".to_string()),
            layout,
            objects,
            agents,
            sim: raw.sim.unwrap_or_default(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Scenario::from_yaml(&text)
    }

    pub fn build(&self) -> Kitchen {
        self.build_with(self.sim)
    }

    /// Instantiate the scenario. Timers of pre-cooked or pre-chopped food are set to the
    /// tick at which that status is reached, so the world evolves consistently from there.
    pub fn build_with(&self, config: SimConfig) -> Kitchen {
        let mut kitchen = Kitchen::new(self.layout.clone(), config);
        for (kind, cell) in &self.objects {
            kitchen.spawn(settle(kind.clone(), &config), *cell);
        }
        for agent in &self.agents {
            let id = kitchen.add_agent(agent.at, agent.facing);
            if let Some(kind) = &agent.holding {
                kitchen.spawn_held(settle(kind.clone(), &config), id);
            }
        }
        kitchen
    }
}

/// Load one of the embedded scenarios by name.
pub fn builtin(name: &str) -> Result<Scenario, ScenarioError> {
    let text = match name {
        "partial_divider_salad" => include_str!("../layouts/partial_divider_salad.yaml"),
        "fire_drill" => include_str!("../layouts/fire_drill.yaml"),
        "burger_backtrack" => include_str!("../layouts/burger_backtrack.yaml"),
        "pass_lettuce" => include_str!("../layouts/pass_lettuce.yaml"),
        "clean_center" => include_str!("../layouts/clean_center.yaml"),
        "walled_station" => include_str!("../layouts/walled_station.yaml"),
        other => return Err(ScenarioError::UnknownLayout(other.to_string())),
    };
    Scenario::from_yaml(text)
}

fn parse_item(item: &RawItem) -> Result<ObjectKind, ScenarioError> {
    let kind = match item.kind.trim().to_ascii_lowercase().as_str() {
        "plate" => {
            let content = item.content.as_deref().map(parse_food).transpose()?;
            ObjectKind::Plate { content }
        }
        "fireextinguisher" | "extinguisher" => ObjectKind::FireExtinguisher,
        "fire" => ObjectKind::Fire { put_num: 0 },
        _ => ObjectKind::Food(parse_food(item)?),
    };
    Ok(kind)
}

fn parse_food(item: &RawItem) -> Result<Food, ScenarioError> {
    if item.content.is_some() {
        return Err(ScenarioError::UnknownKind(format!(
            "{} cannot hold content",
            item.kind
        )));
    }
    let kind: FoodKind = item.kind.parse()?;
    let status = match &item.status {
        Some(s) => FoodStatus::parse(s)?,
        None => kind.initial_status(),
    };
    Ok(Food::new(kind, status))
}

fn settle(kind: ObjectKind, config: &SimConfig) -> ObjectKind {
    let settle_food = |mut food: Food| {
        food.progress = match (food.kind, food.status) {
            (FoodKind::Lettuce, FoodStatus::Done) => config.chop_steps,
            (FoodKind::Beef, FoodStatus::InProgress) => 1,
            (FoodKind::Beef, FoodStatus::Done) => config.cook_done,
            (FoodKind::Beef, FoodStatus::Overcooked) => config.cook_fire,
            _ => 0,
        };
        food
    };
    match kind {
        ObjectKind::Food(food) => ObjectKind::Food(settle_food(food)),
        ObjectKind::Plate { content } => ObjectKind::Plate {
            content: content.map(settle_food),
        },
        other => other,
    }
}
