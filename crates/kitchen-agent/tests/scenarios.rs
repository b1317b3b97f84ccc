use kitchen_core::{
    AgentId, Cell, DeterministicRng, Direction, FoodKind, FoodStatus, KitchenView, ObjectKind,
    PrimitiveAction, SplitMix64, WorldObject,
};
use kitchen_agent::{
    config, AgentConfig, ConfigError, KitchenConfig, MidAgent, MidOutcome, MidStatus,
};
use kitchen_planner::{Intent, IntentVerb, Thing};
use kitchen_sim::{builtin, Kitchen, Scenario, SimConfig};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const A0: AgentId = AgentId(0);

fn scenario(name: &str) -> Kitchen {
    builtin(name).expect("builtin scenario").build()
}

fn agent(seed: u64) -> MidAgent {
    let config = KitchenConfig {
        seed,
        ..KitchenConfig::default()
    };
    MidAgent::new(A0, &config)
}

/// Everything the controlled agent emitted for one intent, plus how it ended.
struct Run {
    actions: Vec<PrimitiveAction>,
    last: MidOutcome,
}

/// Drive `intent` until it ends; every other agent idles.
fn run(kitchen: &mut Kitchen, agent: &mut MidAgent, intent: &Intent, max_ticks: usize) -> Run {
    let mut actions = Vec::new();
    for _ in 0..max_ticks {
        let outcome = agent.act(&*kitchen, intent);
        if outcome.end {
            return Run {
                actions,
                last: outcome,
            };
        }
        actions.push(outcome.action);
        kitchen.step(&[(A0, outcome.action)]);
    }
    panic!("{intent} did not end within {max_ticks} ticks");
}

fn kwargs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn plated(kitchen: &Kitchen, kind: FoodKind, status: FoodStatus) -> Vec<&WorldObject> {
    kitchen
        .objects()
        .iter()
        .filter(|o| match &o.kind {
            ObjectKind::Plate { content: Some(food) } => food.matches(kind, Some(status)),
            _ => false,
        })
        .collect()
}

#[test]
fn prepare_chopped_lettuce_on_a_plate() {
    let mut kitchen = scenario("partial_divider_salad");
    let mut agent = agent(11);
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: true,
    };

    let run = run(&mut kitchen, &mut agent, &intent, 60);
    assert_eq!(run.last.status, MidStatus::Succeeded);
    assert_eq!(run.last.action, PrimitiveAction::Noop);
    assert_eq!(plated(&kitchen, FoodKind::Lettuce, FoodStatus::Done).len(), 1);
}

#[test]
fn putout_fire_takes_five_sprays() {
    let mut kitchen = scenario("fire_drill");
    let mut agent = agent(2);

    let run = run(&mut kitchen, &mut agent, &Intent::PutoutFire, 80);
    assert_eq!(run.last.status, MidStatus::Succeeded);
    assert!(kitchen.fires().is_empty());

    let interacts = run
        .actions
        .iter()
        .filter(|a| **a == PrimitiveAction::Interact)
        .count();
    assert_eq!(interacts, 1 + 5, "one pickup, then five sprays");
    assert!(kitchen
        .held_by(A0)
        .is_some_and(|o| matches!(o.kind, ObjectKind::FireExtinguisher)));
}

#[test]
fn assemble_falls_back_to_mixing_first() {
    let mut kitchen = scenario("burger_backtrack");
    let mut agent = agent(3);
    let intent = Intent::Assemble {
        food: FoodKind::BeefLettuceBurger,
    };

    let run = run(&mut kitchen, &mut agent, &intent, 200);
    assert_eq!(run.last.status, MidStatus::Succeeded);
    assert_eq!(
        plated(&kitchen, FoodKind::BeefLettuceBurger, FoodStatus::Neutral).len(),
        1
    );
    assert!(agent.planner().trace().with_tag("planner.recipe.pop").count() >= 1);
}

#[test]
fn pass_chopped_lettuce_across_the_center() {
    let mut kitchen = scenario("pass_lettuce");
    let mut agent = agent(4);
    let outcome = agent.get_action(
        &kitchen,
        "pass_on",
        &kwargs(json!({"thing": "Lettuce", "thing_status": "Chopped"})),
    );
    assert!(!outcome.end, "first tick should start working: {}", outcome.status);
    kitchen.step(&[(A0, outcome.action)]);

    let intent = Intent::PassOn {
        thing: Thing::Food(FoodKind::Lettuce),
        status: Some(FoodStatus::Done),
    };
    let run = run(&mut kitchen, &mut agent, &intent, 120);
    assert_eq!(run.last.status, MidStatus::Succeeded);

    let on_center: Vec<_> = plated(&kitchen, FoodKind::Lettuce, FoodStatus::Done)
        .into_iter()
        .filter(|o| {
            o.cell()
                .and_then(|c| kitchen.tile(c))
                .is_some_and(|t| t.is_center_counter())
        })
        .collect();
    assert_eq!(on_center.len(), 1);
}

#[test]
fn clean_the_center_counter() {
    let mut kitchen = scenario("clean_center");
    let center = kitchen
        .objects()
        .iter()
        .find_map(|o| o.cell())
        .expect("burnt beef on the counter");
    let mut agent = agent(5);

    let run = run(
        &mut kitchen,
        &mut agent,
        &Intent::CleanACounter { center: true },
        80,
    );
    assert_eq!(run.last.status, MidStatus::Succeeded);
    assert!(kitchen.objects_at(center).is_empty());
    assert!(kitchen.held_by(A0).is_none());
}

/// clean_center with a partner right of the burnt beef who grabs it on the first tick.
fn partner_grabs_the_beef() -> (Kitchen, AgentId, Cell) {
    let mut kitchen = scenario("clean_center");
    let center = Cell::new(4, 3);
    let partner = kitchen.add_agent(Cell::new(5, 3), Direction::Left);
    assert_eq!(kitchen.objects_at(center).len(), 1);
    (kitchen, partner, center)
}

#[test]
fn clean_succeeds_when_the_partner_clears_the_counter_first() {
    let (mut kitchen, partner, center) = partner_grabs_the_beef();
    let mut agent = agent(5);
    let intent = Intent::CleanACounter { center: true };

    let first = agent.act(&kitchen, &intent);
    assert_eq!(first.status, MidStatus::Working);
    kitchen.step(&[(A0, first.action), (partner, PrimitiveAction::Interact)]);
    assert!(kitchen.objects_at(center).is_empty());

    let second = agent.act(&kitchen, &intent);
    assert!(second.end);
    assert_eq!(second.status, MidStatus::Succeeded);
    assert!(kitchen
        .held_by(partner)
        .is_some_and(|o| o.carries(FoodKind::Beef, Some(FoodStatus::Overcooked))));
    assert!(kitchen.held_by(A0).is_none());
}

#[test]
fn one_try_per_tick_gives_up_on_a_failed_sub_task() {
    let (mut kitchen, partner, _) = partner_grabs_the_beef();
    let config = KitchenConfig {
        seed: 5,
        agent: AgentConfig { n_max_try: 1 },
        ..KitchenConfig::default()
    };
    let mut agent = MidAgent::new(A0, &config);
    let intent = Intent::CleanACounter { center: true };

    let first = agent.act(&kitchen, &intent);
    assert_eq!(first.status, MidStatus::Working);
    kitchen.step(&[(A0, first.action), (partner, PrimitiveAction::Interact)]);

    let second = agent.act(&kitchen, &intent);
    assert!(second.end);
    assert_eq!(second.status.to_string(), "Failed, too many tries");
    assert_eq!(second.action, PrimitiveAction::Noop);
    assert!(agent.intent().is_none());
}

#[test]
fn unreachable_lettuce_fails_without_moving() {
    let mut kitchen = scenario("walled_station");
    let mut agent = agent(6);
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: false,
    };

    let run = run(&mut kitchen, &mut agent, &intent, 10);
    assert!(run.last.status.to_string().starts_with("Failed"));
    assert!(run.actions.iter().all(|a| *a == PrimitiveAction::Noop));
    assert_eq!(run.last.action, PrimitiveAction::Noop);
}

#[test]
fn bad_kwargs_end_immediately() {
    let kitchen = scenario("partial_divider_salad");
    let mut agent = agent(1);

    let outcome = agent.get_action(&kitchen, "juggle", &Map::new());
    assert!(outcome.end);
    assert_eq!(outcome.status.to_string(), "Failed, no such action");

    let outcome = agent.get_action(&kitchen, "prepare", &kwargs(json!({"food": "Fish"})));
    assert_eq!(outcome.status.to_string(), "Failed, invalid kwargs");
    assert!(agent.intent().is_none());
}

#[test]
fn serve_a_ready_burger() {
    let yaml = r#"
name: burger_on_the_pass
grid:
  - "-/-L-B-R-"
  - "-.......-"
  - "O.......-"
  - "P...=...*"
  - "D.......-"
  - "---------"
objects:
  - { kind: plate, content: { kind: BeefBurger }, at: [4, 3] }
agents:
  - { at: [2, 2], facing: U }
"#;
    let mut kitchen = Scenario::from_yaml(yaml).expect("scenario").build();
    let mut agent = agent(8);
    let intent = Intent::Serve {
        food: FoodKind::BeefBurger,
    };

    let run = run(&mut kitchen, &mut agent, &intent, 40);
    assert_eq!(run.last.status, MidStatus::Succeeded);
    let delivered: Vec<_> = kitchen.deliver_log().iter().map(|d| d.food).collect();
    assert_eq!(delivered, vec![FoodKind::BeefBurger]);
}

/// Checks the per-tick contract while a partner wanders around at random.
#[test]
fn every_tick_keeps_the_contract() {
    let mut kitchen = scenario("partial_divider_salad");
    let partner = AgentId(1);
    let mut walk = SplitMix64::new(99);
    let mut agent = agent(12);
    let intents = [
        Intent::Prepare {
            food: FoodKind::Lettuce,
            plate: true,
        },
        Intent::Prepare {
            food: FoodKind::Bread,
            plate: true,
        },
        Intent::CleanACounter { center: false },
    ];

    let mut which = 0;
    let mut previous_task = None;
    for _ in 0..240 {
        let intent = intents[which % intents.len()];
        let valid_before = agent.get_valid_actions(&kitchen);
        let held_before = kitchen.held_by(A0).map(|o| o.id);

        let outcome = agent.act(&kitchen, &intent);
        assert!(outcome.action.as_u8() <= 5);
        if outcome.end {
            let status = outcome.status.to_string();
            assert!(
                status.starts_with("Succeeded") || status.starts_with("Failed"),
                "{status}"
            );
            which += 1;
            previous_task = None;
        } else {
            assert_eq!(outcome.status.to_string(), "Working...");
            let task = agent.current_task().expect("working without a sub-task");
            if previous_task != Some(task) {
                assert!(
                    valid_before.contains(&task),
                    "{task} was started while invalid"
                );
            }
            previous_task = Some(task);
        }

        let stray = PrimitiveAction::ALL[walk.choose_index(PrimitiveAction::ALL.len())];
        kitchen.step(&[(A0, outcome.action), (partner, stray)]);

        let held_after = kitchen.held_by(A0).map(|o| o.id);
        if let (Some(before), Some(after)) = (held_before, held_after) {
            assert_eq!(before, after, "swapped hands in a single tick");
        }
    }
}

#[test]
fn introspection_leaves_the_agent_alone() {
    let mut kitchen = scenario("partial_divider_salad");
    let mut agent = agent(21);
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: true,
    };
    for _ in 0..4 {
        let outcome = agent.act(&kitchen, &intent);
        kitchen.step(&[(A0, outcome.action)]);
    }
    let task = agent.current_task();
    let trajectory = agent.planner().trajectory().to_vec();
    let recipes = agent.planner().recipe_stack().to_vec();

    let first = agent.get_valid_mid_actions(&kitchen);
    let second = agent.get_valid_mid_actions(&kitchen);
    assert_eq!(first, second);
    assert_eq!(agent.current_task(), task);
    assert_eq!(agent.planner().trajectory(), trajectory.as_slice());
    assert_eq!(agent.planner().recipe_stack(), recipes.as_slice());
    assert_eq!(agent.intent(), Some(intent));
    assert!(first[&IntentVerb::Prepare].contains(&intent));
}

#[test]
fn same_seed_same_actions() {
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: true,
    };
    let trace = |seed| {
        let mut kitchen = scenario("partial_divider_salad");
        let mut agent = agent(seed);
        run(&mut kitchen, &mut agent, &intent, 60).actions
    };
    assert_eq!(trace(31), trace(31));
}

#[test]
fn config_yaml_fills_in_defaults() {
    let config = KitchenConfig::from_yaml(
        r#"
seed: 42
planner:
  max_n_try: 3
sim:
  chop_steps: 2
"#,
    )
    .expect("keys the agent does not own are ignored");
    assert_eq!(config.seed, 42);
    assert_eq!(config.planner.max_n_try, 3);
    assert_eq!(config.agent.n_max_try, 5);
    assert_eq!(config.executor, KitchenConfig::default().executor);

    let missing = std::env::temp_dir().join("kitchen-config-that-does-not-exist");
    assert_eq!(
        KitchenConfig::load_from_project(&missing).expect("defaults"),
        KitchenConfig::default()
    );
}

/// A front end's view of the same file: the agent's settings plus simulator timers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontEndConfig {
    #[serde(flatten)]
    kitchen: KitchenConfig,
    sim: SimConfig,
}

#[test]
fn project_config_feeds_agent_and_simulator_separately() {
    let root = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(root.path().join(".kitchen")).expect("config dir");
    std::fs::write(
        root.path().join(config::PROJECT_CONFIG),
        "seed: 7\nagent:\n  n_max_try: 2\nsim:\n  chop_steps: 1\n",
    )
    .expect("write config");

    let agent = KitchenConfig::load_from_project(root.path()).expect("agent config");
    assert_eq!(agent.seed, 7);
    assert_eq!(agent.agent.n_max_try, 2);

    let both: FrontEndConfig = config::load_from_project(root.path()).expect("front end config");
    assert_eq!(both.kitchen, agent);
    assert_eq!(both.sim.chop_steps, 1);
    assert_eq!(both.sim.cook_done, SimConfig::default().cook_done);

    let broken = root.path().join("broken.yaml");
    std::fs::write(&broken, "seed: [not a number").expect("write config");
    assert!(matches!(
        config::load_yaml::<KitchenConfig>(&broken),
        Err(ConfigError::Yaml { .. })
    ));
}

#[test]
fn status_lines_read_naturally() {
    assert_eq!(MidStatus::Working.to_string(), "Working...");
    assert_eq!(MidStatus::Succeeded.to_string(), "Succeeded");
    assert_eq!(
        MidStatus::Failed("no fire".into()).to_string(),
        "Failed, no fire"
    );
    assert!(!MidStatus::Working.is_end());
    assert!(MidStatus::Failed(String::new()).is_end());
}
