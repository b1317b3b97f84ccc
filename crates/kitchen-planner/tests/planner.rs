use kitchen_core::{
    AgentId, Cell, Direction, Food, FoodKind, FoodStatus, KitchenView, Layout, ObjectKind,
};
use kitchen_exec::{Scene, SubTask, TaskOutcome};
use kitchen_planner::{
    Intent, IntentError, IntentVerb, MidPlanner, PlanStep, PlannerConfig, RecipeId, RecipeIndex,
    Thing,
};
use kitchen_sim::{builtin, Kitchen, SimConfig};
use serde_json::{json, Map, Value};

const A0: AgentId = AgentId(0);

fn scenario(name: &str) -> Kitchen {
    builtin(name).expect("builtin scenario").build()
}

fn planner(seed: u64) -> MidPlanner {
    MidPlanner::new(A0, PlannerConfig::default(), seed)
}

fn kwargs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn expect_task(step: PlanStep) -> kitchen_exec::TaskOrder {
    match step {
        PlanStep::Task(order) => order,
        other => panic!("expected a sub-task, got {other:?}"),
    }
}

#[test]
fn kwargs_are_validated_against_the_verb() {
    let prepare = |v| Intent::from_kwargs("prepare", &kwargs(v));

    assert_eq!(
        prepare(json!({"food": "Beef"})),
        Ok(Intent::Prepare {
            food: FoodKind::Beef,
            plate: true
        })
    );
    assert_eq!(
        prepare(json!({"food": "Lettuce"})),
        Ok(Intent::Prepare {
            food: FoodKind::Lettuce,
            plate: false
        })
    );
    assert_eq!(
        prepare(json!({"food": "Bread", "plate": "true"})),
        Ok(Intent::Prepare {
            food: FoodKind::Bread,
            plate: true
        })
    );
    assert_eq!(
        prepare(json!({"food": "BeefBurger"})),
        Err(IntentError::InvalidKwargs)
    );
    assert_eq!(
        prepare(json!({"food": "Beef", "plate": true, "extra": 1})),
        Err(IntentError::TooManyArgs)
    );
    assert_eq!(prepare(json!({"meal": "Beef"})), Err(IntentError::InvalidKwargs));

    assert_eq!(
        Intent::from_kwargs("cook", &Map::new()),
        Err(IntentError::NoSuchAction)
    );
    assert_eq!(
        Intent::from_kwargs("putout_fire", &kwargs(json!({"now": true}))),
        Err(IntentError::TooManyArgs)
    );
    assert_eq!(
        Intent::from_kwargs("clean_a_counter", &Map::new()),
        Ok(Intent::CleanACounter { center: false })
    );
    assert_eq!(
        Intent::from_kwargs("serve", &kwargs(json!({"food": "BeefLettuce"}))),
        Err(IntentError::InvalidKwargs)
    );

    assert_eq!(IntentError::NoSuchAction.to_string(), "no such action");
    assert_eq!(IntentError::InvalidKwargs.to_string(), "invalid kwargs");
    assert_eq!(IntentError::TooManyArgs.to_string(), "too many args");
}

#[test]
fn pass_on_statuses_use_the_alias_table() {
    let pass = |v| Intent::from_kwargs("pass_on", &kwargs(v));

    assert_eq!(
        pass(json!({"thing": "Lettuce", "thing_status": "Chopped"})),
        Ok(Intent::PassOn {
            thing: Thing::Food(FoodKind::Lettuce),
            status: Some(FoodStatus::Done)
        })
    );
    assert_eq!(
        pass(json!({"thing": "Beef", "thing_status": "Well-cooked"})),
        Ok(Intent::PassOn {
            thing: Thing::Food(FoodKind::Beef),
            status: Some(FoodStatus::Done)
        })
    );
    assert_eq!(
        pass(json!({"thing": "Lettuce", "thing_status": "Unchopped"})),
        Ok(Intent::PassOn {
            thing: Thing::Food(FoodKind::Lettuce),
            status: Some(FoodStatus::Fresh)
        })
    );
    assert_eq!(
        pass(json!({"thing": "FireExtinguisher", "thing_status": ""})),
        Ok(Intent::PassOn {
            thing: Thing::FireExtinguisher,
            status: None
        })
    );
    assert_eq!(
        pass(json!({"thing": "Bread", "thing_status": "Chopped"})),
        Err(IntentError::InvalidKwargs)
    );
    assert_eq!(pass(json!({"thing": "Spoon"})), Err(IntentError::InvalidKwargs));

    let shown = Intent::PassOn {
        thing: Thing::Food(FoodKind::Lettuce),
        status: Some(FoodStatus::Done),
    };
    assert_eq!(shown.to_string(), "pass_on(thing=Lettuce, thing_status=Chopped)");
}

#[test]
fn every_variant_round_trips_through_serde() {
    let mut total = 0;
    for verb in IntentVerb::ALL {
        for intent in Intent::variants(verb) {
            assert_eq!(intent.verb(), verb);
            let value = serde_json::to_value(intent).expect("serialize");
            assert_eq!(value["verb"], verb.as_str());
            let back: Intent = serde_json::from_value(value).expect("deserialize");
            assert_eq!(back, intent);
            total += 1;
        }
    }
    assert_eq!(total, 6 + 4 + 3 + 13 + 1 + 2);
}

#[test]
fn nearby_loose_lettuce_beats_the_station() {
    let kitchen = scenario("partial_divider_salad");
    let mut planner = planner(1);
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: true,
    };

    let order = expect_task(planner.step(&kitchen, &intent, None));
    assert_eq!(
        order.task,
        SubTask::Pickup {
            food: FoodKind::Lettuce,
            status: Some(FoodStatus::Fresh)
        }
    );
    assert_eq!(planner.trajectory().len(), 1);
    assert_eq!(planner.trace().with_tag("planner.select").count(), 1);
}

#[test]
fn assembling_a_burger_backtracks_over_recipes() {
    let kitchen = scenario("burger_backtrack");
    let mut planner = planner(3);
    let intent = Intent::Assemble {
        food: FoodKind::BeefLettuceBurger,
    };

    let order = expect_task(planner.step(&kitchen, &intent, None));
    assert!(
        matches!(
            order.task,
            SubTask::Pickup {
                food: FoodKind::Lettuce | FoodKind::Beef,
                status: Some(FoodStatus::Done)
            }
        ),
        "unexpected first sub-task {}",
        order.task
    );

    let popped: Vec<_> = planner
        .trace()
        .with_tag("planner.recipe.pop")
        .map(|e| e.detail.clone())
        .collect();
    assert_eq!(popped, vec![RecipeId::BeefLettuceThenBread.to_string()]);
    assert!(matches!(
        planner.recipe_stack(),
        [RecipeId::LettuceOntoBeef] | [RecipeId::BeefOntoLettuce]
    ));
}

#[test]
fn burger_continuations_need_the_burger_half() {
    let index = RecipeIndex::new();
    let open = |kitchen: &Kitchen| -> Vec<RecipeId> {
        let scene = Scene::new(kitchen, A0).expect("agent");
        index
            .continuations(FoodKind::BeefLettuceBurger, &[])
            .iter()
            .filter(|c| c.available.eval(&scene))
            .map(|c| c.recipe)
            .collect()
    };

    let mut kitchen = scenario("burger_backtrack");
    let before = open(&kitchen);
    assert!(before.contains(&RecipeId::BeefWithBread));
    assert!(!before.contains(&RecipeId::BeefBurgerThenLettuce));
    assert!(!before.contains(&RecipeId::LettuceBurgerThenBeef));

    let burger = Food::new(FoodKind::BeefBurger, FoodStatus::Neutral);
    kitchen.spawn(
        ObjectKind::Plate {
            content: Some(burger),
        },
        Cell::new(4, 3),
    );
    let after = open(&kitchen);
    assert!(after.contains(&RecipeId::BeefBurgerThenLettuce));
    assert!(!after.contains(&RecipeId::LettuceBurgerThenBeef));
}

#[test]
fn putout_fire_needs_a_fire() {
    let kitchen = scenario("partial_divider_salad");
    let mut planner = planner(1);
    assert_eq!(
        planner.step(&kitchen, &Intent::PutoutFire, None),
        PlanStep::Fail("no fire".into())
    );
    assert!(planner.intent().is_none(), "failed intents are forgotten");

    let kitchen = scenario("fire_drill");
    let order = expect_task(planner.step(&kitchen, &Intent::PutoutFire, None));
    assert_eq!(order.task, SubTask::PickupFireExtinguisher);
}

#[test]
fn serve_without_a_burger_fails() {
    let kitchen = scenario("partial_divider_salad");
    let mut planner = planner(1);
    let intent = Intent::Serve {
        food: FoodKind::BeefBurger,
    };
    assert_eq!(
        planner.step(&kitchen, &intent, None),
        PlanStep::Fail("no such thing".into())
    );
}

#[test]
fn clean_a_counter_designates_the_burnt_beef() {
    let kitchen = scenario("clean_center");
    let burnt = kitchen
        .objects()
        .iter()
        .find(|o| {
            o.loose_food()
                .is_some_and(|f| f.status == FoodStatus::Overcooked)
        })
        .map(|o| o.id)
        .expect("overcooked beef");

    let mut planner = planner(1);
    let order = expect_task(planner.step(
        &kitchen,
        &Intent::CleanACounter { center: true },
        None,
    ));
    assert_eq!(
        order.task,
        SubTask::Pickup {
            food: FoodKind::Beef,
            status: Some(FoodStatus::Overcooked)
        }
    );
    assert_eq!(order.target, Some(burnt));

    let empty = scenario("walled_station");
    assert_eq!(
        planner.step(&empty, &Intent::CleanACounter { center: false }, None),
        PlanStep::Fail("no such thing".into())
    );
}

#[test]
fn pass_on_without_a_free_center_counter_reports_it() {
    let layout = Layout::parse(&["-=-L-", "-...-", "-----"]).expect("layout");
    let mut kitchen = Kitchen::new(layout, SimConfig::default());
    let me = kitchen.add_agent(Cell::new(1, 1), Direction::Up);
    kitchen.spawn(ObjectKind::Plate { content: None }, Cell::new(1, 0));
    kitchen.spawn_held(ObjectKind::Food(Food::fresh(FoodKind::Lettuce)), me);

    let mut planner = MidPlanner::new(me, PlannerConfig::default(), 5);
    let intent = Intent::PassOn {
        thing: Thing::Food(FoodKind::Lettuce),
        status: Some(FoodStatus::Fresh),
    };
    assert_eq!(
        planner.step(&kitchen, &intent, None),
        PlanStep::Fail("no idle counter".into())
    );
    assert!(planner.trace().with_tag("planner.backtrack").count() >= 1);
}

#[test]
fn introspection_does_not_touch_the_live_plan() {
    let kitchen = scenario("partial_divider_salad");
    let mut planner = planner(9);
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: true,
    };
    expect_task(planner.step(&kitchen, &intent, None));
    let trajectory = planner.trajectory().to_vec();
    let traced = planner.trace().len();

    let first = planner.get_valid_mid_actions(&kitchen);
    let second = planner.get_valid_mid_actions(&kitchen);
    assert_eq!(first, second);
    assert_eq!(planner.trajectory(), trajectory.as_slice());
    assert_eq!(planner.intent(), Some(intent));
    assert_eq!(planner.trace().len(), traced);

    assert_eq!(first.len(), IntentVerb::ALL.len());
    assert!(first[&IntentVerb::PutoutFire].is_empty());
    assert!(first[&IntentVerb::Serve].is_empty());
    assert!(first[&IntentVerb::Prepare].contains(&intent));

    let fire = scenario("fire_drill");
    let valid = planner.get_valid_mid_actions(&fire);
    assert_eq!(valid[&IntentVerb::PutoutFire], vec![Intent::PutoutFire]);
}

#[test]
fn repeated_sub_task_failures_run_out_of_tries() {
    let kitchen = scenario("partial_divider_salad");
    let mut planner = MidPlanner::new(A0, PlannerConfig { max_n_try: 1 }, 9);
    let intent = Intent::Prepare {
        food: FoodKind::Lettuce,
        plate: true,
    };

    expect_task(planner.step(&kitchen, &intent, None));
    expect_task(planner.step(&kitchen, &intent, Some(TaskOutcome::Failure)));
    assert_eq!(
        planner.step(&kitchen, &intent, Some(TaskOutcome::Failure)),
        PlanStep::Fail("too many tries".to_string())
    );
    assert!(planner.trace().with_tag("planner.backtrack").count() >= 2);
}
