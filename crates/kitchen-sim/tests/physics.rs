use kitchen_core::{
    AgentId, Cell, Direction, Food, FoodKind, FoodStatus, KitchenView, Layout, ObjectKind,
    PrimitiveAction,
};
use kitchen_sim::{builtin, Kitchen, Player, Scenario, ScenarioError, SimConfig, BUILTIN_SCENARIOS};

const A0: AgentId = AgentId(0);

fn kitchen(rows: &[&str]) -> Kitchen {
    Kitchen::new(Layout::parse(rows).expect("layout"), SimConfig::default())
}

fn act(kitchen: &mut Kitchen, action: PrimitiveAction) {
    kitchen.step(&[(A0, action)]);
}

fn held(kitchen: &Kitchen) -> Option<ObjectKind> {
    kitchen.held_by(A0).map(|o| o.kind.clone())
}

#[test]
fn every_builtin_scenario_loads() {
    for name in BUILTIN_SCENARIOS {
        let scenario = builtin(name).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(scenario.name, name);
        assert!(!scenario.agents.is_empty(), "{name} has no agents");
        let kitchen = scenario.build();
        assert_eq!(kitchen.agents().len(), scenario.agents.len());
    }
    assert!(matches!(
        builtin("no_such_kitchen"),
        Err(ScenarioError::UnknownLayout(_))
    ));
}

#[test]
fn scenario_rejects_objects_on_floor() {
    let yaml = r#"
grid:
  - "---"
  - "-.-"
  - "---"
objects:
  - { kind: plate, at: [1, 1] }
"#;
    assert!(matches!(
        Scenario::from_yaml(yaml),
        Err(ScenarioError::BadPlacement { x: 1, y: 1, .. })
    ));
}

#[test]
fn moving_turns_and_steps_but_never_onto_counters() {
    let mut k = kitchen(&["-----", "-...-", "-----"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);

    act(&mut k, PrimitiveAction::Right);
    assert_eq!(k.agents()[0].location, Cell::new(2, 1));
    assert_eq!(k.agents()[0].orientation, Direction::Right);

    act(&mut k, PrimitiveAction::Up);
    assert_eq!(k.agents()[0].location, Cell::new(2, 1), "counter is not walkable");
    assert_eq!(k.agents()[0].orientation, Direction::Up);
}

#[test]
fn agents_do_not_walk_through_each_other() {
    let mut k = kitchen(&["-----", "-...-", "-----"]);
    k.add_agent(Cell::new(1, 1), Direction::Right);
    let partner = k.add_agent(Cell::new(2, 1), Direction::Left);

    k.step(&[(A0, PrimitiveAction::Right), (partner, PrimitiveAction::Noop)]);
    assert_eq!(k.agents()[0].location, Cell::new(1, 1));
}

#[test]
fn stations_dispense_and_counters_hold_one_object() {
    let mut k = kitchen(&["-L-", "-.-", "-O-"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);

    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), Some(ObjectKind::Food(Food::fresh(FoodKind::Lettuce))));

    // A second interact on the station while holding does nothing.
    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(k.objects().len(), 1);

    // Put the lettuce on the left counter, then fetch a plate.
    act(&mut k, PrimitiveAction::Left);
    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), None);
    assert_eq!(k.objects_at(Cell::new(0, 1)).len(), 1);

    act(&mut k, PrimitiveAction::Down);
    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), Some(ObjectKind::Plate { content: None }));

    // Unchopped lettuce cannot be plated.
    act(&mut k, PrimitiveAction::Left);
    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), Some(ObjectKind::Plate { content: None }));
}

#[test]
fn chopping_takes_three_interactions() {
    let mut k = kitchen(&["-/-", "-.-", "---"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);
    k.spawn(
        ObjectKind::Food(Food::fresh(FoodKind::Lettuce)),
        Cell::new(1, 0),
    );

    for _ in 0..2 {
        act(&mut k, PrimitiveAction::Interact);
    }
    let lettuce = k.objects()[0].loose_food().copied().expect("lettuce");
    assert_eq!(lettuce.status, FoodStatus::Fresh);
    assert_eq!(lettuce.progress, 2);

    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(k.objects()[0].loose_food().map(|f| f.status), Some(FoodStatus::Done));
    assert_eq!(held(&k), None, "chopping never picks up");

    act(&mut k, PrimitiveAction::Interact);
    assert!(
        matches!(held(&k), Some(ObjectKind::Food(f)) if f.status == FoodStatus::Done),
        "chopped lettuce is picked up"
    );
}

#[test]
fn beef_cooks_overcooks_and_catches_fire() {
    let config = SimConfig::default();
    let mut k = kitchen(&["-P-", "-.-", "---"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);
    k.spawn_held(ObjectKind::Food(Food::fresh(FoodKind::Beef)), A0)
        .expect("hands are empty");

    act(&mut k, PrimitiveAction::Interact);
    let status = |k: &Kitchen| k.objects()[0].loose_food().map(|f| f.status);
    assert_eq!(status(&k), Some(FoodStatus::InProgress));

    for _ in 1..config.cook_done {
        act(&mut k, PrimitiveAction::Noop);
    }
    assert_eq!(status(&k), Some(FoodStatus::Done));

    for _ in config.cook_done..config.cook_overcooked {
        act(&mut k, PrimitiveAction::Noop);
    }
    assert_eq!(status(&k), Some(FoodStatus::Overcooked));
    assert!(k.fires().is_empty());

    for _ in config.cook_overcooked..config.cook_fire {
        act(&mut k, PrimitiveAction::Noop);
    }
    assert_eq!(k.fires().len(), 1, "fire appears at the fire threshold");
}

#[test]
fn extinguisher_puts_out_fire_after_five_uses() {
    let mut k = kitchen(&["-P-", "-.-", "---"]);
    let pan = Cell::new(1, 0);
    k.add_agent(Cell::new(1, 1), Direction::Up);
    let mut beef = Food::new(FoodKind::Beef, FoodStatus::Overcooked);
    beef.progress = SimConfig::default().cook_fire;
    k.spawn(ObjectKind::Food(beef), pan);
    k.spawn(ObjectKind::Fire { put_num: 0 }, pan);
    k.spawn_held(ObjectKind::FireExtinguisher, A0)
        .expect("empty hands");

    for n in 1..5 {
        act(&mut k, PrimitiveAction::Interact);
        let put = k.fires().first().map(|f| f.kind.clone());
        assert_eq!(put, Some(ObjectKind::Fire { put_num: n }));
    }
    act(&mut k, PrimitiveAction::Interact);
    assert!(k.fires().is_empty());

    // The overcooked beef left on the pan does not re-ignite.
    for _ in 0..60 {
        act(&mut k, PrimitiveAction::Noop);
    }
    assert!(k.fires().is_empty());
    assert!(k.objects_at(pan).iter().any(|o| o.carries(FoodKind::Beef, None)));
}

#[test]
fn plate_picks_done_beef_off_the_pan() {
    let mut k = kitchen(&["-P-", "-.-", "---"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);
    let mut beef = Food::new(FoodKind::Beef, FoodStatus::Done);
    beef.progress = 10;
    k.spawn(ObjectKind::Food(beef), Cell::new(1, 0));
    k.spawn_held(ObjectKind::Plate { content: None }, A0)
        .expect("empty hands");

    act(&mut k, PrimitiveAction::Interact);
    let plated = k.held_by(A0).expect("still holding the plate");
    assert!(plated.carries(FoodKind::Beef, Some(FoodStatus::Done)));
    assert_eq!(k.objects().len(), 1, "beef moved into the plate");
}

#[test]
fn plate_onto_plate_transfers_and_mixes() {
    let mut k = kitchen(&["---", "-.-", "---"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);
    let beef = Food::new(FoodKind::Beef, FoodStatus::Done);
    let lettuce = Food::new(FoodKind::Lettuce, FoodStatus::Done);
    k.spawn(ObjectKind::Plate { content: Some(beef) }, Cell::new(1, 0));
    k.spawn_held(ObjectKind::Plate { content: Some(lettuce) }, A0)
        .expect("empty hands");

    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), Some(ObjectKind::Plate { content: None }));
    let on_counter = k.objects_at(Cell::new(1, 0));
    assert_eq!(on_counter.len(), 1);
    assert!(on_counter[0].carries(FoodKind::BeefLettuce, None));
}

#[test]
fn dustbin_and_delivery() {
    let mut k = kitchen(&["-D-", "-.*", "---"]);
    k.add_agent(Cell::new(1, 1), Direction::Up);
    k.spawn_held(
        ObjectKind::Plate {
            content: Some(Food::new(FoodKind::Lettuce, FoodStatus::Done)),
        },
        A0,
    )
    .expect("empty hands");

    // Lettuce is not deliverable.
    act(&mut k, PrimitiveAction::Right);
    act(&mut k, PrimitiveAction::Interact);
    assert!(k.deliver_log().is_empty());

    // The bin empties the plate but keeps it in hand.
    act(&mut k, PrimitiveAction::Up);
    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), Some(ObjectKind::Plate { content: None }));

    let mut k = kitchen(&["---", "-.*", "---"]);
    k.add_agent(Cell::new(1, 1), Direction::Right);
    k.spawn_held(
        ObjectKind::Plate {
            content: Some(Food::new(FoodKind::BeefBurger, FoodStatus::Neutral)),
        },
        A0,
    )
    .expect("empty hands");
    act(&mut k, PrimitiveAction::Interact);
    assert_eq!(held(&k), None);
    assert!(k.objects().is_empty(), "delivered plate is consumed");
    assert_eq!(k.deliver_log().len(), 1);
    assert_eq!(k.deliver_log()[0].player, Player::Agent(A0));
    assert_eq!(k.deliver_log()[0].food, FoodKind::BeefBurger);

    k.record_missed(FoodKind::LettuceBurger);
    assert_eq!(k.deliver_log()[1].player, Player::Missed);
}

#[test]
fn holding_never_exceeds_one_object() {
    let mut k = builtin("partial_divider_salad").expect("builtin").build();
    let cycle = [
        PrimitiveAction::Interact,
        PrimitiveAction::Left,
        PrimitiveAction::Interact,
        PrimitiveAction::Up,
        PrimitiveAction::Interact,
        PrimitiveAction::Right,
        PrimitiveAction::Interact,
        PrimitiveAction::Down,
    ];
    for action in cycle.iter().cycle().take(200) {
        let before = k.agents()[0].holding.is_some() as i32;
        act(&mut k, *action);
        let after = k.agents()[0].holding.is_some() as i32;
        assert!((after - before).abs() <= 1);
        let held_count = k.objects().iter().filter(|o| o.holder() == Some(A0)).count();
        assert!(held_count <= 1, "agent holds {held_count} objects");
    }
}
