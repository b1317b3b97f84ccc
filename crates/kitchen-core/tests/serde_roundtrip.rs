#![cfg(feature = "serde")]

use kitchen_core::{
    AgentId, AgentState, Cell, Direction, Food, FoodKind, FoodStatus, KitchenView, Layout,
    ObjectId, ObjectKind, Placement, WorldObject, WorldSnapshot,
};

fn busy_snapshot() -> WorldSnapshot {
    let layout = Layout::parse(&["-/-L-", "-...P", "O.=.*", "D...-", "-----"]).expect("layout");
    let objects = vec![
        WorldObject {
            id: ObjectId(1),
            kind: ObjectKind::Plate {
                content: Some(Food::new(FoodKind::Lettuce, FoodStatus::Done)),
            },
            placement: Placement::At(Cell::new(2, 2)),
        },
        WorldObject {
            id: ObjectId(2),
            kind: ObjectKind::Fire { put_num: 3 },
            placement: Placement::At(Cell::new(4, 1)),
        },
        WorldObject {
            id: ObjectId(3),
            kind: ObjectKind::FireExtinguisher,
            placement: Placement::HeldBy(AgentId(0)),
        },
    ];
    let agents = vec![AgentState {
        id: AgentId(0),
        location: Cell::new(3, 1),
        orientation: Direction::Right,
        holding: Some(ObjectId(3)),
    }];
    WorldSnapshot {
        tick: 17,
        layout,
        objects,
        agents,
    }
}

#[test]
fn cell_serializes_as_named_coordinates() {
    let json = serde_json::to_value(Cell::new(3, -1)).expect("serialize cell");
    assert_eq!(json, serde_json::json!({"x": 3, "y": -1}));
    let back: Cell = serde_json::from_value(json).expect("deserialize cell");
    assert_eq!(back, Cell::new(3, -1));
}

#[test]
fn world_snapshot_roundtrips_via_serde() {
    let world = busy_snapshot();

    let json = serde_json::to_string(&world).expect("serialize snapshot");
    let world2: WorldSnapshot = serde_json::from_str(&json).expect("deserialize snapshot");
    assert_eq!(world, world2);

    assert_eq!(world2.tick(), 17);
    assert_eq!(world2.tile(Cell::new(1, 0)), world.tile(Cell::new(1, 0)));
    assert_eq!(
        world2.held_by(AgentId(0)).map(|o| o.id),
        Some(ObjectId(3))
    );
    assert_eq!(world2.fires().len(), 1);
    let plated = world2.objects_at(Cell::new(2, 2));
    assert!(plated[0].carries(FoodKind::Lettuce, Some(FoodStatus::Done)));
}

#[test]
fn unknown_object_kinds_are_rejected() {
    let json = r#"{"id":9,"kind":"Oven","placement":{"At":{"x":0,"y":0}}}"#;
    assert!(serde_json::from_str::<WorldObject>(json).is_err());
}
