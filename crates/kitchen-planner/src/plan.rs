//! Plan tables and the forward index built from them.
//!
//! A plan is an ordered list of sub-tasks whose edges may carry guards. Plans that share a
//! prefix share index entries, so the index is a prefix tree keyed by `(plan key, trajectory)`.
//! `wait` edges loop on their prefix: the trajectory does not advance past them.

use std::collections::BTreeMap;

use kitchen_core::{Cell, FoodKind, FoodStatus, ObjectId, ObjectKind, WorldObject};
use kitchen_exec::{ItemMatch, Scene, Source, SubTask, Surface};

use crate::{Guard, Intent, IntentVerb, RecipeId, Thing};

use FoodKind::{Beef, Bread, Lettuce};
use FoodStatus::{Done, Fresh};

/// What a trajectory is indexed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanKey {
    Intent(Intent),
    Recipe(RecipeId),
    PassOn {
        thing: Thing,
        status: Option<FoodStatus>,
    },
    Clean {
        cell: Cell,
        object: ObjectId,
    },
}

impl PlanKey {
    /// The food a `put_onto_plate` under this key refers to.
    pub fn food(self) -> Option<FoodKind> {
        match self {
            PlanKey::Intent(Intent::Prepare { food, .. }) => Some(food),
            PlanKey::PassOn { thing, .. } => thing.food(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Plan {
    steps: Vec<(SubTask, Guard)>,
}

impl Plan {
    pub(crate) fn new(tasks: &[SubTask]) -> Self {
        Self {
            steps: tasks.iter().map(|&t| (t, Guard::Always)).collect(),
        }
    }

    /// Guard the first edge, on top of any guard it already has.
    pub(crate) fn when(self, guard: Guard) -> Self {
        self.guard_at(0, guard)
    }

    pub(crate) fn guard_at(mut self, index: usize, guard: Guard) -> Self {
        if let Some(step) = self.steps.get_mut(index) {
            step.1 = match core::mem::replace(&mut step.1, Guard::Always) {
                Guard::Always => guard,
                Guard::All(mut all) => {
                    all.push(guard);
                    Guard::All(all)
                }
                old => Guard::All(vec![old, guard]),
            };
        }
        self
    }

    /// Insert a guarded `wait` loop before step `index`.
    pub(crate) fn wait_before(mut self, index: usize, guard: Guard) -> Self {
        let index = index.min(self.steps.len());
        self.steps.insert(index, (SubTask::Wait, guard));
        self
    }

    fn then(mut self, tail: &Plan) -> Self {
        self.steps.extend(tail.steps.iter().cloned());
        self
    }
}

/// When a key counts as achieved. `anytime` is checked before every step; `at_end` only once
/// the trajectory has walked a complete plan.
#[derive(Debug, Clone, Default)]
pub struct DoneRule {
    pub anytime: Option<Guard>,
    pub at_end: Option<Guard>,
}

impl DoneRule {
    fn when(guard: Guard) -> Self {
        Self {
            anytime: Some(guard),
            at_end: None,
        }
    }

    fn at_end(guard: Guard) -> Self {
        Self {
            anytime: None,
            at_end: Some(guard),
        }
    }

    fn or_at_end(mut self, guard: Guard) -> Self {
        self.at_end = Some(guard);
        self
    }

    pub fn holds(&self, scene: &Scene<'_>, complete: bool) -> bool {
        self.anytime.as_ref().is_some_and(|g| g.eval(scene))
            || (complete && self.at_end.as_ref().is_some_and(|g| g.eval(scene)))
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub task: SubTask,
    pub guard: Guard,
}

#[derive(Debug, Clone, Default)]
pub struct Entry {
    /// Some plan ends exactly here.
    pub complete: bool,
    pub next: Vec<Edge>,
}

/// The forward index plus per-key completion rules.
#[derive(Debug, Clone, Default)]
pub struct PlanBook {
    entries: BTreeMap<(PlanKey, Vec<SubTask>), Entry>,
    done: BTreeMap<PlanKey, DoneRule>,
}

impl PlanBook {
    /// Tables for every key that does not depend on the world.
    pub fn new() -> Self {
        let mut book = Self::default();
        for food in FoodKind::BASE {
            for plate in [true, false] {
                let intent = Intent::Prepare { food, plate };
                book.insert(PlanKey::Intent(intent), prepare_done(food, plate), prepare(food, plate));
            }
        }
        for intent in Intent::variants(IntentVerb::Serve) {
            let Intent::Serve { food } = intent else {
                continue;
            };
            book.insert(
                PlanKey::Intent(Intent::Serve { food }),
                DoneRule::at_end(Guard::Always),
                serve(food),
            );
        }
        book.insert(
            PlanKey::Intent(Intent::PutoutFire),
            DoneRule::when(!Guard::FireExists),
            putout_fire(),
        );
        for recipe in RecipeId::ALL {
            book.insert(
                PlanKey::Recipe(recipe),
                DoneRule::when(Guard::exists(ItemMatch::food(recipe.product(), None))),
                recipe.plans(),
            );
        }
        book
    }

    pub(crate) fn insert(&mut self, key: PlanKey, done: DoneRule, plans: Vec<Plan>) {
        self.done.insert(key, done);
        for plan in plans {
            let mut prefix = Vec::new();
            for (task, guard) in plan.steps {
                let entry = self.entries.entry((key, prefix.clone())).or_default();
                match entry.next.iter_mut().find(|e| e.task == task) {
                    Some(edge) => {
                        let merged = core::mem::replace(&mut edge.guard, Guard::Always);
                        edge.guard = merged.or(guard);
                    }
                    None => entry.next.push(Edge { task, guard }),
                }
                if task != SubTask::Wait {
                    prefix.push(task);
                }
            }
            self.entries.entry((key, prefix)).or_default().complete = true;
        }
    }

    pub fn contains(&self, key: PlanKey) -> bool {
        self.done.contains_key(&key)
    }

    pub fn entry(&self, key: PlanKey, prefix: &[SubTask]) -> Option<&Entry> {
        self.entries.get(&(key, prefix.to_vec()))
    }

    pub fn done_rule(&self, key: PlanKey) -> Option<&DoneRule> {
        self.done.get(&key)
    }

    /// Build the pass-on tables for `(thing, status)` unless already present.
    pub fn ensure_pass_on(&mut self, thing: Thing, status: Option<FoodStatus>) -> PlanKey {
        let key = PlanKey::PassOn { thing, status };
        if !self.contains(key) {
            let item = match thing {
                Thing::Food(food) => ItemMatch::food(food, status),
                Thing::Plate => ItemMatch::EmptyPlate,
                Thing::FireExtinguisher => ItemMatch::Extinguisher,
            };
            let done = DoneRule::when(Guard::exists_on(item, Surface::CenterCounter));
            self.insert(key, done, pass_on(thing, status));
        }
        key
    }

    /// Build the cleaning tables for one object on one counter.
    pub(crate) fn ensure_clean(&mut self, key: PlanKey, plans: Vec<Plan>) {
        if let PlanKey::Clean { cell, object } = key {
            if !self.contains(key) {
                let cleared = Guard::absent_on(ItemMatch::Pickable, Surface::At(cell));
                let taken_away = Guard::All(vec![cleared.clone(), !Guard::Holding(object)]);
                let done = DoneRule::when(taken_away).or_at_end(cleared);
                self.insert(key, done, plans);
            }
        }
    }
}

fn pickup(food: FoodKind, status: FoodStatus) -> SubTask {
    SubTask::pickup_for(food, status).unwrap_or(SubTask::Pickup { food, status: None })
}

fn loose(food: FoodKind, status: FoodStatus) -> Guard {
    Guard::exists(ItemMatch::loose(food, Some(status)))
}

/// Ways to end up holding a fresh `food`.
fn fetch(food: FoodKind) -> [Plan; 2] {
    [
        Plan::new(&[SubTask::GetFromStation(food)]),
        Plan::new(&[pickup(food, food.initial_status())])
            .when(loose(food, food.initial_status())),
    ]
}

fn cooking_on_pan() -> Guard {
    Guard::exists_on(
        ItemMatch::loose(Beef, Some(FoodStatus::InProgress)),
        Surface::Pan,
    )
}

fn prepare_done(food: FoodKind, plate: bool) -> DoneRule {
    let status = match food {
        Lettuce | Beef => Some(Done),
        _ => None,
    };
    let item = if plate {
        ItemMatch::plated(food, status)
    } else {
        ItemMatch::food(food, status)
    };
    DoneRule::when(Guard::exists(item))
}

fn prepare(food: FoodKind, plate: bool) -> Vec<Plan> {
    match food {
        Lettuce => prepare_lettuce(plate),
        Beef => prepare_beef(plate),
        _ => prepare_bread(plate),
    }
}

fn prepare_lettuce(plate: bool) -> Vec<Plan> {
    let chop = Plan::new(&[SubTask::PutOntoCutboard, SubTask::ChopLettuce]);
    let on_board = Plan::new(&[SubTask::ChopLettuce]).when(Guard::exists_on(
        ItemMatch::loose(Lettuce, Some(Fresh)),
        Surface::CutBoard,
    ));
    let mut heads: Vec<Plan> = fetch(Lettuce).into_iter().map(|p| p.then(&chop)).collect();
    heads.push(on_board);
    if !plate {
        return heads;
    }

    let from_board = Plan::new(&[
        SubTask::PickupPlate,
        SubTask::Plate {
            food: Lettuce,
            overcooked: false,
            from: Some(Source::CutBoard),
        },
    ]);
    let onto_plate = Plan::new(&[pickup(Lettuce, Done), SubTask::PutOntoPlate])
        .when(Guard::exists(ItemMatch::EmptyPlate));
    let mut plans = Vec::new();
    for head in heads {
        plans.push(head.clone().then(&from_board));
        plans.push(head.then(&onto_plate));
    }
    plans.push(
        Plan::new(&[SubTask::PickupPlate, SubTask::Plate {
            food: Lettuce,
            overcooked: false,
            from: None,
        }])
        .when(loose(Lettuce, Done)),
    );
    plans.push(
        Plan::new(&[pickup(Lettuce, Done), SubTask::PutOntoPlate]).when(Guard::All(vec![
            loose(Lettuce, Done),
            Guard::exists(ItemMatch::EmptyPlate),
        ])),
    );
    plans
}

fn prepare_beef(plate: bool) -> Vec<Plan> {
    let to_pan = Plan::new(&[SubTask::PutOntoPan]);
    let heads: Vec<Plan> = fetch(Beef).into_iter().map(|p| p.then(&to_pan)).collect();
    let already_cooking = Plan::new(&[]).wait_before(0, cooking_on_pan());
    if !plate {
        let mut plans: Vec<Plan> = heads
            .into_iter()
            .map(|p| p.wait_before(usize::MAX, cooking_on_pan()))
            .collect();
        plans.push(already_cooking);
        return plans;
    }

    let scoop = Plan::new(&[
        SubTask::PickupPlate,
        SubTask::Plate {
            food: Beef,
            overcooked: false,
            from: Some(Source::Pan),
        },
    ])
    .wait_before(1, cooking_on_pan());

    let mut plans: Vec<Plan> = heads.iter().map(|p| p.clone().then(&scoop)).collect();
    plans.push(scoop.clone().when(Guard::Any(vec![
        cooking_on_pan(),
        Guard::exists_on(ItemMatch::loose(Beef, Some(Done)), Surface::Pan),
    ])));
    plans.push(
        Plan::new(&[SubTask::PickupPlate, SubTask::Plate {
            food: Beef,
            overcooked: false,
            from: None,
        }])
        .when(loose(Beef, Done)),
    );

    // A pan blocked by burnt beef is scooped clean first.
    let burnt = Guard::All(vec![
        Guard::exists_on(ItemMatch::loose(Beef, Some(FoodStatus::Overcooked)), Surface::Pan),
        !Guard::FreeSurface(Surface::Pan),
    ]);
    let scrape = Plan::new(&[
        SubTask::PickupPlate,
        SubTask::Plate {
            food: Beef,
            overcooked: true,
            from: Some(Source::Pan),
        },
    ])
    .when(burnt);
    let discard = [
        Plan::new(&[SubTask::DropFood]).when(Guard::DustbinReachable),
        Plan::new(&[SubTask::PutOntoCounter]).when(!Guard::DustbinReachable),
    ];
    for bin in &discard {
        for head in &heads {
            plans.push(scrape.clone().then(bin).then(head).then(&scoop));
        }
    }
    plans
}

fn prepare_bread(plate: bool) -> Vec<Plan> {
    let [station, lying] = fetch(Bread);
    if !plate {
        return vec![station, lying];
    }
    let no_loose_bread = Guard::absent(ItemMatch::loose(Bread, None));
    let plate_bread = SubTask::Plate {
        food: Bread,
        overcooked: false,
        from: None,
    };
    vec![
        station
            .then(&Plan::new(&[SubTask::PutOntoPlate]))
            .when(Guard::exists(ItemMatch::EmptyPlate)),
        Plan::new(&[SubTask::PickupPlate, plate_bread]).when(loose(Bread, FoodStatus::Neutral)),
        Plan::new(&[pickup(Bread, FoodStatus::Neutral), SubTask::PutOntoPlate]).when(Guard::All(
            vec![
                loose(Bread, FoodStatus::Neutral),
                Guard::exists(ItemMatch::EmptyPlate),
            ],
        )),
        // Only a plate station: set a plate down before fetching the bread.
        Plan::new(&[
            SubTask::PickupPlate,
            SubTask::PutOntoCounter,
            SubTask::GetFromStation(Bread),
            SubTask::PutOntoPlate,
        ])
        .when(Guard::absent(ItemMatch::EmptyPlate))
        .guard_at(1, no_loose_bread),
    ]
}

fn serve(food: FoodKind) -> Vec<Plan> {
    vec![Plan::new(&[
        SubTask::Pickup { food, status: None },
        SubTask::Deliver,
    ])]
}

fn putout_fire() -> Vec<Plan> {
    vec![
        Plan::new(&[SubTask::PickupFireExtinguisher, SubTask::PutOutFire]).when(Guard::FireExists),
        Plan::new(&[SubTask::PutOutFire]),
    ]
}

fn pass_on(thing: Thing, status: Option<FoodStatus>) -> Vec<Plan> {
    let hand_over = Plan::new(&[SubTask::PutOntoCenterCounter]);
    let heads: Vec<Plan> = match thing {
        Thing::Plate => vec![Plan::new(&[SubTask::PickupPlate])],
        Thing::FireExtinguisher => vec![Plan::new(&[SubTask::PickupFireExtinguisher])],
        Thing::Food(food @ (Lettuce | Beef)) => {
            let mut heads = Vec::new();
            if matches!(status, None | Some(Done)) {
                heads.extend(ready_heads(food));
            }
            if matches!(status, None | Some(Fresh)) {
                heads.extend(fetch(food));
            }
            heads
        }
        Thing::Food(Bread) => fetch(Bread).into(),
        Thing::Food(food) => vec![Plan::new(&[SubTask::Pickup { food, status: None }])],
    };
    heads.into_iter().map(|h| h.then(&hand_over)).collect()
}

/// Ways to be holding a ready lettuce or beef. Loose ones are plated first so that they
/// travel on a plate.
fn ready_heads(food: FoodKind) -> Vec<Plan> {
    let mut heads = Vec::new();
    if let Some(plate_it) = SubTask::plate_for(food) {
        heads.push(Plan::new(&[SubTask::PickupPlate, plate_it]).when(loose(food, Done)));
    }
    heads.push(
        Plan::new(&[pickup(food, Done)]).when(Guard::absent(ItemMatch::loose(food, Some(Done)))),
    );
    if food == Lettuce {
        let from_scratch = Plan::new(&[
            SubTask::PutOntoCutboard,
            SubTask::ChopLettuce,
            SubTask::PickupPlate,
            SubTask::Plate {
                food: Lettuce,
                overcooked: false,
                from: Some(Source::CutBoard),
            },
        ]);
        let not_ready = Guard::absent(ItemMatch::food(Lettuce, Some(Done)));
        for head in fetch(Lettuce) {
            heads.push(head.then(&from_scratch).when(not_ready.clone()));
        }
    }
    heads
}

/// The verb that picks `object` up, if the alphabet has one.
pub(crate) fn pickup_verb(object: &WorldObject) -> Option<SubTask> {
    match &object.kind {
        ObjectKind::Food(food) => SubTask::pickup_for(food.kind, food.status),
        ObjectKind::Plate { content: None } => Some(SubTask::PickupPlate),
        ObjectKind::Plate {
            content: Some(food),
        } => SubTask::pickup_for(food.kind, food.status),
        ObjectKind::FireExtinguisher => Some(SubTask::PickupFireExtinguisher),
        ObjectKind::Fire { .. } => None,
    }
}

/// Plans that take `object` off its counter. Food goes to the dustbin; plates and the
/// extinguisher move from a center counter to an edge counter. An empty plate counts as a
/// plate, not as food.
pub(crate) fn clean(object: &WorldObject, center: bool) -> Vec<Plan> {
    let Some(take) = pickup_verb(object) else {
        return Vec::new();
    };
    let to_edge = Plan::new(&[take, SubTask::PutOntoEdgeCounter]);
    match &object.kind {
        ObjectKind::Food(_) => {
            let mut plans =
                vec![Plan::new(&[take, SubTask::DropFood]).guard_at(1, Guard::DustbinReachable)];
            if center {
                plans.push(to_edge.guard_at(1, !Guard::DustbinReachable));
            }
            plans
        }
        _ if center => vec![to_edge],
        ObjectKind::Plate {
            content: Some(_), ..
        } => vec![Plan::new(&[take, SubTask::DropFood])],
        _ => vec![Plan::new(&[take])],
    }
}
