//! Recipe decomposition for compound foods.
//!
//! A recipe turns two ingredients into one product. Assembling a compound means choosing a
//! chain of recipes; the chain so far is the recipe stack and indexes the next choices.

use core::fmt;
use std::collections::BTreeMap;

use kitchen_core::{FoodKind, FoodStatus};
use kitchen_exec::{ItemMatch, SubTask};
use serde::{Deserialize, Serialize};

use crate::plan::Plan;
use crate::Guard;

use FoodKind::{Beef, BeefBurger, BeefLettuce, BeefLettuceBurger, Bread, Lettuce, LettuceBurger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeId {
    /// BeefLettuce + Bread.
    BeefLettuceThenBread,
    /// Chopped lettuce onto plated beef.
    LettuceOntoBeef,
    /// Cooked beef onto plated lettuce.
    BeefOntoLettuce,
    /// BeefBurger + Lettuce.
    BeefBurgerThenLettuce,
    /// LettuceBurger + Beef.
    LettuceBurgerThenBeef,
    BeefWithBread,
    LettuceWithBread,
}

impl RecipeId {
    pub const ALL: [RecipeId; 7] = [
        RecipeId::BeefLettuceThenBread,
        RecipeId::LettuceOntoBeef,
        RecipeId::BeefOntoLettuce,
        RecipeId::BeefBurgerThenLettuce,
        RecipeId::LettuceBurgerThenBeef,
        RecipeId::BeefWithBread,
        RecipeId::LettuceWithBread,
    ];

    pub fn product(self) -> FoodKind {
        match self {
            RecipeId::BeefLettuceThenBread
            | RecipeId::BeefBurgerThenLettuce
            | RecipeId::LettuceBurgerThenBeef => BeefLettuceBurger,
            RecipeId::LettuceOntoBeef | RecipeId::BeefOntoLettuce => BeefLettuce,
            RecipeId::BeefWithBread => BeefBurger,
            RecipeId::LettuceWithBread => LettuceBurger,
        }
    }

    pub fn ingredients(self) -> (FoodKind, FoodKind) {
        match self {
            RecipeId::BeefLettuceThenBread => (BeefLettuce, Bread),
            RecipeId::LettuceOntoBeef => (Lettuce, Beef),
            RecipeId::BeefOntoLettuce => (Beef, Lettuce),
            RecipeId::BeefBurgerThenLettuce => (BeefBurger, Lettuce),
            RecipeId::LettuceBurgerThenBeef => (LettuceBurger, Beef),
            RecipeId::BeefWithBread => (Beef, Bread),
            RecipeId::LettuceWithBread => (Lettuce, Bread),
        }
    }

    /// Sub-task plans that carry the recipe out.
    pub(crate) fn plans(self) -> Vec<Plan> {
        use SubTask::{PickupPlate, PutOntoPlateWith};
        let get_bread = SubTask::GetFromStation(Bread);
        let pickup_bread = pickup(Bread);
        match self {
            RecipeId::BeefLettuceThenBread => {
                let plated_bl = Guard::exists(ItemMatch::plated(BeefLettuce, None));
                vec![
                    Plan::new(&[get_bread, PutOntoPlateWith(BeefLettuce)]).when(plated_bl.clone()),
                    Plan::new(&[pickup_bread, PutOntoPlateWith(BeefLettuce)]).when(Guard::All(
                        vec![plated_bl, Guard::exists(ItemMatch::loose(Bread, None))],
                    )),
                    Plan::new(&[pickup(BeefLettuce), PutOntoPlateWith(Bread)]).when(
                        Guard::exists(ItemMatch::plated(Bread, None)),
                    ),
                ]
            }
            RecipeId::LettuceOntoBeef => onto_plated(Lettuce, Beef),
            RecipeId::BeefOntoLettuce => onto_plated(Beef, Lettuce),
            RecipeId::BeefBurgerThenLettuce => vec![
                Plan::new(&[pickup(Lettuce), PutOntoPlateWith(BeefBurger)])
                    .when(Guard::exists(ItemMatch::plated(BeefBurger, None))),
                Plan::new(&[pickup(BeefBurger), PutOntoPlateWith(Lettuce)])
                    .when(Guard::exists(ItemMatch::plated(Lettuce, done(Lettuce)))),
            ],
            RecipeId::LettuceBurgerThenBeef => vec![
                Plan::new(&[pickup(Beef), PutOntoPlateWith(LettuceBurger)])
                    .when(Guard::exists(ItemMatch::plated(LettuceBurger, None))),
                Plan::new(&[pickup(LettuceBurger), PutOntoPlateWith(Beef)])
                    .when(Guard::exists(ItemMatch::plated(Beef, done(Beef)))),
            ],
            RecipeId::BeefWithBread | RecipeId::LettuceWithBread => {
                let (food, _) = self.ingredients();
                let plated = Guard::exists(ItemMatch::plated(food, done(food)));
                let mut plans = vec![
                    Plan::new(&[get_bread, PutOntoPlateWith(food)]).when(plated.clone()),
                    Plan::new(&[pickup_bread, PutOntoPlateWith(food)]).when(Guard::All(vec![
                        plated.clone(),
                        Guard::exists(ItemMatch::loose(Bread, None)),
                    ])),
                    Plan::new(&[pickup(food), PutOntoPlateWith(Bread)])
                        .when(Guard::exists(ItemMatch::plated(Bread, None))),
                ];
                if let Some(plate_it) = SubTask::plate_for(food) {
                    plans.push(
                        Plan::new(&[PickupPlate, plate_it, get_bread, PutOntoPlateWith(food)])
                            .when(Guard::All(vec![
                                !plated,
                                Guard::exists(ItemMatch::loose(food, done(food))),
                            ])),
                    );
                }
                plans
            }
        }
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.ingredients();
        write!(f, "{a}+{b}->{}", self.product())
    }
}

fn done(food: FoodKind) -> Option<FoodStatus> {
    match food {
        Lettuce | Beef => Some(FoodStatus::Done),
        _ => None,
    }
}

fn pickup(food: FoodKind) -> SubTask {
    SubTask::Pickup {
        food,
        status: done(food),
    }
}

/// `moved` goes onto a plate already holding `base`. Loose food is scooped onto a plate first.
fn onto_plated(moved: FoodKind, base: FoodKind) -> Vec<Plan> {
    let plated = Guard::exists(ItemMatch::plated(base, done(base)));
    let mut plans =
        vec![Plan::new(&[pickup(moved), SubTask::PutOntoPlateWith(base)]).when(plated.clone())];
    if let Some(plate_moved) = SubTask::plate_for(moved) {
        plans.push(
            Plan::new(&[SubTask::PickupPlate, plate_moved, SubTask::PutOntoPlateWith(base)])
                .when(Guard::All(vec![
                    plated.clone(),
                    Guard::exists(ItemMatch::loose(moved, done(moved))),
                ])),
        );
    }
    if let Some(plate_it) = SubTask::plate_for(base) {
        plans.push(
            Plan::new(&[
                SubTask::PickupPlate,
                plate_it,
                pickup(moved),
                SubTask::PutOntoPlateWith(base),
            ])
            .when(Guard::All(vec![
                !plated,
                Guard::exists(ItemMatch::loose(base, done(base))),
            ])),
        );
    }
    plans
}

/// One way to continue a recipe stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub recipe: RecipeId,
    /// Lower is tried first.
    pub urgency: u32,
    /// What the rest of the chain needs besides the recipe's own plans.
    pub available: Guard,
}

/// `(target, recipe stack) -> continuations`, built once.
#[derive(Debug, Clone, Default)]
pub struct RecipeIndex {
    entries: BTreeMap<(FoodKind, Vec<RecipeId>), Vec<Continuation>>,
}

impl RecipeIndex {
    pub fn new() -> Self {
        let mut index = Self::default();
        let bread = Guard::obtainable(Bread);
        let lettuce = Guard::ready(Lettuce);
        let beef = Guard::ready(Beef);
        let both = Guard::All(vec![lettuce.clone(), beef.clone()]);

        use RecipeId::*;
        index.add(BeefLettuceBurger, &[], BeefLettuceThenBread, 0, bread.clone());
        for mix in [LettuceOntoBeef, BeefOntoLettuce] {
            index.add(
                BeefLettuceBurger,
                &[],
                mix,
                1,
                Guard::All(vec![both.clone(), bread.clone()]),
            );
            index.add(BeefLettuceBurger, &[mix], BeefLettuceThenBread, 0, bread.clone());
            index.add(BeefLettuce, &[], mix, 0, both.clone());
        }
        index.add(
            BeefLettuceBurger,
            &[],
            BeefBurgerThenLettuce,
            2,
            Guard::All(vec![
                lettuce.clone(),
                Guard::exists(ItemMatch::plated(BeefBurger, None)),
            ]),
        );
        index.add(
            BeefLettuceBurger,
            &[],
            BeefWithBread,
            2,
            Guard::All(vec![both.clone(), bread.clone()]),
        );
        index.add(BeefLettuceBurger, &[BeefWithBread], BeefBurgerThenLettuce, 0, lettuce.clone());
        index.add(
            BeefLettuceBurger,
            &[],
            LettuceBurgerThenBeef,
            3,
            Guard::All(vec![
                beef.clone(),
                Guard::exists(ItemMatch::plated(LettuceBurger, None)),
            ]),
        );
        index.add(
            BeefLettuceBurger,
            &[],
            LettuceWithBread,
            3,
            Guard::All(vec![both, bread.clone()]),
        );
        index.add(BeefLettuceBurger, &[LettuceWithBread], LettuceBurgerThenBeef, 0, beef.clone());

        index.add(
            BeefBurger,
            &[],
            BeefWithBread,
            0,
            Guard::All(vec![beef, bread.clone()]),
        );
        index.add(
            LettuceBurger,
            &[],
            LettuceWithBread,
            0,
            Guard::All(vec![lettuce, bread]),
        );
        index
    }

    fn add(
        &mut self,
        target: FoodKind,
        prefix: &[RecipeId],
        recipe: RecipeId,
        urgency: u32,
        available: Guard,
    ) {
        self.entries
            .entry((target, prefix.to_vec()))
            .or_default()
            .push(Continuation {
                recipe,
                urgency,
                available,
            });
    }

    pub fn continuations(&self, target: FoodKind, prefix: &[RecipeId]) -> &[Continuation] {
        self.entries
            .get(&(target, prefix.to_vec()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
