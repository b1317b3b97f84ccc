//! Foods, statuses, and the mixing table.
//!
//! Compound foods are identified by the set of base ingredients they contain, so mixing is a
//! disjoint union of ingredient masks: two ready foods mix iff they share no base ingredient.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LETTUCE: u8 = 1 << 0;
const BEEF: u8 = 1 << 1;
const BREAD: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FoodKind {
    Lettuce,
    Beef,
    Bread,
    BeefLettuce,
    LettuceBurger,
    BeefBurger,
    BeefLettuceBurger,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown food: {0}")]
pub struct UnknownFood(pub String);

impl FoodKind {
    pub const ALL: [FoodKind; 7] = [
        FoodKind::Lettuce,
        FoodKind::Beef,
        FoodKind::Bread,
        FoodKind::BeefLettuce,
        FoodKind::LettuceBurger,
        FoodKind::BeefBurger,
        FoodKind::BeefLettuceBurger,
    ];

    pub const BASE: [FoodKind; 3] = [FoodKind::Lettuce, FoodKind::Beef, FoodKind::Bread];

    fn mask(self) -> u8 {
        match self {
            FoodKind::Lettuce => LETTUCE,
            FoodKind::Beef => BEEF,
            FoodKind::Bread => BREAD,
            FoodKind::BeefLettuce => BEEF | LETTUCE,
            FoodKind::LettuceBurger => LETTUCE | BREAD,
            FoodKind::BeefBurger => BEEF | BREAD,
            FoodKind::BeefLettuceBurger => BEEF | LETTUCE | BREAD,
        }
    }

    fn from_mask(mask: u8) -> Option<FoodKind> {
        FoodKind::ALL.into_iter().find(|k| k.mask() == mask)
    }

    /// Lower-case token used inside sub-task names (`pickup_beeflettuce`).
    pub fn token(self) -> &'static str {
        match self {
            FoodKind::Lettuce => "lettuce",
            FoodKind::Beef => "beef",
            FoodKind::Bread => "bread",
            FoodKind::BeefLettuce => "beeflettuce",
            FoodKind::LettuceBurger => "lettuceburger",
            FoodKind::BeefBurger => "beefburger",
            FoodKind::BeefLettuceBurger => "beeflettuceburger",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FoodKind::Lettuce => "Lettuce",
            FoodKind::Beef => "Beef",
            FoodKind::Bread => "Bread",
            FoodKind::BeefLettuce => "BeefLettuce",
            FoodKind::LettuceBurger => "LettuceBurger",
            FoodKind::BeefBurger => "BeefBurger",
            FoodKind::BeefLettuceBurger => "BeefLettuceBurger",
        }
    }

    pub fn is_compound(self) -> bool {
        self.mask().count_ones() > 1
    }

    pub fn is_burger(self) -> bool {
        self.mask() & BREAD != 0 && self.is_compound()
    }

    /// Whether `self` contains every base ingredient of `other`.
    pub fn contains(self, other: FoodKind) -> bool {
        self.mask() & other.mask() == other.mask()
    }

    /// Result of mixing two kinds, ignoring readiness.
    pub fn combine(self, other: FoodKind) -> Option<FoodKind> {
        if self.mask() & other.mask() != 0 {
            return None;
        }
        FoodKind::from_mask(self.mask() | other.mask())
    }

    /// Status a freshly dispensed instance carries.
    pub fn initial_status(self) -> FoodStatus {
        match self {
            FoodKind::Lettuce | FoodKind::Beef => FoodStatus::Fresh,
            _ => FoodStatus::Neutral,
        }
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FoodKind {
    type Err = UnknownFood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FoodKind::ALL
            .into_iter()
            .find(|k| k.name() == needle || k.token().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownFood(s.to_string()))
    }
}

/// Food status. Lettuce uses `Fresh` for unchopped and `Done` for chopped; bread and compounds
/// are `Neutral` (the empty status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FoodStatus {
    Fresh,
    InProgress,
    Done,
    Overcooked,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown food status: {0}")]
pub struct UnknownStatus(pub String);

impl FoodStatus {
    pub const ALL: [FoodStatus; 5] = [
        FoodStatus::Fresh,
        FoodStatus::InProgress,
        FoodStatus::Done,
        FoodStatus::Overcooked,
        FoodStatus::Neutral,
    ];

    pub fn token(self) -> &'static str {
        match self {
            FoodStatus::Fresh => "fresh",
            FoodStatus::InProgress => "in_progress",
            FoodStatus::Done => "done",
            FoodStatus::Overcooked => "overcooked",
            FoodStatus::Neutral => "",
        }
    }

    /// Parse a status, accepting the user-facing aliases (`Chopped`, `Well-cooked`, ...).
    pub fn parse(s: &str) -> Result<FoodStatus, UnknownStatus> {
        let lowered = s.trim().to_ascii_lowercase();
        let status = match lowered.as_str() {
            "fresh" | "unchopped" => FoodStatus::Fresh,
            "in_progress" | "in-progress" | "cooking" => FoodStatus::InProgress,
            "done" | "chopped" | "well-cooked" | "well_cooked" => FoodStatus::Done,
            "overcooked" => FoodStatus::Overcooked,
            "" => FoodStatus::Neutral,
            _ => return Err(UnknownStatus(s.to_string())),
        };
        Ok(status)
    }

    /// User-facing alias for `kind` in this status (`Chopped` lettuce, `Well-cooked` beef).
    pub fn alias_for(self, kind: FoodKind) -> &'static str {
        match (kind, self) {
            (FoodKind::Lettuce, FoodStatus::Fresh) => "Unchopped",
            (FoodKind::Lettuce, FoodStatus::Done) => "Chopped",
            (FoodKind::Beef, FoodStatus::Fresh) => "Fresh",
            (FoodKind::Beef, FoodStatus::Done) => "Well-cooked",
            (_, FoodStatus::Fresh) => "Fresh",
            (_, FoodStatus::InProgress) => "In-progress",
            (_, FoodStatus::Done) => "Done",
            (_, FoodStatus::Overcooked) => "Overcooked",
            (_, FoodStatus::Neutral) => "",
        }
    }
}

impl fmt::Display for FoodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A food instance. `progress` counts chop interactions or cooking ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Food {
    pub kind: FoodKind,
    pub status: FoodStatus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progress: u32,
}

impl Food {
    pub fn new(kind: FoodKind, status: FoodStatus) -> Self {
        Self {
            kind,
            status,
            progress: 0,
        }
    }

    pub fn fresh(kind: FoodKind) -> Self {
        Self::new(kind, kind.initial_status())
    }

    pub fn matches(&self, kind: FoodKind, status: Option<FoodStatus>) -> bool {
        self.kind == kind && status.map_or(true, |s| s == self.status)
    }

    /// Ready to be combined with another ingredient.
    pub fn is_ready(&self) -> bool {
        match self.kind {
            FoodKind::Lettuce | FoodKind::Beef => self.status == FoodStatus::Done,
            _ => true,
        }
    }

    /// May sit on a plate. Overcooked beef is plateable so that pans can be cleared.
    pub fn is_plateable(&self) -> bool {
        self.is_ready() || (self.kind == FoodKind::Beef && self.status == FoodStatus::Overcooked)
    }

    pub fn is_deliverable(&self) -> bool {
        self.kind.is_burger()
    }

    pub fn mix(&self, other: &Food) -> Option<Food> {
        if !self.is_ready() || !other.is_ready() {
            return None;
        }
        let kind = self.kind.combine(other.kind)?;
        Some(Food::new(kind, FoodStatus::Neutral))
    }
}
