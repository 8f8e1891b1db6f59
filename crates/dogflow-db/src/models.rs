use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A named, ordered list of checklist steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub items: Vec<String>,
}

/// Fields for inserting or replacing a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub items: Vec<String>,
}

impl NewTemplate {
    pub fn new<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

/// Completion state of a single checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Done,
}

impl ItemStatus {
    /// The state reached by toggling.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

impl FromStr for ItemStatus {
    type Err = ItemStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            other => Err(ItemStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ItemStatus`] string.
#[derive(Debug, Clone)]
pub struct ItemStatusParseError(pub String);

impl fmt::Display for ItemStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid item status: {:?}", self.0)
    }
}

impl std::error::Error for ItemStatusParseError {}

/// One step of a checklist instance.
///
/// `completed_at` is `Some` exactly when `done` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    pub done: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    /// A fresh item in the pending state.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            completed_at: None,
        }
    }

    pub fn status(&self) -> ItemStatus {
        if self.done {
            ItemStatus::Done
        } else {
            ItemStatus::Pending
        }
    }
}

/// A dated realization of a template. `(date, template_name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub date: NaiveDate,
    pub template_name: String,
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }
}

/// Fields for inserting a [`Checklist`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChecklist {
    pub date: NaiveDate,
    pub template_name: String,
    pub items: Vec<ChecklistItem>,
}

// ---------------------------------------------------------------------------
// Ingredients and recipes
// ---------------------------------------------------------------------------

/// A base input priced per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub unit_cost: Decimal,
}

/// Fields for inserting an [`Ingredient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub unit: String,
    pub unit_cost: Decimal,
}

/// One ingredient of a recipe, with unit and cost copied from the
/// ingredient when the line was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub ingredient_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

/// A product's bill of materials ("ficha técnica").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub product_name: String,
    pub ingredient_lines: Vec<IngredientLine>,
    pub total_cost: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
}

/// Fields for inserting or replacing a [`Recipe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub product_name: String,
    pub ingredient_lines: Vec<IngredientLine>,
    pub total_cost: Decimal,
    pub sale_price: Option<Decimal>,
}
