//! Read-only aggregations over checklists and recipes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use dogflow_db::DocumentStore;
use dogflow_db::models::Checklist;
use dogflow_db::queries::checklists as checklist_db;

use crate::costing;
use crate::error::OpsResult;
use crate::session::{self, Progress};

/// A checklist paired with its progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistReport {
    pub checklist: Checklist,
    pub progress: Progress,
}

impl From<Checklist> for ChecklistReport {
    fn from(checklist: Checklist) -> Self {
        let progress = session::progress(&checklist);
        Self {
            checklist,
            progress,
        }
    }
}

/// Every checklist opened on `today`, ordered by template name.
pub fn today_snapshot<S: DocumentStore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> OpsResult<Vec<ChecklistReport>> {
    let mut checklists = checklist_db::list_checklists_for_date(store, today)?;
    checklists.sort_by(|a, b| a.template_name.cmp(&b.template_name));
    Ok(checklists.into_iter().map(ChecklistReport::from).collect())
}

/// Every checklist ever opened, ordered by date then template name.
pub fn history<S: DocumentStore + ?Sized>(store: &S) -> OpsResult<Vec<ChecklistReport>> {
    let mut checklists = checklist_db::list_checklists(store)?;
    checklists.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.template_name.cmp(&b.template_name))
    });
    Ok(checklists.into_iter().map(ChecklistReport::from).collect())
}

/// One line of the cost and margin report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMarginRow {
    pub product_name: String,
    pub total_cost: Decimal,
    /// Zero when the recipe has no price yet.
    pub sale_price: Decimal,
    pub margin_percent: Decimal,
}

/// Cost, price and margin of every recipe, ordered by product name.
pub fn cost_margin_report<S: DocumentStore + ?Sized>(store: &S) -> OpsResult<Vec<CostMarginRow>> {
    let rows = costing::list_recipes(store)?
        .into_iter()
        .map(|recipe| {
            Ok(CostMarginRow {
                margin_percent: costing::margin_percent(recipe.total_cost, recipe.sale_price)?,
                sale_price: recipe.sale_price.unwrap_or(Decimal::ZERO),
                total_cost: recipe.total_cost,
                product_name: recipe.product_name,
            })
        })
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(rows)
}
