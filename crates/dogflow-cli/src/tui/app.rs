//! TUI application state and data model.

use chrono::NaiveDate;

use dogflow_core::report::{self, ChecklistReport, CostMarginRow};
use dogflow_core::session::{self, Progress};
use dogflow_core::{OpsResult, catalog};
use dogflow_db::DocumentStore;
use dogflow_db::models::Checklist;

/// Which view the TUI is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Today,
    ChecklistDetail(String),
    History,
    Costs,
    Help,
}

/// One template on the Today view, with its checklist progress if started.
#[derive(Debug, Clone)]
pub struct TodayRow {
    pub template_name: String,
    pub progress: Option<Progress>,
}

/// Application state for the TUI.
pub struct App<S> {
    pub store: S,
    pub currency: String,
    pub today: NaiveDate,
    pub current_view: View,
    pub today_rows: Vec<TodayRow>,
    pub selected_row: usize,
    pub checklist: Option<Checklist>,
    pub selected_item: usize,
    pub history: Vec<ChecklistReport>,
    pub costs: Vec<CostMarginRow>,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl<S: DocumentStore> App<S> {
    pub fn new(store: S, currency: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            store,
            currency: currency.into(),
            today,
            current_view: View::Today,
            today_rows: Vec::new(),
            selected_row: 0,
            checklist: None,
            selected_item: 0,
            history: Vec::new(),
            costs: Vec::new(),
            should_quit: false,
            status_message: None,
        }
    }

    /// Reload the data behind the current view.
    pub fn refresh(&mut self) -> OpsResult<()> {
        match &self.current_view {
            View::Today => self.refresh_today()?,
            View::ChecklistDetail(template) => {
                let template = template.clone();
                self.checklist = Some(session::get_or_create_instance(
                    &mut self.store,
                    self.today,
                    &template,
                )?);
                self.clamp_item();
            }
            View::History => self.history = report::history(&self.store)?,
            View::Costs => self.costs = report::cost_margin_report(&self.store)?,
            View::Help => {}
        }
        Ok(())
    }

    fn refresh_today(&mut self) -> OpsResult<()> {
        let started = report::today_snapshot(&self.store, self.today)?;
        let mut rows: Vec<TodayRow> = catalog::template_names(&self.store)?
            .into_iter()
            .map(|name| TodayRow {
                progress: started
                    .iter()
                    .find(|r| r.checklist.template_name == name)
                    .map(|r| r.progress),
                template_name: name,
            })
            .collect();
        // Checklists whose template was deleted still show up.
        for entry in &started {
            if !rows.iter().any(|r| r.template_name == entry.checklist.template_name) {
                rows.push(TodayRow {
                    template_name: entry.checklist.template_name.clone(),
                    progress: Some(entry.progress),
                });
            }
        }
        self.today_rows = rows;
        if self.selected_row >= self.today_rows.len() && !self.today_rows.is_empty() {
            self.selected_row = self.today_rows.len() - 1;
        }
        Ok(())
    }

    fn clamp_item(&mut self) {
        let len = self.checklist.as_ref().map_or(0, |c| c.items.len());
        if self.selected_item >= len && len > 0 {
            self.selected_item = len - 1;
        }
    }

    // -- Navigation --

    pub fn navigate_back(&mut self) {
        match &self.current_view {
            View::Today => self.should_quit = true,
            View::ChecklistDetail(_) | View::History | View::Costs | View::Help => {
                self.current_view = View::Today;
            }
        }
    }

    pub fn navigate_enter(&mut self) {
        if self.current_view == View::Today {
            if let Some(row) = self.today_rows.get(self.selected_row) {
                self.current_view = View::ChecklistDetail(row.template_name.clone());
                self.selected_item = 0;
            }
        }
    }

    pub fn move_up(&mut self) {
        match &self.current_view {
            View::Today => self.selected_row = self.selected_row.saturating_sub(1),
            View::ChecklistDetail(_) => self.selected_item = self.selected_item.saturating_sub(1),
            _ => {}
        }
    }

    pub fn move_down(&mut self) {
        match &self.current_view {
            View::Today => {
                if self.selected_row + 1 < self.today_rows.len() {
                    self.selected_row += 1;
                }
            }
            View::ChecklistDetail(_) => {
                let len = self.checklist.as_ref().map_or(0, |c| c.items.len());
                if self.selected_item + 1 < len {
                    self.selected_item += 1;
                }
            }
            _ => {}
        }
    }

    pub fn cycle_view(&mut self) {
        self.current_view = match &self.current_view {
            View::Today => View::History,
            View::History => View::Costs,
            View::Costs => View::Today,
            other => other.clone(),
        };
    }

    pub fn show_help(&mut self) {
        self.current_view = View::Help;
    }

    // -- Actions --

    /// Toggle the selected item of the open checklist.
    pub fn toggle_selected(&mut self) -> OpsResult<()> {
        let View::ChecklistDetail(_) = &self.current_view else {
            return Ok(());
        };
        let Some(checklist) = self.checklist.as_mut() else {
            return Ok(());
        };
        let index = self.selected_item;
        let status = session::toggle_item(&mut self.store, checklist, index)?;
        let progress = session::progress(checklist);
        self.status_message = Some(format!("Item {:02} {status} ({progress})", index + 1));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
