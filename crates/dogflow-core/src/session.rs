//! Daily checklist sessions.
//!
//! A checklist instance is materialized from a template the first time a
//! `(date, template)` pair is opened, and from then on is independent of the
//! template. Each item follows a two-state machine:
//!
//! ```text
//! pending -> done     (sets completed_at = now)
//! done    -> pending  (clears completed_at)
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use dogflow_db::DocumentStore;
use dogflow_db::models::{Checklist, ChecklistItem, ItemStatus, NewChecklist};
use dogflow_db::queries::{checklists as checklist_db, templates as template_db};

use crate::error::{EntityKind, OpsError, OpsResult};

/// Completion counts for a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    /// Number of items, or 1 for an empty checklist.
    pub total: usize,
    /// `floor(100 * done / total)`.
    pub percent: u8,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percent)
    }
}

/// Compute `(done, total, percent)`; an empty checklist counts as `0/1`.
pub fn progress(checklist: &Checklist) -> Progress {
    let done = checklist.done_count();
    let total = checklist.items.len().max(1);
    let percent = u8::try_from(done * 100 / total).unwrap_or(100);
    Progress {
        done,
        total,
        percent,
    }
}

/// Return the checklist for `(date, template_name)`, creating it from the
/// template's current items if it does not exist yet.
///
/// Fails with [`OpsError::NotFound`] when a checklist has to be created but
/// the template does not exist.
pub fn get_or_create_instance<S: DocumentStore + ?Sized>(
    store: &mut S,
    date: NaiveDate,
    template_name: &str,
) -> OpsResult<Checklist> {
    let template_name = template_name.trim();
    if let Some(existing) = checklist_db::get_checklist(store, date, template_name)? {
        return Ok(existing);
    }

    let template = template_db::get_template_by_name(store, template_name)?
        .ok_or_else(|| OpsError::not_found(EntityKind::Template, template_name))?;

    let checklist = checklist_db::insert_checklist(
        store,
        &NewChecklist {
            date,
            template_name: template.name,
            items: template.items.into_iter().map(ChecklistItem::pending).collect(),
        },
    )?;
    info!(
        template = %checklist.template_name,
        %date,
        items = checklist.items.len(),
        "checklist created"
    );
    Ok(checklist)
}

/// Apply one toggle transition to `item` at time `now`.
pub fn apply_toggle(item: &mut ChecklistItem, now: DateTime<Utc>) -> ItemStatus {
    match item.status().toggled() {
        ItemStatus::Done => {
            item.done = true;
            item.completed_at = Some(now);
            ItemStatus::Done
        }
        ItemStatus::Pending => {
            item.done = false;
            item.completed_at = None;
            ItemStatus::Pending
        }
    }
}

/// Toggle item `index` (0-based) and persist the full item list.
///
/// Fails with [`OpsError::Index`] when `index` is out of range; the
/// checklist is only modified once the write succeeds.
pub fn toggle_item<S: DocumentStore + ?Sized>(
    store: &mut S,
    checklist: &mut Checklist,
    index: usize,
) -> OpsResult<ItemStatus> {
    let len = checklist.items.len();
    if index >= len {
        return Err(OpsError::Index { index, len });
    }

    let mut items = checklist.items.clone();
    let status = apply_toggle(&mut items[index], Utc::now());
    checklist_db::update_checklist_items(store, checklist.id, &items)?;
    checklist.items = items;

    info!(
        template = %checklist.template_name,
        date = %checklist.date,
        item = index + 1,
        %status,
        "checklist item toggled"
    );
    Ok(status)
}

/// Outcome of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftStatus {
    /// Every item done.
    Approved,
    Pending,
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Approved => "APPROVED",
            Self::Pending => "PENDING",
        };
        f.write_str(s)
    }
}

/// End-of-shift summary for one checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSummary {
    pub template_name: String,
    pub date: NaiveDate,
    pub progress: Progress,
    pub status: ShiftStatus,
}

pub fn shift_summary(checklist: &Checklist) -> ShiftSummary {
    let progress = progress(checklist);
    let status = if progress.is_complete() {
        ShiftStatus::Approved
    } else {
        ShiftStatus::Pending
    };
    ShiftSummary {
        template_name: checklist.template_name.clone(),
        date: checklist.date,
        progress,
        status,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn checklist(done: &[bool]) -> Checklist {
        Checklist {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            template_name: "Abertura".to_owned(),
            items: done
                .iter()
                .enumerate()
                .map(|(i, &d)| ChecklistItem {
                    name: format!("Passo {i}"),
                    done: d,
                    completed_at: d.then(Utc::now),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_checklist_counts_as_zero_of_one() {
        let p = progress(&checklist(&[]));
        assert_eq!(
            p,
            Progress {
                done: 0,
                total: 1,
                percent: 0
            }
        );
    }

    #[test]
    fn percent_is_floored() {
        let p = progress(&checklist(&[true, false, false]));
        assert_eq!((p.done, p.total, p.percent), (1, 3, 33));
        let p = progress(&checklist(&[true, true, false]));
        assert_eq!(p.percent, 66);
        assert_eq!(p.to_string(), "2/3 (66%)");
    }

    #[test]
    fn apply_toggle_sets_and_clears_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap();
        let mut item = ChecklistItem::pending("Ligar chapa");

        assert_eq!(apply_toggle(&mut item, now), ItemStatus::Done);
        assert!(item.done);
        assert_eq!(item.completed_at, Some(now));

        assert_eq!(apply_toggle(&mut item, now), ItemStatus::Pending);
        assert!(!item.done);
        assert!(item.completed_at.is_none());
    }

    #[test]
    fn shift_summary_status() {
        assert_eq!(
            shift_summary(&checklist(&[true, true])).status,
            ShiftStatus::Approved
        );
        assert_eq!(
            shift_summary(&checklist(&[true, false])).status,
            ShiftStatus::Pending
        );
        assert_eq!(shift_summary(&checklist(&[])).status, ShiftStatus::Pending);
    }
}
