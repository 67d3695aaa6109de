//! Overlap detection
//!
//! A task overlaps when the task immediately before it (by start time) is
//! still open and its window runs strictly past this task's start. Only the
//! immediate predecessor is checked: a long task two slots back that still
//! covers a later start is not reported.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::Task;

/// Sort key for agenda order; a missing start sorts as the Unix epoch
fn start_key(task: &Task) -> NaiveDateTime {
    task.scheduled_start.unwrap_or_default()
}

/// Sort agenda tasks ascending by start (stable for equal starts)
pub fn sort_by_start(tasks: &mut [Task]) {
    tasks.sort_by_key(start_key);
}

/// Compute overlap flags for a start-sorted agenda
///
/// Pure: the result depends only on the slice contents. The first task is
/// never flagged; completed predecessors never flag their successor.
pub fn overlap_flags(sorted: &[Task]) -> Vec<bool> {
    let mut flags = Vec::with_capacity(sorted.len());
    let mut prev: Option<&Task> = None;

    for task in sorted {
        let flagged = match (prev, task.scheduled_start) {
            (Some(prev), Some(start)) if !prev.is_completed => {
                prev.end_time().is_some_and(|prev_end| prev_end > start)
            }
            _ => false,
        };
        flags.push(flagged);
        prev = Some(task);
    }

    flags
}

/// Sort the agenda and refresh every `has_overlap` flag
///
/// Returns true when at least one flag changed, so callers can skip redraws
/// on no-op recomputations.
pub fn recompute_overlaps(agenda: &mut [Task]) -> bool {
    sort_by_start(agenda);
    let flags = overlap_flags(agenda);

    let mut changed = false;
    for (task, flag) in agenda.iter_mut().zip(flags) {
        if task.has_overlap != flag {
            debug!(id = %task.id, name = %task.name, overlap = flag, "recompute_overlaps: flag changed");
            task.has_overlap = flag;
            changed = true;
        }
    }
    changed
}
