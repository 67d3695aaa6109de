//! Agenda model
//!
//! The planner owns two disjoint collections: the agenda (tasks with a start
//! time) and the backlog (tasks without one). Every mutation that touches the
//! agenda recomputes overlap flags before returning, so `has_overlap` is never
//! stale. Unknown IDs are no-ops, never errors, so a stale view can retry
//! safely.

mod form;
pub mod overlap;
mod seed;

pub use form::{BacklogForm, FormError, TaskForm};
pub use seed::{BacklogSeed, ScheduledSeed, Seed};

use tracing::{debug, info};

use crate::domain::{NewTask, Schedule, Task, TaskId};

/// Which collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Agenda,
    Backlog,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agenda => write!(f, "agenda"),
            Self::Backlog => write!(f, "backlog"),
        }
    }
}

/// Agenda and backlog for one planning session
#[derive(Debug, Clone, Default)]
pub struct Planner {
    /// Kept sorted by start
    agenda: Vec<Task>,
    /// Insertion order
    backlog: Vec<Task>,
}

impl Planner {
    /// Create an empty planner
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a planner from seed data, assigning fresh IDs
    pub fn from_seed(seed: Seed) -> Self {
        debug!(
            agenda = seed.agenda.len(),
            backlog = seed.backlog.len(),
            "Planner::from_seed: called"
        );
        let mut agenda: Vec<Task> = seed
            .agenda
            .into_iter()
            .map(|s| {
                let completed = s.completed;
                let mut task = Task::scheduled(s.new_task(), s.schedule());
                task.is_completed = completed;
                task
            })
            .collect();
        overlap::recompute_overlaps(&mut agenda);

        let backlog = seed
            .backlog
            .into_iter()
            .map(|s| Task::unscheduled(s.new_task()))
            .collect();

        Self { agenda, backlog }
    }

    /// Agenda tasks, ascending by start
    pub fn agenda(&self) -> &[Task] {
        &self.agenda
    }

    /// Backlog tasks, in insertion order
    pub fn backlog(&self) -> &[Task] {
        &self.backlog
    }

    /// Agenda tasks not yet completed
    pub fn pending_agenda(&self) -> impl Iterator<Item = &Task> {
        self.agenda.iter().filter(|t| !t.is_completed)
    }

    /// Look a task up in either collection
    pub fn find(&self, id: TaskId) -> Option<(Collection, &Task)> {
        if let Some(task) = self.agenda.iter().find(|t| t.id == id) {
            return Some((Collection::Agenda, task));
        }
        self.backlog
            .iter()
            .find(|t| t.id == id)
            .map(|task| (Collection::Backlog, task))
    }

    /// Number of tasks across both collections
    pub fn total_len(&self) -> usize {
        self.agenda.len() + self.backlog.len()
    }

    /// Number of agenda tasks currently flagged as overlapping
    pub fn overlap_count(&self) -> usize {
        self.agenda.iter().filter(|t| t.has_overlap).count()
    }

    /// Add a task to the agenda
    pub fn add_to_agenda(&mut self, new_task: NewTask, schedule: Schedule) -> TaskId {
        let task = Task::scheduled(new_task, schedule);
        let id = task.id;
        info!(%id, name = %task.name, start = ?schedule.start, "add_to_agenda");
        self.agenda.push(task);
        self.refresh_overlaps();
        id
    }

    /// Add a task to the backlog
    pub fn add_to_backlog(&mut self, new_task: NewTask) -> TaskId {
        let task = Task::unscheduled(new_task);
        let id = task.id;
        info!(%id, name = %task.name, "add_to_backlog");
        self.backlog.push(task);
        id
    }

    /// Schedule a backlog item: the new agenda task and the backlog removal
    /// are applied together
    ///
    /// The agenda entry gets a fresh ID. A missing `backlog_id` still adds the
    /// agenda task; the removal is then a no-op.
    pub fn schedule_from_backlog(&mut self, new_task: NewTask, schedule: Schedule, backlog_id: TaskId) -> TaskId {
        let removed = self.remove_from(Collection::Backlog, backlog_id).is_some();
        debug!(%backlog_id, removed, "schedule_from_backlog: backlog removal");
        self.add_to_agenda(new_task, schedule)
    }

    /// Move an agenda task back to the backlog, keeping its ID
    ///
    /// Returns false when the ID is not on the agenda.
    pub fn move_to_backlog(&mut self, agenda_id: TaskId) -> bool {
        let Some(task) = self.remove_from(Collection::Agenda, agenda_id) else {
            debug!(%agenda_id, "move_to_backlog: not on agenda");
            return false;
        };
        info!(id = %agenda_id, name = %task.name, "move_to_backlog");
        self.backlog.push(task.into_backlog());
        self.refresh_overlaps();
        true
    }

    /// Flip completion of an agenda task
    ///
    /// Returns the new completion state, or None when the ID is not on the agenda.
    pub fn toggle_completed(&mut self, agenda_id: TaskId) -> Option<bool> {
        let task = self.agenda.iter_mut().find(|t| t.id == agenda_id)?;
        task.is_completed = !task.is_completed;
        let state = task.is_completed;
        info!(id = %agenda_id, completed = state, "toggle_completed");
        self.refresh_overlaps();
        Some(state)
    }

    /// Edit an agenda task in place; completion state is preserved
    pub fn update_agenda_task(&mut self, agenda_id: TaskId, new_task: NewTask, schedule: Schedule) -> bool {
        let Some(task) = self.agenda.iter_mut().find(|t| t.id == agenda_id) else {
            return false;
        };
        task.name = new_task.name;
        task.estimated_effort = new_task.estimated_effort;
        task.scheduled_start = Some(schedule.start);
        task.reminder_minutes = schedule.reminder_minutes;
        info!(id = %agenda_id, "update_agenda_task");
        self.refresh_overlaps();
        true
    }

    /// Delete a task from the given collection
    ///
    /// Idempotent: returns false when nothing was removed.
    pub fn delete(&mut self, id: TaskId, from: Collection) -> bool {
        let removed = self.remove_from(from, id).is_some();
        info!(%id, %from, removed, "delete");
        if removed && from == Collection::Agenda {
            self.refresh_overlaps();
        }
        removed
    }

    fn remove_from(&mut self, from: Collection, id: TaskId) -> Option<Task> {
        let list = match from {
            Collection::Agenda => &mut self.agenda,
            Collection::Backlog => &mut self.backlog,
        };
        let pos = list.iter().position(|t| t.id == id)?;
        Some(list.remove(pos))
    }

    /// Recompute overlap flags; true when any flag changed
    fn refresh_overlaps(&mut self) -> bool {
        let changed = overlap::recompute_overlaps(&mut self.agenda);
        if changed {
            debug!(overlaps = self.overlap_count(), "refresh_overlaps: flags changed");
        }
        changed
    }
}
