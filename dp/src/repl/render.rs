//! Terminal formatting for agenda, backlog and recommendations

use chrono::{NaiveDate, NaiveDateTime};
use colored::Colorize;

use crate::advisor::Recommendation;
use crate::domain::{Badge, Task};

/// Minutes as "1h 30m", "45m" or "2d 3h"
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0m".to_string();
    }
    let total = minutes.round() as u64;
    let (days, rest) = (total / 1440, total % 1440);
    let (hours, mins) = (rest / 60, rest % 60);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(format!("{}m", mins));
    }
    parts.join(" ")
}

fn clock(at: NaiveDateTime, today: NaiveDate) -> String {
    if at.date() == today {
        at.format("%H:%M").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// One agenda row: position, checkbox, window, name, effort and flags
pub fn agenda_line(position: usize, task: &Task, today: NaiveDate) -> String {
    let checkbox = if task.is_completed { "[x]".green() } else { "[ ]".normal() };
    let window = match (task.scheduled_start, task.end_time()) {
        (Some(start), Some(end)) => format!("{}-{}", clock(start, today), end.format("%H:%M")),
        _ => "--:--".to_string(),
    };
    let name = if task.is_completed {
        task.name.dimmed().strikethrough()
    } else {
        task.name.bold()
    };

    let mut line = format!(
        "{:>3}. {} {}  {}  {}",
        position,
        checkbox,
        window.cyan(),
        name,
        format!("({})", task.estimated_effort).dimmed()
    );
    if task.has_overlap {
        line.push_str(&format!("  {}", "OVERLAP".red().bold()));
    }
    if let Some(at) = task.reminder_at() {
        line.push_str(&format!("  {}", format!("reminder {}", at.format("%H:%M")).yellow()));
    }
    line
}

/// One backlog row, referenced as `b<N>`
pub fn backlog_line(position: usize, task: &Task) -> String {
    format!(
        "{:>4} {}  {}",
        format!("b{}.", position).magenta(),
        task.name,
        format!("({}, {})", task.estimated_effort, format_minutes(task.duration_minutes())).dimmed()
    )
}

/// One recommendation, coloured by its badge
pub fn recommendation_line(rec: &Recommendation) -> String {
    let label = rec
        .label()
        .map(|l| l.to_string().to_uppercase())
        .unwrap_or_else(|| "?".to_string());
    let badge = format!("[{:^6}]", label);
    let badge = match rec.badge() {
        Badge::Alert => badge.white().on_red().bold(),
        Badge::Secondary => badge.black().on_yellow(),
        Badge::Outline => badge.normal(),
    };
    let reasoning = rec.reasoning();
    if reasoning.is_empty() {
        format!("  {} {}", badge, rec.task_name.bold())
    } else {
        format!("  {} {}  {}", badge, rec.task_name.bold(), reasoning.dimmed())
    }
}

/// The whole agenda, or a placeholder when empty
pub fn agenda_block(tasks: &[Task], today: NaiveDate) -> Vec<String> {
    if tasks.is_empty() {
        return vec![format!("  {}", "No tasks scheduled.".dimmed())];
    }
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| agenda_line(i + 1, t, today))
        .collect()
}

/// The whole backlog, or a placeholder when empty
pub fn backlog_block(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec![format!("  {}", "Backlog is empty.".dimmed())];
    }
    tasks.iter().enumerate().map(|(i, t)| backlog_line(i + 1, t)).collect()
}
