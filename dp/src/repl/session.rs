//! REPL session management

use chrono::{Local, NaiveDate};
use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use super::command::{self, ReplCommand, TaskRef, When};
use super::render;
use crate::advisor::{AdvisorError, AdvisorSettings, PriorityAdvisor, Suggestion};
use crate::domain::TaskId;
use crate::effort;
use crate::llm::Provider;
use crate::planner::{BacklogForm, Collection, Planner, TaskForm};

/// Interactive planning session
pub struct ReplSession {
    planner: Planner,
    advisor: PriorityAdvisor,
    settings: AdvisorSettings,
}

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashResult {
    Continue,
    Quit,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl ReplSession {
    /// Create a new REPL session
    pub fn new(planner: Planner, advisor: PriorityAdvisor, settings: AdvisorSettings) -> Self {
        Self {
            planner,
            advisor,
            settings,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.print_list();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    // Credentials never go into history
                    if !command::is_sensitive(input) {
                        let _ = rl.add_history_entry(input);
                    }

                    if !input.starts_with('/') {
                        println!(
                            "{} Commands start with '/'. Type {} for the list",
                            "?".yellow(),
                            "/help".yellow()
                        );
                        continue;
                    }

                    match command::parse(input) {
                        Ok(cmd) => {
                            if self.execute(cmd).await == SlashResult::Quit {
                                break;
                            }
                        }
                        Err(e) => {
                            println!("{} {}", "?".yellow(), e);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Apply one parsed command
    pub async fn execute(&mut self, cmd: ReplCommand) -> SlashResult {
        match cmd {
            ReplCommand::Add {
                name,
                when,
                effort,
                reminder,
            } => self.cmd_add(name, when, effort, reminder),
            ReplCommand::Later { name, effort } => self.cmd_later(name, effort),
            ReplCommand::Schedule {
                item,
                when,
                reminder,
                name,
                effort,
            } => self.cmd_schedule(item, when, reminder, name, effort),
            ReplCommand::Edit {
                index,
                name,
                when,
                effort,
                reminder,
            } => self.cmd_edit(index, name, when, effort, reminder),
            ReplCommand::Done(index) => self.cmd_done(index),
            ReplCommand::Defer(index) => self.cmd_defer(index),
            ReplCommand::Remove(target) => self.cmd_remove(target),
            ReplCommand::List => self.print_list(),
            ReplCommand::Suggest => self.cmd_suggest().await,
            ReplCommand::Provider(name) => self.cmd_provider(name),
            ReplCommand::Key { provider, key } => self.cmd_key(provider, key),
            ReplCommand::Effort(text) => print_effort(&text),
            ReplCommand::Help => self.print_help(),
            ReplCommand::Quit => return SlashResult::Quit,
        }
        SlashResult::Continue
    }

    fn agenda_id(&self, position: usize) -> Option<TaskId> {
        let id = self.planner.agenda().get(position.checked_sub(1)?).map(|t| t.id);
        if id.is_none() {
            println!("{} No agenda task #{}", "!".red(), position);
        }
        id
    }

    fn backlog_id(&self, position: usize) -> Option<TaskId> {
        let id = self.planner.backlog().get(position.checked_sub(1)?).map(|t| t.id);
        if id.is_none() {
            println!("{} No backlog item b{}", "!".red(), position);
        }
        id
    }

    fn cmd_add(&mut self, name: String, when: When, effort: String, reminder: Option<String>) {
        let form = TaskForm {
            name,
            date: when.date,
            time: when.time,
            estimated_effort: effort,
            reminder_minutes: reminder,
        };
        match form.validate(today()) {
            Ok((new_task, schedule)) => {
                let name = new_task.name.clone();
                let id = self.planner.add_to_agenda(new_task, schedule);
                println!("{} Added '{}' [{}]", "+".green(), name, id.short());
                self.print_agenda();
            }
            Err(e) => println!("{} {}", "!".red(), e),
        }
    }

    fn cmd_later(&mut self, name: String, effort: String) {
        let form = BacklogForm {
            name,
            estimated_effort: effort,
        };
        match form.validate() {
            Ok(new_task) => {
                let name = new_task.name.clone();
                let id = self.planner.add_to_backlog(new_task);
                println!("{} Added '{}' to backlog [{}]", "+".green(), name, id.short());
            }
            Err(e) => println!("{} {}", "!".red(), e),
        }
    }

    fn cmd_schedule(
        &mut self,
        item: usize,
        when: When,
        reminder: Option<String>,
        name: Option<String>,
        effort: Option<String>,
    ) {
        let Some(backlog_id) = self.backlog_id(item) else {
            return;
        };
        let Some((_, task)) = self.planner.find(backlog_id) else {
            return;
        };
        // Blank override fields keep the backlog item's values
        let form = TaskForm {
            name: name.unwrap_or_else(|| task.name.clone()),
            date: when.date,
            time: when.time,
            estimated_effort: effort.unwrap_or_else(|| task.estimated_effort.clone()),
            reminder_minutes: reminder,
        };
        match form.validate(today()) {
            Ok((new_task, schedule)) => {
                let name = new_task.name.clone();
                self.planner.schedule_from_backlog(new_task, schedule, backlog_id);
                println!("{} Scheduled '{}'", "+".green(), name);
                self.print_agenda();
            }
            Err(e) => println!("{} {}", "!".red(), e),
        }
    }

    fn cmd_edit(&mut self, index: usize, name: String, when: When, effort: String, reminder: Option<String>) {
        let Some(id) = self.agenda_id(index) else {
            return;
        };
        let form = TaskForm {
            name,
            date: when.date,
            time: when.time,
            estimated_effort: effort,
            reminder_minutes: reminder,
        };
        match form.validate(today()) {
            Ok((new_task, schedule)) => {
                if self.planner.update_agenda_task(id, new_task, schedule) {
                    println!("{} Updated", "~".green());
                    self.print_agenda();
                }
            }
            Err(e) => println!("{} {}", "!".red(), e),
        }
    }

    fn cmd_done(&mut self, index: usize) {
        let Some(id) = self.agenda_id(index) else {
            return;
        };
        match self.planner.toggle_completed(id) {
            Some(true) => println!("{} Completed", "x".green()),
            Some(false) => println!("{} Reopened", "o".yellow()),
            None => {}
        }
        self.print_agenda();
    }

    fn cmd_defer(&mut self, index: usize) {
        let Some(id) = self.agenda_id(index) else {
            return;
        };
        if self.planner.move_to_backlog(id) {
            println!("{} Moved to backlog", "<".yellow());
            self.print_list();
        }
    }

    fn cmd_remove(&mut self, target: TaskRef) {
        let (id, from) = match target {
            TaskRef::Agenda(n) => (self.agenda_id(n), Collection::Agenda),
            TaskRef::Backlog(n) => (self.backlog_id(n), Collection::Backlog),
        };
        if let Some(id) = id
            && self.planner.delete(id, from)
        {
            println!("{} Removed from {}", "-".red(), from);
        }
    }

    async fn cmd_suggest(&mut self) {
        if let Err(e) = self.settings.ensure_ready() {
            println!("{} {}", "!".red(), e);
            return;
        }

        // Snapshot so the advisor never sees later edits
        let tasks = self.planner.agenda().to_vec();
        let pending = self.planner.pending_agenda().count();
        if pending > 0 {
            println!(
                "{}",
                format!(
                    "Asking {} ({}) to prioritize {} task(s)...",
                    self.settings.provider(),
                    self.settings.model(),
                    pending
                )
                .dimmed()
            );
        }

        match self.advisor.suggest(&tasks, &self.settings).await {
            Ok(Suggestion::NothingToPrioritize) => {
                println!("{}", "Nothing to prioritize: no pending tasks on the agenda.".dimmed());
            }
            Ok(Suggestion::Recommendations(recs)) => {
                println!();
                println!("{}", "Priority Suggestions:".bright_cyan());
                for rec in &recs {
                    println!("{}", render::recommendation_line(rec));
                }
                println!();
            }
            Err(e) => {
                info!(error = %e, "cmd_suggest: failed");
                println!("{} {}", "!".red(), e);
                if e.needs_credential() && !matches!(e, AdvisorError::MissingCredential { .. }) {
                    println!("  Use {} to set a new key", "/key <KEY>".yellow());
                }
                if let Some(wait) = e.retry_after() {
                    println!("  Rate limited; try again in {}s", wait.as_secs());
                }
            }
        }
    }

    fn cmd_provider(&mut self, name: Option<String>) {
        if let Some(name) = name {
            match name.parse::<Provider>() {
                Ok(provider) => self.settings.set_provider(provider),
                Err(e) => {
                    println!("{} {}", "!".red(), e);
                    return;
                }
            }
        }
        let provider = self.settings.provider();
        let key = if self.settings.has_credential(provider) {
            "key set".green()
        } else {
            "no key".red()
        };
        println!("Provider: {} ({}, {})", provider.to_string().bold(), self.settings.model(), key);
    }

    fn cmd_key(&mut self, provider: Option<String>, key: String) {
        let provider = match provider {
            Some(name) => match name.parse::<Provider>() {
                Ok(p) => p,
                Err(e) => {
                    println!("{} {}", "!".red(), e);
                    return;
                }
            },
            None => self.settings.provider(),
        };
        debug!(%provider, "cmd_key: called");
        self.settings.set_credential(provider, key);
        if self.settings.has_credential(provider) {
            println!("{} Key stored for {}", "+".green(), provider);
        } else {
            println!("{} Key cleared for {}", "-".yellow(), provider);
        }
    }

    fn print_agenda(&self) {
        let today = today();
        println!();
        println!("{}", format!("Agenda ({})", today.format("%A %Y-%m-%d")).bright_cyan());
        for line in render::agenda_block(self.planner.agenda(), today) {
            println!("{}", line);
        }
        let overlaps = self.planner.overlap_count();
        if overlaps > 0 {
            println!("  {}", format!("{} task(s) overlap the one before", overlaps).red());
        }
        println!();
    }

    fn print_list(&self) {
        self.print_agenda();
        println!("{}", "Backlog".bright_cyan());
        for line in render::backlog_block(self.planner.backlog()) {
            println!("{}", line);
        }
        println!();
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "Day Planner".bright_cyan().bold());
        println!(
            "Advisor: {} ({})",
            self.settings.provider(),
            if self.settings.has_credential(self.settings.provider()) {
                "ready".green()
            } else {
                "no API key".yellow()
            }
        );
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Schedule a task: name | [date] HH:MM | effort [| reminder]", "/add".yellow());
        println!("  {:14} Add to backlog: name | effort", "/later".yellow());
        println!("  {:14} Schedule a backlog item: b<N> | [date] HH:MM [| reminder [| name [| effort]]]", "/schedule".yellow());
        println!("  {:14} Edit a task: N | name | [date] HH:MM | effort [| reminder]", "/edit".yellow());
        println!("  {:14} Toggle completion of task N", "/done".yellow());
        println!("  {:14} Move task N back to the backlog", "/defer".yellow());
        println!("  {:14} Remove task N or backlog item b<N>", "/rm".yellow());
        println!("  {:14} Show agenda and backlog", "/list".yellow());
        println!("  {:14} Ask the advisor to prioritize pending tasks", "/suggest".yellow());
        println!("  {:14} Show or switch provider (google, openai, anthropic)", "/provider".yellow());
        println!("  {:14} Set the API key: [provider] <KEY>", "/key".yellow());
        println!("  {:14} Show what an effort parses to", "/effort".yellow());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit", "/quit".yellow());
        println!();
    }
}

fn print_effort(text: &str) {
    let minutes = effort::parse_duration_minutes(text);
    println!("{} = {} minutes ({})", text, minutes, render::format_minutes(minutes));
    if !effort::is_well_formed(text) {
        println!("  {}", "No leading number; this counts as zero.".dimmed());
    }
}
