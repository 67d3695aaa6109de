//! Day Planner - daily agenda with overlap detection and AI priority advice
//!
//! A single-user planner that keeps an agenda of timed tasks and a backlog of
//! unscheduled ones, flags tasks that start before the previous one ends, and
//! asks a hosted model which pending tasks deserve attention first.
//!
//! # Modules
//!
//! - [`effort`] - Free-text effort parsing ("1.5 hours" -> 90 minutes)
//! - [`domain`] - Task, ID and priority types
//! - [`planner`] - Agenda/backlog model, form validation, seed files
//! - [`advisor`] - Priority advisor over the LLM clients
//! - [`llm`] - Provider clients (Google, OpenAI, Anthropic)
//! - [`repl`] - Interactive session
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod advisor;
pub mod cli;
pub mod config;
pub mod domain;
pub mod effort;
pub mod llm;
pub mod planner;
pub mod repl;
