//! Interactive planning session
//!
//! Slash commands drive the planner; `/suggest` hands a snapshot of the
//! agenda to the priority advisor.

pub mod command;
pub mod render;
mod session;

pub use session::{ReplSession, SlashResult};

use eyre::Result;

use crate::advisor::{AdvisorSettings, PriorityAdvisor};
use crate::config::Config;
use crate::planner::Planner;

/// Run the interactive REPL
///
/// This is the main entry point for `dp` and `dp plan`.
pub async fn run_interactive(config: &Config, planner: Planner) -> Result<()> {
    let settings = AdvisorSettings::from_config(&config.advisor);
    let mut session = ReplSession::new(planner, PriorityAdvisor::new(), settings);
    session.run().await
}
