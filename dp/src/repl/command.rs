//! Slash command parsing
//!
//! Commands take whitespace-separated words, except those carrying free text
//! (names, efforts, times), which separate fields with `|`:
//!
//! ```text
//! /add Team stand-up | 09:30 | 30 minutes | 5
//! /later Check emails | 30 minutes
//! /schedule b1 | 2026-03-15 16:00
//! ```

use thiserror::Error;

/// A task reference typed by the user: `3` for the third agenda task,
/// `b2` for the second backlog item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRef {
    Agenda(usize),
    Backlog(usize),
}

impl std::str::FromStr for TaskRef {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (backlog, digits) = match s.strip_prefix(['b', 'B']) {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        match digits.parse::<usize>() {
            Ok(n) if n > 0 && backlog => Ok(TaskRef::Backlog(n)),
            Ok(n) if n > 0 => Ok(TaskRef::Agenda(n)),
            _ => Err(CommandError::BadRef(s.to_string())),
        }
    }
}

/// Start as typed: optional "YYYY-MM-DD" and a required "HH:MM"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct When {
    pub date: Option<String>,
    pub time: String,
}

impl When {
    fn parse(text: &str) -> Self {
        match text.trim().split_once(char::is_whitespace) {
            Some((date, time)) => Self {
                date: Some(date.to_string()),
                time: time.trim().to_string(),
            },
            None => Self {
                date: None,
                time: text.trim().to_string(),
            },
        }
    }
}

/// Parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Add {
        name: String,
        when: When,
        effort: String,
        reminder: Option<String>,
    },
    Later {
        name: String,
        effort: String,
    },
    /// Blank `name` or `effort` keeps the backlog item's value
    Schedule {
        item: usize,
        when: When,
        reminder: Option<String>,
        name: Option<String>,
        effort: Option<String>,
    },
    Edit {
        index: usize,
        name: String,
        when: When,
        effort: String,
        reminder: Option<String>,
    },
    Done(usize),
    Defer(usize),
    Remove(TaskRef),
    List,
    Suggest,
    /// Show or switch the provider
    Provider(Option<String>),
    /// Set a credential, for the named provider or the selected one
    Key {
        provider: Option<String>,
        key: String,
    },
    Effort(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a task reference (use 3 for agenda, b2 for backlog)")]
    BadRef(String),
}

const ADD_USAGE: &str = "/add <name> | [YYYY-MM-DD] HH:MM | <effort> [| <reminder minutes>]";
const LATER_USAGE: &str = "/later <name> | <effort>";
const SCHEDULE_USAGE: &str =
    "/schedule b<N> | [YYYY-MM-DD] HH:MM [| <reminder minutes> [| <name> [| <effort>]]]";
const EDIT_USAGE: &str = "/edit <N> | <name> | [YYYY-MM-DD] HH:MM | <effort> [| <reminder minutes>]";

/// Split `|`-separated fields, trimming each
fn fields(rest: &str) -> Vec<String> {
    if rest.trim().is_empty() {
        return Vec::new();
    }
    rest.split('|').map(|f| f.trim().to_string()).collect()
}

/// Optional trailing field; blank counts as absent
fn optional(fields: &[String], idx: usize) -> Option<String> {
    fields.get(idx).filter(|f| !f.is_empty()).cloned()
}

fn agenda_index(text: &str, usage: &'static str) -> Result<usize, CommandError> {
    match text.parse::<TaskRef>()? {
        TaskRef::Agenda(n) => Ok(n),
        TaskRef::Backlog(_) => Err(CommandError::Usage(usage)),
    }
}

/// Parse one input line starting with `/`
pub fn parse(input: &str) -> Result<ReplCommand, CommandError> {
    let input = input.trim();
    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };

    match cmd {
        "/add" | "/a" => {
            let f = fields(rest);
            if f.len() < 3 || f.len() > 4 {
                return Err(CommandError::Usage(ADD_USAGE));
            }
            Ok(ReplCommand::Add {
                name: f[0].clone(),
                when: When::parse(&f[1]),
                effort: f[2].clone(),
                reminder: optional(&f, 3),
            })
        }
        "/later" | "/backlog" => {
            let f = fields(rest);
            if f.len() != 2 {
                return Err(CommandError::Usage(LATER_USAGE));
            }
            Ok(ReplCommand::Later {
                name: f[0].clone(),
                effort: f[1].clone(),
            })
        }
        "/schedule" => {
            let f = fields(rest);
            if f.len() < 2 || f.len() > 5 {
                return Err(CommandError::Usage(SCHEDULE_USAGE));
            }
            let item = match f[0].parse::<TaskRef>()? {
                TaskRef::Backlog(n) => n,
                TaskRef::Agenda(_) => return Err(CommandError::Usage(SCHEDULE_USAGE)),
            };
            Ok(ReplCommand::Schedule {
                item,
                when: When::parse(&f[1]),
                reminder: optional(&f, 2),
                name: optional(&f, 3),
                effort: optional(&f, 4),
            })
        }
        "/edit" => {
            let f = fields(rest);
            if f.len() < 4 || f.len() > 5 {
                return Err(CommandError::Usage(EDIT_USAGE));
            }
            Ok(ReplCommand::Edit {
                index: agenda_index(&f[0], EDIT_USAGE)?,
                name: f[1].clone(),
                when: When::parse(&f[2]),
                effort: f[3].clone(),
                reminder: optional(&f, 4),
            })
        }
        "/done" | "/d" => Ok(ReplCommand::Done(agenda_index(rest, "/done <N>")?)),
        "/defer" => Ok(ReplCommand::Defer(agenda_index(rest, "/defer <N>")?)),
        "/rm" | "/delete" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("/rm <N> | /rm b<N>"));
            }
            Ok(ReplCommand::Remove(rest.parse()?))
        }
        "/list" | "/ls" | "/l" => Ok(ReplCommand::List),
        "/suggest" | "/s" => Ok(ReplCommand::Suggest),
        "/provider" => Ok(ReplCommand::Provider((!rest.is_empty()).then(|| rest.to_string()))),
        "/key" => {
            let words: Vec<&str> = rest.split_whitespace().collect();
            match words.as_slice() {
                [key] => Ok(ReplCommand::Key {
                    provider: None,
                    key: key.to_string(),
                }),
                [provider, key] => Ok(ReplCommand::Key {
                    provider: Some(provider.to_string()),
                    key: key.to_string(),
                }),
                _ => Err(CommandError::Usage("/key [provider] <KEY>")),
            }
        }
        "/effort" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("/effort <text>"));
            }
            Ok(ReplCommand::Effort(rest.to_string()))
        }
        "/help" | "/h" | "/?" => Ok(ReplCommand::Help),
        "/quit" | "/q" | "/exit" => Ok(ReplCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// True for lines that carry a secret and must stay out of history
pub fn is_sensitive(input: &str) -> bool {
    input.trim_start().starts_with("/key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cmd = parse("/add Team stand-up | 09:30 | 30 minutes | 5").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Add {
                name: "Team stand-up".to_string(),
                when: When {
                    date: None,
                    time: "09:30".to_string()
                },
                effort: "30 minutes".to_string(),
                reminder: Some("5".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_add_with_date_no_reminder() {
        let cmd = parse("/add Review | 2026-03-15 15:00 | 1.5 hours").unwrap();
        let ReplCommand::Add { when, reminder, .. } = cmd else {
            panic!("expected add");
        };
        assert_eq!(when.date.as_deref(), Some("2026-03-15"));
        assert_eq!(when.time, "15:00");
        assert_eq!(reminder, None);
    }

    #[test]
    fn test_parse_add_usage() {
        assert_eq!(parse("/add just a name"), Err(CommandError::Usage(ADD_USAGE)));
        assert_eq!(parse("/add"), Err(CommandError::Usage(ADD_USAGE)));
    }

    #[test]
    fn test_parse_later() {
        assert_eq!(
            parse("/later Check emails | 30 minutes").unwrap(),
            ReplCommand::Later {
                name: "Check emails".to_string(),
                effort: "30 minutes".to_string()
            }
        );
    }

    #[test]
    fn test_parse_schedule() {
        let cmd = parse("/schedule b2 | 16:00 | 10").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Schedule {
                item: 2,
                when: When {
                    date: None,
                    time: "16:00".to_string()
                },
                reminder: Some("10".to_string()),
                name: None,
                effort: None,
            }
        );
        assert_eq!(parse("/schedule 2 | 16:00"), Err(CommandError::Usage(SCHEDULE_USAGE)));
    }

    #[test]
    fn test_parse_schedule_overrides() {
        let cmd = parse("/schedule b1 | 2026-03-14 16:00 |  | Triage inbox | 1 hour").unwrap();
        let ReplCommand::Schedule {
            item,
            when,
            reminder,
            name,
            effort,
        } = cmd
        else {
            panic!("expected schedule");
        };
        assert_eq!(item, 1);
        assert_eq!(when.date.as_deref(), Some("2026-03-14"));
        assert_eq!(reminder, None);
        assert_eq!(name.as_deref(), Some("Triage inbox"));
        assert_eq!(effort.as_deref(), Some("1 hour"));

        let ReplCommand::Schedule { name, effort, .. } = parse("/schedule b1 | 16:00 | | | 2 hours").unwrap() else {
            panic!("expected schedule");
        };
        assert_eq!(name, None);
        assert_eq!(effort.as_deref(), Some("2 hours"));

        assert_eq!(
            parse("/schedule b1 | 16:00 | 5 | x | 1 hour | extra"),
            Err(CommandError::Usage(SCHEDULE_USAGE))
        );
    }

    #[test]
    fn test_parse_edit() {
        let cmd = parse("/edit 3 | Lunch | 12:30 | 45 minutes").unwrap();
        let ReplCommand::Edit { index, name, effort, .. } = cmd else {
            panic!("expected edit");
        };
        assert_eq!(index, 3);
        assert_eq!(name, "Lunch");
        assert_eq!(effort, "45 minutes");
    }

    #[test]
    fn test_parse_task_refs() {
        assert_eq!(parse("/done 2").unwrap(), ReplCommand::Done(2));
        assert_eq!(parse("/defer 1").unwrap(), ReplCommand::Defer(1));
        assert_eq!(parse("/rm b1").unwrap(), ReplCommand::Remove(TaskRef::Backlog(1)));
        assert_eq!(parse("/rm 4").unwrap(), ReplCommand::Remove(TaskRef::Agenda(4)));
        assert_eq!(parse("/done 0"), Err(CommandError::BadRef("0".to_string())));
        assert_eq!(parse("/done x"), Err(CommandError::BadRef("x".to_string())));
        assert!(matches!(parse("/done b1"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(
            parse("/key sk-123").unwrap(),
            ReplCommand::Key {
                provider: None,
                key: "sk-123".to_string()
            }
        );
        assert_eq!(
            parse("/key openai sk-123").unwrap(),
            ReplCommand::Key {
                provider: Some("openai".to_string()),
                key: "sk-123".to_string()
            }
        );
        assert!(parse("/key").is_err());
        assert!(is_sensitive("  /key sk-123"));
        assert!(!is_sensitive("/list"));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/list").unwrap(), ReplCommand::List);
        assert_eq!(parse("/suggest").unwrap(), ReplCommand::Suggest);
        assert_eq!(parse("/provider").unwrap(), ReplCommand::Provider(None));
        assert_eq!(
            parse("/provider anthropic").unwrap(),
            ReplCommand::Provider(Some("anthropic".to_string()))
        );
        assert_eq!(parse("/effort 2 hours").unwrap(), ReplCommand::Effort("2 hours".to_string()));
        assert_eq!(parse("/q").unwrap(), ReplCommand::Quit);
        assert_eq!(parse("/nope"), Err(CommandError::Unknown("/nope".to_string())));
    }
}
