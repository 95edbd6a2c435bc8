//! CLI argument parsing for brigade.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::reporter::SessionStatus;
use clap::{Parser, Subcommand};

/// Brigade: file-based registry, tool-usage gate, and session reporter for sub-agent personas.
///
/// Personas are markdown files with YAML frontmatter:
/// - The registry validates them into agent descriptors
/// - The gate checks a finished run's tool usage against its descriptor
/// - The session journal records run status and progress
#[derive(Parser, Debug)]
#[command(name = "brigade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging on stderr (overrides BRIGADE_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for brigade.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a brigade workspace in the current directory.
    ///
    /// Creates `.brigade/config.yaml` and the personas directory.
    Init,

    /// Inspect registered agent personas.
    Agents(AgentsCommand),

    /// Check a run's tool usage against an agent's contract.
    ///
    /// Exits 0 when the run passes and 2 when it fails.
    Gate(GateArgs),

    /// Record and inspect execution sessions.
    Session(SessionCommand),

    /// Lock management commands.
    ///
    /// Inspect or clear the session journal lock.
    Lock(LockCommand),
}

/// Agents subcommands.
#[derive(Parser, Debug)]
pub struct AgentsCommand {
    #[command(subcommand)]
    pub action: AgentsAction,
}

/// Available agents actions.
#[derive(Subcommand, Debug)]
pub enum AgentsAction {
    /// List registered agents.
    List,

    /// Show one agent's full descriptor.
    Show(AgentShowArgs),

    /// Load every persona file and report problems.
    ///
    /// Exits 2 if any file fails to register.
    Lint,
}

/// Arguments for `agents show`.
#[derive(Parser, Debug)]
pub struct AgentShowArgs {
    /// Agent name (e.g., incident-responder).
    pub name: String,

    /// Print the descriptor as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `gate` command.
#[derive(Parser, Debug)]
pub struct GateArgs {
    /// Agent whose contract applies.
    pub agent: String,

    /// Distinct tools the run used.
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<String>,

    /// Finish this session with the gate outcome.
    #[arg(long)]
    pub session: Option<String>,

    /// Which attempt this run was (1-based); reports whether a retry remains.
    #[arg(long)]
    pub attempt: Option<u32>,
}

/// Session subcommands.
#[derive(Parser, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    pub action: SessionAction,
}

/// Available session actions.
#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Start a session for a registered agent and print its id.
    Start(SessionStartArgs),

    /// Report progress for a running session.
    Progress(SessionProgressArgs),

    /// Finish a running session.
    Finish(SessionFinishArgs),

    /// Show a session and its event stream.
    Show(SessionShowArgs),

    /// List sessions, newest first.
    List(SessionListArgs),
}

/// Arguments for `session start`.
#[derive(Parser, Debug)]
pub struct SessionStartArgs {
    /// Agent name.
    pub agent: String,

    /// Task description.
    pub task: String,
}

/// Arguments for `session progress`.
#[derive(Parser, Debug)]
pub struct SessionProgressArgs {
    /// Session id.
    pub id: String,

    /// Percentage complete (0-100).
    pub percentage: u32,
}

/// Arguments for `session finish`.
#[derive(Parser, Debug)]
pub struct SessionFinishArgs {
    /// Session id.
    pub id: String,

    /// Terminal status: completed or failed.
    #[arg(long)]
    pub status: SessionStatus,

    /// Free-text result.
    #[arg(long)]
    pub result: Option<String>,
}

/// Arguments for `session show`.
#[derive(Parser, Debug)]
pub struct SessionShowArgs {
    /// Session id.
    pub id: String,
}

/// Arguments for `session list`.
#[derive(Parser, Debug)]
pub struct SessionListArgs {
    /// Only show sessions with this status.
    #[arg(long)]
    pub status: Option<SessionStatus>,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Show the journal lock, if held.
    List,

    /// Clear the journal lock.
    ///
    /// Requires --force flag to prevent accidental clearing.
    Clear(LockClearArgs),
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Force clearing the lock (required for safety).
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["brigade", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["brigade", "agents", "list", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Agents(AgentsCommand {
                action: AgentsAction::List
            })
        ));
    }

    #[test]
    fn parse_agents_show() {
        let cli =
            Cli::try_parse_from(["brigade", "agents", "show", "incident-responder", "--json"])
                .unwrap();
        if let Command::Agents(AgentsCommand {
            action: AgentsAction::Show(args),
        }) = cli.command
        {
            assert_eq!(args.name, "incident-responder");
            assert!(args.json);
        } else {
            panic!("Expected agents show");
        }
    }

    #[test]
    fn parse_gate_tools_list() {
        let cli = Cli::try_parse_from([
            "brigade",
            "gate",
            "incident-responder",
            "--tools",
            "Read,Bash",
            "--tools",
            "Grep",
            "--attempt",
            "2",
        ])
        .unwrap();
        if let Command::Gate(args) = cli.command {
            assert_eq!(args.agent, "incident-responder");
            assert_eq!(args.tools, vec!["Read", "Bash", "Grep"]);
            assert_eq!(args.attempt, Some(2));
            assert!(args.session.is_none());
        } else {
            panic!("Expected Gate command");
        }
    }

    #[test]
    fn parse_gate_without_tools() {
        let cli = Cli::try_parse_from(["brigade", "gate", "planner"]).unwrap();
        if let Command::Gate(args) = cli.command {
            assert!(args.tools.is_empty());
        } else {
            panic!("Expected Gate command");
        }
    }

    #[test]
    fn parse_session_start() {
        let cli = Cli::try_parse_from([
            "brigade",
            "session",
            "start",
            "incident-responder",
            "diagnose outage",
        ])
        .unwrap();
        if let Command::Session(SessionCommand {
            action: SessionAction::Start(args),
        }) = cli.command
        {
            assert_eq!(args.agent, "incident-responder");
            assert_eq!(args.task, "diagnose outage");
        } else {
            panic!("Expected session start");
        }
    }

    #[test]
    fn parse_session_finish() {
        let cli = Cli::try_parse_from([
            "brigade", "session", "finish", "abc", "--status", "failed", "--result", "timeout",
        ])
        .unwrap();
        if let Command::Session(SessionCommand {
            action: SessionAction::Finish(args),
        }) = cli.command
        {
            assert_eq!(args.id, "abc");
            assert_eq!(args.status, SessionStatus::Failed);
            assert_eq!(args.result.as_deref(), Some("timeout"));
        } else {
            panic!("Expected session finish");
        }
    }

    #[test]
    fn parse_session_finish_requires_status() {
        assert!(Cli::try_parse_from(["brigade", "session", "finish", "abc"]).is_err());
    }

    #[test]
    fn parse_session_finish_rejects_unknown_status() {
        assert!(
            Cli::try_parse_from(["brigade", "session", "finish", "abc", "--status", "done"])
                .is_err()
        );
    }

    #[test]
    fn parse_session_list_filter() {
        let cli =
            Cli::try_parse_from(["brigade", "session", "list", "--status", "running"]).unwrap();
        if let Command::Session(SessionCommand {
            action: SessionAction::List(args),
        }) = cli.command
        {
            assert_eq!(args.status, Some(SessionStatus::Running));
        } else {
            panic!("Expected session list");
        }
    }

    #[test]
    fn parse_lock_clear() {
        let cli = Cli::try_parse_from(["brigade", "lock", "clear", "--force"]).unwrap();
        if let Command::Lock(LockCommand {
            action: LockAction::Clear(args),
        }) = cli.command
        {
            assert!(args.force);
        } else {
            panic!("Expected lock clear");
        }
    }
}
