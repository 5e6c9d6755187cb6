//! Command-line interface definition for Corechat
//!
//! This module defines the CLI structure using clap's derive API, providing
//! commands for interactive chat, session history management, and telemetry
//! inspection.

use clap::{Parser, Subcommand};

/// Corechat - terminal chat client for a local AI brain
///
/// Manage conversation sessions, talk to the local brain server, and
/// inspect simulated cognitive telemetry.
#[derive(Parser, Debug, Clone)]
#[command(name = "corechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session database path
    #[arg(long, env = "CORECHAT_SESSIONS_DB")]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Corechat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Response mode: standard or pro
        #[arg(short, long)]
        mode: Option<String>,

        /// Thinking depth: fast, balanced, or deep
        #[arg(short, long)]
        depth: Option<String>,

        /// Resume a stored session by id (or 8-char prefix)
        #[arg(short, long)]
        resume: Option<String>,

        /// Open a shared session read-only from a share link
        #[arg(long)]
        share_link: Option<String>,
    },

    /// Manage stored sessions
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Inspect simulated cognitive telemetry
    Telemetry {
        /// Telemetry subcommand
        #[command(subcommand)]
        command: TelemetryCommand,
    },
}

/// Session history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored sessions
    List,

    /// Print one session's conversation
    Show {
        /// Session id (or 8-char prefix)
        id: String,
    },

    /// Delete a stored session
    Delete {
        /// Session id (or 8-char prefix)
        id: String,
    },

    /// Print a share link for a stored session
    Share {
        /// Session id (or 8-char prefix)
        id: String,
    },
}

/// Telemetry subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TelemetryCommand {
    /// Show a snapshot of all topics (or one topic)
    Show {
        /// Restrict to one topic
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// List known topics
    Topics,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::History {
                command: HistoryCommand::List,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.storage_path.is_none());
        assert!(matches!(
            cli.command,
            Commands::History {
                command: HistoryCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["corechat", "chat"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_with_mode_and_depth() {
        let cli = Cli::try_parse_from(["corechat", "chat", "--mode", "pro", "--depth", "deep"])
            .unwrap();
        if let Commands::Chat { mode, depth, .. } = cli.command {
            assert_eq!(mode, Some("pro".to_string()));
            assert_eq!(depth, Some("deep".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_with_resume() {
        let cli = Cli::try_parse_from(["corechat", "chat", "--resume", "abcd1234"]).unwrap();
        if let Commands::Chat { resume, .. } = cli.command {
            assert_eq!(resume, Some("abcd1234".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_with_share_link() {
        let cli = Cli::try_parse_from([
            "corechat",
            "chat",
            "--share-link",
            "http://localhost:5173/#share=abc",
        ])
        .unwrap();
        if let Commands::Chat { share_link, .. } = cli.command {
            assert_eq!(
                share_link,
                Some("http://localhost:5173/#share=abc".to_string())
            );
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_history_list() {
        let cli = Cli::try_parse_from(["corechat", "history", "list"]).unwrap();
        if let Commands::History { command } = cli.command {
            assert!(matches!(command, HistoryCommand::List));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_history_show() {
        let cli = Cli::try_parse_from(["corechat", "history", "show", "abcd1234"]).unwrap();
        if let Commands::History { command } = cli.command {
            if let HistoryCommand::Show { id } = command {
                assert_eq!(id, "abcd1234");
            } else {
                panic!("Expected Show command");
            }
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_history_delete() {
        let cli = Cli::try_parse_from(["corechat", "history", "delete", "abcd1234"]).unwrap();
        if let Commands::History { command } = cli.command {
            assert!(matches!(command, HistoryCommand::Delete { .. }));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_history_share() {
        let cli = Cli::try_parse_from(["corechat", "history", "share", "abcd1234"]).unwrap();
        if let Commands::History { command } = cli.command {
            assert!(matches!(command, HistoryCommand::Share { .. }));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_telemetry_show() {
        let cli = Cli::try_parse_from(["corechat", "telemetry", "show"]).unwrap();
        if let Commands::Telemetry { command } = cli.command {
            if let TelemetryCommand::Show { topic } = command {
                assert!(topic.is_none());
            } else {
                panic!("Expected Show command");
            }
        } else {
            panic!("Expected Telemetry command");
        }
    }

    #[test]
    fn test_cli_parse_telemetry_show_with_topic() {
        let cli =
            Cli::try_parse_from(["corechat", "telemetry", "show", "--topic", "emotion-engine"])
                .unwrap();
        if let Commands::Telemetry { command } = cli.command {
            if let TelemetryCommand::Show { topic } = command {
                assert_eq!(topic, Some("emotion-engine".to_string()));
            } else {
                panic!("Expected Show command");
            }
        } else {
            panic!("Expected Telemetry command");
        }
    }

    #[test]
    fn test_cli_parse_telemetry_topics() {
        let cli = Cli::try_parse_from(["corechat", "telemetry", "topics"]).unwrap();
        if let Commands::Telemetry { command } = cli.command {
            assert!(matches!(command, TelemetryCommand::Topics));
        } else {
            panic!("Expected Telemetry command");
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli =
            Cli::try_parse_from(["corechat", "--config", "custom.yaml", "history", "list"])
                .unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_with_verbose() {
        let cli = Cli::try_parse_from(["corechat", "-v", "history", "list"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_with_storage_path() {
        let cli = Cli::try_parse_from([
            "corechat",
            "--storage-path",
            "/tmp/sessions.db",
            "history",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.storage_path, Some("/tmp/sessions.db".to_string()));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["corechat"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["corechat", "invalid"]).is_err());
    }
}
