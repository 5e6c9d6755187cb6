//! Special command parser for the interactive chat loop
//!
//! Lines starting with `/` are session-control commands rather than prompts.
//! Everything else is passed through to the message pipeline.

use crate::modes::{ResponseMode, ThinkingDepth};
use colored::Colorize;

/// A parsed special command
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialCommand {
    /// Show the command help
    Help,
    /// Leave the chat loop
    Quit,
    /// Create a new session and activate it
    NewSession,
    /// List all sessions
    ListSessions,
    /// Activate a session by list number or id prefix
    SelectSession(String),
    /// Rename the active session
    Rename(String),
    /// Delete the active session
    DeleteSession,
    /// Print a share link for the active session
    ShareSession,
    /// Regenerate the last assistant reply
    Regenerate,
    /// Like a message by its display number
    Like(usize),
    /// Dislike a message by its display number
    Dislike(usize),
    /// Switch response mode
    SwitchMode(ResponseMode),
    /// Switch thinking depth
    SwitchDepth(ThinkingDepth),
    /// Show the telemetry snapshot table
    Telemetry,
    /// Input is a normal prompt, not a command
    NotSpecial,
    /// Unrecognized command or bad arguments
    Unknown(String),
}

/// Parses one input line into a special command
///
/// # Examples
///
/// ```
/// use corechat::commands::special::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new"), SpecialCommand::NewSession);
/// assert_eq!(parse_special_command("hello"), SpecialCommand::NotSpecial);
/// ```
pub fn parse_special_command(input: &str) -> SpecialCommand {
    let input = input.trim();
    if !input.starts_with('/') {
        return SpecialCommand::NotSpecial;
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "/help" | "/?" => SpecialCommand::Help,
        "/quit" | "/exit" => SpecialCommand::Quit,
        "/new" => SpecialCommand::NewSession,
        "/list" => SpecialCommand::ListSessions,
        "/select" => {
            if argument.is_empty() {
                SpecialCommand::Unknown("usage: /select <number|id>".to_string())
            } else {
                SpecialCommand::SelectSession(argument.to_string())
            }
        }
        "/rename" => {
            if argument.is_empty() {
                SpecialCommand::Unknown("usage: /rename <new title>".to_string())
            } else {
                SpecialCommand::Rename(argument.to_string())
            }
        }
        "/delete" => SpecialCommand::DeleteSession,
        "/share" => SpecialCommand::ShareSession,
        "/regen" | "/regenerate" => SpecialCommand::Regenerate,
        "/like" => parse_message_number(argument, SpecialCommand::Like, "/like"),
        "/dislike" => parse_message_number(argument, SpecialCommand::Dislike, "/dislike"),
        "/mode" => match ResponseMode::parse_str(argument) {
            Ok(mode) => SpecialCommand::SwitchMode(mode),
            Err(_) => SpecialCommand::Unknown("usage: /mode <standard|pro>".to_string()),
        },
        "/depth" => match ThinkingDepth::parse_str(argument) {
            Ok(depth) => SpecialCommand::SwitchDepth(depth),
            Err(_) => SpecialCommand::Unknown("usage: /depth <fast|balanced|deep>".to_string()),
        },
        "/telemetry" => SpecialCommand::Telemetry,
        other => SpecialCommand::Unknown(format!("Unknown command: {}", other)),
    }
}

fn parse_message_number(
    argument: &str,
    build: fn(usize) -> SpecialCommand,
    usage: &str,
) -> SpecialCommand {
    match argument.parse::<usize>() {
        Ok(number) if number >= 1 => build(number),
        _ => SpecialCommand::Unknown(format!("usage: {} <message number>", usage)),
    }
}

/// Prints the command help
pub fn print_help() {
    println!();
    println!("{}", "Commands:".bold());
    println!("  /new               Create a new session");
    println!("  /list              List sessions");
    println!("  /select <n|id>     Activate a session");
    println!("  /rename <title>    Rename the active session");
    println!("  /delete            Delete the active session");
    println!("  /share             Print a share link for the active session");
    println!("  /regen             Regenerate the last reply");
    println!("  /like <n>          Toggle like on message n");
    println!("  /dislike <n>       Toggle dislike on message n");
    println!("  /mode <m>          Switch response mode (standard, pro)");
    println!("  /depth <d>         Switch thinking depth (fast, balanced, deep)");
    println!("  /telemetry         Show the cognitive telemetry table");
    println!("  /quit              Exit");
    println!();
}
