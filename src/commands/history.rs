//! Session history command handlers

use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::Result;
use crate::session::{ChatSession, MessageSender};
use crate::storage::share::encode_share_link;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = super::open_store(config)?;
    let mut sessions = store.load(None).sessions;

    match command {
        HistoryCommand::List => {
            if sessions.is_empty() {
                println!("{}", "No stored sessions.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Updated".bold()
            ]);

            for session in &sessions {
                let id_short: String = session.id.chars().take(8).collect();
                let title = if session.title.chars().count() > 40 {
                    let prefix: String = session.title.chars().take(37).collect();
                    format!("{}...", prefix)
                } else {
                    session.title.clone()
                };
                let updated = session.updated_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    id_short.cyan(),
                    title,
                    session.messages.len(),
                    updated
                ]);
            }

            println!("\nStored Sessions:");
            table.printstd();
            println!();
            println!(
                "Use {} to resume a session.",
                "corechat chat --resume <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            let Some(session) = find_session(&sessions, &id) else {
                println!("{}", format!("No session matching {}", id).yellow());
                return Ok(());
            };

            println!("\n{} ({})\n", session.title.bold(), session.id.dimmed());
            for message in &session.messages {
                let tag = match message.sender {
                    MessageSender::User => "you".green(),
                    MessageSender::Ai if message.is_error => "brain!".red(),
                    MessageSender::Ai => "brain".cyan(),
                };
                let feedback = match message.feedback {
                    Some(crate::session::Feedback::Liked) => " [+1]".green().to_string(),
                    Some(crate::session::Feedback::Disliked) => " [-1]".red().to_string(),
                    None => String::new(),
                };
                println!("{}{}: {}", tag, feedback, message.text);
                if let Some(attachment) = &message.attachment {
                    println!(
                        "  {} {} ({})",
                        "attachment:".dimmed(),
                        attachment.name,
                        attachment.mime_type
                    );
                }
            }
            println!();
        }
        HistoryCommand::Delete { id } => {
            let Some(index) = find_session_index(&sessions, &id) else {
                println!("{}", format!("No session matching {}", id).yellow());
                return Ok(());
            };
            let removed = sessions.remove(index);
            store.save(&sessions)?;
            println!(
                "{}",
                format!("Deleted session \"{}\" ({})", removed.title, removed.id).green()
            );
        }
        HistoryCommand::Share { id } => {
            let Some(session) = find_session(&sessions, &id) else {
                println!("{}", format!("No session matching {}", id).yellow());
                return Ok(());
            };
            let link = encode_share_link(&config.chat.share_base_url, session)?;
            println!("{}", link);
        }
    }

    Ok(())
}

/// Looks up a session by full id or unique-enough prefix
fn find_session<'a>(sessions: &'a [ChatSession], id: &str) -> Option<&'a ChatSession> {
    find_session_index(sessions, id).map(|index| &sessions[index])
}

fn find_session_index(sessions: &[ChatSession], id: &str) -> Option<usize> {
    if let Some(index) = sessions.iter().position(|s| s.id == id) {
        return Some(index);
    }
    sessions.iter().position(|s| s.id.starts_with(id))
}
