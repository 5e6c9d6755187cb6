//! Interactive chat mode handler
//!
//! Wires the session manager, message pipeline, and telemetry poller into a
//! readline loop. Lines starting with `/` are session-control commands;
//! everything else is sent to the assistant, and the reply is revealed
//! character by character.

use crate::commands::special::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::modes::{ModeState, ResponseMode, ThinkingDepth};
use crate::providers::ReplyOptions;
use crate::providers::{create_provider, AssistantProvider};
use crate::session::reveal::{tick_interval, TextReveal};
use crate::session::ticker::THINKING_PHRASES;
use crate::session::{
    Feedback, MessagePipeline, MessageSender, ReplyDetails, SessionManager, UploadMetadata,
};
use crate::storage::share::extract_fragment;
use crate::telemetry::{
    poller, SimulatedTelemetry, TelemetryCache, TelemetryPoller, TelemetryProvider,
};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `mode` - Optional override for the response mode ("standard" or "pro")
/// * `depth` - Optional override for the thinking depth
/// * `resume` - Optional stored session id (or prefix) to activate
/// * `share_link` - Optional share URL to open read-only
pub async fn run_chat(
    config: Config,
    mode: Option<String>,
    depth: Option<String>,
    resume: Option<String>,
    share_link: Option<String>,
) -> Result<()> {
    tracing::info!("Starting interactive chat mode");

    let fragment = share_link.as_deref().and_then(extract_fragment);
    if share_link.is_some() && fragment.is_none() {
        println!("{}", "Share link could not be parsed, ignoring it.".yellow());
    }

    let store = super::open_store(&config)?;
    let mut manager = SessionManager::new(
        store,
        config.chat.share_base_url.clone(),
        fragment.as_deref(),
    );

    if manager.sessions().is_empty() && !manager.is_read_only() {
        manager.create_session(true);
    }

    if let Some(wanted) = &resume {
        let target = manager
            .sessions()
            .iter()
            .find(|s| s.id == *wanted || s.id.starts_with(wanted.as_str()))
            .map(|s| s.id.clone());
        match target {
            Some(id) => {
                manager.select_session(&id);
            }
            None => println!("{}", format!("No stored session matching {}", wanted).yellow()),
        }
    }

    let mut options = config.reply_options();
    if let Some(m) = mode.as_deref().and_then(|m| ResponseMode::parse_str(m).ok()) {
        options.mode = m;
    }
    if let Some(d) = depth.as_deref().and_then(|d| ThinkingDepth::parse_str(d).ok()) {
        options.thinking_depth = d;
    }
    let mut mode_state = ModeState::new(options.mode, options.thinking_depth);

    let provider: Arc<dyn AssistantProvider> = Arc::from(create_provider(&config.provider)?);
    let mut pipeline = MessagePipeline::new(provider, options);

    let telemetry: Arc<dyn TelemetryProvider> =
        Arc::new(SimulatedTelemetry::new(config.telemetry.seed));
    let cache = Arc::new(TelemetryCache::new());
    let mut telemetry_poller = TelemetryPoller::new(
        Arc::clone(&telemetry),
        Arc::clone(&cache),
        Duration::from_millis(config.telemetry.poll_interval_ms),
    );
    telemetry_poller.start();

    print_banner(&manager, &pipeline);

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = format!(
            "{}{} › ",
            pipeline.options().mode.colored_tag(),
            pipeline.options().thinking_depth.colored_tag()
        );
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!("Readline failed: {}", e);
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        match parse_special_command(trimmed) {
            SpecialCommand::Help => print_help(),
            SpecialCommand::Quit => break,
            SpecialCommand::NewSession => {
                match manager.create_session(true) {
                    Some(session) => println!("{}", format!("Created \"{}\"", session.title).green()),
                    None => println!("{}", "This view is read-only.".yellow()),
                }
            }
            SpecialCommand::ListSessions => print_sessions(&manager),
            SpecialCommand::SelectSession(wanted) => {
                let target = resolve_session(&manager, &wanted);
                let mut selected = None;
                if let Some(id) = target {
                    if manager.select_session(&id) {
                        selected = manager.session(&id).map(|s| s.title.clone());
                    }
                }
                match selected {
                    Some(title) => println!("{}", format!("Switched to \"{}\"", title).green()),
                    None => println!("{}", format!("No session matching {}", wanted).yellow()),
                }
            }
            SpecialCommand::Rename(title) => {
                let Some(id) = manager.active_id().map(String::from) else {
                    println!("{}", "No active session.".yellow());
                    continue;
                };
                if manager.rename_session(&id, &title) {
                    println!("{}", format!("Renamed to \"{}\"", title.trim()).green());
                } else {
                    println!("{}", "Rename ignored.".yellow());
                }
            }
            SpecialCommand::DeleteSession => {
                let Some(id) = manager.active_id().map(String::from) else {
                    println!("{}", "No active session.".yellow());
                    continue;
                };
                if manager.delete_session(&id) {
                    println!("{}", "Session deleted.".green());
                    if manager.sessions().is_empty() {
                        manager.create_session(true);
                    }
                } else {
                    println!("{}", "This view is read-only.".yellow());
                }
            }
            SpecialCommand::ShareSession => {
                let Some(id) = manager.active_id().map(String::from) else {
                    println!("{}", "No active session.".yellow());
                    continue;
                };
                match manager.share_session(&id) {
                    Some(link) => println!("{}", link),
                    None => println!("{}", "Could not build a share link.".yellow()),
                }
            }
            SpecialCommand::Regenerate => {
                let Some((session_id, message_id)) = last_reply_target(&manager) else {
                    println!("{}", "Nothing to regenerate.".yellow());
                    continue;
                };
                println!("{}", THINKING_PHRASES[0].dimmed().italic());
                if pipeline.regenerate(&mut manager, &session_id, &message_id).await {
                    reveal_last_reply(&manager, &session_id, pipeline.options().mode).await;
                } else {
                    println!("{}", "Regenerate rejected.".yellow());
                }
            }
            SpecialCommand::Like(number) => {
                apply_feedback(&mut pipeline, &mut manager, number, Feedback::Liked);
            }
            SpecialCommand::Dislike(number) => {
                apply_feedback(&mut pipeline, &mut manager, number, Feedback::Disliked);
            }
            SpecialCommand::SwitchMode(new_mode) => {
                let old_mode = mode_state.switch_mode(new_mode);
                pipeline.set_options(ReplyOptions {
                    mode: mode_state.mode,
                    thinking_depth: mode_state.depth,
                });
                println!(
                    "Response mode: {} (was {})",
                    new_mode.colored_tag(),
                    old_mode
                );
            }
            SpecialCommand::SwitchDepth(new_depth) => {
                let old_depth = mode_state.switch_depth(new_depth);
                pipeline.set_options(ReplyOptions {
                    mode: mode_state.mode,
                    thinking_depth: mode_state.depth,
                });
                println!(
                    "Thinking depth: {} (was {})",
                    new_depth.colored_tag(),
                    old_depth
                );
            }
            SpecialCommand::Telemetry => {
                if cache.is_empty() {
                    poller::poll_once(&telemetry, &cache).await;
                }
                let snapshots: Vec<_> = cache
                    .topics()
                    .iter()
                    .filter_map(|topic| cache.latest(topic))
                    .collect();
                crate::commands::telemetry::print_snapshots(&snapshots);
            }
            SpecialCommand::Unknown(message) => println!("{}", message.yellow()),
            SpecialCommand::NotSpecial => {
                let Some(session_id) = manager.active_id().map(String::from) else {
                    println!("{}", "No active session; use /new first.".yellow());
                    continue;
                };
                println!("{}", THINKING_PHRASES[0].dimmed().italic());
                if pipeline
                    .send_message(&mut manager, &session_id, trimmed, None)
                    .await
                {
                    reveal_last_reply(&manager, &session_id, pipeline.options().mode).await;
                } else if manager.is_read_only() {
                    println!("{}", "This view is read-only.".yellow());
                } else {
                    println!("{}", "Message rejected.".yellow());
                }
            }
        }
    }

    telemetry_poller.stop();
    println!("Goodbye!");
    Ok(())
}

/// Resolves a list number or id prefix to a session id
fn resolve_session(manager: &SessionManager, wanted: &str) -> Option<String> {
    if let Ok(number) = wanted.parse::<usize>() {
        if number >= 1 {
            return manager.sessions().get(number - 1).map(|s| s.id.clone());
        }
    }
    manager
        .sessions()
        .iter()
        .find(|s| s.id == wanted || s.id.starts_with(wanted))
        .map(|s| s.id.clone())
}

/// The last assistant reply of the active session, as a regenerate target
fn last_reply_target(manager: &SessionManager) -> Option<(String, String)> {
    let session = manager.active_session()?;
    let message = session
        .messages
        .iter()
        .rev()
        .find(|m| m.sender == MessageSender::Ai)?;
    Some((session.id.clone(), message.id.clone()))
}

fn apply_feedback(
    pipeline: &mut MessagePipeline,
    manager: &mut SessionManager,
    number: usize,
    value: Feedback,
) {
    let target = manager.active_session().and_then(|session| {
        session
            .messages
            .get(number - 1)
            .map(|m| (session.id.clone(), m.id.clone()))
    });
    let Some((session_id, message_id)) = target else {
        println!("{}", format!("No message #{}", number).yellow());
        return;
    };
    if pipeline.set_feedback(manager, &session_id, &message_id, value) {
        let current = manager
            .session(&session_id)
            .and_then(|s| s.messages.iter().find(|m| m.id == message_id))
            .and_then(|m| m.feedback);
        match current {
            Some(Feedback::Liked) => println!("{}", "Liked.".green()),
            Some(Feedback::Disliked) => println!("{}", "Disliked.".red()),
            None => println!("Feedback cleared."),
        }
    } else {
        println!("{}", "Feedback rejected.".yellow());
    }
}

/// Reveals the active session's newest reply character by character
async fn reveal_last_reply(manager: &SessionManager, session_id: &str, mode: ResponseMode) {
    let Some(session) = manager.session(session_id) else {
        return;
    };
    let Some(message) = session.messages.last() else {
        return;
    };
    if message.sender != MessageSender::Ai {
        return;
    }

    if message.is_error {
        println!("{}", message.text.red());
        return;
    }

    let mut reveal = TextReveal::new(&message.id, &message.text);
    let interval = tick_interval(mode);
    let mut stdout = std::io::stdout();
    while let Some(ch) = reveal.tick() {
        print!("{}", ch);
        let _ = stdout.flush();
        tokio::time::sleep(interval).await;
    }
    println!();

    if let Some(ReplyDetails::Standard { suggested_replies }) = &message.details {
        for suggestion in suggested_replies {
            println!("  {}", format!("↳ {}", suggestion).dimmed());
        }
    }
    if let Some(metadata) = UploadMetadata::extract(&message.text) {
        if metadata.ready_for_upload {
            println!(
                "{}",
                format!("Upload metadata ready: \"{}\"", metadata.title).cyan()
            );
        }
    }
}

fn print_sessions(manager: &SessionManager) {
    for (index, session) in manager.sessions().iter().enumerate() {
        let marker = if Some(session.id.as_str()) == manager.active_id() {
            "*".cyan().to_string()
        } else {
            " ".to_string()
        };
        let id_short: String = session.id.chars().take(8).collect();
        println!(
            "{} {}. {} ({}, {} messages)",
            marker,
            index + 1,
            session.title,
            id_short.dimmed(),
            session.messages.len()
        );
    }
}

fn print_banner(manager: &SessionManager, pipeline: &MessagePipeline) {
    println!();
    println!("{}", "Corechat - local AI brain console".bold());
    println!(
        "Mode {} depth {}, type {} for commands.",
        pipeline.options().mode.colored_tag(),
        pipeline.options().thinking_depth.colored_tag(),
        "/help".cyan()
    );
    if manager.is_read_only() {
        println!("{}", "Viewing a shared session (read-only).".yellow());
    }
    if let Some(session) = manager.active_session() {
        println!("Active session: {}", session.title.bold());
        if let Some(welcome) = session.messages.first() {
            if session.messages.len() == 1 {
                println!("\n{}\n", welcome.text);
            }
        }
    }
}
