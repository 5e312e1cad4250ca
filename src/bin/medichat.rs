//! Interactive terminal client for the medical assistant backend.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the local development server
//! medichat
//!
//! # Talk to another backend
//! medichat --url http://clinic.local:5000/
//!
//! # Show answers in one piece, without colors
//! medichat --no-typewriter --no-color
//! ```
//!
//! # Commands
//!
//! - `/models` - Show or hide the model list
//! - `/model <name|n>` - Switch model
//! - `/search [text]` - Filter the model list
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::{Arc, Mutex, PoisonError};

use arrrg::CommandLine;
use biometrics::Collector;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{EnvFilter, fmt};

use medichat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, ModelChoice, ModelSelector, PanelEvent,
    PlainTextRenderer, Submission, help_text, parse_command,
};
use medichat::{Backend, ChatClient, register_biometrics};

/// Main entry point for the medichat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("medichat [OPTIONS]");
    let config = ChatConfig::from(args);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    register_biometrics(Collector::new());

    let client = ChatClient::with_options(config.base_url.clone(), Some(config.timeout))?;
    println!("Medical assistant at {}", client.base_url());
    println!("Type /help for commands, /quit to exit\n");

    let backend: Arc<dyn Backend> = Arc::new(client);
    let renderer = Arc::new(Mutex::new(PlainTextRenderer::with_color(config.use_color)));
    let mut session = ChatSession::new(backend.clone(), renderer.clone(), &config);
    let mut selector = ModelSelector::new(backend, renderer.clone(), &config);
    let finish = || {
        renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finish_response();
    };

    session.greet();
    finish();
    selector.fetch_models().await;

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("You: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Models => selector.toggle_panel(),
                        ChatCommand::Close => selector.close_panel(),
                        ChatCommand::Search(query) => {
                            selector.open_panel();
                            selector.search(query.as_deref().unwrap_or(""));
                        }
                        ChatCommand::Model(ModelChoice::Name(name)) => {
                            selector.select_model(&name).await;
                        }
                        ChatCommand::Model(ModelChoice::Position(position)) => {
                            selector.select_position(position).await;
                        }
                        ChatCommand::Refresh => {
                            selector.fetch_models().await;
                        }
                        ChatCommand::Stats => print_stats(&session, &selector),
                        ChatCommand::Invalid(message) => eprintln!("Error: {message}"),
                    }
                    continue;
                }

                selector.handle_event(PanelEvent::OutsideClick);
                if let Submission::Answered(reveal) = session.submit(line).await {
                    reveal.finished().await;
                }
                finish();
            }
            Err(ReadlineError::Interrupted) => {
                selector.close_panel();
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession, selector: &ModelSelector) {
    let stats = session.stats();
    let state = selector.state();
    println!("    Session Statistics:");
    println!("      Model: {}", state.label());
    println!("      Models available: {}", state.available().len());
    println!("      Questions asked: {}", stats.submitted);
    println!("      Answered: {}", stats.answered);
    println!("      Failed: {}", stats.failed);
}
