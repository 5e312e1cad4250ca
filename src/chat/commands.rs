//! Slash command parsing for the chat client.
//!
//! Input starting with `/` drives the model selector and the session instead
//! of being sent to the backend as a question.

/// How the user referred to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    /// By name, as the server lists it.
    Name(String),
    /// By its one-based position among the visible entries.
    Position(usize),
}

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Open or close the model panel.
    Models,

    /// Switch to a model.
    Model(ModelChoice),

    /// Filter the model panel. `None` clears the filter.
    Search(Option<String>),

    /// Close the model panel.
    Close,

    /// Re-fetch the model catalog.
    Refresh,

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat client.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a question.
///
/// # Examples
///
/// ```
/// # use medichat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/model llama3").is_some());
/// assert!(parse_command("What is a fever?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "models" => ChatCommand::Models,
        "model" => match argument {
            Some(arg) => ChatCommand::Model(parse_choice(arg)),
            None => ChatCommand::Invalid("/model requires a model name or number".to_string()),
        },
        "search" | "filter" => ChatCommand::Search(argument.map(str::to_string)),
        "close" | "esc" => ChatCommand::Close,
        "refresh" => ChatCommand::Refresh,
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_choice(arg: &str) -> ModelChoice {
    match arg.parse::<usize>() {
        Ok(position) => ModelChoice::Position(position),
        Err(_) => ModelChoice::Name(arg.to_string()),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /models                Show or hide the model list
  /model <name|n>        Switch model by name or list number
  /search [text]         Filter the model list (no argument clears it)
  /close                 Close the model list
  /refresh               Reload the model list from the server
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat

Anything else is sent to the assistant."#
}
