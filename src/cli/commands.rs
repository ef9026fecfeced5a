//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::agent::{Agent, PromptKind, SystemPrompt};
use crate::core::{Config, Result};

/// Result of parsing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// Start a new conversation
    Clear,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, agent: &mut Agent, config: &Config) -> Result<CommandResult> {
    let input = input.trim();
    let (cmd, args) = match input.split_once(' ') {
        Some((cmd, args)) => (cmd.to_lowercase(), args.trim()),
        None => (input.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "exit" | "quit" | "q" => Ok(CommandResult::Exit),

        "clear" | "reset" => {
            agent.clear_history();
            Ok(CommandResult::Clear)
        }

        "help" | "?" => Ok(CommandResult::Handled(help_text())),

        "status" => {
            let settings = agent.settings();
            let status = format!(
                "Counsel Status:\n\
                 ─────────────────────────────\n\
                 Model:        {}\n\
                 Provider:     {}\n\
                 Prompt:       {}\n\
                 Max steps:    {}\n\
                 Search limit: {}\n\
                 Output dir:   {}\n\
                 History:      {} messages",
                settings.model,
                agent.provider_name(),
                settings.system_prompt,
                settings.max_steps,
                settings.max_search_results,
                agent.tools().documents().output_dir().display(),
                agent.conversation_length(),
            );
            Ok(CommandResult::Handled(status))
        }

        "template" => Ok(CommandResult::Handled(handle_template_command(args, agent))),

        "config" => {
            let content = toml::to_string_pretty(config).unwrap_or_else(|e| format!("# {}", e));
            Ok(CommandResult::Handled(format!(
                "Config file: {}\n\n{}",
                Config::config_file().display(),
                content.trim_end()
            )))
        }

        _ => {
            // Not a command, treat as normal input
            if input.starts_with('/') {
                Ok(CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                )))
            } else {
                Ok(CommandResult::Continue(input.to_string()))
            }
        }
    }
}

/// Handle 'template' with or without a name
fn handle_template_command(args: &str, agent: &mut Agent) -> String {
    let names = PromptKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if args.is_empty() {
        return format!(
            "Current prompt: {}\nAvailable templates: {}",
            agent.settings().system_prompt,
            names
        );
    }

    match PromptKind::parse(args) {
        Some(kind) => {
            agent.set_system_prompt(SystemPrompt::Template(kind));
            format!("Prompt template set to: {} (new conversation started)", kind)
        }
        None => format!("Unknown template: {}. Available: {}", args, names),
    }
}

/// Generate help text
fn help_text() -> String {
    r#"Counsel Commands:
─────────────────────────────────────────────
  help, ?            Show this help message
  exit, quit, q      Exit Counsel
  clear, reset       Start a new conversation
  status             Show the active model and settings
  template [name]    Show or switch the system prompt template
                     (default, legal-document, legal-research, contract)
  config             Show the effective configuration

Keyboard Shortcuts:
  Ctrl+D             Exit Counsel

Tips:
  - Ask for a document ("draft an NDA ...") and you will be asked
    for the details before anything is written
  - Documents are saved as .docx in the configured output directory
─────────────────────────────────────────────"#
        .to_string()
}
