//! Interactive REPL for Counsel
//!
//! Provides the main user interaction loop.

use std::io::{self, BufRead, Write};

use crate::agent::Agent;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::{Config, Result};

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Agent,
    config: Config,
}

impl Repl {
    /// Create a REPL with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            agent: Agent::with_config(&config)?,
            config,
        })
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("You: ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            match handle_command(input, &mut self.agent, &self.config) {
                Ok(CommandResult::Exit) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(CommandResult::Clear) => {
                    println!("Started a new conversation.\n");
                }
                Ok(CommandResult::Handled(output)) => {
                    println!("{}\n", output);
                }
                Ok(CommandResult::Continue(input)) => match self.agent.process(&input).await {
                    Ok(response) => {
                        println!("\nCounsel:\n{}\n", response);
                    }
                    Err(e) => {
                        tracing::error!("agent run failed: {}", e);
                        eprintln!("\nError: {}\n", e);
                    }
                },
                Err(e) => {
                    eprintln!("Command error: {}\n", e);
                }
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        let settings = self.agent.settings();

        println!(
            r#"
╔═══════════════════════════════════════════════════════════╗
║                                                           ║
║   COUNSEL                                                 ║
║   Legal Drafting Assistant                                ║
║                                                           ║
╚═══════════════════════════════════════════════════════════╝
"#
        );
        println!("Model:      {}", settings.model);
        println!("Prompt:     {}", settings.system_prompt);
        println!(
            "Documents:  {}",
            self.agent.tools().documents().output_dir().display()
        );
        println!();
        println!("Commands: help, clear, status, template, config, exit");
        println!("───────────────────────────────────────────────────────────");
    }
}
