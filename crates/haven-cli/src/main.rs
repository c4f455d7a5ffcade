//! Interactive terminal session for the Haven companion.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use haven_application::Companion;
use haven_core::config::EngineConfig;
use haven_core::session::Session;
use haven_interaction::LocalApiAgent;

#[derive(Parser)]
#[command(name = "haven")]
#[command(about = "Haven - a supportive dialogue companion", long_about = None)]
struct Cli {
    /// Base URL of the OpenAI-compatible completion endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Model name passed through to the endpoint
    #[arg(long)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = EngineConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    let agent = Arc::new(LocalApiAgent::from_config(&config));
    let companion = Companion::new(agent, config);
    let mut session = Session::new();

    println!("\n{} {}\n", "Haven:".cyan().bold(), companion.welcome());

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(&"You: ".green().bold().to_string()) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                editor.add_history_entry(input)?;

                if input.eq_ignore_ascii_case("exit") {
                    say_goodbye(&companion, &mut session);
                    break;
                }

                let outcome = companion.process_turn(&mut session, input).await;
                println!("\n{} {}\n", "Haven:".cyan().bold(), outcome.display_text);

                if let Some(risk) = outcome.risk {
                    for resource in &risk.resources {
                        println!("{}", resource.red().bold());
                    }
                    println!();
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                say_goodbye(&companion, &mut session);
                break;
            }
            Err(err) => {
                eprintln!("{} {err}", "Input error:".red());
                break;
            }
        }
    }

    Ok(())
}

fn say_goodbye(companion: &Companion, session: &mut Session) {
    println!("\n{} {}", "Haven:".cyan().bold(), companion.farewell(session));
    println!("\n{}", "Session Summary:".bold());
    match serde_json::to_string_pretty(&session.summary()) {
        Ok(summary) => println!("{summary}"),
        Err(err) => eprintln!("Failed to render session summary: {err}"),
    }
}
