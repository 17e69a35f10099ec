use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flightdesk_agents::LiveFlightAgent;
use flightdesk_core::{config::DEFAULT_ENV_FILE, load_env_file, AppConfig};
use flightdesk_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "flightdesk")]
#[command(about = "Answer flight-status questions from the terminal")]
struct Cli {
    #[arg(long, env = "FLIGHTDESK_ENV_FILE", default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer one free-text question, printed as {"answer": ...}.
    Ask { query: String },
    /// Print the raw flight record for a flight number.
    Lookup { flight_number: String },
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("flightdesk_cli");
    let cli = Cli::parse();

    load_env_file(&cli.env_file)?;
    let config = AppConfig::from_env().context("invalid flightdesk configuration")?;
    let agent = LiveFlightAgent::from_config(&config, AppMetrics::shared())?;

    match cli.command {
        Command::Ask { query } => {
            let answer = agent.answer(&query).await;
            println!("{}", serde_json::to_string(&answer)?);
        }
        Command::Lookup { flight_number } => match agent.flight_info(&flight_number).await {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("No information found for flight {flight_number}"),
        },
        Command::Chat => run_chat(&agent).await?,
    }

    Ok(())
}

async fn run_chat(agent: &LiveFlightAgent) -> Result<()> {
    println!("Flightdesk chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let answer = agent.answer(message).await;
        println!("\n{}\n", answer.text);
    }

    Ok(())
}
