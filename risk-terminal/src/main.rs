mod console;

use clap::Parser;
use risk_flow::{ClientConfig, HttpPredictionClient, ResponsePolicy, Session, SubmitOutcome};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use console::{Command, HELP, parse, render_fields, render_form, render_state};

#[derive(Parser, Debug)]
#[command(name = "risk-terminal", version, about = "Interactive heart risk intake console")]
struct Args {
    /// Prediction endpoint (overrides $RISK_PREDICTION_URL)
    #[arg(long)]
    endpoint: Option<String>,
    /// Treat responses without a result as errors
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "risk_terminal=warn,risk_flow=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if args.strict {
        config = config.with_response_policy(ResponsePolicy::Strict);
    }

    let client = Arc::new(HttpPredictionClient::from_config(&config));
    let session = Session::new(client, config.response_policy);
    debug!(session_id = %session.id, policy = ?config.response_policy, "Console session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Heart Health Analyzer - predictions from {}", config.endpoint);
    println!("Fields marked * are required. Type 'help' for commands.\n");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Fields) => println!("{}", render_fields()),
            Ok(Command::Show) => {
                println!("{}", render_form(&session.form()));
                println!("{}", render_state(&session.state()));
            }
            Ok(Command::Set { name, value }) => {
                if let Err(e) = session.update(&name, value) {
                    println!("{}", e);
                }
            }
            Ok(Command::Clear { name }) => {
                if let Err(e) = session.update(&name, "") {
                    println!("{}", e);
                }
            }
            Ok(Command::Submit) => {
                println!("Analyzing...");
                match session.submit().await {
                    SubmitOutcome::Resolved(state) => println!("{}", render_state(&state)),
                    SubmitOutcome::Ignored => println!("A submission is already in progress."),
                }
            }
            Err(message) if message.is_empty() => {}
            Err(message) => println!("{}", message),
        }
    }

    Ok(())
}
