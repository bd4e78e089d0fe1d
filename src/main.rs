use anyhow::Result;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use toolchat::cli::Cli;
use toolchat::{utils, Session, Settings, TurnOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _cli = Cli::parse();

    let settings = Settings::new()?;
    init_tracing(&settings.logging.level);

    if let Err(e) = settings.validate() {
        utils::display::print_error(&e.to_string());
        return Err(e.into());
    }

    let max_turns = settings.agent.max_turns;
    let mut session = Session::from_settings(settings)?;

    let result = run(&mut session, max_turns).await;
    if let Err(e) = &result {
        utils::display::print_error(&format!("Session ended: {}", e));
    }
    result
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(session: &mut Session, max_turns: usize) -> Result<()> {
    utils::display::print_header("Tool-calling Agent");
    utils::display::print_info("Type your messages (\"exit\" to quit)\n");

    // The model opens the conversation
    let opening = session.turn(None).await?;
    if report(&opening) {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    for _ in 0..max_turns {
        utils::display::print_prompt("User: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        let outcome = session.turn(Some(input)).await?;
        if report(&outcome) {
            break;
        }
    }

    tracing::info!("Session finished with {} messages", session.memory().len());
    Ok(())
}

/// Print what the user has not seen yet. Returns true when the session should end.
fn report(outcome: &TurnOutcome) -> bool {
    if !outcome.rendered && !outcome.reply.is_empty() {
        utils::display::print_reply(&outcome.reply);
    }
    for dispatch in outcome.dispatched.iter().filter(|d| !d.ends_session) {
        utils::display::print_info(&format!("[{}] {}", dispatch.tool_name, dispatch.result));
    }
    outcome.terminated
}
