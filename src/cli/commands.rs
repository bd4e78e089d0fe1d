use clap::Parser;

/// Chat with a tool-using agent.
///
/// Configuration comes from the environment (MODEL, APIKEY, MAX_TOKEN,
/// TIMEOUT, API_BASE_URL), a `.env` file, or `config/<CONFIG_ENV>.toml`.
/// Type `exit` to quit.
#[derive(Parser)]
#[command(name = "toolchat")]
#[command(author, version, about, long_about)]
pub struct Cli {}
