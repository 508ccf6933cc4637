use clap::{Parser, Subcommand};

use crate::error::ModelKeyError;
use crate::locale::Locale;
use crate::registry::ProviderKey;

#[derive(Parser)]
#[command(name = "modelkey")]
#[command(about = "Configure credentials for AI model providers", long_about = None, version)]
pub struct Cli {
    /// Display language (`en`, `zh-Hans`); defaults to $LANG
    #[arg(short = 'l', long, env = "MODELKEY_LOCALE", value_parser = parse_locale, global = true)]
    pub locale: Option<Locale>,

    /// Workspace backend to submit credentials to, instead of the local file
    #[arg(long, env = "MODELKEY_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "MODELKEY_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported providers
    List {
        /// Print the provider cards as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enter and validate credentials for a provider
    Configure {
        /// Provider to configure; prompts for one when omitted
        #[arg(value_enum)]
        provider: Option<ProviderKey>,
    },
    /// Show configured providers with secrets masked
    Show,
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    s.parse().map_err(|e: ModelKeyError| e.to_string())
}
