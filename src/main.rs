use clap::Parser;
use modelkey::command::configure::ConfigureCommand;
use modelkey::command::list::ListCommand;
use modelkey::command::show::ShowCommand;
use modelkey::config::cli::{Cli, Commands};
use modelkey::config::ModelKeyConfig;
use modelkey::error::ModelKeyError;
use modelkey::registry::ProviderRegistry;
use std::process;
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\x1b[91m\rerror:\x1b[0m {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), ModelKeyError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ModelKeyConfig::build(&cli)?;
    let registry = ProviderRegistry::builtin()?;

    match cli.command {
        Commands::List { json } => {
            ListCommand { json }.execute(registry, config.locale)?;
        }
        Commands::Configure { provider } => {
            let sink = config.sink()?;
            ConfigureCommand::new(registry, config.locale, sink.as_ref())
                .execute(provider)
                .await?;
        }
        Commands::Show => {
            let store = config.file_store()?;
            ShowCommand.execute(registry, &store, config.locale)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
