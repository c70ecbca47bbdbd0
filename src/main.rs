use clap::Parser;
use xpost_scheduler::cli::{self, Cli, Command};
use xpost_scheduler::config::AppConfig;
use xpost_scheduler::infrastructure::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    match cli.command {
        Command::Limits => cli::limits::run(),
        Command::Due(args) => cli::due::run(args),
        Command::Import(args) => cli::import::run(&config, args).await,
        Command::Register(args) => cli::accounts::register(&config, args).await,
        Command::Plan(args) => cli::accounts::assign_plan(&config, args).await,
        Command::Consume(args) => cli::accounts::consume(&config, args).await,
        Command::GenKey => cli::secrets::gen_key(),
        Command::Mask { value } => cli::secrets::mask_value(&value),
    }
}
