//! CLI module for xpost-scheduler
//!
//! Subcommands operate on the data layer directly:
//! - `limits`: print the plan limit table
//! - `due`: evaluate post schedules at an instant
//! - `import`: load a CSV post sheet into the configured store
//! - `register`, `plan`, `consume`: account sign-up and quota accounting
//! - `gen-key`, `mask`: secret handling helpers

pub mod accounts;
pub mod due;
pub mod import;
pub mod limits;
pub mod secrets;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::storage::{DocumentClient, StorageConfig, StorageFactory};

/// xpost-scheduler - subscription quotas and post scheduling
#[derive(Parser)]
#[command(name = "xpost-scheduler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print usage limits of every plan
    Limits,

    /// Evaluate post schedules at an instant
    Due(due::DueArgs),

    /// Import posts from a CSV sheet
    Import(import::ImportArgs),

    /// Register a social account (unsubscribed until a plan is assigned)
    Register(accounts::RegisterArgs),

    /// Move an account to another plan
    Plan(accounts::PlanArgs),

    /// Record one use of a channel and check the account's quota
    Consume(accounts::ConsumeArgs),

    /// Print a fresh base64 encryption key
    GenKey,

    /// Print a masked form of a value
    Mask { value: String },
}

/// Opens the configured store for commands that read back or keep records
pub(crate) async fn open_client(config: &AppConfig) -> anyhow::Result<DocumentClient> {
    let storage = StorageConfig::from_settings(&config.storage)?;
    if !storage.is_persistent() {
        warn!(
            "storage.backend is '{}': records start empty and are discarded on exit; \
             set storage.backend=postgres and storage.url to keep them",
            config.storage.backend
        );
    }

    let store = StorageFactory::create(&storage).await?;
    Ok(DocumentClient::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Plan;

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from(["xpost-scheduler", "plan", "--account", "x-1", "--plan", "basic"])
            .unwrap();

        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.account, "x-1");
                assert_eq!(args.plan, Plan::Basic);
            }
            _ => panic!("Expected plan command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_plan() {
        let result =
            Cli::try_parse_from(["xpost-scheduler", "plan", "--account", "x-1", "--plan", "gold"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_gen_key_and_mask() {
        let cli = Cli::try_parse_from(["xpost-scheduler", "gen-key"]).unwrap();
        assert!(matches!(cli.command, Command::GenKey));

        let cli = Cli::try_parse_from(["xpost-scheduler", "mask", "secret-token"]).unwrap();
        assert!(matches!(cli.command, Command::Mask { value } if value == "secret-token"));
    }

    #[tokio::test]
    async fn test_open_client_on_default_config() {
        let config = AppConfig::default();
        assert!(!StorageConfig::from_settings(&config.storage).unwrap().is_persistent());

        let client = open_client(&config).await.unwrap();
        assert!(client.load::<crate::domain::Account>("x-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_client_rejects_unknown_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "firestore".to_string();

        assert!(open_client(&config).await.is_err());
    }
}
