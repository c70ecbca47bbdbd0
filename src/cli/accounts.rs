use std::sync::Arc;

use chrono::Utc;
use clap::{Args, ValueEnum};

use crate::config::AppConfig;
use crate::domain::{Channel, Plan};
use crate::infrastructure::crypto::Argon2Hasher;
use crate::infrastructure::services::{AccountService, QuotaService, RegisterAccountRequest};

use super::open_client;
use super::secrets::configured_cipher;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub spread_id: String,

    #[arg(long, env = "XPOST_PASSWORD", default_value = "")]
    pub password: String,

    #[arg(long, env = "XPOST_ACCESS_TOKEN", default_value = "")]
    pub access_token: String,

    #[arg(long, env = "XPOST_ACCESS_SECRET", default_value = "")]
    pub access_secret: String,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[arg(long)]
    pub account: String,

    /// unsubscribed, free, basic or pro
    #[arg(long)]
    pub plan: Plan,
}

#[derive(Args, Debug)]
pub struct ConsumeArgs {
    #[arg(long)]
    pub account: String,

    #[arg(long, value_enum, default_value_t = ChannelArg::Api)]
    pub channel: ChannelArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    Gui,
    Api,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Gui => Channel::Gui,
            ChannelArg::Api => Channel::Api,
        }
    }
}

pub async fn register(config: &AppConfig, args: RegisterArgs) -> anyhow::Result<()> {
    let mut service = AccountService::new(open_client(config).await?, Arc::new(Argon2Hasher::new()));
    if let Some(cipher) = configured_cipher(config)? {
        service = service.with_cipher(cipher);
    }

    let request = RegisterAccountRequest {
        id: args.id,
        spread_id: args.spread_id,
        password: args.password,
        access_token: args.access_token,
        access_secret: args.access_secret,
    };

    let account = service.register(request, &[]).await?;
    println!("{}\t{}\t{}", account.id, account.uuid, account.subscribed);
    Ok(())
}

pub async fn assign_plan(config: &AppConfig, args: PlanArgs) -> anyhow::Result<()> {
    let service = QuotaService::new(open_client(config).await?);

    let subscription = service.assign_plan(&args.account, args.plan).await?;
    println!(
        "{}\t{}\tgui={}\tapi={}",
        subscription.account_id(),
        subscription.plan(),
        subscription.managed(Channel::Gui).limit(),
        subscription.managed(Channel::Api).limit()
    );
    Ok(())
}

pub async fn consume(config: &AppConfig, args: ConsumeArgs) -> anyhow::Result<()> {
    let service = QuotaService::new(open_client(config).await?);

    let decision = service
        .consume(&args.account, args.channel.into(), &Utc::now())
        .await?;
    println!(
        "{}\t{}\t{}/{}\t{}",
        decision.account_id,
        decision.channel,
        decision.used,
        decision.limit,
        if decision.allowed { "allowed" } else { "over limit" }
    );

    if !decision.allowed {
        anyhow::bail!("Quota exceeded for {}", decision.account_id);
    }
    Ok(())
}
