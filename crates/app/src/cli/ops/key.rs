use std::path::PathBuf;

use clap::{Args, Subcommand};

use common::permissions::KeyPermissions;
use common::resource::{self, AccessKeyConfig};

use super::lifecycle::{self, LifecycleError};
use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Defaults remotely when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Import this credential pair instead of generating one
    #[arg(long, requires = "secret_access_key")]
    pub access_key_id: Option<String>,

    #[arg(long, requires = "access_key_id")]
    pub secret_access_key: Option<String>,

    /// Whether the key may create buckets; untouched when omitted
    #[arg(long)]
    pub create_bucket: Option<bool>,
}

impl From<&KeyArgs> for AccessKeyConfig {
    fn from(args: &KeyArgs) -> Self {
        Self {
            name: args.name.clone(),
            access_key_id: args.access_key_id.clone(),
            secret_access_key: args.secret_access_key.clone(),
            permissions: args
                .create_bucket
                .map(|create_bucket| KeyPermissions { create_bucket }),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    #[command(flatten)]
    pub desired: KeyArgs,

    /// Write the resulting state, secret included, here
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = AccessKeyConfig::from(&self.desired);
        lifecycle::create(&resource::AccessKey, ctx, &config, self.state.as_deref()).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Read {
    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Read {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        lifecycle::read(&resource::AccessKey, ctx, &self.state).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Update {
    #[command(flatten)]
    pub desired: KeyArgs,

    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Update {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = AccessKeyConfig::from(&self.desired);
        lifecycle::update(&resource::AccessKey, ctx, &config, &self.state).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Delete {
    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Delete {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        lifecycle::delete(&resource::AccessKey, ctx, &self.state).await
    }
}

/// Adopt a key that already exists. Its secret is only recorded if the
/// remote reveals it.
#[derive(Args, Debug, Clone)]
pub struct Import {
    /// Access key id
    pub id: String,

    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[async_trait::async_trait]
impl Op for Import {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client()?;
        let state = resource::AccessKey.import_existing(&client, &self.id).await?;
        lifecycle::record(&state, self.state.as_deref())
    }
}

crate::command_enum! {
    (Create, Create),
    (Read, Read),
    (Update, Update),
    (Delete, Delete),
    (Import, Import),
}

pub type KeyCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Key {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[async_trait::async_trait]
impl Op for Key {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
