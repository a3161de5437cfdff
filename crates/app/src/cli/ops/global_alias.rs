use std::path::PathBuf;

use clap::{Args, Subcommand};

use common::resource::{self, BucketGlobalAliasConfig};

use super::lifecycle::{self, LifecycleError};
use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
pub struct GlobalAliasArgs {
    #[arg(long)]
    pub bucket_id: String,

    /// Cluster-wide bucket name
    #[arg(long)]
    pub alias: String,
}

impl From<&GlobalAliasArgs> for BucketGlobalAliasConfig {
    fn from(args: &GlobalAliasArgs) -> Self {
        Self {
            bucket_id: args.bucket_id.clone(),
            alias: args.alias.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    #[command(flatten)]
    pub desired: GlobalAliasArgs,

    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketGlobalAliasConfig::from(&self.desired);
        lifecycle::create(&resource::BucketGlobalAlias, ctx, &config, self.state.as_deref()).await
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
        lifecycle::read(&resource::BucketGlobalAlias, ctx, &self.state).await
    }
}

/// Only succeeds when nothing changed; a different alias needs delete and create
#[derive(Args, Debug, Clone)]
pub struct Update {
    #[command(flatten)]
    pub desired: GlobalAliasArgs,

    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Update {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketGlobalAliasConfig::from(&self.desired);
        lifecycle::update(&resource::BucketGlobalAlias, ctx, &config, &self.state).await
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
        lifecycle::delete(&resource::BucketGlobalAlias, ctx, &self.state).await
    }
}

crate::command_enum! {
    (Create, Create),
    (Read, Read),
    (Update, Update),
    (Delete, Delete),
}

#[derive(Args, Debug, Clone)]
pub struct GlobalAlias {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for GlobalAlias {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
