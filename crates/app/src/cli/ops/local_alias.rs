use std::path::PathBuf;

use clap::{Args, Subcommand};

use common::resource::{self, BucketLocalAliasConfig};

use super::lifecycle::{self, LifecycleError};
use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
pub struct LocalAliasArgs {
    #[arg(long)]
    pub bucket_id: String,

    /// Key the alias is visible to
    #[arg(long)]
    pub access_key_id: String,

    #[arg(long)]
    pub alias: String,
}

impl From<&LocalAliasArgs> for BucketLocalAliasConfig {
    fn from(args: &LocalAliasArgs) -> Self {
        Self {
            bucket_id: args.bucket_id.clone(),
            access_key_id: args.access_key_id.clone(),
            alias: args.alias.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    #[command(flatten)]
    pub desired: LocalAliasArgs,

    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketLocalAliasConfig::from(&self.desired);
        lifecycle::create(&resource::BucketLocalAlias, ctx, &config, self.state.as_deref()).await
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
        lifecycle::read(&resource::BucketLocalAlias, ctx, &self.state).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Update {
    #[command(flatten)]
    pub desired: LocalAliasArgs,

    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Update {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketLocalAliasConfig::from(&self.desired);
        lifecycle::update(&resource::BucketLocalAlias, ctx, &config, &self.state).await
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
        lifecycle::delete(&resource::BucketLocalAlias, ctx, &self.state).await
    }
}

crate::command_enum! {
    (Create, Create),
    (Read, Read),
    (Update, Update),
    (Delete, Delete),
}

#[derive(Args, Debug, Clone)]
pub struct LocalAlias {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for LocalAlias {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
