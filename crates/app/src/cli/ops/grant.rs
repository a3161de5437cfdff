use std::path::PathBuf;

use clap::{Args, Subcommand};

use common::permissions::BucketKeyPermissions;
use common::resource::{self, BucketKeyGrantConfig};

use super::lifecycle::{self, LifecycleError};
use crate::cli::op::{Op, OpContext};

/// The full desired flag set; flags left out are denied.
#[derive(Args, Debug, Clone)]
pub struct GrantArgs {
    #[arg(long)]
    pub bucket_id: String,

    #[arg(long)]
    pub access_key_id: String,

    #[arg(long)]
    pub read: bool,

    #[arg(long)]
    pub write: bool,

    #[arg(long)]
    pub owner: bool,
}

impl From<&GrantArgs> for BucketKeyGrantConfig {
    fn from(args: &GrantArgs) -> Self {
        Self {
            bucket_id: args.bucket_id.clone(),
            access_key_id: args.access_key_id.clone(),
            permissions: BucketKeyPermissions::new(args.read, args.write, args.owner),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    #[command(flatten)]
    pub desired: GrantArgs,

    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketKeyGrantConfig::from(&self.desired);
        lifecycle::create(&resource::BucketKeyGrant, ctx, &config, self.state.as_deref()).await
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
        lifecycle::read(&resource::BucketKeyGrant, ctx, &self.state).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Update {
    #[command(flatten)]
    pub desired: GrantArgs,

    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Update {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketKeyGrantConfig::from(&self.desired);
        lifecycle::update(&resource::BucketKeyGrant, ctx, &config, &self.state).await
    }
}

/// Deny every flag on the grant
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
        lifecycle::delete(&resource::BucketKeyGrant, ctx, &self.state).await
    }
}

crate::command_enum! {
    (Create, Create),
    (Read, Read),
    (Update, Update),
    (Delete, Delete),
}

pub type GrantCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Grant {
    #[command(subcommand)]
    pub command: GrantCommand,
}

#[async_trait::async_trait]
impl Op for Grant {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
