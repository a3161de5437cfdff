use std::path::PathBuf;

use clap::{Args, Subcommand};

use common::resource::{self, BucketConfig};

use super::lifecycle::{self, LifecycleError};
use crate::cli::op::{Op, OpContext};

/// Desired bucket attributes. Quotas left out are removed remotely.
#[derive(Args, Debug, Clone)]
pub struct BucketArgs {
    /// Serve the bucket as a static website
    #[arg(long)]
    pub website: bool,

    /// Required with --website
    #[arg(long)]
    pub index_document: Option<String>,

    #[arg(long)]
    pub error_document: Option<String>,

    /// Maximum size in bytes
    #[arg(long)]
    pub max_size: Option<u64>,

    #[arg(long)]
    pub max_objects: Option<u64>,
}

impl From<&BucketArgs> for BucketConfig {
    fn from(args: &BucketArgs) -> Self {
        Self {
            website_access_enabled: args.website,
            website_config_index_document: args.index_document.clone(),
            website_config_error_document: args.error_document.clone(),
            quota_max_size: args.max_size,
            quota_max_objects: args.max_objects,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    #[command(flatten)]
    pub desired: BucketArgs,

    /// Write the resulting state here
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketConfig::from(&self.desired);
        lifecycle::create(&resource::Bucket, ctx, &config, self.state.as_deref()).await
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
        lifecycle::read(&resource::Bucket, ctx, &self.state).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Update {
    #[command(flatten)]
    pub desired: BucketArgs,

    #[arg(long)]
    pub state: PathBuf,
}

#[async_trait::async_trait]
impl Op for Update {
    type Error = LifecycleError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let config = BucketConfig::from(&self.desired);
        lifecycle::update(&resource::Bucket, ctx, &config, &self.state).await
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
        lifecycle::delete(&resource::Bucket, ctx, &self.state).await
    }
}

/// Adopt a bucket that already exists
#[derive(Args, Debug, Clone)]
pub struct Import {
    /// Bucket id
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
        let state = resource::Bucket.import(&client, &self.id).await?;
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

pub type BucketCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Bucket {
    #[command(subcommand)]
    pub command: BucketCommand,
}

#[async_trait::async_trait]
impl Op for Bucket {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
