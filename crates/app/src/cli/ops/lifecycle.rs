//! Create/read/update/delete against a state file, shared by every resource
//! subcommand.

use std::path::Path;

use common::prelude::{Error, Resource};

use crate::cli::op::OpContext;
use crate::cli::state::{self, Persisted, StateFileError};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Api(#[from] Error),
    #[error(transparent)]
    StateFile(#[from] StateFileError),
}

pub async fn create<R>(
    resource: &R,
    ctx: &OpContext,
    config: &R::Config,
    state_file: Option<&Path>,
) -> Result<String, LifecycleError>
where
    R: Resource,
    R::State: Persisted,
{
    let client = ctx.client()?;
    let created = resource.create(&client, config).await?;
    tracing::info!(kind = R::KIND, id = created.id(), "created");
    record(&created, state_file)
}

/// Refresh the state in `state_file`. A resource the remote no longer knows
/// is dropped from the file and rendered as `null`. Resources refreshed from
/// local state alone need no host or token.
pub async fn read<R>(
    resource: &R,
    ctx: &OpContext,
    state_file: &Path,
) -> Result<String, LifecycleError>
where
    R: Resource,
    R::State: Persisted,
{
    let prior: R::State = state::load(state_file)?;
    let client = ctx.lazy_client();
    match resource.read(&client, prior.id(), &prior).await? {
        Some(current) => record(&current, Some(state_file)),
        None => {
            tracing::warn!(kind = R::KIND, id = prior.id(), "gone remotely, forgetting it");
            state::remove(state_file)?;
            Ok("null".to_string())
        }
    }
}

pub async fn update<R>(
    resource: &R,
    ctx: &OpContext,
    config: &R::Config,
    state_file: &Path,
) -> Result<String, LifecycleError>
where
    R: Resource,
    R::State: Persisted,
{
    let prior: R::State = state::load(state_file)?;
    let client = ctx.client()?;
    let updated = resource.update(&client, prior.id(), config, &prior).await?;
    record(&updated, Some(state_file))
}

pub async fn delete<R>(
    resource: &R,
    ctx: &OpContext,
    state_file: &Path,
) -> Result<String, LifecycleError>
where
    R: Resource,
    R::State: Persisted,
{
    let prior: R::State = state::load(state_file)?;
    let client = ctx.client()?;
    resource.delete(&client, prior.id()).await?;
    tracing::info!(kind = R::KIND, id = prior.id(), "deleted");
    state::remove(state_file)?;
    Ok(prior.id().to_string())
}

/// Print `state`, and persist it when a state file was given.
pub fn record<S: Persisted>(
    state: &S,
    state_file: Option<&Path>,
) -> Result<String, LifecycleError> {
    if let Some(path) = state_file {
        state::save(path, state)?;
    }
    Ok(state::render(state)?)
}
