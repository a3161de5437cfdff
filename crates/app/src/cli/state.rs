//! Declared state persisted between invocations as JSON files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use common::resource::{
    AccessKeyState, BucketGlobalAliasState, BucketKeyGrantState, BucketLocalAliasState,
    BucketState,
};

#[derive(Debug, thiserror::Error)]
pub enum StateFileError {
    #[error("failed to access state file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("state file {path} is not valid state: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// State that carries the identity later lifecycle calls address it by.
pub trait Persisted: Serialize + DeserializeOwned + Send + Sync {
    fn id(&self) -> &str;
}

macro_rules! persisted {
    ($($state:ty),* $(,)?) => {
        $(
            impl Persisted for $state {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

persisted!(
    BucketState,
    AccessKeyState,
    BucketKeyGrantState,
    BucketGlobalAliasState,
    BucketLocalAliasState,
);

pub fn render<S: Serialize>(state: &S) -> Result<String, StateFileError> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn load<S: DeserializeOwned>(path: &Path) -> Result<S, StateFileError> {
    let raw = fs::read_to_string(path).map_err(|source| StateFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StateFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save<S: Serialize>(path: &Path, state: &S) -> Result<(), StateFileError> {
    let rendered = render(state)?;
    fs::write(path, rendered + "\n").map_err(|source| StateFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Forget a resource. A file that is already gone is fine.
pub fn remove(path: &Path) -> Result<(), StateFileError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StateFileError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
