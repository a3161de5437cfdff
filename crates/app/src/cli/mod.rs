pub mod args;
pub mod op;
pub mod ops;
pub mod state;

pub use ops::{Bucket, GlobalAlias, Grant, Key, LocalAlias, Version};
