pub mod bucket;
pub mod global_alias;
pub mod grant;
pub mod key;
mod lifecycle;
pub mod local_alias;
pub mod version;

pub use bucket::Bucket;
pub use global_alias::GlobalAlias;
pub use grant::Grant;
pub use key::Key;
pub use local_alias::LocalAlias;
pub use version::Version;
