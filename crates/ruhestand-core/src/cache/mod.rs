//! Offline asset cache.
//!
//! Makes the last successfully fetched set of application shell assets
//! available without network:
//!
//! - `store`: namespaced disk buckets, one per manifest version
//! - `manifest`: the versioned asset list and its cache namespace
//! - `policy`: the pure fetch-or-cache decision function
//! - `proxy`: install/activate lifecycle and request resolution over HTTP

pub mod manifest;
pub mod policy;
pub mod proxy;
pub mod store;

pub use manifest::CacheManifest;
pub use policy::{classify, plan, Action, AssetRequest, CacheLookup, RequestKind};
pub use proxy::{CacheProxy, FetchedAsset, InstallReport};
pub use store::{Activation, AssetCache, CachedAsset};
