//! Install/activate lifecycle and request resolution.
//!
//! The proxy executes the plans produced by [`policy`](crate::cache::policy)
//! against a [`reqwest`] client and the disk store. Network failures fall
//! back to cached content silently; only a total miss surfaces an error.

use futures::stream::{self, StreamExt};
use reqwest::{Client, Method};
use tracing::{debug, info, warn};

use crate::cache::manifest::CacheManifest;
use crate::cache::policy::{classify, plan, Action, AssetRequest, CacheLookup};
use crate::cache::store::AssetCache;
use crate::error::ProxyError;

/// Maximum concurrent asset downloads during install.
const MAX_CONCURRENT_FETCHES: usize = 4;

/// Outcome of pre-fetching the manifest into its namespace.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub namespace: String,
    pub stored: usize,
    /// Asset paths that could not be fetched.
    pub failed: Vec<String>,
}

/// A response served by the proxy, from cache or fresh off the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub from_cache: bool,
}

pub struct CacheProxy {
    cache: AssetCache,
    manifest: CacheManifest,
    http: Client,
    origin: String,
}

impl CacheProxy {
    pub fn new(cache: AssetCache, manifest: CacheManifest) -> Result<Self, ProxyError> {
        let origin = manifest
            .origin()
            .ok_or_else(|| ProxyError::InvalidManifest(format!("bad base URL: {}", manifest.base_url)))?;
        let http = Client::builder().build()?;
        Ok(Self {
            cache,
            manifest,
            http,
            origin,
        })
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Fetch and store every manifest asset, then mark this version
    /// active. Takeover is immediate; per-asset failures are reported, not
    /// fatal, and stale namespaces are left for [`Self::activate`].
    pub async fn install(&self) -> InstallReport {
        let namespace = self.manifest.namespace();

        let results: Vec<(String, Result<(), ProxyError>)> =
            stream::iter(self.manifest.assets.clone())
                .map(|asset| {
                    let url = self.manifest.asset_url(&asset);
                    let namespace = namespace.clone();
                    async move {
                        let outcome = self.store_from_network(&namespace, &url).await;
                        (asset, outcome)
                    }
                })
                .buffer_unordered(MAX_CONCURRENT_FETCHES)
                .collect()
                .await;

        let mut report = InstallReport {
            namespace: namespace.clone(),
            stored: 0,
            failed: Vec::new(),
        };
        for (asset, outcome) in results {
            match outcome {
                Ok(()) => report.stored += 1,
                Err(err) => {
                    warn!(asset = %asset, error = %err, "failed to pre-fetch asset");
                    report.failed.push(asset);
                }
            }
        }

        if let Err(err) = self.cache.mark_active(&namespace) {
            warn!(error = %err, "failed to record cache activation");
        }
        info!(
            namespace = %namespace,
            stored = report.stored,
            failed = report.failed.len(),
            "cache install finished"
        );
        report
    }

    /// Delete every cache namespace except the current version's.
    /// Afterwards exactly one namespace exists.
    pub fn activate(&self) -> anyhow::Result<usize> {
        self.cache.purge_except(&self.manifest.namespace())
    }

    /// Resolve one request through the fetch-or-cache policy.
    pub async fn fetch(&self, request: AssetRequest) -> Result<FetchedAsset, ProxyError> {
        let kind = classify(&request, &self.origin);
        let namespace = self.manifest.namespace();

        let cached = match self.cache.read(&namespace, &request.url) {
            Ok(cached) => cached,
            Err(err) => {
                warn!(url = %request.url, error = %err, "cache read failed, treating as miss");
                None
            }
        };
        let lookup = if cached.is_some() {
            CacheLookup::Hit
        } else {
            CacheLookup::Miss
        };

        match plan(kind, lookup) {
            Action::Passthrough => {
                let (content_type, body) = self.get_network(request.method.clone(), &request.url).await?;
                Ok(FetchedAsset {
                    content_type,
                    body,
                    from_cache: false,
                })
            }
            Action::NetworkThenCacheRoot => match self.get_network(Method::GET, &request.url).await {
                Ok((content_type, body)) => {
                    let root_key = self.manifest.root_url();
                    if let Err(err) = self.cache.write(&namespace, &root_key, content_type.as_deref(), &body) {
                        warn!(error = %err, "failed to refresh cached root document");
                    }
                    Ok(FetchedAsset {
                        content_type,
                        body,
                        from_cache: false,
                    })
                }
                Err(err) => {
                    debug!(url = %request.url, error = %err, "navigation fetch failed, serving cached root");
                    self.cached_root(&namespace)
                }
            },
            Action::ServeCached => {
                let asset = cached.ok_or_else(|| ProxyError::NotCached(request.url.clone()))?;
                Ok(FetchedAsset {
                    content_type: asset.content_type,
                    body: asset.body,
                    from_cache: true,
                })
            }
            Action::FetchThenStore => match self.get_network(Method::GET, &request.url).await {
                Ok((content_type, body)) => {
                    if let Err(err) = self.cache.write(&namespace, &request.url, content_type.as_deref(), &body) {
                        warn!(url = %request.url, error = %err, "failed to store fetched asset");
                    }
                    Ok(FetchedAsset {
                        content_type,
                        body,
                        from_cache: false,
                    })
                }
                Err(err) => {
                    debug!(url = %request.url, error = %err, "asset fetch failed, serving cached root");
                    self.cached_root(&namespace)
                }
            },
            Action::FetchOnly => match self.get_network(Method::GET, &request.url).await {
                Ok((content_type, body)) => Ok(FetchedAsset {
                    content_type,
                    body,
                    from_cache: false,
                }),
                Err(err) => {
                    debug!(url = %request.url, error = %err, "cross-origin fetch failed, serving cached root");
                    self.cached_root(&namespace)
                }
            },
        }
    }

    async fn store_from_network(&self, namespace: &str, url: &str) -> Result<(), ProxyError> {
        let (content_type, body) = self.get_network(Method::GET, url).await?;
        self.cache
            .write(namespace, url, content_type.as_deref(), &body)
            .map_err(|err| ProxyError::Cache(err.to_string()))
    }

    async fn get_network(
        &self,
        method: Method,
        url: &str,
    ) -> Result<(Option<String>, Vec<u8>), ProxyError> {
        let response = self.http.request(method, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus(status));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();
        Ok((content_type, body))
    }

    /// Last-resort offline fallback: the cached root document.
    fn cached_root(&self, namespace: &str) -> Result<FetchedAsset, ProxyError> {
        let key = self.manifest.root_url();
        match self.cache.read(namespace, &key) {
            Ok(Some(asset)) => Ok(FetchedAsset {
                content_type: asset.content_type,
                body: asset.body,
                from_cache: true,
            }),
            Ok(None) => Err(ProxyError::NotCached(key)),
            Err(err) => Err(ProxyError::Cache(err.to_string())),
        }
    }
}
