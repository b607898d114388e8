//! The hierarchical gather engine.
//!
//! A gather cycle is a tree walk. Each level takes the candidate names found
//! in its parent's response, keeps the ones its [`Whitelist`] allows, builds
//! one child address per name, and fetches them on a bounded [`pool`] of
//! workers. Every fetched response is handed to the level's handler, which
//! either recurses into the next level or emits records.
//!
//! ```text
//! gather(level 1) ──▶ pool ──▶ fetch ──▶ gather(level 2) ──▶ pool ──▶ fetch ──▶ emit
//! ```
//!
//! A failed fetch only skips its own branch. Errors travel back up through
//! the pool's completion signals and are returned to the driver.

mod level;
pub mod pool;
mod whitelist;

pub use level::{gather, Child, LevelConfig, DEFAULT_WORKERS};
pub use pool::{Drained, WorkerPanic};
pub use whitelist::{filter, Whitelist};

use async_trait::async_trait;
use url::Url;

use crate::GatherError;

/// Fetches and decodes the resource at one address.
///
/// Implementations carry their own timeout, TLS and auth settings and are
/// shared read-only by every worker of a cycle.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Decoded response body.
    type Response: Send + 'static;

    /// Fetch one address. A failure ends the branch rooted there.
    async fn fetch(&self, address: &Url) -> Result<Self::Response, GatherError>;
}

/// Compose a child address: the parent, the escaped candidate name as one
/// path segment, then fixed suffix segments.
///
/// ```rust
/// use lagwatch_adapters::gather::child_address;
/// use url::Url;
///
/// let cluster = Url::parse("http://burrow:8000/v2/kafka/local/consumer").unwrap();
/// let lag = child_address(&cluster, "team/billing", &["lag"]).unwrap();
/// assert_eq!(lag.as_str(), "http://burrow:8000/v2/kafka/local/consumer/team%2Fbilling/lag");
/// ```
pub fn child_address(parent: &Url, name: &str, suffix: &[&str]) -> Result<Url, GatherError> {
    let mut address = parent.clone();
    address
        .path_segments_mut()
        .map_err(|_| GatherError::Config {
            target: redacted(parent),
            reason: "address cannot have path segments".to_string(),
        })?
        .pop_if_empty()
        .push(name)
        .extend(suffix);
    Ok(address)
}

/// Render an address for logs and errors, without its password.
pub fn redacted(address: &Url) -> String {
    if address.password().is_some() {
        let mut address = address.clone();
        let _ = address.set_password(Some("redacted"));
        address.to_string()
    } else {
        address.to_string()
    }
}
