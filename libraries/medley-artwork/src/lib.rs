//! Medley Artwork - Cover art resolution library
//!
//! Resolves cover images for tracks whose source does not ship one, by
//! consulting a chain of [`CoverProvider`]s in priority order.
//!
//! # Features
//!
//! - First-hit-wins provider chain
//! - Permanent memoization of hits and definitive misses
//! - Transient failures leave the cache untouched and get retried
//! - Bounded lookup concurrency with FIFO queueing
//! - In-flight deduplication per track
//!
//! # Example
//!
//! ```no_run
//! use medley_artwork::{CoverConfig, CoverResolver, CoverStatus};
//! # use medley_artwork::CoverProvider;
//! # use std::sync::Arc;
//! # async fn example(providers: Vec<Arc<dyn CoverProvider>>, track: medley_core::Track) {
//! let resolver = CoverResolver::new(providers, CoverConfig::default());
//!
//! match resolver.resolve(&track).await {
//!     Ok(CoverStatus::Resolved(url)) => println!("cover: {url}"),
//!     Ok(CoverStatus::Absent) => println!("no cover anywhere"),
//!     Ok(CoverStatus::Pending) => println!("lookup already running"),
//!     Err(e) => eprintln!("transient failure: {e}"),
//! }
//! # }
//! ```

mod error;
mod provider;
mod resolver;
mod store;
mod types;

// Re-export public API
pub use error::{CoverError, Result};
pub use provider::CoverProvider;
pub use resolver::CoverResolver;
pub use store::{CoverStore, MemoryCoverStore};
pub use types::{CoverConfig, CoverEntry, CoverStatus};
