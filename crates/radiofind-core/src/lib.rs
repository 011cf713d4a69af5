//! # radiofind-core
//!
//! Resolve a playable internet-radio stream URL from a station homepage and/or
//! a stale stream URL.
//!
//! Inputs are noisy: dead links, CDN redirects, template placeholders, pages
//! full of unrelated assets. The resolver turns them into one URL that was
//! verified live during the same call, or a documented failure listing what
//! was tried.
//!
//! ## Architecture
//!
//! - **URL helpers** ([`urls`]): absolutisation, origins, order-preserving dedup
//! - **Rule set** ([`heuristics`]): junk, stream-likeness, MIME and template patterns
//! - **Fetcher** ([`fetcher`]): the only network primitive, every call time-bounded
//! - **Discovery** ([`discovery`]): candidate generation and live probing
//! - **Content extraction** ([`playlist`], [`icecast`]): M3U/PLS and Icecast status JSON
//! - **Resolver** ([`resolver`]): strictly sequential, first verified success wins
//!
//! ## Quick Start
//!
//! ```no_run
//! use radiofind_core::{Config, ResolutionRequest, ResolveResponse, Resolver};
//!
//! # async fn example() -> radiofind_core::Result<()> {
//! let resolver = Resolver::new(&Config::load()?)?;
//! let request = ResolutionRequest::new("https://station.example", "", "Example FM");
//! let response = ResolveResponse::from(resolver.resolve(request).await);
//! if let Ok(json) = serde_json::to_string(&response) {
//!     println!("{json}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Resolution never fails: network faults and malformed content become
//! negative outcomes inside the pipeline. [`Error`] surfaces from
//! construction (bad configuration) and from [`Fetcher`] calls made directly.

/// Configuration loading and validation
pub mod config;
/// Stream discovery: candidates and probing
pub mod discovery;
/// Error types and result aliases
pub mod error;
/// Time-bounded HTTP access
pub mod fetcher;
/// Versioned heuristic rule set
pub mod heuristics;
/// Icecast status document parsing
pub mod icecast;
/// M3U/PLS playlist parsing
pub mod playlist;
/// End-to-end resolution
pub mod resolver;
/// Request, candidate and result types
pub mod types;
/// URL helpers
pub mod urls;

// Re-export commonly used types
pub use config::{Config, ResolverConfig};
pub use error::{Error, Result};
pub use fetcher::{FetchRequest, Fetcher, HttpResponse};
pub use heuristics::{Heuristics, HeuristicsConfig};
pub use resolver::Resolver;
pub use types::*;
