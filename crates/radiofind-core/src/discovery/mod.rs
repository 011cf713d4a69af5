//! Stream discovery for a station.
//!
//! Turns a homepage and/or a stale stream hint into a prioritised list of
//! candidate URLs, and decides whether a given URL is live audio.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use radiofind_core::discovery::{CandidateGenerator, Prober};
//! use radiofind_core::{Config, Fetcher, Heuristics, ResolutionRequest};
//!
//! # async fn example() -> radiofind_core::Result<()> {
//! let config = Config::default();
//! let fetcher = Fetcher::new(&config.resolver)?;
//! let rules = Arc::new(Heuristics::from_config(&config.heuristics)?);
//!
//! let generator = CandidateGenerator::new(fetcher.clone(), rules.clone(), &config.resolver);
//! let prober = Prober::new(fetcher, rules, &config.resolver);
//!
//! let request = ResolutionRequest::new("https://station.example", "", "Example FM");
//! for candidate in generator.generate(&request).await {
//!     let verdict = prober.probe(&candidate.url).await;
//!     println!("{} {:?} -> {}", candidate.tier.rank(), candidate.kind, verdict.ok);
//! }
//! # Ok(())
//! # }
//! ```

pub mod candidates;
pub mod extract;
pub mod probe;

pub use candidates::{CandidateGenerator, HomepageDocument};
pub use extract::{extract_bare_urls, extract_link_targets};
pub use probe::{ProbeStep, Prober, head_accepts, range_accepts};
