//! Command implementations for the radiofind CLI

mod candidates;
mod probe;
mod resolve;
mod serve;

pub use candidates::execute as list_candidates;
pub use probe::execute as probe_url;
pub use resolve::execute as resolve;
pub use serve::execute as serve;
