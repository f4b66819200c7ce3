pub mod conversion;
pub mod graph;
mod invariants;
pub mod snapshot;

pub use conversion::*;
pub use graph::*;
pub use snapshot::*;
