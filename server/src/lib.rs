pub mod aggregator;
pub mod compiler;
pub mod db;
pub mod profile;
pub mod sink;
pub mod types;

pub use aggregator::{aggregate, identify};
pub use compiler::compile;
pub use profile::{manifest_for, stats_for};
