mod error;
mod manifest;
mod stats;
mod streak;
mod timeline;
mod year;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "client")]
pub mod openai;

pub use error::*;
pub use manifest::*;
pub use stats::*;
pub use streak::*;
pub use timeline::*;
pub use year::*;

pub use strum::IntoEnumIterator;

pub type GithubHandle = String;
