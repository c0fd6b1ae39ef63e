pub mod clock;
pub mod config;
pub mod error;
pub mod plist;
pub mod release;
pub mod runner;
pub mod semver;
pub mod ui;
pub mod vcs;

pub use error::{BumpError, Result};
