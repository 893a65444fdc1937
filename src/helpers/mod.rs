//! Helper functions shared by the CLI and the server
//!
//! Date parsing and formatting, landing-page lists and URL building.

mod date;
mod list;
mod url;

pub use date::*;
pub use list::*;
pub use url::*;
