//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::HighlightConfig;
pub use site::NewsletterConfig;
