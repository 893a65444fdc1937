//! Newsletter signup

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::NewsletterConfig;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap();
}

/// Newsletter signup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsletterError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Newsletter service unavailable: {0}")]
    Unavailable(String),
}

/// A confirmed subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub email: String,
    pub message: String,
}

/// Where subscriptions are delivered
pub trait SubscriptionBackend: Send + Sync {
    fn submit(&self, email: &str) -> Result<(), NewsletterError>;
}

/// Backend that accepts every address
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SubscriptionBackend for AcceptAll {
    fn submit(&self, email: &str) -> Result<(), NewsletterError> {
        tracing::debug!("Accepted subscription for {}", email);
        Ok(())
    }
}

/// Newsletter signup flow: validate, wait for the service, submit
#[derive(Clone)]
pub struct Newsletter {
    delay: Duration,
    backend: Arc<dyn SubscriptionBackend>,
}

impl Newsletter {
    pub fn new(config: &NewsletterConfig) -> Self {
        Self::with_backend(config, Arc::new(AcceptAll))
    }

    pub fn with_backend(config: &NewsletterConfig, backend: Arc<dyn SubscriptionBackend>) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            backend,
        }
    }

    /// Subscribe an address
    pub async fn subscribe(&self, email: &str) -> Result<Subscription, NewsletterError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(NewsletterError::InvalidEmail(email.to_string()));
        }

        tokio::time::sleep(self.delay).await;
        self.backend.submit(email)?;

        tracing::info!("Subscribed {} to the newsletter", email);
        Ok(Subscription {
            email: email.to_string(),
            message: "Thank you for subscribing to our newsletter.".to_string(),
        })
    }
}

/// Check the basic shape of an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl SubscriptionBackend for Offline {
        fn submit(&self, _email: &str) -> Result<(), NewsletterError> {
            Err(NewsletterError::Unavailable("connection refused".to_string()))
        }
    }

    fn instant() -> NewsletterConfig {
        NewsletterConfig { delay_ms: 0 }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("dev@example.com"));
        assert!(is_valid_email("first.last+news@mail.example.co.uk"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a @example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn test_subscribe_success() {
        let newsletter = Newsletter::new(&instant());
        let sub = newsletter.subscribe("  dev@example.com ").await.unwrap();
        assert_eq!(sub.email, "dev@example.com");
    }

    #[tokio::test]
    async fn test_subscribe_invalid_email() {
        let newsletter = Newsletter::new(&instant());
        let err = newsletter.subscribe("nope").await.unwrap_err();
        assert_eq!(err, NewsletterError::InvalidEmail("nope".to_string()));
    }

    #[tokio::test]
    async fn test_subscribe_backend_failure() {
        let newsletter = Newsletter::with_backend(&instant(), Arc::new(Offline));
        let err = newsletter.subscribe("dev@example.com").await.unwrap_err();
        assert!(matches!(err, NewsletterError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_waits_for_delay() {
        let newsletter = Newsletter::new(&NewsletterConfig { delay_ms: 1000 });
        let start = tokio::time::Instant::now();
        newsletter.subscribe("dev@example.com").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
