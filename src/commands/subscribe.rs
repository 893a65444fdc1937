//! Newsletter signup from the command line

use anyhow::Result;

use crate::newsletter::Newsletter;
use crate::Blog;

/// Subscribe an email address to the newsletter
pub async fn run(blog: &Blog, email: &str) -> Result<()> {
    let newsletter = Newsletter::new(&blog.config.newsletter);
    println!("Subscribing...");
    let subscription = newsletter.subscribe(email).await?;
    println!("Successfully subscribed {}!", subscription.email);
    println!("{}", subscription.message);
    Ok(())
}
