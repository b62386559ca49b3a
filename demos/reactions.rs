//! Fetches a fact, a quote and a few reactions.
//!
//! This example shows how to:
//! - Create a client with a token
//! - Handle the describing endpoints (`fact`, `quote`) via `Outcome`
//! - Handle the raising reaction endpoints via `Result`
//! - Issue several calls concurrently
//!
//! Run with: `cargo run --example reactions -- <token> [reaction...]`

use waifu_api::{Client, Error, Outcome, Reaction};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("waifu_api=debug,reactions=info")
        .init();

    let mut args = std::env::args().skip(1);
    let token = args.next();
    let client = Client::new(token.as_deref())?;

    println!("=== Fact ===");
    match client.get_fact().await {
        Ok(Outcome::Found(fact)) => println!("#{}: {}", fact.id, fact.fact),
        Ok(Outcome::Failed(failure)) => {
            println!("{} (status {})", failure.error, failure.status_code)
        }
        Err(Error::MissingToken) => {
            eprintln!("Usage: reactions <token> [reaction...]");
            return Ok(());
        }
        Err(e) => println!("Error: {}", e),
    }
    println!();

    println!("=== Quote ===");
    match client.get_quote().await? {
        Outcome::Found(quote) => println!("\"{}\" - {} ({})", quote.quote, quote.author, quote.anime),
        Outcome::Failed(failure) => println!("{} (status {})", failure.error, failure.status_code),
    }
    println!();

    println!("=== Reactions ===");
    let mut reactions = Vec::new();
    for name in args {
        match name.parse::<Reaction>() {
            Ok(reaction) => reactions.push(reaction),
            Err(e) => eprintln!("{}", e),
        }
    }
    if reactions.is_empty() {
        reactions = vec![Reaction::Hug, Reaction::Wave, Reaction::Pat];
    }

    let handles: Vec<_> = reactions
        .into_iter()
        .map(|reaction| {
            let client = client.clone();
            tokio::spawn(async move { (reaction, client.reaction(reaction).await) })
        })
        .collect();

    for handle in handles {
        match handle.await {
            Ok((reaction, Ok(body))) => println!("{}: {}", reaction, body),
            Ok((reaction, Err(e))) => println!("{}: {}", reaction, e),
            Err(e) => eprintln!("task failed: {}", e),
        }
    }

    Ok(())
}
