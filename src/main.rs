use anyhow::Result;
use califica::{
    config,
    moderation::{ModerationRequest, Moderator},
};
use std::io::Read;

/// Moderates text read from stdin and prints the verdict as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::from_env()?;
    let moderator = Moderator::from_config(config.moderation().clone())?;

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let mut request = ModerationRequest::new(text);
    if let Some(submitter) = std::env::args().nth(1) {
        request = request.with_submitter(submitter);
    }

    let verdict = moderator.moderate(&request).await;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
