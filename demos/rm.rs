use std::env;
use std::process;

use serverfs::{Config, FileManager};

const USAGE: &str = "Usage: cargo run --example rm -- <REMOTE_PATH>...";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let targets: Vec<String> = env::args().skip(1).collect();
    if targets.is_empty() {
        eprintln!("{USAGE}");
        process::exit(1);
    }

    let config = Config::from_env()?;
    let files = FileManager::connect(&config)?;

    let outcome = files.delete_many(&targets).await;
    println!("Deleted {} of {}", outcome.success_count, outcome.total());
    for (path, message) in &outcome.failures {
        eprintln!("  {}: {}", path, message);
    }
    if outcome.failure_count > 0 {
        process::exit(1);
    }
    Ok(())
}
