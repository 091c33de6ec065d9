use std::env;
use std::process;

use serverfs::fs::size::format_size;
use serverfs::{Config, FileManager};

const USAGE: &str = "Usage: cargo run --example ls -- [REMOTE_DIR]\n\
Reads SERVERFS_BASE_URL, SERVERFS_TOKEN and SERVERFS_SERVER_ID from the environment.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") || args.len() > 1 {
        eprintln!("{USAGE}");
        process::exit(1);
    }
    let dir = args.first().map(String::as_str).unwrap_or("/");

    let config = Config::from_env()?;
    let files = FileManager::connect(&config)?;
    files.navigate(dir).await?;

    for entry in files.snapshot().entries() {
        let marker = if entry.is_folder() { "d" } else { "-" };
        println!("{} {:>10}  {}", marker, format_size(entry.size), entry.name);
    }

    let usage = files.quota().refresh().await;
    println!(
        "\n{} of {} used ({:.1}%)",
        format_size(usage.used),
        format_size(usage.total),
        usage.percent()
    );
    Ok(())
}
