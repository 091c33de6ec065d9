use std::env;
use std::process;

use serverfs::{Config, FileManager, ProgressCallback, UploadPayload, UploadTask};

const USAGE: &str = "Usage: cargo run --example upload -- <REMOTE_DIR> <LOCAL_FILE>...";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{USAGE}");
        process::exit(1);
    }

    let config = Config::from_env()?;
    let files = FileManager::connect(&config)?;
    files.navigate(&args[0]).await?;

    let mut payloads = Vec::new();
    for local in &args[1..] {
        payloads.push(UploadPayload::from_path(local).await?);
    }

    let progress: ProgressCallback = Box::new(|task: &UploadTask| {
        println!("{:>3}% {} ({})", task.progress_percent, task.name, task.speed);
    });

    match files.upload_with_progress(payloads, Some(progress)).await {
        Ok(created) => println!("Uploaded {} files", created.len()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
    Ok(())
}
