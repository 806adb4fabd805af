mod args;
mod audio;
mod batch;
mod config;
mod narration;
mod post;
mod reddit;
mod store;
mod subtitle;
mod tts;
mod video;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::batch::BatchRunner;
use crate::config::Config;
use crate::reddit::RedditClient;
use crate::video::NarratedVideoMaker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine; the variables may come from the shell
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    info!(
        "Starting AITA video batch: {} videos from the top of the {}",
        args.count, args.window
    );

    let maker = NarratedVideoMaker::new(args.background, args.piper_model, args.chunk_chars)?;
    let reddit = RedditClient::connect(&config).await?;
    let runner = BatchRunner::new(reddit, maker, args.store, args.out_dir);

    let created = runner.run(args.count, args.window).await?;

    println!("\nVideos created:");
    for video in &created {
        println!("\nTitle: {}", video.title);
        println!("Video saved as: {}", video.video_path.display());
        println!("Original post: {}", video.url);
    }
    info!("Process complete.");
    Ok(())
}
