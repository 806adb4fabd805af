use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::narration::format_for_narration;
use crate::post::{Post, TimeWindow, VideoResult};
use crate::reddit::{PostSource, fetch_candidates};
use crate::store::save_new_posts;
use crate::video::VideoMaker;

/// Where the rendered and captioned videos for `post_id` are written.
pub fn output_paths(out_dir: &Path, post_id: &str) -> (PathBuf, PathBuf) {
    let base = format!("aita_video_{post_id}");
    (
        out_dir.join(format!("{base}.mp4")),
        out_dir.join(format!("{base}_captioned.mp4")),
    )
}

pub struct BatchRunner<S, V> {
    source: S,
    maker: V,
    store: PathBuf,
    out_dir: PathBuf,
}

impl<S: PostSource, V: VideoMaker> BatchRunner<S, V> {
    pub fn new(source: S, maker: V, store: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            source,
            maker,
            store,
            out_dir,
        }
    }

    /// Fetch, record and render up to `count` posts that have not been seen
    /// before. Fetch and store errors abort the batch; a post that fails to
    /// render is logged and skipped.
    pub async fn run(&self, count: usize, window: TimeWindow) -> anyhow::Result<Vec<VideoResult>> {
        // headroom for posts dropped by the filter or already stored
        let limit = count.saturating_mul(2);
        let candidates = fetch_candidates(&self.source, window, limit).await?;
        let new_posts = save_new_posts(&self.store, candidates)?;
        if new_posts.is_empty() {
            warn!("No new posts to turn into videos");
        }

        let mut created = Vec::new();
        for (i, post) in new_posts.iter().take(count).enumerate() {
            info!("Creating video {}/{} - Post ID: {}", i + 1, count, post.id);
            match self.render(post) {
                Ok(result) => {
                    info!("Post {} done: {}", result.post_id, result.video_path.display());
                    created.push(result);
                }
                Err(e) => {
                    error!("Error creating video for post {}: {:#}", post.id, e);
                    continue;
                }
            }
        }
        info!("Created {} of {} videos", created.len(), count);
        Ok(created)
    }

    fn render(&self, post: &Post) -> anyhow::Result<VideoResult> {
        let text = format_for_narration(post);
        let (video_path, captioned_path) = output_paths(&self.out_dir, &post.id);
        fs::create_dir_all(&self.out_dir)?;

        self.maker.create_video(&text, &video_path)?;
        self.maker.add_captions(&video_path, &text, &captioned_path)?;

        Ok(VideoResult {
            post_id: post.id.clone(),
            title: post.title.clone(),
            video_path: captioned_path,
            url: post.url.clone(),
        })
    }
}
