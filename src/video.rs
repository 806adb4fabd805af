use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::audio::wav_duration_seconds;
use crate::narration::chunk_text;
use crate::subtitle::{build_srt_entries, write_srt};
use crate::tts::tts_generate_chunk;

/// Renders narrated videos from text.
pub trait VideoMaker {
    /// Render a narrated video of `text` to `out`.
    fn create_video(&self, text: &str, out: &Path) -> anyhow::Result<()>;

    /// Burn captions for `text` into `video`, writing the result to `out`.
    fn add_captions(&self, video: &Path, text: &str, out: &Path) -> anyhow::Result<()>;
}

/// Piper narration over a background clip, muxed and captioned with ffmpeg.
pub struct NarratedVideoMaker {
    background: PathBuf,
    piper_model: PathBuf,
    chunk_chars: usize,
}

impl NarratedVideoMaker {
    pub fn new(background: PathBuf, piper_model: PathBuf, chunk_chars: usize) -> anyhow::Result<Self> {
        if !background.exists() {
            anyhow::bail!("Background video not found: {}", background.display());
        }
        info!("Background video found: {}", background.display());
        if chunk_chars == 0 {
            anyhow::bail!("chunk size must be at least 1 character");
        }
        Ok(Self {
            background,
            piper_model,
            chunk_chars,
        })
    }
}

/// Scratch directory holding the narration of `video`, next to it.
fn work_dir_for(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = video.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!(".work_{stem}"))
}

fn part_path(work_dir: &Path, index: usize) -> PathBuf {
    work_dir.join(format!("part_{:03}.wav", index))
}

fn run_ffmpeg(args: &[&str], current_dir: Option<&Path>) -> anyhow::Result<bool> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner").arg("-loglevel").arg("error").args(args);
    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }
    debug!("ffmpeg {}", args.join(" "));
    let status = cmd
        .status()
        .map_err(|e| anyhow::anyhow!("failed to run ffmpeg: {e}"))?;
    Ok(status.success())
}

/// Join the parts listed in `files.txt` into `combined.wav`.
fn concat_wavs(work_dir: &Path, codec: &[&str]) -> anyhow::Result<bool> {
    let mut args = vec!["-y", "-f", "concat", "-safe", "0", "-i", "files.txt"];
    args.extend_from_slice(codec);
    args.push("combined.wav");
    run_ffmpeg(&args, Some(work_dir))
}

fn path_str(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid path: {}", path.display()))
}

/// Escape a path for use inside an ffmpeg filter argument.
fn filter_escape(path: &str) -> String {
    path.replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

impl VideoMaker for NarratedVideoMaker {
    fn create_video(&self, text: &str, out: &Path) -> anyhow::Result<()> {
        let chunks = chunk_text(text, self.chunk_chars);
        info!("Split narration into {} chunks", chunks.len());

        let work_dir = work_dir_for(out);
        if work_dir.exists() {
            info!("Removing existing work dir '{}'", work_dir.display());
            fs::remove_dir_all(&work_dir)?;
        }
        fs::create_dir_all(&work_dir)?;

        let concat_list = work_dir.join("files.txt");
        let mut list = File::create(&concat_list)?;
        for (i, chunk) in chunks.iter().enumerate() {
            let part = part_path(&work_dir, i);
            info!(
                "Generating TTS chunk {}/{} ({} chars)",
                i + 1,
                chunks.len(),
                chunk.len()
            );
            tts_generate_chunk(&self.piper_model, chunk, &part)?;
            writeln!(list, "file 'part_{:03}.wav'", i)?;
        }
        list.flush()?;
        drop(list);

        if !concat_wavs(&work_dir, &["-c", "copy"])? {
            warn!("ffmpeg concat with copy failed; retrying with re-encode");
            if !concat_wavs(&work_dir, &["-c:a", "pcm_s16le"])? {
                anyhow::bail!("ffmpeg failed to concatenate WAV files");
            }
        }

        let combined = work_dir.join("combined.wav");
        info!("Merging narration with background into {}", out.display());
        let ok = run_ffmpeg(
            &[
                "-y",
                "-i",
                path_str(&self.background)?,
                "-i",
                path_str(&combined)?,
                "-vf",
                "scale=1080:1920",
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-r",
                "60",
                "-shortest",
                path_str(out)?,
            ],
            None,
        )?;
        if !ok {
            anyhow::bail!("ffmpeg failed to produce video {}", out.display());
        }
        info!("Video written to {}", out.display());
        Ok(())
    }

    fn add_captions(&self, video: &Path, text: &str, out: &Path) -> anyhow::Result<()> {
        let work_dir = work_dir_for(video);
        let chunks = chunk_text(text, self.chunk_chars);

        let mut timed = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.into_iter().enumerate() {
            let part = part_path(&work_dir, i);
            if !part.exists() {
                anyhow::bail!(
                    "narration for {} not found at {}; render the video first",
                    video.display(),
                    part.display()
                );
            }
            let dur = wav_duration_seconds(&part)?;
            debug!("Chunk {} duration: {:.2} seconds", i, dur);
            timed.push((dur, chunk));
        }

        let entries = build_srt_entries(&timed);
        let srt_path = work_dir.join("subs.srt");
        info!("Writing {} captions to {}", entries.len(), srt_path.display());
        write_srt(&srt_path, &entries)?;

        let filter = format!(
            "subtitles={}:force_style='Fontsize=28,OutlineColour=&H000000&,Outline=3,Shadow=0'",
            filter_escape(path_str(&srt_path)?)
        );
        let ok = run_ffmpeg(
            &[
                "-y",
                "-i",
                path_str(video)?,
                "-vf",
                filter.as_str(),
                "-c:v",
                "libx264",
                "-c:a",
                "copy",
                path_str(out)?,
            ],
            None,
        )?;
        if !ok {
            anyhow::bail!("ffmpeg failed to caption {}", video.display());
        }

        fs::remove_dir_all(&work_dir)?;
        info!("Captioned video written to {}", out.display());
        Ok(())
    }
}
