use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, error};

/// Synthesize `text` into a WAV file with the Piper CLI.
pub fn tts_generate_chunk(model: &Path, text: &str, out_path: &Path) -> anyhow::Result<()> {
    debug!("Calling Piper TTS for output file {}", out_path.display());
    let mut child = Command::new("piper")
        .arg("--model")
        .arg(model)
        .arg("--output_file")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to spawn piper: {e}"))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("failed to open piper stdin"))?;
        stdin.write_all(text.as_bytes())?;
    }
    // closes stdin so piper sees EOF
    drop(child.stdin.take());

    let status = child.wait()?;
    if !status.success() {
        error!("Piper TTS command failed for chunk: {}", out_path.display());
        anyhow::bail!("TTS engine failed for chunk, command returned non-zero");
    }
    Ok(())
}
