//! Audio retrieval for video analysis
//!
//! Thin wrapper around the external `yt-dlp` utility. One attempt per
//! download, short socket timeout; a failure is reported and the caller may
//! re-trigger manually.

use crate::error::{AnalystError, Result};
use std::path::PathBuf;
use tokio::process::Command;

const OUTPUT_BASE: &str = "temp_audio";
const AUDIO_EXTENSIONS: [&str; 3] = ["m4a", "webm", "mp3"];
const SOCKET_TIMEOUT_SECS: u32 = 10;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Downloads the audio track of a video URL into the working directory
pub struct AudioDownloader {
    output_dir: PathBuf,
}

impl AudioDownloader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn candidate_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        AUDIO_EXTENSIONS
            .iter()
            .map(|ext| self.output_dir.join(format!("{OUTPUT_BASE}.{ext}")))
    }

    /// Remove leftovers from a previous run.
    async fn clean_stale(&self) {
        for path in self.candidate_paths() {
            let _ = tokio::fs::remove_file(&path).await;
        }
    }

    /// Download the best audio track for `url`, returning the local path.
    pub async fn download(&self, url: &str) -> Result<PathBuf> {
        self.clean_stale().await;

        let template = self.output_dir.join(format!("{OUTPUT_BASE}.%(ext)s"));
        tracing::info!(url, "downloading audio track");

        let status = Command::new("yt-dlp")
            .arg("--format")
            .arg("bestaudio[ext=m4a]/best")
            .arg("--output")
            .arg(&template)
            .arg("--quiet")
            .arg("--socket-timeout")
            .arg(SOCKET_TIMEOUT_SECS.to_string())
            .arg("--user-agent")
            .arg(USER_AGENT)
            .arg(url)
            .status()
            .await
            .map_err(|e| AnalystError::Media(format!("failed to spawn yt-dlp: {e}")))?;

        if !status.success() {
            return Err(AnalystError::Media(format!(
                "yt-dlp exited with status {status}"
            )));
        }

        for path in self.candidate_paths() {
            if path.exists() {
                return Ok(path);
            }
        }
        Err(AnalystError::Media(
            "yt-dlp reported success but produced no audio file".to_string(),
        ))
    }
}

/// Guess the upload MIME type from the downloaded file extension.
pub fn mime_for_path(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("m4a") => "audio/mp4",
        Some("mp3") => "audio/mpeg",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("temp_audio.m4a")), "audio/mp4");
        assert_eq!(mime_for_path(Path::new("temp_audio.mp3")), "audio/mpeg");
        assert_eq!(mime_for_path(Path::new("temp_audio.webm")), "audio/webm");
        assert_eq!(
            mime_for_path(Path::new("temp_audio.unknown")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_candidate_paths_cover_known_extensions() {
        let downloader = AudioDownloader::new("/tmp");
        let paths: Vec<_> = downloader.candidate_paths().collect();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].to_string_lossy().ends_with("temp_audio.m4a"));
    }
}
