use crate::error::{FrameError, Result};
use crate::frame::FrameData;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Supplies frames to the session loop; `None` ends the stream
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<FrameData>>;

    fn name(&self) -> &str;
}

/// Replays image files from a directory in lexical order. Files are handed
/// over still encoded; decoding happens in the frame loop.
pub struct DirectoryFrameSource {
    dir: PathBuf,
    files: VecDeque<PathBuf>,
    next_id: u64,
    pacing: Option<Interval>,
}

impl DirectoryFrameSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(FrameError::MissingDirectory {
                path: dir.display().to_string(),
            }
            .into());
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        info!("Found {} frames in {}", files.len(), dir.display());
        Ok(Self {
            dir,
            files: files.into(),
            next_id: 0,
            pacing: None,
        })
    }

    /// Deliver at most `fps` frames per second; 0 disables pacing
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.pacing = if fps == 0 {
            None
        } else {
            let mut ticker = interval(Duration::from_secs_f64(1.0 / fps as f64));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        };
        self
    }

    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

#[async_trait]
impl FrameSource for DirectoryFrameSource {
    async fn next_frame(&mut self) -> Result<Option<FrameData>> {
        while let Some(path) = self.files.pop_front() {
            if let Some(ticker) = self.pacing.as_mut() {
                ticker.tick().await;
            }

            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    debug!("Read frame {} from {}", id, path.display());
                    return Ok(Some(FrameData::encoded(id, bytes, path.display().to_string())));
                }
                Err(e) => warn!("Skipping unreadable frame {}: {}", path.display(), e),
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        self.dir.to_str().unwrap_or("frames")
    }
}

/// In-memory frame queue, for replays assembled in code
#[derive(Default)]
pub struct MemoryFrameSource {
    frames: VecDeque<FrameData>,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<FrameData>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

#[async_trait]
impl FrameSource for MemoryFrameSource {
    async fn next_frame(&mut self) -> Result<Option<FrameData>> {
        Ok(self.frames.pop_front())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
