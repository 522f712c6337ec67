use super::{OverlayFrame, OverlayRenderer};
use crate::error::{CubecamError, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Receives the annotated view of every processed frame
pub trait OverlaySink: Send {
    fn present(&mut self, image: &RgbImage, overlay: &OverlayFrame) -> Result<()>;
}

/// Discards overlays
#[derive(Debug, Default)]
pub struct NullOverlaySink;

impl OverlaySink for NullOverlaySink {
    fn present(&mut self, _image: &RgbImage, overlay: &OverlayFrame) -> Result<()> {
        debug!(
            "Frame {}: {} overlay commands",
            overlay.frame_id,
            overlay.commands.len()
        );
        Ok(())
    }
}

/// Renders overlays and writes one PNG per frame into a directory
pub struct ImageDirectorySink {
    dir: PathBuf,
    renderer: OverlayRenderer,
}

impl ImageDirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P, renderer: OverlayRenderer) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!("Writing annotated frames to {}", dir.display());
        Ok(Self {
            dir,
            renderer,
        })
    }

    pub fn frame_path(&self, frame_id: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", frame_id))
    }
}

impl OverlaySink for ImageDirectorySink {
    fn present(&mut self, image: &RgbImage, overlay: &OverlayFrame) -> Result<()> {
        let annotated = self.renderer.render(image, overlay);
        let path = self.frame_path(overlay.frame_id);
        annotated.save(&path).map_err(|e| {
            CubecamError::component(
                "overlay",
                format!("Failed to write {}: {}", path.display(), e),
            )
        })?;
        Ok(())
    }
}
