/// Per-session counters
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub frames_with_nine_regions: u64,
    pub calibration_failures: u64,
    pub faces_scanned: u32,
    pub moves_completed: u32,
}

impl SessionStats {
    pub fn record_frame(&mut self, nine_regions: bool) {
        self.frames_processed += 1;
        if nine_regions {
            self.frames_with_nine_regions += 1;
        }
    }

    pub fn record_calibration_failure(&mut self) {
        self.calibration_failures += 1;
    }

    pub fn record_face_scanned(&mut self) {
        self.faces_scanned += 1;
    }

    pub fn record_move_completed(&mut self) {
        self.moves_completed += 1;
    }

    /// Share of frames in which the whole face was detected
    pub fn detection_rate(&self) -> f64 {
        if self.frames_processed == 0 {
            0.0
        } else {
            self.frames_with_nine_regions as f64 / self.frames_processed as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
