use super::face::FaceId;
use crate::error::ScanError;
use crate::vision::FaceGrid;
use tracing::{debug, info};

/// Collects one grid per face, keyed by center color
#[derive(Debug, Clone, Default)]
pub struct ScanOrchestrator {
    faces: [Option<FaceGrid>; 6],
}

impl ScanOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a stable grid to the face named by its center color.
    /// Returns the newly bound face; rescans of a bound face are ignored.
    pub fn observe(&mut self, grid: &FaceGrid) -> Option<FaceId> {
        let face = FaceId::from_center_color(grid.center_color())?;
        let slot = &mut self.faces[face.string_index()];
        if slot.is_some() {
            debug!("Face {} already scanned, ignoring", face);
            return None;
        }

        *slot = Some(grid.clone());
        info!(
            "Scanned {} face ({}), {} remaining",
            face,
            grid,
            self.pending_faces().len()
        );
        Some(face)
    }

    pub fn needs_scan(&self, face: FaceId) -> bool {
        self.faces[face.string_index()].is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.faces.iter().all(Option::is_some)
    }

    pub fn scanned_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    /// Faces still waiting for a scan, in cube string order
    pub fn pending_faces(&self) -> Vec<FaceId> {
        FaceId::STRING_ORDER
            .iter()
            .copied()
            .filter(|face| self.needs_scan(*face))
            .collect()
    }

    pub fn grid(&self, face: FaceId) -> Option<&FaceGrid> {
        self.faces[face.string_index()].as_ref()
    }

    /// Flatten the six faces into the 54-letter cube string (U L F R B D, row-major)
    pub fn to_cube_string(&self) -> Result<String, ScanError> {
        let mut cube = String::with_capacity(54);
        for face in FaceId::STRING_ORDER {
            match self.grid(face) {
                Some(grid) => cube.push_str(&grid.letters()),
                None => {
                    return Err(ScanError::Incomplete {
                        missing: self.pending_faces(),
                    })
                }
            }
        }
        Ok(cube)
    }

    /// Forget every binding so the cube can be scanned again
    pub fn reset(&mut self) {
        self.faces = Default::default();
        info!("Scan state reset");
    }
}
