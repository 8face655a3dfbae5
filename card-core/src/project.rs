//! The root aggregate of one card design.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{Face, FaceId, FaceMap, SecurityProfile};

/// One card design: two independent faces plus its security profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardProject {
    /// Project display name.
    pub name: String,
    /// Front and back faces.
    pub faces: FaceMap<Face>,
    /// Enabled security features.
    pub security: SecurityProfile,
}

impl CardProject {
    /// Create a project with two empty faces and default security.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Borrow one face.
    #[must_use]
    pub fn face(&self, face: FaceId) -> &Face {
        &self.faces[face]
    }

    /// Total elements across both faces.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.faces.front.len() + self.faces.back.len()
    }
}

/// Snapshot handed to the save/publish collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// The design.
    pub project: CardProject,
    /// Face that was active when the snapshot was taken.
    pub active_face: FaceId,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
}

impl ProjectDocument {
    /// Wrap a project snapshot with the current time.
    #[must_use]
    pub fn new(project: CardProject, active_face: FaceId) -> Self {
        Self {
            project,
            active_face,
            timestamp: current_timestamp_ms(),
        }
    }
}

/// Get the current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
