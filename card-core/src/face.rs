//! The two printable sides of a card.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{DesignElement, ElementId};

/// Identifies one side of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceId {
    /// The recto side.
    Front,
    /// The verso side.
    Back,
}

impl FaceId {
    /// Both faces, front first.
    pub const ALL: [FaceId; 2] = [FaceId::Front, FaceId::Back];

    /// The opposite face.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Lowercase name, as used in logs and documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl std::fmt::Display for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per face, stored side by side.
///
/// Each face owns its slot outright; there is no way to obtain an alias of
/// one face's value through the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceMap<T> {
    /// Value for the front face.
    pub front: T,
    /// Value for the back face.
    pub back: T,
}

impl<T> FaceMap<T> {
    /// Build a map by calling `f` once per face.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(FaceId) -> T) -> Self {
        Self {
            front: f(FaceId::Front),
            back: f(FaceId::Back),
        }
    }

    /// Iterate `(face, value)` pairs, front first.
    pub fn iter(&self) -> impl Iterator<Item = (FaceId, &T)> {
        [(FaceId::Front, &self.front), (FaceId::Back, &self.back)].into_iter()
    }
}

impl<T> Index<FaceId> for FaceMap<T> {
    type Output = T;

    fn index(&self, face: FaceId) -> &T {
        match face {
            FaceId::Front => &self.front,
            FaceId::Back => &self.back,
        }
    }
}

impl<T> IndexMut<FaceId> for FaceMap<T> {
    fn index_mut(&mut self, face: FaceId) -> &mut T {
        match face {
            FaceId::Front => &mut self.front,
            FaceId::Back => &mut self.back,
        }
    }
}

/// Direction for moving an element within its face's stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMove {
    /// One step towards the viewer.
    Up,
    /// One step away from the viewer.
    Down,
    /// To the top of the stack.
    Top,
    /// To the bottom of the stack.
    Bottom,
}

/// The elements placed on one side of the card.
///
/// List order is stacking order: the first element is drawn first (bottom).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    elements: Vec<DesignElement>,
}

impl Face {
    /// Create an empty face.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements bottom to top.
    #[must_use]
    pub fn elements(&self) -> &[DesignElement] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the face has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&DesignElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut DesignElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub(crate) fn push(&mut self, element: DesignElement) {
        self.elements.push(element);
    }

    pub(crate) fn remove(&mut self, id: ElementId) -> Option<DesignElement> {
        self.position(id).map(|idx| self.elements.remove(idx))
    }

    /// Move an element in the stacking order. Returns `false` if `id` is absent.
    pub(crate) fn reorder(&mut self, id: ElementId, to: LayerMove) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let last = self.elements.len() - 1;
        let target = match to {
            LayerMove::Up => (idx + 1).min(last),
            LayerMove::Down => idx.saturating_sub(1),
            LayerMove::Top => last,
            LayerMove::Bottom => 0,
        };
        let element = self.elements.remove(idx);
        self.elements.insert(target, element);
        true
    }
}
