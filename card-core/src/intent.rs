//! Payloads delivered by the side panels.
//!
//! Panels never touch the store directly. They produce a [`PanelIntent`],
//! which the store resolves against the face that is active at the moment
//! the intent is applied.

use serde::{Deserialize, Serialize};

use crate::store::Action;
use crate::{DesignElement, ElementId, ElementPatch, ElementVariant, FaceId, LayerMove, SecurityFeature};

/// Elements panel drop: create an element of `kind` named `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertIntent {
    /// Element family.
    #[serde(rename = "type")]
    pub kind: ElementVariant,
    /// Display label.
    pub label: String,
}

/// Properties panel edit of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEdit {
    /// Element to edit.
    pub element_id: ElementId,
    /// Fields to change.
    pub patch: ElementPatch,
}

/// Security panel toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityToggle {
    /// Feature to flip.
    pub feature_id: SecurityFeature,
}

/// Any intent a panel can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum PanelIntent {
    /// Elements panel insertion.
    Insert(InsertIntent),
    /// Properties panel edit.
    Edit(PropertyEdit),
    /// Layers panel deletion.
    Remove {
        /// Element to delete.
        element_id: ElementId,
    },
    /// Layers panel restacking.
    Reorder {
        /// Element to move.
        element_id: ElementId,
        /// Direction.
        to: LayerMove,
    },
    /// Layers panel selection.
    Select {
        /// Element to select, or `None` to clear.
        element_id: Option<ElementId>,
    },
    /// Security panel toggle.
    Security(SecurityToggle),
}

impl PanelIntent {
    /// Resolve the intent into a store action on `face`.
    #[must_use]
    pub fn into_action(self, face: FaceId) -> Action {
        match self {
            Self::Insert(InsertIntent { kind, label }) => Action::InsertElement {
                face,
                element: DesignElement::with_defaults(kind, &label),
            },
            Self::Edit(PropertyEdit { element_id, patch }) => Action::UpdateElement {
                face,
                id: element_id,
                patch,
            },
            Self::Remove { element_id } => Action::RemoveElement {
                face,
                id: element_id,
            },
            Self::Reorder { element_id, to } => Action::ReorderElement {
                face,
                id: element_id,
                to,
            },
            Self::Select { element_id } => Action::SelectElement(element_id),
            Self::Security(SecurityToggle { feature_id }) => {
                Action::ToggleSecurityFeature(feature_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardProject, DesignStore, ElementKind};

    #[test]
    fn test_insert_intent_targets_active_face() {
        let store = DesignStore::new(CardProject::new("intents"));
        store.flip_face();
        store.apply_intent(PanelIntent::Insert(InsertIntent {
            kind: ElementVariant::Code,
            label: "Member QR".to_string(),
        }));
        store.read(|s| {
            assert!(s.face(FaceId::Front).is_empty());
            let back = s.face(FaceId::Back).elements();
            assert_eq!(back.len(), 1);
            assert!(matches!(back[0].kind, ElementKind::Code { .. }));
            assert_eq!(back[0].name, "Member QR");
        });
    }

    #[test]
    fn test_property_edit_applies_patch() {
        let store = DesignStore::new(CardProject::new("intents"));
        let id = store.insert_element(
            FaceId::Front,
            DesignElement::with_defaults(ElementVariant::Shape, "Band"),
        );
        store.apply_intent(PanelIntent::Edit(PropertyEdit {
            element_id: id,
            patch: ElementPatch {
                opacity: Some(0.5),
                ..ElementPatch::default()
            },
        }));
        let opacity = store.read(|s| s.face(FaceId::Front).get(id).map(|e| e.opacity));
        assert_eq!(opacity, Some(0.5));
    }

    #[test]
    fn test_security_intent_from_json() {
        let intent: PanelIntent =
            serde_json::from_str(r#"{"intent": "security", "featureId": "uv_ink"}"#)
                .expect("valid intent");
        let store = DesignStore::new(CardProject::new("intents"));
        store.apply_intent(intent);
        assert!(store.read(|s| s.security().uv_ink));
    }

    #[test]
    fn test_insert_intent_from_json() {
        let intent: PanelIntent =
            serde_json::from_str(r#"{"intent": "insert", "type": "line", "label": "Divider"}"#)
                .expect("valid intent");
        assert_eq!(
            intent,
            PanelIntent::Insert(InsertIntent {
                kind: ElementVariant::Line,
                label: "Divider".to_string(),
            })
        );
    }
}
