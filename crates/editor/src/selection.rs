//! Selection and gizmo drag state machine
//!
//! ```text
//!            pick object            pick handle, button held
//!   Idle ─────────────────▶ Selected ─────────────────────────▶ Dragging
//!    ▲                       │  ▲                                  │
//!    └──── pick nothing ─────┘  └──────────── release ─────────────┘
//! ```
//!
//! Picking an object from any state selects it. Picking nothing from any
//! state clears the selection. Handles only exist while something is
//! selected, so a handle hit in `Idle` is ignored.

use scene::{GizmoAxis, HitKind, HitResult, ObjectId};

/// What a pick result refers to once slots are resolved to ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickTarget {
    Nothing,
    Object(ObjectId),
    Handle(GizmoAxis),
}

impl PickTarget {
    /// Resolve a raw hit. `object_at` maps a buffer slot to the id living
    /// there; a slot that no longer holds an object resolves to nothing.
    pub fn resolve(hit: HitResult, object_at: impl Fn(usize) -> Option<ObjectId>) -> Self {
        match hit.kind {
            HitKind::None => PickTarget::Nothing,
            HitKind::Object => usize::try_from(hit.index)
                .ok()
                .and_then(object_at)
                .map_or(PickTarget::Nothing, PickTarget::Object),
            HitKind::GizmoArrow | HitKind::GizmoLine => {
                GizmoAxis::from_index(hit.index).map_or(PickTarget::Nothing, PickTarget::Handle)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(ObjectId),
    Dragging { id: ObjectId, axis: GizmoAxis },
}

impl Selection {
    #[must_use]
    pub fn on_pick(
        self,
        hit: HitResult,
        object_at: impl Fn(usize) -> Option<ObjectId>,
        button_held: bool,
    ) -> Self {
        self.on_target(PickTarget::resolve(hit, object_at), button_held)
    }

    #[must_use]
    pub fn on_target(self, target: PickTarget, button_held: bool) -> Self {
        match (self.id(), target) {
            (_, PickTarget::Nothing) => Selection::Idle,
            (_, PickTarget::Object(id)) => Selection::Selected(id),
            (Some(id), PickTarget::Handle(axis)) if button_held => Selection::Dragging { id, axis },
            (Some(id), PickTarget::Handle(_)) => Selection::Selected(id),
            (None, PickTarget::Handle(_)) => Selection::Idle,
        }
    }

    /// Pointer released. Ends a drag and keeps the object selected.
    #[must_use]
    pub fn on_release(self) -> Self {
        match self {
            Selection::Dragging { id, .. } => Selection::Selected(id),
            other => other,
        }
    }

    /// The object `removed` left the scene.
    #[must_use]
    pub fn on_removed(self, removed: ObjectId) -> Self {
        if self.id() == Some(removed) {
            Selection::Idle
        } else {
            self
        }
    }

    pub fn id(self) -> Option<ObjectId> {
        match self {
            Selection::Idle => None,
            Selection::Selected(id) | Selection::Dragging { id, .. } => Some(id),
        }
    }

    pub fn drag_axis(self) -> Option<GizmoAxis> {
        match self {
            Selection::Dragging { axis, .. } => Some(axis),
            _ => None,
        }
    }
}
