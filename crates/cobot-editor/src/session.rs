//! Transient state of one drag gesture.
//!
//! ```text
//! Idle -> Dragging(origin, payload) -> [insertion updates]* -> {Committed | Cancelled} -> Idle
//! ```
//!
//! The editor owns at most one [`DragSession`]. The placeholder lives inside
//! it, so dropping the session is all it takes to remove the placeholder.

use crate::block::{BlockId, BlockTemplate};

/// Where the dragged item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    Palette,
    Sequence,
}

/// What the gesture carries.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    /// Template for a new block.
    Palette(BlockTemplate),
    /// Existing block being relocated.
    Relocate(BlockId),
}

impl DragPayload {
    #[must_use]
    pub const fn origin(&self) -> DragOrigin {
        match self {
            Self::Palette(_) => DragOrigin::Palette,
            Self::Relocate(_) => DragOrigin::Sequence,
        }
    }

    /// Block being relocated, if any.
    #[must_use]
    pub const fn relocating(&self) -> Option<BlockId> {
        match self {
            Self::Palette(_) => None,
            Self::Relocate(id) => Some(*id),
        }
    }
}

/// In-flight drag: payload plus the pending insertion gap.
///
/// `placeholder` is a gap index into the block list: `g` means "before the
/// block at `g`", and `g == len` means "before the end anchor".
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub(crate) payload: DragPayload,
    pub(crate) placeholder: Option<usize>,
}

impl DragSession {
    pub(crate) const fn new(payload: DragPayload) -> Self {
        Self {
            payload,
            placeholder: None,
        }
    }

    #[must_use]
    pub const fn payload(&self) -> &DragPayload {
        &self.payload
    }

    #[must_use]
    pub const fn placeholder(&self) -> Option<usize> {
        self.placeholder
    }
}

/// Observable lifecycle state of the editor's drag machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        origin: DragOrigin,
        placeholder: Option<usize>,
    },
}
