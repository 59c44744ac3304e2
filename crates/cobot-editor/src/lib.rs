#![forbid(unsafe_code)]

//! Sequence editor for cobot programs.
//!
//! A program is a linear list of command blocks between fixed start/end
//! anchors. [`SequenceEditor`] owns that list and the single drag session
//! that edits it: dragging new blocks in from the palette, relocating
//! existing ones, and tracking the pointer to place a shared placeholder at
//! the pending insertion gap.
//!
//! The crate has no DOM dependency. Element geometry enters through the
//! [`TrackLayout`] collaborator; the rendered track is a projection of
//! [`SequenceEditor::slots`].

pub mod block;
pub mod program;
pub mod sequence;
pub mod session;
pub mod signal;

pub use block::{Block, BlockId, BlockParams, BlockTemplate, CommandKind};
pub use program::{ProgramCommand, ProgramDocument, ProgramError};
pub use sequence::{
    CancelledDrag, DragNoopReason, DragStart, DropOutcome, InsertionUpdate, SequenceEditor,
    SequenceError, Slot, TrackLayout,
};
pub use session::{DragOrigin, DragPayload, DragSession, DragState};
pub use signal::ChangeSignal;
