//! Sequence editor: ordered block list with drag-and-drop insertion.
//!
//! The editor keeps the program as an in-memory `Vec<Block>` framed by two
//! implicit anchors (start/end of program). The rendered track is a
//! projection of [`SequenceEditor::slots`]; the only thing read back from
//! the rendered tree is element geometry, through [`TrackLayout`], when a
//! pointer position has to be mapped to a gap in the list.
//!
//! # Invariants
//!
//! 1. Anchors are never part of the block list, so they are always first and
//!    last in the projection and can be neither dragged nor deleted.
//! 2. At most one drag session exists; the placeholder lives inside it.
//! 3. Every gesture end (`commit_drop`, `cancel_drag`) leaves the editor idle
//!    with no placeholder, whichever branch ran.
//! 4. `cancel_drag` never touches the block list.
//! 5. The change signal is raised on every structural mutation.
//!
//! # Failure modes
//!
//! Interaction problems (stale drops, unmounted anchors, unrecognizable
//! palette templates) are reported as [`DragNoopReason`]s, never as errors.

use std::fmt;

use cobot_core::Span;
use serde_json::{Map, Value};

use crate::block::{Block, BlockId, BlockParams, BlockTemplate};
use crate::program::{ProgramCommand, ProgramDocument, ProgramError};
use crate::session::{DragOrigin, DragPayload, DragSession, DragState};
use crate::signal::ChangeSignal;

/// Geometry collaborator for the rendered track.
pub trait TrackLayout {
    /// Horizontal extent of a rendered block in pointer coordinates.
    ///
    /// `None` for blocks that are not rendered or cannot be measured.
    fn block_span(&self, id: BlockId) -> Option<Span>;

    /// Whether the start/end anchor elements are mounted.
    fn anchors_mounted(&self) -> bool {
        true
    }
}

impl<F> TrackLayout for F
where
    F: Fn(BlockId) -> Option<Span>,
{
    fn block_span(&self, id: BlockId) -> Option<Span> {
        self(id)
    }
}

/// One entry of the rendered projection, in track order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Start,
    Block { block: &'a Block, hidden: bool },
    Placeholder,
    End,
}

/// Explicit reasons for interaction calls that changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    UnknownBlock,
    MissingAnchors,
    UnrecognizedTemplate,
    RelocatedBlockMissing,
}

/// Result of a drag-start call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    Started {
        origin: DragOrigin,
        /// A session was still active and has been discarded.
        discarded_stale: bool,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// Result of one insertion-point update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionUpdate {
    /// The placeholder moved (or appeared) at gap `to`.
    Moved { from: Option<usize>, to: usize },
    /// The placeholder already sits at this gap.
    Unchanged { gap: usize },
    Noop { reason: DragNoopReason },
}

/// Result of a drop on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Inserted { id: BlockId, index: usize },
    Moved { id: BlockId, from: usize, to: usize },
    /// A relocated block was dropped back on its own slot.
    Returned { id: BlockId, index: usize },
    Noop { reason: DragNoopReason },
}

impl DropOutcome {
    /// Whether the block list changed.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Inserted { .. } | Self::Moved { .. })
    }
}

/// Summary of a cancelled gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledDrag {
    pub origin: DragOrigin,
    pub relocating: Option<BlockId>,
    pub placeholder: Option<usize>,
}

/// Errors from non-interactive editing calls.
#[derive(Debug)]
pub enum SequenceError {
    BlockNotFound { id: BlockId },
    InvalidProgram(ProgramError),
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockNotFound { id } => write!(f, "block {id} not found"),
            Self::InvalidProgram(error) => write!(f, "invalid program: {error}"),
        }
    }
}

impl std::error::Error for SequenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::InvalidProgram(error) = self {
            return Some(error);
        }
        None
    }
}

impl From<ProgramError> for SequenceError {
    fn from(error: ProgramError) -> Self {
        Self::InvalidProgram(error)
    }
}

/// Block sequence plus the drag session that edits it.
#[derive(Debug, Clone)]
pub struct SequenceEditor {
    blocks: Vec<Block>,
    session: Option<DragSession>,
    next_id: BlockId,
    changed: ChangeSignal,
}

impl Default for SequenceEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceEditor {
    /// Empty sequence with its own change signal.
    #[must_use]
    pub fn new() -> Self {
        Self::with_signal(ChangeSignal::new())
    }

    /// Empty sequence raising an externally owned change signal.
    #[must_use]
    pub fn with_signal(changed: ChangeSignal) -> Self {
        Self {
            blocks: Vec::new(),
            session: None,
            next_id: BlockId::MIN,
            changed,
        }
    }

    /// Handle to the "sequence changed" flag.
    #[must_use]
    pub fn change_signal(&self) -> ChangeSignal {
        self.changed.clone()
    }

    /// Blocks in execution order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    /// Current drag lifecycle state.
    #[must_use]
    pub fn state(&self) -> DragState {
        match &self.session {
            None => DragState::Idle,
            Some(session) => DragState::Dragging {
                origin: session.payload.origin(),
                placeholder: session.placeholder,
            },
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Where the active gesture started, if any.
    #[must_use]
    pub fn drag_origin(&self) -> Option<DragOrigin> {
        self.session.as_ref().map(|session| session.payload.origin())
    }

    /// Gap currently marked by the placeholder.
    #[must_use]
    pub fn placeholder(&self) -> Option<usize> {
        self.session.as_ref().and_then(|session| session.placeholder)
    }

    /// Rendered projection: start anchor, blocks with the placeholder
    /// spliced in, end anchor.
    #[must_use]
    pub fn slots(&self) -> Vec<Slot<'_>> {
        let placeholder = self.placeholder();
        let relocating = self
            .session
            .as_ref()
            .and_then(|session| session.payload.relocating());
        let mut slots = Vec::with_capacity(self.blocks.len() + 3);
        slots.push(Slot::Start);
        for (index, block) in self.blocks.iter().enumerate() {
            if placeholder == Some(index) {
                slots.push(Slot::Placeholder);
            }
            slots.push(Slot::Block {
                block,
                hidden: relocating == Some(block.id),
            });
        }
        if placeholder == Some(self.blocks.len()) {
            slots.push(Slot::Placeholder);
        }
        slots.push(Slot::End);
        slots
    }

    // -----------------------------------------------------------------
    // Drag lifecycle
    // -----------------------------------------------------------------

    /// Drag-start from the palette. Does not touch the block list.
    pub fn begin_palette_drag(&mut self, template: BlockTemplate) -> DragStart {
        let discarded_stale = self.discard_stale_session();
        self.session = Some(DragSession::new(DragPayload::Palette(template)));
        tracing::debug!(
            target: "cobot.sequence",
            origin = "palette",
            discarded_stale,
            "drag started"
        );
        DragStart::Started {
            origin: DragOrigin::Palette,
            discarded_stale,
        }
    }

    /// Drag-start from an existing block. The block stays in the list,
    /// projected as hidden, until the gesture ends.
    pub fn begin_relocate_drag(&mut self, id: BlockId) -> DragStart {
        let discarded_stale = self.discard_stale_session();
        if self.index_of(id).is_none() {
            tracing::debug!(
                target: "cobot.sequence",
                block = id.get(),
                "relocate of unknown block ignored"
            );
            return DragStart::Noop {
                reason: DragNoopReason::UnknownBlock,
            };
        }
        self.session = Some(DragSession::new(DragPayload::Relocate(id)));
        tracing::debug!(
            target: "cobot.sequence",
            origin = "sequence",
            block = id.get(),
            discarded_stale,
            "drag started"
        );
        DragStart::Started {
            origin: DragOrigin::Sequence,
            discarded_stale,
        }
    }

    /// Move the placeholder to the gap under `pointer_x`.
    ///
    /// The target is the block whose center is the nearest one strictly to
    /// the right of the pointer; with no such block the gap is the one
    /// before the end anchor. A pointer exactly on a center counts as being
    /// past that block. Calling twice with the same input is a no-op the
    /// second time.
    pub fn update_insertion_point(
        &mut self,
        pointer_x: f64,
        layout: &impl TrackLayout,
    ) -> InsertionUpdate {
        let Some(session) = self.session.as_mut() else {
            return InsertionUpdate::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            };
        };
        let target = insertion_gap(&self.blocks, session.payload.relocating(), pointer_x, layout);
        if session.placeholder == Some(target) {
            return InsertionUpdate::Unchanged { gap: target };
        }
        let from = session.placeholder.replace(target);
        InsertionUpdate::Moved { from, to: target }
    }

    /// Complete the gesture at the placeholder.
    pub fn commit_drop(&mut self, layout: &impl TrackLayout) -> DropOutcome {
        // The session leaves the editor before any branch runs, so every
        // exit (including unwinding) ends idle with no placeholder.
        let Some(session) = self.session.take() else {
            return self.drop_noop(DragNoopReason::IdleWithoutActiveDrag);
        };
        if !layout.anchors_mounted() {
            return self.drop_noop(DragNoopReason::MissingAnchors);
        }
        let gap = session
            .placeholder
            .unwrap_or(self.blocks.len())
            .min(self.blocks.len());

        let outcome = match session.payload {
            DragPayload::Relocate(id) => {
                let Some(from) = self.index_of(id) else {
                    return self.drop_noop(DragNoopReason::RelocatedBlockMissing);
                };
                let to = if gap > from { gap - 1 } else { gap };
                if to == from {
                    tracing::debug!(
                        target: "cobot.sequence",
                        block = id.get(),
                        index = from,
                        "block returned"
                    );
                    return DropOutcome::Returned { id, index: from };
                }
                let block = self.blocks.remove(from);
                self.blocks.insert(to, block);
                tracing::debug!(target: "cobot.sequence", block = id.get(), from, to, "block moved");
                DropOutcome::Moved { id, from, to }
            }
            DragPayload::Palette(template) => {
                let Some((kind, params)) = template.resolve() else {
                    return self.drop_noop(DragNoopReason::UnrecognizedTemplate);
                };
                let id = self.allocate_id();
                self.blocks.insert(gap, Block::new(id, kind, params));
                tracing::debug!(
                    target: "cobot.sequence",
                    block = id.get(),
                    kind = kind.marker(),
                    index = gap,
                    "block inserted"
                );
                DropOutcome::Inserted { id, index: gap }
            }
        };
        if outcome.is_mutation() {
            self.changed.raise();
        }
        outcome
    }

    /// Abort the gesture (Escape, drag-end without drop, lost capture).
    pub fn cancel_drag(&mut self) -> Option<CancelledDrag> {
        let session = self.session.take()?;
        let cancelled = CancelledDrag {
            origin: session.payload.origin(),
            relocating: session.payload.relocating(),
            placeholder: session.placeholder,
        };
        tracing::debug!(target: "cobot.sequence", origin = ?cancelled.origin, "drag cancelled");
        Some(cancelled)
    }

    // -----------------------------------------------------------------
    // Direct edits
    // -----------------------------------------------------------------

    /// Remove a block and raise the change signal.
    pub fn delete_block(&mut self, id: BlockId) -> Result<Block, SequenceError> {
        let index = self
            .index_of(id)
            .ok_or(SequenceError::BlockNotFound { id })?;
        let block = self.blocks.remove(index);

        if let Some(session) = self.session.as_mut() {
            if session.payload.relocating() == Some(id) {
                self.session = None;
            } else if let Some(gap) = session.placeholder
                && gap > index
            {
                session.placeholder = Some(gap - 1);
            }
        }

        self.changed.raise();
        tracing::debug!(target: "cobot.sequence", block = id.get(), index, "block deleted");
        Ok(block)
    }

    /// Current parameter payload of a block.
    #[must_use]
    pub fn params(&self, id: BlockId) -> Option<&BlockParams> {
        self.block(id).map(|block| &block.params)
    }

    /// Replace a block's parameter payload.
    pub fn set_params(&mut self, id: BlockId, params: BlockParams) -> Result<(), SequenceError> {
        let block = self
            .blocks
            .iter_mut()
            .find(|block| block.id == id)
            .ok_or(SequenceError::BlockNotFound { id })?;
        block.params = params;
        self.changed.raise();
        Ok(())
    }

    /// Remove every block and end any gesture.
    pub fn clear(&mut self) {
        self.session = None;
        if !self.blocks.is_empty() {
            self.blocks.clear();
            self.changed.raise();
        }
    }

    // -----------------------------------------------------------------
    // Program documents
    // -----------------------------------------------------------------

    /// Replace the sequence with the commands of a saved program.
    ///
    /// Returns the number of blocks created.
    pub fn load_program(&mut self, document: &ProgramDocument) -> usize {
        self.session = None;
        self.blocks.clear();
        for command in &document.commands {
            let id = self.allocate_id();
            self.blocks
                .push(Block::new(id, command.kind, command.params.clone()));
        }
        self.changed.raise();
        tracing::debug!(target: "cobot.sequence", blocks = self.blocks.len(), "program loaded");
        self.blocks.len()
    }

    /// Parse and load a program document in one step.
    pub fn load_program_json(&mut self, json: &str) -> Result<usize, SequenceError> {
        let document = ProgramDocument::from_json_str(json)?;
        Ok(self.load_program(&document))
    }

    /// Serialize the sequence, carrying the host's points through.
    #[must_use]
    pub fn to_program(&self, points: Map<String, Value>) -> ProgramDocument {
        ProgramDocument {
            points,
            commands: self
                .blocks
                .iter()
                .map(|block| ProgramCommand {
                    kind: block.kind,
                    params: block.params.clone(),
                })
                .collect(),
        }
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id = self.next_id.next();
        id
    }

    fn discard_stale_session(&mut self) -> bool {
        let stale = self.session.take().is_some();
        if stale {
            tracing::debug!(target: "cobot.sequence", "stale drag session discarded");
        }
        stale
    }

    fn drop_noop(&self, reason: DragNoopReason) -> DropOutcome {
        tracing::debug!(target: "cobot.sequence", ?reason, "drop ignored");
        DropOutcome::Noop { reason }
    }
}

/// Gap index for a pointer position: O(n) over measurable blocks.
fn insertion_gap(
    blocks: &[Block],
    relocating: Option<BlockId>,
    pointer_x: f64,
    layout: &impl TrackLayout,
) -> usize {
    let mut closest: Option<(usize, f64)> = None;
    for (index, block) in blocks.iter().enumerate() {
        if relocating == Some(block.id) {
            continue;
        }
        let Some(span) = layout.block_span(block.id) else {
            continue;
        };
        let offset = pointer_x - span.center();
        if offset < 0.0 && closest.is_none_or(|(_, best)| offset > best) {
            closest = Some((index, offset));
        }
    }
    closest.map_or(blocks.len(), |(index, _)| index)
}
