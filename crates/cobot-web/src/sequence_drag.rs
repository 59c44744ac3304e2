#![forbid(unsafe_code)]

//! Browser drag-and-drop adapter for the block sequence.
//!
//! Bridges HTML5 drag lifecycle signals (`dragstart`, `dragover`, `drop`,
//! `dragend`, `keydown`) and block clicks into [`SequenceEditor`] calls and
//! returns the DOM updates the host must apply as [`HostCommand`]s. The host
//! never mutates the track on its own; it renders what the commands say.
//!
//! Lifecycle rules:
//! - Escape cancels the active gesture,
//! - `dragend` without a preceding drop cancels (lost capture is an implicit
//!   cancel),
//! - a block being relocated is hidden on drag start and shown again when
//!   the gesture ends, whichever way it ends.

use cobot_core::{Key, Point, PointerButton, Size};
use cobot_editor::{
    Block, BlockId, BlockParams, BlockTemplate, CommandKind, DragNoopReason, DragStart,
    DropOutcome, InsertionUpdate, ProgramDocument, SequenceEditor, TrackLayout,
};
use cobot_window::{DEFAULT_POPOVER_PAD, Position, place_near_pointer};
use serde_json::{Map, Value};

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceDragConfig {
    /// Gap between the click point and the configuration popover.
    pub popover_pad: f64,
}

impl Default for SequenceDragConfig {
    fn default() -> Self {
        Self {
            popover_pad: DEFAULT_POPOVER_PAD,
        }
    }
}

/// DOM update the host must apply to the rendered track.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Put the shared placeholder before block `gap` (`gap == len`: before
    /// the end anchor). Moves it if already shown.
    ShowPlaceholder { gap: usize },
    RemovePlaceholder,
    HideBlock { id: BlockId },
    ShowBlock { id: BlockId },
    /// Create a block element at `index`.
    RenderBlock {
        id: BlockId,
        index: usize,
        kind: CommandKind,
        caption: Option<String>,
    },
    /// Refresh the caption of an existing block element.
    UpdateCaption { id: BlockId, caption: Option<String> },
    MoveBlock { id: BlockId, to: usize },
    RemoveBlock { id: BlockId },
    /// Remove every block element, keeping the anchors.
    ClearTrack,
    /// Open the configuration popover for a block at a viewport position.
    OpenConfig {
        id: BlockId,
        kind: CommandKind,
        params: BlockParams,
        at: Position,
    },
}

impl HostCommand {
    fn render(block: &Block, index: usize) -> Self {
        Self::RenderBlock {
            id: block.id,
            index,
            kind: block.kind,
            caption: block.caption(),
        }
    }
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    PaletteDragStart,
    BlockDragStart,
    DragOver,
    Drop,
    DragEnd,
    DropOutside,
    KeyDown,
    BlockClick,
    DeleteBlock,
    ConfigSaved,
    ProgramLoaded,
}

/// Why an incoming signal changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceIgnoredReason {
    /// The editor reported a no-op.
    Editor(DragNoopReason),
    NoActiveDrag,
    KeyNotHandled,
    ButtonNotAllowed,
    BlockNotFound,
    DragInProgress,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceLogOutcome {
    DragStarted,
    PlaceholderMoved,
    PlaceholderUnchanged,
    BlockInserted,
    BlockMoved,
    BlockReturned,
    Cancelled,
    BlockDeleted,
    ParamsUpdated,
    ConfigRequested,
    ProgramRendered,
    Ignored(SequenceIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLogEntry {
    pub phase: SequencePhase,
    pub block: Option<BlockId>,
    pub gap: Option<usize>,
    pub outcome: SequenceLogOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDispatch {
    pub commands: Vec<HostCommand>,
    pub log: SequenceLogEntry,
}

impl SequenceDispatch {
    fn new(
        phase: SequencePhase,
        block: Option<BlockId>,
        gap: Option<usize>,
        outcome: SequenceLogOutcome,
        commands: Vec<HostCommand>,
    ) -> Self {
        let dispatch = Self {
            commands,
            log: SequenceLogEntry {
                phase,
                block,
                gap,
                outcome,
            },
        };
        tracing::debug!(
            target: "cobot.web",
            phase = ?dispatch.log.phase,
            outcome = ?dispatch.log.outcome,
            block = dispatch.log.block.map(BlockId::get),
            gap = dispatch.log.gap,
            commands = dispatch.commands.len(),
            "sequence dispatch"
        );
        dispatch
    }

    fn ignored(phase: SequencePhase, block: Option<BlockId>, reason: SequenceIgnoredReason) -> Self {
        Self::new(
            phase,
            block,
            None,
            SequenceLogOutcome::Ignored(reason),
            Vec::new(),
        )
    }

    /// Whether the host has anything to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Drag-and-drop adapter owning one sequence editor.
#[derive(Debug, Clone)]
pub struct SequenceDragAdapter {
    editor: SequenceEditor,
    config: SequenceDragConfig,
}

impl Default for SequenceDragAdapter {
    fn default() -> Self {
        Self::new(SequenceEditor::new(), SequenceDragConfig::default())
    }
}

impl SequenceDragAdapter {
    #[must_use]
    pub fn new(editor: SequenceEditor, config: SequenceDragConfig) -> Self {
        Self { editor, config }
    }

    #[must_use]
    pub const fn editor(&self) -> &SequenceEditor {
        &self.editor
    }

    #[must_use]
    pub const fn config(&self) -> SequenceDragConfig {
        self.config
    }

    /// `dragstart` on a palette entry.
    pub fn palette_drag_start(&mut self, template: BlockTemplate) -> SequenceDispatch {
        let commands = self.stale_cleanup();
        let outcome = match self.editor.begin_palette_drag(template) {
            DragStart::Started { .. } => SequenceLogOutcome::DragStarted,
            DragStart::Noop { reason } => {
                SequenceLogOutcome::Ignored(SequenceIgnoredReason::Editor(reason))
            }
        };
        SequenceDispatch::new(SequencePhase::PaletteDragStart, None, None, outcome, commands)
    }

    /// `dragstart` on a block already in the track.
    pub fn block_drag_start(&mut self, id: BlockId) -> SequenceDispatch {
        let mut commands = self.stale_cleanup();
        match self.editor.begin_relocate_drag(id) {
            DragStart::Started { .. } => {
                commands.push(HostCommand::HideBlock { id });
                SequenceDispatch::new(
                    SequencePhase::BlockDragStart,
                    Some(id),
                    None,
                    SequenceLogOutcome::DragStarted,
                    commands,
                )
            }
            DragStart::Noop { reason } => SequenceDispatch::new(
                SequencePhase::BlockDragStart,
                Some(id),
                None,
                SequenceLogOutcome::Ignored(SequenceIgnoredReason::Editor(reason)),
                commands,
            ),
        }
    }

    /// `dragover` on the track at a pointer x coordinate.
    pub fn drag_over(&mut self, pointer_x: f64, layout: &impl TrackLayout) -> SequenceDispatch {
        match self.editor.update_insertion_point(pointer_x, layout) {
            InsertionUpdate::Moved { to, .. } => SequenceDispatch::new(
                SequencePhase::DragOver,
                None,
                Some(to),
                SequenceLogOutcome::PlaceholderMoved,
                vec![HostCommand::ShowPlaceholder { gap: to }],
            ),
            InsertionUpdate::Unchanged { gap } => SequenceDispatch::new(
                SequencePhase::DragOver,
                None,
                Some(gap),
                SequenceLogOutcome::PlaceholderUnchanged,
                Vec::new(),
            ),
            InsertionUpdate::Noop { reason } => SequenceDispatch::ignored(
                SequencePhase::DragOver,
                None,
                SequenceIgnoredReason::Editor(reason),
            ),
        }
    }

    /// `drop` on the track.
    pub fn drop(&mut self, layout: &impl TrackLayout) -> SequenceDispatch {
        let relocating = self.relocating();
        let had_placeholder = self.editor.placeholder().is_some();
        let mut commands = Vec::new();
        if had_placeholder {
            commands.push(HostCommand::RemovePlaceholder);
        }

        match self.editor.commit_drop(layout) {
            DropOutcome::Inserted { id, index } => {
                if let Some(block) = self.editor.block(id) {
                    commands.push(HostCommand::render(block, index));
                }
                SequenceDispatch::new(
                    SequencePhase::Drop,
                    Some(id),
                    Some(index),
                    SequenceLogOutcome::BlockInserted,
                    commands,
                )
            }
            DropOutcome::Moved { id, to, .. } => {
                commands.push(HostCommand::MoveBlock { id, to });
                commands.push(HostCommand::ShowBlock { id });
                SequenceDispatch::new(
                    SequencePhase::Drop,
                    Some(id),
                    Some(to),
                    SequenceLogOutcome::BlockMoved,
                    commands,
                )
            }
            DropOutcome::Returned { id, index } => {
                commands.push(HostCommand::ShowBlock { id });
                SequenceDispatch::new(
                    SequencePhase::Drop,
                    Some(id),
                    Some(index),
                    SequenceLogOutcome::BlockReturned,
                    commands,
                )
            }
            DropOutcome::Noop { reason } => {
                if let Some(id) = relocating
                    && self.editor.block(id).is_some()
                {
                    commands.push(HostCommand::ShowBlock { id });
                }
                SequenceDispatch::new(
                    SequencePhase::Drop,
                    relocating,
                    None,
                    SequenceLogOutcome::Ignored(SequenceIgnoredReason::Editor(reason)),
                    commands,
                )
            }
        }
    }

    /// `dragend` on the dragged element. Cancels unless a drop already
    /// finished the gesture.
    pub fn drag_end(&mut self) -> SequenceDispatch {
        self.cancel(SequencePhase::DragEnd)
    }

    /// `drop` anywhere outside the track.
    pub fn drop_outside(&mut self) -> SequenceDispatch {
        self.cancel(SequencePhase::DropOutside)
    }

    /// `keydown` anywhere in the document.
    pub fn key_down(&mut self, key: &Key) -> SequenceDispatch {
        if *key != Key::Escape {
            return SequenceDispatch::ignored(
                SequencePhase::KeyDown,
                None,
                SequenceIgnoredReason::KeyNotHandled,
            );
        }
        self.cancel(SequencePhase::KeyDown)
    }

    /// Click on a block: ask the host to open its configuration popover
    /// next to the pointer.
    pub fn block_click(
        &mut self,
        id: BlockId,
        button: PointerButton,
        pointer: Point,
        popover: Size,
        viewport: Size,
    ) -> SequenceDispatch {
        if button != PointerButton::Primary {
            return SequenceDispatch::ignored(
                SequencePhase::BlockClick,
                Some(id),
                SequenceIgnoredReason::ButtonNotAllowed,
            );
        }
        if self.editor.is_dragging() {
            return SequenceDispatch::ignored(
                SequencePhase::BlockClick,
                Some(id),
                SequenceIgnoredReason::DragInProgress,
            );
        }
        let Some(block) = self.editor.block(id) else {
            return SequenceDispatch::ignored(
                SequencePhase::BlockClick,
                Some(id),
                SequenceIgnoredReason::BlockNotFound,
            );
        };
        let at = place_near_pointer(pointer, popover, viewport, self.config.popover_pad);
        let command = HostCommand::OpenConfig {
            id,
            kind: block.kind,
            params: block.params.clone(),
            at,
        };
        SequenceDispatch::new(
            SequencePhase::BlockClick,
            Some(id),
            None,
            SequenceLogOutcome::ConfigRequested,
            vec![command],
        )
    }

    /// Delete button on a block.
    pub fn delete_block(&mut self, id: BlockId) -> SequenceDispatch {
        let placeholder_before = self.editor.placeholder();
        if self.editor.delete_block(id).is_err() {
            return SequenceDispatch::ignored(
                SequencePhase::DeleteBlock,
                Some(id),
                SequenceIgnoredReason::BlockNotFound,
            );
        }
        let mut commands = vec![HostCommand::RemoveBlock { id }];
        let placeholder_after = self.editor.placeholder();
        match (placeholder_before, placeholder_after) {
            (Some(_), None) => commands.push(HostCommand::RemovePlaceholder),
            (before, Some(gap)) if before != Some(gap) => {
                commands.push(HostCommand::ShowPlaceholder { gap });
            }
            _ => {}
        }
        SequenceDispatch::new(
            SequencePhase::DeleteBlock,
            Some(id),
            placeholder_after,
            SequenceLogOutcome::BlockDeleted,
            commands,
        )
    }

    /// Configuration form saved for a block.
    pub fn save_params(&mut self, id: BlockId, params: BlockParams) -> SequenceDispatch {
        if self.editor.set_params(id, params).is_err() {
            return SequenceDispatch::ignored(
                SequencePhase::ConfigSaved,
                Some(id),
                SequenceIgnoredReason::BlockNotFound,
            );
        }
        let caption = self.editor.block(id).and_then(Block::caption);
        SequenceDispatch::new(
            SequencePhase::ConfigSaved,
            Some(id),
            None,
            SequenceLogOutcome::ParamsUpdated,
            vec![HostCommand::UpdateCaption { id, caption }],
        )
    }

    /// Replace the track with a saved program.
    pub fn load_program(&mut self, document: &ProgramDocument) -> SequenceDispatch {
        let placeholder = self.editor.placeholder().is_some();
        self.editor.load_program(document);
        let mut commands = Vec::with_capacity(self.editor.len() + 2);
        if placeholder {
            commands.push(HostCommand::RemovePlaceholder);
        }
        commands.push(HostCommand::ClearTrack);
        commands.extend(
            self.editor
                .blocks()
                .iter()
                .enumerate()
                .map(|(index, block)| HostCommand::render(block, index)),
        );
        SequenceDispatch::new(
            SequencePhase::ProgramLoaded,
            None,
            None,
            SequenceLogOutcome::ProgramRendered,
            commands,
        )
    }

    /// Serialize the current sequence.
    #[must_use]
    pub fn to_program(&self, points: Map<String, Value>) -> ProgramDocument {
        self.editor.to_program(points)
    }

    fn relocating(&self) -> Option<BlockId> {
        self.editor
            .session()
            .and_then(|session| session.payload().relocating())
    }

    /// Undo the projection of a session that a new drag start will discard.
    fn stale_cleanup(&self) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        if self.editor.placeholder().is_some() {
            commands.push(HostCommand::RemovePlaceholder);
        }
        if let Some(id) = self.relocating() {
            commands.push(HostCommand::ShowBlock { id });
        }
        commands
    }

    fn cancel(&mut self, phase: SequencePhase) -> SequenceDispatch {
        let Some(cancelled) = self.editor.cancel_drag() else {
            return SequenceDispatch::ignored(phase, None, SequenceIgnoredReason::NoActiveDrag);
        };
        let mut commands = Vec::new();
        if cancelled.placeholder.is_some() {
            commands.push(HostCommand::RemovePlaceholder);
        }
        if let Some(id) = cancelled.relocating {
            commands.push(HostCommand::ShowBlock { id });
        }
        SequenceDispatch::new(
            phase,
            cancelled.relocating,
            cancelled.placeholder,
            SequenceLogOutcome::Cancelled,
            commands,
        )
    }
}
