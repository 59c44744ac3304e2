#![forbid(unsafe_code)]

//! Pointer adapter for bounded draggable windows.
//!
//! Bridges browser pointer lifecycle signals into [`BoundedWindow`] calls
//! while enforcing one active pointer at a time, and returns the host
//! commands that position the panel, acquire/release pointer capture, and
//! open/close the resize subscription. Blur and lost capture end the
//! gesture where it is; the panel keeps its last clamped position.

use cobot_core::{Point, PointerButton};
use cobot_window::{
    BoundedWindow, PanelGeometry, Position, PressTarget, ResizeSignal, ResizeSubscription,
    WindowConfig, WindowIgnoredReason, WindowUpdate,
};

/// Host command emitted for one window dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    /// Write `left`/`top` to the panel.
    SetPosition(Position),
    AcquireCapture { pointer_id: u32 },
    ReleaseCapture { pointer_id: u32 },
    Subscribe(ResizeSubscription),
    Unsubscribe(ResizeSubscription),
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Attach,
    PointerDown,
    PointerMove,
    PointerUp,
    Blur,
    LostPointerCapture,
    Resize,
    Detach,
}

/// Why an incoming signal changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPointerIgnoredReason {
    /// The window rejected the call.
    Window(WindowIgnoredReason),
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLogOutcome {
    Positioned,
    GestureEnded,
    Detached,
    Ignored(WindowPointerIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLogEntry {
    pub phase: WindowPhase,
    pub pointer_id: Option<u32>,
    pub position: Option<Position>,
    pub outcome: WindowLogOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDispatch {
    pub commands: Vec<WindowCommand>,
    pub log: WindowLogEntry,
}

impl WindowDispatch {
    fn new(
        phase: WindowPhase,
        pointer_id: Option<u32>,
        position: Option<Position>,
        outcome: WindowLogOutcome,
        commands: Vec<WindowCommand>,
    ) -> Self {
        tracing::debug!(
            target: "cobot.web",
            phase = ?phase,
            outcome = ?outcome,
            pointer_id,
            commands = commands.len(),
            "window dispatch"
        );
        Self {
            commands,
            log: WindowLogEntry {
                phase,
                pointer_id,
                position,
                outcome,
            },
        }
    }

    fn ignored(
        phase: WindowPhase,
        pointer_id: Option<u32>,
        reason: WindowPointerIgnoredReason,
    ) -> Self {
        Self::new(
            phase,
            pointer_id,
            None,
            WindowLogOutcome::Ignored(reason),
            Vec::new(),
        )
    }

    fn from_update(phase: WindowPhase, pointer_id: Option<u32>, update: WindowUpdate) -> Self {
        match update {
            WindowUpdate::Positioned(position) => Self::new(
                phase,
                pointer_id,
                Some(position),
                WindowLogOutcome::Positioned,
                vec![WindowCommand::SetPosition(position)],
            ),
            WindowUpdate::Ignored(reason) => Self::ignored(
                phase,
                pointer_id,
                WindowPointerIgnoredReason::Window(reason),
            ),
        }
    }
}

/// Single-pointer adapter around one [`BoundedWindow`].
#[derive(Debug)]
pub struct WindowPointerAdapter {
    window: BoundedWindow,
    active_pointer: Option<u32>,
}

impl WindowPointerAdapter {
    /// Attach to a panel. `None` when the panel or handle is missing.
    pub fn attach<G: PanelGeometry + ?Sized>(
        geometry: &G,
        config: WindowConfig,
    ) -> Option<(Self, WindowDispatch)> {
        let attachment = BoundedWindow::attach(geometry, config)?;
        let mut commands = vec![WindowCommand::SetPosition(attachment.position)];
        commands.extend(attachment.subscription.map(WindowCommand::Subscribe));
        let dispatch = WindowDispatch::new(
            WindowPhase::Attach,
            None,
            Some(attachment.position),
            WindowLogOutcome::Positioned,
            commands,
        );
        let adapter = Self {
            window: attachment.window,
            active_pointer: None,
        };
        Some((adapter, dispatch))
    }

    #[must_use]
    pub const fn window(&self) -> &BoundedWindow {
        &self.window
    }

    #[must_use]
    pub const fn active_pointer_id(&self) -> Option<u32> {
        self.active_pointer
    }

    /// `pointerdown` / `mousedown` on the panel.
    pub fn pointer_down<G: PanelGeometry + ?Sized>(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        pointer: Point,
        target: PressTarget,
        geometry: &G,
    ) -> WindowDispatch {
        if self.active_pointer.is_some() {
            return WindowDispatch::ignored(
                WindowPhase::PointerDown,
                Some(pointer_id),
                WindowPointerIgnoredReason::ActivePointerAlreadyInProgress,
            );
        }
        let update = self.window.press(button, pointer, target, geometry);
        let mut dispatch =
            WindowDispatch::from_update(WindowPhase::PointerDown, Some(pointer_id), update);
        if update.position().is_some() {
            self.active_pointer = Some(pointer_id);
            dispatch
                .commands
                .push(WindowCommand::AcquireCapture { pointer_id });
        }
        dispatch
    }

    /// `pointermove` while a gesture may be active.
    pub fn pointer_move<G: PanelGeometry + ?Sized>(
        &mut self,
        pointer_id: u32,
        pointer: Point,
        geometry: &G,
    ) -> WindowDispatch {
        if let Err(reason) = self.check_pointer(pointer_id) {
            return WindowDispatch::ignored(WindowPhase::PointerMove, Some(pointer_id), reason);
        }
        let update = self.window.drag_to(pointer, geometry);
        if !self.window.is_dragging() {
            // The window gave up on the gesture (panel detached).
            self.active_pointer = None;
        }
        WindowDispatch::from_update(WindowPhase::PointerMove, Some(pointer_id), update)
    }

    /// `pointerup` for the active pointer.
    pub fn pointer_up(&mut self, pointer_id: u32) -> WindowDispatch {
        if let Err(reason) = self.check_pointer(pointer_id) {
            return WindowDispatch::ignored(WindowPhase::PointerUp, Some(pointer_id), reason);
        }
        self.end_gesture(WindowPhase::PointerUp, true)
    }

    /// Window lost focus mid-gesture.
    pub fn blur(&mut self) -> WindowDispatch {
        if self.active_pointer.is_none() {
            return WindowDispatch::ignored(
                WindowPhase::Blur,
                None,
                WindowPointerIgnoredReason::NoActivePointer,
            );
        }
        self.end_gesture(WindowPhase::Blur, true)
    }

    /// The browser revoked pointer capture.
    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> WindowDispatch {
        if let Err(reason) = self.check_pointer(pointer_id) {
            return WindowDispatch::ignored(
                WindowPhase::LostPointerCapture,
                Some(pointer_id),
                reason,
            );
        }
        self.end_gesture(WindowPhase::LostPointerCapture, false)
    }

    /// Forward a host size-change notification.
    pub fn resize<G: PanelGeometry + ?Sized>(
        &mut self,
        signal: ResizeSignal,
        geometry: &G,
    ) -> WindowDispatch {
        let update = self.window.on_resize(signal, geometry);
        WindowDispatch::from_update(WindowPhase::Resize, self.active_pointer, update)
    }

    /// Tear down: release capture if held and close the subscription.
    #[must_use]
    pub fn detach(self) -> WindowDispatch {
        let mut commands = Vec::new();
        if let Some(pointer_id) = self.active_pointer {
            commands.push(WindowCommand::ReleaseCapture { pointer_id });
        }
        let position = self.window.position();
        commands.extend(self.window.detach().map(WindowCommand::Unsubscribe));
        WindowDispatch::new(
            WindowPhase::Detach,
            self.active_pointer,
            Some(position),
            WindowLogOutcome::Detached,
            commands,
        )
    }

    fn check_pointer(&self, pointer_id: u32) -> Result<(), WindowPointerIgnoredReason> {
        match self.active_pointer {
            None => Err(WindowPointerIgnoredReason::NoActivePointer),
            Some(active) if active != pointer_id => Err(WindowPointerIgnoredReason::PointerMismatch),
            Some(_) => Ok(()),
        }
    }

    fn end_gesture(&mut self, phase: WindowPhase, release_capture: bool) -> WindowDispatch {
        let pointer_id = self.active_pointer.take();
        self.window.release();
        let commands = pointer_id
            .filter(|_| release_capture)
            .map(|pointer_id| WindowCommand::ReleaseCapture { pointer_id })
            .into_iter()
            .collect();
        WindowDispatch::new(
            phase,
            pointer_id,
            Some(self.window.position()),
            WindowLogOutcome::GestureEnded,
            commands,
        )
    }
}
