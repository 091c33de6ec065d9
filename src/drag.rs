//! Drag-and-drop session state for upload drop targets.
//!
//! Enter/leave events fire for every child element crossed, so a single
//! boolean flickers. A depth counter only reports "left" once the pointer has
//! exited as many times as it entered.

/// Depth counter for one drop target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    depth: u32,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A drag entered the target or one of its children.
    pub fn enter(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// A drag left the target or one of its children. Returns `true` when
    /// the drag has left the target entirely.
    pub fn leave(&mut self) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth == 0
    }

    /// Files were dropped. Resets the counter and returns whether a drag was
    /// in progress; a second call returns `false`.
    pub fn finish(&mut self) -> bool {
        let was_active = self.is_active();
        self.depth = 0;
        was_active
    }

    /// Whether the drop highlight should be shown.
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }
}
