#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DialogCloseReason {
    Programmatic,
    OverlayClick,
    CloseButton,
    EscapeKey,
}

/// Open/closed state of a dismissible dialog, owned by the parent that hosts it.
///
/// Only visibility lives here. Whatever the dialog contains keeps its state while
/// closed, so reopening shows the previous input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DialogState {
    opened: bool,
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn set_open(&mut self, opened: bool) {
        self.opened = opened;
    }

    pub fn open(&mut self) {
        self.set_open(true);
    }

    pub fn close(&mut self, reason: DialogCloseReason) {
        if self.opened {
            tracing::debug!(?reason, "dialog closed");
        }
        self.set_open(false);
    }

    /// Flips visibility and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.opened = !self.opened;
        self.opened
    }
}
