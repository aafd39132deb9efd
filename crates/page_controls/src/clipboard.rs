use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard is unavailable")]
    Unavailable,
}

/// Write access to the system clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory clipboard. Clones share contents, so a test can keep one handle
/// while the copy listener owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
    writes: Rc<Cell<usize>>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::Unavailable);
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
