//! Document-level event delivery.
//!
//! Events are queued on the [`Page`] and drained FIFO by a [`Dispatcher`].
//! For each event every capture listener runs, in registration order, before
//! any bubble listener; bubble listeners only see bubbling events. Events a
//! listener queues are delivered after the current one completes.

use crate::page::Page;
use html::Id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// The target gained focus. Does not bubble.
    Focus,
    /// The target gained focus. Bubbles, so document listeners observe it.
    FocusIn,
    Click,
    KeyDown { key: String },
    /// The target's content changed.
    Input,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub target: Id,
    pub kind: EventKind,
}

impl Event {
    pub fn new(target: Id, kind: EventKind) -> Self {
        Self { target, kind }
    }

    pub fn focus(target: Id) -> Self {
        Self::new(target, EventKind::Focus)
    }

    pub fn focus_in(target: Id) -> Self {
        Self::new(target, EventKind::FocusIn)
    }

    pub fn click(target: Id) -> Self {
        Self::new(target, EventKind::Click)
    }

    pub fn key_down(target: Id, key: impl Into<String>) -> Self {
        Self::new(target, EventKind::KeyDown { key: key.into() })
    }

    pub fn input(target: Id) -> Self {
        Self::new(target, EventKind::Input)
    }

    pub fn bubbles(&self) -> bool {
        !matches!(self.kind, EventKind::Focus)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

/// A document-level event listener.
pub trait Listener {
    fn handle_event(&mut self, page: &mut Page, event: &Event);
}

struct Registration {
    phase: Phase,
    listener: Box<dyn Listener>,
}

/// Upper bound on events delivered by one [`Dispatcher::run`]; listeners that
/// keep re-queueing each other stop here.
const MAX_EVENTS_PER_RUN: usize = 10_000;

#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<Registration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, phase: Phase, listener: impl Listener + 'static) {
        self.listeners.push(Registration {
            phase,
            listener: Box::new(listener),
        });
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver queued events until the page queue is empty. Returns the number
    /// of events delivered.
    pub fn run(&mut self, page: &mut Page) -> usize {
        let mut delivered = 0;
        while let Some(event) = page.pop_event() {
            if delivered == MAX_EVENTS_PER_RUN {
                log::warn!(
                    target: "page_controls.events",
                    "event limit reached; dropping {event:?} and {} queued events",
                    page.pending_events()
                );
                page.discard_events();
                break;
            }
            self.deliver(page, &event);
            delivered += 1;
        }
        delivered
    }

    fn deliver(&mut self, page: &mut Page, event: &Event) {
        log::trace!(target: "page_controls.events", "dispatch {event:?}");
        for reg in self.listeners.iter_mut().filter(|r| r.phase == Phase::Capture) {
            reg.listener.handle_event(page, event);
        }
        if !event.bubbles() {
            return;
        }
        for reg in self.listeners.iter_mut().filter(|r| r.phase == Phase::Bubble) {
            reg.listener.handle_event(page, event);
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
