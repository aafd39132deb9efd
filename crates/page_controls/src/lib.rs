//! # page_controls
//!
//! Form-page helpers over an [`html::Document`]: symbol controls that insert
//! at the caret of the right text field, clear controls, copy-to-clipboard
//! controls, and keyboard activation for all of them.
//!
//! The browser side is modeled by [`Page`] (document, plain-field store, rich
//! selection, focus, event queue) and a [`Dispatcher`] that delivers queued
//! events to document-level listeners. [`PageControls`] wires the standard
//! listeners from a [`ControlsConfig`].
//!
//! ```
//! use html::Id;
//! use html::test_utils::{doc, elem, text};
//! use page_controls::{ControlsConfig, MemoryClipboard, Page, PageControls};
//!
//! let mut page = Page::from_tree(&doc(vec![elem(
//!     2,
//!     "div",
//!     vec![("class", "symbol-container")],
//!     vec![
//!         elem(3, "input", vec![("type", "text"), ("value", "p  q")], vec![]),
//!         elem(4, "button", vec![("data-symbol", "&and;")], vec![text(5, "∧")]),
//!     ],
//! )]))
//! .unwrap();
//! let mut controls = PageControls::new(&ControlsConfig::default(), MemoryClipboard::new()).unwrap();
//! controls.attach(&mut page);
//!
//! page.fields_mut().set_selection_range(Id(3), 2, 2);
//! page.click(Id(4));
//! controls.run(&mut page);
//!
//! assert_eq!(page.fields().get(Id(3)), Some("p ∧ q"));
//! ```

mod clipboard;
mod config;
mod controls;
mod events;
mod focus;
mod insert;
mod page;
mod resolve;
mod target;
mod visibility;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use config::{ClearConfig, ConfigError, ControlsConfig, CopyConfig, Selectors, SymbolConfig};
pub use controls::{
    ClearControls, CopyControls, KeyboardActivation, SymbolControls, mark_keyboard_controls,
    symbol_payload,
};
pub use events::{Dispatcher, Event, EventKind, Listener, Phase};
pub use focus::{FocusTracker, LastFocused};
pub use insert::{clear, insert};
pub use page::Page;
pub use resolve::{Resolution, Tier, resolve_clear_target, resolve_insert_target};
pub use target::{Target, classify, is_eligible, is_plain_field, is_rich_region};
pub use visibility::VisibilityToggles;

use std::rc::Rc;

/// The standard listener set for one page.
#[derive(Debug)]
pub struct PageControls {
    dispatcher: Dispatcher,
    last_focused: LastFocused,
    selectors: Rc<Selectors>,
    toggle_visibility: bool,
}

impl PageControls {
    /// Compile the configured selectors and register the focus tracker
    /// (capture phase) and the control listeners (bubble phase).
    pub fn new(config: &ControlsConfig, clipboard: impl Clipboard + 'static) -> Result<Self, ConfigError> {
        let selectors = Rc::new(config.compile()?);
        let last_focused = LastFocused::new();

        let mut dispatcher = Dispatcher::new();
        dispatcher.add_listener(Phase::Capture, FocusTracker::new(last_focused.clone()));
        dispatcher.add_listener(Phase::Bubble, KeyboardActivation::new(selectors.clone()));
        dispatcher.add_listener(
            Phase::Bubble,
            SymbolControls::new(selectors.clone(), last_focused.clone()),
        );
        dispatcher.add_listener(Phase::Bubble, ClearControls::new(selectors.clone()));
        dispatcher.add_listener(
            Phase::Bubble,
            CopyControls::new(selectors.clone(), Box::new(clipboard)),
        );
        if config.clear.toggle_visibility {
            dispatcher.add_listener(Phase::Bubble, VisibilityToggles::new(selectors.clone()));
        }

        Ok(Self {
            dispatcher,
            last_focused,
            selectors,
            toggle_visibility: config.clear.toggle_visibility,
        })
    }

    /// One-time page setup: mark clear and copy controls as buttons and, when
    /// enabled, sync clear-control visibility.
    pub fn attach(&self, page: &mut Page) {
        mark_keyboard_controls(page, &self.selectors);
        if self.toggle_visibility {
            VisibilityToggles::new(self.selectors.clone()).sync_all(page);
        }
    }

    /// Deliver all queued events. Returns the number delivered.
    pub fn run(&mut self, page: &mut Page) -> usize {
        self.dispatcher.run(page)
    }

    /// For registering extra listeners alongside the standard set.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn last_focused(&self) -> &LastFocused {
        &self.last_focused
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }
}
