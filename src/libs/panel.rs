use crate::libs::backend::Backend;
use crate::libs::primary_key::PrimaryKeyRegistry;
use crate::libs::state::{AppState, ModalDescriptor, Phase};
use crate::libs::view::View;
use chrono::{DateTime, Utc};

/// The admin panel controller.
///
/// Owns the backend, the view and the application state. The table browser
/// operations live in `browser.rs`, the record editor ones in `editor.rs`.
pub struct Panel<B, V> {
    pub(crate) backend: B,
    pub(crate) view: V,
    pub(crate) state: AppState,
    pub(crate) keys: PrimaryKeyRegistry,
    pub(crate) clock: fn() -> DateTime<Utc>,
}

impl<B, V> Panel<B, V>
where
    B: Backend,
    V: View,
{
    pub fn new(backend: B, view: V) -> Self {
        Self {
            backend,
            view,
            state: AppState::default(),
            keys: PrimaryKeyRegistry::default(),
            clock: Utc::now,
        }
    }

    pub fn with_keys(mut self, keys: PrimaryKeyRegistry) -> Self {
        self.keys = keys;
        self
    }

    /// Replaces the clock used to stamp `created_at`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shows `modal`, replacing any modal already open.
    pub(crate) fn open_modal(&mut self, modal: ModalDescriptor) {
        if self.state.open_modal.take().is_some() {
            self.view.close_modal();
        }
        self.view.open_modal(&modal);
        self.state.open_modal = Some(modal);
    }

    /// Cancels the open form without sending anything.
    pub fn close_modal(&mut self) {
        if self.state.open_modal.take().is_some() {
            self.view.close_modal();
        }
        self.state.phase = Phase::Idle;
    }
}
