//! The session store: single writer over the state document.
//!
//! `dispatch` applies one action through the reducer inside
//! `watch::Sender::send_modify`, so readers see the old or the new snapshot
//! and never a partial one. Effects run after the transition, still under the
//! write lock, so they are observed in dispatch order.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, warn};

use playground_core::{
    AddonModule, ChatItem, Options, OptionsPatch, OptionsStorage, Result, ThemeSurface,
    THEME_COLOR_PROPERTY,
};

use crate::action::{Action, Effect};
use crate::reducer::reduce;
use crate::state::SessionState;

pub struct Store {
    state: watch::Sender<SessionState>,
    write_lock: Mutex<()>,
    storage: Arc<dyn OptionsStorage>,
    theme: Arc<dyn ThemeSurface>,
}

impl Store {
    /// A store holding the default state. Nothing is read from `storage`
    /// until the session bootstrap asks for it.
    pub fn new(storage: Arc<dyn OptionsStorage>, theme: Arc<dyn ThemeSurface>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state,
            write_lock: Mutex::new(()),
            storage,
            theme,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Read a projection of the current state without cloning all of it.
    pub fn select<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        f(&self.state.borrow())
    }

    /// Receiver notified after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Apply one action and run its effects.
    ///
    /// The state transition always happens; an error means an effect (the
    /// options write) failed afterwards.
    ///
    /// Persisting options writes the storage file synchronously while the
    /// write lock is held, which blocks the calling runtime thread for that
    /// one small file write. Only `SetOptions` persists.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        debug!(action = action.name(), "Dispatching");
        let mut effects = Vec::new();
        self.state.send_modify(|state| effects = reduce(state, action));

        for effect in effects {
            self.run_effect(effect)?;
        }
        Ok(())
    }

    fn run_effect(&self, effect: Effect) -> Result<()> {
        match effect {
            Effect::PersistOptions(options) => {
                self.storage.save_options(&options).inspect_err(|e| {
                    warn!(error = %e, "Failed to persist options");
                })
            }
            Effect::ApplyThemeColor(color) => {
                self.theme.set_property(THEME_COLOR_PROPERTY, &color);
                Ok(())
            }
        }
    }

    /// Options last written to local storage.
    pub fn load_persisted_options(&self) -> Result<Option<Options>> {
        self.storage.load_options()
    }

    pub fn set_options(&self, patch: OptionsPatch) -> Result<()> {
        self.dispatch(Action::SetOptions(patch))
    }

    /// Replace the addon list with a copy of `modules`.
    pub fn set_addon_modules(&self, modules: &[AddonModule]) -> Result<()> {
        self.dispatch(Action::SetAddonModules(modules.to_vec()))
    }

    pub fn add_chat_item(&self, item: ChatItem) -> Result<()> {
        self.dispatch(Action::AddChatItem(item))
    }

    pub fn reset(&self) -> Result<()> {
        self.dispatch(Action::Reset)
    }
}
