//! Shared light/dark theme flag.
//!
//! One [`ThemeProvider`] is installed at start-up; components obtain a
//! [`ThemeContext`] through [`use_theme`] and either read the flag or
//! subscribe to changes. [`ThemeContext::toggle`] is the only write path, so
//! writes stay serialized on the UI thread and every subscriber observes the
//! same sequence of values.

use crate::constants::{DARK_MODE_CLASS, LIGHT_MODE_CLASS};
use crate::error::ThemeError;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    #[inline]
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    #[inline]
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Value written to preference storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Anything other than `"dark"` reads back as light.
    pub fn from_stored(value: &str) -> Theme {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Class placed on the document root.
    pub fn mode_class(self) -> &'static str {
        match self {
            Theme::Dark => DARK_MODE_CLASS,
            Theme::Light => LIGHT_MODE_CLASS,
        }
    }

    pub fn from_dark_flag(dark: bool) -> Theme {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Platform capabilities the theme state needs: a persistent key-value slot,
/// the OS colour-scheme preference, and the document mode marker.
pub trait ThemeHost {
    fn load_preference(&self) -> Option<String>;
    fn store_preference(&self, value: &str);
    fn prefers_dark(&self) -> bool;
    fn apply_mode_marker(&self, theme: Theme);
}

/// In-memory host, used off-browser.
#[derive(Clone, Default)]
pub struct MemoryThemeHost {
    inner: Rc<MemoryHostState>,
}

#[derive(Default)]
struct MemoryHostState {
    stored: RefCell<Option<String>>,
    prefers_dark: Cell<bool>,
    marker: Cell<Option<Theme>>,
}

impl MemoryThemeHost {
    pub fn new(stored: Option<&str>, prefers_dark: bool) -> Self {
        let host = Self::default();
        *host.inner.stored.borrow_mut() = stored.map(str::to_owned);
        host.inner.prefers_dark.set(prefers_dark);
        host
    }

    pub fn stored(&self) -> Option<String> {
        self.inner.stored.borrow().clone()
    }

    pub fn marker(&self) -> Option<Theme> {
        self.inner.marker.get()
    }
}

impl ThemeHost for MemoryThemeHost {
    fn load_preference(&self) -> Option<String> {
        self.inner.stored.borrow().clone()
    }

    fn store_preference(&self, value: &str) {
        *self.inner.stored.borrow_mut() = Some(value.to_owned());
    }

    fn prefers_dark(&self) -> bool {
        self.inner.prefers_dark.get()
    }

    fn apply_mode_marker(&self, theme: Theme) {
        self.inner.marker.set(Some(theme));
    }
}

type Listener = Rc<dyn Fn(Theme)>;

struct ThemeShared {
    host: Box<dyn ThemeHost>,
    theme: Cell<Theme>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

thread_local! {
    static ACTIVE: RefCell<Option<Rc<ThemeShared>>> = RefCell::new(None);
}

/// Owns the active theme state for as long as it lives. Dropping the provider
/// uninstalls it; later [`use_theme`] calls fail.
pub struct ThemeProvider {
    shared: Rc<ThemeShared>,
}

impl ThemeProvider {
    pub fn install(host: impl ThemeHost + 'static) -> Result<Self, ThemeError> {
        if ACTIVE.with(|a| a.borrow().is_some()) {
            return Err(ThemeError::AlreadyInstalled);
        }
        let theme = resolve_initial(&host);
        host.apply_mode_marker(theme);
        let shared = Rc::new(ThemeShared {
            host: Box::new(host),
            theme: Cell::new(theme),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        });
        ACTIVE.with(|a| *a.borrow_mut() = Some(shared.clone()));
        log::info!("[theme] provider installed, initial={}", theme.as_str());
        Ok(Self { shared })
    }

    pub fn context(&self) -> ThemeContext {
        ThemeContext {
            shared: self.shared.clone(),
        }
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        ACTIVE.with(|a| {
            let mut active = a.borrow_mut();
            if active
                .as_ref()
                .is_some_and(|s| Rc::ptr_eq(s, &self.shared))
            {
                *active = None;
            }
        });
        log::debug!("[theme] provider uninstalled");
    }
}

fn resolve_initial(host: &dyn ThemeHost) -> Theme {
    match host.load_preference() {
        Some(stored) if !stored.is_empty() => Theme::from_stored(&stored),
        _ => {
            let theme = Theme::from_dark_flag(host.prefers_dark());
            host.store_preference(theme.as_str());
            theme
        }
    }
}

/// Look up the installed provider.
pub fn use_theme() -> Result<ThemeContext, ThemeError> {
    ACTIVE
        .with(|a| a.borrow().clone())
        .map(|shared| ThemeContext { shared })
        .ok_or(ThemeError::OutsideProvider)
}

#[derive(Clone)]
pub struct ThemeContext {
    shared: Rc<ThemeShared>,
}

impl ThemeContext {
    pub fn theme(&self) -> Theme {
        self.shared.theme.get()
    }

    pub fn is_dark(&self) -> bool {
        self.theme().is_dark()
    }

    /// Flip the flag, persist it, update the mode marker, then notify
    /// subscribers in subscription order.
    pub fn toggle(&self) -> Theme {
        let next = self.shared.theme.get().toggled();
        self.shared.theme.set(next);
        self.shared.host.store_preference(next.as_str());
        self.shared.host.apply_mode_marker(next);
        log::info!("[theme] toggled to {}", next.as_str());
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(next);
        }
        next
    }

    pub fn subscribe(&self, listener: impl Fn(Theme) + 'static) -> Subscription {
        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            shared: Rc::downgrade(&self.shared),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }
}

/// Keeps a theme listener registered; dropping it unsubscribes.
pub struct Subscription {
    shared: Weak<ThemeShared>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
