use crate::constants::{PREFERS_DARK_QUERY, THEME_FADE_MS, THEME_TOGGLE_ID};
use crate::dom::{self, Listener};
use folio_core::{Subscription, Theme, ThemeContext, ThemeHost, THEME_STORAGE_KEY};
use web_sys as web;

/// Theme host backed by `localStorage`, `matchMedia` and the root element's
/// class list.
pub struct WebThemeHost {
    window: web::Window,
}

impl WebThemeHost {
    pub fn new(window: web::Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Option<web::Storage> {
        self.window.local_storage().ok().flatten()
    }
}

impl ThemeHost for WebThemeHost {
    fn load_preference(&self) -> Option<String> {
        self.storage()?.get_item(THEME_STORAGE_KEY).ok().flatten()
    }

    fn store_preference(&self, value: &str) {
        match self.storage() {
            Some(s) => {
                if let Err(e) = s.set_item(THEME_STORAGE_KEY, value) {
                    log::warn!("[theme] could not persist preference: {:?}", e);
                }
            }
            None => log::warn!("[theme] localStorage unavailable"),
        }
    }

    fn prefers_dark(&self) -> bool {
        self.window
            .match_media(PREFERS_DARK_QUERY)
            .ok()
            .flatten()
            .is_some_and(|m| m.matches())
    }

    fn apply_mode_marker(&self, theme: Theme) {
        let Some(root) = self.window.document().and_then(|d| d.document_element()) else {
            return;
        };
        let classes = root.class_list();
        _ = classes.remove_1(theme.toggled().mode_class());
        _ = classes.add_1(theme.mode_class());
    }
}

/// Wire `#theme-toggle` to flip the theme with a brief full-screen fade, and
/// keep the button's pressed state in sync.
pub fn wire_toggle(
    window: &web::Window,
    document: &web::Document,
    ctx: &ThemeContext,
) -> anyhow::Result<Option<(Listener, Subscription)>> {
    let Some(button) = document.get_element_by_id(THEME_TOGGLE_ID) else {
        log::debug!("[theme] no #{}; toggle not wired", THEME_TOGGLE_ID);
        return Ok(None);
    };
    sync_button(&button, ctx.theme());

    let button_sync = button.clone();
    let subscription = ctx.subscribe(move |theme| sync_button(&button_sync, theme));

    let ctx_click = ctx.clone();
    let window = window.clone();
    let document = document.clone();
    let listener = Listener::new(button.as_ref(), "click", move |_| {
        if let Err(e) = fade(&window, &document) {
            log::debug!("[theme] fade skipped: {:?}", e);
        }
        ctx_click.toggle();
    })?;
    Ok(Some((listener, subscription)))
}

fn sync_button(button: &web::Element, theme: Theme) {
    _ = button.set_attribute("aria-pressed", if theme.is_dark() { "true" } else { "false" });
    _ = button.set_attribute(
        "aria-label",
        if theme.is_dark() {
            "Switch to light mode"
        } else {
            "Switch to dark mode"
        },
    );
}

fn fade(window: &web::Window, document: &web::Document) -> anyhow::Result<()> {
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    let overlay = dom::create_element(document, "div", "theme-fade")?;
    dom::append(&body, &overlay)?;
    dom::set_timeout_once(window, THEME_FADE_MS, move || overlay.remove());
    Ok(())
}
