use crate::constants::{TOASTS_ID, TOAST_DURATION_MS};
use crate::dom;
use folio_core::{Notifier, Toast};
use web_sys as web;

/// Appends toasts to `#toasts` (or the body) and removes each after
/// [`TOAST_DURATION_MS`].
pub struct WebNotifier {
    window: web::Window,
    document: web::Document,
}

impl WebNotifier {
    pub fn new(window: web::Window, document: web::Document) -> Self {
        Self { window, document }
    }

    fn show(&self, toast: &Toast) -> anyhow::Result<()> {
        let container: web::Node = match self.document.get_element_by_id(TOASTS_ID) {
            Some(el) => el.into(),
            None => self
                .document
                .body()
                .ok_or_else(|| anyhow::anyhow!("no body"))?
                .into(),
        };
        let el = dom::create_element(&self.document, "div", "toast")?;
        _ = el.set_attribute("role", "status");
        let title = dom::create_element(&self.document, "strong", "toast-title")?;
        title.set_text_content(Some(&toast.title));
        let description = dom::create_element(&self.document, "p", "toast-description")?;
        description.set_text_content(Some(&toast.description));
        dom::append(&el, &title)?;
        dom::append(&el, &description)?;
        dom::append(&container, &el)?;
        dom::set_timeout_once(&self.window, TOAST_DURATION_MS, move || el.remove());
        Ok(())
    }
}

impl Notifier for WebNotifier {
    fn notify(&self, toast: Toast) {
        log::info!("[toast] {}", toast.title);
        if let Err(e) = self.show(&toast) {
            log::warn!("[toast] could not show: {:?}", e);
        }
    }
}
