//! DOM view for the chat widget.
//!
//! The view owns no state of its own: it renders the transcript once, then
//! reacts to widget events. Input and submit go straight to the widget.

use crate::constants::{CHAT_ROOT_ID, VISIBLE_CLASS};
use crate::dom::{self, Listener};
use folio_core::{
    use_theme, ChatConfig, ChatEvent, ChatWidget, DeferredTask, Message, ReplyTable,
    Subscription, Theme, TimerScheduler, CHAT_ENTRANCE_DELAY,
};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct ChatView {
    widget: ChatWidget,
    entrance: DeferredTask,
    _listeners: Vec<Listener>,
    _theme: Subscription,
}

struct Elements {
    toggle: web::HtmlElement,
    panel: web::HtmlElement,
    messages: web::HtmlElement,
    form: web::HtmlFormElement,
    input: web::HtmlInputElement,
}

impl ChatView {
    /// Build the widget UI inside `#chat-root`. Returns `None` when the page
    /// has no chat mount point.
    pub fn mount(
        document: &web::Document,
        timers: Rc<dyn TimerScheduler>,
    ) -> anyhow::Result<Option<Self>> {
        let Some(root) = document.get_element_by_id(CHAT_ROOT_ID) else {
            log::info!("[chat] no #{}; widget disabled", CHAT_ROOT_ID);
            return Ok(None);
        };
        let theme = use_theme()?;
        let els = build(document, &root)?;
        apply_theme(&root, theme.theme());

        let toggle = els.toggle.clone();
        let entrance = DeferredTask::schedule(timers.clone(), CHAT_ENTRANCE_DELAY, move || {
            _ = toggle.class_list().add_1(VISIBLE_CLASS);
        });

        let widget = ChatWidget::new(timers, ReplyTable::standard(), ChatConfig::default());
        for message in widget.transcript() {
            append_message(document, &els.messages, &message)?;
        }

        let root_theme = root.clone();
        let theme_sub = theme.subscribe(move |t| apply_theme(&root_theme, t));

        let view_doc = document.clone();
        let panel = els.panel.clone();
        let messages = els.messages.clone();
        let input = els.input.clone();
        widget.subscribe(move |w, event| match event {
            ChatEvent::Opened => {
                _ = panel.class_list().remove_1("hidden");
                _ = panel.class_list().add_1("chat-enter");
                _ = input.focus();
            }
            ChatEvent::Closed => {
                _ = panel.class_list().remove_1("chat-enter");
                _ = panel.class_list().add_1("hidden");
            }
            ChatEvent::MessageAppended { index, .. } => {
                let Some(message) = w.message(*index) else {
                    return;
                };
                match append_message(&view_doc, &messages, &message) {
                    Ok(el) => scroll_to(&el),
                    Err(e) => log::error!("[chat] render failed: {:?}", e),
                }
            }
            ChatEvent::DraftChanged => {
                let draft = w.draft();
                if input.value() != draft {
                    input.set_value(&draft);
                }
            }
        });

        let mut listeners = Vec::with_capacity(3);
        let w = widget.clone();
        listeners.push(Listener::new(els.toggle.as_ref(), "click", move |_| {
            w.toggle();
        })?);
        let w = widget.clone();
        listeners.push(Listener::new(els.form.as_ref(), "submit", move |ev| {
            ev.prevent_default();
            w.submit_draft();
        })?);
        let w = widget.clone();
        let input = els.input.clone();
        listeners.push(Listener::new(els.input.as_ref(), "input", move |_| {
            w.set_draft(&input.value());
        })?);

        log::info!("[chat] mounted");
        Ok(Some(Self {
            widget,
            entrance,
            _listeners: listeners,
            _theme: theme_sub,
        }))
    }
}

impl Drop for ChatView {
    fn drop(&mut self) {
        self.entrance.cancel();
        self.widget.dispose();
    }
}

fn build(document: &web::Document, root: &web::Element) -> anyhow::Result<Elements> {
    let toggle = dom::create_element(document, "button", "chat-toggle")?;
    toggle.set_text_content(Some("Chat"));
    _ = toggle.set_attribute("type", "button");
    _ = toggle.set_attribute("aria-label", "Open chat");

    let panel = dom::create_element(document, "div", "chat-panel hidden")?;
    let header = dom::create_element(document, "div", "chat-header")?;
    header.set_text_content(Some("Chat with Satvik"));
    let messages = dom::create_element(document, "div", "chat-messages")?;

    let form = dom::create_element(document, "form", "chat-form")?
        .dyn_into::<web::HtmlFormElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let input = dom::create_element(document, "input", "chat-input")?
        .dyn_into::<web::HtmlInputElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    input.set_type("text");
    input.set_placeholder("Type a message...");
    let send = dom::create_element(document, "button", "chat-send")?;
    send.set_text_content(Some("Send"));
    _ = send.set_attribute("type", "submit");

    dom::append(&form, &input)?;
    dom::append(&form, &send)?;
    dom::append(&panel, &header)?;
    dom::append(&panel, &messages)?;
    dom::append(&panel, &form)?;
    dom::append(root, &panel)?;
    dom::append(root, &toggle)?;

    Ok(Elements {
        toggle,
        panel,
        messages,
        form,
        input,
    })
}

fn append_message(
    document: &web::Document,
    list: &web::HtmlElement,
    message: &Message,
) -> anyhow::Result<web::HtmlElement> {
    let class = if message.is_bot {
        "chat-message bot"
    } else {
        "chat-message user"
    };
    let el = dom::create_element(document, "div", class)?;
    el.set_text_content(Some(&message.text));
    dom::append(list, &el)?;
    Ok(el)
}

fn scroll_to(el: &web::HtmlElement) {
    let opts = web::ScrollIntoViewOptions::new();
    opts.set_behavior(web::ScrollBehavior::Smooth);
    opts.set_block(web::ScrollLogicalPosition::End);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}

fn apply_theme(root: &web::Element, theme: Theme) {
    _ = root.class_list().toggle_with_force("chat-dark", theme.is_dark());
}
