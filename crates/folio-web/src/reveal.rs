//! Header entrance and per-section scroll reveals.
//!
//! Elements only get classes added; the stylesheet owns the transitions.

use crate::constants::{
    HEADER_ITEM_SELECTOR, REVEAL_ITEM_SELECTOR, REVEAL_SECTION_IDS, VISIBLE_CLASS,
};
use crate::dom::{self, Listener};
use folio_core::{stagger_delay, RevealTracker, HEADER_STAGGER, REVEAL_STAGGER};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Stagger the header in, then reveal each section the first time its top
/// crosses the reveal line. The returned listener keeps the scroll check
/// alive; `None` when the page has no revealable sections.
pub fn mount(window: &web::Window, document: &web::Document) -> anyhow::Result<Option<Listener>> {
    match document.query_selector_all(HEADER_ITEM_SELECTOR) {
        Ok(items) => stagger_in(window, &items, HEADER_STAGGER),
        Err(e) => log::warn!("[reveal] header query failed: {:?}", e),
    }

    let sections: Vec<web::Element> = REVEAL_SECTION_IDS
        .iter()
        .filter_map(|id| document.get_element_by_id(id))
        .collect();
    if sections.is_empty() {
        log::debug!("[reveal] no sections on page");
        return Ok(None);
    }

    let tracker = Rc::new(RefCell::new(RevealTracker::new(sections.len())));
    let win = window.clone();
    let check = move || {
        if tracker.borrow().all_revealed() {
            return;
        }
        let view_h = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let tops: Vec<f64> = sections
            .iter()
            .map(|s| s.get_bounding_client_rect().top())
            .collect();
        let newly = tracker.borrow_mut().update(&tops, view_h);
        for i in newly {
            let section = &sections[i];
            log::debug!("[reveal] #{}", section.id());
            _ = section.class_list().add_1(VISIBLE_CLASS);
            match section.query_selector_all(REVEAL_ITEM_SELECTOR) {
                Ok(items) => stagger_in(&win, &items, REVEAL_STAGGER),
                Err(e) => log::warn!("[reveal] item query failed: {:?}", e),
            }
        }
    };
    check();
    let listener = Listener::new(window.as_ref(), "scroll", move |_| check())?;
    Ok(Some(listener))
}

fn stagger_in(window: &web::Window, items: &web::NodeList, step: Duration) {
    for i in 0..items.length() {
        let Some(el) = items.get(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let delay = stagger_delay(i as usize, step);
        dom::set_timeout_once(window, dom::duration_ms(delay), move || {
            _ = el.class_list().add_1(VISIBLE_CLASS);
        });
    }
}
