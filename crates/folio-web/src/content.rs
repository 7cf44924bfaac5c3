use crate::constants::{
    PROJECTS_ID, PROJECT_FILTERS_ID, RESUME_BUTTON_ID, SKILLS_FRAMEWORKS_ID, SKILLS_LANGUAGES_ID,
    SKILLS_TOOLS_ID,
};
use crate::dom::{self, Listener};
use folio_core::content::{
    projects_in, Project, ProjectCategory, FRAMEWORK_SKILLS, LANGUAGE_SKILLS, RESUME_URL,
    TOOL_SKILLS,
};
use folio_core::{Notifier, Toast};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Fill the static sections and wire the project filters and resume button.
/// Missing mount points are skipped.
pub fn render(
    window: &web::Window,
    document: &web::Document,
    notifier: Rc<dyn Notifier>,
) -> anyhow::Result<Vec<Listener>> {
    for (id, skills) in [
        (SKILLS_LANGUAGES_ID, LANGUAGE_SKILLS),
        (SKILLS_FRAMEWORKS_ID, FRAMEWORK_SKILLS),
        (SKILLS_TOOLS_ID, TOOL_SKILLS),
    ] {
        if let Some(el) = document.get_element_by_id(id) {
            render_skills(document, &el, skills)?;
        }
    }

    let mut listeners = Vec::new();
    if let Some(list) = document.get_element_by_id(PROJECTS_ID) {
        render_projects(document, &list, ProjectCategory::All)?;
        if let Some(bar) = document.get_element_by_id(PROJECT_FILTERS_ID) {
            listeners.extend(render_filters(document, &bar, &list)?);
        }
    }

    let window = window.clone();
    if let Some(l) = dom::add_click_listener(document, RESUME_BUTTON_ID, move || {
        match window.open_with_url_and_target(RESUME_URL, "_blank") {
            Ok(_) => notifier.notify(Toast::resume_opened()),
            Err(e) => log::warn!("[content] could not open resume: {:?}", e),
        }
    })? {
        listeners.push(l);
    }
    Ok(listeners)
}

fn render_skills(
    document: &web::Document,
    container: &web::Element,
    skills: &[&str],
) -> anyhow::Result<()> {
    container.set_inner_html("");
    for skill in skills {
        let tag = dom::create_element(document, "span", "skill-tag")?;
        tag.set_text_content(Some(skill));
        dom::append(container, &tag)?;
    }
    Ok(())
}

fn render_projects(
    document: &web::Document,
    list: &web::Element,
    category: ProjectCategory,
) -> anyhow::Result<()> {
    list.set_inner_html("");
    let mut shown = 0;
    for project in projects_in(category) {
        dom::append(list, &project_card(document, project)?)?;
        shown += 1;
    }
    log::debug!("[content] {} projects under {}", shown, category.id());
    Ok(())
}

fn project_card(document: &web::Document, p: &Project) -> anyhow::Result<web::HtmlElement> {
    let card = dom::create_element(document, "article", "project-card")?;

    let img = dom::create_element(document, "img", "project-image")?
        .dyn_into::<web::HtmlImageElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    img.set_src(p.image);
    img.set_alt(p.title);
    _ = img.set_attribute("loading", "lazy");
    dom::append(&card, &img)?;

    let title = dom::create_element(document, "h3", "project-title")?;
    title.set_text_content(Some(p.title));
    dom::append(&card, &title)?;

    let description = dom::create_element(document, "p", "project-description")?;
    description.set_text_content(Some(p.description));
    dom::append(&card, &description)?;

    let tags = dom::create_element(document, "div", "project-tags")?;
    for t in p.tags {
        let tag = dom::create_element(document, "span", "project-tag")?;
        tag.set_text_content(Some(t));
        dom::append(&tags, &tag)?;
    }
    dom::append(&card, &tags)?;

    let links = dom::create_element(document, "div", "project-links")?;
    for (label, href) in [("GitHub", p.github), ("Live Demo", p.live)] {
        let Some(href) = href else { continue };
        let a = dom::create_element(document, "a", "project-link")?
            .dyn_into::<web::HtmlAnchorElement>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        a.set_href(href);
        a.set_target("_blank");
        a.set_rel("noopener noreferrer");
        a.set_text_content(Some(label));
        dom::append(&links, &a)?;
    }
    dom::append(&card, &links)?;
    Ok(card)
}

fn render_filters(
    document: &web::Document,
    bar: &web::Element,
    list: &web::Element,
) -> anyhow::Result<Vec<Listener>> {
    bar.set_inner_html("");
    let mut buttons = Vec::with_capacity(ProjectCategory::FILTERS.len());
    for category in ProjectCategory::FILTERS {
        let class = if category == ProjectCategory::All {
            "filter-button active"
        } else {
            "filter-button"
        };
        let button = dom::create_element(document, "button", class)?;
        button.set_text_content(Some(category.label()));
        _ = button.set_attribute("type", "button");
        _ = button.set_attribute("data-filter", category.id());
        dom::append(bar, &button)?;
        buttons.push(button);
    }

    let buttons = Rc::new(buttons);
    let mut listeners = Vec::with_capacity(buttons.len());
    for (i, category) in ProjectCategory::FILTERS.into_iter().enumerate() {
        let all = buttons.clone();
        let document = document.clone();
        let list = list.clone();
        listeners.push(Listener::new(buttons[i].as_ref(), "click", move |_| {
            for (j, b) in all.iter().enumerate() {
                _ = b.class_list().toggle_with_force("active", i == j);
            }
            if let Err(e) = render_projects(&document, &list, category) {
                log::error!("[content] filter render failed: {:?}", e);
            }
        })?);
    }
    Ok(listeners)
}
