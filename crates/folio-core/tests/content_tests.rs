// Host-side tests for static page content.

use folio_core::content::{
    projects_in, ProjectCategory, FRAMEWORK_SKILLS, LANGUAGE_SKILLS, PROJECTS, RESUME_URL,
    TOOL_SKILLS,
};

#[test]
fn filter_counts() {
    let count = |c| projects_in(c).count();
    assert_eq!(count(ProjectCategory::All), PROJECTS.len());
    assert_eq!(PROJECTS.len(), 9);
    assert_eq!(count(ProjectCategory::Web), 5);
    assert_eq!(count(ProjectCategory::Cloud), 1);
    assert_eq!(count(ProjectCategory::UiUx), 2);
    assert_eq!(count(ProjectCategory::Design), 1);
}

#[test]
fn filter_ids_round_trip_and_labels() {
    for c in ProjectCategory::FILTERS {
        assert_eq!(ProjectCategory::from_id(c.id()), Some(c));
    }
    assert_eq!(ProjectCategory::from_id("mobile"), None);
    assert_eq!(ProjectCategory::All.label(), "All Projects");
    assert_eq!(ProjectCategory::Design.label(), "Python");
}

#[test]
fn every_project_is_reachable_from_a_filter() {
    for p in PROJECTS {
        assert!(!p.categories.is_empty(), "{} has no category", p.title);
        assert!(!p.tags.is_empty());
        assert!(p.github.is_some() || p.live.is_some());
    }
}

#[test]
fn skill_groups_are_populated() {
    assert!(LANGUAGE_SKILLS.contains(&"Python"));
    assert!(FRAMEWORK_SKILLS.contains(&"React"));
    assert!(TOOL_SKILLS.contains(&"AWS"));
    assert!(RESUME_URL.starts_with("https://"));
}

#[test]
fn resume_toast_is_recorded() {
    use folio_core::{Notifier, RecordingNotifier, Toast};

    let notifier = RecordingNotifier::default();
    notifier.notify(Toast::resume_opened());
    let shown = notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Resume Opened");
    assert_eq!(shown[0].description, "Resume is opening in a new tab");
}
