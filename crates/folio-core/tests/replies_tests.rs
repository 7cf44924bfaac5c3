// Host-side tests for chat reply routing.

use folio_core::content::{CONTACT_EMAIL, GITHUB_PROFILE};
use folio_core::{Matcher, ReplyRule, ReplyTable, FALLBACK_REPLY};

#[test]
fn rule_order_is_fixed() {
    assert_eq!(
        ReplyTable::standard().rule_names(),
        vec!["acknowledge", "biography", "contact", "projects", "skills"]
    );
}

#[test]
fn contact_mentions_email() {
    let table = ReplyTable::standard();
    let reply = table.select("How can I contact you?");
    assert_eq!(reply.rule, Some("contact"));
    assert!(reply.text.contains(CONTACT_EMAIL));
    assert_eq!(table.select("Can I get your contact").rule, Some("contact"));
}

#[test]
fn biography_wins_over_later_keywords() {
    let table = ReplyTable::standard();
    // Also contains "work", which would route to projects.
    let reply = table.select("Who is Satvik and what is his work?");
    assert_eq!(reply.rule, Some("biography"));
}

#[test]
fn acknowledgement_needs_whole_input() {
    let table = ReplyTable::standard();
    assert_eq!(table.select("ok").rule, Some("acknowledge"));
    assert_eq!(table.select("OK ").rule, Some("acknowledge"));
    assert_eq!(table.select("Okay").rule, Some("acknowledge"));
    assert_eq!(table.select("book").rule, None);
    assert_eq!(table.select("ok, show projects").rule, Some("projects"));
}

#[test]
fn projects_and_skills_keywords() {
    let table = ReplyTable::standard();
    let projects = table.select("Show me your PROJECTS");
    assert_eq!(projects.rule, Some("projects"));
    assert!(projects.text.contains(GITHUB_PROFILE));
    assert_eq!(table.select("where do you work").rule, Some("projects"));
    assert_eq!(table.select("what skills do you have").rule, Some("skills"));
    assert_eq!(table.select("years of experience?").rule, Some("skills"));
}

#[test]
fn unmatched_input_gets_fallback() {
    let table = ReplyTable::standard();
    let reply = table.select("hello there");
    assert_eq!(reply.rule, None);
    assert_eq!(reply.text, FALLBACK_REPLY);
    assert_eq!(table.respond("hello there"), table.fallback());
}

#[test]
fn custom_table_first_match_wins() {
    let table = ReplyTable::new(
        vec![
            ReplyRule {
                name: "first",
                matcher: Matcher::ContainsAny(&["a"]),
                response: "one".into(),
            },
            ReplyRule {
                name: "second",
                matcher: Matcher::ContainsAny(&["ab"]),
                response: "two".into(),
            },
        ],
        "none",
    );
    assert_eq!(table.respond("ab"), "one");
    assert_eq!(table.respond("zz"), "none");
}
