//! Keyword routing for canned chat replies.
//!
//! Rules are evaluated top to bottom against the lowercased input and the
//! first match wins, so the order of [`ReplyTable::standard`] is part of its
//! behaviour: exact acknowledgements come before substring rules, and the
//! biography question comes before the generic keywords it may contain.

use crate::content::{CONTACT_EMAIL, GITHUB_PROFILE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matcher {
    /// Whole input, trimmed, equals one of the phrases.
    Exactly(&'static [&'static str]),
    /// Input contains any of the phrases.
    ContainsAny(&'static [&'static str]),
}

impl Matcher {
    /// `lowered` must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::Exactly(phrases) => {
                let trimmed = lowered.trim();
                phrases.iter().any(|p| *p == trimmed)
            }
            Matcher::ContainsAny(phrases) => phrases.iter().any(|p| lowered.contains(p)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyRule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub response: String,
}

/// Outcome of routing one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reply<'a> {
    /// Name of the matching rule, `None` for the fallback.
    pub rule: Option<&'static str>,
    pub text: &'a str,
}

pub const FALLBACK_REPLY: &str = "Hi, I am Satvik. The chatbot is not fully completed yet. \
If you want to talk to me, please send me an email.";

#[derive(Clone, Debug)]
pub struct ReplyTable {
    rules: Vec<ReplyRule>,
    fallback: String,
}

impl ReplyTable {
    pub fn new(rules: Vec<ReplyRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    pub fn standard() -> Self {
        let rules = vec![
            ReplyRule {
                name: "acknowledge",
                matcher: Matcher::Exactly(&["ok", "okay"]),
                response: "Great! Let me know if there's anything else you'd like to know.".into(),
            },
            ReplyRule {
                name: "biography",
                matcher: Matcher::ContainsAny(&["who is satvik"]),
                response: "Satvik Patil is a software developer who builds web applications \
                           with React and works with cloud platforms like AWS and Azure. \
                           He enjoys turning ideas into polished, responsive products."
                    .into(),
            },
            ReplyRule {
                name: "contact",
                matcher: Matcher::ContainsAny(&["contact"]),
                response: format!("You can contact Satvik at {CONTACT_EMAIL}"),
            },
            ReplyRule {
                name: "projects",
                matcher: Matcher::ContainsAny(&["project", "work"]),
                response: format!(
                    "Check out Satvik's GitHub for his latest projects: {GITHUB_PROFILE}"
                ),
            },
            ReplyRule {
                name: "skills",
                matcher: Matcher::ContainsAny(&["skills", "experience"]),
                response: "Satvik is skilled in JavaScript, React, Redux, Tailwind CSS, \
                           and has experience with AWS and Azure."
                    .into(),
            },
        ];
        Self::new(rules, FALLBACK_REPLY)
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn select(&self, input: &str) -> Reply<'_> {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matcher.matches(&lowered))
            .map(|r| Reply {
                rule: Some(r.name),
                text: &r.response,
            })
            .unwrap_or(Reply {
                rule: None,
                text: &self.fallback,
            })
    }

    pub fn respond(&self, input: &str) -> &str {
        self.select(input).text
    }
}

impl Default for ReplyTable {
    fn default() -> Self {
        Self::standard()
    }
}
