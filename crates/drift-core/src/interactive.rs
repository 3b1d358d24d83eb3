//! Interactive-target classification.
//!
//! A pointer over a link, button or form control puts the avatar in its
//! hovering state. Matching walks from the event target up through its
//! ancestors, like `Element::closest`, against a configurable rule set.

use crate::pointer::InteractiveHit;
use fnv::FnvHashSet;

/// Minimal element view the matcher needs. Hosts implement it for their DOM node type.
pub trait ElementLike: Sized {
    /// Upper- or lower-case tag name; compared case-insensitively.
    fn tag_name(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    fn parent(&self) -> Option<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorRule {
    /// `a`, `button`, ...
    Tag(String),
    /// `[role="button"]`
    Role(String),
    /// `.social-link`
    Class(String),
    /// `input:not([type="hidden"])`
    VisibleInput,
}

impl SelectorRule {
    fn matches<E: ElementLike>(&self, element: &E) -> bool {
        match self {
            SelectorRule::Tag(tag) => element.tag_name().eq_ignore_ascii_case(tag),
            SelectorRule::Role(role) => element.attribute("role").as_deref() == Some(role.as_str()),
            SelectorRule::Class(class) => element.has_class(class),
            SelectorRule::VisibleInput => {
                element.tag_name().eq_ignore_ascii_case("input")
                    && !element
                        .attribute("type")
                        .map(|t| t.eq_ignore_ascii_case("hidden"))
                        .unwrap_or(false)
            }
        }
    }

    fn to_css(&self) -> String {
        match self {
            SelectorRule::Tag(tag) => tag.to_ascii_lowercase(),
            SelectorRule::Role(role) => format!("[role=\"{}\"]", role),
            SelectorRule::Class(class) => format!(".{}", class),
            SelectorRule::VisibleInput => "input:not([type=\"hidden\"])".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct InteractiveSelectors {
    rules: Vec<SelectorRule>,
    form_controls: FnvHashSet<String>,
}

impl Default for InteractiveSelectors {
    fn default() -> Self {
        let rules = vec![
            SelectorRule::Tag("a".into()),
            SelectorRule::Tag("button".into()),
            SelectorRule::Role("button".into()),
            SelectorRule::Tag("summary".into()),
            SelectorRule::VisibleInput,
            SelectorRule::Tag("textarea".into()),
            SelectorRule::Tag("select".into()),
            SelectorRule::Class("social-link".into()),
            SelectorRule::Class("language".into()),
        ];
        Self::new(rules, ["INPUT", "TEXTAREA", "SELECT"])
    }
}

impl InteractiveSelectors {
    pub fn new<'a>(rules: Vec<SelectorRule>, form_controls: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rules,
            form_controls: form_controls
                .into_iter()
                .map(|t| t.to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn with_rule(mut self, rule: SelectorRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[SelectorRule] {
        &self.rules
    }

    /// Equivalent CSS selector list.
    pub fn to_css(&self) -> String {
        self.rules
            .iter()
            .map(SelectorRule::to_css)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn matches<E: ElementLike>(&self, element: &E) -> bool {
        self.rules.iter().any(|rule| rule.matches(element))
    }

    /// Closest matching ancestor-or-self, classified for reading.
    pub fn closest<E: ElementLike>(&self, element: E) -> Option<InteractiveHit> {
        let mut cursor = Some(element);
        while let Some(el) = cursor {
            if self.matches(&el) {
                let tag = el.tag_name().to_ascii_uppercase();
                return Some(InteractiveHit {
                    reading: self.form_controls.contains(&tag),
                });
            }
            cursor = el.parent();
        }
        None
    }

    /// Classify an optional target; targets that are not elements are never interactive.
    pub fn classify<E: ElementLike>(&self, target: Option<E>) -> Option<InteractiveHit> {
        target.and_then(|el| self.closest(el))
    }
}
