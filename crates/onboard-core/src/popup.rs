#![forbid(unsafe_code)]

//! Popup library configuration and navigation actions.

use std::collections::BTreeMap;

/// Class hook applied to every tour popup. Hosts look for a node carrying this
/// class to decide when the popup's root has been inserted.
pub const POPUP_CLASS: &str = "onboard-popover";

/// Handle to a popup instance owned by the host's popup library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(pub u64);

/// Navigation controls rendered inside a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupAction {
    Prev,
    Next,
    Done,
    Close,
}

impl PopupAction {
    pub const ALL: [Self; 4] = [Self::Prev, Self::Next, Self::Done, Self::Close];

    /// CSS class carried by the button that triggers this action.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Prev => "onboard-prev",
            Self::Next => "onboard-next",
            Self::Done => "onboard-finish",
            Self::Close => "onboard-close",
        }
    }

    /// Resolve a clicked element's class list to an action.
    #[must_use]
    pub fn from_class_list(classes: &str) -> Option<Self> {
        classes
            .split_whitespace()
            .find_map(|class| Self::ALL.into_iter().find(|a| a.class_name() == class))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Done => "done",
            Self::Close => "close",
        }
    }
}

/// When the library opens and closes the popup on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupTrigger {
    /// Never auto-open or auto-close on hover/focus.
    #[default]
    Manual,
    Click,
    Hover,
    Focus,
}

/// Which side of the anchor the popup sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Library chooses based on viewport space.
    #[default]
    Auto,
    Top,
    Bottom,
    Left,
    Right,
}

/// Where the popup node is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupContainer {
    /// The document body.
    #[default]
    Body,
    /// A specific element.
    Element(String),
}

/// Tag to allowed-attribute mapping used by the popup library's HTML
/// sanitizer. The `*` tag applies to every element; an attribute entry ending
/// in `*` is a prefix match (`aria-*`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowList {
    tags: BTreeMap<String, Vec<String>>,
}

impl AllowList {
    /// Wildcard key applying to every tag.
    pub const ANY_TAG: &'static str = "*";

    /// An allow list that permits nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The sanitizer defaults shipped with the popup library.
    #[must_use]
    pub fn library_default() -> Self {
        let mut list = Self::empty()
            .with_tag(Self::ANY_TAG, ["class", "dir", "id", "lang", "role", "aria-*"])
            .with_tag("a", ["target", "href", "title", "rel"])
            .with_tag("img", ["src", "srcset", "alt", "title", "width", "height"]);
        for tag in [
            "area", "b", "br", "col", "code", "div", "em", "hr", "h1", "h2", "h3", "h4", "h5",
            "h6", "i", "li", "ol", "p", "pre", "s", "small", "span", "sub", "sup", "strong", "u",
            "ul",
        ] {
            list = list.with_tag(tag, [] as [&str; 0]);
        }
        list
    }

    /// Library defaults extended with what the tour template needs. Entries
    /// replace, not merge with, the default for the same tag.
    #[must_use]
    pub fn tour_default() -> Self {
        Self::library_default()
            .with_tag("div", ["class"])
            .with_tag("h1", [] as [&str; 0])
            .with_tag("p", [] as [&str; 0])
            .with_tag("button", ["class"])
            .with_tag(Self::ANY_TAG, ["class"])
    }

    /// Set the allowed attributes for `tag`, replacing any previous entry.
    #[must_use]
    pub fn with_tag<I, S>(mut self, tag: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.insert(
            tag.to_ascii_lowercase(),
            attributes.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Whether `tag` may appear at all.
    #[must_use]
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(&tag.to_ascii_lowercase())
    }

    /// Whether `attribute` may appear on `tag`.
    #[must_use]
    pub fn allows(&self, tag: &str, attribute: &str) -> bool {
        let tag = tag.to_ascii_lowercase();
        if !self.tags.contains_key(&tag) {
            return false;
        }
        let attribute = attribute.to_ascii_lowercase();
        [tag.as_str(), Self::ANY_TAG]
            .into_iter()
            .filter_map(|key| self.tags.get(key))
            .flatten()
            .any(|allowed| match allowed.strip_suffix('*') {
                Some(prefix) => attribute.starts_with(prefix),
                None => *allowed == attribute,
            })
    }

    /// Allowed attributes for `tag`, if the tag is listed.
    #[must_use]
    pub fn attributes(&self, tag: &str) -> Option<&[String]> {
        self.tags.get(&tag.to_ascii_lowercase()).map(Vec::as_slice)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}

/// Configuration handed to the popup library on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupConfig {
    pub trigger: PopupTrigger,
    /// Tour-scoped style hook.
    pub custom_class: String,
    /// Content is markup, not text.
    pub html: bool,
    pub placement: Placement,
    pub container: PopupContainer,
    pub allow_list: AllowList,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            trigger: PopupTrigger::Manual,
            custom_class: POPUP_CLASS.to_string(),
            html: true,
            placement: Placement::Auto,
            container: PopupContainer::Body,
            allow_list: AllowList::tour_default(),
        }
    }
}
