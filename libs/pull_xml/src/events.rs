use alloc::string::String;
use alloc::vec::Vec;

use crate::attributes::Attribute;

/// One lexical unit of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument,
    EndDocument,
    /// `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`
    Declaration {
        version: String,
        encoding: String,
        standalone: Standalone,
    },
    DocType {
        name: String,
        public_id: String,
        system_id: String,
        /// Any token of the declaration that looks like a DTD file name.
        dtd: Option<String>,
    },
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
    },
    /// The tag name as written, not decoded.
    EndTag {
        name: String,
    },
    /// Entity-decoded character data. Whitespace-only runs are never reported.
    Text {
        content: String,
    },
    Comment {
        content: String,
    },
}

impl Event {
    /// Value of the first attribute called `name` on a start tag.
    /// ```
    /// # use pull_xml::{Attribute, Event};
    /// let event = Event::StartTag {
    ///     name: "item".into(),
    ///     attrs: vec![Attribute::new("id", "1"), Attribute::new("id", "2")],
    /// };
    /// assert_eq!(event.attr("id"), Some("1"));
    /// assert_eq!(event.attr("nonexistent"), None);
    /// assert_eq!(Event::EndDocument.attr("id"), None);
    /// ```
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Event::StartTag { attrs, .. } => attrs
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

/// The `standalone` pseudo-attribute of the document declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Standalone {
    Yes,
    No,
    #[default]
    Unspecified,
}

impl Standalone {
    pub(crate) fn from_value(value: Option<&str>) -> Self {
        match value {
            None => Standalone::Unspecified,
            Some(v) if v.eq_ignore_ascii_case("no") => Standalone::No,
            Some(_) => Standalone::Yes,
        }
    }

    /// A document is standalone unless it explicitly says `no`.
    pub fn is_standalone(self) -> bool {
        self != Standalone::No
    }
}
