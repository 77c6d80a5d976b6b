/*!
 * Document tree for reading dialogue markup.
 *
 * Parsing is done by html5ever (through `scraper`), so input is read the
 * way a browser reads it: the full named character reference table,
 * legacy references without `;`, the windows-1252 remap of `&#128;`..`&#159;`,
 * CRLF normalisation, raw text and RCDATA elements, implicit end tags and
 * error recovery. This module only adds class-based selection on top.
 */

use scraper::{ElementRef, Html};

/// A parsed markup document
#[derive(Debug, Clone)]
pub struct Document {
    // @field: Parsed html5ever tree
    html: Html,
}

impl Document {
    /// Parse markup into a tree. Never fails; malformed input is repaired.
    pub fn parse(input: &str) -> Self {
        let html = Html::parse_document(input);
        if !html.errors.is_empty() {
            log::trace!("Recovered from {} markup parse errors", html.errors.len());
        }
        Self { html }
    }

    /// All elements carrying `class`, in document order
    pub fn elements_with_class<'a>(&'a self, class: &str) -> Vec<Element<'a>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(Element::from)
            .filter(|element| element.has_class(class))
            .collect()
    }

    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

/// An element of a parsed [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Element<'a> {
    fn from(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Element<'a> {
    /// Lowercase tag name
    pub fn name(&self) -> &'a str {
        self.inner.value().name()
    }

    /// Value of the attribute with this name
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.inner.value().classes()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        self.inner.text().collect()
    }

    /// First descendant (not self) carrying `class`, in document order
    pub fn find_class(&self, class: &str) -> Option<Element<'a>> {
        self.inner
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(Element::from)
            .find(|element| element.has_class(class))
    }

    /// All descendants (not self) carrying `class`, in document order
    pub fn elements_with_class(&self, class: &str) -> Vec<Element<'a>> {
        self.inner
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(Element::from)
            .filter(|element| element.has_class(class))
            .collect()
    }
}
