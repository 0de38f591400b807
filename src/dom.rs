//! A retained element tree that widgets, pages and forms render into.
//!
//! An [Element] is a cheap, clonable handle to a node; clones refer to the same
//! node. Markup produced by the view functions in [crate::html] is parsed into
//! nodes with [scraper], and the tree can be serialized back to HTML for the
//! host to display.
//!
//! Lookups take a class name without the leading dot, e.g. `"content-title"`.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use maud::{Markup, html};
use scraper::{ElementRef, Html, Node as ParsedNode};

const VOID_ELEMENTS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// Form controls cleared by [Element::reset].
const RESETTABLE_INPUT_TYPES: [&str; 8] = [
    "text", "number", "email", "password", "search", "tel", "url", "date",
];

/// A handle to an element in the tree.
#[derive(Clone)]
pub struct Element(Arc<Mutex<Node>>);

#[derive(Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Child>,
}

#[derive(Clone)]
enum Child {
    Element(Element),
    Text(String),
}

impl Element {
    /// Create an empty, detached element.
    pub fn new(tag: &str) -> Self {
        Self(Arc::new(Mutex::new(Node {
            tag: tag.to_owned(),
            ..Default::default()
        })))
    }

    /// Parse `html` and return its first top-level element, if any.
    ///
    /// Hosts use this to mount the page skeleton that components bind to.
    pub fn parse(html: &str) -> Option<Self> {
        parse_children(html).into_iter().find_map(|child| match child {
            Child::Element(element) => Some(element),
            Child::Text(_) => None,
        })
    }

    fn node(&self) -> MutexGuard<'_, Node> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `self` and `other` are handles to the same node.
    pub fn same_node(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The tag name, e.g. `"div"`.
    pub fn tag(&self) -> String {
        self.node().tag.clone()
    }

    /// The value of the attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node().attributes.get(name).cloned()
    }

    /// Set the attribute `name` to `value`.
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.node()
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    /// Remove the attribute `name`.
    pub fn remove_attribute(&self, name: &str) {
        self.node().attributes.remove(name);
    }

    /// The value of the `data-{key}` attribute.
    pub fn data(&self, key: &str) -> Option<String> {
        self.attribute(&format!("data-{key}"))
    }

    /// The classes in the `class` attribute, in order.
    pub fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|class| class.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Whether the element has the class `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.node()
            .attributes
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Add `class` unless it is already present.
    pub fn add_class(&self, class: &str) {
        let mut classes = self.classes();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
            self.set_attribute("class", &classes.join(" "));
        }
    }

    /// Remove every occurrence of `class`.
    pub fn remove_class(&self, class: &str) {
        let classes = self.classes();
        if classes.iter().any(|c| c == class) {
            let remaining: Vec<_> = classes.into_iter().filter(|c| c != class).collect();
            self.set_attribute("class", &remaining.join(" "));
        }
    }

    /// The child elements, skipping text.
    pub fn children(&self) -> Vec<Element> {
        self.node()
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(element) => Some(element.clone()),
                Child::Text(_) => None,
            })
            .collect()
    }

    /// Every element below this one, in document order.
    pub fn descendants(&self) -> Vec<Element> {
        let mut found = Vec::new();
        for child in self.children() {
            found.push(child.clone());
            found.extend(child.descendants());
        }
        found
    }

    /// The first descendant with the class `class`.
    pub fn query(&self, class: &str) -> Option<Element> {
        for child in self.children() {
            if child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.query(class) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant with the class `class`, in document order.
    pub fn query_all(&self, class: &str) -> Vec<Element> {
        self.descendants()
            .into_iter()
            .filter(|element| element.has_class(class))
            .collect()
    }

    /// The nearest element with the class `class` among `target` and its
    /// ancestors, stopping at `self`.
    ///
    /// Returns `None` if `target` is not inside `self`.
    pub fn closest(&self, target: &Element, class: &str) -> Option<Element> {
        self.path_to(target)?
            .into_iter()
            .rev()
            .find(|element| element.has_class(class))
    }

    fn path_to(&self, target: &Element) -> Option<Vec<Element>> {
        if self.same_node(target) {
            return Some(vec![self.clone()]);
        }

        self.children().into_iter().find_map(|child| {
            child.path_to(target).map(|mut path| {
                path.insert(0, self.clone());
                path
            })
        })
    }

    /// Remove every descendant with the class `class`.
    pub fn remove_all(&self, class: &str) {
        let remaining = {
            let mut node = self.node();
            node.children
                .retain(|child| !matches!(child, Child::Element(element) if element.has_class(class)));
            node.children.clone()
        };

        for child in remaining {
            if let Child::Element(element) = child {
                element.remove_all(class);
            }
        }
    }

    /// Append `child` as the last child.
    pub fn append(&self, child: Element) {
        self.node().children.push(Child::Element(child));
    }

    /// Parse `markup` and append the result after the existing children.
    pub fn append_html(&self, markup: Markup) {
        let parsed = parse_children(&markup.into_string());
        self.node().children.extend(parsed);
    }

    /// Replace the children with the parsed `markup`.
    pub fn set_inner_html(&self, markup: Markup) {
        let parsed = parse_children(&markup.into_string());
        self.node().children = parsed;
    }

    /// The concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let children = self.node().children.clone();
        children
            .into_iter()
            .map(|child| match child {
                Child::Element(element) => element.text_content(),
                Child::Text(text) => text,
            })
            .collect()
    }

    /// Replace the children with a single text node.
    pub fn set_text_content(&self, text: &str) {
        let mut node = self.node();
        node.children.clear();
        if !text.is_empty() {
            node.children.push(Child::Text(text.to_owned()));
        }
    }

    /// Clear the values of the text-like controls under this element, as a
    /// form reset does for controls without default values.
    pub fn reset(&self) {
        for element in self.descendants() {
            match element.tag().as_str() {
                "input" => {
                    let input_type = element.attribute("type").unwrap_or_else(|| "text".to_owned());
                    if RESETTABLE_INPUT_TYPES.contains(&input_type.as_str()) {
                        element.remove_attribute("value");
                    }
                }
                "textarea" => element.set_text_content(""),
                _ => {}
            }
        }
    }

    /// The HTML of the children.
    pub fn inner_html(&self) -> String {
        let children = self.node().children.clone();
        children
            .into_iter()
            .map(|child| match child {
                Child::Element(element) => element.outer_html(),
                Child::Text(text) => escape(&text),
            })
            .collect()
    }

    /// The HTML of this element, including itself.
    pub fn outer_html(&self) -> String {
        let (tag, attributes) = {
            let node = self.node();
            (node.tag.clone(), node.attributes.clone())
        };

        let mut html = format!("<{tag}");
        for (name, value) in &attributes {
            html.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        html.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return html;
        }

        html.push_str(&self.inner_html());
        html.push_str(&format!("</{tag}>"));
        html
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

fn escape(text: &str) -> String {
    html!((text)).into_string()
}

fn parse_children(html: &str) -> Vec<Child> {
    let fragment = Html::parse_fragment(html);

    convert_children(fragment.root_element())
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Child> {
    parent
        .children()
        .filter_map(|child| {
            if let Some(element) = ElementRef::wrap(child) {
                return Some(Child::Element(convert_element(element)));
            }

            match child.value() {
                ParsedNode::Text(text) => Some(Child::Text(text.to_string())),
                _ => None,
            }
        })
        .collect()
}

fn convert_element(parsed: ElementRef<'_>) -> Element {
    let value = parsed.value();
    let element = Element::new(value.name());
    {
        let mut node = element.node();
        node.attributes = value
            .attrs()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        node.children = convert_children(parsed);
    }
    element
}
