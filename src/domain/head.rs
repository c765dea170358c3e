//! Document-head model: the shared element tree every page render writes into,
//! and the identity scheme that marks which link elements this crate owns.

/// Identity marker applied to every link element the tag manager creates.
///
/// Removal matches on this prefix alone, so elements carrying it are fair game
/// for cleanup at any time; everything else in the head is foreign and must be
/// left untouched.
pub const MANAGED_ID_PREFIX: &str = "ard-";

/// Compute the identity attribute for a managed link element.
///
/// With a page id the identity is `ard-<page_id>`; without one it is the bare
/// prefix, which still marks the element as managed.
pub fn managed_identity(page_id: Option<&str>) -> String {
    match page_id {
        Some(page_id) => format!("{MANAGED_ID_PREFIX}{page_id}"),
        None => MANAGED_ID_PREFIX.to_string(),
    }
}

pub fn is_managed_identity(id: &str) -> bool {
    id.starts_with(MANAGED_ID_PREFIX)
}

/// A link-type metadata tag requested by a page: an ordered attribute bag plus
/// an optional owning page id.
///
/// Attributes are kept as an explicit list, not a map, so they are applied to
/// the element in insertion order.
#[derive(Debug, Clone, Default)]
pub struct LinkTag {
    attributes: Vec<(String, String)>,
    page_id: Option<String>,
}

impl LinkTag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `rel="canonical"` link scoped to the given page.
    pub fn canonical(href: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self::new()
            .attr("rel", "canonical")
            .attr("href", href)
            .for_page(page_id)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn for_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub fn identity(&self) -> String {
        managed_identity(self.page_id())
    }
}

/// A link element as attached to the head: its identity attribute plus the
/// remaining attributes in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkElement {
    pub id: String,
    pub attributes: Vec<(String, String)>,
}

impl LinkElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One child of the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadNode {
    Title(String),
    Meta { name: String, content: String },
    Link(LinkElement),
}

/// In-memory model of the live document head.
///
/// Pages write their title and meta set directly; link elements go through the
/// tag manager in `application::head`, which only ever touches nodes whose
/// identity carries [`MANAGED_ID_PREFIX`]. The `detached` constructor models a
/// document without a head, which every mutation must tolerate.
#[derive(Debug, Clone)]
pub struct DocumentHead {
    nodes: Vec<HeadNode>,
    available: bool,
}

impl Default for DocumentHead {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentHead {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            available: true,
        }
    }

    /// A document whose head cannot be reached. Mutations are rejected and
    /// rendering yields nothing.
    pub fn detached() -> Self {
        Self {
            nodes: Vec::new(),
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn nodes(&self) -> &[HeadNode] {
        &self.nodes
    }

    /// Replace the document title, appending one if none exists yet.
    pub fn set_title(&mut self, title: impl Into<String>) {
        if !self.available {
            return;
        }
        let title = title.into();
        for node in &mut self.nodes {
            if let HeadNode::Title(existing) = node {
                *existing = title;
                return;
            }
        }
        self.nodes.push(HeadNode::Title(title));
    }

    /// Set a `name`/`content` meta pair, replacing an existing node with the
    /// same name so repeated page renders do not accumulate duplicates.
    pub fn upsert_meta(&mut self, name: impl Into<String>, content: impl Into<String>) {
        if !self.available {
            return;
        }
        let name = name.into();
        let content = content.into();
        for node in &mut self.nodes {
            if let HeadNode::Meta {
                name: existing,
                content: value,
            } = node
                && *existing == name
            {
                *value = content;
                return;
            }
        }
        self.nodes.push(HeadNode::Meta { name, content });
    }

    pub fn push_link(&mut self, element: LinkElement) {
        if !self.available {
            return;
        }
        self.nodes.push(HeadNode::Link(element));
    }

    /// Identity attributes of every link element, in document order.
    pub fn link_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                HeadNode::Link(element) => Some(element.id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn remove_link(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes
            .retain(|node| !matches!(node, HeadNode::Link(element) if element.id == id));
        self.nodes.len() != before
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkElement> {
        self.nodes.iter().filter_map(|node| match node {
            HeadNode::Link(element) => Some(element),
            _ => None,
        })
    }

    /// Serialize the head contents as HTML fragment lines.
    pub fn render_html(&self) -> String {
        if !self.available {
            return String::new();
        }

        let mut out = String::new();
        for node in &self.nodes {
            match node {
                HeadNode::Title(title) => {
                    out.push_str("<title>");
                    out.push_str(&escape_text(title));
                    out.push_str("</title>\n");
                }
                HeadNode::Meta { name, content } => {
                    out.push_str("<meta name=\"");
                    out.push_str(&escape_attr(name));
                    out.push_str("\" content=\"");
                    out.push_str(&escape_attr(content));
                    out.push_str("\">\n");
                }
                HeadNode::Link(element) => {
                    out.push_str("<link");
                    if !element.id.is_empty() {
                        out.push_str(" id=\"");
                        out.push_str(&escape_attr(&element.id));
                        out.push('"');
                    }
                    for (name, value) in &element.attributes {
                        out.push(' ');
                        out.push_str(&escape_attr(name));
                        out.push_str("=\"");
                        out.push_str(&escape_attr(value));
                        out.push('"');
                    }
                    out.push_str(">\n");
                }
            }
        }
        out
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
