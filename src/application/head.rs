//! Lifecycle management for head link metadata.
//!
//! `HeadTagManager` owns the link elements this crate injects into a document
//! head (canonical URLs and friends). It writes through a [`HeadPort`], so the
//! same manager drives the per-request head model, the long-lived head used by
//! the static exporter, and the fakes used in tests.
//!
//! The contract, in order of importance:
//!
//! - at most one managed link element exists after any `add_link` call;
//! - only elements whose identity carries [`MANAGED_ID_PREFIX`] are ever
//!   removed; foreign head content is never touched;
//! - neither operation returns an error. Metadata injection is best-effort:
//!   a failed mutation is logged and the call degrades to a no-op rather than
//!   breaking the render path that invoked it.

use thiserror::Error;
use tracing::{debug, error};

use crate::domain::head::{
    DocumentHead, LinkElement, LinkTag, MANAGED_ID_PREFIX, is_managed_identity,
};

const SOURCE: &str = "application::head::HeadTagManager";

#[derive(Debug, Error)]
pub enum HeadPortError {
    #[error("document head is unavailable")]
    Unavailable,
    #[error("head mutation rejected: {0}")]
    Rejected(String),
}

/// Capability the manager consumes to reach the document head.
///
/// Implementations expose just enough surface for the manager to enforce its
/// invariants itself: enumerate link identities, attach one element, detach
/// one element.
pub trait HeadPort {
    /// Identity attributes of every link element currently attached, in
    /// document order. Elements without an identity report an empty string.
    fn link_ids(&self) -> Result<Vec<String>, HeadPortError>;

    fn attach_link(&mut self, element: LinkElement) -> Result<(), HeadPortError>;

    fn detach_link(&mut self, id: &str) -> Result<(), HeadPortError>;
}

impl HeadPort for DocumentHead {
    fn link_ids(&self) -> Result<Vec<String>, HeadPortError> {
        if !self.is_available() {
            return Err(HeadPortError::Unavailable);
        }
        Ok(self.link_ids())
    }

    fn attach_link(&mut self, element: LinkElement) -> Result<(), HeadPortError> {
        if !self.is_available() {
            return Err(HeadPortError::Unavailable);
        }
        self.push_link(element);
        Ok(())
    }

    fn detach_link(&mut self, id: &str) -> Result<(), HeadPortError> {
        if !self.is_available() {
            return Err(HeadPortError::Unavailable);
        }
        self.remove_link(id);
        Ok(())
    }
}

/// Single-slot holder for managed link elements.
///
/// `add_link` replaces whatever managed element is present, regardless of
/// which page id it belonged to; `remove_links` clears the slot. Both are
/// infallible by contract.
pub struct HeadTagManager<P: HeadPort> {
    port: P,
}

impl<P: HeadPort> HeadTagManager<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Attach a managed link element, replacing any managed element already
    /// present. Never fails: mutation errors are logged and swallowed.
    pub fn add_link(&mut self, tag: LinkTag) {
        let element = LinkElement {
            id: tag.identity(),
            attributes: tag.attributes().to_vec(),
        };

        // Clear the slot before attaching, so a failure below cannot leave
        // two managed elements behind.
        if !self.remove_managed() {
            return;
        }

        match self.port.attach_link(element) {
            Ok(()) => {}
            Err(HeadPortError::Unavailable) => {
                debug!(target = SOURCE, "document head unavailable, skipping link");
            }
            Err(err) => {
                error!(target = SOURCE, error = %err, "failed to attach managed link");
            }
        }
    }

    /// Detach every managed link element. Idempotent; never fails.
    pub fn remove_links(&mut self) {
        self.remove_managed();
    }

    /// Returns false when the head could not be reached at all.
    fn remove_managed(&mut self) -> bool {
        let ids = match self.port.link_ids() {
            Ok(ids) => ids,
            Err(HeadPortError::Unavailable) => {
                debug!(target = SOURCE, "document head unavailable, nothing to remove");
                return false;
            }
            Err(err) => {
                error!(target = SOURCE, error = %err, "failed to enumerate head links");
                return false;
            }
        };

        for id in ids.iter().filter(|id| is_managed_identity(id)) {
            match self.port.detach_link(id) {
                Ok(()) => {}
                Err(err) => {
                    error!(
                        target = SOURCE,
                        id = %id,
                        error = %err,
                        "failed to detach managed link"
                    );
                }
            }
        }
        true
    }
}

/// Managed link elements currently attached to a head model. Test and
/// diagnostic helper; the manager itself never needs it.
pub fn managed_links(head: &DocumentHead) -> Vec<&LinkElement> {
    head.links()
        .filter(|element| element.id.starts_with(MANAGED_ID_PREFIX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::head::HeadNode;

    fn manager() -> HeadTagManager<DocumentHead> {
        HeadTagManager::new(DocumentHead::new())
    }

    #[test]
    fn add_link_attaches_exactly_one_managed_element() {
        let mut links = manager();
        links.add_link(LinkTag::canonical("https://example.com/x", "post-1"));

        let head = links.into_port();
        let managed = managed_links(&head);
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].id, "ard-post-1");
        assert_eq!(managed[0].attribute("rel"), Some("canonical"));
        assert_eq!(managed[0].attribute("href"), Some("https://example.com/x"));
    }

    #[test]
    fn repeated_adds_keep_a_single_slot() {
        let mut links = manager();
        for n in 0..4 {
            links.add_link(LinkTag::canonical(
                format!("https://example.com/{n}"),
                format!("post-{n}"),
            ));
            assert_eq!(managed_links(links.port()).len(), 1);
        }

        let head = links.into_port();
        let managed = managed_links(&head);
        assert_eq!(managed[0].attribute("href"), Some("https://example.com/3"));
    }

    #[test]
    fn add_without_page_id_uses_bare_prefix() {
        let mut links = manager();
        links.add_link(LinkTag::new().attr("rel", "canonical"));
        assert_eq!(managed_links(links.port())[0].id, "ard-");
    }

    #[test]
    fn replacement_across_pages_evicts_the_previous_owner() {
        let mut links = manager();
        links.add_link(LinkTag::canonical("A", "post-1"));
        links.add_link(LinkTag::canonical("B", "post-2"));

        let head = links.into_port();
        let managed = managed_links(&head);
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].id, "ard-post-2");
        assert_eq!(managed[0].attribute("href"), Some("B"));
    }

    #[test]
    fn remove_links_is_idempotent() {
        let mut links = manager();
        links.remove_links();
        links.add_link(LinkTag::canonical("A", "post-1"));
        links.remove_links();
        links.remove_links();
        assert!(managed_links(links.port()).is_empty());
    }

    #[test]
    fn foreign_head_content_is_never_touched() {
        let mut head = DocumentHead::new();
        head.set_title("Existing page");
        head.upsert_meta("description", "kept");
        head.push_link(LinkElement {
            id: "theme-css".to_string(),
            attributes: vec![
                ("rel".to_string(), "stylesheet".to_string()),
                ("href".to_string(), "/static/site.css".to_string()),
            ],
        });
        head.push_link(LinkElement {
            id: String::new(),
            attributes: vec![("rel".to_string(), "icon".to_string())],
        });
        let before = head.nodes().to_vec();

        let mut links = HeadTagManager::new(head);
        links.add_link(LinkTag::canonical("https://example.com/x", "post-1"));
        links.remove_links();

        let head = links.into_port();
        assert_eq!(head.nodes(), &before[..]);
    }

    #[test]
    fn unavailable_head_degrades_to_a_no_op() {
        let mut links = HeadTagManager::new(DocumentHead::detached());
        links.add_link(LinkTag::canonical("https://example.com/x", "post-1"));
        links.remove_links();

        let head = links.into_port();
        assert!(head.nodes().is_empty());
    }

    #[test]
    fn attribute_application_preserves_insertion_order() {
        let mut links = manager();
        links.add_link(
            LinkTag::new()
                .attr("rel", "alternate")
                .attr("type", "application/rss+xml")
                .attr("href", "/rss.xml")
                .for_page("feed"),
        );

        let head = links.into_port();
        let managed = managed_links(&head);
        let names: Vec<&str> = managed[0]
            .attributes
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["rel", "type", "href"]);
    }

    struct FailingPort {
        inner: DocumentHead,
        fail_attach: bool,
    }

    impl HeadPort for FailingPort {
        fn link_ids(&self) -> Result<Vec<String>, HeadPortError> {
            Ok(self.inner.link_ids())
        }

        fn attach_link(&mut self, element: LinkElement) -> Result<(), HeadPortError> {
            if self.fail_attach {
                return Err(HeadPortError::Rejected("attach refused".to_string()));
            }
            self.inner.push_link(element);
            Ok(())
        }

        fn detach_link(&mut self, id: &str) -> Result<(), HeadPortError> {
            self.inner.remove_link(id);
            Ok(())
        }
    }

    #[test]
    fn failed_attach_leaves_no_managed_element_behind() {
        let mut port = FailingPort {
            inner: DocumentHead::new(),
            fail_attach: false,
        };
        port.inner.push_link(LinkElement {
            id: "theme-css".to_string(),
            attributes: vec![("rel".to_string(), "stylesheet".to_string())],
        });

        let mut links = HeadTagManager::new(port);
        links.add_link(LinkTag::canonical("A", "post-1"));
        links.port_mut().fail_attach = true;
        // Must not panic, and the previous slot occupant must already be gone.
        links.add_link(LinkTag::canonical("B", "post-2"));

        let port = links.into_port();
        assert!(managed_links(&port.inner).is_empty());
        assert_eq!(port.inner.link_ids(), vec!["theme-css".to_string()]);
    }

    #[test]
    fn head_node_shape_survives_round_trip() {
        let mut links = manager();
        links.add_link(LinkTag::canonical("https://example.com/x", "post-1"));
        let head = links.into_port();
        assert!(matches!(head.nodes()[0], HeadNode::Link(_)));
    }
}
