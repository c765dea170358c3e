//! Layout chrome assembly: for each rendered page, the site identity, the
//! breadcrumb trail, and the serialized head fragment.
//!
//! This is the seam where the SEO meta set and the managed canonical link are
//! written into the head model. The HTTP layer hands each request a fresh
//! head; the static exporter threads one long-lived head through every route,
//! which is exactly the navigation lifecycle the tag manager exists to keep
//! clean.

use crate::application::head::HeadTagManager;
use crate::application::seo::{PageSeo, SeoService};
use crate::config::SiteSettings;
use crate::domain::head::{DocumentHead, LinkTag};
use crate::presentation::views::{BreadcrumbView, LayoutChrome, PostDetailContext, SiteView};

/// Canonical-link directive for a page: attach one, scoped to the page id.
/// Pages without a canonical URL run the removal path instead.
#[derive(Debug, Clone)]
pub struct CanonicalLink {
    pub href: String,
    pub page_id: String,
}

pub struct ChromeRequest {
    pub seo: PageSeo,
    pub canonical: Option<CanonicalLink>,
    pub breadcrumbs: Vec<BreadcrumbView>,
}

#[derive(Clone)]
pub struct ChromeService {
    site: SiteSettings,
    seo: SeoService,
}

impl ChromeService {
    pub fn new(site: SiteSettings) -> Self {
        let seo = SeoService::new(site.clone());
        Self { site, seo }
    }

    pub fn seo(&self) -> &SeoService {
        &self.seo
    }

    /// A head manager over an empty document head, for request-scoped renders.
    pub fn fresh_head(&self) -> HeadTagManager<DocumentHead> {
        HeadTagManager::new(DocumentHead::new())
    }

    /// Write one page's metadata into the given head and return the layout
    /// chrome carrying the serialized result.
    ///
    /// The canonical directive always runs: pages without a canonical URL
    /// clear the managed slot so nothing leaks from a previously composed
    /// page when the head is long-lived.
    pub fn compose(
        &self,
        links: &mut HeadTagManager<DocumentHead>,
        request: &ChromeRequest,
    ) -> LayoutChrome {
        self.seo.apply(links.port_mut(), &request.seo);

        match &request.canonical {
            Some(canonical) => {
                links.add_link(LinkTag::canonical(&canonical.href, &canonical.page_id));
            }
            None => links.remove_links(),
        }

        LayoutChrome {
            site: self.site_view(),
            head_html: links.port().render_html(),
            breadcrumbs: request.breadcrumbs.clone(),
        }
    }

    /// Teardown hook for long-lived heads: drop whatever managed link the
    /// last composed page attached.
    pub fn teardown(&self, links: &mut HeadTagManager<DocumentHead>) {
        links.remove_links();
    }

    pub fn home_request(&self) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: "Home".to_string(),
                description: self.site.tagline.clone(),
                image: None,
                path: "/".to_string(),
            },
            canonical: None,
            breadcrumbs: Vec::new(),
        }
    }

    pub fn blog_index_request(&self) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: "All Blog Posts".to_string(),
                description: self.site.tagline.clone(),
                image: None,
                path: "/blog".to_string(),
            },
            canonical: None,
            breadcrumbs: vec![BreadcrumbView {
                url: "/blog".to_string(),
                label: "Blog".to_string(),
            }],
        }
    }

    pub fn post_request(
        &self,
        detail: &PostDetailContext,
        canonical_url: Option<String>,
    ) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: detail.title.clone(),
                description: detail.description.clone(),
                image: (!detail.cover_image.is_empty()).then(|| detail.cover_image.clone()),
                path: format!("/blog/{}", detail.slug),
            },
            canonical: canonical_url.map(|href| CanonicalLink {
                href,
                page_id: detail.slug.clone(),
            }),
            breadcrumbs: vec![
                BreadcrumbView {
                    url: "/blog".to_string(),
                    label: "Blog".to_string(),
                },
                BreadcrumbView {
                    url: format!("/blog/{}", detail.slug),
                    label: detail.title.clone(),
                },
            ],
        }
    }

    pub fn about_request(&self) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: "About".to_string(),
                description: self.site.tagline.clone(),
                image: None,
                path: "/about".to_string(),
            },
            canonical: None,
            breadcrumbs: vec![BreadcrumbView {
                url: "/about".to_string(),
                label: "About".to_string(),
            }],
        }
    }

    pub fn privacy_request(&self) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: "Privacy Policy".to_string(),
                description: self.site.tagline.clone(),
                image: None,
                path: "/privacy-policy".to_string(),
            },
            canonical: None,
            breadcrumbs: vec![BreadcrumbView {
                url: "/privacy-policy".to_string(),
                label: "Privacy Policy".to_string(),
            }],
        }
    }

    pub fn not_found_request(&self) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: "Page not found".to_string(),
                description: self.site.tagline.clone(),
                image: None,
                path: "/".to_string(),
            },
            canonical: None,
            breadcrumbs: Vec::new(),
        }
    }

    pub fn site_view(&self) -> SiteView {
        SiteView {
            title: self.site.title.clone(),
            tagline: self.site.tagline.clone(),
            author: self.site.author.clone(),
            social_handle: self.site.social_handle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::head::managed_links;

    fn site() -> SiteSettings {
        SiteSettings {
            title: "Ardesia".to_string(),
            tagline: "tagline".to_string(),
            public_url: "https://blog.example.com".to_string(),
            author: String::new(),
            social_handle: String::new(),
            default_social_image: None,
            analytics_tag: None,
            previous_articles: 2,
        }
    }

    fn request(path: &str, canonical: Option<CanonicalLink>) -> ChromeRequest {
        ChromeRequest {
            seo: PageSeo {
                title: path.to_string(),
                description: String::new(),
                image: None,
                path: path.to_string(),
            },
            canonical,
            breadcrumbs: Vec::new(),
        }
    }

    #[test]
    fn compose_attaches_canonical_link_for_the_page() {
        let chrome = ChromeService::new(site());
        let mut links = chrome.fresh_head();
        let layout = chrome.compose(
            &mut links,
            &request(
                "/blog/hello",
                Some(CanonicalLink {
                    href: "https://elsewhere.example/hello".to_string(),
                    page_id: "hello".to_string(),
                }),
            ),
        );

        assert!(layout.head_html.contains("rel=\"canonical\""));
        assert!(layout.head_html.contains("id=\"ard-hello\""));
        assert_eq!(managed_links(links.port()).len(), 1);
    }

    #[test]
    fn navigating_between_pages_never_leaks_the_previous_canonical() {
        let chrome = ChromeService::new(site());
        // One head across several composes, like the exporter walking routes.
        let mut links = chrome.fresh_head();

        chrome.compose(
            &mut links,
            &request(
                "/blog/first",
                Some(CanonicalLink {
                    href: "https://elsewhere.example/first".to_string(),
                    page_id: "first".to_string(),
                }),
            ),
        );
        let layout = chrome.compose(&mut links, &request("/about", None));

        assert!(!layout.head_html.contains("canonical"));
        assert!(managed_links(links.port()).is_empty());

        let layout = chrome.compose(
            &mut links,
            &request(
                "/blog/second",
                Some(CanonicalLink {
                    href: "https://elsewhere.example/second".to_string(),
                    page_id: "second".to_string(),
                }),
            ),
        );
        assert!(layout.head_html.contains("id=\"ard-second\""));
        assert!(!layout.head_html.contains("ard-first"));
    }

    #[test]
    fn teardown_clears_the_managed_slot() {
        let chrome = ChromeService::new(site());
        let mut links = chrome.fresh_head();
        chrome.compose(
            &mut links,
            &request(
                "/blog/hello",
                Some(CanonicalLink {
                    href: "https://elsewhere.example/hello".to_string(),
                    page_id: "hello".to_string(),
                }),
            ),
        );

        chrome.teardown(&mut links);
        assert!(managed_links(links.port()).is_empty());
    }
}
