//! Navigation link extraction for public event surfaces.

use super::types::{Page, PageLink};

/// Public URL of a page under the configured base URL.
///
/// `base_url` must not end in a slash; `Config` trims it on load.
#[must_use]
pub fn page_url(base_url: &str, event_slug: &str, page_slug: &str) -> String {
    format!("{base_url}/{event_slug}/page/{page_slug}/")
}

fn links_for<'a, F>(
    pages: &'a [Page],
    base_url: &str,
    event_slug: &str,
    locale: &str,
    include: F,
) -> Vec<PageLink>
where
    F: Fn(&Page) -> bool,
{
    pages
        .iter()
        .filter(|page| include(page))
        .map(|page| PageLink {
            label: page.title.localize(locale).to_string(),
            url: page_url(base_url, event_slug, &page.slug),
        })
        .collect()
}

/// Links for pages flagged for the event footer, in display order.
#[must_use]
pub fn footer_links(pages: &[Page], base_url: &str, event_slug: &str, locale: &str) -> Vec<PageLink> {
    links_for(pages, base_url, event_slug, locale, |page| {
        page.show_in_footer
    })
}

/// Links for pages flagged for the event front page, in display order.
#[must_use]
pub fn frontpage_links(
    pages: &[Page],
    base_url: &str,
    event_slug: &str,
    locale: &str,
) -> Vec<PageLink> {
    links_for(pages, base_url, event_slug, locale, |page| {
        page.show_on_frontpage
    })
}
