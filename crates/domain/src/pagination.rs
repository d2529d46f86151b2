//! Pagination metadata and the infinite-scroll merge.
//!
//! List endpoints describe their position in the result set with an
//! RFC 5988 `link` header:
//!
//! ```text
//! <api/bills?page=1&size=20>; rel="next", <api/bills?page=2&size=20>; rel="last"
//! ```
//!
//! Only the `page` query parameter of each link is kept.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page cursors parsed from a `link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// First page of the result set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Page before the one returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<u32>,
    /// Page after the one returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    /// Last page of the result set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
}

impl PageLinks {
    /// Links before anything has been loaded: the next page to fetch is 0.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            first: None,
            prev: None,
            next: Some(0),
            last: None,
        }
    }

    /// Links describing a result set that fits in one page.
    #[must_use]
    pub const fn single_page() -> Self {
        Self {
            first: Some(0),
            prev: None,
            next: None,
            last: Some(0),
        }
    }

    /// Parses a `link` header value.
    ///
    /// Relations other than first/prev/next/last are ignored. A link whose
    /// URL has no numeric `page` parameter leaves its relation unset.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLinkHeader` if the header is empty or a
    /// section is not of the form `<url>; rel="name"`.
    pub fn parse(header: &str) -> DomainResult<Self> {
        if header.trim().is_empty() {
            return Err(DomainError::InvalidLinkHeader(
                "header must not be empty".to_string(),
            ));
        }

        let mut links = Self::default();
        for section in header.split(',') {
            let (target, rel) = parse_section(section)?;
            let page = page_of(target);
            match rel {
                "first" => links.first = page,
                "prev" => links.prev = page,
                "next" => links.next = page,
                "last" => links.last = page,
                _ => {}
            }
        }
        Ok(links)
    }

    /// Returns true when first and last point at the same page.
    #[must_use]
    pub fn is_single_page(&self) -> bool {
        self.first == self.last
    }

    /// Returns true when another page can be requested.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

fn parse_section(section: &str) -> DomainResult<(&str, &str)> {
    let mut parts = section.split(';');
    let (Some(target), Some(rel), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DomainError::InvalidLinkHeader(format!(
            "section could not be split on ';': {}",
            section.trim()
        )));
    };

    let target = target
        .trim()
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .ok_or_else(|| {
            DomainError::InvalidLinkHeader(format!("link target must be enclosed in <>: {target}"))
        })?;

    let rel = rel
        .trim()
        .strip_prefix("rel=")
        .map(|r| r.trim_matches('"'))
        .ok_or_else(|| DomainError::InvalidLinkHeader(format!("missing rel in: {rel}")))?;

    Ok((target, rel))
}

fn page_of(target: &str) -> Option<u32> {
    let (_, query) = target.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// A page of a list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Sort expression, e.g. `id,asc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl PageRequest {
    /// Creates an unsorted page request.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    /// Sets the sort expression.
    #[must_use]
    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// A search request: a free-text query plus paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search query in the server's query syntax.
    pub query: String,
    /// Paging.
    #[serde(flatten)]
    pub page: PageRequest,
}

impl SearchRequest {
    /// Creates a search for `query` on the first page.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: PageRequest::default(),
        }
    }

    /// Sets the paging.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// A decoded page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items of this page in server order.
    pub items: Vec<T>,
    /// Cursors from the `link` header.
    pub links: PageLinks,
    /// Total number of items across all pages.
    pub total_items: u64,
}

/// Merges a freshly loaded page into the current collection.
///
/// The page is appended when it continues the collection the user is
/// scrolling through: something is already loaded, the result set spans more
/// than one page and the page is not the first one. Otherwise it replaces the
/// collection.
#[must_use]
pub fn merge_scrolled<T>(mut current: Vec<T>, incoming: Vec<T>, links: &PageLinks) -> Vec<T> {
    if current.is_empty() || links.is_single_page() || links.prev.is_none() {
        return incoming;
    }
    current.extend(incoming);
    current
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_header() {
        let header = "<api/bills?page=1&size=20>; rel=\"next\", \
                      <api/bills?page=2&size=20>; rel=\"last\", \
                      <api/bills?page=0&size=20>; rel=\"first\"";

        let links = PageLinks::parse(header).unwrap();

        assert_eq!(
            links,
            PageLinks {
                first: Some(0),
                prev: None,
                next: Some(1),
                last: Some(2),
            }
        );
        assert!(links.has_next());
        assert!(!links.is_single_page());
    }

    #[test]
    fn test_parse_absolute_urls_and_unknown_rel() {
        let header = "<http://localhost:8080/api/bills?size=5&page=3>; rel=\"prev\", \
                      <http://localhost:8080/api/bills>; rel=\"self\"";

        let links = PageLinks::parse(header).unwrap();

        assert_eq!(links.prev, Some(3));
        assert_eq!(links.next, None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PageLinks::parse("").is_err());
        assert!(PageLinks::parse("<api/bills?page=1>").is_err());
        assert!(PageLinks::parse("api/bills?page=1; rel=\"next\"").is_err());
        assert!(PageLinks::parse("<api/bills?page=1>; next").is_err());
    }

    #[test]
    fn test_merge_replaces_when_empty_or_single_page() {
        let merged = merge_scrolled(Vec::new(), vec![1, 2], &PageLinks::single_page());
        assert_eq!(merged, vec![1, 2]);

        let merged = merge_scrolled(vec![9], vec![1, 2], &PageLinks::single_page());
        assert_eq!(merged, vec![1, 2]);
    }

    #[test]
    fn test_merge_replaces_on_first_page() {
        let links = PageLinks {
            first: Some(0),
            prev: None,
            next: Some(1),
            last: Some(3),
        };
        assert_eq!(merge_scrolled(vec![7, 8], vec![1, 2], &links), vec![1, 2]);
    }

    #[test]
    fn test_merge_appends_continuation() {
        let links = PageLinks {
            first: Some(0),
            prev: Some(0),
            next: Some(2),
            last: Some(3),
        };
        assert_eq!(
            merge_scrolled(vec![1, 2], vec![3, 4], &links),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_search_request_defaults() {
        let search = SearchRequest::new("title:pizza");
        assert_eq!(search.page, PageRequest::new(0, DEFAULT_PAGE_SIZE));
        assert_eq!(search.page.sort, None);
    }
}
