// catalog_core/src/query.rs

//! Paginated, searchable listing parameters and results.

use serde::Serialize;

use crate::product::Product;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// A normalized list request: page and limit are always >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
  pub page: u32,
  pub limit: u32,
  pub search: String,
}

impl Default for ListQuery {
  fn default() -> Self {
    Self {
      page: DEFAULT_PAGE,
      limit: DEFAULT_LIMIT,
      search: String::new(),
    }
  }
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
  raw
    .and_then(|v| v.trim().parse::<u32>().ok())
    .filter(|v| *v >= 1)
    .unwrap_or(default)
}

impl ListQuery {
  pub fn new(page: u32, limit: u32, search: impl Into<String>) -> Self {
    Self {
      page: page.max(1),
      limit: limit.max(1),
      search: search.into(),
    }
  }

  /// Builds a query from raw query-string values. Missing, non-numeric and
  /// non-positive values fall back to the defaults.
  pub fn from_params(page: Option<&str>, limit: Option<&str>, search: Option<&str>) -> Self {
    Self::new(
      positive_or(page, DEFAULT_PAGE),
      positive_or(limit, DEFAULT_LIMIT),
      search.unwrap_or_default(),
    )
  }

  pub fn offset(&self) -> u64 {
    (u64::from(self.page) - 1) * u64::from(self.limit)
  }

  pub fn filter(&self) -> SearchFilter {
    SearchFilter::new(&self.search)
  }
}

/// The match condition of a listing: all products, or those whose name,
/// category or description contains a term, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
  All,
  Contains(String),
}

impl SearchFilter {
  /// Only the empty string matches everything; whitespace is part of the term.
  pub fn new(term: &str) -> Self {
    if term.is_empty() {
      SearchFilter::All
    } else {
      SearchFilter::Contains(term.to_string())
    }
  }

  pub fn matches(&self, product: &Product) -> bool {
    match self {
      SearchFilter::All => true,
      SearchFilter::Contains(term) => product.matches_search(&term.to_lowercase()),
    }
  }

  /// The term as a SQL `LIKE` pattern matching it anywhere, with `\` as the
  /// escape character so `%` and `_` in the term match literally.
  pub fn like_pattern(&self) -> Option<String> {
    match self {
      SearchFilter::All => None,
      SearchFilter::Contains(term) => {
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
          if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
          }
          pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
      }
    }
  }
}

/// One page of matches together with the total number of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSlice {
  pub products: Vec<Product>,
  pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
  pub products: Vec<Product>,
  pub total_pages: u64,
}

/// `ceil(total / limit)`; zero matches means zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
  let limit = u64::from(limit.max(1));
  total.div_ceil(limit)
}

impl ProductPage {
  pub fn from_slice(slice: ProductSlice, limit: u32) -> Self {
    Self {
      total_pages: total_pages(slice.total, limit),
      products: slice.products,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn params_fall_back_to_defaults() {
    let q = ListQuery::from_params(None, None, None);
    assert_eq!(q, ListQuery::default());

    let q = ListQuery::from_params(Some("abc"), Some("-2"), Some("widget"));
    assert_eq!((q.page, q.limit, q.search.as_str()), (1, 10, "widget"));

    let q = ListQuery::from_params(Some("3"), Some("25"), Some(""));
    assert_eq!((q.page, q.limit), (3, 25));
    assert_eq!(q.offset(), 50);
    assert_eq!(q.filter(), SearchFilter::All);
  }

  #[test]
  fn search_terms_keep_whitespace() {
    let q = ListQuery::from_params(None, None, Some(" "));
    assert_eq!(q.filter(), SearchFilter::Contains(" ".to_string()));
    assert_eq!(ListQuery::new(1, 10, "lamp ").filter(), SearchFilter::Contains("lamp ".to_string()));
    assert_eq!(SearchFilter::new(" ").like_pattern().as_deref(), Some("% %"));
  }

  #[test]
  fn total_pages_rounds_up() {
    assert_eq!(total_pages(0, 10), 0);
    assert_eq!(total_pages(1, 10), 1);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(11, 10), 2);
    assert_eq!(total_pages(7, 1), 7);
  }

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(SearchFilter::new("").like_pattern(), None);
    assert_eq!(SearchFilter::new("50%_off\\").like_pattern().as_deref(), Some("%50\\%\\_off\\\\%"));
  }
}
