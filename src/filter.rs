//! Filter/sort engine and pagination for browsing the catalog.
//!
//! Filtering never reorders: the result is the subsequence of the catalog that
//! matches, in catalog order.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Catalog, Lesson};
use crate::util::contains_lower;

/// Topic or language constraint. `all` (or an empty value) disables it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IndexFilter {
  #[default]
  All,
  Index(usize),
}

impl IndexFilter {
  pub fn parse(s: &str) -> Option<Self> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
      return Some(IndexFilter::All);
    }
    s.parse::<usize>().ok().map(IndexFilter::Index)
  }

  fn admits(self, has: impl FnOnce(usize) -> bool) -> bool {
    match self {
      IndexFilter::All => true,
      IndexFilter::Index(i) => has(i),
    }
  }
}

impl<'de> Deserialize<'de> for IndexFilter {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      N(usize),
      S(String),
    }
    match Raw::deserialize(d)? {
      Raw::N(i) => Ok(IndexFilter::Index(i)),
      Raw::S(s) => IndexFilter::parse(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a catalog index or \"all\", got '{}'", s))),
    }
  }
}

/// Browse criteria: free-text query plus optional topic/language constraints.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LessonFilter {
  #[serde(default)]
  pub query: String,
  #[serde(default)]
  pub topic: IndexFilter,
  #[serde(default)]
  pub language: IndexFilter,
}

impl LessonFilter {
  pub fn matches(&self, catalog: &Catalog, lesson: &Lesson) -> bool {
    let q = self.query.trim().to_lowercase();
    let text_ok = q.is_empty()
      || contains_lower(&lesson.title, &q)
      || contains_lower(&lesson.description, &q)
      || catalog.topic_names(lesson).any(|name| contains_lower(name, &q));
    text_ok
      && self.topic.admits(|i| lesson.has_topic(i))
      && self.language.admits(|i| lesson.has_language(i))
  }

  /// Matching lessons in catalog order.
  pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Lesson> {
    catalog.lessons.iter().filter(|l| self.matches(catalog, l)).collect()
  }
}

/// One page of results. `page` is 1-indexed and always within `[1, max(page_count, 1)]`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: usize,
  pub page_count: usize,
  pub page_size: usize,
  pub total: usize,
}

pub fn page_count(total: usize, page_size: usize) -> usize {
  if page_size == 0 {
    return 0;
  }
  total.div_ceil(page_size)
}

/// Clamp a requested page into `[1, max(page_count, 1)]`.
pub fn clamp_page(requested: usize, page_count: usize) -> usize {
  requested.clamp(1, page_count.max(1))
}

/// Page numbers from clients. Anything below 1 (or unreadable) becomes 1 and
/// anything too large saturates, so `paginate` can clamp it to the last page.
pub fn lenient_page<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    I(i64),
    U(u64),
    F(f64),
    S(String),
  }
  let raw: Option<Raw> = Option::deserialize(d)?;
  Ok(raw.map(|r| match r {
    Raw::I(n) => page_from_i64(n),
    Raw::U(n) => usize::try_from(n).unwrap_or(usize::MAX).max(1),
    // `as` saturates; NaN and negatives land on 0.
    Raw::F(f) => (f as usize).max(1),
    Raw::S(s) => page_from_str(&s),
  }))
}

fn page_from_i64(n: i64) -> usize {
  if n < 1 {
    1
  } else {
    usize::try_from(n).unwrap_or(usize::MAX)
  }
}

fn page_from_str(s: &str) -> usize {
  let s = s.trim();
  if let Ok(n) = s.parse::<i64>() {
    return page_from_i64(n);
  }
  let digits = s.strip_prefix('+').unwrap_or(s);
  if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
    usize::MAX
  } else {
    1
  }
}

pub fn paginate<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> Page<T> {
  let page_size = page_size.max(1);
  let total = items.len();
  let page_count = page_count(total, page_size);
  let page = clamp_page(requested_page, page_count);
  let start = (page - 1) * page_size;
  let items = items.iter().skip(start).take(page_size).cloned().collect();
  Page { items, page, page_count, page_size, total }
}
