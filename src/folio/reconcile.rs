//! # Listing Reconciler
//!
//! Turns the article set and the persisted display order into the one sequence
//! every client sees.
//!
//! The order list is user-authored and saved independently of the articles, so it
//! drifts: deleted articles can linger in it, new articles are never in it, and it
//! may repeat ids. [`reconcile`] tolerates all of that and always produces a total
//! ordering:
//!
//! 1. Every article appears exactly once.
//! 2. Ordered articles come first, in the order's relative order. Stale ids are
//!    skipped, and a repeated id only counts where it first appears.
//! 3. The remaining articles follow in the article set's iteration order.
//!
//! Non-custom sorts (`newest`, `oldest`, `title`, `category`) ignore the order and
//! use a stable sort, so repeated calls on the same input always agree.
//!
//! Everything here is pure: inputs are borrowed and never mutated.

use crate::model::{Article, ArticleMap, OrderEntry, Placement};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Custom,
    Newest,
    Oldest,
    Title,
    Category,
}

impl SortBy {
    /// Parses a query value, falling back to [`SortBy::Custom`] for anything unknown.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" | "" => Ok(SortBy::Custom),
            "newest" => Ok(SortBy::Newest),
            "oldest" => Ok(SortBy::Oldest),
            "title" => Ok(SortBy::Title),
            "category" => Ok(SortBy::Category),
            other => Err(format!("Unknown sort: {}", other)),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortBy::Custom => "custom",
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::Title => "title",
            SortBy::Category => "category",
        };
        f.write_str(name)
    }
}

/// Produces the display sequence for `articles` under `sort`.
pub fn reconcile(articles: &ArticleMap, order: &[OrderEntry], sort: SortBy) -> Vec<Article> {
    match sort {
        SortBy::Custom => custom_order(articles, order),
        SortBy::Newest => sorted(articles, |a, b| by_date(a, b, true)),
        SortBy::Oldest => sorted(articles, |a, b| by_date(a, b, false)),
        SortBy::Title => sorted(articles, |a, b| locale_cmp(&a.title, &b.title)),
        SortBy::Category => sorted(articles, |a, b| locale_cmp(&a.category, &b.category)),
    }
}

fn custom_order(articles: &ArticleMap, order: &[OrderEntry]) -> Vec<Article> {
    let mut placed: HashSet<&str> = HashSet::with_capacity(order.len());
    let mut result = Vec::with_capacity(articles.len());

    for entry in order {
        let id = entry.id();
        if placed.contains(id) {
            continue;
        }
        if let Some(article) = articles.get(id) {
            placed.insert(id);
            result.push(article.clone());
        }
    }

    result.extend(
        articles
            .iter()
            .filter(|a| !placed.contains(a.id.as_str()))
            .cloned(),
    );
    result
}

fn sorted<F>(articles: &ArticleMap, cmp: F) -> Vec<Article>
where
    F: Fn(&Article, &Article) -> Ordering,
{
    let mut list: Vec<Article> = articles.iter().cloned().collect();
    list.sort_by(|a, b| cmp(a, b));
    list
}

/// Undated articles sort last in both directions.
fn by_date(a: &Article, b: &Article, newest_first: bool) -> Ordering {
    match (a.sort_date(), b.sort_date()) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive comparison with a case-sensitive tie-break.
///
/// Folds case the way readers expect ("apple" next to "Apple") without pulling in a
/// collation library. Scripts without case (CJK titles) compare by code point.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Narrows articles and order down to one category.
///
/// Record-form order entries whose stored category disagrees with the filter are
/// dropped even if the article exists, since they belong to another category's list.
pub fn scope_to_category(
    articles: &ArticleMap,
    order: &[OrderEntry],
    category: &str,
) -> (ArticleMap, Vec<OrderEntry>) {
    let scoped: ArticleMap = articles
        .iter()
        .filter(|a| a.category == category)
        .cloned()
        .collect();

    let scoped_order = order
        .iter()
        .filter(|entry| scoped.contains(entry.id()))
        .filter(|entry| entry.category().map_or(true, |c| c == category))
        .cloned()
        .collect();

    (scoped, scoped_order)
}

/// Puts a new article at the front of the order and renumbers positions.
pub fn insert_front(order: &[OrderEntry], id: &str, category: &str) -> Vec<OrderEntry> {
    let mut next = Vec::with_capacity(order.len() + 1);
    next.push(OrderEntry::Placed(Placement {
        id: id.to_string(),
        category: category.to_string(),
        position: 0,
    }));
    next.extend(order.iter().cloned());
    renumber(&mut next);
    next
}

/// Drops every entry for `id` and renumbers positions.
pub fn prune(order: &[OrderEntry], id: &str) -> Vec<OrderEntry> {
    let mut next: Vec<OrderEntry> = order.iter().filter(|e| e.id() != id).cloned().collect();
    renumber(&mut next);
    next
}

/// Referenced ids, first occurrence only.
pub fn order_ids(order: &[OrderEntry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    order
        .iter()
        .map(OrderEntry::id)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn renumber(order: &mut [OrderEntry]) {
    for (index, entry) in order.iter_mut().enumerate() {
        if let OrderEntry::Placed(p) = entry {
            p.position = index;
        }
    }
}
