use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::ArticleStatus;
use crate::reconcile::{reconcile, scope_to_category, SortBy};
use crate::store::DataStore;

use super::helpers::{articles_or_empty, order_or_empty};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: SortBy,
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
}

impl ListQuery {
    pub fn sorted(sort: SortBy) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Lists articles in display order. Store read failures list nothing instead of failing.
pub fn run<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult> {
    let articles = articles_or_empty(store);
    let order = order_or_empty(store);

    let mut listed = match query.category.as_deref() {
        Some(category) => {
            let (scoped, scoped_order) = scope_to_category(&articles, &order, category);
            reconcile(&scoped, &scoped_order, query.sort)
        }
        None => reconcile(&articles, &order, query.sort),
    };

    if let Some(status) = query.status {
        listed.retain(|a| a.status == status);
    }

    Ok(CmdResult::default().with_listed_articles(listed))
}
