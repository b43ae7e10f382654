use crate::error::{FolioError, Result};
use crate::model::{Article, ArticleMap, NewArticle, OrderEntry};
use crate::reconcile::insert_front;
use crate::store::DataStore;

/// Rejects input whose named fields are blank. The message lists all of them.
pub fn require_fields(input: &NewArticle, fields: &[&str]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| {
            let value = match *field {
                "title" => Some(input.title.as_str()),
                "content" => Some(input.content.as_str()),
                "category" => Some(input.category.as_str()),
                "sourceUrl" => input.source_url.as_deref(),
                _ => None,
            };
            value.is_none_or_blank()
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FolioError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

trait BlankExt {
    fn is_none_or_blank(&self) -> bool;
}

impl BlankExt for Option<&str> {
    fn is_none_or_blank(&self) -> bool {
        self.map_or(true, |v| v.trim().is_empty())
    }
}

/// Saves a brand new article and puts it at the front of the order.
///
/// Articles are written before the order; if the order write fails the article is
/// still listed (in the unordered tail).
pub fn insert_new<S: DataStore>(store: &mut S, article: &Article) -> Result<()> {
    let mut articles = store.load_articles()?;
    if articles.contains(&article.id) {
        return Err(FolioError::Store(format!(
            "Article id already in use: {}",
            article.id
        )));
    }
    articles.insert(article.clone());
    store.save_articles(&articles)?;

    let order = store.load_order()?;
    store.save_order(&insert_front(&order, &article.id, &article.category))?;
    Ok(())
}

/// Read used by listings: a failed read degrades to an empty collection.
pub fn articles_or_empty<S: DataStore>(store: &S) -> ArticleMap {
    store.load_articles().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read articles, listing none");
        ArticleMap::new()
    })
}

/// Read used by listings: a failed read degrades to "no custom order".
pub fn order_or_empty<S: DataStore>(store: &S) -> Vec<OrderEntry> {
    store.load_order().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read article order, using natural order");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_fields_lists_every_blank_field() {
        let input = NewArticle::new("Title", "  ", "");
        match require_fields(&input, &["title", "content", "category", "sourceUrl"]) {
            Err(FolioError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: content, category, sourceUrl")
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn require_fields_accepts_complete_input() {
        let mut input = NewArticle::new("T", "C", "family");
        input.source_url = Some("http://x.com/a".into());
        assert!(require_fields(&input, &["title", "content", "category", "sourceUrl"]).is_ok());
    }
}
