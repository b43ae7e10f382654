use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::ArticlePatch;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &mut S, id: &str, patch: ArticlePatch) -> Result<CmdResult> {
    let mut articles = store.load_articles()?;
    let article = articles
        .get_mut(id)
        .ok_or_else(|| FolioError::ArticleNotFound(id.to_string()))?;

    patch.apply(article);
    article.touch();
    let updated = article.clone();
    store.save_articles(&articles)?;
    tracing::info!(id = %updated.id, "article updated");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Article updated ({}): {}",
        updated.id, updated.title
    )));
    Ok(result.with_affected_articles(vec![updated]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArticleStatus;
    use crate::store::memory::fixtures::StoreFixture;
    use serde_json::json;

    #[test]
    fn merges_given_fields_only() {
        let mut fixture = StoreFixture::new().with_article("1", "Original", "family");
        let before = fixture.store.get_article("1").unwrap();

        let patch = ArticlePatch {
            title: Some("Renamed".into()),
            content: Some("   ".into()),
            status: Some(ArticleStatus::Published),
            ..ArticlePatch::default()
        };
        let result = run(&mut fixture.store, "1", patch).unwrap();
        let after = result.first_affected().unwrap();

        assert_eq!(after.title, "Renamed");
        assert_eq!(after.content, before.content);
        assert_eq!(after.category, "family");
        assert_eq!(after.status, ArticleStatus::Published);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn keeps_position_in_store() {
        let mut fixture = StoreFixture::new()
            .with_article("1", "A", "x")
            .with_article("2", "B", "x");
        run(
            &mut fixture.store,
            "1",
            ArticlePatch {
                title: Some("A2".into()),
                ..ArticlePatch::default()
            },
        )
        .unwrap();

        let articles = fixture.store.load_articles().unwrap();
        let ids: Vec<_> = articles.ids().collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn unknown_fields_are_kept_but_reserved_ones_are_not() {
        let mut fixture = StoreFixture::new().with_article("1", "A", "x");
        let patch: ArticlePatch =
            serde_json::from_value(json!({"readingTime": 4, "id": "hijack", "isScraped": true}))
                .unwrap();
        let result = run(&mut fixture.store, "1", patch).unwrap();
        let article = result.first_affected().unwrap();

        assert_eq!(article.id, "1");
        assert!(!article.is_scraped);
        assert_eq!(article.extra.get("readingTime"), Some(&json!(4)));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut fixture = StoreFixture::new();
        let err = run(&mut fixture.store, "ghost", ArticlePatch::default()).unwrap_err();
        assert!(matches!(err, FolioError::ArticleNotFound(id) if id == "ghost"));
    }
}
