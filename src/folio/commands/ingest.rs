//! Operations behind the automation webhook.
//!
//! Ingested articles always start as drafts and carry their provenance: an id
//! prefix (`ai_`, `scraped_`) plus the `isAIGenerated` / `isScraped` flags that
//! [`super::stats`] counts.

use chrono::Utc;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{
    new_article_id, Article, ArticleStatus, NewArticle, PublishRecord, PublishStatusUpdate,
};
use crate::store::DataStore;

use super::helpers::{insert_new, require_fields};

pub const DEFAULT_CATEGORY_LIMIT: usize = 5;
pub const AI_SOURCE: &str = "AI Generated";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

pub fn ai_generated<S: DataStore>(store: &mut S, mut input: NewArticle) -> Result<CmdResult> {
    require_fields(&input, &["title", "content", "category"])?;

    input.status = Some(ArticleStatus::Draft);
    let mut article = Article::from_new(new_article_id(Some("ai")), input);
    article.is_ai_generated = true;
    if article.source.as_deref().map_or(true, |s| s.trim().is_empty()) {
        article.source = Some(AI_SOURCE.to_string());
    }

    insert_new(store, &article)?;
    tracing::info!(id = %article.id, category = %article.category, "ai article ingested");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "AI article created ({})",
        article.id
    )));
    Ok(result.with_affected_articles(vec![article]))
}

/// Ingests a scraped article. A `sourceUrl` already in the store is a conflict and
/// nothing is written.
pub fn scraped<S: DataStore>(store: &mut S, mut input: NewArticle) -> Result<CmdResult> {
    require_fields(&input, &["title", "content", "category", "sourceUrl"])?;

    let source_url = input.source_url.clone().unwrap_or_default();
    if let Some(existing) = store.load_articles()?.find_by_source_url(&source_url) {
        tracing::info!(%source_url, existing_id = %existing.id, "duplicate scraped article rejected");
        return Err(FolioError::DuplicateSource {
            source_url,
            existing_id: existing.id.clone(),
        });
    }

    input.status = Some(ArticleStatus::Draft);
    let mut article = Article::from_new(new_article_id(Some("scraped")), input);
    article.is_scraped = true;
    if article.author.as_deref().map_or(true, |a| a.trim().is_empty()) {
        article.author = Some(UNKNOWN_AUTHOR.to_string());
    }

    insert_new(store, &article)?;
    tracing::info!(id = %article.id, %source_url, "scraped article ingested");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Scraped article created ({})",
        article.id
    )));
    Ok(result.with_affected_articles(vec![article]))
}

/// Articles waiting to be published (`scheduled` or `ready`), in store order.
pub fn pending<S: DataStore>(store: &S) -> Result<CmdResult> {
    let pending = store
        .load_articles()?
        .into_iter()
        .filter(|a| a.status.is_pending())
        .collect();
    Ok(CmdResult::default().with_listed_articles(pending))
}

/// The first `limit` articles of a category, in store order.
pub fn by_category<S: DataStore>(
    store: &S,
    category: &str,
    limit: Option<usize>,
) -> Result<CmdResult> {
    let limit = limit.unwrap_or(DEFAULT_CATEGORY_LIMIT);
    let sample = store
        .load_articles()?
        .into_iter()
        .filter(|a| a.category == category)
        .take(limit)
        .collect();
    Ok(CmdResult::default().with_listed_articles(sample))
}

pub fn set_publish_status<S: DataStore>(
    store: &mut S,
    id: &str,
    update: PublishStatusUpdate,
) -> Result<CmdResult> {
    let mut articles = store.load_articles()?;
    let article = articles
        .get_mut(id)
        .ok_or_else(|| FolioError::ArticleNotFound(id.to_string()))?;

    article.status = update.publish_status;
    article.touch();
    if let Some(platform) = update.platform.filter(|p| !p.trim().is_empty()) {
        article.publish_history.push(PublishRecord {
            platform,
            published_at: update.published_at.unwrap_or_else(Utc::now),
            status: update.publish_status,
        });
    }
    let updated = article.clone();
    store.save_articles(&articles)?;
    tracing::info!(id, status = %update.publish_status, "publish status updated");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Publish status of {} set to {}",
        id, update.publish_status
    )));
    Ok(result.with_affected_articles(vec![updated]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderEntry;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn ai_article_is_flagged_and_sourced() {
        let mut fixture = StoreFixture::new();
        let result = ai_generated(
            &mut fixture.store,
            NewArticle::new("Sleep better", "Tips", "psychology"),
        )
        .unwrap();
        let article = result.first_affected().unwrap();

        assert!(article.id.starts_with("ai_"));
        assert!(article.is_ai_generated);
        assert_eq!(article.source.as_deref(), Some(AI_SOURCE));
        assert_eq!(article.status, ArticleStatus::Draft);

        let order = fixture.store.load_order().unwrap();
        assert_eq!(order[0].id(), article.id);
        assert_eq!(order[0].category(), Some("psychology"));
    }

    #[test]
    fn ai_article_keeps_given_source() {
        let mut fixture = StoreFixture::new();
        let mut input = NewArticle::new("T", "C", "x");
        input.source = Some("GPT pipeline".into());
        let result = ai_generated(&mut fixture.store, input).unwrap();
        assert_eq!(
            result.first_affected().unwrap().source.as_deref(),
            Some("GPT pipeline")
        );
    }

    #[test]
    fn scraped_article_defaults_author() {
        let mut fixture = StoreFixture::new();
        let mut input = NewArticle::new("Found", "Text", "finance");
        input.source_url = Some("https://example.org/post".into());
        let result = scraped(&mut fixture.store, input).unwrap();
        let article = result.first_affected().unwrap();

        assert!(article.id.starts_with("scraped_"));
        assert!(article.is_scraped);
        assert_eq!(article.author.as_deref(), Some(UNKNOWN_AUTHOR));
    }

    #[test]
    fn scraped_requires_source_url() {
        let mut fixture = StoreFixture::new();
        let err = scraped(&mut fixture.store, NewArticle::new("T", "C", "x")).unwrap_err();
        assert!(matches!(err, FolioError::Validation(_)));
    }

    #[test]
    fn duplicate_source_url_conflicts_and_writes_nothing() {
        let mut fixture = StoreFixture::new()
            .with_scraped("scraped_1", "First", "https://example.org/post")
            .with_order(&["scraped_1"]);

        let mut input = NewArticle::new("Again", "Text", "finance");
        input.source_url = Some("https://example.org/post".into());
        let err = scraped(&mut fixture.store, input).unwrap_err();

        match err {
            FolioError::DuplicateSource { existing_id, .. } => assert_eq!(existing_id, "scraped_1"),
            other => panic!("expected duplicate, got {:?}", other),
        }
        let articles = fixture.store.load_articles().unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(
            fixture.store.load_order().unwrap(),
            vec![OrderEntry::from("scraped_1")]
        );
    }

    #[test]
    fn pending_lists_scheduled_and_ready() {
        let fixture = StoreFixture::new()
            .with_status("1", "Draft", ArticleStatus::Draft)
            .with_status("2", "Soon", ArticleStatus::Scheduled)
            .with_status("3", "Go", ArticleStatus::Ready)
            .with_status("4", "Done", ArticleStatus::Published);

        let ids: Vec<_> = pending(&fixture.store)
            .unwrap()
            .listed_articles
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn by_category_defaults_to_five() {
        let mut fixture = StoreFixture::new().with_article("other", "Other", "career");
        for i in 0..7 {
            fixture = fixture.with_article(&format!("f{}", i), "F", "family");
        }

        let sample = by_category(&fixture.store, "family", None).unwrap();
        assert_eq!(sample.listed_articles.len(), DEFAULT_CATEGORY_LIMIT);
        assert_eq!(sample.listed_articles[0].id, "f0");

        let two = by_category(&fixture.store, "family", Some(2)).unwrap();
        assert_eq!(two.listed_articles.len(), 2);
    }

    #[test]
    fn publish_status_appends_history_only_with_platform() {
        let mut fixture = StoreFixture::new().with_status("1", "A", ArticleStatus::Ready);

        let update = PublishStatusUpdate {
            publish_status: ArticleStatus::Published,
            platform: Some("wechat".into()),
            published_at: None,
        };
        set_publish_status(&mut fixture.store, "1", update).unwrap();

        let update = PublishStatusUpdate {
            publish_status: ArticleStatus::Archived,
            platform: None,
            published_at: None,
        };
        let result = set_publish_status(&mut fixture.store, "1", update).unwrap();
        let article = result.first_affected().unwrap();

        assert_eq!(article.status, ArticleStatus::Archived);
        assert_eq!(article.publish_history.len(), 1);
        assert_eq!(article.publish_history[0].platform, "wechat");
        assert_eq!(article.publish_history[0].status, ArticleStatus::Published);
    }

    #[test]
    fn publish_status_unknown_id() {
        let mut fixture = StoreFixture::new();
        let err = set_publish_status(
            &mut fixture.store,
            "x",
            PublishStatusUpdate::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::ArticleNotFound(_)));
    }
}
