use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{new_article_id, Article, NewArticle};
use crate::store::DataStore;

use super::helpers::{insert_new, require_fields};

pub fn run<S: DataStore>(store: &mut S, input: NewArticle) -> Result<CmdResult> {
    require_fields(&input, &["title", "content", "category"])?;

    let article = Article::from_new(new_article_id(None), input);
    insert_new(store, &article)?;
    tracing::info!(id = %article.id, category = %article.category, "article created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Article created ({}): {}",
        article.id, article.title
    )));
    Ok(result.with_affected_articles(vec![article]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::list::{self, ListQuery};
    use crate::error::FolioError;
    use crate::model::{ArticleStatus, OrderEntry};
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn new_article_is_a_dated_draft() {
        let mut fixture = StoreFixture::new();
        let result = run(
            &mut fixture.store,
            NewArticle::new("Budgeting", "Spend less", "finance"),
        )
        .unwrap();

        let article = result.first_affected().unwrap();
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.date.is_some());
        assert_eq!(article.created_at, article.updated_at);
        assert_eq!(fixture.store.get_article(&article.id).unwrap(), *article);
    }

    #[test]
    fn explicit_status_is_kept() {
        let mut fixture = StoreFixture::new();
        let mut input = NewArticle::new("T", "C", "family");
        input.status = Some(ArticleStatus::Published);
        let result = run(&mut fixture.store, input).unwrap();
        assert_eq!(
            result.first_affected().unwrap().status,
            ArticleStatus::Published
        );
    }

    #[test]
    fn new_articles_go_to_the_front() {
        let mut fixture = StoreFixture::new()
            .with_article("old", "Old", "family")
            .with_order(&["old"]);

        run(&mut fixture.store, NewArticle::new("New", "C", "family")).unwrap();

        let listed = list::run(&fixture.store, &ListQuery::default()).unwrap();
        let titles: Vec<_> = listed
            .listed_articles
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["New", "Old"]);

        let order = fixture.store.load_order().unwrap();
        assert!(matches!(&order[0], OrderEntry::Placed(p) if p.position == 0 && p.category == "family"));
        assert_eq!(order[1], OrderEntry::from("old"));
    }

    #[test]
    fn rejects_missing_fields() {
        let mut fixture = StoreFixture::new();
        let err = run(&mut fixture.store, NewArticle::new("", "C", "")).unwrap_err();
        assert!(matches!(err, FolioError::Validation(_)));
        assert!(fixture.store.load_articles().unwrap().is_empty());
    }
}
