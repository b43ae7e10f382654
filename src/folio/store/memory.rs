use super::DataStore;
use crate::error::Result;
use crate::model::{ArticleMap, OrderEntry};

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    articles: ArticleMap,
    order: Vec<OrderEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for InMemoryStore {
    fn load_articles(&self) -> Result<ArticleMap> {
        Ok(self.articles.clone())
    }

    fn save_articles(&mut self, articles: &ArticleMap) -> Result<()> {
        self.articles = articles.clone();
        Ok(())
    }

    fn load_order(&self) -> Result<Vec<OrderEntry>> {
        Ok(self.order.clone())
    }

    fn save_order(&mut self, order: &[OrderEntry]) -> Result<()> {
        self.order = order.to_vec();
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Article, ArticleStatus};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds an article with a fixed id so tests can refer to it.
        pub fn with_article(mut self, id: &str, title: &str, category: &str) -> Self {
            let mut article = Article::new(title, format!("Content for {}", title), category);
            article.id = id.to_string();
            self.store.put_article(&article).unwrap();
            self
        }

        pub fn with_status(mut self, id: &str, title: &str, status: ArticleStatus) -> Self {
            let mut article = Article::new(title, "Some content", "family");
            article.id = id.to_string();
            article.status = status;
            self.store.put_article(&article).unwrap();
            self
        }

        pub fn with_scraped(mut self, id: &str, title: &str, source_url: &str) -> Self {
            let mut article = Article::new(title, "Scraped content", "finance");
            article.id = id.to_string();
            article.is_scraped = true;
            article.source_url = Some(source_url.to_string());
            self.store.put_article(&article).unwrap();
            self
        }

        pub fn with_order(mut self, ids: &[&str]) -> Self {
            let order: Vec<OrderEntry> = ids.iter().map(|id| OrderEntry::from(*id)).collect();
            self.store.save_order(&order).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::error::FolioError;

    #[test]
    fn test_get_not_found() {
        let store = InMemoryStore::new();
        match store.get_article("missing") {
            Err(FolioError::ArticleNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected ArticleNotFound"),
        }
    }

    #[test]
    fn test_fixture_keeps_insertion_order() {
        let fixture = StoreFixture::default()
            .with_article("1", "Alpha", "family")
            .with_article("2", "Beta", "career")
            .with_order(&["2"]);

        let articles = fixture.store.load_articles().unwrap();
        let ids: Vec<_> = articles.ids().collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(fixture.store.load_order().unwrap(), vec![OrderEntry::from("2")]);
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut fixture = StoreFixture::new()
            .with_article("1", "Alpha", "family")
            .with_article("2", "Beta", "family");

        let mut first = fixture.store.get_article("1").unwrap();
        first.title = "Alpha v2".into();
        fixture.store.put_article(&first).unwrap();

        let titles: Vec<_> = fixture
            .store
            .load_articles()
            .unwrap()
            .iter()
            .map(|a| a.title.clone())
            .collect();
        assert_eq!(titles, vec!["Alpha v2", "Beta"]);
    }
}
