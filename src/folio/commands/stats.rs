use serde::Serialize;

use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DataStore;

/// Provenance counts. An article that is somehow both AI-generated and scraped
/// counts in both buckets, so `manual` saturates at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleStats {
    #[serde(rename = "totalArticles")]
    pub total: usize,
    pub ai_generated: usize,
    pub scraped: usize,
    pub manual: usize,
}

pub fn run<S: DataStore>(store: &S) -> Result<CmdResult> {
    let articles = store.load_articles()?;
    let total = articles.len();
    let ai_generated = articles.iter().filter(|a| a.is_ai_generated).count();
    let scraped = articles.iter().filter(|a| a.is_scraped).count();

    let stats = ArticleStats {
        total,
        ai_generated,
        scraped,
        manual: total.saturating_sub(ai_generated + scraped),
    };
    Ok(CmdResult::default().with_stats(stats))
}
