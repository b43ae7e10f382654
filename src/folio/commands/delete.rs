use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reconcile::prune;
use crate::store::DataStore;

/// Removes the article and every order entry pointing at it.
pub fn run<S: DataStore>(store: &mut S, id: &str) -> Result<CmdResult> {
    let removed = store.remove_article(id)?;

    let order = store.load_order()?;
    let pruned = prune(&order, id);
    if pruned.len() != order.len() {
        store.save_order(&pruned)?;
    }
    tracing::info!(id = %removed.id, "article deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Article deleted ({}): {}",
        removed.id, removed.title
    )));
    Ok(result.with_affected_articles(vec![removed]))
}
