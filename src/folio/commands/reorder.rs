use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::OrderEntry;
use crate::reconcile::{order_ids, reconcile, SortBy};
use crate::store::DataStore;

use super::helpers::{articles_or_empty, order_or_empty};

/// The persisted order as stored. A failed read yields an empty order.
pub fn current<S: DataStore>(store: &S) -> Result<CmdResult> {
    Ok(CmdResult::default().with_order(order_or_empty(store)))
}

/// Replaces the persisted order verbatim. Ids that do not exist are kept; the
/// listing skips them.
pub fn run<S: DataStore>(store: &mut S, order: Vec<OrderEntry>) -> Result<CmdResult> {
    store.save_order(&order)?;
    tracing::info!(entries = order.len(), "article order saved");

    let articles = articles_or_empty(&*store);
    let unknown = order_ids(&order)
        .into_iter()
        .filter(|id| !articles.contains(id))
        .count();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Order saved ({} entries)",
        order.len()
    )));
    if unknown > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} entries do not match any article and will be skipped",
            unknown
        )));
    }
    Ok(result.with_order(order))
}

/// Moves one article to `position` (0-based, clamped) within the current custom
/// listing and persists the whole listing as a bare-id order.
pub fn move_to<S: DataStore>(store: &mut S, id: &str, position: usize) -> Result<CmdResult> {
    let articles = store.load_articles()?;
    if !articles.contains(id) {
        return Err(FolioError::ArticleNotFound(id.to_string()));
    }
    let order = store.load_order()?;

    let mut ids: Vec<String> = reconcile(&articles, &order, SortBy::Custom)
        .into_iter()
        .map(|a| a.id)
        .filter(|existing| existing != id)
        .collect();
    let target = position.min(ids.len());
    ids.insert(target, id.to_string());

    let next: Vec<OrderEntry> = ids.into_iter().map(OrderEntry::Id).collect();
    store.save_order(&next)?;
    tracing::info!(id, position = target, "article moved");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Moved {} to position {}",
        id,
        target + 1
    )));
    Ok(result.with_order(next))
}
