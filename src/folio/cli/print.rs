use chrono::{DateTime, Utc};
use colored::Colorize;
use folio::api::{ArticleStats, CmdMessage, MessageLevel};
use folio::config::FolioConfig;
use folio::model::{Article, ArticleStatus, OrderEntry};
use serde::Serialize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 11;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles found.");
        return;
    }

    for (i, article) in articles.iter().enumerate() {
        let idx_str = format!("{:>3}. ", i + 1);
        let category = format!(" [{}]", article.category);
        let status = format!("{:>width$}", article.status.as_str(), width = STATUS_WIDTH);
        let time_ago = article
            .created_at
            .map(format_time_ago)
            .unwrap_or_else(|| format!("{:>width$}", "", width = TIME_WIDTH));

        let fixed_width = idx_str.width() + category.width() + STATUS_WIDTH + TIME_WIDTH + 1;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&article.title, available);
        let padding = available.saturating_sub(title_display.width());

        let source_marker = match article.source.as_deref() {
            Some(source) if source != folio::hybrid::LOCAL_SOURCE => format!(" ({})", source),
            _ => String::new(),
        };

        println!(
            "{}{}{}{}{} {}{}",
            idx_str,
            title_display,
            category.dimmed(),
            " ".repeat(padding),
            colored_status(article.status, &status),
            time_ago.dimmed(),
            source_marker.cyan()
        );
    }
}

pub(super) fn print_full_article(article: &Article) {
    println!("{}", article.title.bold());
    let mut meta = vec![
        article.id.yellow().to_string(),
        article.category.clone(),
        colored_status(article.status, article.status.as_str()),
    ];
    if let Some(author) = &article.author {
        meta.push(author.clone());
    }
    if let Some(date) = &article.date {
        meta.push(date.clone());
    }
    println!("{}", meta.join(" · "));
    if !article.tags.is_empty() {
        println!("{}", format!("#{}", article.tags.join(" #")).dimmed());
    }
    if let Some(url) = &article.source_url {
        println!("{}", url.dimmed());
    }
    println!("--------------------------------");
    if !article.excerpt.is_empty() {
        println!("{}\n", article.excerpt.italic());
    }
    println!("{}", article.content);
}

pub(super) fn print_order(order: &[OrderEntry]) {
    if order.is_empty() {
        println!("No custom order saved.");
        return;
    }
    for (i, entry) in order.iter().enumerate() {
        match entry.category() {
            Some(category) => {
                let category = format!("[{}]", category);
                println!("{:>3}. {} {}", i + 1, entry.id(), category.dimmed())
            }
            None => println!("{:>3}. {}", i + 1, entry.id()),
        }
    }
}

pub(super) fn print_stats(stats: &ArticleStats) {
    println!("{:<14}{}", "Total", stats.total.to_string().bold());
    println!("{:<14}{}", "Manual", stats.manual);
    println!("{:<14}{}", "AI generated", stats.ai_generated);
    println!("{:<14}{}", "Scraped", stats.scraped);
}

pub(super) fn print_config(config: &FolioConfig) {
    for key in FolioConfig::keys() {
        let value = config.get(key).unwrap_or_default();
        if value.is_empty() {
            println!("{} = {}", key, "(unset)".dimmed());
        } else {
            println!("{} = {}", key, value);
        }
    }
}

fn colored_status(status: ArticleStatus, text: &str) -> String {
    match status {
        ArticleStatus::Published => text.green().to_string(),
        ArticleStatus::Draft => text.yellow().to_string(),
        _ => text.normal().to_string(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_wide_chars() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        let wide = truncate_to_width("文章文章文章", 6);
        assert!(wide.width() <= 6);
        assert!(wide.ends_with('…'));
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let formatted = format_time_ago(Utc::now() - chrono::Duration::hours(3));
        assert_eq!(formatted.width(), TIME_WIDTH);
        assert!(formatted.trim().ends_with("ago"));
    }
}
