//! # CLI Layer
//!
//! This module is **one possible client** for folio; the HTTP server is the other.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Installs the tracing subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory, loads config and builds the API
//! - `handle_*()`: Per-command handlers that call the API and format output
//! - `print_*()`: Output formatting functions (see `print.rs`)
//!
//! Business rules live in the command layer; nothing here decides what an
//! article listing looks like beyond colors and column widths.

use super::print::{
    print_articles, print_config, print_full_article, print_json, print_messages, print_order,
    print_stats,
};
use super::setup::{Cli, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use directories::ProjectDirs;
use folio::api::{ConfigAction, FolioApi, FolioPaths, ListQuery};
use folio::config::FolioConfig;
use folio::hybrid::{merge_sources, ArticleSource, LocalSource};
use folio::model::{ArticlePatch, NewArticle, OrderEntry};
use folio::reconcile::SortBy;
use folio::remote::RemoteSource;
use folio::server::{self, AppState};
use folio::store::fs::FileStore;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

struct AppContext {
    api: FolioApi<FileStore>,
    config: FolioConfig,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let is_serve = cli.command.as_ref().is_some_and(Commands::is_serve);
    init_tracing(cli.verbose, is_serve);

    let mut ctx = init_context(cli.data_dir.as_deref())?;

    match cli.command {
        Some(Commands::Serve {
            bind,
            remote_url,
            webhook_token,
        }) => handle_serve(ctx, bind, remote_url, webhook_token).await,
        Some(Commands::Init) => handle_init(&ctx),
        Some(Commands::List {
            sort,
            category,
            status,
            hybrid,
            json,
        }) => {
            let mut query = ListQuery::sorted(sort);
            query.category = category;
            query.status = status;
            if hybrid {
                handle_hybrid_list(ctx, &query, json).await
            } else {
                handle_list(&ctx, &query, json)
            }
        }
        Some(Commands::View { id, json }) => handle_view(&ctx, &id, json),
        Some(Commands::Create {
            title,
            content,
            category,
            tags,
            excerpt,
            author,
            status,
            image_url,
        }) => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };
            let input = NewArticle {
                tags,
                excerpt: excerpt.unwrap_or_default(),
                author,
                status,
                image_url,
                ..NewArticle::new(title, content, category)
            };
            handle_create(&mut ctx, input)
        }
        Some(Commands::Update {
            id,
            title,
            content,
            category,
            tags,
            excerpt,
            author,
            status,
            image_url,
        }) => {
            let patch = ArticlePatch {
                title,
                content,
                category,
                tags,
                excerpt,
                author,
                status,
                image_url,
                ..ArticlePatch::default()
            };
            handle_update(&mut ctx, &id, patch)
        }
        Some(Commands::Delete { id }) => handle_delete(&mut ctx, &id),
        Some(Commands::Reorder { ids }) => handle_reorder(&mut ctx, ids),
        Some(Commands::Move { id, position }) => handle_move(&mut ctx, &id, position),
        Some(Commands::Upload { path }) => handle_upload(&ctx, &path),
        Some(Commands::Unupload { filename }) => {
            let result = ctx.api.remove_upload(&filename)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Stats { json }) => handle_stats(&ctx, json),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, &ListQuery::sorted(SortBy::Custom), false),
    }
}

/// Logs go to stderr so `--json` output stays parseable. `RUST_LOG` wins over
/// the defaults.
fn init_tracing(verbose: bool, is_serve: bool) {
    let default_filter = match (is_serve, verbose) {
        (_, true) => "folio=debug,tower_http=debug",
        (true, false) => "folio=info,tower_http=info",
        (false, false) => "folio=warn",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_context(data_dir: Option<&Path>) -> anyhow::Result<AppContext> {
    let data_dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };
    let config = FolioConfig::load(&data_dir)
        .with_context(|| format!("loading config from {}", data_dir.display()))?;
    let paths = FolioPaths::new(data_dir.clone(), &config);
    let store = FileStore::new(data_dir);
    let api = FolioApi::new(store, paths, config.max_upload_bytes);

    Ok(AppContext { api, config })
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "folio", "folio")
        .context("could not determine a data directory; pass --data-dir")?;
    Ok(dirs.data_dir().to_path_buf())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No content given. Pass --content or pipe the body on stdin.");
    }
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    Ok(buffer)
}

async fn handle_serve(
    ctx: AppContext,
    bind: Option<String>,
    remote_url: Option<String>,
    webhook_token: Option<String>,
) -> anyhow::Result<()> {
    let mut config = ctx.config;
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if remote_url.is_some() {
        config.remote_url = remote_url;
    }
    if webhook_token.is_some() {
        config.webhook_token = webhook_token;
    }
    if config.webhook_token.is_none() {
        tracing::warn!("no webhook token configured, /api/n8n endpoints are open");
    }

    let bind = config.bind.clone();
    let state = Arc::new(AppState::new(ctx.api, config));
    server::serve(state, &bind).await
}

fn handle_init(ctx: &AppContext) -> anyhow::Result<()> {
    let result = ctx.api.init()?;
    for path in &result.created_paths {
        println!("  created {}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, query: &ListQuery, json: bool) -> anyhow::Result<()> {
    let result = ctx.api.list_articles(query)?;
    if json {
        return print_json(&result.listed_articles);
    }
    print_articles(&result.listed_articles);
    print_messages(&result.messages);
    Ok(())
}

async fn handle_hybrid_list(ctx: AppContext, query: &ListQuery, json: bool) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(ctx.config.remote_timeout_secs);
    let remote = ctx.config.remote_url.as_ref().map(|url| {
        RemoteSource::new(url.clone(), ctx.config.remote_name.clone(), timeout)
    });
    if remote.is_none() {
        tracing::info!("no remote_url configured, listing local articles only");
    }

    let local = LocalSource::new(Arc::new(Mutex::new(ctx.api)));
    let merged = merge_sources(
        &local,
        remote.as_ref().map(|r| r as &dyn ArticleSource),
        timeout,
    )
    .await;

    let articles: Vec<_> = merged
        .articles
        .into_iter()
        .filter(|a| query.category.as_deref().map_or(true, |c| a.category == c))
        .filter(|a| query.status.map_or(true, |s| a.status == s))
        .collect();

    if json {
        return print_json(&articles);
    }
    print_articles(&articles);
    println!(
        "\n{} local, {} remote",
        merged.local_count, merged.remote_count
    );
    Ok(())
}

fn handle_view(ctx: &AppContext, id: &str, json: bool) -> anyhow::Result<()> {
    let result = ctx.api.get_article(id)?;
    for article in &result.affected_articles {
        if json {
            print_json(article)?;
        } else {
            print_full_article(article);
        }
    }
    Ok(())
}

fn handle_create(ctx: &mut AppContext, input: NewArticle) -> anyhow::Result<()> {
    let result = ctx.api.create_article(input)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(ctx: &mut AppContext, id: &str, patch: ArticlePatch) -> anyhow::Result<()> {
    let result = ctx.api.update_article(id, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str) -> anyhow::Result<()> {
    let result = ctx.api.delete_article(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reorder(ctx: &mut AppContext, ids: Vec<String>) -> anyhow::Result<()> {
    let order = ids.into_iter().map(OrderEntry::Id).collect();
    let result = ctx.api.save_order(order)?;
    print_messages(&result.messages);
    if let Some(order) = &result.order {
        print_order(order);
    }
    Ok(())
}

fn handle_move(ctx: &mut AppContext, id: &str, position: usize) -> anyhow::Result<()> {
    if position == 0 {
        bail!("Positions start at 1");
    }
    let result = ctx.api.move_article(id, position - 1)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_upload(ctx: &AppContext, path: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let content_type = content_type_for(path);

    let result = ctx.api.store_upload(name, content_type, &bytes)?;
    print_messages(&result.messages);
    Ok(())
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

fn handle_stats(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        if json {
            return print_json(stats);
        }
        print_stats(stats);
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> anyhow::Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    print_messages(&result.messages);
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    Ok(())
}
