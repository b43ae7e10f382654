use clap::{Parser, Subcommand};
use folio::model::ArticleStatus;
use folio::reconcile::SortBy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio", bin_name = "folio", version)]
#[command(about = "Flat-file article CMS with a custom display order", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory holding articles.json, article-order.json and config.json
    #[arg(long, global = true, env = "FOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind (defaults to the configured `bind`)
        #[arg(long, env = "FOLIO_BIND")]
        bind: Option<String>,

        /// WordPress-compatible proxy merged into hybrid listings
        #[arg(long, env = "FOLIO_REMOTE_URL")]
        remote_url: Option<String>,

        /// Bearer token required by the webhook endpoints
        #[arg(long, env = "FOLIO_WEBHOOK_TOKEN")]
        webhook_token: Option<String>,
    },

    /// Create the data directory, store files and upload directory
    Init,

    /// List articles in display order
    #[command(alias = "ls")]
    List {
        /// custom, newest, oldest, title or category
        #[arg(short, long, default_value_t = SortBy::Custom)]
        sort: SortBy,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only this status
        #[arg(long)]
        status: Option<ArticleStatus>,

        /// Merge in the configured remote source
        #[arg(long)]
        hybrid: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one article
    #[command(alias = "v")]
    View {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Create an article. Content is read from stdin when not given.
    #[command(alias = "n")]
    Create {
        title: String,

        #[arg(short = 'b', long)]
        content: Option<String>,

        #[arg(short, long)]
        category: String,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(long)]
        excerpt: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        status: Option<ArticleStatus>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Change fields of an article; omitted fields stay as they are
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short = 'b', long)]
        content: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Comma-separated tags, replacing the current ones
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        #[arg(long)]
        excerpt: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        status: Option<ArticleStatus>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete an article and drop it from the order
    #[command(alias = "rm")]
    Delete { id: String },

    /// Replace the display order with the given ids
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Move one article to a 1-based position in the display order
    Move { id: String, position: usize },

    /// Store an image in the upload directory
    Upload { path: PathBuf },

    /// Delete an uploaded file
    Unupload { filename: String },

    /// Article counts by provenance
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Show or set config values
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

impl Commands {
    pub fn is_serve(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "folio", "list", "--sort", "title", "-c", "family", "--status", "draft", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::List {
                sort,
                category,
                status,
                hybrid,
                json,
            }) => {
                assert_eq!(sort, SortBy::Title);
                assert_eq!(category.as_deref(), Some("family"));
                assert_eq!(status, Some(ArticleStatus::Draft));
                assert!(!hybrid);
                assert!(json);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn parses_create_with_tags() {
        let cli = Cli::try_parse_from([
            "folio", "create", "Title", "-b", "Body", "-c", "career", "-t", "a,b",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Create { title, tags, .. }) => {
                assert_eq!(title, "Title");
                assert_eq!(tags, vec!["a", "b"]);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["folio", "list", "--status", "sparkly"]).is_err());
    }

    #[test]
    fn reorder_needs_ids() {
        assert!(Cli::try_parse_from(["folio", "reorder"]).is_err());
    }
}
