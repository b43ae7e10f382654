use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type ArticleId = String;

/// Keys the store owns. They are never taken from free-form input fields.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "createdAt",
    "updatedAt",
    "isAIGenerated",
    "isScraped",
    "publishHistory",
    "publishStatus",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
    Scheduled,
    Ready,
}

impl ArticleStatus {
    /// Scheduled and ready articles are waiting for the automation tool to publish them.
    pub fn is_pending(&self) -> bool {
        matches!(self, ArticleStatus::Scheduled | ArticleStatus::Ready)
    }

    /// Parses a stored or remote status. Besides the folio names this accepts
    /// WordPress post statuses (`publish`, `future`, `pending`, `private`).
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        if let Ok(status) = raw.parse() {
            return Some(status);
        }
        match raw.trim().to_ascii_lowercase().as_str() {
            "publish" => Some(ArticleStatus::Published),
            "future" => Some(ArticleStatus::Scheduled),
            "pending" | "private" => Some(ArticleStatus::Draft),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
            ArticleStatus::Scheduled => "scheduled",
            ArticleStatus::Ready => "ready",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            "scheduled" => Ok(ArticleStatus::Scheduled),
            "ready" => Ok(ArticleStatus::Ready),
            other => Err(format!("Unknown article status: {}", other)),
        }
    }
}

/// One entry in an article's publishing log, written by the automation webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRecord {
    pub platform: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ArticleStatus,
}

/// Unknown or non-string statuses read as the default instead of failing the record.
fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ArticleStatus, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let status = match raw.as_ref().and_then(Value::as_str) {
        Some(s) => ArticleStatus::parse_lenient(s).unwrap_or_else(|| {
            tracing::warn!(status = s, "unknown article status, reading as draft");
            ArticleStatus::default()
        }),
        None => ArticleStatus::default(),
    };
    Ok(status)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub excerpt: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Calendar date shown to readers (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "publishStatus", deserialize_with = "lenient_status")]
    pub status: ArticleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, rename = "isAIGenerated", skip_serializing_if = "is_false")]
    pub is_ai_generated: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_scraped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Where a listed article came from (`local`, the remote's name, or the ingesting tool).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publish_history: Vec<PublishRecord>,
    /// Fields this version does not model. Kept verbatim so nothing is lost on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_article_id(None),
            title: title.into(),
            content: content.into(),
            excerpt: String::new(),
            category: category.into(),
            tags: Vec::new(),
            author: None,
            date: Some(now.date_naive().to_string()),
            created_at: Some(now),
            updated_at: Some(now),
            status: ArticleStatus::default(),
            image_url: None,
            is_ai_generated: false,
            is_scraped: false,
            source_url: None,
            source: None,
            publish_history: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Builds a stored article from create input. The caller picks the id.
    pub fn from_new(id: ArticleId, input: NewArticle) -> Self {
        let mut article = Article::new(input.title, input.content, input.category);
        article.id = id;
        article.excerpt = input.excerpt;
        article.tags = input.tags;
        article.author = input.author;
        article.status = input.status.unwrap_or_default();
        article.image_url = input.image_url;
        article.source_url = input.source_url;
        article.source = input.source;
        article.extra = strip_reserved(input.extra);
        article
    }

    /// The date used by the `newest` and `oldest` sorts: `date` first, then `createdAt`.
    pub fn sort_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(parse_loose_date)
            .or_else(|| self.created_at.map(|ts| ts.date_naive()))
    }

    /// Reads a record as written to `articles.json` or served by a remote.
    ///
    /// Older records can carry both `status` and `publishStatus`. The first of
    /// the two (in that order of preference: `publishStatus`, then `status`) that
    /// names a known status wins, and the other key is dropped.
    pub fn from_stored(mut value: Value) -> serde_json::Result<Self> {
        if let Some(obj) = value.as_object_mut() {
            if obj.contains_key("status") && obj.contains_key("publishStatus") {
                let publish = obj.remove("publishStatus");
                let status = obj.remove("status");
                let known = [publish, status].into_iter().flatten().find(|v| {
                    v.as_str()
                        .and_then(ArticleStatus::parse_lenient)
                        .is_some()
                });
                if let Some(chosen) = known {
                    obj.insert("status".to_string(), chosen);
                }
            }
        }
        serde_json::from_value(value)
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

fn strip_reserved(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        extra.remove(*key);
    }
    extra
}

/// Generates a fresh article id, optionally with a provenance prefix (`ai`, `scraped`).
pub fn new_article_id(prefix: Option<&str>) -> ArticleId {
    let raw = Uuid::new_v4().simple().to_string();
    match prefix {
        Some(p) => format!("{}_{}", p, raw),
        None => raw,
    }
}

/// Input for creating an article, from the editor, the CLI or the webhook.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, alias = "publishStatus")]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            ..Self::default()
        }
    }
}

/// A merge-by-field update. Absent or blank fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "publishStatus")]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArticlePatch {
    pub fn apply(self, article: &mut Article) {
        fn set(target: &mut String, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                *target = v;
            }
        }
        fn set_opt(target: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                *target = Some(v);
            }
        }

        set(&mut article.title, self.title);
        set(&mut article.content, self.content);
        set(&mut article.excerpt, self.excerpt);
        set(&mut article.category, self.category);
        set_opt(&mut article.author, self.author);
        set_opt(&mut article.date, self.date);
        set_opt(&mut article.image_url, self.image_url);
        set_opt(&mut article.source_url, self.source_url);
        if let Some(tags) = self.tags {
            article.tags = tags;
        }
        if let Some(status) = self.status {
            article.status = status;
        }
        for (key, value) in strip_reserved(self.extra) {
            article.extra.insert(key, value);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishStatusUpdate {
    pub publish_status: ArticleStatus,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// A category-aware order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: ArticleId,
    pub category: String,
    pub position: usize,
}

/// One entry of the persisted display order: a bare id, or a category-aware record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderEntry {
    Id(ArticleId),
    Placed(Placement),
}

impl OrderEntry {
    pub fn id(&self) -> &str {
        match self {
            OrderEntry::Id(id) => id,
            OrderEntry::Placed(p) => &p.id,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            OrderEntry::Id(_) => None,
            OrderEntry::Placed(p) => Some(&p.category),
        }
    }
}

impl From<&str> for OrderEntry {
    fn from(id: &str) -> Self {
        OrderEntry::Id(id.to_string())
    }
}

/// Articles keyed by id, iterated in insertion order.
///
/// Serialized as a single JSON object keyed by id. Deserialization keeps document
/// order, and the key wins over any `id` stored inside the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleMap {
    entries: Vec<Article>,
    positions: HashMap<ArticleId, usize>,
}

impl ArticleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.positions.get(id).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Article> {
        self.positions.get(id).map(|&i| &mut self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Inserts at the end, or replaces in place when the id already exists.
    pub fn insert(&mut self, article: Article) -> Option<Article> {
        match self.positions.get(&article.id) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i], article)),
            None => {
                self.positions.insert(article.id.clone(), self.entries.len());
                self.entries.push(article);
                None
            }
        }
    }

    /// Removes an article, keeping the others in order. Positions are rebuilt,
    /// so this is O(n).
    pub fn remove(&mut self, id: &str) -> Option<Article> {
        let index = *self.positions.get(id)?;
        let removed = self.entries.remove(index);
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
        Some(removed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|a| a.id.as_str())
    }

    pub fn find_by_source_url(&self, source_url: &str) -> Option<&Article> {
        self.entries
            .iter()
            .find(|a| a.source_url.as_deref() == Some(source_url))
    }

    pub fn into_vec(self) -> Vec<Article> {
        self.entries
    }
}

impl FromIterator<Article> for ArticleMap {
    fn from_iter<T: IntoIterator<Item = Article>>(iter: T) -> Self {
        let mut map = ArticleMap::new();
        for article in iter {
            map.insert(article);
        }
        map
    }
}

impl IntoIterator for ArticleMap {
    type Item = Article;
    type IntoIter = std::vec::IntoIter<Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArticleMap {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ArticleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for article in &self.entries {
            map.serialize_entry(&article.id, article)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ArticleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArticleMapVisitor;

        impl<'de> Visitor<'de> for ArticleMapVisitor {
            type Value = ArticleMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of articles keyed by id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ArticleMap, A::Error> {
                let mut map = ArticleMap::new();
                while let Some((key, raw)) = access.next_entry::<String, Value>()? {
                    let mut article = Article::from_stored(raw).map_err(|e| {
                        A::Error::custom(format!("article {}: {}", key, e))
                    })?;
                    article.id = key;
                    map.insert(article);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ArticleMapVisitor)
    }
}
