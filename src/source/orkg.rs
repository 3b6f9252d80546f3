//! HTTP statement source for the ORKG REST API
//!
//! One pooled `reqwest::Client`, paged `/statements` fetches, retries with
//! exponential backoff, and in-memory response caches shared across
//! concurrent crawls.

use super::traits::{SourceError, SourceResult, StatementSource};
use crate::config::Settings;
use crate::graph::{ContributionRef, NodeClass, NodeRef, Paper, PaperMeta, Predicate, ResearchField, Statement};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on pages fetched per subject
const DEFAULT_MAX_PAGES: usize = 200;

#[derive(Debug, Default, Deserialize)]
struct WireRef {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePredicate {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireObject {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default, rename = "_class")]
    class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStatement {
    #[serde(default)]
    subject: WireRef,
    #[serde(default)]
    predicate: WirePredicate,
    #[serde(default)]
    object: WireObject,
}

impl From<WireStatement> for Statement {
    fn from(st: WireStatement) -> Self {
        Statement {
            subject_id: st.subject.id.unwrap_or_default(),
            predicate: Predicate {
                id: st.predicate.id.unwrap_or_default(),
                label: st.predicate.label,
            },
            object: NodeRef {
                id: st.object.id,
                label: st.object.label.unwrap_or_default(),
                class: st.object.class.map(NodeClass::from),
            },
        }
    }
}

/// One page of a subject's statements
#[derive(Debug, Clone, Default)]
struct StatementPage {
    statements: Vec<Statement>,
    total_pages: Option<usize>,
}

fn parse_page(value: &Value) -> SourceResult<StatementPage> {
    let content = match value.get("content") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(SourceError::Malformed(format!(
                "expected statement array, got {}",
                other
            )))
        }
    };
    let wire: Vec<WireStatement> = serde_json::from_value(Value::Array(content))?;

    let total_pages = value
        .get("totalPages")
        .or_else(|| value.pointer("/page/total_pages"))
        .and_then(Value::as_u64)
        .map(|n| n as usize);

    Ok(StatementPage {
        statements: wire.into_iter().map(Statement::from).collect(),
        total_pages,
    })
}

fn str_field(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|p| value.pointer(p))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(|i| i.as_str().map(str::to_string)),
            _ => None,
        })
}

fn year_field(value: &Value) -> Option<i32> {
    ["/year", "/publication_info/published_year"]
        .iter()
        .filter_map(|p| value.pointer(p))
        .find_map(|v| match v {
            Value::Number(n) => n.as_i64().map(|y| y as i32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

/// Decode a paper payload, accepting both flat and v2 layouts
fn paper_from_json(value: &Value) -> SourceResult<Paper> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| SourceError::Malformed("paper payload without id".to_string()))?
        .to_string();

    let authors = value
        .get("authors")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|a| match a {
                    Value::String(name) => Some(name.clone()),
                    Value::Object(_) => a.get("name").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let research_fields = value
        .get("research_fields")
        .cloned()
        .map(serde_json::from_value::<Vec<ResearchField>>)
        .transpose()?
        .unwrap_or_default();

    let contributions = value
        .get("contributions")
        .cloned()
        .map(serde_json::from_value::<Vec<ContributionRef>>)
        .transpose()?
        .unwrap_or_default();

    Ok(Paper {
        meta: PaperMeta {
            id,
            title: str_field(value, &["/title"]),
            year: year_field(value),
            doi: str_field(value, &["/doi", "/identifiers/doi"]),
            url: str_field(value, &["/url", "/publication_info/url"]),
            authors,
            research_fields,
        },
        contributions,
    })
}

type PageKey = (String, usize, usize);

/// Delay before retry number `attempt + 1`: `backoff * 2^attempt`
fn retry_delay(backoff: Duration, attempt: u32) -> Duration {
    backoff.saturating_mul(2u32.saturating_pow(attempt))
}

/// Run `op` until it succeeds or `max_retries` retries are spent
async fn with_retries<T, F, Fut>(
    url: &str,
    max_retries: u32,
    backoff: Duration,
    mut op: F,
) -> SourceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SourceResult<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries => {
                let delay = retry_delay(backoff, attempt);
                warn!(url = %url, attempt = attempt + 1, error = %e, ?delay, "request failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Serve a page from `cache`, awaiting `fetch` only on a miss
async fn cached_page<Fut>(
    cache: &DashMap<PageKey, StatementPage>,
    key: PageKey,
    fetch: Fut,
) -> SourceResult<StatementPage>
where
    Fut: Future<Output = SourceResult<StatementPage>>,
{
    if let Some(hit) = cache.get(&key) {
        return Ok(hit.clone());
    }
    let page = fetch.await?;
    cache.insert(key, page.clone());
    Ok(page)
}

/// Concatenate pages `0, 1, ..` of one subject.
///
/// Stops on an empty page, on the last page reported by `total_pages`,
/// or after `max_pages` requests. Returns the statements and the number
/// of non-empty pages read.
async fn collect_pages<F, Fut>(max_pages: usize, mut fetch: F) -> SourceResult<(Vec<Statement>, usize)>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = SourceResult<StatementPage>>,
{
    let mut out = Vec::new();
    let mut pages = 0;

    for page in 0..max_pages {
        let chunk = fetch(page).await?;
        if chunk.statements.is_empty() {
            break;
        }
        pages += 1;
        let last = matches!(chunk.total_pages, Some(total) if page + 1 >= total);
        out.extend(chunk.statements);
        if last {
            break;
        }
    }

    Ok((out, pages))
}

/// ORKG REST client
pub struct OrkgClient {
    http: reqwest::Client,
    base_url: String,
    paper_accept: String,
    max_retries: u32,
    backoff: Duration,
    max_pages: usize,
    papers: DashMap<String, Paper>,
    pages: DashMap<PageKey, StatementPage>,
}

impl OrkgClient {
    /// Build a client from resolved settings
    pub fn from_settings(settings: &Settings) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            paper_accept: settings.paper_accept.clone(),
            max_retries: settings.http_max_retries,
            backoff: settings.http_backoff,
            max_pages: DEFAULT_MAX_PAGES,
            papers: DashMap::new(),
            pages: DashMap::new(),
        })
    }

    /// Cap the number of pages fetched per subject
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        accept: Option<&str>,
    ) -> SourceResult<Value> {
        with_retries(url, self.max_retries, self.backoff, move || {
            self.try_get_json(url, query, accept)
        })
        .await
    }

    async fn try_get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        accept: Option<&str>,
    ) -> SourceResult<Value> {
        let mut request = self.http.get(url).query(query);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn statements_page(
        &self,
        subject_id: &str,
        page: usize,
        size: usize,
    ) -> SourceResult<StatementPage> {
        let key = (subject_id.to_string(), page, size);
        cached_page(&self.pages, key, async move {
            let url = format!("{}/statements", self.base_url);
            let query = [
                ("subject_id", subject_id.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ];
            let value = self.get_json(&url, &query, None).await?;
            parse_page(&value)
        })
        .await
    }
}

#[async_trait]
impl StatementSource for OrkgClient {
    async fn statements(&self, node_id: &str, page_size: usize) -> SourceResult<Vec<Statement>> {
        let size = page_size.max(1);
        let (out, pages) =
            collect_pages(self.max_pages, move |page| self.statements_page(node_id, page, size)).await?;

        debug!(node = node_id, pages, statements = out.len(), "fetched statements");
        Ok(out)
    }

    async fn paper(&self, paper_id: &str) -> SourceResult<Paper> {
        if let Some(cached) = self.papers.get(paper_id) {
            return Ok(cached.clone());
        }

        let url = format!("{}/papers/{}", self.base_url, paper_id);
        let value = self.get_json(&url, &[], Some(self.paper_accept.as_str())).await?;
        let paper = paper_from_json(&value)?;
        self.papers.insert(paper_id.to_string(), paper.clone());
        Ok(paper)
    }
}
