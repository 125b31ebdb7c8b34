//! Redmine issue tracker over the REST API.
//!
//! Two endpoints are used:
//!
//! - `GET {base}/issues.json?query_id=<report>&offset=<n>&limit=100`: the
//!   saved report listing untriaged issues, in report order, fetched page by
//!   page until `total_count` ids have been read
//! - `GET {base}/issues/<id>.json`: a single issue, rendered as a summary line
//!   and the issue URL
//!
//! Every request is bounded by the client timeout. Nothing is retried; a
//! failed request surfaces as a [`TrackerError`] and the user re-issues the
//! command.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use triage_application::ports::issue_tracker::{IssueTracker, TrackerError};
use triage_domain::{IssueId, IssueQueue};

/// Largest page Redmine serves.
const REPORT_PAGE_SIZE: usize = 100;

const API_KEY_HEADER: &str = "X-Redmine-API-Key";

#[derive(Deserialize)]
struct IssueList {
    issues: Vec<IssueRef>,
    total_count: Option<usize>,
}

/// One page of a report response.
#[derive(Debug, PartialEq)]
struct ReportPage {
    ids: Vec<IssueId>,
    total_count: Option<usize>,
}

#[derive(Deserialize)]
struct IssueRef {
    id: u64,
}

#[derive(Deserialize)]
struct IssueEnvelope {
    issue: IssueDetail,
}

#[derive(Deserialize)]
struct IssueDetail {
    id: u64,
    subject: String,
    project: Named,
    status: Named,
    priority: Named,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

/// Reads triage reports and issue detail from a Redmine instance.
pub struct RedmineIssueTracker {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RedmineIssueTracker {
    /// Create a tracker for the Redmine at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("triage-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<(StatusCode, String), TrackerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TrackerError::Unavailable(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TrackerError::Unavailable(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl IssueTracker for RedmineIssueTracker {
    async fn report_issues(&self, report_id: u64) -> Result<IssueQueue, TrackerError> {
        let mut ids: Vec<IssueId> = Vec::new();
        loop {
            let query = [
                ("query_id", report_id.to_string()),
                ("offset", ids.len().to_string()),
                ("limit", REPORT_PAGE_SIZE.to_string()),
            ];
            let (status, body) = self.get("/issues.json", &query).await?;
            if !status.is_success() {
                return Err(http_failure(status));
            }

            let page = parse_report(&body)?;
            let fetched = page.ids.len();
            ids.extend(page.ids);
            if !has_more(ids.len(), fetched, page.total_count) {
                if let Some(total) = page.total_count
                    && ids.len() < total
                {
                    warn!(
                        "Report {} ended after {} of {} issues",
                        report_id,
                        ids.len(),
                        total
                    );
                }
                break;
            }
        }

        debug!("Report {} lists {} issues", report_id, ids.len());
        Ok(IssueQueue::from(ids))
    }

    async fn issue_detail(&self, issue: IssueId) -> Result<Vec<String>, TrackerError> {
        let (status, body) = self.get(&format!("/issues/{}.json", issue), &[]).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(issue));
        }
        if !status.is_success() {
            return Err(http_failure(status));
        }
        render_issue(&self.base_url, &body)
    }
}

fn http_failure(status: StatusCode) -> TrackerError {
    TrackerError::Unavailable(format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ))
}

/// Issue ids of one report page, in report order.
fn parse_report(body: &str) -> Result<ReportPage, TrackerError> {
    let list: IssueList =
        serde_json::from_str(body).map_err(|e| TrackerError::Malformed(e.to_string()))?;
    Ok(ReportPage {
        ids: list.issues.into_iter().map(|i| IssueId::new(i.id)).collect(),
        total_count: list.total_count,
    })
}

/// Whether another page should be requested after reading `fetched` ids,
/// `collected` in total. An empty page always stops.
fn has_more(collected: usize, fetched: usize, total_count: Option<usize>) -> bool {
    match total_count {
        _ if fetched == 0 => false,
        Some(total) => collected < total,
        None => fetched >= REPORT_PAGE_SIZE,
    }
}

/// Summary line and link for an issue response.
fn render_issue(base_url: &str, body: &str) -> Result<Vec<String>, TrackerError> {
    let envelope: IssueEnvelope =
        serde_json::from_str(body).map_err(|e| TrackerError::Malformed(e.to_string()))?;
    let issue = envelope.issue;

    Ok(vec![
        format!(
            "Issue #{} [{}] {}, {}: {}",
            issue.id, issue.project.name, issue.status.name, issue.priority.name, issue.subject
        ),
        format!("{}/issues/{}", base_url, issue.id),
    ])
}
