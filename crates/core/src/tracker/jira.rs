//! Jira REST API client for account lookup by mail.

use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{Account, AccountLookup};
use crate::errors::TrackerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

/// Jira client using basic authentication.
#[derive(Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl JiraClient {
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| TrackerError::InvalidUrl(base_url.clone()))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("rhusers/", env!("CARGO_PKG_VERSION")))
            .build()?;
        info!(base_url = %base_url, "created JiraClient");

        Ok(Self {
            http,
            base_url,
            username: username.into(),
            password: password.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link to the profile view of the account with `key`.
    pub fn profile_url(&self, key: &str) -> Result<String, TrackerError> {
        let mut url = Url::parse(&format!("{}/ViewProfile.jspa", self.base_url))
            .map_err(|_| TrackerError::InvalidUrl(self.base_url.clone()))?;
        url.query_pairs_mut().append_pair("name", key);
        Ok(url.to_string())
    }

    /// Users whose name, display name or mail match `query`.
    #[instrument(skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<JiraUser>, TrackerError> {
        let url = format!("{}/rest/api/2/user/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .query(&[("username", query)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let body = resp.text().await?;
        let users = parse_users(&body)?;
        debug!(count = users.len(), "fetched users");
        Ok(users)
    }
}

impl AccountLookup for JiraClient {
    async fn find_account_by_mail(&self, address: &str) -> Result<Option<Account>, TrackerError> {
        let users = self.search_users(address).await?;
        match exact_mail_match(&users, address) {
            Some(user) => Ok(Some(Account {
                key: user.key.clone(),
                profile_url: self.profile_url(&user.key)?,
            })),
            None => Ok(None),
        }
    }
}

fn parse_users(body: &str) -> Result<Vec<JiraUser>, TrackerError> {
    serde_json::from_str(body).map_err(|e| TrackerError::ParseError(e.to_string()))
}

/// The search is fuzzy; only an exact mail match counts.
fn exact_mail_match<'a>(users: &'a [JiraUser], address: &str) -> Option<&'a JiraUser> {
    users
        .iter()
        .find(|u| u.email_address.as_deref() == Some(address))
}

fn status_error(status: StatusCode, body: String) -> TrackerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TrackerError::AuthenticationFailed(format!("HTTP {}", status))
        }
        _ => TrackerError::ApiError {
            status: status.as_u16(),
            body: if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or_default()
                    .to_lowercase()
            } else {
                body
            },
        },
    }
}
