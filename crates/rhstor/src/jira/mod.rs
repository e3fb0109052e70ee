//! Jira access
//!
//! [`JiraApi`] is the only way the tools reach Jira. [`HttpJira`] implements it
//! over the REST v2 API; tests substitute an in-memory fake.

mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use client::HttpJira;

use async_trait::async_trait;
use rhstor_core::jira::{
    Issue, JiraCreatedIssue, JiraField, JiraIssueLinkType, JiraIssueType, JiraProject, JiraUser,
};
use serde_json::Value;

use crate::prelude::{eprintln, *};

/// Default Jira server
pub const DEFAULT_SERVER: &str = "https://issues.redhat.com";

/// Jira configuration from environment variables
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub server: String,
    pub api_token: String,
}

impl JiraConfig {
    /// Load configuration from environment variables.
    ///
    /// `JIRA_API_TOKEN` is required. `JIRA_SERVER` overrides [`DEFAULT_SERVER`].
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`JiraConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_token = lookup("JIRA_API_TOKEN")
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingToken)?;

        let server = lookup("JIRA_SERVER")
            .filter(|server| !server.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        Ok(Self::new(server, api_token))
    }

    pub fn new(server: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }
}

/// Create an HTTP client that authenticates with a personal access token
pub fn create_jira_client(config: &JiraConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Printed when `JIRA_API_TOKEN` is missing
pub fn print_token_help() {
    eprintln!("Error: JIRA_API_TOKEN environment variable not set!");
    eprintln!("   Please set it using: export JIRA_API_TOKEN='your-token-here'");
    eprintln!("   Get your token from: {DEFAULT_SERVER}");
    eprintln!("   -> Account Settings -> Security -> API Tokens");
}

/// The issue tracker operations the tools rely on.
///
/// Calls are made one at a time; implementations need no internal coordination
/// beyond being shareable.
#[async_trait]
pub trait JiraApi: Send + Sync {
    /// Base URL of the server, used for permalinks
    fn server(&self) -> &str;

    /// The authenticated user; doubles as the connectivity check
    async fn myself(&self) -> Result<JiraUser, Error>;

    /// Run a JQL search
    async fn search(&self, jql: &str, max_results: usize) -> Result<Vec<Issue>, Error>;

    /// All field metadata of the instance
    async fn fields(&self) -> Result<Vec<JiraField>, Error>;

    /// Create an issue from a `fields` object
    async fn create_issue(&self, fields: &Value) -> Result<JiraCreatedIssue, Error>;

    /// Set fields on an existing issue
    async fn update_issue(&self, key: &str, fields: &Value) -> Result<(), Error>;

    async fn issue_link_types(&self) -> Result<Vec<JiraIssueLinkType>, Error>;

    /// Link two issues with a comment
    async fn create_issue_link(
        &self,
        link_type: &str,
        inward_key: &str,
        outward_key: &str,
        comment: &str,
    ) -> Result<(), Error>;

    async fn project(&self, key: &str) -> Result<JiraProject, Error>;

    async fn issue_types(&self) -> Result<Vec<JiraIssueType>, Error>;
}

/// Connect and verify credentials; any failure here is fatal for the run
pub async fn connect(config: &JiraConfig) -> Result<HttpJira> {
    eprintln!("Connecting to JIRA...");
    let jira = HttpJira::new(config)?;

    match jira.myself().await {
        Ok(user) => {
            log::debug!(
                "Authenticated as {}",
                user.display_name.or(user.name).unwrap_or_default()
            );
            eprintln!("Connected to JIRA successfully");
            Ok(jira)
        }
        Err(e) => Err(eyre!("Failed to connect to JIRA: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let result = JiraConfig::from_lookup(vars(&[("JIRA_SERVER", "https://jira.example.com")]));

        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn test_empty_token_is_an_error() {
        let result = JiraConfig::from_lookup(vars(&[("JIRA_API_TOKEN", "")]));

        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn test_server_defaults_when_unset() {
        let config = JiraConfig::from_lookup(vars(&[("JIRA_API_TOKEN", "abc123")])).unwrap();

        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.api_token, "abc123");
    }

    #[test]
    fn test_server_override() {
        let config = JiraConfig::from_lookup(vars(&[
            ("JIRA_API_TOKEN", "abc123"),
            ("JIRA_SERVER", "https://jira.example.com/"),
        ]))
        .unwrap();

        assert_eq!(config.server, "https://jira.example.com");
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = JiraConfig::new("https://issues.example.com/", "token");

        assert_eq!(config.server, "https://issues.example.com");
        assert_eq!(config.api_token, "token");
    }

    #[test]
    fn test_client_builds_with_token() {
        let config = JiraConfig::new(DEFAULT_SERVER, "abc123");

        assert!(create_jira_client(&config).is_ok());
    }
}
