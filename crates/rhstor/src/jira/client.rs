use async_trait::async_trait;
use rhstor_core::jira::{
    summarize_error_body, transform_search_response, Issue, JiraCreatedIssue, JiraField,
    JiraIssueLinkType, JiraIssueLinkTypesResponse, JiraIssueType, JiraProject, JiraSearchResponse,
    JiraUser, SEARCH_FIELDS,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{create_jira_client, JiraApi, JiraConfig};
use crate::prelude::*;

/// [`JiraApi`] over the Jira Server/Data Center REST v2 API
#[derive(Debug, Clone)]
pub struct HttpJira {
    client: reqwest::Client,
    server: String,
}

impl HttpJira {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        Ok(Self {
            client: create_jira_client(config)?,
            server: config.server.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.server, path)
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, Error> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to Jira: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: summarize_error_body(&body),
                body,
            });
        }

        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, Error> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

#[async_trait]
impl JiraApi for HttpJira {
    fn server(&self) -> &str {
        &self.server
    }

    async fn myself(&self) -> Result<JiraUser, Error> {
        self.fetch(self.client.get(self.url("myself"))).await
    }

    async fn search(&self, jql: &str, max_results: usize) -> Result<Vec<Issue>, Error> {
        let max_results_str = max_results.to_string();
        let query_params = [
            ("jql", jql),
            ("maxResults", max_results_str.as_str()),
            ("fields", SEARCH_FIELDS),
        ];

        let response: JiraSearchResponse = self
            .fetch(self.client.get(self.url("search")).query(&query_params))
            .await?;

        Ok(transform_search_response(response))
    }

    async fn fields(&self) -> Result<Vec<JiraField>, Error> {
        self.fetch(self.client.get(self.url("field"))).await
    }

    async fn create_issue(&self, fields: &Value) -> Result<JiraCreatedIssue, Error> {
        let payload = json!({ "fields": fields });
        self.fetch(self.client.post(self.url("issue")).json(&payload))
            .await
    }

    async fn update_issue(&self, key: &str, fields: &Value) -> Result<(), Error> {
        let payload = json!({ "fields": fields });
        self.execute(
            self.client
                .put(self.url(&format!("issue/{key}")))
                .json(&payload),
        )
        .await
        .map(|_| ())
    }

    async fn issue_link_types(&self) -> Result<Vec<JiraIssueLinkType>, Error> {
        let response: JiraIssueLinkTypesResponse =
            self.fetch(self.client.get(self.url("issueLinkType"))).await?;
        Ok(response.issue_link_types)
    }

    async fn create_issue_link(
        &self,
        link_type: &str,
        inward_key: &str,
        outward_key: &str,
        comment: &str,
    ) -> Result<(), Error> {
        let payload = json!({
            "type": { "name": link_type },
            "inwardIssue": { "key": inward_key },
            "outwardIssue": { "key": outward_key },
            "comment": { "body": comment },
        });

        self.execute(self.client.post(self.url("issueLink")).json(&payload))
            .await
            .map(|_| ())
    }

    async fn project(&self, key: &str) -> Result<JiraProject, Error> {
        self.fetch(self.client.get(self.url(&format!("project/{key}"))))
            .await
    }

    async fn issue_types(&self) -> Result<Vec<JiraIssueType>, Error> {
        self.fetch(self.client.get(self.url("issuetype"))).await
    }
}
