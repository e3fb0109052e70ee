/// Failures talking to Jira or acting on its answers
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("JIRA_API_TOKEN environment variable not set")]
    MissingToken,

    #[error("Jira API error [{status}]: {message}")]
    Api {
        status: u16,
        message: String,
        /// Raw response body as returned by Jira
        body: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse Jira response: {0}")]
    Decode(String),

    #[error("Epic Link field not found in available fields")]
    EpicFieldNotFound,

    #[error("Story creation failed: {0}")]
    StoryCreationFailed(Box<Error>),
}

impl Error {
    /// Short name of the failure class, shown in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingToken => "MissingToken",
            Error::Api { .. } => "Api",
            Error::Network(_) => "Network",
            Error::Decode(_) => "Decode",
            Error::EpicFieldNotFound => "EpicFieldNotFound",
            Error::StoryCreationFailed(_) => "StoryCreationFailed",
        }
    }

    /// Jira's response body, if the failure carried one
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Api { body, .. } => Some(body),
            Error::StoryCreationFailed(cause) => cause.response_body(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_creation_failed_exposes_cause() {
        let error = Error::StoryCreationFailed(Box::new(Error::Api {
            status: 400,
            message: "priority: Field 'priority' is required".to_string(),
            body: r#"{"errors":{"priority":"Field 'priority' is required"}}"#.to_string(),
        }));

        assert_eq!(error.kind(), "StoryCreationFailed");
        assert_eq!(
            error.to_string(),
            "Story creation failed: Jira API error [400]: priority: Field 'priority' is required"
        );
        assert!(error.response_body().unwrap().contains("priority"));
    }

    #[test]
    fn test_network_error_has_no_body() {
        let error = Error::Network("connection refused".to_string());

        assert_eq!(error.kind(), "Network");
        assert_eq!(error.response_body(), None);
    }
}
