//! Todoist REST v2 API client.

use crate::error::{Error, Result};
use crate::settings::{SettingKey, SettingsStore};
use crate::types::{TodoistItem, TodoistProject};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

const TODOIST_API_URL: &str = "https://api.todoist.com/rest/v2";

/// Filter used by `get_tasks` when the user has not stored one.
pub const DEFAULT_FILTER: &str = "(today | overdue) & !assigned to: others";

/// Stateless client for the three operations the dashboard needs.
///
/// The API token is read from the settings store on every call rather than
/// held by the client, so a token edit takes effect on the next request.
pub struct TodoistClient {
    http: Client,
    base_url: String,
    settings: Arc<dyn SettingsStore>,
}

impl TodoistClient {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self::with_base_url(settings, TODOIST_API_URL)
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(settings: Arc<dyn SettingsStore>, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
        }
    }

    /// Fetch the tasks matching the user's filter expression.
    ///
    /// A 204 from the service yields an empty list, not an error.
    pub async fn get_tasks(&self) -> Result<Vec<TodoistItem>> {
        let token = self.token()?;
        let filter = self.filter_query();
        tracing::debug!("fetching tasks with filter {:?}", filter);

        let response = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .query(&[("filter", filter.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(decode_body(status, &body)?.unwrap_or_default())
    }

    /// Fetch every project visible to the token.
    pub async fn get_projects(&self) -> Result<Vec<TodoistProject>> {
        let token = self.token()?;

        let response = self
            .http
            .get(format!("{}/projects", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(decode_body(status, &body)?.unwrap_or_default())
    }

    /// Mark a task as done.
    ///
    /// The service answers a close with no content, so callers get an empty
    /// JSON object rather than a missing value.
    pub async fn close_task(&self, task_id: &str) -> Result<serde_json::Value> {
        let token = self.token()?;
        tracing::debug!("closing task {}", task_id);

        let response = self
            .http
            .post(format!("{}/tasks/{}/close", self.base_url, task_id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(decode_body(status, &body)?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())))
    }

    /// The filter expression sent with `get_tasks`.
    pub fn filter_query(&self) -> String {
        self.settings
            .get(SettingKey::Filter)
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }

    fn token(&self) -> Result<String> {
        self.settings
            .get(SettingKey::ApiToken)
            .filter(|token| !token.trim().is_empty())
            .ok_or(Error::MissingToken)
    }
}

/// Map a response to the shared contract: 200 decodes, 204 is "no data",
/// everything else is an error carrying the status text.
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Option<T>> {
    match status {
        StatusCode::OK => serde_json::from_str(body)
            .map(Some)
            .map_err(Error::ResponseShape),
        StatusCode::NO_CONTENT => Ok(None),
        other => Err(Error::Api(
            other
                .canonical_reason()
                .unwrap_or_else(|| other.as_str())
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    use serde_json::{json, Value};

    fn client_with(settings: MemorySettings) -> TodoistClient {
        TodoistClient::new(Arc::new(settings))
    }

    #[test]
    fn ok_body_decodes_unchanged() {
        let body = json!([{"id": "1", "project_id": "2", "section_id": null,
            "content": "x", "parent_id": null, "due": null,
            "assignee_id": null, "assigner_id": null}]);
        let decoded: Option<Value> = decode_body(StatusCode::OK, &body.to_string()).unwrap();
        assert_eq!(decoded, Some(body));
    }

    #[test]
    fn no_content_decodes_to_no_data() {
        let decoded: Option<Value> = decode_body(StatusCode::NO_CONTENT, "").unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn other_statuses_carry_the_status_text() {
        let result: Result<Option<Value>> = decode_body(StatusCode::NOT_FOUND, "");
        assert_eq!(result.unwrap_err().to_string(), "Not Found");

        let result: Result<Option<Value>> = decode_body(StatusCode::FORBIDDEN, "ignored");
        assert_eq!(result.unwrap_err().to_string(), "Forbidden");
    }

    #[test]
    fn malformed_ok_body_is_a_shape_error() {
        let result: Result<Option<Vec<TodoistItem>>> = decode_body(StatusCode::OK, "{not json");
        assert!(matches!(result, Err(Error::ResponseShape(_))));
    }

    #[test]
    fn filter_defaults_when_unset_or_blank() {
        let client = client_with(MemorySettings::new());
        assert_eq!(client.filter_query(), DEFAULT_FILTER);

        let client = client_with(MemorySettings::with(SettingKey::Filter, "   "));
        assert_eq!(client.filter_query(), DEFAULT_FILTER);
    }

    #[test]
    fn stored_filter_overrides_the_default() {
        let client = client_with(MemorySettings::with(SettingKey::Filter, "p1"));
        assert_eq!(client.filter_query(), "p1");
    }

    #[tokio::test]
    async fn operations_fail_fast_without_a_token() {
        let client = client_with(MemorySettings::new());

        assert!(matches!(client.get_tasks().await, Err(Error::MissingToken)));
        assert!(matches!(
            client.get_projects().await,
            Err(Error::MissingToken)
        ));
        assert!(matches!(
            client.close_task("1").await,
            Err(Error::MissingToken)
        ));
    }

    #[tokio::test]
    async fn a_blank_token_counts_as_missing() {
        let client = client_with(MemorySettings::with(SettingKey::ApiToken, "  "));
        assert!(matches!(client.get_tasks().await, Err(Error::MissingToken)));
    }
}
