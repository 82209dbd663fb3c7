//! HTTP client for the list server.
//!
//! Endpoints live under the API root (default `http://localhost:8000/api`):
//! `GET|POST|PUT|DELETE /todo` with a bearer token, and `GET /list` to
//! create a new list.

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::io::service::{ListService, ServiceError};
use crate::model::session::SessionToken;
use crate::model::todo::{Direction, NewTodo, Todo, TodoId};

/// [`ListService`] backed by the list server's HTTP API.
#[derive(Clone)]
pub struct HttpListService {
    client: Client,
    base_url: String,
    token: SessionToken,
}

/// PUT body of a move request: the todo plus the step direction.
#[derive(Serialize)]
struct MoveBody<'a> {
    #[serde(flatten)]
    todo: &'a Todo,
    #[serde(rename = "upOrDown")]
    up_or_down: i8,
}

impl HttpListService {
    pub fn new(base_url: impl Into<String>, token: SessionToken) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: SessionToken) -> Self {
        HttpListService {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Create a new, empty list on the server and return its token.
    pub async fn create_list(client: &Client, base_url: &str) -> Result<SessionToken, ServiceError> {
        let url = endpoint(base_url, "list");
        debug!(%url, "creating list");
        let response = client.get(&url).send().await.map_err(transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(transport)?;
        let token = SessionToken::parse(body.trim().trim_matches('"'))
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        info!("created list");
        Ok(token)
    }

    /// Whether the server accepts this token (it answers `GET /todo` with 2xx).
    pub async fn validate(&self) -> Result<bool, ServiceError> {
        let response = self
            .client
            .get(self.url("todo"))
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        debug!(%status, "validated list token");
        Ok(status.is_success())
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    async fn send_for_todo(&self, request: reqwest::RequestBuilder) -> Result<Todo, ServiceError> {
        let response = request
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(transport)?;
        decode_optional::<Todo>(&body)?.ok_or(ServiceError::EmptyResponse)
    }
}

impl ListService for HttpListService {
    async fn fetch_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        debug!("GET /todo");
        let response = self
            .client
            .get(self.url("todo"))
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(transport)?;
        let todos = decode_optional::<Vec<Todo>>(&body)?.unwrap_or_default();
        debug!(count = todos.len(), "fetched todos");
        Ok(todos)
    }

    async fn create_todo(&self, new_todo: &NewTodo) -> Result<Todo, ServiceError> {
        debug!(name = %new_todo.name, "POST /todo");
        self.send_for_todo(self.client.post(self.url("todo")).json(new_todo))
            .await
    }

    async fn update_todo(&self, todo: &Todo) -> Result<Todo, ServiceError> {
        debug!(id = %todo.id, "PUT /todo");
        self.send_for_todo(self.client.put(self.url("todo")).json(todo))
            .await
    }

    async fn move_todo(&self, todo: &Todo, direction: Direction) -> Result<Todo, ServiceError> {
        debug!(id = %todo.id, %direction, "PUT /todo (move)");
        let body = MoveBody {
            todo,
            up_or_down: direction.wire_value(),
        };
        self.send_for_todo(self.client.put(self.url("todo")).json(&body))
            .await
    }

    async fn delete_todo(&self, id: &TodoId) -> Result<(), ServiceError> {
        debug!(%id, "DELETE /todo");
        let response = self
            .client
            .delete(self.url("todo"))
            .query(&[("id", id.to_string())])
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Decode a JSON body where an empty body or `null` means "nothing".
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ServiceError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

/// Turn non-2xx answers into errors; 403 means the token is unknown.
async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default().trim().to_string();
    warn!(%status, %message, "list server rejected request");
    match status {
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(ServiceError::Unauthorized),
        status => Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        }),
    }
}
