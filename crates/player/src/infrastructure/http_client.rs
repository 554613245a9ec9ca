//! REST client for the room server

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use rookline_domain::RoomId;
use rookline_shared::{
    BoardSnapshot, CreateRoomResponse, HealthResponse, JoinRoomRequest, JoinRoomResponse,
};

use crate::infrastructure::config::BackendConfig;
use crate::ports::outbound::{ApiError, RoomApiPort};

/// `RoomApiPort` over reqwest.
///
/// Requests carry no client-side timeout; a hung fetch only delays its own result.
#[derive(Clone)]
pub struct RoomApiAdapter {
    client: Client,
    config: BackendConfig,
}

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl RoomApiAdapter {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, ApiError> {
        self.config
            .api_url(segments)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        parse_response(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&JoinRoomRequest>,
    ) -> Result<T, ApiError> {
        tracing::debug!("POST {}", url);
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        return Err(ApiError::ServerError {
            status: status.as_u16(),
            message: error_message(&error_text),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::ParseError(e.to_string()))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl RoomApiPort for RoomApiAdapter {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(self.url(["health"])?).await
    }

    async fn create_room(&self) -> Result<CreateRoomResponse, ApiError> {
        self.post_json(self.url(["rooms"])?, None).await
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        request: &JoinRoomRequest,
    ) -> Result<JoinRoomResponse, ApiError> {
        self.post_json(self.url(["rooms", room_id.as_str(), "join"])?, Some(request))
            .await
    }

    async fn fetch_board(&self, room_id: &RoomId) -> Result<BoardSnapshot, ApiError> {
        self.get_json(self.url(["rooms", room_id.as_str(), "board"])?)
            .await
    }
}
