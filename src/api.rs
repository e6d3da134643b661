//! Client for the channel management REST API.
//!
//! The backend is an opaque JSON-over-HTTP collaborator exposing
//! `GET/POST /api/channels` and `GET/PUT/DELETE /api/channels/{id}`. Every
//! request carries the API key in the `X-API-Key` header.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::guide::Channel;

/// Error payload the backend returns for 4xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
  error: String,
}

#[derive(Clone)]
pub struct ApiClient {
  http: Client,
  base_url: String,
  api_key: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self { http: Client::new(), base_url: base_url.into().trim_end_matches('/').to_string(), api_key: api_key.into() }
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.http.request(method, format!("{}{}", self.base_url, path)).header("X-API-Key", &self.api_key)
  }

  pub async fn list_channels(&self) -> Result<Vec<Channel>> {
    let response = self.request(Method::GET, "/api/channels").send().await.context("Failed to reach channel API")?;
    let response = check_status(response).await?;
    let channels: Vec<Channel> = response.json().await.context("Failed to parse channel list")?;
    debug!(count = channels.len(), "fetched channel list");
    Ok(channels)
  }

  pub async fn get_channel(&self, id: &str) -> Result<Channel> {
    let response = self
      .request(Method::GET, &format!("/api/channels/{}", id))
      .send()
      .await
      .context("Failed to reach channel API")?;
    let response = check_status(response).await?;
    response.json().await.context("Failed to parse channel")
  }

  /// Create a channel. The server assigns `id` (and `stationId` when absent)
  /// and echoes the stored record back.
  pub async fn create_channel(&self, channel: &Channel) -> Result<Channel> {
    let response = self
      .request(Method::POST, "/api/channels")
      .json(channel)
      .send()
      .await
      .context("Failed to reach channel API")?;
    let response = check_status(response).await?;
    response.json().await.context("Failed to parse created channel")
  }

  pub async fn update_channel(&self, id: &str, channel: &Channel) -> Result<Channel> {
    let response = self
      .request(Method::PUT, &format!("/api/channels/{}", id))
      .json(channel)
      .send()
      .await
      .context("Failed to reach channel API")?;
    let response = check_status(response).await?;
    response.json().await.context("Failed to parse updated channel")
  }

  pub async fn delete_channel(&self, id: &str) -> Result<()> {
    let response = self
      .request(Method::DELETE, &format!("/api/channels/{}", id))
      .send()
      .await
      .context("Failed to reach channel API")?;
    check_status(response).await?;
    Ok(())
  }
}

/// Map non-success statuses to user-facing errors, preferring the server's
/// own message when the body carries one.
async fn check_status(response: Response) -> Result<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let server_message = response.json::<ApiError>().await.ok().map(|e| e.error);
  Err(match status {
    StatusCode::UNAUTHORIZED => anyhow!("Unauthorized: API key is missing or invalid"),
    StatusCode::NOT_FOUND => anyhow!(server_message.unwrap_or_else(|| "Channel not found".to_string())),
    StatusCode::BAD_REQUEST => anyhow!(server_message.unwrap_or_else(|| "Invalid channel data".to_string())),
    other => anyhow!("Server error ({})", other.as_u16()),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::guide::DisplayOption;
  use wiremock::matchers::{body_partial_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn channel_json() -> serde_json::Value {
    serde_json::json!({
      "id": "1",
      "stationId": 201,
      "name": "News 24",
      "displayOption": "new",
      "youtubeLinks": ["https://www.youtube.com/@news"]
    })
  }

  #[tokio::test]
  async fn list_channels_sends_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/channels"))
      .and(header("X-API-Key", "secret"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([channel_json()])))
      .expect(1)
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "secret");
    let channels = client.list_channels().await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].name, "News 24");
    assert_eq!(channels[0].station_id, 201);
  }

  #[tokio::test]
  async fn get_channel_hits_the_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/channels/1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "");
    let channel = client.get_channel("1").await.unwrap();
    assert_eq!(channel.id, "1");
  }

  #[tokio::test]
  async fn create_posts_the_record_and_returns_the_stored_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/api/channels"))
      .and(body_partial_json(serde_json::json!({ "name": "News 24", "stationId": 201 })))
      .respond_with(ResponseTemplate::new(201).set_body_json(channel_json()))
      .expect(1)
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "secret");
    let channel = Channel {
      id: String::new(),
      station_id: 201,
      name: "News 24".to_string(),
      display_option: DisplayOption::New,
      youtube_links: vec!["https://www.youtube.com/@news".to_string()],
    };
    let created = client.create_channel(&channel).await.unwrap();
    assert_eq!(created.id, "1");
  }

  #[tokio::test]
  async fn update_puts_to_the_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
      .and(path("/api/channels/1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
      .expect(1)
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "secret");
    let channel: Channel = serde_json::from_value(channel_json()).unwrap();
    let updated = client.update_channel("1", &channel).await.unwrap();
    assert_eq!(updated.station_id, 201);
  }

  #[tokio::test]
  async fn delete_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/api/channels/1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
      .expect(1)
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "secret");
    client.delete_channel("1").await.unwrap();
  }

  #[tokio::test]
  async fn unauthorized_maps_to_a_clear_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/channels"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "");
    let err = client.list_channels().await.unwrap_err();
    assert!(err.to_string().contains("Unauthorized"));
  }

  #[tokio::test]
  async fn not_found_prefers_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/api/channels/99"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({ "error": "Channel not found" })))
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "secret");
    let err = client.delete_channel("99").await.unwrap_err();
    assert_eq!(err.to_string(), "Channel not found");
  }

  #[tokio::test]
  async fn bad_request_surfaces_validation_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/api/channels"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({ "error": "stationId taken" })))
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "secret");
    let channel: Channel = serde_json::from_value(channel_json()).unwrap();
    let err = client.create_channel(&channel).await.unwrap_err();
    assert_eq!(err.to_string(), "stationId taken");
  }

  #[tokio::test]
  async fn other_statuses_report_the_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/channels"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let client = ApiClient::new(server.uri(), "");
    let err = client.list_channels().await.unwrap_err();
    assert!(err.to_string().contains("500"));
  }
}
