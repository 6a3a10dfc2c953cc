//! HTTP client for the ideas API, used by the view flow and by scripts that
//! drive a running server.

use serde::Deserialize;
use thiserror::Error;

use crate::flow::IdeasApi;
use crate::types::{Idea, PickedIdeas};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// Extract the API's `{"error": ...}` message from a failed response.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("Request failed with status {status}"),
        };
        Err(ClientError::Api(message))
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        Self::check(self.http.get(self.url("/health")).send().await?).await?;
        Ok(())
    }

    pub async fn get_all_ideas(&self) -> Result<Vec<Idea>, ClientError> {
        let response = Self::check(self.http.get(self.url("/ideas")).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn pick_three_ideas(&self) -> Result<Vec<Idea>, ClientError> {
        let response = Self::check(self.http.get(self.url("/ideas/pick")).send().await?).await?;
        let picked: PickedIdeas = response.json().await?;
        Ok(picked.ideas)
    }

    pub async fn select_idea(&self, id: &str) -> Result<Idea, ClientError> {
        let response = Self::check(
            self.http
                .post(self.url(&format!("/ideas/{id}/select")))
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    pub async fn create_idea(&self, text: &str) -> Result<Idea, ClientError> {
        let response = Self::check(
            self.http
                .post(self.url("/ideas"))
                .json(&serde_json::json!({ "idea": text }))
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    pub async fn update_idea(&self, id: &str, text: &str) -> Result<Idea, ClientError> {
        let response = Self::check(
            self.http
                .put(self.url(&format!("/ideas/{id}")))
                .json(&serde_json::json!({ "idea": text }))
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    pub async fn delete_idea(&self, id: &str) -> Result<(), ClientError> {
        Self::check(
            self.http
                .delete(self.url(&format!("/ideas/{id}")))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    pub async fn reset(&self) -> Result<(), ClientError> {
        Self::check(self.http.post(self.url("/ideas/reset")).send().await?).await?;
        Ok(())
    }
}

impl IdeasApi for ApiClient {
    async fn pick_three(&self) -> Result<Vec<Idea>, String> {
        self.pick_three_ideas().await.map_err(|e| e.to_string())
    }

    async fn select(&self, id: &str) -> Result<Idea, String> {
        self.select_idea(id).await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3000///");
        assert_eq!(client.url("/ideas/pick"), "http://localhost:3000/api/ideas/pick");
    }
}
