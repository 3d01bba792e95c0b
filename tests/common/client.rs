//! HTTP client for end-to-end tests
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// HTTP test client wrapping reqwest
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// GET /users
    pub async fn get_users(&self) -> Response {
        self.client
            .get(format!("{}/users", self.base_url))
            .send()
            .await
            .expect("List users request failed")
    }

    /// POST /users
    pub async fn post_user(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/users", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Register user request failed")
    }

    /// GET /users/{email}
    pub async fn get_user(&self, email: &str) -> Response {
        self.client
            .get(format!("{}/users/{}", self.base_url, email))
            .send()
            .await
            .expect("Get user request failed")
    }

    /// PUT /users/{email}
    pub async fn put_user(&self, email: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}/users/{}", self.base_url, email))
            .json(body)
            .send()
            .await
            .expect("Update user request failed")
    }

    /// DELETE /users/{email}
    pub async fn delete_user(&self, email: &str) -> Response {
        self.client
            .delete(format!("{}/users/{}", self.base_url, email))
            .send()
            .await
            .expect("Delete user request failed")
    }

    /// GET /users/events/{email}
    pub async fn get_user_events(&self, email: &str) -> Response {
        self.client
            .get(format!("{}/users/events/{}", self.base_url, email))
            .send()
            .await
            .expect("Get user events request failed")
    }

    /// POST /users/events/{email}
    pub async fn post_user_event(&self, email: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}/users/events/{}", self.base_url, email))
            .json(body)
            .send()
            .await
            .expect("Register event request failed")
    }

    /// GET /skills with an optional query string (e.g. "min_frequency=2")
    pub async fn get_skills(&self, query: &str) -> Response {
        let url = if query.is_empty() {
            format!("{}/skills", self.base_url)
        } else {
            format!("{}/skills?{}", self.base_url, query)
        };
        self.client
            .get(url)
            .send()
            .await
            .expect("Skills frequency request failed")
    }

    /// GET /events with an optional query string (e.g. "category=Workshop")
    pub async fn get_events(&self, query: &str) -> Response {
        let url = if query.is_empty() {
            format!("{}/events", self.base_url)
        } else {
            format!("{}/events?{}", self.base_url, query)
        };
        self.client
            .get(url)
            .send()
            .await
            .expect("Events frequency request failed")
    }
}
