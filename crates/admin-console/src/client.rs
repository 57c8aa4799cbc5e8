//! HTTP client for the membership REST API
//!
//! A non-2xx response becomes [`ClientError::Api`] carrying the server's
//! `message`, or the status text when the body has none.

use async_trait::async_trait;
use mb_core::health::HealthApplication;
use mb_core::member::Member;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::api::MembershipApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

#[derive(Serialize)]
struct FundRequest {
    amount: i64,
}

/// HTTP implementation of [`MembershipApi`]
pub struct HttpMembershipClient {
    client: Client,
    base_url: String,
}

impl HttpMembershipClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, id: &str) -> String {
        format!("{}{}{}", self.base_url, path, urlencoding::encode(id))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), error_message(status, &body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Pull `message` out of an error body, or fall back to the status text
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[async_trait]
impl MembershipApi for HttpMembershipClient {
    async fn list_members(&self) -> Result<Vec<Member>> {
        let url = format!("{}/api/membership/", self.base_url);
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn get_member(&self, id: Uuid) -> Result<Member> {
        let url = self.url("/api/membership/id/", &id.to_string());
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn update_member(&self, id: Uuid, fields: Map<String, Value>) -> Result<Member> {
        let url = self.url("/api/membership/update/id/", &id.to_string());
        debug!("PUT {}", url);
        self.send(self.client.put(url).json(&fields)).await
    }

    async fn delete_member(&self, id: Uuid) -> Result<()> {
        let url = self.url("/api/membership/delete/", &id.to_string());
        debug!("DELETE {}", url);
        let _: Value = self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn fund_member(&self, member_id: &str, amount: i64) -> Result<Member> {
        let url = self.url("/api/membership/fund/", member_id);
        debug!("PUT {} amount={}", url, amount);
        self.send(self.client.put(url).json(&FundRequest { amount }))
            .await
    }

    async fn get_health_application(&self, id: Uuid) -> Result<HealthApplication> {
        let url = self.url("/api/health/id/", &id.to_string());
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn list_member_health_applications(
        &self,
        member: Uuid,
    ) -> Result<Vec<HealthApplication>> {
        let url = self.url("/api/health/member/", &member.to_string());
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn link_health_application(&self, id: Uuid) -> Result<HealthApplication> {
        let url = self.url("/api/health/link/", &id.to_string());
        debug!("PUT {}", url);
        self.send(self.client.put(url)).await
    }
}
