use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::configuration::{SubscriptionServiceKind, SubscriptionServiceSettings};
use crate::domain::SubscriberEmail;

#[derive(thiserror::Error, Debug)]
pub enum SubscriptionServiceError {
    #[error("subscription service rejected the request with status {0}")]
    Rejected(reqwest::StatusCode),

    #[error("failed to reach the subscription service")]
    Transport(#[from] reqwest::Error),
}

/// The external service that actually records a newsletter subscription.
///
/// Retries, if any, are the implementation's concern: callers make a
/// single attempt and surface the error.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), SubscriptionServiceError>;
}

/// Accepts every address after a fixed delay.
pub struct SimulatedSubscriptionService {
    latency: Duration,
}

impl SimulatedSubscriptionService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SubscriptionService for SimulatedSubscriptionService {
    #[tracing::instrument(name = "simulated subscribe", skip(self))]
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), SubscriptionServiceError> {
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

pub struct HttpSubscriptionClient {
    http_client: Client,
    base_url: String,
    authorization_token: Secret<String>,
}

impl HttpSubscriptionClient {
    pub fn new(
        base_url: String,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            authorization_token,
        })
    }
}

#[derive(serde::Serialize)]
struct SubscribeRequest<'a> {
    email: &'a str,
}

#[async_trait]
impl SubscriptionService for HttpSubscriptionClient {
    #[tracing::instrument(name = "http subscribe", skip(self), fields(base_url = %self.base_url))]
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), SubscriptionServiceError> {
        let url = format!("{}/subscriptions", self.base_url);
        let request_body = SubscribeRequest {
            email: email.as_ref(),
        };

        let response = self
            .http_client
            .post(&url)
            .header(
                "X-Subscription-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubscriptionServiceError::Rejected(status));
        }

        Ok(())
    }
}

/// Build the collaborator selected by the configuration.
pub fn build_subscription_service(
    settings: &SubscriptionServiceSettings,
) -> Result<Box<dyn SubscriptionService>, reqwest::Error> {
    let service: Box<dyn SubscriptionService> = match settings.kind {
        SubscriptionServiceKind::Simulated => Box::new(
            SimulatedSubscriptionService::new(settings.simulated_latency()),
        ),
        SubscriptionServiceKind::Http => Box::new(HttpSubscriptionClient::new(
            settings.base_url.clone(),
            settings.authorization_token.clone(),
            settings.timeout(),
        )?),
    };

    Ok(service)
}
