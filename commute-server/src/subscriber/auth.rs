//! Cognito token and identity exchange.
//!
//! Two unauthenticated `x-amz-json-1.1` operations: the long-lived refresh
//! token buys a short-lived id token from the user pool, and the id token
//! buys a federated identity id from the identity pool.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::config::Config;

use super::error::SubscriberError;

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const GET_ID: &str = "AWSCognitoIdentityService.GetId";

/// Client for the Cognito user-pool and identity-pool endpoints.
#[derive(Debug, Clone)]
pub struct CognitoClient {
    http: reqwest::Client,
    region: String,
    user_pool_id: String,
    user_pool_client_id: String,
    identity_pool_id: String,
}

impl CognitoClient {
    /// Create a new client from the process configuration.
    pub fn new(config: &Config) -> Result<Self, SubscriberError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            region: config.region.clone(),
            user_pool_id: config.user_pool_id.clone(),
            user_pool_client_id: config.user_pool_client_id.clone(),
            identity_pool_id: config.identity_pool_id.clone(),
        })
    }

    /// Exchange the refresh token for a short-lived id token.
    pub async fn fetch_id_token(&self, refresh_token: &str) -> Result<String, SubscriberError> {
        let url = format!("https://cognito-idp.{}.amazonaws.com/", self.region);
        let body = json!({
            "AuthFlow": "REFRESH_TOKEN_AUTH",
            "AuthParameters": { "REFRESH_TOKEN": refresh_token },
            "ClientId": self.user_pool_client_id,
        });

        let response = self.post_target(&url, INITIATE_AUTH, &body).await?;
        extract_id_token(&response)
    }

    /// Exchange an id token for the federated identity id.
    pub async fn fetch_identity_id(&self, id_token: &str) -> Result<String, SubscriberError> {
        let url = format!("https://cognito-identity.{}.amazonaws.com/", self.region);
        let logins = HashMap::from([(self.login_key(), id_token)]);
        let body = json!({
            "IdentityPoolId": self.identity_pool_id,
            "Logins": logins,
        });

        let response = self.post_target(&url, GET_ID, &body).await?;
        extract_identity_id(&response)
    }

    /// Login map key naming the user pool as the identity provider.
    fn login_key(&self) -> String {
        format!(
            "cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    async fn post_target(
        &self,
        url: &str,
        target: &str,
        body: &Value,
    ) -> Result<Value, SubscriberError> {
        let response = self
            .http
            .post(url)
            .header("Content-Type", AMZ_JSON)
            .header("X-Amz-Target", target)
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SubscriberError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SubscriberError::AuthDecode(e.to_string()))
    }
}

fn extract_id_token(response: &Value) -> Result<String, SubscriberError> {
    response
        .pointer("/AuthenticationResult/IdToken")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SubscriberError::AuthDecode("missing AuthenticationResult.IdToken".to_string())
        })
}

fn extract_identity_id(response: &Value) -> Result<String, SubscriberError> {
    response
        .get("IdentityId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SubscriberError::AuthDecode("missing IdentityId".to_string()))
}
