use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::auth::TokenSource;
use crate::core::errors::ServiceError;

/// Authorized JSON POST with a typed response body.
pub async fn post_json<B, R>(
    client: &Client,
    tokens: &dyn TokenSource,
    service: &'static str,
    url: &str,
    body: &B,
) -> Result<R, ServiceError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let token = tokens.access_token().await?;
    let res = client
        .post(url)
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .map_err(ServiceError::transport(service))?;

    if !res.status().is_success() {
        return Err(status_error(service, res).await);
    }

    let text = res.text().await.map_err(ServiceError::transport(service))?;
    serde_json::from_str(&text).map_err(|e| ServiceError::decode(service, e.to_string()))
}

/// Reads the response body for an error report, keeping it short enough for a log line.
pub(crate) async fn status_error(
    service: &'static str,
    response: reqwest::Response,
) -> ServiceError {
    const MAX_BODY: usize = 512;

    let status = response.status();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_BODY {
        let mut cut = MAX_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    if body.trim().is_empty() {
        body = status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    ServiceError::Status {
        service,
        status,
        body,
    }
}
