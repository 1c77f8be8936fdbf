//! Identity-provider webhook endpoint.
//!
//! ```text
//! POST /api/v1/webhooks/identity
//! ```
//!
//! The raw body is authenticated before it is decoded. Both the `svix-*` and
//! the Standard Webhooks `webhook-*` header names are accepted.

use actix_web::{HttpRequest, post, web};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::{Error, IdentityEvent, WebhookHeaders, verify_webhook_signature};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Response payload for an accepted delivery.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponseBody {
    pub success: bool,
    #[schema(example = "User created")]
    pub message: String,
}

fn header(req: &HttpRequest, names: [&str; 2]) -> Option<String> {
    names.into_iter().find_map(|name| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    })
}

fn webhook_headers(req: &HttpRequest) -> WebhookHeaders {
    WebhookHeaders {
        id: header(req, ["svix-id", "webhook-id"]),
        timestamp: header(req, ["svix-timestamp", "webhook-timestamp"]),
        signature: header(req, ["svix-signature", "webhook-signature"]),
    }
}

/// Receive a signed user lifecycle event.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/identity",
    request_body(content = serde_json::Value, description = "Provider event envelope `{type, data}`"),
    params(
        ("svix-id" = String, Header, description = "Delivery id"),
        ("svix-timestamp" = String, Header, description = "Unix timestamp of the delivery"),
        ("svix-signature" = String, Header, description = "Space-separated `v1,<base64>` signatures")
    ),
    responses(
        (status = 200, description = "Event processed", body = WebhookResponseBody),
        (status = 400, description = "Missing headers, bad signature or malformed event", body = ErrorSchema),
        (status = 500, description = "Webhook secret not configured", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "identityWebhook",
    security([])
)]
#[post("/webhooks/identity")]
pub async fn identity_webhook(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<WebhookResponseBody>> {
    let secret = state
        .webhook_secret
        .as_ref()
        .ok_or_else(|| Error::internal("identity webhook secret is not configured"))?;

    let headers = webhook_headers(&req);
    verify_webhook_signature(secret, &headers, &body, state.clock.utc()).map_err(|err| {
        warn!(delivery_id = headers.id.as_deref(), error = %err, "webhook verification failed");
        Error::invalid_request("Webhook verification failed")
            .with_details(json!({ "reason": err.to_string() }))
    })?;

    let event = IdentityEvent::from_slice(&body).map_err(|err| {
        Error::invalid_request("Malformed webhook event")
            .with_details(json!({ "reason": err.to_string() }))
    })?;
    info!(
        delivery_id = headers.id.as_deref(),
        event_type = event.event_type(),
        "identity webhook received"
    );

    let outcome = state.identity_sync.handle(event).await?;
    Ok(web::Json(WebhookResponseBody {
        success: true,
        message: outcome.message().to_owned(),
    }))
}

#[cfg(test)]
#[path = "webhooks_tests.rs"]
mod tests;
