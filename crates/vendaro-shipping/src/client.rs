// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the shipping carrier API.
//!
//! Every operation authenticates fresh via [`CarrierClient::authenticate`];
//! tokens are never cached across operations because the carrier gives no
//! reliable expiry signal. HTTP status codes are split into three failure
//! categories (authentication, permission, generic) so callers can render
//! materially different messages.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::debug;
use vendaro_core::VendaroError;

use crate::types::{
    AssignAwbRequest, AssignAwbResponse, AuthToken, CarrierErrorBody, CreateOrderResponse,
    CarrierOrderPayload, LoginRequest, LoginResponse, PickupAck, PickupRequest, PickupResponse,
    RateQuery, ServiceabilityData, ServiceabilityResponse,
};

/// HTTP client for carrier API communication.
#[derive(Debug, Clone)]
pub struct CarrierClient {
    http: reqwest::Client,
    base_url: String,
}

impl CarrierClient {
    /// Create a carrier client against `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, VendaroError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VendaroError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Perform a fresh login and return the token.
    ///
    /// Never reuses a previous token. Response mapping: 400/401 means the
    /// stored credentials were rejected; 403 means the carrier account lacks
    /// the required API plan tier; anything else is a generic carrier error.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, VendaroError> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        debug!(status = %status, "carrier login response");
        if status.is_success() {
            let login: LoginResponse = parse_body(response).await?;
            return Ok(AuthToken {
                value: login.token,
                obtained_at: Utc::now(),
            });
        }

        let message = error_message(response).await;
        match status.as_u16() {
            400 | 401 => Err(VendaroError::CarrierAuth { message }),
            403 => Err(VendaroError::CarrierPermission { message }),
            _ => Err(VendaroError::Carrier {
                message: format!("login returned {status}: {message}"),
                source: None,
            }),
        }
    }

    /// Query serviceable couriers for a route and package.
    pub async fn get_serviceability(
        &self,
        token: &AuthToken,
        query: &RateQuery,
    ) -> Result<ServiceabilityData, VendaroError> {
        let params = [
            ("pickup_postcode", query.pickup_postcode.clone()),
            ("delivery_postcode", query.delivery_postcode.clone()),
            ("cod", if query.cod { "1" } else { "0" }.to_string()),
            ("weight", query.weight_kg.to_string()),
            ("length", query.length_cm.to_string()),
            ("breadth", query.breadth_cm.to_string()),
            ("height", query.height_cm.to_string()),
            ("declared_value", query.declared_value.to_string()),
            ("mode", "Surface".to_string()),
            ("is_return", "0".to_string()),
        ];
        let response = self
            .http
            .get(format!("{}/courier/serviceability", self.base_url))
            .bearer_auth(&token.value)
            .query(&params)
            .send()
            .await
            .map_err(request_error)?;

        let body: ServiceabilityResponse = self.check(response, "serviceability").await?;
        Ok(body.data)
    }

    /// Create the carrier-side order. Returns the carrier's order and
    /// shipment identifiers.
    pub async fn create_order(
        &self,
        token: &AuthToken,
        payload: &CarrierOrderPayload,
    ) -> Result<CreateOrderResponse, VendaroError> {
        let response = self
            .http
            .post(format!("{}/orders/create", self.base_url))
            .bearer_auth(&token.value)
            .json(payload)
            .send()
            .await
            .map_err(request_error)?;
        self.check(response, "order creation").await
    }

    /// Assign an AWB (tracking number) for a shipment with a chosen courier.
    pub async fn assign_awb(
        &self,
        token: &AuthToken,
        shipment_id: i64,
        courier_id: i64,
    ) -> Result<AssignAwbResponse, VendaroError> {
        let response = self
            .http
            .post(format!("{}/courier/assign/awb", self.base_url))
            .bearer_auth(&token.value)
            .json(&AssignAwbRequest {
                shipment_id,
                courier_id,
            })
            .send()
            .await
            .map_err(request_error)?;
        self.check(response, "AWB assignment").await
    }

    /// Request pickup for a shipment.
    ///
    /// The carrier rejects a repeated request with "already in pickup queue";
    /// that is the desired end state, so it is reported as success rather
    /// than an error.
    pub async fn generate_pickup(
        &self,
        token: &AuthToken,
        shipment_id: i64,
    ) -> Result<PickupAck, VendaroError> {
        let response = self
            .http
            .post(format!("{}/courier/generate/pickup", self.base_url))
            .bearer_auth(&token.value)
            .json(&PickupRequest { shipment_id })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status.is_success() {
            let ack: PickupResponse = parse_body(response).await?;
            return Ok(PickupAck {
                already_queued: false,
                message: ack.message,
            });
        }

        let message = error_message(response).await;
        if message.to_lowercase().contains("already in pickup queue")
            || message.to_lowercase().contains("already queued")
        {
            debug!(shipment_id, "pickup already queued; treating as success");
            return Ok(PickupAck {
                already_queued: true,
                message: Some(message),
            });
        }
        Err(categorize(status, "pickup generation", message))
    }

    /// Map a non-login response into a parsed body or a categorized error.
    async fn check<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, VendaroError> {
        let status = response.status();
        debug!(status = %status, context, "carrier response");
        if status.is_success() {
            return parse_body(response).await;
        }
        let message = error_message(response).await;
        Err(categorize(status, context, message))
    }
}

/// Categorize a non-2xx carrier status. 403 is surfaced distinctly because
/// carrier accounts may lack plan-tier access to specific endpoints.
fn categorize(status: reqwest::StatusCode, context: &str, message: String) -> VendaroError {
    match status.as_u16() {
        401 => VendaroError::CarrierAuth { message },
        403 => VendaroError::CarrierPermission { message },
        _ => VendaroError::Carrier {
            message: format!("{context} returned {status}: {message}"),
            source: None,
        },
    }
}

fn request_error(e: reqwest::Error) -> VendaroError {
    VendaroError::Carrier {
        message: format!("carrier request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, VendaroError> {
    let body = response.text().await.map_err(|e| VendaroError::Carrier {
        message: format!("failed to read carrier response: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| VendaroError::Carrier {
        message: format!("failed to parse carrier response: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Extract the carrier's error message without leaking the raw payload.
async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<CarrierErrorBody>(&body) {
        Ok(err) if !err.message.is_empty() => err.message,
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> CarrierClient {
        CarrierClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn token() -> AuthToken {
        AuthToken {
            value: "tok-1".into(),
            obtained_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn authenticate_returns_fresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_partial_json(serde_json::json!({"email": "ops@vendaro.example"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-9"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server);
        let first = client.authenticate("ops@vendaro.example", "pw").await.unwrap();
        // A second call performs a fresh login rather than reusing the token.
        let second = client.authenticate("ops@vendaro.example", "pw").await.unwrap();
        assert_eq!(first.value, "tok-9");
        assert_eq!(second.value, "tok-9");
    }

    #[tokio::test]
    async fn authenticate_splits_failure_categories() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                serde_json::json!({"message": "bad credentials"}),
            ))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(403).set_body_json(
                serde_json::json!({"message": "plan does not include API access"}),
            ))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client(&server);

        let auth = client.authenticate("e", "p").await.unwrap_err();
        assert_eq!(auth.code(), "CARRIER_AUTH");
        assert!(auth.to_string().contains("bad credentials"));

        let perm = client.authenticate("e", "p").await.unwrap_err();
        assert_eq!(perm.code(), "CARRIER_PERMISSION");

        let generic = client.authenticate("e", "p").await.unwrap_err();
        assert_eq!(generic.code(), "CARRIER");
    }

    #[tokio::test]
    async fn serviceability_sends_route_and_package_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/courier/serviceability"))
            .and(query_param("pickup_postcode", "411014"))
            .and(query_param("delivery_postcode", "411001"))
            .and(query_param("cod", "0"))
            .and(query_param("weight", "0.8"))
            .and(query_param("mode", "Surface"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "available_courier_companies": [
                        {"courier_company_id": 24, "courier_name": "BlueDart Surface", "rate": 91.0}
                    ],
                    "recommended_courier_company_id": 24
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let data = client
            .get_serviceability(
                &token(),
                &RateQuery {
                    pickup_postcode: "411014".into(),
                    delivery_postcode: "411001".into(),
                    cod: false,
                    weight_kg: 0.8,
                    length_cm: 12.0,
                    breadth_cm: 10.0,
                    height_cm: 10.0,
                    declared_value: 1198.0,
                },
            )
            .await
            .unwrap();
        assert_eq!(data.available_courier_companies.len(), 1);
        assert_eq!(data.recommended_courier_company_id, Some(24));
    }

    #[tokio::test]
    async fn permission_error_on_awb_is_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/courier/assign/awb"))
            .respond_with(ResponseTemplate::new(403).set_body_json(
                serde_json::json!({"message": "AWB assignment requires a paid plan"}),
            ))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.assign_awb(&token(), 2001, 24).await.unwrap_err();
        assert_eq!(err.code(), "CARRIER_PERMISSION");
        assert!(err.to_string().contains("paid plan"));
    }

    #[tokio::test]
    async fn pickup_already_queued_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/courier/generate/pickup"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"message": "Shipment is Already in Pickup Queue"}),
            ))
            .mount(&server)
            .await;

        let client = client(&server);
        let ack = client.generate_pickup(&token(), 2001).await.unwrap();
        assert!(ack.already_queued);
    }

    #[tokio::test]
    async fn pickup_other_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/courier/generate/pickup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(
                serde_json::json!({"message": "pickup address not serviceable"}),
            ))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.generate_pickup(&token(), 2001).await.unwrap_err();
        assert_eq!(err.code(), "CARRIER");
        assert!(err.to_string().contains("not serviceable"));
    }
}
