//! Transport to the transaction backend.

use std::thread;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::GatewayError;
use crate::model::CustomerId;

use super::envelope::{ProcessCode, TransactionRequest, TransactionResponse};

/// The logged-in identity, read from the session store at startup.
/// Every backend call is scoped by it; the portal never mutates it.
#[derive(Debug, Clone)]
pub struct Session {
    pub customer: CustomerId,
    pub token: String,
}

/// Request/response access to the transaction backend.
///
/// The one seam the whole portal talks through; tests substitute a
/// scripted implementation.
pub trait Gateway: Send {
    fn call(
        &self,
        code: ProcessCode,
        fields: Map<String, Value>,
    ) -> Result<Value, GatewayError>;

    fn session(&self) -> &Session;
}

/// Extra attempts after the first for pure transport failures.
const TRANSPORT_RETRIES: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Blocking HTTP implementation over the single backend endpoint.
pub struct HttpGateway {
    endpoint: String,
    session: Session,
    client: reqwest::blocking::Client,
}

impl HttpGateway {
    pub fn new(
        endpoint: impl Into<String>,
        session: Session,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            session,
            client,
        })
    }

    fn call_once(
        &self,
        code: ProcessCode,
        fields: &Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        let request = TransactionRequest {
            process_code: code.code(),
            token: self.session.token.clone(),
            customer_id: self.session.customer.0.clone(),
            fields: fields.clone(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let envelope: TransactionResponse = response
            .json()
            .map_err(|e| GatewayError::malformed(e.to_string()))?;
        envelope.into_result()
    }
}

impl Gateway for HttpGateway {
    fn call(
        &self,
        code: ProcessCode,
        fields: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        let mut attempt = 0;
        loop {
            tracing::debug!(operation = code.name(), attempt, "calling transaction service");
            match self.call_once(code, &fields) {
                Ok(data) => return Ok(data),
                Err(err) if err.is_retryable() && attempt < TRANSPORT_RETRIES => {
                    attempt += 1;
                    tracing::warn!(
                        operation = code.name(),
                        attempt,
                        error = %err,
                        "transport failure, retrying"
                    );
                    thread::sleep(RETRY_DELAY);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
