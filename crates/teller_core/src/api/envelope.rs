//! The single-endpoint transaction envelope.
//!
//! Every backend operation travels through the same JSON shape: a numeric
//! process code selects the operation, the session token and customer id
//! scope it, and operation-specific fields ride alongside. The response
//! reuses one envelope for every operation: a status where [`STATUS_OK`]
//! is the only success sentinel, an optional human-readable message, and
//! an opaque `data` payload the typed operations parse.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// The only status that means success.
pub const STATUS_OK: i64 = 0;

/// Status some backend operations return for "nothing to report".
///
/// Deliberately NOT treated as success: an ambiguous status on a debiting
/// operation must abort, not silently proceed.
pub const STATUS_NO_CONTENT: i64 = 6;

/// Status for a rejected security answer. The one application error with
/// a bounded local retry budget.
pub const STATUS_ANSWER_REJECTED: i64 = 41;

/// Operation selector carried in the request envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessCode {
    GetParameters,
    GetPaymentFrequencies,
    SimulateDeposit,
    GetFundingAccounts,
    GetSecurityQuestion,
    ValidateSecurityAnswer,
    CommitInvestment,
    GetCertificateFee,
    GetCertificateAccounts,
    IssueCertificate,
}

impl ProcessCode {
    pub fn code(self) -> u16 {
        match self {
            ProcessCode::GetParameters => 401,
            ProcessCode::GetPaymentFrequencies => 402,
            ProcessCode::SimulateDeposit => 403,
            ProcessCode::GetFundingAccounts => 404,
            ProcessCode::GetSecurityQuestion => 405,
            ProcessCode::ValidateSecurityAnswer => 406,
            ProcessCode::CommitInvestment => 407,
            ProcessCode::GetCertificateFee => 408,
            ProcessCode::GetCertificateAccounts => 409,
            ProcessCode::IssueCertificate => 410,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProcessCode::GetParameters => "get-parameters",
            ProcessCode::GetPaymentFrequencies => "get-payment-frequencies",
            ProcessCode::SimulateDeposit => "simulate-deposit",
            ProcessCode::GetFundingAccounts => "get-funding-accounts",
            ProcessCode::GetSecurityQuestion => "get-security-question",
            ProcessCode::ValidateSecurityAnswer => "validate-security-answer",
            ProcessCode::CommitInvestment => "commit-investment",
            ProcessCode::GetCertificateFee => "get-certificate-fee",
            ProcessCode::GetCertificateAccounts => "get-certificate-accounts",
            ProcessCode::IssueCertificate => "issue-certificate",
        }
    }
}

/// Outbound request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    #[serde(rename = "processCode")]
    pub process_code: u16,
    pub token: String,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Inbound response envelope, shared by every operation.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl TransactionResponse {
    /// Collapse the envelope into the operation payload, mapping every
    /// non-success status to an application error.
    pub fn into_result(self) -> Result<Value, GatewayError> {
        if self.status == STATUS_OK {
            Ok(self.data)
        } else {
            Err(GatewayError::application(self.status, self.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_status_yields_data() {
        let resp = TransactionResponse {
            status: STATUS_OK,
            message: None,
            data: json!({"x": 1}),
        };
        assert_eq!(resp.into_result().unwrap(), json!({"x": 1}));
    }

    #[test]
    fn error_status_carries_backend_message_verbatim() {
        let resp = TransactionResponse {
            status: 17,
            message: Some("Insufficient balance".into()),
            data: Value::Null,
        };
        match resp.into_result().unwrap_err() {
            GatewayError::Application { status, message } => {
                assert_eq!(status, 17);
                assert_eq!(message, "Insufficient balance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_message_falls_back_to_generic() {
        let resp = TransactionResponse {
            status: 99,
            message: None,
            data: Value::Null,
        };
        let err = resp.into_result().unwrap_err();
        assert!(err.to_string().contains("status 99"));
    }

    #[test]
    fn no_content_status_is_an_error_not_a_success() {
        let resp = TransactionResponse {
            status: STATUS_NO_CONTENT,
            message: None,
            data: Value::Null,
        };
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn request_envelope_flattens_operation_fields() {
        let mut fields = Map::new();
        fields.insert("amount".into(), json!("2500.00"));
        let req = TransactionRequest {
            process_code: ProcessCode::SimulateDeposit.code(),
            token: "tok".into(),
            customer_id: "c-1".into(),
            fields,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["processCode"], 403);
        assert_eq!(v["amount"], "2500.00");
        assert_eq!(v["customerId"], "c-1");
    }
}
