//! Typed operations over the transaction envelope.
//!
//! One function per process code. Each builds the operation-specific
//! fields, issues the call through the [`Gateway`] seam, and parses the
//! opaque `data` payload into model types. Parse failures surface as
//! [`GatewayError::Malformed`].

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::error::GatewayError;
use crate::model::money::decimal_from_value;
use crate::model::{
    AccountCode, CertificateQuote, CertificateRecord, CommitOrder, DepositQuote,
    FrequencyCode, FundingAccount, InvestmentCode, InvestmentParameters, InvestmentReceipt,
    PaymentFrequency, ProductCode, QuestionId, TermBound, TermRange,
};
use crate::process::SecurityChallenge;

use super::envelope::{ProcessCode, STATUS_ANSWER_REJECTED};
use super::gateway::Gateway;

/// Fetch the product parameters bounding the simulator.
pub fn fetch_parameters(gw: &dyn Gateway) -> Result<InvestmentParameters, GatewayError> {
    let data = gw.call(ProcessCode::GetParameters, Map::new())?;
    let obj = as_object(&data, "parameters")?;
    Ok(InvestmentParameters {
        product: ProductCode(str_field(obj, "investmentType")?),
        product_label: str_field(obj, "investmentTypeDescription")?,
        term: TermRange {
            min_days: u32_field(obj, "minTerm")?,
            max: TermBound::from_backend(u32_field(obj, "maxTerm")?),
        },
        amount_min: dec_field(obj, "minAmount")?,
        amount_max: dec_field(obj, "maxAmount")?,
        rate_min: dec_field(obj, "minRate")?,
        rate_max: dec_field(obj, "maxRate")?,
    })
}

/// Fetch the payment frequency options for an (amount, term) pair.
pub fn fetch_payment_frequencies(
    gw: &dyn Gateway,
    amount: Decimal,
    term_days: u32,
) -> Result<Vec<PaymentFrequency>, GatewayError> {
    let mut fields = Map::new();
    fields.insert("amount".into(), json!(amount.to_string()));
    fields.insert("term".into(), json!(term_days));
    let data = gw.call(ProcessCode::GetPaymentFrequencies, fields)?;

    as_array(&data, "payment frequencies")?
        .iter()
        .map(|item| {
            let obj = as_object(item, "payment frequency")?;
            Ok(PaymentFrequency {
                code: FrequencyCode(str_field(obj, "code")?),
                description: str_field(obj, "description")?,
            })
        })
        .collect()
}

/// Run the backend simulation for the current inputs. The returned
/// figures are authoritative; nothing is recomputed locally.
pub fn simulate_deposit(
    gw: &dyn Gateway,
    frequency: &FrequencyCode,
    amount: Decimal,
    term_days: u32,
    rate: Decimal,
) -> Result<DepositQuote, GatewayError> {
    let mut fields = Map::new();
    fields.insert("paymentType".into(), json!(frequency.0));
    fields.insert("amount".into(), json!(amount.to_string()));
    fields.insert("term".into(), json!(term_days));
    fields.insert("rate".into(), json!(rate.to_string()));
    let data = gw.call(ProcessCode::SimulateDeposit, fields)?;

    let obj = as_object(&data, "simulation")?;
    Ok(DepositQuote {
        principal: dec_field(obj, "principal")?,
        gross_interest: dec_field(obj, "interest")?,
        withholding: dec_field(obj, "withholding")?,
        total_payable: dec_field(obj, "total")?,
        frequency: frequency.clone(),
    })
}

/// Fetch the accounts with enough balance to fund `principal`.
///
/// An empty list is an empty success, not an error; the caller renders
/// the no-eligible-accounts condition from it.
pub fn fetch_funding_accounts(
    gw: &dyn Gateway,
    principal: Decimal,
) -> Result<Vec<FundingAccount>, GatewayError> {
    let mut fields = Map::new();
    fields.insert("amount".into(), json!(principal.to_string()));
    let data = gw.call(ProcessCode::GetFundingAccounts, fields)?;
    parse_accounts(&data)
}

/// Fetch a security question for the active process.
pub fn fetch_security_question(gw: &dyn Gateway) -> Result<SecurityChallenge, GatewayError> {
    let data = gw.call(ProcessCode::GetSecurityQuestion, Map::new())?;
    let obj = as_object(&data, "security question")?;
    Ok(SecurityChallenge {
        question_id: QuestionId(u32_field(obj, "questionId")?),
        question: str_field(obj, "question")?,
    })
}

/// Submit a security answer. `Ok(false)` is a rejected answer (the
/// bounded-retry class); every other non-success status propagates as an
/// application error.
pub fn validate_security_answer(
    gw: &dyn Gateway,
    question: QuestionId,
    answer: &str,
) -> Result<bool, GatewayError> {
    let mut fields = Map::new();
    fields.insert("questionId".into(), json!(question.0));
    fields.insert("answer".into(), json!(answer));
    match gw.call(ProcessCode::ValidateSecurityAnswer, fields) {
        Ok(_) => Ok(true),
        Err(GatewayError::Application { status, .. }) if status == STATUS_ANSWER_REJECTED => {
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Commit the investment. Attempted exactly once per accepted answer;
/// the backend asserts funds have not moved on failure.
pub fn commit_investment(
    gw: &dyn Gateway,
    order: &CommitOrder,
) -> Result<InvestmentReceipt, GatewayError> {
    let mut fields = Map::new();
    fields.insert("paymentType".into(), json!(order.frequency.0));
    fields.insert("amount".into(), json!(order.amount.to_string()));
    fields.insert("term".into(), json!(order.term_days));
    fields.insert("rate".into(), json!(order.rate.to_string()));
    fields.insert("debitAccount".into(), json!(order.funding_account.0));
    let data = gw.call(ProcessCode::CommitInvestment, fields)?;

    let obj = as_object(&data, "investment receipt")?;
    Ok(InvestmentReceipt {
        investment_code: InvestmentCode(str_field(obj, "investment")?),
        principal: dec_field(obj, "principal")?,
        interest: dec_field(obj, "interest")?,
        withholding: dec_field(obj, "withholding")?,
        total_receivable: dec_field(obj, "total")?,
        start_date: date_field(obj, "startDate")?,
        maturity_date: date_field(obj, "dueDate")?,
    })
}

/// Fee for issuing an account certificate.
pub fn fetch_certificate_fee(gw: &dyn Gateway) -> Result<CertificateQuote, GatewayError> {
    let data = gw.call(ProcessCode::GetCertificateFee, Map::new())?;
    let obj = as_object(&data, "certificate fee")?;
    Ok(CertificateQuote {
        fee: dec_field(obj, "fee")?,
    })
}

/// Accounts the certificate fee may be debited from.
pub fn fetch_certificate_accounts(
    gw: &dyn Gateway,
) -> Result<Vec<FundingAccount>, GatewayError> {
    let data = gw.call(ProcessCode::GetCertificateAccounts, Map::new())?;
    parse_accounts(&data)
}

/// Debit the fee and issue the certificate in one backend operation.
///
/// The debit is only considered to have happened on the explicit success
/// status; any other status — including the "no content" one — aborts
/// with an error instead of optimistically composing a certificate.
pub fn issue_certificate(
    gw: &dyn Gateway,
    debit_account: &AccountCode,
    fee: Decimal,
) -> Result<CertificateRecord, GatewayError> {
    let mut fields = Map::new();
    fields.insert("debitAccount".into(), json!(debit_account.0));
    fields.insert("fee".into(), json!(fee.to_string()));
    let data = gw.call(ProcessCode::IssueCertificate, fields)?;

    let obj = as_object(&data, "certificate")?;
    let statements = obj
        .get("statements")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(CertificateRecord {
        certificate_number: str_field(obj, "certificateNumber")?,
        customer: gw.session().customer.clone(),
        debited_account: debit_account.clone(),
        fee,
        issued_on: date_field(obj, "issuedOn")?,
        statements,
    })
}

fn parse_accounts(data: &Value) -> Result<Vec<FundingAccount>, GatewayError> {
    // An absent list is the backend's way of saying "none eligible".
    if data.is_null() {
        return Ok(Vec::new());
    }
    as_array(data, "accounts")?
        .iter()
        .map(|item| {
            let obj = as_object(item, "account")?;
            Ok(FundingAccount {
                code: AccountCode(str_field(obj, "account")?),
                product_label: str_field(obj, "productDescription")?,
                masked_number: str_field(obj, "accountNumber")?,
                status: str_field(obj, "status")?,
            })
        })
        .collect()
}

fn as_object<'a>(
    value: &'a Value,
    what: &str,
) -> Result<&'a Map<String, Value>, GatewayError> {
    value
        .as_object()
        .ok_or_else(|| GatewayError::malformed(format!("{what}: expected an object")))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, GatewayError> {
    value
        .as_array()
        .ok_or_else(|| GatewayError::malformed(format!("{what}: expected a list")))
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Result<String, GatewayError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::malformed(format!("missing field `{key}`")))
}

fn u32_field(obj: &Map<String, Value>, key: &str) -> Result<u32, GatewayError> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| GatewayError::malformed(format!("missing field `{key}`")))
}

fn dec_field(obj: &Map<String, Value>, key: &str) -> Result<Decimal, GatewayError> {
    obj.get(key)
        .and_then(decimal_from_value)
        .ok_or_else(|| GatewayError::malformed(format!("missing amount field `{key}`")))
}

fn date_field(obj: &Map<String, Value>, key: &str) -> Result<Date, GatewayError> {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| GatewayError::malformed(format!("missing date field `{key}`")))
}
