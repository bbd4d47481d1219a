//! End-to-end controller tests over the scripted gateway.

use rust_decimal_macros::dec;
use serde_json::{Value, json};

use teller_core::api::envelope::{ProcessCode, STATUS_ANSWER_REJECTED};
use teller_core::error::GatewayError;
use teller_core::model::CustomerId;
use teller_core::process::Phase;

use crate::controller::DepositController;
use crate::state::{AppState, LoadState, ModalState};
use crate::worker::{GatewayReply, GatewayWorker, TaggedReply};

use super::support::{CallLog, Script, TestGateway, pump_until};

fn parameters_payload() -> Value {
    json!({
        "investmentType": "07",
        "investmentTypeDescription": "Term deposit",
        "minTerm": 30,
        "maxTerm": 720,
        "minAmount": "500.00",
        "maxAmount": "250000.00",
        "minRate": "3.50",
        "maxRate": "5.00",
    })
}

fn frequencies_payload() -> Value {
    json!([
        {"code": "M", "description": "Monthly"},
        {"code": "V", "description": "At maturity"},
    ])
}

fn quote_payload() -> Value {
    json!({
        "principal": "2500.00",
        "interest": "30.82",
        "withholding": "0.00",
        "total": "2530.82",
    })
}

fn single_account_payload() -> Value {
    json!([{
        "account": "100-200-300",
        "productDescription": "Savings",
        "accountNumber": "****0300",
        "status": "Active",
    }])
}

fn question_payload() -> Value {
    json!({"questionId": 7, "question": "Name of your first pet?"})
}

fn receipt_payload() -> Value {
    json!({
        "investment": "INV-001",
        "principal": "2500.00",
        "interest": "30.82",
        "withholding": "0.00",
        "total": "2530.82",
        "startDate": "2026-08-06",
        "dueDate": "2026-11-04",
    })
}

fn harness(
    script: Vec<(ProcessCode, Result<Value, GatewayError>)>,
) -> (DepositController, AppState, Script, CallLog, tempfile::TempDir) {
    let (gateway, script, calls) = TestGateway::scripted(script);
    let data_dir = tempfile::tempdir().unwrap();
    let controller = DepositController::new(
        GatewayWorker::new(Box::new(gateway)),
        CustomerId("c-9301".into()),
        data_dir.path().to_path_buf(),
    );
    let state = AppState::new("Banco Test".into(), "Customer ****9301".into());
    (controller, state, script, calls, data_dir)
}

/// Load parameters and fill the form up to a selected quote + account.
fn drive_to_funding_selected(ctl: &mut DepositController, state: &mut AppState) {
    ctl.load_parameters(state);
    pump_until(ctl, state, "parameters", |s| s.params.ready().is_some());

    for c in "2500.00".chars() {
        ctl.amount_push(state, c);
    }
    ctl.term_move(state, 2); // 30 -> 90 days
    ctl.term_apply(state);
    pump_until(ctl, state, "frequencies", |s| !s.calc.frequencies().is_empty());

    ctl.choose_frequency(state, 0);
    ctl.calculate(state);
    pump_until(ctl, state, "quote", |s| s.calc.quote().is_some());

    ctl.request_funding(state);
    pump_until(ctl, state, "funding accounts", |s| s.funding.ready().is_some());
}

fn answer(state: &mut AppState, text: &str) {
    if let ModalState::Security(modal) = &mut state.modal {
        modal.input = text.to_string();
    } else {
        panic!("security modal expected, got {:?}", state.modal);
    }
}

#[test]
fn happy_path_lands_in_confirmation_and_resets_on_dismiss() {
    let (mut ctl, mut state, script, calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(single_account_payload())),
        (ProcessCode::GetSecurityQuestion, Ok(question_payload())),
        (ProcessCode::ValidateSecurityAnswer, Ok(json!({}))),
        (ProcessCode::CommitInvestment, Ok(receipt_payload())),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);

    // The sole eligible account auto-selected.
    let choice = state.funding.ready().unwrap();
    assert!(choice.selected().is_some());
    assert_eq!(state.calc.quote().unwrap().principal, dec!(2500.00));

    ctl.start_investment(&mut state);
    assert!(matches!(state.modal, ModalState::Security(_)));
    pump_until(&mut ctl, &mut state, "security question", |s| {
        s.process.challenge().is_some()
    });

    answer(&mut state, "rex");
    ctl.submit_answer(&mut state);
    pump_until(&mut ctl, &mut state, "confirmation", |s| {
        matches!(s.modal, ModalState::Outcome(_))
    });

    match state.process.phase() {
        Phase::Confirmation(receipt) => {
            assert_eq!(receipt.principal, dec!(2500.00));
            assert_eq!(receipt.total_receivable, dec!(2530.82));
        }
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert!(script.lock().unwrap().is_empty());

    ctl.dismiss_outcome(&mut state);
    assert!(matches!(state.process.phase(), Phase::Inactive));
    assert!(matches!(state.modal, ModalState::None));
    assert_eq!(state.calc.amount_text(), "");
    assert!(state.calc.term_days().is_none());
    assert!(state.calc.quote().is_none());
    assert!(matches!(state.funding, LoadState::Idle));

    // The whole flow took exactly one call per step.
    let seen = calls.lock().unwrap();
    assert_eq!(seen.len(), 7);
}

#[test]
fn exactly_three_rejections_cancel_without_any_commit() {
    let rejected = || {
        Err(GatewayError::application(
            STATUS_ANSWER_REJECTED,
            Some("Incorrect answer".into()),
        ))
    };
    let (mut ctl, mut state, _script, calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(single_account_payload())),
        (ProcessCode::GetSecurityQuestion, Ok(question_payload())),
        (ProcessCode::ValidateSecurityAnswer, rejected()),
        (ProcessCode::ValidateSecurityAnswer, rejected()),
        (ProcessCode::ValidateSecurityAnswer, rejected()),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);
    ctl.start_investment(&mut state);
    pump_until(&mut ctl, &mut state, "security question", |s| {
        s.process.challenge().is_some()
    });

    for expected_remaining in [2u8, 1] {
        answer(&mut state, "wrong");
        ctl.submit_answer(&mut state);
        pump_until(&mut ctl, &mut state, "rejection", |s| match &s.modal {
            ModalState::Security(m) => !m.busy && m.error.is_some(),
            _ => false,
        });
        match &state.modal {
            ModalState::Security(modal) => {
                assert_eq!(modal.remaining, expected_remaining);
                assert!(modal.input.is_empty(), "input is cleared after a rejection");
            }
            other => panic!("expected security modal, got {other:?}"),
        }
    }

    answer(&mut state, "wrong");
    ctl.submit_answer(&mut state);
    pump_until(&mut ctl, &mut state, "forced cancellation", |s| {
        matches!(s.modal, ModalState::Message(_))
    });

    assert!(matches!(state.process.phase(), Phase::Inactive));
    let seen = calls.lock().unwrap();
    assert!(
        !seen.contains(&ProcessCode::CommitInvestment),
        "no commit may ever be issued on the rejection path"
    );
}

#[test]
fn failed_commit_is_terminal_and_resets_on_dismiss() {
    let (mut ctl, mut state, _script, _calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(single_account_payload())),
        (ProcessCode::GetSecurityQuestion, Ok(question_payload())),
        (ProcessCode::ValidateSecurityAnswer, Ok(json!({}))),
        (
            ProcessCode::CommitInvestment,
            Err(GatewayError::application(88, Some("Core system unavailable".into()))),
        ),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);
    ctl.start_investment(&mut state);
    pump_until(&mut ctl, &mut state, "security question", |s| {
        s.process.challenge().is_some()
    });
    answer(&mut state, "rex");
    ctl.submit_answer(&mut state);
    pump_until(&mut ctl, &mut state, "failure view", |s| {
        matches!(s.modal, ModalState::Outcome(_))
    });

    match state.process.phase() {
        Phase::Failed { message } => assert_eq!(message, "Core system unavailable"),
        other => panic!("expected failed, got {other:?}"),
    }
    if let ModalState::Outcome(modal) = &state.modal {
        assert!(!modal.is_success());
    }

    ctl.dismiss_outcome(&mut state);
    assert!(matches!(state.process.phase(), Phase::Inactive));
    assert_eq!(state.calc.amount_text(), "");
}

#[test]
fn zero_eligible_accounts_is_terminal_for_the_attempt() {
    let (mut ctl, mut state, _script, _calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(json!([]))),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);

    assert!(matches!(
        state.funding.ready(),
        Some(teller_core::model::FundingChoice::NoneEligible)
    ));
    assert!(!state.can_start());

    ctl.start_investment(&mut state);
    assert!(matches!(state.process.phase(), Phase::Inactive));
    assert!(state.banner.is_some());
}

#[test]
fn invalid_amount_blocks_calculate_with_no_network_call() {
    let (mut ctl, mut state, _script, calls, _dir) =
        harness(vec![(ProcessCode::GetParameters, Ok(parameters_payload()))]);

    ctl.load_parameters(&mut state);
    pump_until(&mut ctl, &mut state, "parameters", |s| {
        s.params.ready().is_some()
    });

    for c in "100000000".chars() {
        ctl.amount_push(&mut state, c);
    }
    ctl.term_move(&mut state, 2);
    ctl.term_apply(&mut state);

    assert!(
        state
            .sim
            .amount_error
            .as_deref()
            .unwrap()
            .contains("maximum")
    );

    ctl.calculate(&mut state);
    ctl.poll(&mut state);
    assert!(state.calc.quote().is_none());

    let seen = calls.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[ProcessCode::GetParameters],
        "no frequency or simulation call for invalid inputs"
    );
}

#[test]
fn challenge_fetch_failure_aborts_back_to_inactive() {
    let (mut ctl, mut state, _script, _calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(single_account_payload())),
        (
            ProcessCode::GetSecurityQuestion,
            Err(GatewayError::Transport("connection reset".into())),
        ),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);
    ctl.start_investment(&mut state);
    pump_until(&mut ctl, &mut state, "abort", |s| {
        matches!(s.modal, ModalState::None) && !s.process.is_active()
    });

    assert!(state.banner.is_some());
    // The inputs survive; only the process attempt was aborted.
    assert!(state.calc.quote().is_some());
}

#[test]
fn stale_replies_are_discarded() {
    let (mut ctl, mut state, _script, _calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
    ]);

    ctl.load_parameters(&mut state);
    pump_until(&mut ctl, &mut state, "parameters", |s| {
        s.params.ready().is_some()
    });

    for c in "2500.00".chars() {
        ctl.amount_push(&mut state, c);
    }
    ctl.term_move(&mut state, 2);
    ctl.term_apply(&mut state);

    // A reply with a generation nobody is waiting for goes nowhere.
    ctl.apply_reply(
        &mut state,
        TaggedReply {
            generation: 999,
            reply: GatewayReply::Frequencies(Ok(vec![])),
        },
    );
    assert!(state.frequencies_pending, "forged reply must not apply");

    pump_until(&mut ctl, &mut state, "real frequencies", |s| {
        !s.calc.frequencies().is_empty()
    });
    assert_eq!(state.calc.frequencies().len(), 2);
}

#[test]
fn verdict_arriving_after_cancellation_is_inert() {
    let (mut ctl, mut state, _script, calls, _dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(single_account_payload())),
        (ProcessCode::GetSecurityQuestion, Ok(question_payload())),
        (ProcessCode::ValidateSecurityAnswer, Ok(json!({}))),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);
    ctl.start_investment(&mut state);
    pump_until(&mut ctl, &mut state, "security question", |s| {
        s.process.challenge().is_some()
    });

    answer(&mut state, "rex");
    ctl.submit_answer(&mut state);
    // Cancel before the (accepting) verdict comes back.
    ctl.cancel_security(&mut state);
    assert!(matches!(state.process.phase(), Phase::Inactive));

    // Give the in-flight verdict every chance to arrive, then drain it.
    std::thread::sleep(std::time::Duration::from_millis(50));
    ctl.poll(&mut state);

    assert!(matches!(state.process.phase(), Phase::Inactive));
    assert!(matches!(state.modal, ModalState::None));
    let seen = calls.lock().unwrap();
    assert!(
        !seen.contains(&ProcessCode::CommitInvestment),
        "a verdict resolving after cancel must not trigger a commit"
    );
}

#[test]
fn export_writes_the_confirmation_document() {
    let (mut ctl, mut state, _script, _calls, dir) = harness(vec![
        (ProcessCode::GetParameters, Ok(parameters_payload())),
        (ProcessCode::GetPaymentFrequencies, Ok(frequencies_payload())),
        (ProcessCode::SimulateDeposit, Ok(quote_payload())),
        (ProcessCode::GetFundingAccounts, Ok(single_account_payload())),
        (ProcessCode::GetSecurityQuestion, Ok(question_payload())),
        (ProcessCode::ValidateSecurityAnswer, Ok(json!({}))),
        (ProcessCode::CommitInvestment, Ok(receipt_payload())),
    ]);

    drive_to_funding_selected(&mut ctl, &mut state);
    ctl.start_investment(&mut state);
    pump_until(&mut ctl, &mut state, "security question", |s| {
        s.process.challenge().is_some()
    });
    answer(&mut state, "rex");
    ctl.submit_answer(&mut state);
    pump_until(&mut ctl, &mut state, "confirmation", |s| {
        matches!(s.modal, ModalState::Outcome(_))
    });

    ctl.export_confirmation(&mut state);

    let path = dir.path().join("confirmation-INV-001.txt");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Banco Test"));
    assert!(contents.contains("INV-001"));
    assert!(contents.contains("$2,530.82"));
    if let ModalState::Outcome(modal) = &state.modal {
        assert_eq!(modal.exported.as_deref(), Some(path.as_path()));
    }
}
