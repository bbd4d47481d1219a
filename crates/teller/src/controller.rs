//! The deposit workflow controller.
//!
//! Maps user intents onto validation, process transitions, and worker
//! requests, and applies worker replies back onto [`AppState`]. All
//! remote work funnels through the single [`GatewayWorker`]; every
//! request's generation is remembered here, and a reply whose generation
//! is no longer the expected one is discarded — that is what makes a
//! response resolving after a cancellation or a superseding edit inert.

use std::fs::File;
use std::path::PathBuf;

use teller_core::document::{TextSink, confirmation_document, DocumentSink};
use teller_core::model::{CustomerId, FundingChoice, InvestmentParameters};
use teller_core::process::{AnswerOutcome, MAX_ANSWER_ATTEMPTS, Phase};
use teller_core::validation::{CustomTermEntry, validate_amount, validate_term};
use rust_decimal::Decimal;

use crate::state::{
    AppState, LoadState, MessageModal, ModalState, OutcomeModal, SecurityModal, TERM_PRESETS,
};
use crate::worker::{GatewayReply, GatewayRequest, GatewayWorker, TaggedReply};

pub struct DepositController {
    worker: GatewayWorker,
    customer: CustomerId,
    data_dir: PathBuf,

    expect_params: Option<u64>,
    expect_frequencies: Option<u64>,
    expect_quote: Option<u64>,
    expect_accounts: Option<u64>,
    expect_question: Option<u64>,
    expect_verdict: Option<u64>,
    expect_commit: Option<u64>,
}

impl DepositController {
    pub fn new(worker: GatewayWorker, customer: CustomerId, data_dir: PathBuf) -> Self {
        Self {
            worker,
            customer,
            data_dir,
            expect_params: None,
            expect_frequencies: None,
            expect_quote: None,
            expect_accounts: None,
            expect_question: None,
            expect_verdict: None,
            expect_commit: None,
        }
    }

    // ========== parameter loading ==========

    pub fn load_parameters(&mut self, state: &mut AppState) {
        state.params = LoadState::Loading;
        self.expect_params = Some(self.worker.submit(GatewayRequest::FetchParameters));
    }

    /// Retry whichever remote load last failed.
    pub fn retry(&mut self, state: &mut AppState) {
        state.clear_banner();
        if state.params.is_failed() {
            self.load_parameters(state);
        } else if state.funding.is_failed() {
            self.request_funding(state);
        } else {
            self.refresh_frequencies(state);
        }
    }

    // ========== form editing ==========

    pub fn amount_push(&mut self, state: &mut AppState, c: char) {
        if !(c.is_ascii_digit() || c == '.') {
            return;
        }
        let mut text = state.calc.amount_text().to_string();
        text.push(c);
        state.calc.set_amount(text);
        self.inputs_changed(state);
    }

    pub fn amount_pop(&mut self, state: &mut AppState) {
        let mut text = state.calc.amount_text().to_string();
        if text.pop().is_some() {
            state.calc.set_amount(text);
            self.inputs_changed(state);
        }
    }

    /// Move the term picker cursor. The slot one past the presets is the
    /// custom entry.
    pub fn term_move(&mut self, state: &mut AppState, delta: i64) {
        let max = TERM_PRESETS.len(); // inclusive: the custom slot
        let current = state.sim.preset_index as i64;
        let next = (current + delta).clamp(0, max as i64) as usize;
        state.sim.preset_index = next;
    }

    /// Apply the term option under the cursor: commit a preset, or open
    /// (or commit) the custom entry.
    pub fn term_apply(&mut self, state: &mut AppState) {
        if state.sim.preset_index < TERM_PRESETS.len() {
            let (days, label) = TERM_PRESETS[state.sim.preset_index];
            state.sim.custom_entry = None;
            state.calc.set_term(days, label);
            self.inputs_changed(state);
            return;
        }
        match &state.sim.custom_entry {
            None => {
                // Open the custom entry; validation stays quiet until the
                // value is committed.
                state.sim.custom_entry = Some(CustomTermEntry::new());
                state.sim.term_error = None;
            }
            Some(entry) => match entry.commit() {
                Some(days) => {
                    state.sim.custom_entry = None;
                    state.calc.set_term(days, format!("{days} days"));
                    self.inputs_changed(state);
                }
                None => {
                    state.sim.term_error =
                        Some("Enter at least 2 digits for a custom term".to_string());
                }
            },
        }
    }

    pub fn custom_term_push(&mut self, state: &mut AppState, c: char) {
        if let Some(entry) = &mut state.sim.custom_entry {
            entry.push_digit(c);
            state.sim.term_error = None;
        }
    }

    pub fn custom_term_pop(&mut self, state: &mut AppState) {
        if let Some(entry) = &mut state.sim.custom_entry {
            entry.pop();
        }
    }

    pub fn custom_term_abort(&mut self, state: &mut AppState) {
        state.sim.custom_entry = None;
        state.sim.term_error = None;
    }

    pub fn choose_frequency(&mut self, state: &mut AppState, index: usize) {
        state.calc.choose_frequency(index);
        // The quote belonged to the previous pick.
        self.expect_quote = None;
        state.quote_pending = false;
    }

    /// Clear the whole form.
    pub fn clear_form(&mut self, state: &mut AppState) {
        if state.process.is_active() {
            return;
        }
        state.reset_workflow();
        self.drop_downstream_expectations();
    }

    // ========== remote steps ==========

    /// Re-validate after an amount or term edit and, when both inputs
    /// hold up, fetch the frequency options for the new pair. Everything
    /// derived from the previous pair is invalidated either way.
    fn inputs_changed(&mut self, state: &mut AppState) {
        self.drop_downstream_expectations();
        state.funding = LoadState::Idle;
        state.quote_pending = false;
        state.frequencies_pending = false;

        let Some(params) = state.params.ready() else {
            return;
        };

        state.sim.amount_error = if state.calc.amount_text().is_empty() {
            None
        } else {
            validate_amount(state.calc.amount_text(), params).message
        };
        state.sim.term_error = state
            .calc
            .term_days()
            .and_then(|days| validate_term(days, params).message);

        self.refresh_frequencies(state);
    }

    fn refresh_frequencies(&mut self, state: &mut AppState) {
        let Some(params) = state.params.ready() else {
            return;
        };
        let amount_ok = validate_amount(state.calc.amount_text(), params).is_valid;
        let term_ok = state
            .calc
            .term_days()
            .map(|d| validate_term(d, params).is_valid)
            .unwrap_or(false);
        if !(amount_ok && term_ok) {
            return;
        }
        let amount = state.calc.amount().expect("amount validated above");
        let term_days = state.calc.term_days().expect("term validated above");

        state.frequencies_pending = true;
        self.expect_frequencies = Some(
            self.worker
                .submit(GatewayRequest::FetchFrequencies { amount, term_days }),
        );
    }

    /// The calculate action: ask the backend for the authoritative
    /// breakdown. A no-op while the inputs do not validate.
    pub fn calculate(&mut self, state: &mut AppState) {
        let Some(params) = state.params.ready() else {
            state.set_banner("Product parameters are not loaded yet");
            return;
        };
        if !state.calc.can_calculate(params) {
            return;
        }
        let rate = offered_rate(params);
        let frequency = state.calc.frequency().expect("checked by can_calculate");

        state.quote_pending = true;
        state.funding = LoadState::Idle;
        self.expect_accounts = None;
        self.expect_quote = Some(self.worker.submit(GatewayRequest::Simulate {
            frequency: frequency.code.clone(),
            amount: state.calc.amount().expect("checked by can_calculate"),
            term_days: state.calc.term_days().expect("checked by can_calculate"),
            rate,
        }));
    }

    /// The invest action: fetch the accounts able to fund the simulated
    /// principal.
    pub fn request_funding(&mut self, state: &mut AppState) {
        let Some(quote) = state.calc.quote() else {
            state.set_banner("Calculate the deposit first");
            return;
        };
        let principal = quote.principal;
        state.funding = LoadState::Loading;
        state.sim.account_cursor = 0;
        self.expect_accounts = Some(
            self.worker
                .submit(GatewayRequest::FetchFundingAccounts { principal }),
        );
    }

    pub fn account_cursor_move(&mut self, state: &mut AppState, delta: i64) {
        if let Some(choice) = state.funding.ready() {
            let len = choice.options().len();
            if len == 0 {
                return;
            }
            let next = (state.sim.account_cursor as i64 + delta).clamp(0, len as i64 - 1);
            state.sim.account_cursor = next as usize;
        }
    }

    pub fn account_select(&mut self, state: &mut AppState) {
        let cursor = state.sim.account_cursor;
        if let Some(choice) = state.funding.ready_mut() {
            choice.select(cursor);
        }
    }

    /// The confirm action: start the investment process and fetch the
    /// security question. Refusals surface inline and change nothing.
    pub fn start_investment(&mut self, state: &mut AppState) {
        let Some(params) = state.params.ready() else {
            return;
        };
        let rate = offered_rate(params);
        let term_days = state.calc.term_days().unwrap_or(0);
        let started = state.process.start(
            &self.customer,
            state.calc.quote(),
            state.funding.ready().and_then(FundingChoice::selected),
            term_days,
            rate,
        );
        match started {
            Ok(()) => {
                state.modal =
                    ModalState::Security(SecurityModal::loading(MAX_ANSWER_ATTEMPTS));
                self.expect_question =
                    Some(self.worker.submit(GatewayRequest::FetchSecurityQuestion));
            }
            Err(blocked) => state.set_banner(blocked.to_string()),
        }
    }

    pub fn submit_answer(&mut self, state: &mut AppState) {
        let Some(challenge) = state.process.challenge() else {
            return;
        };
        let question = challenge.question_id;
        if let ModalState::Security(modal) = &mut state.modal {
            let answer = modal.input.trim().to_string();
            if answer.is_empty() || modal.busy {
                return;
            }
            modal.busy = true;
            modal.error = None;
            self.expect_verdict = Some(
                self.worker
                    .submit(GatewayRequest::ValidateAnswer { question, answer }),
            );
        }
    }

    /// Explicit cancellation during the security phase. Any in-flight
    /// question or verdict reply becomes stale here and never commits
    /// anything.
    pub fn cancel_security(&mut self, state: &mut AppState) {
        if state.process.cancel().is_ok() {
            state.modal = ModalState::None;
            self.expect_question = None;
            self.expect_verdict = None;
        }
    }

    pub fn dismiss_outcome(&mut self, state: &mut AppState) {
        if state.process.dismiss().is_ok() {
            state.modal = ModalState::None;
            state.reset_workflow();
            self.drop_downstream_expectations();
        }
    }

    pub fn dismiss_message(&mut self, state: &mut AppState) {
        state.modal = ModalState::None;
    }

    /// Export the confirmation document next to the logs.
    pub fn export_confirmation(&mut self, state: &mut AppState) {
        let ModalState::Outcome(modal) = &mut state.modal else {
            return;
        };
        let Some(receipt) = &modal.receipt else {
            return;
        };
        let document = confirmation_document(
            &state.institution,
            &state.customer_label,
            receipt,
            modal.term_days,
        );
        let path = self
            .data_dir
            .join(format!("confirmation-{}.txt", receipt.investment_code));
        let written = File::create(&path)
            .and_then(|file| TextSink::new(file).write_document(&document));
        match written {
            Ok(()) => {
                tracing::info!(path = %path.display(), "confirmation exported");
                modal.exported = Some(path);
            }
            Err(err) => {
                tracing::error!(error = %err, "confirmation export failed");
                state.set_banner(format!("Could not write the document: {err}"));
            }
        }
    }

    // ========== replies ==========

    /// Drain and apply everything the worker has produced.
    pub fn poll(&mut self, state: &mut AppState) {
        while let Some(tagged) = self.worker.try_recv() {
            self.apply_reply(state, tagged);
        }
    }

    pub fn apply_reply(&mut self, state: &mut AppState, tagged: TaggedReply) {
        let TaggedReply { generation, reply } = tagged;
        match reply {
            GatewayReply::Parameters(result) => {
                if !take_expected(&mut self.expect_params, generation) {
                    return;
                }
                state.params = match result {
                    Ok(params) => LoadState::Ready(params),
                    Err(err) => LoadState::Failed(err.to_string()),
                };
            }

            GatewayReply::Frequencies(result) => {
                if !take_expected(&mut self.expect_frequencies, generation) {
                    tracing::debug!("discarding stale frequency reply");
                    return;
                }
                state.frequencies_pending = false;
                match result {
                    Ok(options) => state.calc.set_frequencies(options),
                    Err(err) => state.set_banner(err.to_string()),
                }
            }

            GatewayReply::Quote(result) => {
                if !take_expected(&mut self.expect_quote, generation) {
                    tracing::debug!("discarding stale quote reply");
                    return;
                }
                state.quote_pending = false;
                match result {
                    Ok(quote) => state.calc.store_quote(quote),
                    Err(err) => state.set_banner(err.to_string()),
                }
            }

            GatewayReply::FundingAccounts(result) => {
                if !take_expected(&mut self.expect_accounts, generation) {
                    tracing::debug!("discarding stale funding reply");
                    return;
                }
                state.funding = match result {
                    Ok(accounts) => LoadState::Ready(FundingChoice::from_fetch(accounts)),
                    Err(err) => LoadState::Failed(err.to_string()),
                };
                state.sim.account_cursor = 0;
            }

            GatewayReply::SecurityQuestion(result) => {
                if !take_expected(&mut self.expect_question, generation) {
                    tracing::debug!("discarding stale security question");
                    return;
                }
                match result {
                    Ok(challenge) => {
                        let question = challenge.question.clone();
                        if state.process.challenge_loaded(challenge).is_ok() {
                            if let ModalState::Security(modal) = &mut state.modal {
                                modal.question = Some(question);
                            }
                        }
                    }
                    Err(err) => {
                        // The transition into security aborts; the user
                        // restarts from the confirm action.
                        let _ = state.process.challenge_failed();
                        state.modal = ModalState::None;
                        state.set_banner(err.to_string());
                    }
                }
            }

            GatewayReply::AnswerVerdict(result) => {
                if !take_expected(&mut self.expect_verdict, generation) {
                    tracing::debug!("discarding stale answer verdict");
                    return;
                }
                self.apply_verdict(state, result);
            }

            GatewayReply::CommitOutcome(result) => {
                if !take_expected(&mut self.expect_commit, generation) {
                    tracing::debug!("discarding stale commit outcome");
                    return;
                }
                self.apply_commit_outcome(state, result);
            }
        }
    }

    fn apply_verdict(
        &mut self,
        state: &mut AppState,
        result: Result<bool, teller_core::GatewayError>,
    ) {
        match result {
            Ok(true) => match state.process.answer_accepted() {
                Ok(order) => {
                    state.modal = ModalState::Processing;
                    self.expect_commit =
                        Some(self.worker.submit(GatewayRequest::Commit { order }));
                }
                Err(err) => tracing::debug!(%err, "accepted answer ignored"),
            },
            Ok(false) => match state.process.answer_rejected() {
                Ok(AnswerOutcome::Retry { remaining }) => {
                    if let ModalState::Security(modal) = &mut state.modal {
                        modal.busy = false;
                        modal.input.clear();
                        modal.remaining = remaining;
                        modal.error = Some(format!(
                            "Incorrect answer. {remaining} attempt(s) remaining"
                        ));
                    }
                }
                Ok(AnswerOutcome::Exhausted) => {
                    state.modal = ModalState::Message(MessageModal::error(
                        "Security Verification Failed",
                        "Too many incorrect answers. The investment was cancelled \
                         and no funds were moved.",
                    ));
                }
                Err(err) => tracing::debug!(%err, "rejected answer ignored"),
            },
            Err(err) => {
                // Transport or application failure while validating: not a
                // rejection, so the attempt counter is untouched and the
                // user may simply try again.
                if let ModalState::Security(modal) = &mut state.modal {
                    modal.busy = false;
                    modal.error = Some(err.to_string());
                }
            }
        }
    }

    fn apply_commit_outcome(
        &mut self,
        state: &mut AppState,
        result: Result<teller_core::model::InvestmentReceipt, teller_core::GatewayError>,
    ) {
        let term_days = match state.process.phase() {
            Phase::Processing { order } => order.term_days,
            _ => 0,
        };
        match result {
            Ok(receipt) => {
                if state.process.commit_succeeded(receipt.clone()).is_ok() {
                    state.modal =
                        ModalState::Outcome(OutcomeModal::success(receipt, term_days));
                } else {
                    tracing::debug!("discarding commit success for inactive process");
                }
            }
            Err(err) => {
                let message = err.to_string();
                if state.process.commit_failed(message.clone()).is_ok() {
                    state.modal = ModalState::Outcome(OutcomeModal::failure(message));
                } else {
                    tracing::debug!("discarding commit failure for inactive process");
                }
            }
        }
    }

    fn drop_downstream_expectations(&mut self) {
        self.expect_frequencies = None;
        self.expect_quote = None;
        self.expect_accounts = None;
    }
}

/// The rate the portal offers is the top of the product's configured
/// band; the backend applies the definitive figure in its own math.
fn offered_rate(params: &InvestmentParameters) -> Decimal {
    params.rate_max
}

/// True when `generation` is the reply we are waiting for; clears the
/// expectation either way it matches.
fn take_expected(expected: &mut Option<u64>, generation: u64) -> bool {
    if *expected == Some(generation) {
        *expected = None;
        true
    } else {
        false
    }
}

impl DepositController {
    pub fn focus_next(&mut self, state: &mut AppState) {
        state.sim.focus = state.sim.focus.next();
    }
}
