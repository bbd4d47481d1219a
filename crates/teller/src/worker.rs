//! Background worker for talking to the transaction backend without
//! blocking the UI.
//!
//! One thread, one request at a time: the worker drains its queue in
//! order, so the portal never pipelines dependent calls. Every request is
//! tagged with a generation number and the tag rides back on the reply;
//! the controller uses it to drop replies that were superseded or
//! cancelled before they resolved.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use rust_decimal::Decimal;

use teller_core::api::Gateway;
use teller_core::api::operations;
use teller_core::error::GatewayError;
use teller_core::model::{
    CommitOrder, DepositQuote, FrequencyCode, FundingAccount, InvestmentParameters,
    InvestmentReceipt, PaymentFrequency, QuestionId,
};
use teller_core::process::SecurityChallenge;

/// Request sent to the gateway worker.
#[derive(Debug)]
pub enum GatewayRequest {
    FetchParameters,
    FetchFrequencies {
        amount: Decimal,
        term_days: u32,
    },
    Simulate {
        frequency: FrequencyCode,
        amount: Decimal,
        term_days: u32,
        rate: Decimal,
    },
    FetchFundingAccounts {
        principal: Decimal,
    },
    FetchSecurityQuestion,
    ValidateAnswer {
        question: QuestionId,
        answer: String,
    },
    Commit {
        order: CommitOrder,
    },
    /// Graceful shutdown
    Shutdown,
}

/// Reply from the gateway worker.
#[derive(Debug)]
pub enum GatewayReply {
    Parameters(Result<InvestmentParameters, GatewayError>),
    Frequencies(Result<Vec<PaymentFrequency>, GatewayError>),
    Quote(Result<DepositQuote, GatewayError>),
    FundingAccounts(Result<Vec<FundingAccount>, GatewayError>),
    SecurityQuestion(Result<SecurityChallenge, GatewayError>),
    AnswerVerdict(Result<bool, GatewayError>),
    CommitOutcome(Result<InvestmentReceipt, GatewayError>),
}

/// A reply tagged with the generation of the request that produced it.
#[derive(Debug)]
pub struct TaggedReply {
    pub generation: u64,
    pub reply: GatewayReply,
}

pub struct GatewayWorker {
    request_tx: Sender<(u64, GatewayRequest)>,
    reply_rx: Receiver<TaggedReply>,
    next_generation: u64,
    thread: Option<JoinHandle<()>>,
}

impl GatewayWorker {
    pub fn new(gateway: Box<dyn Gateway>) -> Self {
        let (request_tx, request_rx) = channel::<(u64, GatewayRequest)>();
        let (reply_tx, reply_rx) = channel();

        let thread = thread::spawn(move || {
            run(gateway, request_rx, reply_tx);
        });

        Self {
            request_tx,
            reply_rx,
            next_generation: 0,
            thread: Some(thread),
        }
    }

    /// Queue a request; returns the generation its reply will carry.
    pub fn submit(&mut self, request: GatewayRequest) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        if self.request_tx.send((generation, request)).is_err() {
            tracing::error!("gateway worker is gone, request dropped");
        }
        generation
    }

    /// Non-blocking poll for the next reply.
    pub fn try_recv(&self) -> Option<TaggedReply> {
        self.reply_rx.try_recv().ok()
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send((0, GatewayRequest::Shutdown));
    }
}

impl Drop for GatewayWorker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run(
    gateway: Box<dyn Gateway>,
    request_rx: Receiver<(u64, GatewayRequest)>,
    reply_tx: Sender<TaggedReply>,
) {
    while let Ok((generation, request)) = request_rx.recv() {
        let reply = match request {
            GatewayRequest::Shutdown => break,
            GatewayRequest::FetchParameters => {
                GatewayReply::Parameters(operations::fetch_parameters(gateway.as_ref()))
            }
            GatewayRequest::FetchFrequencies { amount, term_days } => GatewayReply::Frequencies(
                operations::fetch_payment_frequencies(gateway.as_ref(), amount, term_days),
            ),
            GatewayRequest::Simulate {
                frequency,
                amount,
                term_days,
                rate,
            } => GatewayReply::Quote(operations::simulate_deposit(
                gateway.as_ref(),
                &frequency,
                amount,
                term_days,
                rate,
            )),
            GatewayRequest::FetchFundingAccounts { principal } => GatewayReply::FundingAccounts(
                operations::fetch_funding_accounts(gateway.as_ref(), principal),
            ),
            GatewayRequest::FetchSecurityQuestion => GatewayReply::SecurityQuestion(
                operations::fetch_security_question(gateway.as_ref()),
            ),
            GatewayRequest::ValidateAnswer { question, answer } => GatewayReply::AnswerVerdict(
                operations::validate_security_answer(gateway.as_ref(), question, &answer),
            ),
            GatewayRequest::Commit { order } => {
                GatewayReply::CommitOutcome(operations::commit_investment(
                    gateway.as_ref(),
                    &order,
                ))
            }
        };
        if reply_tx.send(TaggedReply { generation, reply }).is_err() {
            break;
        }
    }
}
