//! Scripted gateway and pumping helpers for flow tests.
//!
//! The gateway hands out pre-scripted replies from behind the worker
//! thread; the handles stay with the test so it can assert afterwards
//! which calls were actually made.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{Map, Value};

use teller_core::api::envelope::ProcessCode;
use teller_core::api::gateway::{Gateway, Session};
use teller_core::error::GatewayError;
use teller_core::model::CustomerId;

use crate::controller::DepositController;
use crate::state::AppState;

pub type Script = Arc<Mutex<VecDeque<(ProcessCode, Result<Value, GatewayError>)>>>;
pub type CallLog = Arc<Mutex<Vec<ProcessCode>>>;

pub struct TestGateway {
    session: Session,
    script: Script,
    calls: CallLog,
}

impl TestGateway {
    /// Returns the gateway plus the handles the test keeps: the pending
    /// script and the log of calls seen.
    pub fn scripted(
        script: Vec<(ProcessCode, Result<Value, GatewayError>)>,
    ) -> (Self, Script, CallLog) {
        let script: Script = Arc::new(Mutex::new(script.into_iter().collect()));
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let gateway = Self {
            session: Session {
                customer: CustomerId("c-9301".into()),
                token: "t-test".into(),
            },
            script: script.clone(),
            calls: calls.clone(),
        };
        (gateway, script, calls)
    }
}

impl Gateway for TestGateway {
    fn call(
        &self,
        code: ProcessCode,
        _fields: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(code);
        match self.script.lock().unwrap().pop_front() {
            Some((expected, reply)) if expected == code => reply,
            Some((expected, _)) => Err(GatewayError::Transport(format!(
                "script expected {} but saw {}",
                expected.name(),
                code.name()
            ))),
            None => Err(GatewayError::Transport(format!(
                "unscripted call to {}",
                code.name()
            ))),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

/// Poll worker replies until `cond` holds or a generous deadline passes.
pub fn pump_until(
    ctl: &mut DepositController,
    state: &mut AppState,
    what: &str,
    cond: impl Fn(&AppState) -> bool,
) {
    for _ in 0..400 {
        ctl.poll(state);
        if cond(state) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for: {what}");
}
