//! Scripted gateway for driving flows without a backend.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{Map, Value};

use crate::api::envelope::ProcessCode;
use crate::api::gateway::{Gateway, Session};
use crate::error::GatewayError;
use crate::model::CustomerId;

/// A gateway that replays a scripted sequence of responses and records
/// every call it sees.
pub struct ScriptedGateway {
    session: Session,
    script: RefCell<VecDeque<(ProcessCode, Result<Value, GatewayError>)>>,
    pub calls: RefCell<Vec<(ProcessCode, Map<String, Value>)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            session: Session {
                customer: CustomerId("c-9301".into()),
                token: "t-test".into(),
            },
            script: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn expect(self, code: ProcessCode, reply: Result<Value, GatewayError>) -> Self {
        self.script.borrow_mut().push_back((code, reply));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.borrow().len()
    }
}

impl Gateway for ScriptedGateway {
    fn call(
        &self,
        code: ProcessCode,
        fields: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        self.calls.borrow_mut().push((code, fields));
        let (expected, reply) = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected call to {}", code.name()));
        assert_eq!(
            expected,
            code,
            "expected a {} call, got {}",
            expected.name(),
            code.name()
        );
        reply
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
