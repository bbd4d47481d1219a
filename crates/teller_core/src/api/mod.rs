//! Transaction backend protocol: envelope, gateway, typed operations.

pub mod envelope;
pub mod gateway;
pub mod operations;

pub use envelope::{
    ProcessCode, STATUS_ANSWER_REJECTED, STATUS_NO_CONTENT, STATUS_OK, TransactionRequest,
    TransactionResponse,
};
pub use gateway::{Gateway, HttpGateway, Session};
