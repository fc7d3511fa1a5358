//! Failure taxonomy of an RPC call.
//!
//! Every way a call can end other than with a success payload has its own
//! variant, so callers can match exhaustively and decide whether to
//! reconnect, retry with different parameters or give up. None of these
//! are retried by the client.

use num_traits::FromPrimitive;
use thiserror::Error;

use crate::protocol::xdr::rpc::auth_stat;

/// Result type alias used by the RPC engine.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Coarse grouping of [`RpcError`] variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream failed, closed early or could not be opened.
    Transport,
    /// The reply is not a well formed RPC reply.
    Framing,
    /// The server refused the call (`MSG_DENIED`).
    Denied,
    /// The server accepted the call but could not run it.
    Rejected,
    /// The procedure ran and reported a non-zero status of its own.
    Application,
}

/// Every non-success outcome of [`Client::call`](crate::client::Client::call).
#[derive(Debug, Error)]
pub enum RpcError {
    /// The TCP connection to the server could not be established.
    #[error("failed to establish a connection with the RPC server {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended inside (or right before) a fragment header.
    #[error("truncated fragment header: got {received} of 4 bytes")]
    TruncatedHeader { received: usize },

    /// The stream ended before the declared fragment length arrived.
    #[error("truncated fragment body: got {received} of {expected} bytes")]
    TruncatedBody { expected: usize, received: usize },

    /// A reply header field could not be decoded.
    #[error("malformed reply header: {0}")]
    MalformedReply(#[source] std::io::Error),

    #[error("expected a REPLY message, got message type {0}")]
    UnexpectedMessageType(u32),

    #[error("neither MSG_ACCEPTED nor MSG_DENIED: {0}")]
    UnknownReplyStatus(u32),

    /// The reply answers a different call.
    #[error("reply xid {actual} does not match call xid {expected}")]
    UnexpectedTransactionId { expected: u32, actual: u32 },

    #[error("MSG_DENIED: RPC_MISMATCH: supported versions {low}..={high}")]
    VersionMismatch { low: u32, high: u32 },

    #[error("MSG_DENIED: AUTH_ERROR: {0}")]
    AuthRejected(u32),

    #[error("MSG_DENIED: unknown reject status {0}")]
    UnknownDenyReason(u32),

    #[error("call failed: PROG_UNAVAIL")]
    ProgramUnavailable,

    #[error("call failed: PROG_MISMATCH: supported versions {low}..={high}")]
    ProgramVersionMismatch { low: u32, high: u32 },

    #[error("call failed: PROC_UNAVAIL")]
    ProcedureUnavailable,

    #[error("call failed: GARBAGE_ARGS")]
    MalformedArguments,

    #[error("call failed: unknown accept status {0}")]
    UnknownAcceptStatus(u32),

    /// The procedure's own leading status word was not zero.
    #[error("procedure failed with status {}: {}", .0, strerror(.0))]
    ProcedureFailed(u32),
}

impl RpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::Connect { .. }
            | RpcError::Io(_)
            | RpcError::TruncatedHeader { .. }
            | RpcError::TruncatedBody { .. } => ErrorKind::Transport,
            RpcError::MalformedReply(_)
            | RpcError::UnexpectedMessageType(_)
            | RpcError::UnknownReplyStatus(_)
            | RpcError::UnexpectedTransactionId { .. } => ErrorKind::Framing,
            RpcError::VersionMismatch { .. }
            | RpcError::AuthRejected(_)
            | RpcError::UnknownDenyReason(_) => ErrorKind::Denied,
            RpcError::ProgramUnavailable
            | RpcError::ProgramVersionMismatch { .. }
            | RpcError::ProcedureUnavailable
            | RpcError::MalformedArguments
            | RpcError::UnknownAcceptStatus(_) => ErrorKind::Rejected,
            RpcError::ProcedureFailed(_) => ErrorKind::Application,
        }
    }

    /// True when the peer closed the stream in the middle of a record.
    pub fn is_truncation(&self) -> bool {
        matches!(self, RpcError::TruncatedHeader { .. } | RpcError::TruncatedBody { .. })
    }

    /// The authentication failure reason of an `AuthRejected` error, when
    /// the code is one RFC 5531 defines.
    pub fn auth_stat(&self) -> Option<auth_stat> {
        match self {
            RpcError::AuthRejected(code) => auth_stat::from_u32(*code),
            _ => None,
        }
    }
}

/// Procedure status words follow errno numbering in practice.
fn strerror(code: &u32) -> String {
    match i32::try_from(*code) {
        Ok(code) => std::io::Error::from_raw_os_error(code).to_string(),
        Err(_) => "unknown error".to_string(),
    }
}
