//! Reply header decoding and status classification.
//!
//! A reply is classified in two levels: the server either accepted the
//! call for execution or denied it, and an accepted call either succeeded
//! or failed for one of a fixed set of reasons. Only `MSG_ACCEPTED` +
//! `SUCCESS` yields a [`Reply`]; every other branch ends in its own
//! [`RpcError`] variant.

use std::io::{Cursor, Read};

use tracing::warn;

use super::error::{Result, RpcError};
use crate::protocol::xdr::rpc::{
    mismatch_info, AUTH_ERROR, GARBAGE_ARGS, MSG_ACCEPTED, MSG_DENIED, PROC_UNAVAIL,
    PROG_MISMATCH, PROG_UNAVAIL, REPLY, RPC_MISMATCH, SUCCESS,
};
use crate::protocol::xdr::{self, Deserialize};

/// Successful reply: header fields plus the not yet decoded results.
#[derive(Debug)]
pub struct Reply {
    xid: u32,
    verifier_flavor: u32,
    verifier_body: Vec<u8>,
    payload: Cursor<Vec<u8>>,
}

impl Reply {
    /// Transaction id echoed by the server.
    pub fn xid(&self) -> u32 {
        self.xid
    }

    /// Flavor of the server's response verifier.
    pub fn verifier_flavor(&self) -> u32 {
        self.verifier_flavor
    }

    pub fn verifier_body(&self) -> &[u8] {
        &self.verifier_body
    }

    /// Decodes the next result value.
    pub fn decode<T: Deserialize + Default>(&mut self) -> std::io::Result<T> {
        xdr::deserialize(&mut self.payload)
    }

    /// Consumes the leading status word most procedures put in front of
    /// their results and fails with [`RpcError::ProcedureFailed`] unless
    /// it is zero.
    pub fn check_status(&mut self) -> Result<()> {
        let status = self.decode::<u32>().map_err(RpcError::MalformedReply)?;
        if status != SUCCESS {
            warn!("xid {}: procedure returned status {}", self.xid, status);
            return Err(RpcError::ProcedureFailed(status));
        }
        Ok(())
    }

    /// Result bytes not consumed yet.
    pub fn remaining(&self) -> &[u8] {
        let position = (self.payload.position() as usize).min(self.payload.get_ref().len());
        &self.payload.get_ref()[position..]
    }

    pub fn into_payload(self) -> Vec<u8> {
        let position = self.payload.position() as usize;
        let mut payload = self.payload.into_inner();
        payload.drain(..position.min(payload.len()));
        payload
    }
}

impl Read for Reply {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.payload.read(buf)
    }
}

/// Reads one header field; running out of bytes here means the reply is
/// not a well formed RPC message.
fn field<T: Deserialize + Default>(src: &mut impl Read) -> Result<T> {
    xdr::deserialize(src).map_err(RpcError::MalformedReply)
}

/// Decodes the header of a reassembled reply record.
///
/// On success the returned [`Reply`] is positioned at the first byte of
/// the procedure results.
pub fn decode_reply(record: Vec<u8>) -> Result<Reply> {
    decode_reply_for(record, None)
}

/// Like [`decode_reply`], but fails with
/// [`RpcError::UnexpectedTransactionId`] before looking at any status
/// field when the reply's xid is not `expected_xid`.
pub fn decode_reply_for(record: Vec<u8>, expected_xid: Option<u32>) -> Result<Reply> {
    let mut src = Cursor::new(record);

    let xid = field::<u32>(&mut src)?;
    if let Some(expected) = expected_xid.filter(|expected| *expected != xid) {
        return Err(failed(xid, RpcError::UnexpectedTransactionId { expected, actual: xid }));
    }
    let msg_type = field::<u32>(&mut src)?;
    if msg_type != REPLY {
        return Err(failed(xid, RpcError::UnexpectedMessageType(msg_type)));
    }

    match field::<u32>(&mut src)? {
        MSG_ACCEPTED => {}
        MSG_DENIED => return Err(failed(xid, decode_denial(&mut src)?)),
        reply_stat => return Err(failed(xid, RpcError::UnknownReplyStatus(reply_stat))),
    }

    let verifier_flavor = field::<u32>(&mut src)?;
    let verifier_body = field::<Vec<u8>>(&mut src)?;

    let err = match field::<u32>(&mut src)? {
        SUCCESS => {
            return Ok(Reply { xid, verifier_flavor, verifier_body, payload: src });
        }
        PROG_UNAVAIL => RpcError::ProgramUnavailable,
        PROG_MISMATCH => {
            let mismatch_info { low, high } = field(&mut src)?;
            RpcError::ProgramVersionMismatch { low, high }
        }
        PROC_UNAVAIL => RpcError::ProcedureUnavailable,
        GARBAGE_ARGS => RpcError::MalformedArguments,
        accept_stat => RpcError::UnknownAcceptStatus(accept_stat),
    };
    Err(failed(xid, err))
}

/// Decodes the `rejected_reply` arm of a denied call into its error.
fn decode_denial(src: &mut impl Read) -> Result<RpcError> {
    Ok(match field::<u32>(src)? {
        RPC_MISMATCH => {
            let mismatch_info { low, high } = field(src)?;
            RpcError::VersionMismatch { low, high }
        }
        AUTH_ERROR => RpcError::AuthRejected(field::<u32>(src)?),
        reject_stat => RpcError::UnknownDenyReason(reject_stat),
    })
}

fn failed(xid: u32, err: RpcError) -> RpcError {
    warn!("xid {}: {}", xid, err);
    err
}
