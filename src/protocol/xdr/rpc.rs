//! Data structures of the Remote Procedure Call (RPC) message protocol
//! as defined in RFC 5531 (previously RFC 1057).
//!
//! The client only ever serializes calls and decodes replies, but reply
//! types are serializable too so that a peer can answer with them.

// Keep RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::io::Write;

use num_derive::{FromPrimitive, ToPrimitive};

use super::*;

/// The only version of the RPC protocol in existence.
pub const RPC_VERSION: u32 = 2;

/// `msg_type` discriminant of a call message.
pub const CALL: u32 = 0;
/// `msg_type` discriminant of a reply message.
pub const REPLY: u32 = 1;

/// `reply_stat`: the call was accepted for execution.
pub const MSG_ACCEPTED: u32 = 0;
/// `reply_stat`: the call was refused.
pub const MSG_DENIED: u32 = 1;

/// `accept_stat` values.
pub const SUCCESS: u32 = 0;
pub const PROG_UNAVAIL: u32 = 1;
pub const PROG_MISMATCH: u32 = 2;
pub const PROC_UNAVAIL: u32 = 3;
pub const GARBAGE_ARGS: u32 = 4;
pub const SYSTEM_ERR: u32 = 5;

/// `reject_stat` values.
pub const RPC_MISMATCH: u32 = 0;
pub const AUTH_ERROR: u32 = 1;

/// Authentication status codes indicating why authentication failed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum auth_stat {
    /// Success, never sent in a denial
    AUTH_OK = 0,
    /// Bad credentials (seal broken)
    #[default]
    AUTH_BADCRED = 1,
    /// Client must begin a new session
    AUTH_REJECTEDCRED = 2,
    /// Bad verifier (seal broken)
    AUTH_BADVERF = 3,
    /// Verifier expired or replayed
    AUTH_REJECTEDVERF = 4,
    /// Rejected for security reasons
    AUTH_TOOWEAK = 5,
    /// Bogus response verifier
    AUTH_INVALIDRESP = 6,
    /// Reason unknown
    AUTH_FAILED = 7,
}
SerializeEnum!(auth_stat);
DeserializeEnum!(auth_stat);

/// Authentication flavor (mechanism) identifiers for RPC
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum auth_flavor {
    /// No authentication
    #[default]
    AUTH_NULL = 0,
    /// UNIX-style authentication (uid/gid)
    AUTH_UNIX = 1,
    /// Short-form authentication
    AUTH_SHORT = 2,
    /// DES authentication
    AUTH_DES = 3,
    /// RPCSEC_GSS
    RPCSEC_GSS = 6,
}
SerializeEnum!(auth_flavor);
DeserializeEnum!(auth_flavor);

/// Authentication data attached to calls (credential and verifier) and
/// to accepted replies (verifier).
///
/// The body is interpreted according to the flavor. Only `AUTH_NULL`,
/// whose body is empty, is produced by this crate; any other pair is
/// carried through to the wire untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct opaque_auth {
    /// The authentication mechanism being used
    pub flavor: auth_flavor,
    /// The opaque authentication data associated with that mechanism
    pub body: Vec<u8>,
}
DeserializeStruct!(opaque_auth, flavor, body);
SerializeStruct!(opaque_auth, flavor, body);

impl opaque_auth {
    /// The `AUTH_NULL` credential: null flavor, empty body.
    pub fn null() -> opaque_auth {
        opaque_auth::default()
    }

    pub fn new(flavor: auth_flavor, body: Vec<u8>) -> opaque_auth {
        opaque_auth { flavor, body }
    }
}

/// RPC message: a transaction identifier followed by a CALL or REPLY body.
///
/// Clients use the xid to match a reply with the call that produced it.
/// It is not a sequence number as far as the server is concerned.
#[derive(Clone, Debug, Default)]
pub struct rpc_msg {
    /// Transaction identifier used to match calls and replies
    pub xid: u32,
    /// The body of the RPC message (call or reply)
    pub body: rpc_body,
}
SerializeStruct!(rpc_msg, xid, body);

/// The body of an RPC message, which can be either a call or a reply
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug)]
pub enum rpc_body {
    /// A call to a remote procedure
    CALL(call_body),
    /// A reply from a remote procedure
    REPLY(reply_body),
}

impl Default for rpc_body {
    fn default() -> rpc_body {
        rpc_body::CALL(call_body::default())
    }
}

impl Serialize for rpc_body {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            rpc_body::CALL(v) => {
                CALL.serialize(dest)?;
                v.serialize(dest)
            }
            rpc_body::REPLY(v) => {
                REPLY.serialize(dest)?;
                v.serialize(dest)
            }
        }
    }
}

/// The body of an RPC call. Procedure specific parameters follow it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct call_body {
    /// RPC version, must be 2
    pub rpcvers: u32,
    /// The program to call
    pub prog: u32,
    /// The version of the program
    pub vers: u32,
    /// The procedure within the program to call
    pub proc: u32,
    /// Authentication credentials for the caller
    pub cred: opaque_auth,
    /// Authentication verifier for the caller
    pub verf: opaque_auth,
}
DeserializeStruct!(call_body, rpcvers, prog, vers, proc, cred, verf);
SerializeStruct!(call_body, rpcvers, prog, vers, proc, cred, verf);

/// The body of an RPC reply, indicating whether the call was accepted or denied
#[derive(Clone, Debug)]
pub enum reply_body {
    /// The call was accepted
    MSG_ACCEPTED(accepted_reply),
    /// The call was denied
    MSG_DENIED(rejected_reply),
}

impl Serialize for reply_body {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            reply_body::MSG_ACCEPTED(v) => {
                MSG_ACCEPTED.serialize(dest)?;
                v.serialize(dest)
            }
            reply_body::MSG_DENIED(v) => {
                MSG_DENIED.serialize(dest)?;
                v.serialize(dest)
            }
        }
    }
}

/// Range of versions supported by the remote side
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct mismatch_info {
    /// Lowest version supported
    pub low: u32,
    /// Highest version supported
    pub high: u32,
}
DeserializeStruct!(mismatch_info, low, high);
SerializeStruct!(mismatch_info, low, high);

/// Reply to an RPC call that was accepted by the server.
///
/// Acceptance only means the server authenticated the caller; the
/// `reply_data` arm tells whether the procedure actually ran.
#[derive(Clone, Debug, Default)]
pub struct accepted_reply {
    /// Authentication verifier from server
    pub verf: opaque_auth,
    /// Reply data union discriminated by accept_stat
    pub reply_data: accept_body,
}
SerializeStruct!(accepted_reply, verf, reply_data);

/// Outcome of an accepted call, discriminated by `accept_stat`.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug, Default)]
pub enum accept_body {
    /// Call completed successfully, procedure results follow
    #[default]
    SUCCESS,
    /// Program is not available on this server
    PROG_UNAVAIL,
    /// Program version mismatch, includes supported version range
    PROG_MISMATCH(mismatch_info),
    /// Requested procedure is not available
    PROC_UNAVAIL,
    /// Server could not decode the call arguments
    GARBAGE_ARGS,
    /// Memory allocation failure or similar on the server
    SYSTEM_ERR,
}

impl Serialize for accept_body {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            accept_body::SUCCESS => SUCCESS.serialize(dest),
            accept_body::PROG_UNAVAIL => PROG_UNAVAIL.serialize(dest),
            accept_body::PROG_MISMATCH(v) => {
                PROG_MISMATCH.serialize(dest)?;
                v.serialize(dest)
            }
            accept_body::PROC_UNAVAIL => PROC_UNAVAIL.serialize(dest),
            accept_body::GARBAGE_ARGS => GARBAGE_ARGS.serialize(dest),
            accept_body::SYSTEM_ERR => SYSTEM_ERR.serialize(dest),
        }
    }
}

/// Reply sent when the server refuses the call.
///
/// Either the server does not speak RPC version 2 (`RPC_MISMATCH`, with
/// the range it does speak), or it refuses to authenticate the caller
/// (`AUTH_ERROR`).
#[derive(Clone, Debug)]
pub enum rejected_reply {
    /// RPC version mismatch - includes supported version range
    RPC_MISMATCH(mismatch_info),
    /// Authentication failed - includes specific error code
    AUTH_ERROR(auth_stat),
}

impl Serialize for rejected_reply {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            rejected_reply::RPC_MISMATCH(v) => {
                RPC_MISMATCH.serialize(dest)?;
                v.serialize(dest)
            }
            rejected_reply::AUTH_ERROR(v) => {
                AUTH_ERROR.serialize(dest)?;
                v.serialize(dest)
            }
        }
    }
}

/// Builds a reply message accepted with the given outcome and a null verifier.
pub fn accepted_reply_message(xid: u32, reply_data: accept_body) -> rpc_msg {
    let reply =
        reply_body::MSG_ACCEPTED(accepted_reply { verf: opaque_auth::null(), reply_data });
    rpc_msg { xid, body: rpc_body::REPLY(reply) }
}

/// Builds a reply message denying the call.
pub fn rejected_reply_message(xid: u32, reason: rejected_reply) -> rpc_msg {
    rpc_msg { xid, body: rpc_body::REPLY(reply_body::MSG_DENIED(reason)) }
}
