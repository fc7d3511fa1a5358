//! Call message encoding.
//!
//! A call is the fixed header of RFC 5531 followed by the procedure
//! arguments. Arguments are appended by caller supplied encoders, in the
//! order given; the engine never interprets them.

use std::io::Write;

use crate::protocol::xdr::rpc::{call_body, opaque_auth, rpc_body, rpc_msg, RPC_VERSION};
use crate::protocol::xdr::Serialize;

/// Header fields of a call that vary between calls and clients.
#[derive(Clone, Copy, Debug)]
pub struct CallHeader<'a> {
    pub xid: u32,
    pub prog: u32,
    pub vers: u32,
    pub proc: u32,
    pub cred: &'a opaque_auth,
    pub verf: &'a opaque_auth,
}

/// Writes the call header.
///
/// Field order: xid, `CALL`, RPC version 2, program, version, procedure,
/// credential and verifier (each a flavor followed by opaque data).
pub fn write_call_header(header: &CallHeader<'_>, dest: &mut impl Write) -> std::io::Result<()> {
    let msg = rpc_msg {
        xid: header.xid,
        body: rpc_body::CALL(call_body {
            rpcvers: RPC_VERSION,
            prog: header.prog,
            vers: header.vers,
            proc: header.proc,
            cred: header.cred.clone(),
            verf: header.verf.clone(),
        }),
    };
    msg.serialize(dest)
}

/// Encodes a whole call into a freshly allocated buffer.
///
/// `write_args` runs after the header and appends the procedure arguments
/// to the same buffer.
pub fn encode_call<F>(header: &CallHeader<'_>, write_args: F) -> std::io::Result<Vec<u8>>
where
    F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
{
    let mut buf = Vec::with_capacity(DEFAULT_CALL_BUFFER_CAPACITY);
    write_call_header(header, &mut buf)?;
    write_args(&mut buf)?;
    Ok(buf)
}

/// Encodes a call whose arguments are a single serializable value; tuples
/// serialize their elements in order.
pub fn encode_call_args<A: Serialize + ?Sized>(
    header: &CallHeader<'_>,
    args: &A,
) -> std::io::Result<Vec<u8>> {
    encode_call(header, |buf| args.serialize(buf))
}

/// Initial size of a call buffer; the header alone is at least 40 bytes.
const DEFAULT_CALL_BUFFER_CAPACITY: usize = 512;
