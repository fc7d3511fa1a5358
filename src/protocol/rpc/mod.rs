//! Client side of the RPC protocol as specified in RFC 5531 (previously RFC 1057).
//!
//! The pieces of a call, in the order they run:
//!
//! 1. `xid`: per-connection transaction identifiers
//! 2. `call`: call header and argument encoding
//! 3. `wire`: Record Marking framing over a stream transport
//! 4. `reply`: reply header decoding and accept/deny classification
//!
//! All failures are reported through [`RpcError`].

mod call;
mod error;
mod reply;
mod wire;
mod xid;

pub use call::{encode_call, encode_call_args, write_call_header, CallHeader};
pub use error::{ErrorKind, Result, RpcError};
pub use reply::{decode_reply, decode_reply_for, Reply};
pub use wire::{
    fragment_header, read_fragment, read_record, write_fragments, write_record, RecordStream,
    FRAGMENT_HEADER_SIZE, LAST_FRAGMENT, MAX_FRAGMENT_SIZE,
};
pub use xid::XidGenerator;
