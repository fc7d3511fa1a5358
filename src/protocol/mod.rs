//! Protocol module implements the client side of ONC RPC version 2.
//!
//! - `xdr`: External Data Representation (XDR) serialization and
//!   deserialization according to RFC 4506 (previously RFC 1832), plus the
//!   RPC message structures.
//!
//! - `rpc`: the call engine: transaction ids, call encoding, record
//!   marking and reply classification as defined in RFC 5531.

pub mod rpc;
pub mod xdr;
