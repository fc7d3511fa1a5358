//! A blocking ONC RPC (Sun RPC version 2) client for stream transports.
//!
//! The crate builds call messages, frames them with the Record Marking
//! Standard, reassembles the framed reply and classifies its status into
//! a typed outcome. Procedure arguments and results are encoded with the
//! XDR codec in [`xdr`].
//!
//! ## Main Components
//!
//! - `client`: [`Client`], one connection, one call in flight at a time.
//!
//! - `config`: [`ClientConfig`], server address, port, program, version
//!   and the credential sent with every call.
//!
//! - `protocol`: XDR encoding and the RPC engine (xid generation, call
//!   encoding, record marking, reply classification).
//!
//! ## Standards Compliance
//!
//! - RFC 5531: RPC: Remote Procedure Call Protocol Specification Version 2 (obsoletes RFC 1831)
//! - RFC 4506: XDR: External Data Representation Standard (obsoletes RFC 1832)
//!
//! Only the `AUTH_NULL` flavor is produced; other credentials are carried
//! as opaque data.
//!
//! ## Usage
//!
//! ```ignore
//! let config = ClientConfig::new("127.0.0.1", 100003, 3, 2049);
//! let mut client = Client::connect(&config)?;
//! client.call(0, &())?;
//! ```

pub mod client;
pub mod config;
pub mod protocol;

pub use client::Client;
pub use config::ClientConfig;
pub use protocol::rpc::{ErrorKind, Reply, RpcError};
pub use protocol::xdr;
