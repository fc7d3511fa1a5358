//! Client construction parameters.

use std::time::Duration;

use crate::protocol::xdr::rpc::opaque_auth;

/// Everything a [`Client`](crate::client::Client) needs to reach one RPC
/// program on one server.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Host name or IP address of the server
    pub address: String,
    /// TCP port the program listens on
    pub port: u16,
    /// RPC program number
    pub program: u32,
    /// RPC program version
    pub version: u32,
    /// Credential sent with every call
    pub credential: opaque_auth,
    /// Verifier sent with every call
    pub verifier: opaque_auth,
    /// Read and write deadline on the socket; `None` blocks indefinitely
    pub timeout: Option<Duration>,
    /// Reject replies whose xid differs from the call's
    pub check_xid: bool,
}

impl ClientConfig {
    /// A configuration with `AUTH_NULL` credential and verifier, no
    /// timeout and xid checking enabled.
    pub fn new(address: impl Into<String>, program: u32, version: u32, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            program,
            version,
            credential: opaque_auth::null(),
            verifier: opaque_auth::null(),
            timeout: None,
            check_xid: true,
        }
    }

    pub fn with_credential(mut self, credential: opaque_auth) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_verifier(mut self, verifier: opaque_auth) -> Self {
        self.verifier = verifier;
        self
    }

    /// Sets the socket read and write deadline. A zero duration is
    /// refused by the socket, so connecting fails with `RpcError::Io`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_xid_check(mut self, check_xid: bool) -> Self {
        self.check_xid = check_xid;
        self
    }

    /// `address:port` as passed to the resolver.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
