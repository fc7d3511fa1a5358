//! Blocking ONC RPC client over a stream transport.
//!
//! A [`Client`] owns one connection and performs one call at a time:
//! encode the call, send it as a record, block until the reply record is
//! complete, then classify the reply header. There is no internal
//! concurrency and no retry; callers that need parallel calls open one
//! client per caller, and callers that need a deadline set one on the
//! socket (see [`ClientConfig::timeout`]).
//!
//! A call that fails with a transport error (see [`ErrorKind::Transport`])
//! may leave part of a record unread or unwritten. The stream is then out
//! of step with the server and the client must be dropped; open a new
//! connection instead of calling again.
//!
//! [`ErrorKind::Transport`]: crate::protocol::rpc::ErrorKind::Transport

use std::io::{Read, Write};
use std::net::TcpStream;

use tracing::debug;

use crate::config::ClientConfig;
use crate::protocol::rpc::{self, CallHeader, RecordStream, Reply, RpcError, XidGenerator};
use crate::protocol::xdr::rpc::opaque_auth;
use crate::protocol::xdr::Serialize;

/// RPC client bound to one program and version on one server.
#[derive(Debug)]
pub struct Client<T = TcpStream> {
    stream: RecordStream<T>,
    program: u32,
    version: u32,
    credential: opaque_auth,
    verifier: opaque_auth,
    check_xid: bool,
    xids: XidGenerator,
}

impl Client<TcpStream> {
    /// Connects to `config.address:config.port` over TCP.
    pub fn connect(config: &ClientConfig) -> rpc::Result<Self> {
        let connect_err = |source| RpcError::Connect { addr: config.server_addr(), source };

        let socket =
            TcpStream::connect((config.address.as_str(), config.port)).map_err(connect_err)?;
        let _ = socket.set_nodelay(true);
        socket.set_read_timeout(config.timeout)?;
        socket.set_write_timeout(config.timeout)?;

        debug!(
            "Connected to RPC server {} for program {} version {}",
            config.server_addr(),
            config.program,
            config.version
        );
        Ok(Self::with_transport(socket, config))
    }
}

impl<T: Read + Write> Client<T> {
    /// Wraps an already connected transport. Address, port and timeout in
    /// `config` are not used.
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self::with_xid_generator(transport, config, XidGenerator::new())
    }

    /// Like [`Client::with_transport`], with the xid counter starting at
    /// `seed`; the first call uses `seed + 1`.
    pub fn with_xid_seed(transport: T, config: &ClientConfig, seed: u32) -> Self {
        Self::with_xid_generator(transport, config, XidGenerator::with_seed(seed))
    }

    fn with_xid_generator(transport: T, config: &ClientConfig, xids: XidGenerator) -> Self {
        Self {
            stream: RecordStream::new(transport),
            program: config.program,
            version: config.version,
            credential: config.credential.clone(),
            verifier: config.verifier.clone(),
            check_xid: config.check_xid,
            xids,
        }
    }

    /// Calls `procedure` with `args` and returns the successful reply,
    /// positioned at the procedure results.
    ///
    /// Use `()` for a procedure without arguments and a tuple for an
    /// ordered argument list.
    pub fn call<A: Serialize + ?Sized>(&mut self, procedure: u32, args: &A) -> rpc::Result<Reply> {
        self.call_with(procedure, |buf| args.serialize(buf))
    }

    /// Calls `procedure`, letting `write_args` append the encoded
    /// arguments to the call buffer after the header.
    pub fn call_with<F>(&mut self, procedure: u32, write_args: F) -> rpc::Result<Reply>
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let xid = self.xids.next_xid();
        let header = CallHeader {
            xid,
            prog: self.program,
            vers: self.version,
            proc: procedure,
            cred: &self.credential,
            verf: &self.verifier,
        };
        let call = rpc::encode_call(&header, write_args)?;
        debug!(
            "RPC call xid:{} prog:{} vers:{} proc:{} ({} bytes)",
            xid,
            self.program,
            self.version,
            procedure,
            call.len()
        );

        self.stream.send(&call)?;
        let record = self.stream.receive()?;
        rpc::decode_reply_for(record, self.check_xid.then_some(xid))
    }

    /// [`Client::call`] for procedures whose results start with a status
    /// word; a non-zero status fails with [`RpcError::ProcedureFailed`].
    pub fn call_checked<A: Serialize + ?Sized>(
        &mut self,
        procedure: u32,
        args: &A,
    ) -> rpc::Result<Reply> {
        let mut reply = self.call(procedure, args)?;
        reply.check_status()?;
        Ok(reply)
    }

    /// The xid of the most recent call.
    pub fn xid(&self) -> u32 {
        self.xids.current()
    }

    pub fn program(&self) -> u32 {
        self.program
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn credential(&self) -> &opaque_auth {
        &self.credential
    }

    pub fn verifier(&self) -> &opaque_auth {
        &self.verifier
    }

    /// Replaces the credential used by all following calls.
    pub fn set_credential(&mut self, credential: opaque_auth) {
        self.credential = credential;
    }

    /// Replaces the verifier used by all following calls.
    pub fn set_verifier(&mut self, verifier: opaque_auth) {
        self.verifier = verifier;
    }

    pub fn get_ref(&self) -> &T {
        self.stream.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.stream.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.stream.into_inner()
    }
}
