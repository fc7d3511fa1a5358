#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

use oncrpc_client::protocol::rpc::{self, FRAGMENT_HEADER_SIZE};
use oncrpc_client::xdr::rpc::{
    accept_body, accepted_reply_message, call_body, rejected_reply, rejected_reply_message,
    rpc_msg,
};
use oncrpc_client::xdr::{deserialize, Serialize};

/// In-memory transport: reads come from a prepared byte string, writes
/// are collected.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub input: Cursor<Vec<u8>>,
    pub output: Vec<u8>,
}

impl MockTransport {
    pub fn new(input: Vec<u8>) -> Self {
        Self { input: Cursor::new(input), output: Vec::new() }
    }

    /// Records written by the client so far.
    pub fn sent_records(&self) -> Vec<Vec<u8>> {
        let mut src = Cursor::new(self.output.as_slice());
        let mut records = Vec::new();
        while (src.position() as usize) < self.output.len() {
            records.push(rpc::read_record(&mut src).expect("read sent record"));
        }
        records
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reader that hands out at most `chunk` bytes per `read` call.
pub struct TrickleReader<R> {
    pub inner: R,
    pub chunk: usize,
}

impl<R: Read> Read for TrickleReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..len])
    }
}

/// Serialized reply message followed by raw result bytes.
pub fn reply_record(msg: &rpc_msg, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    msg.serialize(&mut buf).expect("serialize reply");
    buf.extend_from_slice(payload);
    buf
}

pub fn success_record(xid: u32, payload: &[u8]) -> Vec<u8> {
    reply_record(&accepted_reply_message(xid, accept_body::SUCCESS), payload)
}

pub fn denied_record(xid: u32, reason: rejected_reply) -> Vec<u8> {
    reply_record(&rejected_reply_message(xid, reason), &[])
}

/// Reply header built from raw words, for status values the message
/// types cannot express.
pub fn raw_record(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// `record` framed as a single last fragment.
pub fn framed(record: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    rpc::write_record(&mut buf, record).expect("frame record");
    buf
}

/// `record` framed as two fragments split at `at`.
pub fn framed_split(record: &[u8], at: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(record.len() + 2 * FRAGMENT_HEADER_SIZE);
    buf.extend_from_slice(&rpc::fragment_header(at, false));
    buf.extend_from_slice(&record[..at]);
    buf.extend_from_slice(&rpc::fragment_header(record.len() - at, true));
    buf.extend_from_slice(&record[at..]);
    buf
}

/// Decoded call: xid, message type, call body and the argument bytes.
pub struct ParsedCall {
    pub xid: u32,
    pub msg_type: u32,
    pub body: call_body,
    pub args: Vec<u8>,
}

pub fn parse_call(record: &[u8]) -> ParsedCall {
    let mut src = Cursor::new(record);
    let xid = deserialize::<u32>(&mut src).expect("xid");
    let msg_type = deserialize::<u32>(&mut src).expect("msg_type");
    let body = deserialize::<call_body>(&mut src).expect("call_body");
    let args = record[src.position() as usize..].to_vec();
    ParsedCall { xid, msg_type, body, args }
}

/// Runs `serve` on the first connection accepted on a loopback port.
pub fn spawn_peer<F>(serve: F) -> (u16, JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();
    let handle = std::thread::spawn(move || {
        let (socket, _) = listener.accept().expect("accept");
        serve(socket);
    });
    (port, handle)
}
