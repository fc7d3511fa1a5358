//! RPC message framing as specified in RFC 5531 section 11 (Record Marking Standard).
//!
//! A stream transport has no message boundaries, so every RPC message is
//! sent as a record: one or more fragments, each prefixed by a 4-byte big
//! endian header. The highest bit of the header marks the last fragment of
//! the record, the lower 31 bits hold the fragment length.
//!
//! Outgoing calls are always written as a single fragment unless they
//! exceed the 31-bit length field. Incoming replies may arrive split over
//! any number of fragments and are reassembled here.

use std::io::{Read, Write};

use tracing::trace;

use super::error::{Result, RpcError};

/// Last-fragment flag in a fragment header.
pub const LAST_FRAGMENT: u32 = 1 << 31;
/// Maximum fragment size is 2^31 - 1 bytes.
pub const MAX_FRAGMENT_SIZE: usize = (1 << 31) - 1;
/// Size of a fragment header on the wire.
pub const FRAGMENT_HEADER_SIZE: usize = 4;

/// Encodes a fragment header.
pub fn fragment_header(length: usize, is_last: bool) -> [u8; FRAGMENT_HEADER_SIZE] {
    debug_assert!(length <= MAX_FRAGMENT_SIZE);
    let length = length as u32 & !LAST_FRAGMENT;
    let header = if is_last { length | LAST_FRAGMENT } else { length };
    header.to_be_bytes()
}

/// Reads until `buf` is full or the stream ends, returning the number of
/// bytes actually read.
fn read_full(src: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads a single record-marked fragment from a stream
///
/// Appends the fragment payload to `append_to` and returns true if this was
/// the last fragment of the record.
///
/// Fails with [`RpcError::TruncatedHeader`] if the stream ends before all
/// 4 header bytes arrived, and with [`RpcError::TruncatedBody`] if it ends
/// before the declared payload length has been delivered.
pub fn read_fragment(src: &mut impl Read, append_to: &mut Vec<u8>) -> Result<bool> {
    let mut header_buf = [0_u8; FRAGMENT_HEADER_SIZE];
    let received = read_full(src, &mut header_buf)?;
    if received < FRAGMENT_HEADER_SIZE {
        return Err(RpcError::TruncatedHeader { received });
    }

    let fragment_header = u32::from_be_bytes(header_buf);
    let is_last = (fragment_header & LAST_FRAGMENT) != 0;
    let length = (fragment_header & !LAST_FRAGMENT) as usize;
    trace!("Reading fragment length:{}, last:{}", length, is_last);

    // Buffer growth follows the bytes that actually arrive, so a bogus
    // length does not allocate up front.
    let received = src.by_ref().take(length as u64).read_to_end(append_to)?;
    if received < length {
        return Err(RpcError::TruncatedBody { expected: length, received });
    }

    trace!("Finishing Reading fragment length:{}, last:{}", length, is_last);
    Ok(is_last)
}

/// Reads fragments until the last one of a record and returns the
/// concatenated payload.
pub fn read_record(src: &mut impl Read) -> Result<Vec<u8>> {
    let mut record = Vec::new();
    while !read_fragment(src, &mut record)? {}
    Ok(record)
}

/// Writes `buf` as a record of fragments holding at most `max_fragment`
/// bytes each.
///
/// Each fragment goes out as one write of header plus payload. An empty
/// buffer is written as a single empty last fragment.
pub fn write_fragments(dest: &mut impl Write, buf: &[u8], max_fragment: usize) -> Result<()> {
    let max_fragment = max_fragment.clamp(1, MAX_FRAGMENT_SIZE);

    let mut offset = 0;
    loop {
        let fragment_size = std::cmp::min(buf.len() - offset, max_fragment);
        let is_last = offset + fragment_size >= buf.len();

        let mut fragment = Vec::with_capacity(FRAGMENT_HEADER_SIZE + fragment_size);
        fragment.extend_from_slice(&fragment_header(fragment_size, is_last));
        fragment.extend_from_slice(&buf[offset..offset + fragment_size]);
        trace!("Writing fragment length:{}, last:{}", fragment_size, is_last);
        dest.write_all(&fragment)?;

        offset += fragment_size;
        if is_last {
            break;
        }
    }

    dest.flush()?;
    Ok(())
}

/// Writes `buf` as a record, a single fragment for anything that fits the
/// 31-bit length field.
pub fn write_record(dest: &mut impl Write, buf: &[u8]) -> Result<()> {
    write_fragments(dest, buf, MAX_FRAGMENT_SIZE)
}

/// A byte stream carrying record-marked RPC messages.
///
/// Owns the transport exclusively; one record is in flight at a time.
#[derive(Debug)]
pub struct RecordStream<T> {
    inner: T,
}

impl<T: Read + Write> RecordStream<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Sends `buf` as one record.
    pub fn send(&mut self, buf: &[u8]) -> Result<()> {
        write_record(&mut self.inner, buf)
    }

    /// Blocks until a complete record has arrived and returns its payload.
    pub fn receive(&mut self) -> Result<Vec<u8>> {
        read_record(&mut self.inner)
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}
