use std::io::{Read, Write};

/// XDR items are always a multiple of four bytes long.
pub const ALIGNMENT: usize = 4;

fn padding_len(src_len: usize) -> usize {
    (ALIGNMENT - (src_len % ALIGNMENT)) % ALIGNMENT
}

/// Skips the zero bytes that follow `src_len` bytes of opaque data.
pub fn read_padding(src_len: usize, src: &mut impl Read) -> std::io::Result<()> {
    let mut padding: [u8; ALIGNMENT] = Default::default();
    src.read_exact(&mut padding[..padding_len(src_len)])
}

/// Pads `src_len` bytes of opaque data up to the next 4-byte boundary.
pub fn write_padding(src_len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    let padding: [u8; ALIGNMENT] = Default::default();
    dest.write_all(&padding[..padding_len(src_len)])
}

pub fn invalid_data(m: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, m)
}
