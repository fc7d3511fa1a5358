use std::io::Cursor;

mod support;

use oncrpc_client::protocol::rpc::{
    self, fragment_header, read_fragment, read_record, write_fragments, write_record,
    RecordStream, LAST_FRAGMENT,
};
use oncrpc_client::RpcError;

use support::{MockTransport, TrickleReader};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Splits a framed byte stream into (is_last, length) per fragment.
fn fragment_headers(mut framed: &[u8]) -> Vec<(bool, usize)> {
    let mut headers = Vec::new();
    while !framed.is_empty() {
        let header = u32::from_be_bytes(framed[..4].try_into().unwrap());
        let length = (header & !LAST_FRAGMENT) as usize;
        headers.push((header & LAST_FRAGMENT != 0, length));
        framed = &framed[4 + length..];
    }
    headers
}

#[test]
fn single_fragment_record_layout() {
    let mut framed = Vec::new();
    write_record(&mut framed, b"hello").expect("write record");
    assert_eq!(framed, [0x80, 0, 0, 5, b'h', b'e', b'l', b'l', b'o']);
}

#[test]
fn empty_record_is_one_empty_last_fragment() {
    let mut framed = Vec::new();
    write_record(&mut framed, &[]).expect("write record");
    assert_eq!(framed, [0x80, 0, 0, 0]);

    let record = read_record(&mut framed.as_slice()).expect("read record");
    assert!(record.is_empty());
}

#[test]
fn fragment_header_encoding() {
    assert_eq!(fragment_header(0, false), [0, 0, 0, 0]);
    assert_eq!(fragment_header(5000, false), 5000u32.to_be_bytes());
    assert_eq!(fragment_header(0x7FFF_FFFF, true), [0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn multi_fragment_round_trip() {
    for (len, max_fragment) in [(1, 1), (100, 7), (70_000, 16_384), (65_536, 65_536)] {
        let buf = pattern(len);
        let mut framed = Vec::new();
        write_fragments(&mut framed, &buf, max_fragment).expect("write fragments");

        let headers = fragment_headers(&framed);
        assert_eq!(headers.len(), len.div_ceil(max_fragment));
        let (last, rest) = headers.split_last().unwrap();
        assert!(last.0);
        assert!(rest.iter().all(|&(is_last, size)| !is_last && size == max_fragment));

        assert_eq!(read_record(&mut framed.as_slice()).expect("read record"), buf);
    }
}

#[test]
fn large_record_round_trip() {
    let buf = pattern(200_000);
    let mut framed = Vec::new();
    write_record(&mut framed, &buf).expect("write record");
    assert_eq!(fragment_headers(&framed), [(true, 200_000)]);
    assert_eq!(read_record(&mut framed.as_slice()).expect("read record"), buf);
}

#[test]
fn read_fragment_reports_last_flag_and_appends() {
    let mut framed = Vec::new();
    framed.extend_from_slice(&fragment_header(3, false));
    framed.extend_from_slice(b"abc");
    framed.extend_from_slice(&fragment_header(2, true));
    framed.extend_from_slice(b"de");

    let mut src = framed.as_slice();
    let mut record = b"xy".to_vec();
    assert!(!read_fragment(&mut src, &mut record).expect("first fragment"));
    assert_eq!(record, b"xyabc");
    assert!(read_fragment(&mut src, &mut record).expect("second fragment"));
    assert_eq!(record, b"xyabcde");
}

#[test]
fn reassembles_across_partial_reads() {
    let buf = pattern(10_000);
    let mut framed = Vec::new();
    write_fragments(&mut framed, &buf, 3_000).expect("write fragments");

    for chunk in [1, 3, 5, 4096] {
        let mut src = TrickleReader { inner: framed.as_slice(), chunk };
        assert_eq!(read_record(&mut src).expect("read record"), buf);
    }
}

#[test]
fn records_are_read_one_at_a_time() {
    let mut framed = Vec::new();
    write_record(&mut framed, b"first").expect("write record");
    write_fragments(&mut framed, b"second", 4).expect("write fragments");

    let mut src = Cursor::new(framed);
    assert_eq!(read_record(&mut src).expect("first"), b"first");
    assert_eq!(read_record(&mut src).expect("second"), b"second");
    assert!(matches!(read_record(&mut src), Err(RpcError::TruncatedHeader { received: 0 })));
}

#[test]
fn truncated_header() {
    let framed = fragment_header(8, true);
    for received in 0..4 {
        let err = read_record(&mut &framed[..received]).expect_err("short header accepted");
        assert!(err.is_truncation());
        match err {
            RpcError::TruncatedHeader { received: got } => assert_eq!(got, received),
            other => panic!("expected TruncatedHeader, got {other:?}"),
        }
    }
}

#[test]
fn truncated_body() {
    let mut framed = Vec::new();
    write_record(&mut framed, &pattern(10)).expect("write record");

    for cut in 4..framed.len() {
        let mut src = TrickleReader { inner: &framed[..cut], chunk: 3 };
        match read_record(&mut src) {
            Err(RpcError::TruncatedBody { expected, received }) => {
                assert_eq!(expected, 10);
                assert_eq!(received, cut - 4);
            }
            other => panic!("expected TruncatedBody, got {other:?}"),
        }
    }
}

#[test]
fn peer_closed_between_fragments() {
    let mut framed = Vec::new();
    framed.extend_from_slice(&fragment_header(4, false));
    framed.extend_from_slice(b"abcd");

    let err = read_record(&mut framed.as_slice()).expect_err("incomplete record accepted");
    assert!(matches!(err, RpcError::TruncatedHeader { received: 0 }));
    assert_eq!(err.kind(), rpc::ErrorKind::Transport);
}

#[test]
fn record_stream_send_and_receive() {
    let mut reply = Vec::new();
    write_fragments(&mut reply, b"reply bytes", 5).expect("write fragments");

    let mut stream = RecordStream::new(MockTransport::new(reply));
    stream.send(b"call").expect("send");
    assert_eq!(stream.receive().expect("receive"), b"reply bytes");

    let transport = stream.into_inner();
    assert_eq!(transport.output, [0x80, 0, 0, 4, b'c', b'a', b'l', b'l']);
}
