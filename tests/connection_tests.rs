//! Connection Tests
//!
//! End-to-end tests over loopback TCP: message reassembly from
//! arbitrary stream chunking, leftover preservation across frames,
//! and fatal-error handling.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use framewire::protocol::{build_frame, OPTION_RAW, VERSION_V1};
use framewire::{Config, FrameConnection, FrameError, FrameListener};

/// The size grid crossing every interesting width boundary for tests
const SIZES: [usize; 5] = [0, 1, 255, 256, 65536];

/// Deterministic non-repeating-ish payload so misaligned reassembly
/// cannot accidentally pass.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// One wire buffer holding a complete frame + payload per size.
fn wire_for(sizes: &[usize]) -> Vec<u8> {
    let mut wire = Vec::new();
    for &size in sizes {
        wire.extend_from_slice(&build_frame(VERSION_V1, OPTION_RAW, size as u64));
        wire.extend_from_slice(&pattern(size));
    }
    wire
}

// =============================================================================
// Message Reassembly Tests
// =============================================================================

#[test]
fn test_end_to_end_message_sizes() {
    let listener = FrameListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let conn = listener.accept().unwrap();
        for &size in &SIZES {
            conn.write(&pattern(size)).unwrap();
        }
        // Hold the socket open until the client closes, so queued
        // data is delivered rather than reset
        let _ = conn.read();
    });

    let client = FrameConnection::connect(addr).unwrap();
    for &size in &SIZES {
        let message = client.read().unwrap();
        assert_eq!(message.len(), size);
        assert_eq!(message, pattern(size));
    }

    client.close().unwrap();
    server.join().unwrap();
}

#[test]
fn test_small_chunk_reassembly() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Dribble the wire bytes out 1-3 at a time so headers, length
    // fields, and payloads all straddle stream reads
    let writer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.set_nodelay(true).unwrap();

        let wire = wire_for(&SIZES);
        let mut off = 0;
        let mut step = 1;
        while off < wire.len() {
            let end = (off + step).min(wire.len());
            stream.write_all(&wire[off..end]).unwrap();
            off = end;
            step = step % 3 + 1;
        }

        let mut done = [0u8; 1];
        let _ = stream.read(&mut done);
    });

    // A small read buffer forces the payload loop through many
    // bounded chunks as well
    let config = Config::builder().read_buffer_capacity(16).build();
    let client = FrameConnection::connect_with_config(addr, &config).unwrap();

    for &size in &SIZES {
        assert_eq!(client.read().unwrap(), pattern(size), "size {}", size);
    }

    client.close().unwrap();
    writer.join().unwrap();
}

#[test]
fn test_pipelined_frames_preserved() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Two complete frames land in one stream write; reading the first
    // message over-reads into the second, which must survive in the
    // leftover buffer
    let writer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let mut wire = Vec::new();
        wire.extend_from_slice(&build_frame(VERSION_V1, OPTION_RAW, 5));
        wire.extend_from_slice(b"first");
        wire.extend_from_slice(&build_frame(VERSION_V1, OPTION_RAW, 6));
        wire.extend_from_slice(b"second");
        stream.write_all(&wire).unwrap();

        let mut done = [0u8; 1];
        let _ = stream.read(&mut done);
    });

    let client = FrameConnection::connect(addr).unwrap();
    assert_eq!(client.read().unwrap(), b"first");
    assert_eq!(client.read().unwrap(), b"second");

    client.close().unwrap();
    writer.join().unwrap();
}

#[test]
fn test_echo_round_trip() {
    let listener = FrameListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let conn = listener.accept().unwrap();
        let message = conn.read().unwrap();
        conn.write(&message).unwrap();
        let _ = conn.read();
    });

    let client = FrameConnection::connect(addr).unwrap();
    let sent = pattern(1000);
    client.write(&sent).unwrap();
    assert_eq!(client.read().unwrap(), sent);

    client.close().unwrap();
    server.join().unwrap();
}

// =============================================================================
// Fatal Path Tests
// =============================================================================

#[test]
fn test_invalid_version_is_fatal() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // version=1, options=0, width=1
        stream.write_all(&[0x20, 0x05]).unwrap();

        let mut done = [0u8; 1];
        let _ = stream.read(&mut done);
    });

    let client = FrameConnection::connect(addr).unwrap();
    match client.read() {
        Err(FrameError::InvalidVersion(v)) => assert_eq!(v, 1),
        other => panic!("expected InvalidVersion, got {:?}", other),
    }

    // The connection is dead and refuses further use
    assert!(client.is_closed());
    assert!(matches!(client.read(), Err(FrameError::ConnectionClosed)));
    assert!(matches!(
        client.write(b"nope"),
        Err(FrameError::ConnectionClosed)
    ));

    writer.join().unwrap();
}

#[test]
fn test_invalid_options_is_fatal() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // version=0, options=1, width=1
        stream.write_all(&[0x08, 0x05]).unwrap();

        let mut done = [0u8; 1];
        let _ = stream.read(&mut done);
    });

    let client = FrameConnection::connect(addr).unwrap();
    match client.read() {
        Err(FrameError::InvalidOptions(o)) => assert_eq!(o, 1),
        other => panic!("expected InvalidOptions, got {:?}", other),
    }
    assert!(client.is_closed());

    writer.join().unwrap();
}

#[test]
fn test_buffer_exceeded_is_fatal() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut done = [0u8; 1];
        let _ = stream.read(&mut done);
    });

    // Capacity below even the 2-byte minimum header request
    let config = Config::builder().read_buffer_capacity(1).build();
    let client = FrameConnection::connect_with_config(addr, &config).unwrap();

    match client.read() {
        Err(FrameError::BufferExceeded {
            requested,
            capacity,
        }) => {
            assert_eq!(requested, 2);
            assert_eq!(capacity, 1);
        }
        other => panic!("expected BufferExceeded, got {:?}", other),
    }
    assert!(client.is_closed());

    writer.join().unwrap();
}

#[test]
fn test_eof_mid_message_is_fatal() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // Declare 100 payload bytes, deliver only 10, then hang up
        stream.write_all(&build_frame(VERSION_V1, OPTION_RAW, 100)).unwrap();
        stream.write_all(&[0xAA; 10]).unwrap();
    });

    let client = FrameConnection::connect(addr).unwrap();
    match client.read() {
        Err(FrameError::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected Io error, got {:?}", other),
    }
    assert!(client.is_closed());

    writer.join().unwrap();
}

#[test]
fn test_eof_before_message() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        drop(stream);
    });

    let client = FrameConnection::connect(addr).unwrap();
    match client.read() {
        Err(FrameError::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected Io error, got {:?}", other),
    }

    writer.join().unwrap();
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let holder = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut done = [0u8; 1];
        let _ = stream.read(&mut done);
    });

    let client = FrameConnection::connect(addr).unwrap();
    assert!(!client.is_closed());

    client.close().unwrap();
    client.close().unwrap();
    assert!(client.is_closed());

    assert!(matches!(client.read(), Err(FrameError::ConnectionClosed)));
    assert!(matches!(
        client.write(b"late"),
        Err(FrameError::ConnectionClosed)
    ));

    holder.join().unwrap();
}
