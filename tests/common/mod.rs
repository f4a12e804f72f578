#![allow(dead_code)]

use std::os::unix::net::UnixDatagram;
use std::path::PathBuf;
use tempfile::TempDir;

/// A bound datagram socket standing in for journald. Nothing reads from it
/// unless a test calls `recv`.
pub struct FakeJournald {
    pub dir: TempDir,
    pub path: PathBuf,
    pub socket: UnixDatagram,
}

impl FakeJournald {
    pub fn bind() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.sock");
        let socket = UnixDatagram::bind(&path).unwrap();
        Self { dir, path, socket }
    }

    pub fn recv(&self) -> Vec<u8> {
        let mut buf = vec![0u8; 64 * 1024];
        let received = self.socket.recv(&mut buf).unwrap();
        buf.truncate(received);
        buf
    }

    pub fn is_empty(&self) -> bool {
        self.socket.set_nonblocking(true).unwrap();
        let mut buf = [0u8; 1];
        let empty = matches!(
            self.socket.recv(&mut buf),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock
        );
        self.socket.set_nonblocking(false).unwrap();
        empty
    }
}

/// Splits a native protocol payload back into fields.
pub fn decode(mut payload: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut fields = Vec::new();

    while !payload.is_empty() {
        let end = payload
            .iter()
            .position(|&b| b == b'=' || b == b'\n')
            .expect("field name terminator");
        let name = String::from_utf8(payload[..end].to_vec()).unwrap();
        let rest = &payload[end + 1..];

        if payload[end] == b'=' {
            let newline = rest.iter().position(|&b| b == b'\n').expect("line end");
            fields.push((name, rest[..newline].to_vec()));
            payload = &rest[newline + 1..];
        } else {
            let len = u64::from_le_bytes(rest[..8].try_into().unwrap()) as usize;
            let value = rest[8..8 + len].to_vec();
            assert_eq!(rest[8 + len], b'\n', "framed value must end with a newline");
            fields.push((name, value));
            payload = &rest[8 + len + 1..];
        }
    }

    fields
}
