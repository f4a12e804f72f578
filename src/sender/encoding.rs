//! systemd-journald native protocol framing.
//!
//! A value without a newline is written as `NAME=value\n`. A value containing
//! at least one `\n` is written as `NAME\n`, its length as a little-endian
//! `u64`, the raw bytes and a closing `\n`. Nothing else is escaped.

use bytes::{BufMut, Bytes, BytesMut};

const NEWLINE: u8 = b'\n';
const LENGTH_PREFIX: usize = std::mem::size_of::<u64>();

/// Whether `value` needs the length-framed form.
pub fn needs_framing(value: &[u8]) -> bool {
    value.contains(&NEWLINE)
}

/// Appends one field to `buf`.
pub fn encode_field<B: BufMut>(buf: &mut B, name: &str, value: &[u8]) {
    buf.put_slice(name.as_bytes());

    if needs_framing(value) {
        buf.put_u8(NEWLINE);
        buf.put_u64_le(value.len() as u64);
    } else {
        buf.put_u8(b'=');
    }

    buf.put_slice(value);
    buf.put_u8(NEWLINE);
}

/// Exact number of bytes [`encode_field`] writes.
pub fn field_len(name: &str, value: &[u8]) -> usize {
    let framing = if needs_framing(value) { LENGTH_PREFIX } else { 0 };
    name.len() + 1 + framing + value.len() + 1
}

pub fn encoded_len<'a, I>(fields: I) -> usize
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    fields
        .into_iter()
        .map(|(name, value)| field_len(name, value))
        .sum()
}

/// Encodes all fields, in iteration order, into one payload.
pub fn encode_fields<'a, I>(fields: I) -> Bytes
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
    I::IntoIter: Clone,
{
    let fields = fields.into_iter();
    let mut buf = BytesMut::with_capacity(encoded_len(fields.clone()));

    for (name, value) in fields {
        encode_field(&mut buf, name, value);
    }

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[(&'static str, &'static [u8])]) -> Bytes {
        encode_fields(fields.iter().copied())
    }

    #[test]
    fn test_plain_value() {
        assert_eq!(&encode(&[("MESSAGE", b"hello")])[..], b"MESSAGE=hello\n");
    }

    #[test]
    fn test_value_with_newline_is_length_framed() {
        let payload = encode(&[("MESSAGE", b"line1\nline2")]);

        let mut expected = b"MESSAGE\n".to_vec();
        expected.extend_from_slice(&11u64.to_le_bytes());
        expected.extend_from_slice(b"line1\nline2\n");
        assert_eq!(&payload[..], &expected[..]);
    }

    #[test]
    fn test_lone_newline_value() {
        let payload = encode(&[("X", b"\n")]);
        assert_eq!(&payload[..], b"X\n\x01\x00\x00\x00\x00\x00\x00\x00\n\n");
    }

    #[test]
    fn test_empty_value_stays_plain() {
        assert_eq!(&encode(&[("EMPTY", b"")])[..], b"EMPTY=\n");
    }

    #[test]
    fn test_other_bytes_are_not_escaped() {
        let payload = encode(&[("BIN", b"a=b\r\0\xff")]);
        assert_eq!(&payload[..], b"BIN=a=b\r\0\xff\n");
    }

    #[test]
    fn test_order_is_preserved() {
        let payload = encode(&[("B", b"2"), ("A", b"1")]);
        assert_eq!(&payload[..], b"B=2\nA=1\n");
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let fields: &[(&str, &[u8])] = &[("A", b"x"), ("B", b"y\nz"), ("C", b"")];
        let payload = encode_fields(fields.iter().copied());
        assert_eq!(payload.len(), encoded_len(fields.iter().copied()));
    }
}
