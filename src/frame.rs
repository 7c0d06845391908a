//! Length-prefixed framing over a byte stream.
//!
//! A frame is `uvarint(len) || payload`. Frames are independent whole
//! documents: any number may be concatenated on one stream, and each read
//! returns exactly one payload. This is the only part of the crate that
//! touches external I/O.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};
use crate::wire::{put_uvarint, MAX_VARINT_BYTES};

/// Write one frame: the payload length as a uvarint, then the payload.
pub fn write_frame(writer: &mut impl Write, payload: &[u8]) -> Result<()> {
    let mut header = Vec::with_capacity(MAX_VARINT_BYTES);
    put_uvarint(&mut header, payload.len() as u64);
    writer.write_all(&header)?;
    writer.write_all(payload)?;
    Ok(())
}

/// Read one frame, failing with [`Error::ShortRead`] if the stream ends
/// before the declared payload length is delivered.
pub fn read_frame(reader: &mut impl Read) -> Result<Vec<u8>> {
    let len = read_uvarint(reader)?;
    let expected = usize::try_from(len).map_err(|_| Error::Truncated("frame length"))?;

    let mut payload = vec![0u8; expected];
    let mut filled = 0;
    while filled < expected {
        match reader.read(&mut payload[filled..]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    expected,
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(payload)
}

fn read_uvarint(reader: &mut impl Read) -> Result<u64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    for _ in 0..MAX_VARINT_BYTES {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        let bits = (byte[0] & 0x7F) as u64;
        if shift >= 64 || (shift == 63 && bits > 1) {
            return Err(Error::Truncated("frame length"));
        }
        result |= bits << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(Error::Truncated("frame length"))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip_including_empty_and_large() {
        let payloads: Vec<Vec<u8>> = vec![
            vec![],
            vec![0x42],
            (0..=255u8).collect(),
            vec![0xAB; 70_000], // length prefix needs multiple varint bytes
        ];
        for payload in payloads {
            let mut stream = Vec::new();
            write_frame(&mut stream, &payload).unwrap();
            let mut rd = Cursor::new(stream);
            assert_eq!(read_frame(&mut rd).unwrap(), payload);
        }
    }

    #[test]
    fn frames_concatenate_on_one_stream() {
        let mut stream = Vec::new();
        write_frame(&mut stream, b"first").unwrap();
        write_frame(&mut stream, b"").unwrap();
        write_frame(&mut stream, b"third").unwrap();
        let mut rd = Cursor::new(stream);
        assert_eq!(read_frame(&mut rd).unwrap(), b"first");
        assert_eq!(read_frame(&mut rd).unwrap(), b"");
        assert_eq!(read_frame(&mut rd).unwrap(), b"third");
        // A clean end-of-stream surfaces as an I/O error, not a short read.
        assert!(matches!(read_frame(&mut rd), Err(Error::Io(_))));
    }

    #[test]
    fn short_payload_reports_counts() {
        let mut stream = Vec::new();
        write_frame(&mut stream, b"hello").unwrap();
        stream.truncate(stream.len() - 2);
        let mut rd = Cursor::new(stream);
        match read_frame(&mut rd) {
            Err(Error::ShortRead {
                expected: 5,
                actual: 3,
            }) => {}
            other => panic!("expected ShortRead, got {:?}", other),
        }
    }
}
