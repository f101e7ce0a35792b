//! Binary wire format for routing tables
//!
//! A compact length-prefixed encoding, little-endian throughout. Designed
//! for forwarding between pipeline processes, not for archival: there is a
//! version byte but no compression or checksumming.
//!
//! # Wire Format
//!
//! ```text
//! [0..2]   magic "FM"
//! [2]      version (u8, currently 1)
//! [3..]    active_pod          str16
//!          pod_count           u32
//!          per pod:
//!            name              str16
//!            host              str16
//!            port              u16
//!            expected_parts    u32
//!            out_edge_count    u16
//!            out_edges         str16 each
//! ```
//!
//! `str16` is a u16 byte length followed by that many UTF-8 bytes.
//!
//! # Safety
//!
//! Every read is bounds-checked against the remaining buffer. Malformed
//! input returns a `ProtocolError` rather than panicking or reading out of
//! bounds. A message that decodes but leaves bytes unconsumed is rejected
//! with `TrailingBytes`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    ProtocolError, Result, TableRepr, MAX_OUT_EDGES, MAX_STRING_LEN, MIN_MESSAGE_SIZE, WIRE_MAGIC,
    WIRE_VERSION,
};

/// Encode a table repr into the binary wire format
///
/// # Errors
///
/// Returns `StringTooLong` if any name, host, or edge target exceeds 65535
/// bytes, or `TooManyOutEdges` if a pod has more than 65535 out-edges.
pub fn encode(repr: &TableRepr) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(MIN_MESSAGE_SIZE + estimated_body_len(repr));

    buf.put_slice(&WIRE_MAGIC);
    buf.put_u8(WIRE_VERSION);
    put_str(&mut buf, &repr.active_pod)?;
    buf.put_u32_le(repr.pods.len() as u32);

    for (name, pod) in &repr.pods {
        put_str(&mut buf, name)?;
        put_str(&mut buf, &pod.host)?;
        buf.put_u16_le(pod.port);
        buf.put_u32_le(pod.expected_parts);

        if pod.out_edges.len() > MAX_OUT_EDGES {
            return Err(ProtocolError::too_many_out_edges(pod.out_edges.len()));
        }
        buf.put_u16_le(pod.out_edges.len() as u16);
        for edge in &pod.out_edges {
            put_str(&mut buf, edge)?;
        }
    }

    Ok(buf.freeze())
}

/// Decode a table repr from the binary wire format
///
/// # Errors
///
/// Returns a `ProtocolError` describing the first malformed field: bad
/// magic, unsupported version, truncation, invalid UTF-8, or trailing bytes.
pub fn decode(mut buf: &[u8]) -> Result<TableRepr> {
    if buf.len() < MIN_MESSAGE_SIZE {
        return Err(ProtocolError::too_short(MIN_MESSAGE_SIZE, buf.len()));
    }

    let magic = [buf[0], buf[1]];
    if magic != WIRE_MAGIC {
        return Err(ProtocolError::bad_magic(magic));
    }
    buf.advance(2);

    let version = buf.get_u8();
    if version != WIRE_VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }

    let mut repr = TableRepr {
        active_pod: get_str(&mut buf)?,
        ..TableRepr::default()
    };

    let pod_count = get_u32(&mut buf)?;
    for _ in 0..pod_count {
        let name = get_str(&mut buf)?;
        let host = get_str(&mut buf)?;
        let port = get_u16(&mut buf)?;
        let expected_parts = get_u32(&mut buf)?;

        let edge_count = get_u16(&mut buf)?;
        let mut out_edges = Vec::with_capacity(edge_count as usize);
        for _ in 0..edge_count {
            out_edges.push(get_str(&mut buf)?);
        }

        repr.pods.insert(
            name,
            crate::PodRepr {
                host,
                port,
                out_edges,
                expected_parts,
            },
        );
    }

    if buf.has_remaining() {
        return Err(ProtocolError::TrailingBytes {
            remaining: buf.remaining(),
        });
    }

    Ok(repr)
}

fn put_str(buf: &mut BytesMut, s: &str) -> Result<()> {
    if s.len() > MAX_STRING_LEN {
        return Err(ProtocolError::string_too_long(s.len()));
    }
    buf.put_u16_le(s.len() as u16);
    buf.put_slice(s.as_bytes());
    Ok(())
}

fn get_str(buf: &mut &[u8]) -> Result<String> {
    let len = get_u16(buf)? as usize;
    if buf.remaining() < len {
        return Err(ProtocolError::too_short(len, buf.remaining()));
    }
    let s = std::str::from_utf8(&buf[..len])?.to_owned();
    buf.advance(len);
    Ok(s)
}

fn get_u16(buf: &mut &[u8]) -> Result<u16> {
    if buf.remaining() < 2 {
        return Err(ProtocolError::too_short(2, buf.remaining()));
    }
    Ok(buf.get_u16_le())
}

fn get_u32(buf: &mut &[u8]) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(ProtocolError::too_short(4, buf.remaining()));
    }
    Ok(buf.get_u32_le())
}

/// Rough body size for the initial buffer allocation; exact is not needed,
/// BytesMut grows
fn estimated_body_len(repr: &TableRepr) -> usize {
    repr.pods
        .iter()
        .map(|(name, pod)| {
            let edges: usize = pod.out_edges.iter().map(|e| 2 + e.len()).sum();
            2 + name.len() + 2 + pod.host.len() + 2 + 4 + 2 + edges
        })
        .sum::<usize>()
        + repr.active_pod.len()
}
