// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Length-prefixed frame encoding for the metadata stream
//!
//! Each frame is a variable-length size prefix (1 to 5 bytes) followed by the
//! payload. A zero-length frame carries an empty payload.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest payload accepted from the stream (16 MiB)
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

// Length prefix encoding - intentional truncation is part of the wire format
#[allow(clippy::cast_possible_truncation)]
pub fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else if len < 0x4000 {
        vec![((len >> 8) as u8) | 0x80, (len & 0xFF) as u8]
    } else if len < 0x0020_0000 {
        vec![
            ((len >> 16) as u8) | 0xC0,
            ((len >> 8) & 0xFF) as u8,
            (len & 0xFF) as u8,
        ]
    } else if len < 0x1000_0000 {
        vec![
            ((len >> 24) as u8) | 0xE0,
            ((len >> 16) & 0xFF) as u8,
            ((len >> 8) & 0xFF) as u8,
            (len & 0xFF) as u8,
        ]
    } else {
        vec![
            ((len >> 32) as u8) | 0xF0,
            ((len >> 24) & 0xFF) as u8,
            ((len >> 16) & 0xFF) as u8,
            ((len >> 8) & 0xFF) as u8,
            (len & 0xFF) as u8,
        ]
    }
}

async fn read_length<R: AsyncRead + Unpin>(stream: &mut R) -> io::Result<usize> {
    let first = stream.read_u8().await?;
    let len = if first & 0x80 == 0 {
        first as usize
    } else if first & 0xC0 == 0x80 {
        let second = stream.read_u8().await?;
        (((first & 0x3F) as usize) << 8) + second as usize
    } else if first & 0xE0 == 0xC0 {
        let second = stream.read_u8().await?;
        let third = stream.read_u8().await?;
        (((first & 0x1F) as usize) << 16) + ((second as usize) << 8) + third as usize
    } else if first & 0xF0 == 0xE0 {
        let mut rest = [0u8; 3];
        stream.read_exact(&mut rest).await?;
        (((first & 0x0F) as usize) << 24)
            + ((rest[0] as usize) << 16)
            + ((rest[1] as usize) << 8)
            + rest[2] as usize
    } else {
        // five byte length
        let mut rest = [0u8; 4];
        stream.read_exact(&mut rest).await?;
        ((first & 0x07) as usize) << 32
            | (rest[0] as usize) << 24
            | (rest[1] as usize) << 16
            | (rest[2] as usize) << 8
            | rest[3] as usize
    };
    Ok(len)
}

/// Reads one frame and returns its payload
pub(super) async fn read_frame<R: AsyncRead + Unpin>(stream: &mut R) -> io::Result<Vec<u8>> {
    let len = read_length(stream).await?;
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds limit of {MAX_FRAME_LEN} bytes"),
        ));
    }
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Writes `payload` as one frame
///
/// Used by publishers feeding the stream; an empty payload is a valid frame.
///
/// # Errors
///
/// Returns an error if writing to the underlying stream fails.
pub async fn write_frame<W: AsyncWrite + Unpin>(stream: &mut W, payload: &[u8]) -> io::Result<()> {
    stream.write_all(&encode_length(payload.len())).await?;
    stream.write_all(payload).await?;
    stream.flush().await
}
