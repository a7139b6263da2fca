//! Length-prefixed frame codec for moves
//!
//! A frame is a 4-byte big-endian payload length followed by the bincode
//! encoding of one [`Move`]. Both peers must run the same codec; nothing is
//! negotiated on the wire.

use crate::{CoordinateError, Move, FRAME_HEADER_LEN, MAX_FRAME_LEN};
use bincode::Options;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode or decode move: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("frame length {0} is outside 1..=64")]
    InvalidLength(usize),
    #[error("decoded move is invalid: {0}")]
    Coordinate(#[from] CoordinateError),
}

/// Fixed-width integers, and a payload must hold exactly one move.
fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Serializes `mv` into a complete frame, header included.
pub fn encode_move(mv: &Move) -> Result<Vec<u8>, CodecError> {
    let payload = wire_options().serialize(mv)?;
    if payload.is_empty() || payload.len() > MAX_FRAME_LEN {
        return Err(CodecError::InvalidLength(payload.len()));
    }

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Reads the payload length out of a frame header.
pub fn payload_len(header: [u8; FRAME_HEADER_LEN]) -> Result<usize, CodecError> {
    let len = u32::from_be_bytes(header) as usize;
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(CodecError::InvalidLength(len));
    }
    Ok(len)
}

/// Decodes a frame payload (header already stripped) back into a move.
pub fn decode_move(payload: &[u8]) -> Result<Move, CodecError> {
    let raw: Move = wire_options().deserialize(payload)?;
    Ok(Move::new(raw.row(), raw.col())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(frame: &[u8]) -> ([u8; FRAME_HEADER_LEN], &[u8]) {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header.copy_from_slice(&frame[..FRAME_HEADER_LEN]);
        (header, &frame[FRAME_HEADER_LEN..])
    }

    #[test]
    fn test_frame_layout() {
        let frame = encode_move(&Move::new(2, 1).unwrap()).unwrap();
        // bincode writes the two u8 fields back to back
        assert_eq!(frame, vec![0, 0, 0, 2, 2, 1]);
    }

    #[test]
    fn test_move_roundtrip_every_cell() {
        for row in 0..3 {
            for col in 0..3 {
                let mv = Move::new(row, col).unwrap();
                let frame = encode_move(&mv).unwrap();
                let (header, payload) = split(&frame);

                assert_eq!(payload_len(header).unwrap(), payload.len());
                assert_eq!(decode_move(payload).unwrap(), mv);
            }
        }
    }

    #[test]
    fn test_payload_len_rejects_zero_and_oversized() {
        assert!(matches!(payload_len([0, 0, 0, 0]), Err(CodecError::InvalidLength(0))));
        assert!(matches!(
            payload_len([0, 0, 1, 0]),
            Err(CodecError::InvalidLength(256))
        ));
        assert_eq!(payload_len([0, 0, 0, MAX_FRAME_LEN as u8]).unwrap(), MAX_FRAME_LEN);
    }

    #[test]
    fn test_decode_rejects_out_of_range_coordinates() {
        let result = decode_move(&[3, 0]);
        assert!(matches!(
            result,
            Err(CodecError::Coordinate(CoordinateError { row: 3, col: 0 }))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        assert!(matches!(decode_move(&[1]), Err(CodecError::Bincode(_))));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert!(matches!(decode_move(&[1, 1, 9]), Err(CodecError::Bincode(_))));
        assert!(matches!(decode_move(&[1, 1, 9, 9, 9]), Err(CodecError::Bincode(_))));
        assert_eq!(decode_move(&[1, 1]).unwrap(), Move::new(1, 1).unwrap());
    }

    #[test]
    fn test_error_message_formatting() {
        let err = payload_len([0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.to_string(), "frame length 0 is outside 1..=64");
    }
}
