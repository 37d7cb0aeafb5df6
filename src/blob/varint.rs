use crate::blob::{GenError, Result};

/// Encode an unsigned integer as a gob-style varint.
///
/// Values below 128 are a single byte. Larger values emit a prefix byte of
/// `256 - payload_len` followed by the minimal big-endian payload (no leading
/// zero byte), so one-byte payloads use prefix `0xFF` and eight-byte payloads
/// use prefix `0xF8`.
pub fn encode_unsigned(value: u64) -> Vec<u8> {
	if value < 0x80 {
		return vec![value as u8];
	}

	let raw = value.to_be_bytes();
	let skip = raw.iter().take_while(|byte| **byte == 0).count();
	let payload = &raw[skip..];

	let mut out = Vec::with_capacity(payload.len() + 1);
	out.push((0x100 - payload.len()) as u8);
	out.extend_from_slice(payload);
	out
}

/// Decode an unsigned varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_unsigned(bytes: &[u8]) -> Result<(u64, usize)> {
	let first = *bytes.first().ok_or(GenError::VarintTruncated { need: 1, have: 0 })?;
	if first < 0x80 {
		return Ok((u64::from(first), 1));
	}

	let len = 0x100 - usize::from(first);
	if len > 8 {
		return Err(GenError::VarintOverlong { len });
	}
	if bytes.len() < len + 1 {
		return Err(GenError::VarintTruncated {
			need: len + 1,
			have: bytes.len(),
		});
	}

	let mut value = 0_u64;
	for byte in &bytes[1..=len] {
		value = (value << 8) | u64::from(*byte);
	}
	Ok((value, len + 1))
}

/// Encode a signed integer by zigzag-style mapping into the unsigned domain.
///
/// Non-negative `n` maps to `2n`; negative `n` maps to `2·!n + 1`, keeping
/// small-magnitude negatives compact.
pub fn encode_signed(value: i64) -> Vec<u8> {
	let mapped = if value >= 0 {
		(value as u64) << 1
	} else {
		((!value) as u64) << 1 | 1
	};
	encode_unsigned(mapped)
}

/// Decode a signed varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_signed(bytes: &[u8]) -> Result<(i64, usize)> {
	let (mapped, consumed) = decode_unsigned(bytes)?;
	let value = if mapped & 1 == 0 {
		(mapped >> 1) as i64
	} else {
		!((mapped >> 1) as i64)
	};
	Ok((value, consumed))
}

/// Encode a string as a length-prefixed, NUL-terminated byte run.
///
/// Empty strings are a bare zero length. Non-empty strings declare byte
/// length plus one (the trailing NUL counts), then the bytes, then the NUL,
/// so a decoder can hand the payload out as a terminator-bearing C string.
pub fn encode_string(value: &str) -> Vec<u8> {
	if value.is_empty() {
		return encode_unsigned(0);
	}

	let mut out = encode_unsigned(value.len() as u64 + 1);
	out.extend_from_slice(value.as_bytes());
	out.push(0);
	out
}
