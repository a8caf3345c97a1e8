// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides base-58 and base-43 text encodings of byte
//! buffers, along with the checksummed base58Check variant.
//!
//! Buffers are read as big-endian integers. Leading zero bytes are not
//! part of that integer: each of them maps to one leading zero-digit
//! character, and back.

use super::error::Error;
use super::hash::hash256;
use super::CHECKSUM_LENGTH;

use num_bigint::BigUint;
use subtle::ConstantTimeEq;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BASE43_ALPHABET: &[u8; 43] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ$*+-./:";

/// Supported text alphabets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base {
    /// Bitcoin base-58 alphabet
    Base58,
    /// Base-43 alphabet, suited to QR code alphanumeric mode
    Base43,
}

impl Base {
    fn alphabet(self) -> &'static [u8] {
        match self {
            Base::Base58 => BASE58_ALPHABET,
            Base::Base43 => BASE43_ALPHABET,
        }
    }

    /// Number of symbols in the alphabet
    pub fn radix(self) -> u32 {
        self.alphabet().len() as u32
    }

    /// Whether `c` belongs to the alphabet
    pub fn contains(self, c: char) -> bool {
        self.digit(c).is_ok()
    }

    fn digit(self, c: char) -> Result<u8, Error> {
        self.alphabet()
            .iter()
            .position(|&symbol| symbol as char == c)
            .map(|digit| digit as u8)
            .ok_or(Error::InvalidCharacter {
                character: c,
                base: self.radix(),
            })
    }
}

/// Encodes `bytes` in the given base
pub fn encode(bytes: &[u8], base: Base) -> String {
    let alphabet = base.alphabet();
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    let mut text: String = core::iter::repeat(alphabet[0] as char)
        .take(zeros)
        .collect();

    let rest = &bytes[zeros..];
    if !rest.is_empty() {
        let value = BigUint::from_bytes_be(rest);
        text.extend(
            value
                .to_radix_be(base.radix())
                .into_iter()
                .map(|digit| alphabet[digit as usize] as char),
        );
    }

    text
}

/// Decodes `text` from the given base.
///
/// When `expected_length` is provided, a decoded buffer of any other
/// length is rejected.
pub fn decode(text: &str, expected_length: Option<usize>, base: Base) -> Result<Vec<u8>, Error> {
    let digits = text
        .chars()
        .map(|c| base.digit(c))
        .collect::<Result<Vec<u8>, Error>>()?;

    let zeros = digits.iter().take_while(|&&d| d == 0).count();
    let mut bytes = vec![0u8; zeros];

    let rest = &digits[zeros..];
    if !rest.is_empty() {
        let mut value = BigUint::default();
        for &digit in rest {
            value = value * base.radix() + u32::from(digit);
        }
        bytes.extend(value.to_bytes_be());
    }

    match expected_length {
        Some(expected) if expected != bytes.len() => Err(Error::InvalidLength {
            expected,
            actual: bytes.len(),
        }),
        _ => Ok(bytes),
    }
}

/// Appends the first four bytes of the double SHA-256 of `payload` and
/// encodes the result in base 58.
pub fn encode_check(payload: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(payload.len() + CHECKSUM_LENGTH);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&hash256(payload)[..CHECKSUM_LENGTH]);

    encode(&bytes, Base::Base58)
}

/// Decodes a base58Check string, verifying and stripping its checksum
pub fn decode_check(text: &str) -> Result<Vec<u8>, Error> {
    let mut bytes = decode(text, None, Base::Base58)?;
    if bytes.len() < CHECKSUM_LENGTH {
        return Err(Error::InvalidLength {
            expected: CHECKSUM_LENGTH,
            actual: bytes.len(),
        });
    }

    let split = bytes.len() - CHECKSUM_LENGTH;
    let checksum = hash256(&bytes[..split]);
    if !bool::from(checksum[..CHECKSUM_LENGTH].ct_eq(&bytes[split..])) {
        return Err(Error::ChecksumMismatch);
    }

    bytes.truncate(split);
    Ok(bytes)
}
