// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides secp256k1 point (de)serialization, including
//! the recovery of a Y coordinate from an X coordinate and a parity.
//!
//! Field arithmetic modulo `p` is carried out on `BigUint`s; the
//! resulting coordinates are always validated by `k256` before a point
//! is handed out.

use super::error::Error;
use super::{BASEFIELD_LENGTH, PUBLIC_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH, Y_SEARCH_BOUND};

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, Scalar};
use num_bigint::BigUint;
use once_cell::sync::Lazy;

const FIELD_PRIME_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

const CURVE_ORDER_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// The `b` coefficient of `y² = x³ + ax + b`; `a` is zero on secp256k1.
const CURVE_B: u32 = 7;

/// The base field modulus `p`
pub(crate) static FIELD_PRIME: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&FIELD_PRIME_BYTES));

/// The order of the generator
pub(crate) static CURVE_ORDER: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&CURVE_ORDER_BYTES));

// p ≡ 3 mod 4, so v^((p+1)/4) is a square root of v whenever one exists.
static SQRT_EXPONENT: Lazy<BigUint> = Lazy::new(|| (&*FIELD_PRIME + 1u32) >> 2);

fn is_odd(v: &BigUint) -> bool {
    v.bit(0)
}

/// Right-hand side `x³ + 7 mod p` of the curve equation
fn curve_rhs(x: &BigUint) -> BigUint {
    let p = &*FIELD_PRIME;
    (x.modpow(&BigUint::from(3u32), p) + CURVE_B) % p
}

/// Recovers a Y coordinate with the requested parity for `x`.
///
/// Up to `Y_SEARCH_BOUND` consecutive X values starting at `x` are
/// tried; the root is returned along with the offset at which it was
/// found. Fails with `Error::NoCurvePoint` once the bound is exhausted.
pub fn y_from_x(x: &BigUint, odd: bool) -> Result<(BigUint, u32), Error> {
    let p = &*FIELD_PRIME;

    for offset in 0..Y_SEARCH_BOUND {
        let mx = x + offset;
        let my2 = curve_rhs(&mx);
        let my = my2.modpow(&SQRT_EXPONENT, p);

        if (&my * &my) % p == my2 {
            let y = if is_odd(&my) == odd { my } else { p - my };
            return Ok((y, offset));
        }
    }

    Err(Error::NoCurvePoint)
}

/// Converts an integer below 2^256 to big-endian field bytes
pub(crate) fn to_field_bytes(v: &BigUint) -> Option<FieldBytes> {
    let bytes = v.to_bytes_be();
    if bytes.len() > BASEFIELD_LENGTH {
        return None;
    }

    let mut out = FieldBytes::default();
    out[BASEFIELD_LENGTH - bytes.len()..].copy_from_slice(&bytes);
    Some(out)
}

pub(crate) fn scalar_to_biguint(s: &Scalar) -> BigUint {
    BigUint::from_bytes_be(&s.to_bytes())
}

/// Builds a point from affine coordinates, checking it lies on the curve
pub(crate) fn point_from_coordinates(x: &BigUint, y: &BigUint) -> Result<AffinePoint, Error> {
    let (x, y) = match (to_field_bytes(x), to_field_bytes(y)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(Error::InvalidPoint),
    };

    let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
    Option::from(AffinePoint::from_encoded_point(&encoded)).ok_or(Error::InvalidPoint)
}

/// Deserializes a SEC1 point.
///
/// The marker byte must be `0x02`/`0x03` for a compressed point, whose Y
/// coordinate is then recovered with [`y_from_x`], or `0x04` for an
/// uncompressed one.
pub fn point_from_bytes(bytes: &[u8]) -> Result<AffinePoint, Error> {
    let marker = *bytes.first().ok_or(Error::InvalidLength {
        expected: PUBLIC_KEY_LENGTH,
        actual: 0,
    })?;

    let expected = match marker {
        0x02 | 0x03 => PUBLIC_KEY_LENGTH,
        0x04 => UNCOMPRESSED_PUBLIC_KEY_LENGTH,
        _ => return Err(Error::InvalidPointMarker(marker)),
    };
    if bytes.len() != expected {
        return Err(Error::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }

    let x = BigUint::from_bytes_be(&bytes[1..1 + BASEFIELD_LENGTH]);
    if marker == 0x04 {
        let y = BigUint::from_bytes_be(&bytes[1 + BASEFIELD_LENGTH..]);
        point_from_coordinates(&x, &y)
    } else {
        lift_x(&x, marker == 0x03)
    }
}

/// Builds the point with X coordinate `x` and a Y of the given parity.
///
/// The Y coordinate comes from [`y_from_x`], but the point is always
/// built at `x` itself.
pub(crate) fn lift_x(x: &BigUint, odd: bool) -> Result<AffinePoint, Error> {
    let (y, _) = y_from_x(x, odd)?;

    point_from_coordinates(x, &y)
}

/// Serializes a point in compressed or uncompressed SEC1 form
pub fn point_to_bytes(point: &AffinePoint, compressed: bool) -> Vec<u8> {
    point.to_encoded_point(compressed).as_bytes().to_vec()
}
