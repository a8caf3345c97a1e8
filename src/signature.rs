// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides a Signature struct implementing deterministic,
//! low-S ECDSA signing and verification over 32-byte digests, and a
//! RecoverableSignature struct carrying the extra header needed to
//! recover the signing key.

use super::error::Error;
use super::point::{lift_x, scalar_to_biguint, CURVE_ORDER, FIELD_PRIME};
use super::{PrivateKey, PublicKey};
use super::{
    RECOVERABLE_SIGNATURE_LENGTH, RECOVERY_HEADER_BASE, RECOVERY_HEADER_COMPRESSED,
    RECOVERY_ID_COUNT, SCALAR_LENGTH, SIGNATURE_LENGTH,
};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar, U256};
use subtle::ConditionallySelectable;

/// An ECDSA signature not attached to its message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Signature {
    /// The X coordinate of the nonce point, reduced modulo the curve order
    pub r: Scalar,
    /// The proof scalar, always in the lower half of the order range
    /// when produced by `Signature::sign`
    pub s: Scalar,
}

impl Signature {
    /// Computes a deterministic (RFC 6979) ECDSA signature of a digest,
    /// normalized to low-S form.
    pub fn sign(digest: &[u8; 32], skey: &PrivateKey) -> Result<Self, Error> {
        let signing_key =
            SigningKey::from_bytes(&skey.0.to_bytes()).map_err(|_| Error::InvalidPrivateKey)?;
        let signature: k256::ecdsa::Signature = signing_key
            .sign_prehash(digest)
            .map_err(|_| Error::InvalidSignature)?;

        let (r, s) = signature.split_scalars();

        Ok(Signature { r: *r, s: *s }.normalize_s())
    }

    /// Replaces `s` with `n - s` when it lies in the upper half of the
    /// order range
    pub fn normalize_s(self) -> Self {
        let negated = -self.s;

        Signature {
            r: self.r,
            s: Scalar::conditional_select(&self.s, &negated, IsHigh::is_high(&self.s)),
        }
    }

    /// Whether `s` lies in the lower half of the order range
    pub fn is_low_s(&self) -> bool {
        !bool::from(IsHigh::is_high(&self.s))
    }

    /// Verifies this signature against a digest and a public key
    pub fn verify(&self, digest: &[u8; 32], pkey: &PublicKey) -> Result<(), Error> {
        if bool::from(self.r.is_zero() | self.s.is_zero()) {
            return Err(Error::InvalidSignature);
        }

        let e = digest_to_scalar(digest);
        let w: Option<Scalar> = self.s.invert().into();
        let w = w.ok_or(Error::InvalidSignature)?;

        let point =
            ProjectivePoint::GENERATOR * (e * w) + ProjectivePoint::from(pkey.0) * (self.r * w);
        if bool::from(point.is_identity()) {
            return Err(Error::InvalidSignature);
        }

        let x = <Scalar as Reduce<U256>>::reduce_bytes(&point.to_affine().x());
        if x == self.r {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Converts this signature to an array of bytes (r then s, big-endian)
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..SCALAR_LENGTH].copy_from_slice(&self.r.to_bytes());
        bytes[SCALAR_LENGTH..].copy_from_slice(&self.s.to_bytes());

        bytes
    }

    /// Constructs a signature from an array of bytes.
    ///
    /// Both halves must be non-zero and below the curve order.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Result<Self, Error> {
        let r = scalar_from_slice(&bytes[..SCALAR_LENGTH])?;
        let s = scalar_from_slice(&bytes[SCALAR_LENGTH..])?;

        Ok(Signature { r, s })
    }
}

fn scalar_from_slice(bytes: &[u8]) -> Result<Scalar, Error> {
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::clone_from_slice(bytes)).into();

    scalar
        .filter(|s| !bool::from(s.is_zero()))
        .ok_or(Error::InvalidSignature)
}

/// Interprets a 32-byte digest as a scalar, reducing it modulo the order
pub(crate) fn digest_to_scalar(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest))
}

/// A signature along with the data needed to recover its public key
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: u8,
    compressed: bool,
}

impl RecoverableSignature {
    /// Attaches a recovery id, in `0..4`, and a compression flag to a
    /// signature
    pub fn new(signature: Signature, recovery_id: u8, compressed: bool) -> Result<Self, Error> {
        if recovery_id >= RECOVERY_ID_COUNT {
            return Err(Error::InvalidRecoveryId(recovery_id));
        }

        Ok(RecoverableSignature {
            signature,
            recovery_id,
            compressed,
        })
    }

    /// The underlying ECDSA signature
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Which of the (up to) four candidate keys signed, in `0..4`
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Whether the signer's address uses the compressed public key
    pub fn compressed(&self) -> bool {
        self.compressed
    }

    /// Signs a digest and finds the recovery id that yields the signer's
    /// public key.
    ///
    /// Each of the four candidate ids is tried in turn; failing to find
    /// one reports `Error::RecoveryFailed`.
    pub fn sign(digest: &[u8; 32], skey: &PrivateKey, compressed: bool) -> Result<Self, Error> {
        let signature = Signature::sign(digest, skey)?;
        let pkey = skey.public_key();

        for recovery_id in 0..RECOVERY_ID_COUNT {
            let candidate = RecoverableSignature {
                signature,
                recovery_id,
                compressed,
            };

            if let Ok(recovered) = candidate.recover(digest) {
                if recovered == pkey && recovered.verify_signature(&signature, digest).is_ok() {
                    return Ok(candidate);
                }
            }
        }

        Err(Error::RecoveryFailed)
    }

    /// Recovers the public key that produced this signature over `digest`.
    ///
    /// The nonce point `R` has X coordinate `r + (recovery_id / 2) * n` and
    /// a Y coordinate of parity `recovery_id & 1`; the key is then
    /// `r⁻¹ (sR - eG)`.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<PublicKey, Error> {
        let Signature { r, s } = self.signature;

        let mut x = scalar_to_biguint(&r);
        if self.recovery_id >= 2 {
            x += &*CURVE_ORDER;
        }
        if x >= *FIELD_PRIME {
            return Err(Error::InvalidSignature);
        }

        let r_point = lift_x(&x, self.recovery_id & 1 == 1)?;
        let e = digest_to_scalar(digest);
        let r_inv: Option<Scalar> = r.invert().into();
        let r_inv = r_inv.ok_or(Error::InvalidSignature)?;

        let q = (ProjectivePoint::from(r_point) * s - ProjectivePoint::GENERATOR * e) * r_inv;

        PublicKey::from_projective(q)
    }

    /// Verifies the underlying signature against a digest and a public key
    pub fn verify(&self, digest: &[u8; 32], pkey: &PublicKey) -> Result<(), Error> {
        self.signature.verify(digest, pkey)
    }

    /// The header byte, in `27..=34`
    pub fn header(&self) -> u8 {
        let compressed = if self.compressed {
            RECOVERY_HEADER_COMPRESSED
        } else {
            0
        };

        RECOVERY_HEADER_BASE + self.recovery_id + compressed
    }

    /// Converts this signature to its 65-byte form: header, r, s
    pub fn to_bytes(&self) -> [u8; RECOVERABLE_SIGNATURE_LENGTH] {
        let mut bytes = [0u8; RECOVERABLE_SIGNATURE_LENGTH];
        bytes[0] = self.header();
        bytes[1..].copy_from_slice(&self.signature.to_bytes());

        bytes
    }

    /// Constructs a recoverable signature from its 65-byte form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != RECOVERABLE_SIGNATURE_LENGTH {
            return Err(Error::InvalidLength {
                expected: RECOVERABLE_SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        }

        let header = bytes[0];
        let max_header = RECOVERY_HEADER_BASE + RECOVERY_HEADER_COMPRESSED + RECOVERY_ID_COUNT;
        if !(RECOVERY_HEADER_BASE..max_header).contains(&header) {
            return Err(Error::InvalidSignatureHeader(header));
        }
        let flags = header - RECOVERY_HEADER_BASE;

        let mut array = [0u8; SIGNATURE_LENGTH];
        array.copy_from_slice(&bytes[1..]);

        Ok(RecoverableSignature {
            signature: Signature::from_bytes(&array)?,
            recovery_id: flags % RECOVERY_ID_COUNT,
            compressed: flags >= RECOVERY_HEADER_COMPRESSED,
        })
    }

    /// Encodes this signature in base64
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decodes a base64 encoded signature
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|_| Error::InvalidBase64)?;

        RecoverableSignature::from_bytes(&bytes)
    }
}
