// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides a `PublicKey` wrapping
//! struct around an `AffinePoint` element.

use super::error::Error;
use super::hash::hash160;
use super::point::{point_from_bytes, point_to_bytes};
use super::{PrivateKey, Signature};
use super::{
    FINGERPRINT_LENGTH, HASH160_LENGTH, PUBLIC_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

use k256::elliptic_curve::group::Group;
use k256::{AffinePoint, ProjectivePoint};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A public key
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct PublicKey(pub(crate) AffinePoint);

impl PublicKey {
    /// Computes a public key from a provided private key
    pub fn from_private_key(sk: &PrivateKey) -> Self {
        let pkey = ProjectivePoint::GENERATOR * sk.0;

        PublicKey(pkey.to_affine())
    }

    /// Wraps a point, rejecting the point at infinity
    pub(crate) fn from_projective(point: ProjectivePoint) -> Result<Self, Error> {
        if bool::from(point.is_identity()) {
            return Err(Error::InvalidPoint);
        }

        Ok(PublicKey(point.to_affine()))
    }

    /// Returns the underlying affine point
    pub fn point(&self) -> AffinePoint {
        self.0
    }

    /// Serializes this public key in compressed or uncompressed form
    pub fn to_bytes(&self, compressed: bool) -> Vec<u8> {
        point_to_bytes(&self.0, compressed)
    }

    /// Converts this public key to its 33-byte compressed form
    pub fn to_compressed(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(&self.to_bytes(true));

        bytes
    }

    /// Converts this public key to its 65-byte uncompressed form
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(&self.to_bytes(false));

        bytes
    }

    /// Constructs a public key from its compressed or uncompressed form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        point_from_bytes(bytes).map(PublicKey)
    }

    /// Hash160 of the serialized public key
    pub fn hash160(&self, compressed: bool) -> [u8; HASH160_LENGTH] {
        hash160(&self.to_bytes(compressed))
    }

    /// First four bytes of the hash160 of the compressed key, identifying
    /// a parent in extended key serializations
    pub fn fingerprint(&self) -> [u8; FINGERPRINT_LENGTH] {
        let mut fingerprint = [0u8; FINGERPRINT_LENGTH];
        fingerprint.copy_from_slice(&self.hash160(true)[..FINGERPRINT_LENGTH]);

        fingerprint
    }

    /// Verifies a signature against a 32-byte digest and this public key
    pub fn verify_signature(&self, signature: &Signature, digest: &[u8; 32]) -> Result<(), Error> {
        signature.verify(digest, self)
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(sk: &PrivateKey) -> Self {
        PublicKey::from_private_key(sk)
    }
}
