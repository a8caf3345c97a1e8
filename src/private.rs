// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides a `PrivateKey` wrapping
//! struct around a non-zero `Scalar` element.

use super::address::minikey_to_private_key;
use super::base58::{decode_check, encode_check};
use super::error::{Error, Validity};
use super::network::NetworkParams;
use super::{PublicKey, Signature};
use super::{PRIVATE_KEY_LENGTH, WIF_COMPRESSED_FLAG};

use k256::elliptic_curve::PrimeField;
use k256::{NonZeroScalar, Scalar};
use rand_core::{CryptoRng, RngCore};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A private key
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct PrivateKey(pub(crate) Scalar);

impl PrivateKey {
    /// Generates a new random private key
    pub fn new(mut rng: impl CryptoRng + RngCore) -> Self {
        let secret_scalar = NonZeroScalar::random(&mut rng);

        PrivateKey(*secret_scalar)
    }

    /// Generates a new private key from a provided scalar.
    ///
    /// If the source or generation method of the scalar is
    /// unknown, it is preferable to use the `PrivateKey:new`
    /// method instead.
    pub fn from_scalar(scalar: Scalar) -> Result<Self, Error> {
        if bool::from(scalar.is_zero()) {
            return Err(Error::InvalidPrivateKey);
        }

        Ok(PrivateKey(scalar))
    }

    /// Returns the underlying scalar
    pub fn scalar(&self) -> Scalar {
        self.0
    }

    /// Converts this private key to an array of bytes
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.0.to_bytes().into()
    }

    /// Constructs a private key from an array of bytes.
    ///
    /// Fails if the big-endian integer is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self, Error> {
        let scalar: Option<Scalar> = Scalar::from_repr((*bytes).into()).into();

        scalar
            .ok_or(Error::InvalidPrivateKey)
            .and_then(PrivateKey::from_scalar)
    }

    /// Constructs a private key from a slice of exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let array: [u8; PRIVATE_KEY_LENGTH] =
            bytes.try_into().map_err(|_| Error::InvalidLength {
                expected: PRIVATE_KEY_LENGTH,
                actual: bytes.len(),
            })?;

        PrivateKey::from_bytes(&array)
    }

    /// Computes the public key of this private key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_private_key(self)
    }

    /// Computes a low-S deterministic ECDSA signature of a 32-byte digest
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, Error> {
        Signature::sign(digest, self)
    }

    /// Encodes this key in wallet import format.
    ///
    /// The payload is the WIF prefix (P2PKH tag + 128), the scalar, and a
    /// trailing `0x01` when the key is meant for compressed public keys.
    pub fn to_wif(&self, compressed: bool, params: &NetworkParams) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_LENGTH + 2);
        payload.push(wif_prefix(params));
        payload.extend_from_slice(&self.to_bytes());
        if compressed {
            payload.push(WIF_COMPRESSED_FLAG);
        }

        encode_check(&payload)
    }

    /// Decodes a key in wallet import format, returning the key and
    /// whether it is meant for compressed public keys.
    ///
    /// A valid minikey is accepted as well and yields an uncompressed key.
    pub fn from_wif(text: &str, params: &NetworkParams) -> Result<(Self, bool), Error> {
        decode_wif(text, params)
            .or_else(|e| minikey_to_private_key(text).map(|key| (key, false)).map_err(|_| e))
    }

    /// Checks whether `text` is an importable private key
    pub fn validate_wif(text: &str, params: &NetworkParams) -> Validity {
        Validity::of(&PrivateKey::from_wif(text, params))
    }
}

fn wif_prefix(params: &NetworkParams) -> u8 {
    params.p2pkh.wrapping_add(128)
}

fn decode_wif(text: &str, params: &NetworkParams) -> Result<(PrivateKey, bool), Error> {
    let payload = decode_check(text)?;

    let prefix = *payload.first().ok_or(Error::InvalidLength {
        expected: PRIVATE_KEY_LENGTH + 1,
        actual: 0,
    })?;
    if prefix != wif_prefix(params) {
        return Err(Error::UnknownAddressType(prefix));
    }

    match payload.len() {
        33 => Ok((PrivateKey::from_slice(&payload[1..])?, false)),
        34 if payload[33] == WIF_COMPRESSED_FLAG => {
            Ok((PrivateKey::from_slice(&payload[1..33])?, true))
        }
        34 => Err(Error::InvalidCompressionFlag(payload[33])),
        actual => Err(Error::InvalidLength {
            expected: PRIVATE_KEY_LENGTH + 2,
            actual,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{MAINNET, TESTNET};
    use rand_core::OsRng;

    const MINIKEY: &str = "S6c56bnXQiBjk9mqSYE7ykVQ7NzrRy";
    const MINIKEY_SECRET: &str = "4c7a9640c72dc2099f23715d0c8a0d8a35f8906e3cab61dd3f78b67bf887c9ab";

    #[test]
    fn test_encoding() {
        assert_eq!(
            PrivateKey::from_scalar(Scalar::ONE).unwrap().to_bytes(),
            [
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 1
            ]
        );

        // Test random keys encoding
        let mut rng = OsRng;

        for _ in 0..100 {
            let key = PrivateKey::new(&mut rng);
            let bytes = key.to_bytes();

            assert_eq!(key, PrivateKey::from_bytes(&bytes).unwrap());
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            PrivateKey::from_scalar(Scalar::ZERO),
            Err(Error::InvalidPrivateKey)
        );
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32]),
            Err(Error::InvalidPrivateKey)
        );
        assert_eq!(
            PrivateKey::from_bytes(&[0xff; 32]),
            Err(Error::InvalidPrivateKey)
        );
        assert!(matches!(
            PrivateKey::from_slice(&[1u8; 31]),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_wif() {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&hex::decode(MINIKEY_SECRET).unwrap());
        let key = PrivateKey::from_bytes(&secret).unwrap();

        assert_eq!(
            key.to_wif(false, &MAINNET),
            "5JPy8Zg7z4P7RSLsiqcqyeAF1935zjNUdMxcDeVrtU1oarrgnB7"
        );
        assert_eq!(
            key.to_wif(true, &MAINNET),
            "KynNkPDfpqvbLrrisfbDB11nocUD3p1nwVWSSpWPCAEYc8sXfM3M"
        );

        for compressed in [false, true] {
            let wif = key.to_wif(compressed, &MAINNET);
            assert_eq!(
                PrivateKey::from_wif(&wif, &MAINNET).unwrap(),
                (key, compressed)
            );
            // Testnet keys carry another prefix.
            assert_eq!(
                PrivateKey::from_wif(&wif, &TESTNET),
                Err(Error::UnknownAddressType(0x80))
            );
        }
    }

    #[test]
    fn test_wif_minikey_fallback() {
        let (key, compressed) = PrivateKey::from_wif(MINIKEY, &MAINNET).unwrap();
        assert!(!compressed);
        assert_eq!(hex::encode(key.to_bytes()), MINIKEY_SECRET);

        assert_eq!(
            PrivateKey::validate_wif(MINIKEY, &MAINNET),
            Validity::Valid
        );
        assert_eq!(
            PrivateKey::validate_wif("5JPy8Zg7z4P7RSLsiqcqyeAF1935zjNUdMxcDeVrtU1oarrgnB8", &MAINNET),
            Validity::Invalid
        );
        assert_eq!(
            PrivateKey::validate_wif("not a key", &MAINNET),
            Validity::Malformed
        );
    }

    #[test]
    fn test_wif_compression_flag() {
        let key = PrivateKey::new(OsRng);

        let mut payload = vec![wif_prefix(&MAINNET)];
        payload.extend_from_slice(&key.to_bytes());
        payload.push(0x02);
        let text = encode_check(&payload);

        assert_eq!(
            PrivateKey::from_wif(&text, &MAINNET),
            Err(Error::InvalidCompressionFlag(0x02))
        );
        assert_eq!(PrivateKey::validate_wif(&text, &MAINNET), Validity::Malformed);

        payload[33] = WIF_COMPRESSED_FLAG;
        assert_eq!(
            PrivateKey::from_wif(&encode_check(&payload), &MAINNET).unwrap(),
            (key, true)
        );
    }
}
