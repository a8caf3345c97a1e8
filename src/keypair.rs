// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides a `KeyPair` struct
//! combining a `PrivateKey` and an associated `PublicKey`.

use super::address::Address;
use super::ecies::decrypt_message;
use super::error::Error;
use super::message::{public_key_from_signature, sign_message};
use super::network::NetworkParams;
use super::signature::RecoverableSignature;
use super::{PrivateKey, PublicKey, Signature, KEY_PAIR_LENGTH};

use rand_core::{CryptoRng, RngCore};

/// A KeyPair
///
/// The public key is always the one computed from the private key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random key pair
    pub fn new(mut rng: impl CryptoRng + RngCore) -> Self {
        let private_key = PrivateKey::new(&mut rng);

        KeyPair::from_private_key(private_key)
    }

    /// Generates a new key pair from a provided private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = PublicKey::from_private_key(&private_key);

        KeyPair {
            private_key,
            public_key,
        }
    }

    /// The private key of this pair
    pub fn private_key(&self) -> PrivateKey {
        self.private_key
    }

    /// The public key of this pair
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Converts this key pair to an array of bytes
    ///
    /// To ensure consistency between the private key and public key
    /// during reconstruction without extra checks, KeyPair serialization
    /// only serializes the private_key part, and reconstructs the public
    /// key when deserializing.
    pub fn to_bytes(&self) -> [u8; KEY_PAIR_LENGTH] {
        self.private_key.to_bytes()
    }

    /// Constructs a key pair from an array of bytes
    pub fn from_bytes(bytes: &[u8; KEY_PAIR_LENGTH]) -> Result<Self, Error> {
        PrivateKey::from_bytes(bytes).map(KeyPair::from_private_key)
    }

    /// Computes a low-S deterministic ECDSA signature of a digest
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, Error> {
        Signature::sign(digest, &self.private_key)
    }

    /// Verifies a signature against a digest and this key pair
    pub fn verify_signature(&self, signature: &Signature, digest: &[u8; 32]) -> Result<(), Error> {
        signature.verify(digest, &self.public_key)
    }

    /// P2PKH address of this key pair
    pub fn address(&self, compressed: bool, params: &NetworkParams) -> String {
        Address::p2pkh(&self.public_key, compressed).to_base58(params)
    }

    /// Signs a message with a recoverable signature
    pub fn sign_message(
        &self,
        message: &[u8],
        compressed: bool,
    ) -> Result<RecoverableSignature, Error> {
        sign_message(message, &self.private_key, compressed)
    }

    /// Verifies that `signature` over `message` recovers this key pair's
    /// public key
    pub fn verify_message(&self, signature: &RecoverableSignature, message: &[u8]) -> Result<(), Error> {
        let (recovered, _) = public_key_from_signature(signature, message)?;
        if recovered != self.public_key {
            return Err(Error::InvalidSignature);
        }

        Ok(())
    }

    /// Decrypts an envelope addressed to this key pair
    pub fn decrypt_message(&self, text: &str) -> Result<Vec<u8>, Error> {
        decrypt_message(text, &self.private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecies::encrypt_message;
    use crate::hash::sha256;
    use crate::network::MAINNET;
    use k256::Scalar;
    use rand_core::OsRng;

    #[test]
    fn test_signature() {
        let digest = sha256(b"key pair");

        let skey = PrivateKey::new(OsRng);
        let key_pair = KeyPair::from_private_key(skey);

        let signature = key_pair.sign(&digest).unwrap();
        assert!(key_pair.verify_signature(&signature, &digest).is_ok());
        assert!(key_pair.public_key().verify_signature(&signature, &digest).is_ok());
    }

    #[test]
    fn test_encoding() {
        assert_eq!(
            KeyPair::from_private_key(PrivateKey::from_scalar(Scalar::ONE).unwrap()).to_bytes(),
            [
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 1
            ]
        );

        // Test random keys encoding
        let mut rng = OsRng;

        for _ in 0..100 {
            let key_pair = KeyPair::new(&mut rng);
            let bytes = key_pair.to_bytes();

            assert_eq!(key_pair, KeyPair::from_bytes(&bytes).unwrap());
        }

        assert_eq!(KeyPair::from_bytes(&[0u8; 32]), Err(Error::InvalidPrivateKey));
    }

    #[test]
    fn test_public_key_matches_private_key() {
        let mut rng = OsRng;

        for _ in 0..20 {
            let key_pair = KeyPair::new(&mut rng);
            let restored = KeyPair::from_bytes(&key_pair.to_bytes()).unwrap();

            for pair in [key_pair, restored] {
                let skey = pair.private_key();
                assert_eq!(pair.public_key(), skey.public_key());
                assert_eq!(
                    pair.address(true, &MAINNET),
                    Address::p2pkh(&skey.public_key(), true).to_base58(&MAINNET)
                );

                let signature = pair.sign_message(b"own key", true).unwrap();
                assert!(pair.verify_message(&signature, b"own key").is_ok());
            }
            assert_eq!(restored, key_pair);
        }
    }

    #[test]
    fn test_messages() {
        let mut rng = OsRng;
        let key_pair = KeyPair::new(&mut rng);
        let other = KeyPair::new(&mut rng);

        let signature = key_pair.sign_message(b"signed", true).unwrap();
        assert!(key_pair.verify_message(&signature, b"signed").is_ok());
        assert!(other.verify_message(&signature, b"signed").is_err());
        assert!(crate::message::verify_message(
            &key_pair.address(true, &MAINNET),
            &signature,
            b"signed",
            &MAINNET
        )
        .is_ok());

        let text = encrypt_message(b"secret", &key_pair.public_key(), &mut rng).unwrap();
        assert_eq!(key_pair.decrypt_message(&text).unwrap(), b"secret");
        assert_eq!(
            other.decrypt_message(&text),
            Err(Error::AuthenticationFailed)
        );
    }
}
