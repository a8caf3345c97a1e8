// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides an integrated encryption scheme on secp256k1.
//!
//! An envelope is the `BIE1` magic, the sender's ephemeral compressed
//! public key, the AES-128-CBC ciphertext and an HMAC-SHA256 over all of
//! the preceding bytes, wrapped in base64. The IV, the cipher key and the
//! MAC key are the three slices of the SHA-512 of the compressed shared
//! point.
//!
//! Decryption authenticates the envelope before the cipher ever runs.

use super::error::Error;
use super::hash::{hmac_sha256, sha512};
use super::{PrivateKey, PublicKey};
use super::{AES_BLOCK_LENGTH, ECIES_MAC_LENGTH, ECIES_MAGIC, ECIES_MIN_LENGTH, PUBLIC_KEY_LENGTH};

use aes::Aes128;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use k256::ProjectivePoint;
use log::debug;
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

const AES_KEY_LENGTH: usize = 16;

/// Encrypts `data` with AES-128-CBC and PKCS7 padding
pub fn aes_encrypt_with_iv(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = Aes128CbcEnc::new_from_slices(key, iv).map_err(|_| Error::InvalidLength {
        expected: AES_KEY_LENGTH,
        actual: key.len(),
    })?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}

/// Decrypts AES-128-CBC `data` and strips its PKCS7 padding.
///
/// A padding failure is reported as `Error::InvalidPassword`: with a
/// wrong key the padding is almost never well-formed.
pub fn aes_decrypt_with_iv(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = Aes128CbcDec::new_from_slices(key, iv).map_err(|_| Error::InvalidLength {
        expected: AES_KEY_LENGTH,
        actual: key.len(),
    })?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| Error::InvalidPassword)
}

/// Keys derived from an ECDH shared point
struct EnvelopeKeys {
    iv: [u8; AES_BLOCK_LENGTH],
    key_e: [u8; AES_KEY_LENGTH],
    key_m: [u8; ECIES_MAC_LENGTH],
}

impl EnvelopeKeys {
    fn derive(shared: ProjectivePoint) -> Result<Self, Error> {
        let shared = PublicKey::from_projective(shared)?;
        let digest = sha512(&shared.to_compressed());

        let mut keys = EnvelopeKeys {
            iv: [0u8; AES_BLOCK_LENGTH],
            key_e: [0u8; AES_KEY_LENGTH],
            key_m: [0u8; ECIES_MAC_LENGTH],
        };
        keys.iv.copy_from_slice(&digest[..16]);
        keys.key_e.copy_from_slice(&digest[16..32]);
        keys.key_m.copy_from_slice(&digest[32..]);

        Ok(keys)
    }
}

/// Encrypts `message` to `pkey`, drawing the ephemeral key from `rng`
pub fn encrypt_message(
    message: &[u8],
    pkey: &PublicKey,
    mut rng: impl CryptoRng + RngCore,
) -> Result<String, Error> {
    let ephemeral = PrivateKey::new(&mut rng);
    let keys = EnvelopeKeys::derive(ProjectivePoint::from(pkey.0) * ephemeral.0)?;

    let ciphertext = aes_encrypt_with_iv(&keys.key_e, &keys.iv, message)?;

    let mut envelope = Vec::with_capacity(
        ECIES_MAGIC.len() + PUBLIC_KEY_LENGTH + ciphertext.len() + ECIES_MAC_LENGTH,
    );
    envelope.extend_from_slice(ECIES_MAGIC);
    envelope.extend_from_slice(&ephemeral.public_key().to_compressed());
    envelope.extend_from_slice(&ciphertext);

    let mac = hmac_sha256(&keys.key_m, &envelope);
    envelope.extend_from_slice(&mac);

    Ok(STANDARD.encode(envelope))
}

/// Decrypts a base64 envelope with the recipient's private key.
///
/// The MAC is compared in constant time before any decryption; a
/// mismatch fails with `Error::AuthenticationFailed`.
pub fn decrypt_message(text: &str, skey: &PrivateKey) -> Result<Vec<u8>, Error> {
    let encrypted = STANDARD.decode(text.trim()).map_err(|_| {
        debug!("envelope rejected: invalid base64");
        Error::InvalidBase64
    })?;

    if encrypted.len() < ECIES_MIN_LENGTH {
        return Err(reject("too short"));
    }

    let (magic, rest) = encrypted.split_at(ECIES_MAGIC.len());
    if magic != ECIES_MAGIC {
        return Err(reject("bad magic"));
    }

    let ephemeral =
        PublicKey::from_bytes(&rest[..PUBLIC_KEY_LENGTH]).map_err(|_| reject("bad ephemeral key"))?;

    let mac_offset = encrypted.len() - ECIES_MAC_LENGTH;
    let (envelope, mac) = encrypted.split_at(mac_offset);
    let ciphertext = &envelope[ECIES_MAGIC.len() + PUBLIC_KEY_LENGTH..];

    let keys = EnvelopeKeys::derive(ProjectivePoint::from(ephemeral.0) * skey.0)?;

    let expected = hmac_sha256(&keys.key_m, envelope);
    if !bool::from(expected[..].ct_eq(mac)) {
        debug!("envelope rejected: MAC mismatch");
        return Err(Error::AuthenticationFailed);
    }

    aes_decrypt_with_iv(&keys.key_e, &keys.iv, ciphertext)
}

fn reject(reason: &'static str) -> Error {
    debug!("envelope rejected: {}", reason);
    Error::InvalidCiphertext(reason)
}
