// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Signed messages: a domain separated digest of the message, signed
//! with a recoverable signature and checked against an address.

use super::address::Address;
use super::error::Error;
use super::hash::hash256;
use super::network::NetworkParams;
use super::signature::RecoverableSignature;
use super::{PrivateKey, PublicKey, MESSAGE_MAGIC};

use log::debug;

/// Encodes `n` as a Bitcoin compact-size integer
pub fn compact_size(n: u64) -> Vec<u8> {
    match n {
        0..=0xfc => vec![n as u8],
        0xfd..=0xffff => {
            let mut bytes = vec![0xfd];
            bytes.extend_from_slice(&(n as u16).to_le_bytes());
            bytes
        }
        0x1_0000..=0xffff_ffff => {
            let mut bytes = vec![0xfe];
            bytes.extend_from_slice(&(n as u32).to_le_bytes());
            bytes
        }
        _ => {
            let mut bytes = vec![0xff];
            bytes.extend_from_slice(&n.to_le_bytes());
            bytes
        }
    }
}

/// The bytes actually hashed when signing `message`: the magic prefix,
/// the message length, then the message
pub fn message_magic(message: &[u8]) -> Vec<u8> {
    let length = compact_size(message.len() as u64);

    let mut bytes = Vec::with_capacity(MESSAGE_MAGIC.len() + length.len() + message.len());
    bytes.extend_from_slice(MESSAGE_MAGIC);
    bytes.extend_from_slice(&length);
    bytes.extend_from_slice(message);

    bytes
}

/// Double SHA-256 of the magic-prefixed message
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    hash256(&message_magic(message))
}

/// Signs a message, flagging whether the signer's address uses the
/// compressed public key
pub fn sign_message(
    message: &[u8],
    skey: &PrivateKey,
    compressed: bool,
) -> Result<RecoverableSignature, Error> {
    RecoverableSignature::sign(&message_digest(message), skey, compressed)
}

/// Recovers the public key that signed `message`, along with whether
/// the signature claims the compressed form
pub fn public_key_from_signature(
    signature: &RecoverableSignature,
    message: &[u8],
) -> Result<(PublicKey, bool), Error> {
    let digest = message_digest(message);
    let pkey = signature.recover(&digest)?;
    signature.verify(&digest, &pkey)?;

    Ok((pkey, signature.compressed()))
}

/// Verifies that `signature` over `message` was produced by the key
/// behind `address`.
///
/// The signature may be given as raw bytes or base64 text through
/// [`RecoverableSignature`]'s decoders.
pub fn verify_message(
    address: &str,
    signature: &RecoverableSignature,
    message: &[u8],
    params: &NetworkParams,
) -> Result<(), Error> {
    let (pkey, compressed) = public_key_from_signature(signature, message).map_err(|e| {
        debug!("message signature rejected: {}", e);
        e
    })?;

    let recovered = Address::p2pkh(&pkey, compressed).to_base58(params);
    if recovered != address {
        debug!("message signature rejected: recovered address differs from the claimed one");
        return Err(Error::AddressMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::minikey_to_private_key;
    use crate::network::{MAINNET, TESTNET};
    use rand_core::OsRng;

    const MINIKEY: &str = "S6c56bnXQiBjk9mqSYE7ykVQ7NzrRy";

    #[test]
    fn test_compact_size() {
        assert_eq!(compact_size(0), vec![0]);
        assert_eq!(compact_size(0xfc), vec![0xfc]);
        assert_eq!(compact_size(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(compact_size(0x1234), vec![0xfd, 0x34, 0x12]);
        assert_eq!(compact_size(0x1_0000), vec![0xfe, 0, 0, 1, 0]);
        assert_eq!(
            compact_size(0x1_0000_0000),
            vec![0xff, 0, 0, 0, 0, 1, 0, 0, 0]
        );
    }

    #[test]
    fn test_message_magic() {
        assert_eq!(
            hex::encode(message_magic(b"Hello, world!")),
            "18426974636f696e205369676e6564204d6573736167653a0a0d48656c6c6f2c20776f726c6421"
        );

        let long = vec![b'a'; 300];
        let magic = message_magic(&long);
        assert_eq!(&magic[MESSAGE_MAGIC.len()..MESSAGE_MAGIC.len() + 3], &[0xfd, 0x2c, 0x01]);
    }

    #[test]
    fn test_sign_message_vectors() {
        let skey = minikey_to_private_key(MINIKEY).unwrap();

        let signature = sign_message(b"Hello, world!", &skey, true).unwrap();
        assert_eq!(
            signature.to_base64(),
            "II1mTpnqXhxGe5Hs9Cd4lDoEfAS6UnSc2OlV9k04P+IKCRSC4OUinf3v/m9HOAefftQ/lGvZC0GdinQfCYuUbfA="
        );
        assert!(verify_message(
            "1PZuicD1ACRfBuKEgp2XaJhVvnwpeETDyn",
            &signature,
            b"Hello, world!",
            &MAINNET
        )
        .is_ok());

        let signature = sign_message(b"Hello, world!", &skey, false).unwrap();
        assert_eq!(
            signature.to_base64(),
            "HI1mTpnqXhxGe5Hs9Cd4lDoEfAS6UnSc2OlV9k04P+IKCRSC4OUinf3v/m9HOAefftQ/lGvZC0GdinQfCYuUbfA="
        );
        assert!(verify_message(
            "1CciesT23BNionJeXrbxmjc7ywfiyM4oLW",
            &signature,
            b"Hello, world!",
            &MAINNET
        )
        .is_ok());
    }

    #[test]
    fn test_verify_message_rejections() {
        let skey = minikey_to_private_key(MINIKEY).unwrap();
        let signature = sign_message(b"Hello, world!", &skey, true).unwrap();

        // Another message recovers another key.
        assert!(verify_message(
            "1PZuicD1ACRfBuKEgp2XaJhVvnwpeETDyn",
            &signature,
            b"Hello, world?",
            &MAINNET
        )
        .is_err());

        // The uncompressed address of the same key is not the signer's.
        assert_eq!(
            verify_message(
                "1CciesT23BNionJeXrbxmjc7ywfiyM4oLW",
                &signature,
                b"Hello, world!",
                &MAINNET
            ),
            Err(Error::AddressMismatch)
        );

        // Same key, other network.
        assert_eq!(
            verify_message(
                "1PZuicD1ACRfBuKEgp2XaJhVvnwpeETDyn",
                &signature,
                b"Hello, world!",
                &TESTNET
            ),
            Err(Error::AddressMismatch)
        );
    }

    #[test]
    fn test_recovered_key_matches_signer() {
        let mut rng = OsRng;
        for _ in 0..10 {
            let skey = PrivateKey::new(&mut rng);
            let signature = sign_message(b"recover me", &skey, true).unwrap();
            let (pkey, compressed) = public_key_from_signature(&signature, b"recover me").unwrap();

            assert!(compressed);
            assert_eq!(pkey, skey.public_key());
            assert_eq!(
                Address::p2pkh(&pkey, true).to_base58(&MAINNET),
                Address::p2pkh(&skey.public_key(), true).to_base58(&MAINNET)
            );
        }
    }
}
