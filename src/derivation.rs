// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides an implementation of BIP32 "hierarchical
//! deterministic key derivation" on secp256k1, along with the 78-byte
//! extended key serialization and its base58Check text form.

use super::base58::{decode_check, encode_check};
use super::error::{Error, Validity};
use super::hash::hmac_sha512;
use super::network::NetworkParams;
use super::path::{ChildNumber, DerivationPath};
use super::{PrivateKey, PublicKey};
use super::{
    CHAIN_CODE_LENGTH, EXTENDED_KEY_LENGTH, FINGERPRINT_LENGTH, MASTER_KEY_SEED,
    PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
};

use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar};
use log::trace;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// BIP32 chain codes, providing large entropy when deriving keys.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct ChainCode(pub [u8; CHAIN_CODE_LENGTH]);

impl ChainCode {
    fn from_slice(bytes: &[u8]) -> Self {
        let mut array = [0u8; CHAIN_CODE_LENGTH];
        array.copy_from_slice(bytes);

        ChainCode(array)
    }
}

/// Splits an HMAC-SHA512 output into a scalar tweak and a chain code.
/// The tweak is rejected when not below the curve order.
fn split_hmac(bytes: &[u8; 64], index: ChildNumber) -> Result<(Scalar, ChainCode), Error> {
    let tweak: Option<Scalar> =
        Scalar::from_repr(FieldBytes::clone_from_slice(&bytes[..PRIVATE_KEY_LENGTH])).into();
    let tweak = tweak.ok_or(Error::InvalidChildKey(index.0))?;

    Ok((tweak, ChainCode::from_slice(&bytes[PRIVATE_KEY_LENGTH..])))
}

impl PrivateKey {
    /// Derives a private child (either normal or hardened) from the provided
    /// private key, chaincode and index.
    pub fn derive_private(
        &self,
        chaincode: &ChainCode,
        index: ChildNumber,
    ) -> Result<(Self, ChainCode), Error> {
        let mut data = Vec::with_capacity(PUBLIC_KEY_LENGTH + 4);
        if index.is_hardened() {
            data.push(0);
            data.extend_from_slice(&self.to_bytes());
        } else {
            data.extend_from_slice(&self.public_key().to_compressed());
        }
        data.extend_from_slice(&index.to_bytes());

        let (tweak, chaincode) = split_hmac(&hmac_sha512(&chaincode.0, &data), index)?;
        let key =
            PrivateKey::from_scalar(tweak + self.0).map_err(|_| Error::InvalidChildKey(index.0))?;

        Ok((key, chaincode))
    }
}

impl PublicKey {
    /// Derives a non-hardened public child from the provided public key,
    /// chaincode and index.
    /// Fails with `Error::HardenedFromPublic` for a hardened index.
    pub fn derive_public(
        &self,
        chaincode: &ChainCode,
        index: ChildNumber,
    ) -> Result<(Self, ChainCode), Error> {
        if index.is_hardened() {
            return Err(Error::HardenedFromPublic(index.0));
        }

        let mut data = Vec::with_capacity(PUBLIC_KEY_LENGTH + 4);
        data.extend_from_slice(&self.to_compressed());
        data.extend_from_slice(&index.to_bytes());

        let (tweak, chaincode) = split_hmac(&hmac_sha512(&chaincode.0, &data), index)?;
        let point = ProjectivePoint::GENERATOR * tweak + ProjectivePoint::from(self.0);
        let key = PublicKey::from_projective(point).map_err(|_| Error::InvalidChildKey(index.0))?;

        Ok((key, chaincode))
    }
}

/// Fields shared by the serialized forms of both extended key kinds
struct Header {
    xtype: u32,
    depth: u8,
    parent_fingerprint: [u8; FINGERPRINT_LENGTH],
    child_number: ChildNumber,
    chaincode: ChainCode,
}

fn write_extended(header: &Header, base: u32, key: &[u8; PUBLIC_KEY_LENGTH]) -> [u8; EXTENDED_KEY_LENGTH] {
    let mut bytes = [0u8; EXTENDED_KEY_LENGTH];
    bytes[0..4].copy_from_slice(&base.wrapping_add(header.xtype).to_be_bytes());
    bytes[4] = header.depth;
    bytes[5..9].copy_from_slice(&header.parent_fingerprint);
    bytes[9..13].copy_from_slice(&header.child_number.to_bytes());
    bytes[13..45].copy_from_slice(&header.chaincode.0);
    bytes[45..].copy_from_slice(key);

    bytes
}

fn read_extended(
    bytes: &[u8],
    base: u32,
    params: &NetworkParams,
) -> Result<(Header, [u8; PUBLIC_KEY_LENGTH]), Error> {
    if bytes.len() != EXTENDED_KEY_LENGTH {
        return Err(Error::InvalidLength {
            expected: EXTENDED_KEY_LENGTH,
            actual: bytes.len(),
        });
    }

    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[0..4]);
    let version = u32::from_be_bytes(word);
    let xtype = version.wrapping_sub(base);
    if !params.xtypes.contains(&xtype) {
        return Err(Error::UnknownHeader(version));
    }

    let mut parent_fingerprint = [0u8; FINGERPRINT_LENGTH];
    parent_fingerprint.copy_from_slice(&bytes[5..9]);
    word.copy_from_slice(&bytes[9..13]);

    let mut key = [0u8; PUBLIC_KEY_LENGTH];
    key.copy_from_slice(&bytes[45..]);

    Ok((
        Header {
            xtype,
            depth: bytes[4],
            parent_fingerprint,
            child_number: ChildNumber(u32::from_be_bytes(word)),
            chaincode: ChainCode::from_slice(&bytes[13..45]),
        },
        key,
    ))
}

/// A BIP32 node holding a private key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct ExtendedPrivateKey {
    /// Key type, added to the network header base when serialized
    pub xtype: u32,
    /// Number of derivations from the master key
    pub depth: u8,
    /// Fingerprint of the parent's public key, zero for a master key
    pub parent_fingerprint: [u8; FINGERPRINT_LENGTH],
    /// Index this key was derived at, zero for a master key
    pub child_number: ChildNumber,
    /// A chain code
    pub chaincode: ChainCode,
    /// A private key
    pub key: PrivateKey,
}

impl ExtendedPrivateKey {
    /// Generates a master extended private key from a provided seed.
    pub fn generate_master_key(seed: &[u8], xtype: u32) -> Result<Self, Error> {
        let bytes = hmac_sha512(MASTER_KEY_SEED, seed);

        let key = PrivateKey::from_slice(&bytes[..PRIVATE_KEY_LENGTH])
            .map_err(|_| Error::InvalidMasterKey)?;
        let chaincode = ChainCode::from_slice(&bytes[PRIVATE_KEY_LENGTH..]);

        Ok(ExtendedPrivateKey {
            xtype,
            depth: 0,
            parent_fingerprint: [0u8; FINGERPRINT_LENGTH],
            child_number: ChildNumber(0),
            chaincode,
            key,
        })
    }

    /// Derives a private child (either normal or hardened) from the current
    /// extended private key.
    pub fn derive_private(&self, index: ChildNumber) -> Result<Self, Error> {
        let depth = self.depth.checked_add(1).ok_or(Error::DepthOverflow)?;
        let (key, chaincode) = self.key.derive_private(&self.chaincode, index)?;

        Ok(ExtendedPrivateKey {
            xtype: self.xtype,
            depth,
            parent_fingerprint: self.key.public_key().fingerprint(),
            child_number: index,
            chaincode,
            key,
        })
    }

    /// Derives a public child (either normal or hardened) from the current
    /// extended private key.
    pub fn derive_public(&self, index: ChildNumber) -> Result<ExtendedPublicKey, Error> {
        self.derive_private(index)
            .map(|child| ExtendedPublicKey::from_extended_private_key(&child))
    }

    /// Derives the node at `path` below this one
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, Error> {
        path.iter().try_fold(*self, |node, &index| {
            trace!("private derivation at depth {}: {}", node.depth, index);
            node.derive_private(index)
        })
    }

    /// Computes the matching extended public key
    pub fn to_extended_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey::from_extended_private_key(self)
    }

    /// Converts this extended private key to its 78-byte serialization
    pub fn to_bytes(&self, params: &NetworkParams) -> [u8; EXTENDED_KEY_LENGTH] {
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key[PUBLIC_KEY_LENGTH - PRIVATE_KEY_LENGTH..].copy_from_slice(&self.key.to_bytes());

        write_extended(&self.header(), params.xprv_header, &key)
    }

    /// Constructs an extended private key from its 78-byte serialization
    pub fn from_bytes(bytes: &[u8], params: &NetworkParams) -> Result<Self, Error> {
        let (header, key) = read_extended(bytes, params.xprv_header, params)?;
        if key[0] != 0 {
            return Err(Error::InvalidPrivateKey);
        }

        Ok(ExtendedPrivateKey {
            xtype: header.xtype,
            depth: header.depth,
            parent_fingerprint: header.parent_fingerprint,
            child_number: header.child_number,
            chaincode: header.chaincode,
            key: PrivateKey::from_slice(&key[1..])?,
        })
    }

    /// Encodes this key as an `xprv` string
    pub fn to_base58(&self, params: &NetworkParams) -> String {
        encode_check(&self.to_bytes(params))
    }

    /// Decodes an `xprv` string
    pub fn from_base58(text: &str, params: &NetworkParams) -> Result<Self, Error> {
        ExtendedPrivateKey::from_bytes(&decode_check(text)?, params)
    }

    /// Checks whether `text` is an extended private key of this network
    pub fn validate(text: &str, params: &NetworkParams) -> Validity {
        Validity::of(&ExtendedPrivateKey::from_base58(text, params))
    }

    fn header(&self) -> Header {
        Header {
            xtype: self.xtype,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chaincode: self.chaincode,
        }
    }
}

/// A BIP32 node holding a public key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct ExtendedPublicKey {
    /// Key type, added to the network header base when serialized
    pub xtype: u32,
    /// Number of derivations from the master key
    pub depth: u8,
    /// Fingerprint of the parent's public key, zero for a master key
    pub parent_fingerprint: [u8; FINGERPRINT_LENGTH],
    /// Index this key was derived at, zero for a master key
    pub child_number: ChildNumber,
    /// A chain code
    pub chaincode: ChainCode,
    /// A public key
    pub key: PublicKey,
}

impl ExtendedPublicKey {
    /// Computes the extended public key from a provided extended private key
    pub fn from_extended_private_key(extended_private_key: &ExtendedPrivateKey) -> Self {
        ExtendedPublicKey {
            xtype: extended_private_key.xtype,
            depth: extended_private_key.depth,
            parent_fingerprint: extended_private_key.parent_fingerprint,
            child_number: extended_private_key.child_number,
            chaincode: extended_private_key.chaincode,
            key: PublicKey::from(&extended_private_key.key),
        }
    }

    /// Wraps a bare public key as a root node with a zero chain code
    pub fn from_public_key(key: &PublicKey, xtype: u32) -> Self {
        ExtendedPublicKey {
            xtype,
            depth: 0,
            parent_fingerprint: [0u8; FINGERPRINT_LENGTH],
            child_number: ChildNumber(0),
            chaincode: ChainCode::default(),
            key: *key,
        }
    }

    /// Derives a non-hardened public child from the current extended
    /// public key.
    pub fn derive_public(&self, index: ChildNumber) -> Result<Self, Error> {
        let depth = self.depth.checked_add(1).ok_or(Error::DepthOverflow)?;
        let (key, chaincode) = self.key.derive_public(&self.chaincode, index)?;

        Ok(ExtendedPublicKey {
            xtype: self.xtype,
            depth,
            parent_fingerprint: self.key.fingerprint(),
            child_number: index,
            chaincode,
            key,
        })
    }

    /// Derives the node at `path` below this one. Any hardened index in
    /// `path` makes this fail.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, Error> {
        path.iter().try_fold(*self, |node, &index| {
            trace!("public derivation at depth {}: {}", node.depth, index);
            node.derive_public(index)
        })
    }

    /// Converts this extended public key to its 78-byte serialization
    pub fn to_bytes(&self, params: &NetworkParams) -> [u8; EXTENDED_KEY_LENGTH] {
        let header = Header {
            xtype: self.xtype,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chaincode: self.chaincode,
        };

        write_extended(&header, params.xpub_header, &self.key.to_compressed())
    }

    /// Constructs an extended public key from its 78-byte serialization
    pub fn from_bytes(bytes: &[u8], params: &NetworkParams) -> Result<Self, Error> {
        let (header, key) = read_extended(bytes, params.xpub_header, params)?;

        Ok(ExtendedPublicKey {
            xtype: header.xtype,
            depth: header.depth,
            parent_fingerprint: header.parent_fingerprint,
            child_number: header.child_number,
            chaincode: header.chaincode,
            key: PublicKey::from_bytes(&key)?,
        })
    }

    /// Encodes this key as an `xpub` string
    pub fn to_base58(&self, params: &NetworkParams) -> String {
        encode_check(&self.to_bytes(params))
    }

    /// Decodes an `xpub` string
    pub fn from_base58(text: &str, params: &NetworkParams) -> Result<Self, Error> {
        ExtendedPublicKey::from_bytes(&decode_check(text)?, params)
    }

    /// Checks whether `text` is an extended public key of this network
    pub fn validate(text: &str, params: &NetworkParams) -> Validity {
        Validity::of(&ExtendedPublicKey::from_base58(text, params))
    }
}

/// Returns the `xpub` string matching an `xprv` string
pub fn xpub_from_xprv(xprv: &str, params: &NetworkParams) -> Result<String, Error> {
    let xprv = ExtendedPrivateKey::from_base58(xprv, params)?;

    Ok(xprv.to_extended_public().to_base58(params))
}

/// Derives `sequence` from an `xprv` string standing at `branch`,
/// returning the `xprv` and `xpub` strings of the resulting node.
///
/// `branch` must be a prefix of `sequence`; only the remaining indices
/// are derived.
pub fn private_derivation(
    xprv: &str,
    branch: &str,
    sequence: &str,
    params: &NetworkParams,
) -> Result<(String, String), Error> {
    let node = ExtendedPrivateKey::from_base58(xprv, params)?;
    let rest = sequence
        .parse::<DerivationPath>()?
        .strip_prefix(&branch.parse()?)?;

    let child = node.derive_path(&rest)?;

    Ok((
        child.to_base58(params),
        child.to_extended_public().to_base58(params),
    ))
}

/// Derives `sequence` from an `xpub` string standing at `branch`,
/// returning the `xpub` string of the resulting node.
pub fn public_derivation(
    xpub: &str,
    branch: &str,
    sequence: &str,
    params: &NetworkParams,
) -> Result<String, Error> {
    let node = ExtendedPublicKey::from_base58(xpub, params)?;
    let rest = sequence
        .parse::<DerivationPath>()?
        .strip_prefix(&branch.parse()?)?;

    Ok(node.derive_path(&rest)?.to_base58(params))
}

/// Derives `sequence` from a private key and chain code, returning the
/// resulting key as a compressed WIF string
pub fn private_key_from_sequence(
    sequence: &DerivationPath,
    key: &PrivateKey,
    chaincode: &ChainCode,
    params: &NetworkParams,
) -> Result<String, Error> {
    let (key, _) = sequence
        .iter()
        .try_fold((*key, *chaincode), |(key, chaincode), &index| {
            key.derive_private(&chaincode, index)
        })?;

    Ok(key.to_wif(true, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{MAINNET, TESTNET};
    use crate::BIP32_PRIME;
    use rand_core::{OsRng, RngCore};

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    const MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

    fn master() -> ExtendedPrivateKey {
        ExtendedPrivateKey::generate_master_key(&hex::decode(SEED).unwrap(), 0).unwrap()
    }

    #[test]
    fn test_master_key() {
        let skey = master();
        assert_eq!(skey.to_base58(&MAINNET), MASTER_XPRV);
        assert_eq!(skey.to_extended_public().to_base58(&MAINNET), MASTER_XPUB);

        assert_eq!(
            ExtendedPrivateKey::from_base58(MASTER_XPRV, &MAINNET).unwrap(),
            skey
        );
        assert_eq!(
            ExtendedPublicKey::from_base58(MASTER_XPUB, &MAINNET).unwrap(),
            skey.to_extended_public()
        );
        assert_eq!(xpub_from_xprv(MASTER_XPRV, &MAINNET).unwrap(), MASTER_XPUB);
    }

    #[test]
    fn test_zero_seed_vector() {
        let root = ExtendedPrivateKey::generate_master_key(&[0u8; 16], 0).unwrap();
        assert_eq!(
            root.to_base58(&MAINNET),
            "xprv9s21ZrQH143K2JbpEjGU94NcdKSASB7LuXvJCTsxuENcGN1nVG7QjMnBZ6zZNcJaiJogsRaLaYFFjs48qt4Fg7y1GnmrchQt1zFNu6QVnta"
        );
        assert_eq!(
            root.to_extended_public().to_base58(&MAINNET),
            "xpub661MyMwAqRbcEngHLkoUWCKMBMGeqdqCGkqtzrHaTZub9ALw2oRfHA6fQP5n5X9VHStaNTBYomkSb8BFhUGavwD3RG1qvMkEKceTavTp2Tm"
        );

        let child = root.derive_path(&"m/0'/1/2'".parse().unwrap()).unwrap();
        assert_eq!(
            child.to_base58(&MAINNET),
            "xprv9zX28S8N1ZTB1DxnxGw78G8hQWctxmampbcPmFatsXn3HwvrPYXcmJNV9nCzxoSsXFSbXNVguYaGqqUH6ByjcF4mu3mDphqDjhMoYoPEsZQ"
        );
        assert_eq!(
            child.to_extended_public().to_base58(&MAINNET),
            "xpub6DWNXwfFqw1UDi3G4JU7VQ5RxYTPNEJdBpXzZdzWRsK2AkFzw5qsK6gy13Y49pVwBZdRh4kYaRogeGnenHFK4ksVrtUF7nNSAxzGzyBaUfw"
        );

        // A second derivation from the same seed is byte-identical.
        let again = ExtendedPrivateKey::generate_master_key(&[0u8; 16], 0)
            .unwrap()
            .derive_path(&"m/0'/1/2'".parse().unwrap())
            .unwrap();
        assert_eq!(again.to_bytes(&MAINNET), child.to_bytes(&MAINNET));
    }

    #[test]
    fn test_vector_path() {
        let child = master()
            .derive_path(&"m/0'/1/2'".parse().unwrap())
            .unwrap();

        assert_eq!(child.depth, 3);
        assert_eq!(child.child_number, ChildNumber(BIP32_PRIME + 2));
        assert_eq!(
            child.to_base58(&MAINNET),
            "xprv9z4pot5VBttmtdRTWfWQmoH1taj2axGVzFqSb8C9xaxKymcFzXBDptWmT7FwuEzG3ryjH4ktypQSAewRiNMjANTtpgP4mLTj34bhnZX7UiM"
        );
        assert_eq!(
            child.to_extended_public().to_base58(&MAINNET),
            "xpub6D4BDPcP2GT577Vvch3R8wDkScZWzQzMMUm3PWbmWvVJrZwQY4VUNgqFJPMM3No2dFDFGTsxxpG5uJh7n7epu4trkrX7x7DogT5Uv6fcLW5"
        );
    }

    #[test]
    fn test_derive() {
        let mut rng = OsRng;
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);

        let skey = ExtendedPrivateKey::generate_master_key(&seed, 0).unwrap();
        let pkey = ExtendedPublicKey::from_extended_private_key(&skey);

        for _ in 0..50 {
            // We ensure that children are non-hardened to be able to derive
            // public children from the extended public key.
            let i = ChildNumber(rng.next_u32() & !BIP32_PRIME);
            let skey_child_private = skey.derive_private(i).unwrap();
            let skey_child_public = skey.derive_public(i).unwrap();
            let pkey_child_public = pkey.derive_public(i).unwrap();

            assert_eq!(
                ExtendedPublicKey::from_extended_private_key(&skey_child_private),
                skey_child_public
            );
            assert_eq!(pkey_child_public, skey_child_public);
        }

        // Derivation of a hardened child from a public key should fail
        {
            let i = ChildNumber(BIP32_PRIME);
            assert_eq!(pkey.derive_public(i), Err(Error::HardenedFromPublic(BIP32_PRIME)));
            assert!(pkey.derive_path(&"m/0/1'".parse().unwrap()).is_err());
        }

        // Deriving twice yields identical nodes
        let path: DerivationPath = "m/44'/0'/0'/1/7".parse().unwrap();
        assert_eq!(skey.derive_path(&path), skey.derive_path(&path));
    }

    #[test]
    fn test_depth_overflow() {
        let mut skey = master();
        skey.depth = u8::MAX;
        assert_eq!(skey.derive_private(ChildNumber(0)), Err(Error::DepthOverflow));

        let mut pkey = master().to_extended_public();
        pkey.depth = u8::MAX;
        assert_eq!(pkey.derive_public(ChildNumber(0)), Err(Error::DepthOverflow));
    }

    #[test]
    fn test_text_helpers() {
        let (xprv, xpub) = private_derivation(MASTER_XPRV, "m", "m/0'/1", &MAINNET).unwrap();
        assert_eq!(
            xprv,
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs"
        );
        assert_eq!(
            xpub,
            "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
        );

        // From m/0'/1, continue to m/0'/1/2'/2/1000000000.
        let (xprv, xpub) =
            private_derivation(&xprv, "m/0'/1", "m/0'/1/2'/2/1000000000", &MAINNET).unwrap();
        assert_eq!(
            xprv,
            "xprvA41z7zogVVwxVSgdKUHDy1SKmdb533PjDz7J6N6mV6uS3ze1ai8FHa8kmHScGpWmj4WggLyQjgPie1rFSruoUihUZREPSL39UNdE3BBDu76"
        );
        assert_eq!(
            xpub,
            "xpub6H1LXWLaKsWFhvm6RVpEL9P4KfRZSW7abD2ttkWP3SSQvnyA8FSVqNTEcYFgJS2UaFcxupHiYkro49S8yGasTvXEYBVPamhGW6cFJodrTHy"
        );

        // Public derivation of the non-hardened tail gives the same xpub.
        let xpub_2h = "xpub6D4BDPcP2GT577Vvch3R8wDkScZWzQzMMUm3PWbmWvVJrZwQY4VUNgqFJPMM3No2dFDFGTsxxpG5uJh7n7epu4trkrX7x7DogT5Uv6fcLW5";
        assert_eq!(
            public_derivation(xpub_2h, "m/0'/1/2'", "m/0'/1/2'/2/1000000000", &MAINNET).unwrap(),
            xpub
        );

        assert_eq!(
            public_derivation(MASTER_XPUB, "m", "m/0'", &MAINNET),
            Err(Error::HardenedFromPublic(BIP32_PRIME))
        );
        assert_eq!(
            private_derivation(MASTER_XPRV, "m/1", "m/0'/1", &MAINNET),
            Err(Error::BranchMismatch)
        );
    }

    #[test]
    fn test_private_key_from_sequence() {
        let skey = master();
        let path: DerivationPath = "m/0'/1".parse().unwrap();

        let wif = private_key_from_sequence(&path, &skey.key, &skey.chaincode, &MAINNET).unwrap();
        let (key, compressed) = PrivateKey::from_wif(&wif, &MAINNET).unwrap();

        assert!(compressed);
        assert_eq!(key, skey.derive_path(&path).unwrap().key);
    }

    #[test]
    fn test_from_public_key() {
        let pkey = master().key.public_key();
        let root = ExtendedPublicKey::from_public_key(&pkey, 0);

        assert_eq!(root.depth, 0);
        assert_eq!(root.chaincode, ChainCode([0u8; CHAIN_CODE_LENGTH]));
        assert_eq!(
            ExtendedPublicKey::from_base58(&root.to_base58(&MAINNET), &MAINNET).unwrap(),
            root
        );
    }

    #[test]
    fn test_invalid_encodings() {
        let skey = master();
        let bytes = skey.to_bytes(&MAINNET);

        assert_eq!(
            ExtendedPrivateKey::from_bytes(&bytes[..77], &MAINNET),
            Err(Error::InvalidLength {
                expected: EXTENDED_KEY_LENGTH,
                actual: 77
            })
        );

        // An xprv header is not an xpub header.
        assert_eq!(
            ExtendedPublicKey::from_bytes(&bytes, &MAINNET),
            Err(Error::UnknownHeader(MAINNET.xprv_header))
        );

        // Testnet accepts key type 1, mainnet does not.
        let mut typed = skey;
        typed.xtype = 1;
        let text = typed.to_base58(&TESTNET);
        assert_eq!(ExtendedPrivateKey::from_base58(&text, &TESTNET).unwrap(), typed);
        assert_eq!(
            ExtendedPrivateKey::from_base58(&typed.to_base58(&MAINNET), &MAINNET),
            Err(Error::UnknownHeader(MAINNET.xprv_header + 1))
        );
        assert_eq!(
            ExtendedPrivateKey::validate(MASTER_XPRV, &TESTNET),
            Validity::Malformed
        );

        // The private key must be preceded by a zero byte.
        let mut tampered = bytes;
        tampered[45] = 1;
        assert_eq!(
            ExtendedPrivateKey::from_base58(&encode_check(&tampered), &MAINNET),
            Err(Error::InvalidPrivateKey)
        );

        // A zero private key is out of range.
        let mut tampered = bytes;
        tampered[46..].copy_from_slice(&[0u8; 32]);
        assert_eq!(
            ExtendedPrivateKey::from_bytes(&tampered, &MAINNET),
            Err(Error::InvalidPrivateKey)
        );

        // A bad point marker in an xpub.
        let mut tampered = skey.to_extended_public().to_bytes(&MAINNET);
        tampered[45] = 0x04;
        assert!(ExtendedPublicKey::from_bytes(&tampered, &MAINNET).is_err());

        assert_eq!(
            ExtendedPrivateKey::validate(MASTER_XPRV, &MAINNET),
            Validity::Valid
        );
        assert_eq!(
            ExtendedPublicKey::validate(MASTER_XPRV, &MAINNET),
            Validity::Malformed
        );
        let mut broken = MASTER_XPUB.to_string();
        broken.pop();
        broken.push('9');
        assert_eq!(
            ExtendedPublicKey::validate(&broken, &MAINNET),
            Validity::Invalid
        );
    }

    #[test]
    #[cfg(feature = "serialize")]
    fn test_extended_private_key_serde() {
        let ext_skey = master().derive_private(ChildNumber(BIP32_PRIME)).unwrap();

        let encoded = bincode::serialize(&ext_skey).unwrap();
        let parsed: ExtendedPrivateKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(parsed, ext_skey);

        let encoded = bincode::serialize(&ext_skey).unwrap();
        assert!(bincode::deserialize::<ExtendedPrivateKey>(&encoded[0..encoded.len() - 1]).is_err());
    }

    #[test]
    #[cfg(feature = "serialize")]
    fn test_extended_public_key_serde() {
        let ext_pkey = master().derive_public(ChildNumber(1)).unwrap();

        let encoded = bincode::serialize(&ext_pkey).unwrap();
        let parsed: ExtendedPublicKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(parsed, ext_pkey);
    }
}
