// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides checksummed base-58 addresses built from hash160
//! digests, and the minikey private key encoding.

use super::base58::{decode_check, encode_check, Base};
use super::error::{Error, Validity};
use super::hash::sha256;
use super::network::NetworkParams;
use super::{PrivateKey, PublicKey};
use super::{
    HASH160_LENGTH, MINIKEY_CHECK_SUFFIX, MINIKEY_MIN_LENGTH, MINIKEY_PREFIX,
    P2WPKH_WITNESS_VERSION,
};

/// Kinds of addresses, each carrying its own tag byte per network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// Pay to public key hash
    P2pkh,
    /// Pay to script hash
    P2sh,
    /// Pay to witness public key hash
    P2wpkh,
}

impl AddressType {
    /// Returns the tag byte of this address type on the given network
    pub fn tag(self, params: &NetworkParams) -> u8 {
        match self {
            AddressType::P2pkh => params.p2pkh,
            AddressType::P2sh => params.p2sh,
            AddressType::P2wpkh => params.p2wpkh,
        }
    }

    /// Looks up the address type of a tag byte on the given network
    pub fn from_tag(tag: u8, params: &NetworkParams) -> Result<Self, Error> {
        [AddressType::P2pkh, AddressType::P2sh, AddressType::P2wpkh]
            .into_iter()
            .find(|address_type| address_type.tag(params) == tag)
            .ok_or(Error::UnknownAddressType(tag))
    }

    fn payload_length(self) -> usize {
        match self {
            AddressType::P2wpkh => HASH160_LENGTH + 3,
            _ => HASH160_LENGTH + 1,
        }
    }
}

/// An address, i.e. a typed hash160 digest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// The kind of this address
    pub address_type: AddressType,
    /// The hash160 digest it commits to
    pub hash: [u8; HASH160_LENGTH],
}

impl Address {
    /// Pay-to-pubkey-hash address of a public key
    pub fn p2pkh(pkey: &PublicKey, compressed: bool) -> Self {
        Address {
            address_type: AddressType::P2pkh,
            hash: pkey.hash160(compressed),
        }
    }

    /// Pay-to-script-hash address of a script hash
    pub fn p2sh(script_hash: [u8; HASH160_LENGTH]) -> Self {
        Address {
            address_type: AddressType::P2sh,
            hash: script_hash,
        }
    }

    /// Pay-to-witness-pubkey-hash address of a compressed public key
    pub fn p2wpkh(pkey: &PublicKey) -> Self {
        Address {
            address_type: AddressType::P2wpkh,
            hash: pkey.hash160(true),
        }
    }

    /// Encodes this address with the tags of the given network
    pub fn to_base58(&self, params: &NetworkParams) -> String {
        let mut payload = Vec::with_capacity(self.address_type.payload_length());
        payload.push(self.address_type.tag(params));
        if self.address_type == AddressType::P2wpkh {
            payload.push(P2WPKH_WITNESS_VERSION);
            payload.push(0);
        }
        payload.extend_from_slice(&self.hash);

        encode_check(&payload)
    }

    /// Decodes an address string.
    ///
    /// The tag must be one of the network's address tags, and the decoded
    /// address must re-encode to exactly `text`.
    pub fn from_base58(text: &str, params: &NetworkParams) -> Result<Self, Error> {
        let payload = decode_check(text)?;
        let tag = *payload.first().ok_or(Error::InvalidLength {
            expected: HASH160_LENGTH + 1,
            actual: 0,
        })?;

        let address_type = AddressType::from_tag(tag, params)?;
        let expected = address_type.payload_length();
        if payload.len() != expected {
            return Err(Error::InvalidLength {
                expected,
                actual: payload.len(),
            });
        }

        let mut hash = [0u8; HASH160_LENGTH];
        hash.copy_from_slice(&payload[expected - HASH160_LENGTH..]);
        let address = Address { address_type, hash };

        if address.to_base58(params) != text {
            return Err(Error::AddressMismatch);
        }

        Ok(address)
    }

    /// Checks whether `text` is an address of the given network
    pub fn validate(text: &str, params: &NetworkParams) -> Validity {
        Validity::of(&Address::from_base58(text, params))
    }
}

/// P2PKH address of the key encoded by a WIF string, in the compression
/// form the WIF string specifies
pub fn address_from_wif(wif: &str, params: &NetworkParams) -> Result<String, Error> {
    let (skey, compressed) = PrivateKey::from_wif(wif, params)?;

    Ok(Address::p2pkh(&skey.public_key(), compressed).to_base58(params))
}

/// Decodes a minikey into its private key.
///
/// A minikey is a base-58 string of at least 20 characters starting with
/// `S`, whose SHA-256 with a `?` appended starts with a zero byte. The
/// private key is the SHA-256 of the text itself.
pub fn minikey_to_private_key(text: &str) -> Result<PrivateKey, Error> {
    if text.len() < MINIKEY_MIN_LENGTH
        || !text.starts_with(MINIKEY_PREFIX)
        || !text.chars().all(|c| Base::Base58.contains(c))
    {
        return Err(Error::InvalidMinikey);
    }

    let mut check = String::with_capacity(text.len() + 1);
    check.push_str(text);
    check.push(MINIKEY_CHECK_SUFFIX);
    if sha256(check.as_bytes())[0] != 0 {
        return Err(Error::MinikeyCheckFailed);
    }

    PrivateKey::from_bytes(&sha256(text.as_bytes()))
}

/// Checks whether `text` is a minikey
pub fn minikey_validity(text: &str) -> Validity {
    Validity::of(&minikey_to_private_key(text))
}
