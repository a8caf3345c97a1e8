// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Entry points turning seeds into BIP32 roots.
//!
//! Turning human words into seed bytes is left to a [`SeedProvider`].

use super::derivation::{private_derivation, ExtendedPrivateKey};
use super::error::Error;
use super::hash::hmac_sha512;
use super::network::NetworkParams;

/// Source of seed bytes for a mnemonic and a passphrase
pub trait SeedProvider {
    /// Stretches `words` and `passphrase` into a seed
    fn to_seed(&self, words: &str, passphrase: &str) -> Result<Vec<u8>, Error>;
}

impl<F> SeedProvider for F
where
    F: Fn(&str, &str) -> Result<Vec<u8>, Error>,
{
    fn to_seed(&self, words: &str, passphrase: &str) -> Result<Vec<u8>, Error> {
        self(words, passphrase)
    }
}

/// Serialized master `xprv` and `xpub` of a seed
pub fn root_from_seed(
    seed: &[u8],
    xtype: u32,
    params: &NetworkParams,
) -> Result<(String, String), Error> {
    let root = ExtendedPrivateKey::generate_master_key(seed, xtype)?;

    Ok((
        root.to_base58(params),
        root.to_extended_public().to_base58(params),
    ))
}

/// Derives the `xprv` and `xpub` at `derivation` for a mnemonic
pub fn keys_from_seed(
    provider: &impl SeedProvider,
    words: &str,
    passphrase: &str,
    derivation: &str,
    params: &NetworkParams,
) -> Result<(String, String), Error> {
    let seed = provider.to_seed(words, passphrase)?;
    let (xprv, _) = root_from_seed(&seed, 0, params)?;

    private_derivation(&xprv, "m/", derivation, params)
}

/// Whether already normalized mnemonic text carries the given seed
/// version prefix, i.e. whether the hex HMAC-SHA512 of the text under
/// the key `Seed version` starts with `prefix`
pub fn is_new_seed(text: &str, prefix: &str) -> bool {
    let digest = hmac_sha512(b"Seed version", text.as_bytes());

    hex::encode(digest).starts_with(prefix)
}

/// Whether `text` is a seed for the given network's seed version
pub fn is_network_seed(text: &str, params: &NetworkParams) -> bool {
    is_new_seed(text, params.seed_prefix)
}
