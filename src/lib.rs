// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This crate provides Bitcoin-compatible key management on secp256k1:
//! base58 codecs, addresses and WIF keys, low-S deterministic ECDSA with
//! recoverable message signatures, BIP32 hierarchical derivation and
//! ECIES encryption.

//! # Usage
//!
//! To generate a new random key pair and derive its P2PKH address:
//!
//! ```rust
//! use btc_keys::KeyPair;
//! use btc_keys::network::MAINNET;
//! use rand_core::OsRng;
//!
//! let key_pair = KeyPair::new(OsRng);
//! let address = key_pair.address(true, &MAINNET);
//!
//! assert!(address.starts_with('1'));
//! ```
//!
//! Signatures over 32-byte digests are deterministic and always low-S:
//!
//! ```rust
//! use btc_keys::hash::sha256;
//! use btc_keys::{PrivateKey, Signature};
//! use rand_core::OsRng;
//!
//! let skey = PrivateKey::new(OsRng);
//! let digest = sha256(b"digest");
//!
//! let signature = Signature::sign(&digest, &skey).unwrap();
//!
//! assert!(signature.is_low_s());
//! assert_eq!(signature, skey.sign(&digest).unwrap());
//! assert!(skey.public_key().verify_signature(&signature, &digest).is_ok());
//! ```
//!
//! Messages are signed with recoverable signatures, which are checked
//! against an address:
//!
//! ```rust
//! use btc_keys::message::{sign_message, verify_message};
//! use btc_keys::network::MAINNET;
//! use btc_keys::{KeyPair, RecoverableSignature};
//! use rand_core::OsRng;
//!
//! let key_pair = KeyPair::new(OsRng);
//! let address = key_pair.address(true, &MAINNET);
//!
//! let signature = sign_message(b"Hello", &key_pair.private_key(), true).unwrap();
//! let text = signature.to_base64();
//!
//! let parsed = RecoverableSignature::from_base64(&text).unwrap();
//! assert!(verify_message(&address, &parsed, b"Hello", &MAINNET).is_ok());
//! ```
//!
//! Extended keys follow BIP32:
//!
//! ```rust
//! use btc_keys::network::MAINNET;
//! use btc_keys::{DerivationPath, ExtendedPrivateKey};
//!
//! let seed = [0u8; 16];
//! let root = ExtendedPrivateKey::generate_master_key(&seed, 0).unwrap();
//!
//! let path: DerivationPath = "m/0'/1".parse().unwrap();
//! let child = root.derive_path(&path).unwrap();
//!
//! assert_eq!(child.depth, 2);
//! assert!(child.to_base58(&MAINNET).starts_with("xprv"));
//! assert!(child.to_extended_public().to_base58(&MAINNET).starts_with("xpub"));
//! ```
//!
//! Envelopes encrypted to a public key can only be opened with the
//! matching private key:
//!
//! ```rust
//! use btc_keys::ecies::{decrypt_message, encrypt_message};
//! use btc_keys::PrivateKey;
//! use rand_core::OsRng;
//!
//! let skey = PrivateKey::new(OsRng);
//! let text = encrypt_message(b"secret", &skey.public_key(), OsRng).unwrap();
//!
//! assert_eq!(decrypt_message(&text, &skey).unwrap(), b"secret");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod constants;
pub use constants::*;

mod error;

/// The network profile module.
pub mod network;

/// The hashing module.
pub mod hash;

/// The base58 and base43 module.
pub mod base58;

/// The curve point module.
pub mod point;

/// The private key module.
mod private;

/// The public key module.
mod public;

/// The address and minikey module.
pub mod address;

/// The key pair module.
mod keypair;

/// The ECDSA signature module.
mod signature;

/// The message signing module.
pub mod message;

/// The ECIES module.
pub mod ecies;

/// The derivation path module.
mod path;

/// The key derivation module.
pub mod derivation;

/// The seed module.
pub mod seed;

pub use error::{Error, ErrorKind, Validity};

pub use network::{Network, NetworkParams};

pub use private::PrivateKey;
pub use public::PublicKey;

pub use keypair::KeyPair;

pub use address::{Address, AddressType};

pub use signature::{RecoverableSignature, Signature};

pub use path::{ChildNumber, DerivationPath};

pub use derivation::{ChainCode, ExtendedPrivateKey, ExtendedPublicKey};

pub use seed::SeedProvider;
