// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module defines all constants used in this crate.

/// Scalar element length in bytes (serialized form)
pub const SCALAR_LENGTH: usize = 32;

/// Private key length in bytes (serialized form)
pub const PRIVATE_KEY_LENGTH: usize = SCALAR_LENGTH;

/// Basefield element length in bytes (serialized form)
pub const BASEFIELD_LENGTH: usize = 32;

/// Compressed public key length in bytes (parity marker and X coordinate)
pub const PUBLIC_KEY_LENGTH: usize = BASEFIELD_LENGTH + 1;

/// Uncompressed public key length in bytes (marker, X and Y coordinates)
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 2 * BASEFIELD_LENGTH + 1;

/// Key pair length in bytes (serialized form)
pub const KEY_PAIR_LENGTH: usize = PRIVATE_KEY_LENGTH;

/// Signature length in bytes (r and s, serialized form)
pub const SIGNATURE_LENGTH: usize = 2 * SCALAR_LENGTH;

/// Recoverable signature length in bytes (header byte, r and s)
pub const RECOVERABLE_SIGNATURE_LENGTH: usize = SIGNATURE_LENGTH + 1;

/// Lowest header byte of a recoverable signature
pub const RECOVERY_HEADER_BASE: u8 = 27;

/// Header offset flagging a signature made for a compressed public key
pub const RECOVERY_HEADER_COMPRESSED: u8 = 4;

/// Number of candidate recovery identifiers
pub const RECOVERY_ID_COUNT: u8 = 4;

/// Chain code length for deriving keys
pub const CHAIN_CODE_LENGTH: usize = 32;

/// Hash160 digest length
pub const HASH160_LENGTH: usize = 20;

/// Length of a base58Check checksum
pub const CHECKSUM_LENGTH: usize = 4;

/// Length of a key fingerprint
pub const FINGERPRINT_LENGTH: usize = 4;

/// Extended key length in bytes (serialized form, before checksum)
pub const EXTENDED_KEY_LENGTH: usize = 4 + 1 + FINGERPRINT_LENGTH + 4 + CHAIN_CODE_LENGTH + PUBLIC_KEY_LENGTH;

/// Offset added to an index to mark it as hardened
pub const BIP32_PRIME: u32 = 0x8000_0000;

/// HMAC key used when deriving a master extended key from a seed
pub const MASTER_KEY_SEED: &[u8] = b"Bitcoin seed";

/// Number of X offsets tried before giving up on recovering a Y coordinate
pub const Y_SEARCH_BOUND: u32 = 128;

/// Prefix prepended to messages before signing
pub const MESSAGE_MAGIC: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// Magic tag opening every ECIES envelope
pub const ECIES_MAGIC: &[u8; 4] = b"BIE1";

/// ECIES MAC length in bytes
pub const ECIES_MAC_LENGTH: usize = 32;

/// AES block length in bytes
pub const AES_BLOCK_LENGTH: usize = 16;

/// Shortest envelope accepted for decryption: magic, ephemeral key,
/// one cipher block and the MAC.
pub const ECIES_MIN_LENGTH: usize =
    ECIES_MAGIC.len() + PUBLIC_KEY_LENGTH + AES_BLOCK_LENGTH + ECIES_MAC_LENGTH;

/// Minimum length of a minikey
pub const MINIKEY_MIN_LENGTH: usize = 20;

/// Leading character of every minikey
pub const MINIKEY_PREFIX: char = 'S';

/// Character appended to a minikey before its self check
pub const MINIKEY_CHECK_SUFFIX: char = '?';

/// Flag byte appended to a WIF payload for compressed keys
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Witness program version used in P2WPKH base58 addresses
pub const P2WPKH_WITNESS_VERSION: u8 = 1;
