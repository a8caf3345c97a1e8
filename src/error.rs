// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// Custom error type for key, codec and cipher operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A character outside of the configured alphabet
    #[error("Invalid character {character:?} for the base-{base} alphabet.")]
    InvalidCharacter {
        /// The offending character
        character: char,
        /// The alphabet size
        base: u32,
    },
    /// A buffer or string of unexpected length
    #[error("Invalid length: expected {expected}, got {actual}.")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
    /// An extended key header matching no accepted (network, type) pair
    #[error("Unrecognized extended key header {0:#010x}.")]
    UnknownHeader(u32),
    /// An address tag matching no accepted address type
    #[error("Unrecognized address type {0}.")]
    UnknownAddressType(u8),
    /// A serialized point with a bad leading marker byte
    #[error("Invalid point marker {0:#04x}.")]
    InvalidPointMarker(u8),
    /// A point that is not on the curve, or the point at infinity
    #[error("The point is not a valid secp256k1 point.")]
    InvalidPoint,
    /// A private scalar which is zero or not below the curve order
    #[error("The private key is out of range.")]
    InvalidPrivateKey,
    /// A malformed derivation path
    #[error("Invalid derivation path: {0}.")]
    InvalidPath(String),
    /// A derivation branch which is not a prefix of the requested path
    #[error("The derivation path does not start with the given branch.")]
    BranchMismatch,
    /// A malformed recoverable signature header
    #[error("Invalid signature header byte {0}.")]
    InvalidSignatureHeader(u8),
    /// A recovery id outside of `0..4`
    #[error("Invalid recovery id {0}.")]
    InvalidRecoveryId(u8),
    /// A WIF payload whose trailing byte is not the compression flag
    #[error("Invalid WIF compression flag {0:#04x}.")]
    InvalidCompressionFlag(u8),
    /// A malformed ECIES envelope
    #[error("Invalid ciphertext: {0}.")]
    InvalidCiphertext(&'static str),
    /// A malformed minikey
    #[error("The text is not a minikey.")]
    InvalidMinikey,
    /// A malformed base64 payload
    #[error("Invalid base64 encoding.")]
    InvalidBase64,

    /// A base58Check checksum mismatch
    #[error("Checksum mismatch.")]
    ChecksumMismatch,
    /// A MAC mismatch
    #[error("Authentication failed.")]
    AuthenticationFailed,
    /// A signature that does not verify
    #[error("The signature is invalid or was incorrectly computed.")]
    InvalidSignature,
    /// A decoded value that does not re-encode to the same text, or a
    /// recovered address that differs from the claimed one
    #[error("Address mismatch.")]
    AddressMismatch,
    /// A failed minikey self check
    #[error("The minikey check failed.")]
    MinikeyCheckFailed,
    /// A padding failure after decryption, i.e. a wrong key
    #[error("Invalid password.")]
    InvalidPassword,

    /// Public derivation requested for a hardened index
    #[error("Cannot derive hardened child {0} from a public key.")]
    HardenedFromPublic(u32),
    /// Derivation produced an invalid key
    #[error("Derived key for index {0} is invalid.")]
    InvalidChildKey(u32),
    /// The seed produced an invalid master key
    #[error("The seed produced an invalid master key.")]
    InvalidMasterKey,
    /// Derivation beyond depth 255
    #[error("Maximum derivation depth exceeded.")]
    DepthOverflow,

    /// No Y coordinate found within the search bound
    #[error("No Y coordinate found for the given X.")]
    NoCurvePoint,
    /// No recovery identifier reproduces the signing key
    #[error("Cannot sign message: no recovery id matches the signing key.")]
    RecoveryFailed,

    /// The process-wide network profile was already selected
    #[error("The network profile was already selected.")]
    NetworkAlreadySelected,
    /// An unknown network name
    #[error("Unknown network {0:?}.")]
    UnknownNetwork(String),
    /// The seed provider rejected its input
    #[error("Seed provider failure: {0}.")]
    Seed(String),
}

/// Broad classes of failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong length, bad character, unknown tag or marker
    Malformed,
    /// Checksum, MAC or signature mismatch
    Integrity,
    /// The operation is not permitted on these inputs
    Domain,
    /// A bounded search ran out
    Exhaustion,
    /// Configuration misuse
    Config,
}

impl Error {
    /// Returns the class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCharacter { .. }
            | Self::InvalidLength { .. }
            | Self::UnknownHeader(_)
            | Self::UnknownAddressType(_)
            | Self::InvalidPointMarker(_)
            | Self::InvalidPoint
            | Self::InvalidPrivateKey
            | Self::InvalidPath(_)
            | Self::BranchMismatch
            | Self::InvalidSignatureHeader(_)
            | Self::InvalidRecoveryId(_)
            | Self::InvalidCompressionFlag(_)
            | Self::InvalidCiphertext(_)
            | Self::InvalidMinikey
            | Self::InvalidBase64
            | Self::Seed(_) => ErrorKind::Malformed,
            Self::ChecksumMismatch
            | Self::AuthenticationFailed
            | Self::InvalidSignature
            | Self::AddressMismatch
            | Self::MinikeyCheckFailed
            | Self::InvalidPassword => ErrorKind::Integrity,
            Self::HardenedFromPublic(_)
            | Self::InvalidChildKey(_)
            | Self::InvalidMasterKey
            | Self::DepthOverflow => ErrorKind::Domain,
            Self::NoCurvePoint | Self::RecoveryFailed => ErrorKind::Exhaustion,
            Self::NetworkAlreadySelected | Self::UnknownNetwork(_) => ErrorKind::Config,
        }
    }

    /// Whether this error reports an integrity (authentication) failure
    pub fn is_integrity_failure(&self) -> bool {
        self.kind() == ErrorKind::Integrity
    }
}

/// Outcome of probing text for a well-formed, valid value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    /// Well-formed and valid
    Valid,
    /// Well-formed, but failing an integrity or domain check
    Invalid,
    /// Not parseable at all
    Malformed,
}

impl Validity {
    /// Classifies the result of a parsing operation
    pub fn of<T>(result: &Result<T, Error>) -> Self {
        match result {
            Ok(_) => Validity::Valid,
            Err(e) => match e.kind() {
                ErrorKind::Integrity | ErrorKind::Domain => Validity::Invalid,
                _ => Validity::Malformed,
            },
        }
    }

    /// Returns `true` for `Validity::Valid`
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}
