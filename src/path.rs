// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Child indices and derivation paths such as `m/0'/1/2'`.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::Error;
use super::BIP32_PRIME;

/// A 32-bit child index; indices at or above 2^31 are hardened
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct ChildNumber(pub u32);

impl ChildNumber {
    /// The `index`-th non-hardened child
    pub fn normal(index: u32) -> Result<Self, Error> {
        if index >= BIP32_PRIME {
            return Err(Error::InvalidPath(format!("index {} out of range", index)));
        }

        Ok(ChildNumber(index))
    }

    /// The `index`-th hardened child
    pub fn hardened(index: u32) -> Result<Self, Error> {
        if index >= BIP32_PRIME {
            return Err(Error::InvalidPath(format!("index {} out of range", index)));
        }

        Ok(ChildNumber(index | BIP32_PRIME))
    }

    /// Whether this index requires the parent private key
    pub fn is_hardened(self) -> bool {
        self.0 & BIP32_PRIME != 0
    }

    /// The index with the hardened bit cleared
    pub fn index(self) -> u32 {
        self.0 & !BIP32_PRIME
    }

    /// Big-endian encoding, as hashed during derivation and serialized
    /// in extended keys
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for ChildNumber {
    fn from(n: u32) -> Self {
        ChildNumber(n)
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (s, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPath(format!("invalid index {:?}", s)));
        }
        let index = digits
            .parse::<u32>()
            .map_err(|_| Error::InvalidPath(format!("index {:?} out of range", s)))?;

        if hardened {
            ChildNumber::hardened(index)
        } else {
            ChildNumber::normal(index)
        }
    }
}

/// An ordered sequence of child indices, applied left to right
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The empty path, designating the root itself
    pub fn master() -> Self {
        DerivationPath(Vec::new())
    }

    /// Iterates over the indices of this path
    pub fn iter(&self) -> impl Iterator<Item = &ChildNumber> {
        self.0.iter()
    }

    /// Number of derivation steps
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this path designates the root itself
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends one index
    pub fn child(&self, index: ChildNumber) -> Self {
        let mut path = self.0.clone();
        path.push(index);

        DerivationPath(path)
    }

    /// Returns the part of this path following `branch`, failing when
    /// `branch` is not a prefix of it
    pub fn strip_prefix(&self, branch: &DerivationPath) -> Result<DerivationPath, Error> {
        self.0
            .strip_prefix(branch.0.as_slice())
            .map(|rest| DerivationPath(rest.to_vec()))
            .ok_or(Error::BranchMismatch)
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(path: Vec<ChildNumber>) -> Self {
        DerivationPath(path)
    }
}

impl AsRef<[ChildNumber]> for DerivationPath {
    fn as_ref(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }

        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Parses slash-separated indices with an optional leading `m`.
    /// Empty segments are skipped, so `m/`, `/0` and `0//1` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('/').peekable();
        if segments.peek() == Some(&"m") {
            segments.next();
        }

        segments
            .filter(|segment| !segment.is_empty())
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(DerivationPath)
    }
}

#[cfg(feature = "serialize")]
impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serialize")]
impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
