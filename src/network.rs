// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Network profiles supplying address tags and extended key headers.
//!
//! Every codec takes its `NetworkParams` explicitly. Applications that
//! prefer a single profile for the whole process can select it once at
//! startup with [`init`] and read it back with [`active`]; the selection
//! cannot be changed afterwards.

use core::fmt;
use core::str::FromStr;

use log::info;
use once_cell::sync::OnceCell;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use super::error::Error;

/// Constants of a network profile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkParams {
    /// The network this profile describes
    pub network: Network,
    /// Address tag of pay-to-pubkey-hash addresses
    pub p2pkh: u8,
    /// Address tag of pay-to-script-hash addresses
    pub p2sh: u8,
    /// Address tag of pay-to-witness-pubkey-hash addresses
    pub p2wpkh: u8,
    /// Base header of extended private keys
    pub xprv_header: u32,
    /// Base header of extended public keys
    pub xpub_header: u32,
    /// Extended key types accepted when deserializing
    pub xtypes: &'static [u32],
    /// Seed version prefix checked by the seed collaborator
    pub seed_prefix: &'static str,
}

/// Bitcoin main network
pub const MAINNET: NetworkParams = NetworkParams {
    network: Network::Mainnet,
    p2pkh: 0,
    p2sh: 5,
    p2wpkh: 6,
    xprv_header: 0x0488_ade4,
    xpub_header: 0x0488_b21e,
    xtypes: &[0],
    seed_prefix: "01",
};

/// Bitcoin test network
pub const TESTNET: NetworkParams = NetworkParams {
    network: Network::Testnet,
    p2pkh: 111,
    p2sh: 196,
    p2wpkh: 3,
    xprv_header: 0x0435_8394,
    xpub_header: 0x0435_87cf,
    xtypes: &[0, 1],
    seed_prefix: "01",
};

/// Alternate network sharing the main network constants
pub const NOLNET: NetworkParams = NetworkParams {
    network: Network::Nolnet,
    ..MAINNET
};

/// Named network profiles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum Network {
    /// Main network
    #[default]
    Mainnet,
    /// Test network
    Testnet,
    /// Alternate network
    Nolnet,
}

impl Network {
    /// Returns the constants of this network
    pub fn params(self) -> &'static NetworkParams {
        match self {
            Network::Mainnet => &MAINNET,
            Network::Testnet => &TESTNET,
            Network::Nolnet => &NOLNET,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Nolnet => "nolnet",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "nolnet" => Ok(Network::Nolnet),
            _ => Err(Error::UnknownNetwork(s.to_string())),
        }
    }
}

static ACTIVE: OnceCell<Network> = OnceCell::new();

/// Selects the process-wide network profile.
///
/// This succeeds at most once per process; any later call fails with
/// `Error::NetworkAlreadySelected`, including after [`active`] has fixed
/// the default.
pub fn init(network: Network) -> Result<&'static NetworkParams, Error> {
    ACTIVE
        .set(network)
        .map_err(|_| Error::NetworkAlreadySelected)?;
    info!("selected {} network profile", network);

    Ok(network.params())
}

/// Returns the process-wide network profile, fixing it to mainnet if
/// none was selected yet.
pub fn active() -> &'static NetworkParams {
    ACTIVE.get_or_init(Network::default).params()
}
