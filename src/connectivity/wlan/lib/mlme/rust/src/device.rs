// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{error::Status, key::KeyConfig},
    wlan_common::{
        channel::{Band, Channel},
        ie::{
            ChanWidthSet, HtCapabilities, HtOperation, SupportedRate, VhtCapabilities,
            VhtOperation,
        },
        mac::{CapabilityInfo, MacAddr},
    },
};

#[cfg(test)]
pub use test_utils::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus(u8);
impl LinkStatus {
    pub const DOWN: Self = Self(0);
    pub const UP: Self = Self(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxFlags(pub u32);
impl TxFlags {
    pub const NONE: Self = Self(0);
    pub const PROTECTED: Self = Self(1);
    pub const FAVOR_RELIABILITY: Self = Self(1 << 1);
    pub const QOS: Self = Self(1 << 2);
}

impl std::ops::BitOr for TxFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Information the link layer attaches to every received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxInfo {
    pub rssi_dbm: i8,
    /// The frame body was padded to a 4 byte boundary by the hardware.
    pub body_aligned: bool,
}

/// Capabilities of the radio in one band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandInfo {
    pub band: Band,
    /// Raw rates in units of 500 kb/s.
    pub rates: Vec<u8>,
    pub ht_cap: Option<HtCapabilities>,
    pub vht_cap: Option<VhtCapabilities>,
}

impl BandInfo {
    /// Whether the radio can operate 40 MHz channels in this band.
    pub fn supports_cbw40(&self) -> bool {
        match self.ht_cap {
            Some(ht_cap) => {
                ChanWidthSet({ ht_cap.ht_cap_info }.chan_width_set()) == ChanWidthSet::TWENTY_FORTY
            }
            None => false,
        }
    }
}

/// Information and capabilities of the WLAN interface.
#[derive(Debug, Clone, PartialEq)]
pub struct WlanInfo {
    pub mac_addr: MacAddr,
    pub caps: CapabilityInfo,
    pub bands: Vec<BandInfo>,
}

impl WlanInfo {
    pub fn band_info(&self, band: Band) -> Option<&BandInfo> {
        self.bands.iter().find(|b| b.band == band)
    }
}

/// Negotiated parameters of an association, pushed to the link layer once it is established.
#[derive(Debug, Clone, PartialEq)]
pub struct AssocContext {
    pub bssid: MacAddr,
    pub aid: u16,
    pub listen_interval: u16,
    pub chan: Channel,
    pub cap: CapabilityInfo,
    pub rates: Vec<SupportedRate>,
    pub ht_cap: Option<HtCapabilities>,
    pub ht_op: Option<HtOperation>,
    pub vht_cap: Option<VhtCapabilities>,
    pub vht_op: Option<VhtOperation>,
    pub is_cbw40_rx: bool,
    pub is_cbw40_tx: bool,
}

impl AssocContext {
    pub fn is_ht(&self) -> bool {
        self.ht_cap.is_some()
    }

    pub fn is_vht(&self) -> bool {
        self.vht_cap.is_some()
    }
}

/// The link layer the MLME drives. Every frame leaves the MLME through this trait.
pub trait DeviceOps {
    /// Returns information and capabilities of this WLAN interface.
    fn wlan_info(&self) -> WlanInfo;
    /// Requests to deliver a WLAN frame over the air.
    fn send_wlan_frame(&mut self, frame: Vec<u8>, flags: TxFlags) -> Result<(), Status>;
    /// Requests to deliver an Ethernet II frame to the network stack.
    fn deliver_eth_frame(&mut self, frame: &[u8]) -> Result<(), Status>;
    /// Installs a key on the device.
    fn set_key(&mut self, key: KeyConfig) -> Result<(), Status>;
    fn configure_assoc(&mut self, assoc_ctx: AssocContext) -> Result<(), Status>;
    fn clear_assoc(&mut self, bssid: &MacAddr) -> Result<(), Status>;
    /// Sets the link status to be UP or DOWN.
    fn set_eth_link(&mut self, status: LinkStatus) -> Result<(), Status>;
}
