// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::mac::MacAddr,
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

/// The two most significant bits of the AID field are always set in a PS-Poll frame.
pub const PS_POLL_AID_MASK: u16 = 0xc000;
pub const AID_MASK: u16 = 0x3fff;

// IEEE Std 802.11-2016, 9.3.1.5, the Frame Control field is not included.
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct PsPoll {
    pub masked_aid: u16,
    pub bssid: MacAddr,
    pub ta: MacAddr,
}

impl PsPoll {
    pub fn new(aid: u16, bssid: MacAddr, ta: MacAddr) -> Self {
        Self { masked_aid: (aid & AID_MASK) | PS_POLL_AID_MASK, bssid, ta }
    }
}
