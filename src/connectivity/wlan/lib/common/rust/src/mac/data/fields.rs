// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        big_endian::BigEndianU16,
        mac::{
            FrameControl, HtControl, MacAddr, OptionalField, Presence, QosControl, SequenceControl,
        },
    },
    std::mem::size_of,
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

pub type Addr4 = MacAddr;

impl OptionalField for Addr4 {}

// IEEE Std 802.11-2016, 9.3.2.1
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct FixedDataHdrFields {
    pub frame_ctrl: FrameControl,
    pub duration: u16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    pub seq_ctrl: SequenceControl,
}

impl FixedDataHdrFields {
    /// Returns the length in bytes of a data header including all its fixed and optional
    /// fields (if they are present).
    pub fn len(
        has_addr4: Presence<Addr4>,
        has_qos_ctrl: Presence<QosControl>,
        has_ht_ctrl: Presence<HtControl>,
    ) -> usize {
        let mut bytes = size_of::<FixedDataHdrFields>();
        if has_addr4.is_present() {
            bytes += size_of::<Addr4>();
        }
        if has_qos_ctrl.is_present() {
            bytes += size_of::<u16>();
        }
        if has_ht_ctrl.is_present() {
            bytes += size_of::<u32>();
        }
        bytes
    }
}

/// Optional data header fields which follow the fixed fields, in order of appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OptionalDataHdrFields {
    pub addr4: Option<Addr4>,
    pub qos_ctrl: Option<QosControl>,
    pub ht_ctrl: Option<HtControl>,
}

impl OptionalDataHdrFields {
    pub fn none() -> Self {
        Self::default()
    }
}

// IEEE Std 802.2-1998, 3.2
// IETF RFC 1042
pub const LLC_SNAP_EXTENSION: u8 = 0xAA;
pub const LLC_SNAP_UNNUMBERED_INFO: u8 = 0x03;
pub const LLC_SNAP_OUI: [u8; 3] = [0, 0, 0];

#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Default)]
#[repr(C, packed)]
pub struct LlcHdr {
    pub dsap: u8,
    pub ssap: u8,
    pub control: u8,
    pub oui: [u8; 3],
    pub protocol_id: BigEndianU16,
}

// IEEE Std 802.11-2016, 9.3.2.2.2
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct AmsduSubframeHdr {
    // Same layout as an IEEE 802.3 header, with a length instead of an ether type.
    pub da: MacAddr,
    pub sa: MacAddr,
    pub msdu_len: BigEndianU16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_hdr_len() {
        assert_eq!(
            24,
            FixedDataHdrFields::len(Addr4::absent(), QosControl::absent(), HtControl::absent())
        );
        assert_eq!(
            26,
            FixedDataHdrFields::len(Addr4::absent(), QosControl::present(), HtControl::absent())
        );
        assert_eq!(
            36,
            FixedDataHdrFields::len(Addr4::present(), QosControl::present(), HtControl::present())
        );
    }

    #[test]
    fn header_sizes() {
        assert_eq!(8, size_of::<LlcHdr>());
        assert_eq!(14, size_of::<AmsduSubframeHdr>());
    }
}
