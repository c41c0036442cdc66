// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        mac::{FrameControl, HtControl, MacAddr, Presence, ReasonCode, SequenceControl, StatusCode},
        TimeUnit,
    },
    bitfield::{bitfield_bitrange, bitfield_fields},
    std::mem::size_of,
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

// IEEE Std 802.11-2016, 9.4.1.4
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct CapabilityInfo(pub u16);

bitfield_bitrange! {struct CapabilityInfo(u16)}

impl CapabilityInfo {
    bitfield_fields! {
        u16;
        pub ess, set_ess: 0;
        pub ibss, set_ibss: 1;
        pub cf_pollable, set_cf_pollable: 2;
        pub cf_poll_req, set_cf_poll_req: 3;
        pub privacy, set_privacy: 4;
        pub short_preamble, set_short_preamble: 5;
        // bit 6-7 reserved
        pub spectrum_mgmt, set_spectrum_mgmt: 8;
        pub qos, set_qos: 9;
        pub short_slot_time, set_short_slot_time: 10;
        pub apsd, set_apsd: 11;
        pub radio_measurement, set_radio_measurement: 12;
        // bit 13 reserved
        pub delayed_block_ack, set_delayed_block_ack: 14;
        pub immediate_block_ack, set_immediate_block_ack: 15;
    }
}

// IEEE Std 802.11-2016, 9.4.1.1
#[repr(C)]
#[derive(AsBytes, FromBytes, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct AuthAlgorithmNumber(pub u16);

impl AuthAlgorithmNumber {
    pub const OPEN: Self = Self(0);
    pub const SHARED_KEY: Self = Self(1);
    pub const FAST_BSS_TRANSITION: Self = Self(2);
    pub const SAE: Self = Self(3);
}

// IEEE Std 802.11-2016, 9.3.3.2
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct MgmtHdr {
    pub frame_ctrl: FrameControl,
    pub duration: u16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    pub seq_ctrl: SequenceControl,
}

impl MgmtHdr {
    /// Returns the length in bytes of a mgmt header including all its fixed and optional
    /// fields (if they are present).
    pub fn len(has_ht_ctrl: Presence<HtControl>) -> usize {
        let mut bytes = size_of::<MgmtHdr>();
        bytes += if has_ht_ctrl.is_present() { size_of::<HtControl>() } else { 0 };
        bytes
    }
}

// IEEE Std 802.11-2016, 9.3.3.3
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct BeaconHdr {
    pub timestamp: u64,
    pub beacon_interval: TimeUnit,
    pub capabilities: CapabilityInfo,
}

// IEEE Std 802.11-2016, 9.3.3.12
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct AuthHdr {
    pub auth_alg_num: AuthAlgorithmNumber,
    pub auth_txn_seq_num: u16,
    pub status_code: StatusCode,
}

// IEEE Std 802.11-2016, 9.3.3.13
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct DeauthHdr {
    pub reason_code: ReasonCode,
}

// IEEE Std 802.11-2016, 9.3.3.5
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct DisassocHdr {
    pub reason_code: ReasonCode,
}

// IEEE Std 802.11-2016, 9.3.3.6
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct AssocReqHdr {
    pub capabilities: CapabilityInfo,
    pub listen_interval: u16,
}

// IEEE Std 802.11-2016, 9.3.3.7
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct AssocRespHdr {
    pub capabilities: CapabilityInfo,
    pub status_code: StatusCode,
    pub aid: u16,
}

// IEEE Std 802.11-2016, 9.4.1.11, Table 9-47
#[repr(C)]
#[derive(AsBytes, FromBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
pub struct ActionCategory(pub u8);

impl ActionCategory {
    pub const SPECTRUM_MGMT: Self = Self(0);
    pub const QOS: Self = Self(1);
    pub const BLOCK_ACK: Self = Self(3);
    pub const PUBLIC: Self = Self(4);
    pub const RADIO_MEASUREMENT: Self = Self(5);
    pub const HT: Self = Self(7);
    pub const SA_QUERY: Self = Self(8);
    pub const VHT: Self = Self(21);
    pub const VENDOR_SPECIFIC: Self = Self(127);
}

// IEEE Std 802.11-2016, 9.3.3.14
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct ActionHdr {
    pub action: ActionCategory,
}

// IEEE Std 802.11-2016, 9.6.5.1, Table 9-345
#[repr(C)]
#[derive(AsBytes, FromBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
pub struct BlockAckAction(pub u8);

impl BlockAckAction {
    pub const ADDBA_REQUEST: Self = Self(0);
    pub const ADDBA_RESPONSE: Self = Self(1);
    pub const DELBA: Self = Self(2);
}

// IEEE Std 802.11-2016, 9.4.1.14
pub struct BlockAckPolicy;

impl BlockAckPolicy {
    pub const DELAYED: u16 = 0;
    pub const IMMEDIATE: u16 = 1;
}

// IEEE Std 802.11-2016, 9.4.1.14
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct BlockAckParameters(pub u16);

bitfield_bitrange! {struct BlockAckParameters(u16)}

impl BlockAckParameters {
    bitfield_fields! {
        u16;
        pub amsdu, set_amsdu: 0;
        pub policy, set_policy: 1, 1;
        pub tid, set_tid: 5, 2;
        pub buffer_size, set_buffer_size: 15, 6;
    }
}

// IEEE Std 802.11-2016, 9.4.1.16
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct DelbaParameters(pub u16);

bitfield_bitrange! {struct DelbaParameters(u16)}

impl DelbaParameters {
    bitfield_fields! {
        u16;
        // bit 0-10 reserved
        pub initiator, set_initiator: 11;
        pub tid, set_tid: 15, 12;
    }
}

// IEEE Std 802.11-2016, 9.3.1.8.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct BlockAckStartingSequenceControl(pub u16);

bitfield_bitrange! {struct BlockAckStartingSequenceControl(u16)}

impl BlockAckStartingSequenceControl {
    bitfield_fields! {
        u16;
        pub fragment_number, set_fragment_number: 3, 0;
        pub starting_sequence_number, set_starting_sequence_number: 15, 4;
    }
}

// IEEE Std 802.11-2016, 9.6.5.2, the Category field is not included.
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct AddbaReqHdr {
    pub action: BlockAckAction,
    pub dialog_token: u8,
    pub parameters: BlockAckParameters,
    pub timeout: u16,
    pub starting_sequence_control: BlockAckStartingSequenceControl,
}

// IEEE Std 802.11-2016, 9.6.5.3, the Category field is not included.
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct AddbaRespHdr {
    pub action: BlockAckAction,
    pub dialog_token: u8,
    pub status: StatusCode,
    pub parameters: BlockAckParameters,
    pub timeout: u16,
}

// IEEE Std 802.11-2016, 9.6.5.4, the Category field is not included.
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy)]
#[repr(C, packed)]
pub struct DelbaHdr {
    pub action: BlockAckAction,
    pub parameters: DelbaParameters,
    pub reason_code: ReasonCode,
}
