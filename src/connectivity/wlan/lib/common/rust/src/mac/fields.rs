// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    bitfield::{bitfield_bitrange, bitfield_fields},
    std::marker::PhantomData,
    zerocopy::{AsBytes, FromBytes},
};

/// Marks whether an optional header field is carried by a frame. Header length computations take
/// one of these per optional field.
pub struct Presence<F: ?Sized>(bool, PhantomData<F>);

impl<F: ?Sized> Presence<F> {
    pub fn is_present(&self) -> bool {
        self.0
    }
}

pub trait OptionalField {
    fn presence(present: bool) -> Presence<Self> {
        Presence(present, PhantomData)
    }

    fn present() -> Presence<Self> {
        Self::presence(true)
    }

    fn absent() -> Presence<Self> {
        Self::presence(false)
    }
}

// IEEE Std 802.11-2016, 9.2.4.1.3
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameType(pub u8);

impl FrameType {
    pub const MGMT: Self = Self(0);
    pub const CTRL: Self = Self(1);
    pub const DATA: Self = Self(2);
    pub const EXT: Self = Self(3);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MgmtSubtype(pub u8);

impl MgmtSubtype {
    pub const ASSOC_REQ: Self = Self(0b0000);
    pub const ASSOC_RESP: Self = Self(0b0001);
    pub const REASSOC_REQ: Self = Self(0b0010);
    pub const REASSOC_RESP: Self = Self(0b0011);
    pub const PROBE_REQ: Self = Self(0b0100);
    pub const PROBE_RESP: Self = Self(0b0101);
    pub const BEACON: Self = Self(0b1000);
    pub const ATIM: Self = Self(0b1001);
    pub const DISASSOC: Self = Self(0b1010);
    pub const AUTH: Self = Self(0b1011);
    pub const DEAUTH: Self = Self(0b1100);
    pub const ACTION: Self = Self(0b1101);
    pub const ACTION_NO_ACK: Self = Self(0b1110);
}

// IEEE Std 802.11-2016, 9.2.4.1.3, Table 9-1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataSubtype(pub u8);

impl DataSubtype {
    pub const DATA: Self = Self(0b0000);
    pub const NULL: Self = Self(0b0100);
    pub const QOS_DATA: Self = Self(0b1000);
    pub const QOS_NULL: Self = Self(0b1100);

    /// Frames of this subtype carry no payload.
    pub fn null(&self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Frames of this subtype carry a QoS Control field.
    pub fn qos(&self) -> bool {
        self.0 & 0b1000 != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CtrlSubtype(pub u8);

impl CtrlSubtype {
    pub const BLOCK_ACK_REQ: Self = Self(0b1000);
    pub const BLOCK_ACK: Self = Self(0b1001);
    pub const PS_POLL: Self = Self(0b1010);
    pub const RTS: Self = Self(0b1011);
    pub const CTS: Self = Self(0b1100);
    pub const ACK: Self = Self(0b1101);
}

// IEEE Std 802.11-2016, 9.2.4.1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct FrameControl(pub u16);

bitfield_bitrange! {struct FrameControl(u16)}

impl FrameControl {
    bitfield_fields! {
        u8;
        pub protocol_version, set_protocol_version: 1, 0;
        frame_type_raw, set_frame_type_raw: 3, 2;
        subtype_raw, set_subtype_raw: 7, 4;
        pub to_ds, set_to_ds: 8;
        pub from_ds, set_from_ds: 9;
        pub more_frags, set_more_frags: 10;
        pub retry, set_retry: 11;
        pub pwr_mgmt, set_pwr_mgmt: 12;
        pub more_data, set_more_data: 13;
        pub protected, set_protected: 14;
        pub htc_order, set_htc_order: 15;
    }
}

impl FrameControl {
    pub fn mgmt(subtype: MgmtSubtype) -> Self {
        Self::with_type(FrameType::MGMT, subtype.0)
    }

    pub fn data(subtype: DataSubtype) -> Self {
        Self::with_type(FrameType::DATA, subtype.0)
    }

    pub fn ctrl(subtype: CtrlSubtype) -> Self {
        Self::with_type(FrameType::CTRL, subtype.0)
    }

    fn with_type(typ: FrameType, subtype: u8) -> Self {
        let mut fc = Self::default();
        fc.set_frame_type_raw(typ.0);
        fc.set_subtype_raw(subtype);
        fc
    }

    pub fn typ(&self) -> FrameType {
        FrameType(self.frame_type_raw())
    }

    pub fn mgmt_subtype(&self) -> MgmtSubtype {
        MgmtSubtype(self.subtype_raw())
    }

    pub fn data_subtype(&self) -> DataSubtype {
        DataSubtype(self.subtype_raw())
    }

    pub fn ctrl_subtype(&self) -> CtrlSubtype {
        CtrlSubtype(self.subtype_raw())
    }
}

// IEEE Std 802.11-2016, 9.2.4.4
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, Default)]
#[repr(C)]
pub struct SequenceControl(pub u16);

bitfield_bitrange! {struct SequenceControl(u16)}

impl SequenceControl {
    bitfield_fields! {
        u16;
        pub frag_num, set_frag_num: 3, 0;
        pub seq_num, set_seq_num: 15, 4;
    }
}

// IEEE Std 802.11-2016, 9.2.4.5.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QosControl(pub u16);

bitfield_bitrange! {struct QosControl(u16)}

impl QosControl {
    bitfield_fields! {
        u16;
        pub tid, set_tid: 3, 0;
        pub eosp, set_eosp: 4;
        pub ack_policy, set_ack_policy: 6, 5;
        pub amsdu_present, set_amsdu_present: 7;
        pub high_byte, set_high_byte: 15, 8;
    }
}

impl OptionalField for QosControl {}

// IEEE Std 802.11-2016, 9.2.4.6
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HtControl(pub u32);

impl OptionalField for HtControl {}
