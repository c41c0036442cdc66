// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::buffer_reader::BufferReader,
    num_traits::Unsigned,
    zerocopy::{ByteSlice, LayoutVerified},
};

mod ctrl;
mod data;
mod eth;
mod fields;
mod mgmt;

pub use {ctrl::*, data::*, eth::*, fields::*, mgmt::*};

pub type MacAddr = [u8; 6];
pub const BCAST_ADDR: MacAddr = [0xFF; 6];

/// Group addresses have the least significant bit of the first octet set.
pub fn is_multicast(addr: MacAddr) -> bool {
    addr[0] & 0x01 != 0
}

pub fn is_unicast(addr: MacAddr) -> bool {
    !is_multicast(addr)
}

/// A received frame split into its MAC header and body. Each variant is only produced when the
/// buffer holds the full fixed header of that frame type plus the optional fields announced in
/// its frame control.
pub enum MacFrame<B> {
    Mgmt {
        // Management Header: fixed fields
        mgmt_hdr: LayoutVerified<B, MgmtHdr>,
        // Management Header: optional fields
        ht_ctrl: Option<HtControl>,
        // Body
        body: B,
    },
    Data {
        // Data Header: fixed fields
        fixed_fields: LayoutVerified<B, FixedDataHdrFields>,
        // Data Header: optional fields
        addr4: Option<LayoutVerified<B, Addr4>>,
        qos_ctrl: Option<QosControl>,
        ht_ctrl: Option<HtControl>,
        // Body
        body: B,
    },
    Ctrl {
        frame_ctrl: FrameControl,
        body: B,
    },
    Unsupported {
        frame_ctrl: FrameControl,
    },
}

impl<B: ByteSlice> MacFrame<B> {
    /// If `body_aligned` is |true| the frame's body is expected to be 4 byte aligned.
    pub fn parse(bytes: B, body_aligned: bool) -> Option<MacFrame<B>> {
        let mut reader = BufferReader::new(bytes);
        let fc = FrameControl(reader.peek_le_u16()?);
        match fc.typ() {
            FrameType::MGMT => {
                // Parse fixed header fields
                let mgmt_hdr = reader.read()?;

                // Parse optional header fields
                let ht_ctrl =
                    if fc.htc_order() { Some(HtControl(reader.read_le_u32()?)) } else { None };
                // Skip optional padding if body alignment is used.
                if body_aligned {
                    let full_hdr_len = MgmtHdr::len(HtControl::presence(ht_ctrl.is_some()));
                    skip_body_alignment_padding(full_hdr_len, &mut reader)?
                }
                Some(MacFrame::Mgmt { mgmt_hdr, ht_ctrl, body: reader.into_remaining() })
            }
            FrameType::DATA => {
                // Parse fixed header fields
                let fixed_fields = reader.read()?;

                // Parse optional header fields
                let addr4 = if fc.to_ds() && fc.from_ds() { Some(reader.read()?) } else { None };
                let qos_ctrl = if fc.data_subtype().qos() {
                    Some(QosControl(reader.read_le_u16()?))
                } else {
                    None
                };
                let ht_ctrl =
                    if fc.htc_order() { Some(HtControl(reader.read_le_u32()?)) } else { None };

                // Skip optional padding if body alignment is used.
                if body_aligned {
                    let full_hdr_len = FixedDataHdrFields::len(
                        Addr4::presence(addr4.is_some()),
                        QosControl::presence(qos_ctrl.is_some()),
                        HtControl::presence(ht_ctrl.is_some()),
                    );
                    skip_body_alignment_padding(full_hdr_len, &mut reader)?
                };
                Some(MacFrame::Data {
                    fixed_fields,
                    addr4,
                    qos_ctrl,
                    ht_ctrl,
                    body: reader.into_remaining(),
                })
            }
            FrameType::CTRL => {
                // Only the frame control is common to all control frames.
                reader.read_le_u16()?;
                Some(MacFrame::Ctrl { frame_ctrl: fc, body: reader.into_remaining() })
            }
            _ => Some(MacFrame::Unsupported { frame_ctrl: fc }),
        }
    }

    pub fn frame_ctrl(&self) -> FrameControl {
        match self {
            MacFrame::Mgmt { mgmt_hdr, .. } => mgmt_hdr.frame_ctrl,
            MacFrame::Data { fixed_fields, .. } => fixed_fields.frame_ctrl,
            MacFrame::Ctrl { frame_ctrl, .. } => *frame_ctrl,
            MacFrame::Unsupported { frame_ctrl } => *frame_ctrl,
        }
    }
}

/// Skips optional padding required for body alignment.
fn skip_body_alignment_padding<B: ByteSlice>(
    hdr_len: usize,
    reader: &mut BufferReader<B>,
) -> Option<()> {
    const OPTIONAL_BODY_ALIGNMENT_BYTES: usize = 4;

    let padded_len = round_up(hdr_len, OPTIONAL_BODY_ALIGNMENT_BYTES);
    let padding = padded_len - hdr_len;
    reader.read_bytes(padding).map(|_| ())
}

pub(crate) fn round_up<T: Unsigned + Copy>(value: T, multiple: T) -> T {
    let overshoot = value + multiple - T::one();
    overshoot - overshoot % multiple
}
