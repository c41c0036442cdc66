// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        buffer_reader::BufferReader,
        mac::{
            data_dst_addr, data_src_addr, round_up, AmsduSubframeHdr, DataSubtype,
            FixedDataHdrFields, LlcHdr, MacAddr, MacFrame, QosControl,
        },
    },
    std::mem::size_of,
    zerocopy::{ByteSlice, LayoutVerified},
};

/// An LLC frame is only valid if it contains enough bytes for header AND at least 1 byte for body
pub struct LlcFrame<B> {
    pub hdr: LayoutVerified<B, LlcHdr>,
    pub body: B,
}

impl<B: ByteSlice> LlcFrame<B> {
    pub fn parse(bytes: B) -> Option<Self> {
        let (hdr, body) = LayoutVerified::new_unaligned_from_prefix(bytes)?;
        if body.is_empty() {
            None
        } else {
            Some(Self { hdr, body })
        }
    }
}

pub struct AmsduSubframe<B> {
    pub hdr: LayoutVerified<B, AmsduSubframeHdr>,
    pub body: B,
}

impl<B: ByteSlice> AmsduSubframe<B> {
    /// Parses the next subframe and advances `reader` past it and its padding. Every subframe
    /// but the last is padded to a multiple of 4 bytes; a subframe followed by nothing but
    /// padding is malformed.
    pub fn parse(reader: &mut BufferReader<B>) -> Option<Self> {
        let hdr = reader.read::<AmsduSubframeHdr>()?;
        let msdu_len = hdr.msdu_len.to_native() as usize;
        let body = reader.read_bytes(msdu_len)?;
        if reader.bytes_remaining() == 0 {
            return Some(Self { hdr, body });
        }

        let base_len = size_of::<AmsduSubframeHdr>() + msdu_len;
        let padding_len = round_up(base_len, 4) - base_len;
        if reader.bytes_remaining() <= padding_len {
            None
        } else {
            reader.read_bytes(padding_len)?;
            Some(Self { hdr, body })
        }
    }
}

pub struct Msdu<B> {
    pub dst_addr: MacAddr,
    pub src_addr: MacAddr,
    pub llc_frame: LlcFrame<B>,
}

/// Yields the MSDUs carried by a data frame. Iteration ends at the first malformed MSDU.
pub enum MsduIterator<B> {
    Llc { dst_addr: MacAddr, src_addr: MacAddr, body: Option<B> },
    Amsdu(BufferReader<B>),
}

impl<B: ByteSlice> Iterator for MsduIterator<B> {
    type Item = Msdu<B>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            MsduIterator::Llc { dst_addr, src_addr, body } => {
                let llc_frame = LlcFrame::parse(body.take()?)?;
                Some(Msdu { dst_addr: *dst_addr, src_addr: *src_addr, llc_frame })
            }
            MsduIterator::Amsdu(reader) => {
                let AmsduSubframe { hdr, body } = AmsduSubframe::parse(reader)?;
                let llc_frame = LlcFrame::parse(body)?;
                Some(Msdu { dst_addr: hdr.da, src_addr: hdr.sa, llc_frame })
            }
        }
    }
}

impl<B: ByteSlice> MsduIterator<B> {
    /// Returns None for data subtypes which carry no MSDU, such as null data frames.
    pub fn from_data_frame_parts(
        fixed_fields: &FixedDataHdrFields,
        addr4: Option<MacAddr>,
        qos_ctrl: Option<QosControl>,
        body: B,
    ) -> Option<Self> {
        let fc = fixed_fields.frame_ctrl;
        match fc.data_subtype() {
            DataSubtype::DATA => Some(MsduIterator::Llc {
                dst_addr: data_dst_addr(fixed_fields),
                src_addr: data_src_addr(fixed_fields, addr4)?,
                body: Some(body),
            }),
            DataSubtype::QOS_DATA if qos_ctrl?.amsdu_present() => {
                Some(MsduIterator::Amsdu(BufferReader::new(body)))
            }
            DataSubtype::QOS_DATA => Some(MsduIterator::Llc {
                dst_addr: data_dst_addr(fixed_fields),
                src_addr: data_src_addr(fixed_fields, addr4)?,
                body: Some(body),
            }),
            _ => None,
        }
    }

    /// If `body_aligned` is |true| the frame's body is expected to be 4 byte aligned.
    pub fn from_raw_data_frame(data_frame: B, body_aligned: bool) -> Option<Self> {
        match MacFrame::parse(data_frame, body_aligned)? {
            MacFrame::Data { fixed_fields, addr4, qos_ctrl, body, .. } => {
                Self::from_data_frame_parts(&fixed_fields, addr4.map(|a| *a), qos_ctrl, body)
            }
            _ => None,
        }
    }
}
