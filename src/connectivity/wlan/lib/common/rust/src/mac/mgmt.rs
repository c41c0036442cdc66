// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{buffer_reader::BufferReader, mac::MgmtSubtype},
    zerocopy::{ByteSlice, LayoutVerified},
};

mod fields;
mod reason;
mod status;

pub use {fields::*, reason::*, status::*};

/// The body of a management frame, split into the subtype's fixed fields and the trailing
/// information elements. Only subtypes a client station acts on are broken out.
pub enum MgmtBody<B: ByteSlice> {
    Beacon { bcn_hdr: LayoutVerified<B, BeaconHdr>, elements: B },
    Authentication { auth_hdr: LayoutVerified<B, AuthHdr>, elements: B },
    AssociationResp { assoc_resp_hdr: LayoutVerified<B, AssocRespHdr>, elements: B },
    Deauthentication { deauth_hdr: LayoutVerified<B, DeauthHdr>, elements: B },
    Disassociation { disassoc_hdr: LayoutVerified<B, DisassocHdr>, elements: B },
    Action { action_hdr: LayoutVerified<B, ActionHdr>, elements: B },
    Unsupported { subtype: MgmtSubtype },
}

impl<B: ByteSlice> MgmtBody<B> {
    /// Returns None if the body is too short for the subtype's fixed fields.
    pub fn parse(subtype: MgmtSubtype, bytes: B) -> Option<Self> {
        let mut reader = BufferReader::new(bytes);
        match subtype {
            MgmtSubtype::BEACON => {
                let bcn_hdr = reader.read()?;
                Some(MgmtBody::Beacon { bcn_hdr, elements: reader.into_remaining() })
            }
            MgmtSubtype::AUTH => {
                let auth_hdr = reader.read()?;
                Some(MgmtBody::Authentication { auth_hdr, elements: reader.into_remaining() })
            }
            MgmtSubtype::ASSOC_RESP => {
                let assoc_resp_hdr = reader.read()?;
                Some(MgmtBody::AssociationResp {
                    assoc_resp_hdr,
                    elements: reader.into_remaining(),
                })
            }
            MgmtSubtype::DEAUTH => {
                let deauth_hdr = reader.read()?;
                Some(MgmtBody::Deauthentication { deauth_hdr, elements: reader.into_remaining() })
            }
            MgmtSubtype::DISASSOC => {
                let disassoc_hdr = reader.read()?;
                Some(MgmtBody::Disassociation { disassoc_hdr, elements: reader.into_remaining() })
            }
            MgmtSubtype::ACTION => {
                let action_hdr = reader.read()?;
                Some(MgmtBody::Action { action_hdr, elements: reader.into_remaining() })
            }
            subtype => Some(MgmtBody::Unsupported { subtype }),
        }
    }
}

/// A BlockAck action frame body following the category field.
pub enum BlockAckBody<B: ByteSlice> {
    AddbaReq(LayoutVerified<B, AddbaReqHdr>),
    AddbaResp(LayoutVerified<B, AddbaRespHdr>),
    Delba(LayoutVerified<B, DelbaHdr>),
    Unsupported { action: BlockAckAction },
}

impl<B: ByteSlice> BlockAckBody<B> {
    pub fn parse(bytes: B) -> Option<Self> {
        let mut reader = BufferReader::new(bytes);
        let action = BlockAckAction(*reader.peek_bytes(1)?.first()?);
        match action {
            BlockAckAction::ADDBA_REQUEST => Some(BlockAckBody::AddbaReq(reader.read()?)),
            BlockAckAction::ADDBA_RESPONSE => Some(BlockAckBody::AddbaResp(reader.read()?)),
            BlockAckAction::DELBA => Some(BlockAckBody::Delba(reader.read()?)),
            action => Some(BlockAckBody::Unsupported { action }),
        }
    }
}
