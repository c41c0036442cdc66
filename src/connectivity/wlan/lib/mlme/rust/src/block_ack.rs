// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! BlockAck API and state.
//!
//! This module provides a BlockAck state machine and a trait implemented by types that transmit
//! the frames the state machine emits. Only a single session on TID 0 is tracked.
//!
//! See IEEE Std 802.11-2016, 10.24.

use {
    crate::{client::frame_writer::write_frame_with_fixed_buf, error::Error},
    log::{error, warn},
    std::cmp::min,
    wlan_common::{appendable::Appendable, buffer_writer::BufferWriter, frame_len, mac},
    zerocopy::ByteSlice,
};

pub const ADDBA_REQ_FRAME_LEN: usize = frame_len!(mac::MgmtHdr, mac::ActionHdr, mac::AddbaReqHdr);
pub const ADDBA_RESP_FRAME_LEN: usize = frame_len!(mac::MgmtHdr, mac::ActionHdr, mac::AddbaRespHdr);

// TODO(29887): Determine a better value.
const BLOCK_ACK_BUFFER_SIZE: u16 = 64;
const BLOCK_ACK_TID: u16 = 0;
const ADDBA_REQ_DIALOG_TOKEN: u8 = 1;

/// BlockAck transmitter.
///
/// The `body` handed to `send_block_ack_frame` starts with the action category and does **not**
/// include the management header. `n` is the length of the complete management frame and can be
/// used to reserve a buffer for it.
pub trait BlockAckTx {
    fn send_block_ack_frame(&mut self, n: usize, body: &[u8]) -> Result<(), Error>;
}

/// State of the BlockAck session with the AP.
///
/// A STA that initiates a BlockAck session is known as the _originator_ and its peer the
/// _recipient_. In infrastructure mode, both APs and clients may initiate a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAckState {
    /// No session is in use or being negotiated. This is the initial state.
    Closed,
    /// An ADDBA request was sent and its response is outstanding.
    Establishing { dialog_token: u8 },
    /// ADDBA frames were exchanged successfully.
    Established { is_initiator: bool },
}

impl Default for BlockAckState {
    fn default() -> Self {
        BlockAckState::Closed
    }
}

impl BlockAckState {
    /// Sends an ADDBA request to the AP unless a session is already open or being negotiated.
    ///
    /// See IEEE Std 802.11-2016, 10.24.2.
    pub fn establish(self, tx: &mut impl BlockAckTx) -> Self {
        match self {
            BlockAckState::Closed => {
                let dialog_token = ADDBA_REQ_DIALOG_TOKEN;
                match send_block_ack_body(tx, ADDBA_REQ_FRAME_LEN, |w| {
                    write_addba_req_body(w, dialog_token)
                }) {
                    Ok(()) => BlockAckState::Establishing { dialog_token },
                    Err(e) => {
                        error!("error sending ADDBA request frame: {}", e);
                        self
                    }
                }
            }
            _ => self,
        }
    }

    /// Reacts to a BlockAck action frame. `body` starts at the BlockAck action field, the
    /// category was consumed by the caller.
    pub fn on_block_ack_frame<B: ByteSlice>(self, tx: &mut impl BlockAckTx, body: B) -> Self {
        let body = match mac::BlockAckBody::parse(body) {
            Some(body) => body,
            None => {
                warn!("dropping malformed BlockAck frame");
                return self;
            }
        };
        match body {
            mac::BlockAckBody::AddbaReq(req) => {
                match send_block_ack_body(tx, ADDBA_RESP_FRAME_LEN, |w| {
                    write_addba_resp_body(w, &req)
                }) {
                    Ok(()) => BlockAckState::Established { is_initiator: false },
                    Err(e) => {
                        error!("error sending ADDBA response frame: {}", e);
                        self
                    }
                }
            }
            mac::BlockAckBody::AddbaResp(resp) => match self {
                BlockAckState::Establishing { dialog_token } => {
                    if resp.dialog_token != dialog_token {
                        error!(
                            "mismatched dialog token in ADDBA response: {} (expected {})",
                            resp.dialog_token, dialog_token
                        );
                        BlockAckState::Closed
                    } else if { resp.status } != mac::StatusCode::SUCCESS {
                        BlockAckState::Closed
                    } else {
                        BlockAckState::Established { is_initiator: true }
                    }
                }
                _ => self,
            },
            // TODO(29887): Examine the DELBA frame as needed. This is necessary for GCR modes.
            mac::BlockAckBody::Delba(_) => BlockAckState::Closed,
            mac::BlockAckBody::Unsupported { action } => {
                warn!("unsupported BlockAck action: {:?}", action);
                self
            }
        }
    }

    pub fn is_established(&self) -> bool {
        match self {
            BlockAckState::Established { .. } => true,
            _ => false,
        }
    }
}

/// Writes a body into a buffer sized for a management frame of `frame_len` bytes, without its
/// header, and hands the body to `tx`.
fn send_block_ack_body<F>(tx: &mut impl BlockAckTx, frame_len: usize, write: F) -> Result<(), Error>
where
    F: FnOnce(&mut BufferWriter<&mut [u8]>) -> Result<(), Error>,
{
    let body = write_frame_with_fixed_buf(frame_len - frame_len!(mac::MgmtHdr), write)?;
    tx.send_block_ack_frame(frame_len, &body[..])
}

fn write_block_ack_action_hdr<B: Appendable>(buffer: &mut B) -> Result<(), Error> {
    buffer.append_value(&mac::ActionHdr { action: mac::ActionCategory::BLOCK_ACK })?;
    Ok(())
}

/// Writes the body of the management frame for an ADDBA request to the given buffer. The
/// management header should be written to the buffer before using this function.
///
/// Note that the action header is part of the management frame body and is written by this
/// function. The frame format is described by IEEE Std 802.11-2016, 9.6.5.2.
pub fn write_addba_req_body<B: Appendable>(buffer: &mut B, dialog_token: u8) -> Result<(), Error> {
    let mut parameters = mac::BlockAckParameters(0);
    parameters.set_amsdu(true);
    parameters.set_policy(mac::BlockAckPolicy::IMMEDIATE);
    parameters.set_tid(BLOCK_ACK_TID);
    parameters.set_buffer_size(BLOCK_ACK_BUFFER_SIZE);
    let mut starting_sequence_control = mac::BlockAckStartingSequenceControl(0);
    // The fragment number is always zero. See IEEE Std 802.11-2016, 9.6.5.2.
    starting_sequence_control.set_fragment_number(0);
    // TODO(29887): Determine a better value.
    starting_sequence_control.set_starting_sequence_number(1);

    write_block_ack_action_hdr(buffer)?;
    buffer.append_value(&mac::AddbaReqHdr {
        action: mac::BlockAckAction::ADDBA_REQUEST,
        dialog_token,
        parameters,
        timeout: 0,
        starting_sequence_control,
    })?;
    Ok(())
}

/// Writes the body of a successful ADDBA response to `req`. The dialog token, TID, A-MSDU
/// support and timeout are taken from the request; the buffer size never exceeds ours.
///
/// The frame format is described by IEEE Std 802.11-2016, 9.6.5.3.
pub fn write_addba_resp_body<B: Appendable>(
    buffer: &mut B,
    req: &mac::AddbaReqHdr,
) -> Result<(), Error> {
    let req_parameters = { req.parameters };
    let mut parameters = mac::BlockAckParameters(0);
    parameters.set_amsdu(req_parameters.amsdu());
    parameters.set_policy(mac::BlockAckPolicy::IMMEDIATE);
    parameters.set_tid(req_parameters.tid());
    parameters.set_buffer_size(min(req_parameters.buffer_size(), BLOCK_ACK_BUFFER_SIZE));

    write_block_ack_action_hdr(buffer)?;
    buffer.append_value(&mac::AddbaRespHdr {
        action: mac::BlockAckAction::ADDBA_RESPONSE,
        dialog_token: req.dialog_token,
        status: mac::StatusCode::SUCCESS,
        parameters,
        timeout: req.timeout,
    })?;
    Ok(())
}
