// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! This crate implements the client side of IEEE Std 802.11-2016 MLME for hardware that supports
//! SoftMAC. A [`client::Station`] is driven by a single dispatcher which hands it one
//! [`DriverEvent`] at a time and forwards the station's messages to the SME.
//!
//! [`client::Station`]: crate::client::Station

pub mod block_ack;
pub mod client;
pub mod device;
pub mod error;
pub mod key;
pub mod service;
pub mod timer;

pub use wlan_common as common;

use {
    client::Station,
    device::{DeviceOps, RxInfo},
    error::Error,
    service::MlmeRequest,
    timer::EventId,
};

/// Everything that can happen to a client station. Frames are owned by the event.
#[derive(Debug)]
pub enum DriverEvent {
    // Indicates receipt of a MAC frame from a peer.
    MacFrameRx { bytes: Vec<u8>, rx_info: RxInfo },
    // Requests transmission of an ethernet frame over the air.
    EthFrameTx { bytes: Vec<u8> },
    // A request from the SME.
    MlmeRequest(MlmeRequest),
    // A deadline handed to the scheduler passed.
    TimeoutFired(EventId),
    // The radio is about to leave the BSS channel, e.g. to scan.
    PreSwitchOffChannel,
    BackToMainChannel,
}

/// Hands a single event to the station. Events must be delivered in the order they occurred.
pub fn handle_driver_event<D: DeviceOps>(
    sta: &mut Station<D>,
    event: DriverEvent,
) -> Result<(), Error> {
    match event {
        DriverEvent::MacFrameRx { bytes, rx_info } => sta.handle_mac_frame_rx(&bytes[..], rx_info),
        DriverEvent::EthFrameTx { bytes } => sta.handle_eth_frame_tx(&bytes[..]),
        DriverEvent::MlmeRequest(req) => sta.handle_mlme_request(req),
        DriverEvent::TimeoutFired(event_id) => {
            sta.handle_timeout(event_id);
            Ok(())
        }
        DriverEvent::PreSwitchOffChannel => {
            sta.pre_switch_off_channel();
            Ok(())
        }
        DriverEvent::BackToMainChannel => {
            sta.back_to_main_channel();
            Ok(())
        }
    }
}
