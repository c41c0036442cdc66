// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Messages exchanged with the SME. Requests flow into the MLME, events flow back out.

use wlan_common::{
    channel::Channel,
    ie::{HtCapabilities, VhtCapabilities},
    mac::{CapabilityInfo, MacAddr, ReasonCode},
};

/// The BSS an authentication attempt targets.
#[derive(Debug, Clone, PartialEq)]
pub struct BssDescription {
    pub bssid: MacAddr,
    pub ssid: Vec<u8>,
    pub chan: Channel,
    /// In TU.
    pub beacon_period: u16,
    pub cap: CapabilityInfo,
    /// Raw rates in units of 500 kb/s. The basic bit is not set.
    pub basic_rate_set: Vec<u8>,
    pub op_rate_set: Vec<u8>,
    /// Full element, header included.
    pub rsne: Option<Vec<u8>>,
    pub ht_cap: Option<HtCapabilities>,
    pub vht_cap: Option<VhtCapabilities>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    OpenSystem,
    SharedKey,
    FastBssTransition,
    Sae,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticateRequest {
    pub bss: BssDescription,
    pub auth_type: AuthenticationType,
    /// Number of beacon periods to wait for the AP's response.
    pub auth_failure_timeout: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeauthenticateRequest {
    pub peer_sta_address: MacAddr,
    pub reason_code: ReasonCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssociateRequest {
    pub peer_sta_address: MacAddr,
    /// Full element, header included. Written verbatim into the association request.
    pub rsne: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EapolRequest {
    pub src_addr: MacAddr,
    pub dst_addr: MacAddr,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Pairwise,
    Group,
    PeerKey,
    Igtk,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyDescriptor {
    pub key: Vec<u8>,
    pub key_id: u16,
    pub key_type: KeyType,
    pub address: MacAddr,
    pub rsc: u64,
    pub cipher_suite_oui: [u8; 3],
    pub cipher_suite_type: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetKeysRequest {
    pub keylist: Vec<KeyDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MlmeRequest {
    Authenticate(AuthenticateRequest),
    Deauthenticate(DeauthenticateRequest),
    Associate(AssociateRequest),
    Eapol(EapolRequest),
    SetKeys(SetKeysRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticateResultCode {
    Success,
    Refused,
    /// The station was not idle when the request arrived.
    RefusedState,
    RefusedUnsupported,
    AuthenticationRejected,
    AuthFailureTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociateResultCode {
    Success,
    RefusedReasonUnspecified,
    RefusedNotAuthenticated,
    RefusedCapabilitiesMismatch,
    RefusedTemporarily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EapolResultCode {
    Success,
    TransmissionFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MlmeEvent {
    AuthenticateConf {
        peer_sta_address: MacAddr,
        auth_type: AuthenticationType,
        result_code: AuthenticateResultCode,
    },
    DeauthenticateConf {
        peer_sta_address: MacAddr,
    },
    DeauthenticateInd {
        peer_sta_address: MacAddr,
        reason_code: ReasonCode,
    },
    AssociateConf {
        result_code: AssociateResultCode,
        association_id: u16,
    },
    DisassociateInd {
        peer_sta_address: MacAddr,
        reason_code: ReasonCode,
    },
    EapolConf {
        result_code: EapolResultCode,
    },
    EapolInd {
        src_addr: MacAddr,
        dst_addr: MacAddr,
        data: Vec<u8>,
    },
    SignalReport {
        rssi_dbm: i8,
    },
}
