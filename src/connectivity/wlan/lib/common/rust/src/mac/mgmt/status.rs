// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use zerocopy::{AsBytes, FromBytes};

/// Result of an authentication, association or BlockAck request, as carried over the air.
#[repr(C)]
#[derive(AsBytes, FromBytes, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct StatusCode(pub u16);

// IEEE Std 802.11-2016, 9.4.1.9, Table 9-46
impl StatusCode {
    pub const SUCCESS: Self = Self(0);
    pub const REFUSED_REASON_UNSPECIFIED: Self = Self(1);
    pub const TDLS_REJECTED_ALTERNATIVE_PROVIDED: Self = Self(2);
    pub const TDLS_REJECTED: Self = Self(3);
    pub const SECURITY_DISABLED: Self = Self(5);
    pub const UNACCEPTABLE_LIFETIME: Self = Self(6);
    pub const NOT_IN_SAME_BSS: Self = Self(7);
    pub const REFUSED_CAPABILITIES_MISMATCH: Self = Self(10);
    pub const DENIED_NO_ASSOCIATION_EXISTS: Self = Self(11);
    pub const DENIED_OTHER_REASON: Self = Self(12);
    pub const UNSUPPORTED_AUTH_ALGORITHM: Self = Self(13);
    pub const TRANSACTION_SEQUENCE_ERROR: Self = Self(14);
    pub const CHALLENGE_FAILURE: Self = Self(15);
    pub const REJECTED_SEQUENCE_TIMEOUT: Self = Self(16);
    pub const DENIED_NO_MORE_STAS: Self = Self(17);
    pub const REFUSED_BASIC_RATES_MISMATCH: Self = Self(18);
    pub const DENIED_NO_SHORT_PREAMBLE_SUPPORT: Self = Self(19);
    pub const REJECTED_SPECTRUM_MANAGEMENT_REQUIRED: Self = Self(22);
    pub const REJECTED_BAD_POWER_CAPABILITY: Self = Self(23);
    pub const REJECTED_BAD_SUPPORTED_CHANNELS: Self = Self(24);
    pub const DENIED_NO_SHORT_SLOT_TIME_SUPPORT: Self = Self(25);
    pub const DENIED_NO_HT_SUPPORT: Self = Self(27);
    pub const R0KH_UNREACHABLE: Self = Self(28);
    pub const DENIED_PCO_TIME_NOT_SUPPORTED: Self = Self(29);
    pub const REFUSED_TEMPORARILY: Self = Self(30);
    pub const ROBUST_MANAGEMENT_POLICY_VIOLATION: Self = Self(31);
    pub const UNSPECIFIED_QOS_FAILURE: Self = Self(32);
    pub const DENIED_INSUFFICIENT_BANDWIDTH: Self = Self(33);
    pub const DENIED_POOR_CHANNEL_CONDITIONS: Self = Self(34);
    pub const DENIED_QOS_NOT_SUPPORTED: Self = Self(35);
    pub const REQUEST_DECLINED: Self = Self(37);
    pub const INVALID_PARAMETERS: Self = Self(38);
    pub const REJECTED_WITH_SUGGESTED_CHANGES: Self = Self(39);
    pub const STATUS_INVALID_ELEMENT: Self = Self(40);
    pub const STATUS_INVALID_GROUP_CIPHER: Self = Self(41);
    pub const STATUS_INVALID_PAIRWISE_CIPHER: Self = Self(42);
    pub const STATUS_INVALID_AKMP: Self = Self(43);
    pub const UNSUPPORTED_RSNE_VERSION: Self = Self(44);
    pub const INVALID_RSNE_CAPABILITIES: Self = Self(45);
    pub const STATUS_CIPHER_OUT_OF_POLICY: Self = Self(46);
    pub const REJECTED_FOR_DELAY_PERIOD: Self = Self(47);
    pub const DLS_NOT_ALLOWED: Self = Self(48);
    pub const NOT_PRESENT: Self = Self(49);
    pub const NOT_QOS_STA: Self = Self(50);
    pub const DENIED_LISTEN_INTERVAL_TOO_LARGE: Self = Self(51);
    pub const STATUS_INVALID_FT_ACTION_FRAME_COUNT: Self = Self(52);
    pub const STATUS_INVALID_PMKID: Self = Self(53);
    pub const STATUS_INVALID_MDE: Self = Self(54);
    pub const STATUS_INVALID_FTE: Self = Self(55);
    pub const REQUESTED_TCLAS_NOT_SUPPORTED: Self = Self(56);
    pub const INSUFFICIENT_TCLAS_PROCESSING_RESOURCES: Self = Self(57);
    pub const TRY_ANOTHER_BSS: Self = Self(58);
    pub const ANTI_CLOGGING_TOKEN_REQUIRED: Self = Self(76);
    pub const FINITE_CYCLIC_GROUP_NOT_SUPPORTED: Self = Self(77);
    pub const REFUSED_AP_OUT_OF_MEMORY: Self = Self(93);
    pub const REJECTED_EMERGENCY_SERVICES_NOT_SUPPORTED: Self = Self(94);
    pub const QUERY_RESP_OUTSTANDING: Self = Self(95);
}
