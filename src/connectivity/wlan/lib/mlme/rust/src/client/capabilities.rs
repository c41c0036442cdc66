// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        device::{AssocContext, BandInfo, WlanInfo},
        error::{Error, Status},
        service::BssDescription,
    },
    log::warn,
    wlan_common::{
        channel::Channel,
        ie::{self, ChanWidthSet, HtCapabilities, IntersectRatesError, SupportedRate},
        mac::{AssocRespHdr, CapabilityInfo, AID_MASK},
    },
    zerocopy::ByteSlice,
};

/// Capability info the client advertises in an association request. The client always joins an
/// infrastructure BSS and never offers polling, privacy or spectrum management on its own.
pub fn assoc_req_capability_info(client_caps: CapabilityInfo) -> CapabilityInfo {
    let mut cap = client_caps;
    cap.set_ess(true);
    cap.set_ibss(false);
    cap.set_cf_pollable(false);
    cap.set_cf_poll_req(false);
    cap.set_privacy(false);
    cap.set_spectrum_mgmt(false);
    cap
}

/// All rates the BSS advertises, each marked basic iff it is part of the basic rate set.
pub fn ap_rates(bss: &BssDescription) -> Vec<SupportedRate> {
    let is_basic = |rate: u8| bss.basic_rate_set.iter().any(|r| r & 0x7f == rate);
    bss.basic_rate_set
        .iter()
        .chain(bss.op_rate_set.iter())
        .map(|r| r & 0x7f)
        .map(|rate| SupportedRate::new(rate, is_basic(rate)))
        .collect()
}

fn client_rates(band: &BandInfo) -> Vec<SupportedRate> {
    band.rates.iter().map(|r| SupportedRate::new(r & 0x7f, false)).collect()
}

/// Rates offered in the association request.
pub fn negotiate_assoc_req_rates(
    bss: &BssDescription,
    band: &BandInfo,
) -> Result<Vec<SupportedRate>, IntersectRatesError> {
    let ap = ap_rates(bss);
    let client = client_rates(band);
    ie::intersect_rates(ie::ApRates(&ap[..]), ie::ClientRates(&client[..]))
}

fn supports_twenty_forty(ht_cap: &HtCapabilities) -> bool {
    ChanWidthSet({ ht_cap.ht_cap_info }.chan_width_set()) == ChanWidthSet::TWENTY_FORTY
}

/// 40 MHz reception requires a wide join channel and both the BSS and the client band to
/// support the 20/40 MHz channel width set.
pub fn is_cbw40_rx_possible(
    chan: &Channel,
    bss_ht_cap: Option<&HtCapabilities>,
    band: &BandInfo,
) -> bool {
    chan.is_wider_than_20mhz()
        && bss_ht_cap.map_or(false, supports_twenty_forty)
        && band.supports_cbw40()
}

/// HT capabilities announced in the association request.
pub fn override_ht_capabilities(mut ht_cap: HtCapabilities, cbw40_rx: bool) -> HtCapabilities {
    let mut info = { ht_cap.ht_cap_info };
    if !cbw40_rx {
        info.set_chan_width_set(ChanWidthSet::TWENTY_ONLY.0);
    }
    info.set_tx_stbc(false);
    ht_cap.ht_cap_info = info;
    ht_cap
}

/// Negotiates the association from the AP's association response. Malformed elements are
/// skipped; a rate set the client cannot operate with fails the whole negotiation.
pub fn build_assoc_context<B: ByteSlice>(
    bss: &BssDescription,
    client: &WlanInfo,
    assoc_resp_hdr: &AssocRespHdr,
    elements: B,
) -> Result<AssocContext, Error> {
    let band = client.band_info(bss.chan.band()).ok_or_else(|| {
        Error::Status(
            format!("no client capabilities for band {:?}", bss.chan.band()),
            Status::NOT_SUPPORTED,
        )
    })?;

    let mut ap_rates = vec![];
    let mut ap_ht_cap = None;
    let mut ap_ht_op = None;
    let mut ap_vht_cap = None;
    let mut ap_vht_op = None;
    for (id, body) in ie::Reader::new(elements) {
        match id {
            ie::Id::SUPPORTED_RATES => match ie::parse_supported_rates(body) {
                Ok(rates) => ap_rates.extend_from_slice(&rates[..]),
                Err(e) => warn!("invalid supported rates in association response: {}", e),
            },
            ie::Id::EXT_SUPPORTED_RATES => match ie::parse_extended_supported_rates(body) {
                Ok(rates) => ap_rates.extend_from_slice(&rates[..]),
                Err(e) => warn!("invalid extended rates in association response: {}", e),
            },
            ie::Id::HT_CAPABILITIES => match ie::parse_ht_capabilities(body) {
                Ok(ht_cap) => ap_ht_cap = Some(*ht_cap),
                Err(e) => warn!("{}", e),
            },
            ie::Id::HT_OPERATION => match ie::parse_ht_operation(body) {
                Ok(ht_op) => ap_ht_op = Some(*ht_op),
                Err(e) => warn!("{}", e),
            },
            ie::Id::VHT_CAPABILITIES => match ie::parse_vht_capabilities(body) {
                Ok(vht_cap) => ap_vht_cap = Some(*vht_cap),
                Err(e) => warn!("{}", e),
            },
            ie::Id::VHT_OPERATION => match ie::parse_vht_operation(body) {
                Ok(vht_op) => ap_vht_op = Some(*vht_op),
                Err(e) => warn!("{}", e),
            },
            _ => (),
        }
    }

    let client_rates = client_rates(band);
    let rates =
        ie::intersect_rates(ie::ApRates(&ap_rates[..]), ie::ClientRates(&client_rates[..]))
            .map_err(|e| {
                Error::Status(format!("could not negotiate rates: {}", e), Status::NOT_SUPPORTED)
            })?;

    let ht_cap = match (ap_ht_cap.as_ref(), band.ht_cap.as_ref()) {
        (Some(ap), Some(client)) => Some(ie::intersect_ht_capabilities(ap, client)),
        _ => None,
    };
    let vht_cap = match (ap_vht_cap.as_ref(), band.vht_cap.as_ref(), ht_cap) {
        (Some(ap), Some(client), Some(_)) => Some(ie::intersect_vht_capabilities(ap, client)),
        _ => None,
    };
    let is_cbw40_rx = ht_cap.is_some()
        && ap_ht_cap.as_ref().map_or(false, supports_twenty_forty)
        && band.supports_cbw40();

    Ok(AssocContext {
        bssid: bss.bssid,
        aid: { assoc_resp_hdr.aid } & AID_MASK,
        listen_interval: 0,
        chan: bss.chan,
        cap: CapabilityInfo({ assoc_resp_hdr.capabilities }.0 & client.caps.0),
        rates,
        ht_cap,
        ht_op: ht_cap.and(ap_ht_op),
        vht_cap,
        vht_op: vht_cap.and(ap_vht_op),
        is_cbw40_rx,
        is_cbw40_tx: false,
    })
}
