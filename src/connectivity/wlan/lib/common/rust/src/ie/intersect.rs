// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::ie::{
        AmpduParams, AselCapability, HtCapabilities, HtCapabilityInfo, HtExtCapabilities,
        PcoTransitionTime, SmPowerSave, SupportedMcsSet, SupportedRate, TxBfCapability,
        VhtCapabilities, VhtCapabilitiesInfo, VhtMcsNssSet,
    },
    std::{cmp::{max, min}, collections::HashSet},
    thiserror::Error,
};

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum IntersectRatesError {
    #[error("at least one basic rate not supported")]
    BasicRatesMismatch,
    #[error("client does not support any AP rates")]
    NoApRatesSupported,
}

pub struct ApRates<'a>(pub &'a [SupportedRate]);
pub struct ClientRates<'a>(pub &'a [SupportedRate]);

/// Returns the rates specified by the AP that are also supported by the client, sorted in
/// ascending order, with basic bits following their values in the AP.
/// The client MUST support ALL the basic rates specified by the AP or the intersection fails.
pub fn intersect_rates(
    ap: ApRates<'_>,
    client: ClientRates<'_>,
) -> Result<Vec<SupportedRate>, IntersectRatesError> {
    let client = client.0.iter().map(|r| r.rate()).collect::<HashSet<_>>();
    if ap.0.iter().any(|ra| ra.basic() && !client.contains(&ra.rate())) {
        return Err(IntersectRatesError::BasicRatesMismatch);
    }

    let mut rates =
        ap.0.iter().filter(|ra| client.contains(&ra.rate())).cloned().collect::<Vec<_>>();
    if rates.is_empty() {
        return Err(IntersectRatesError::NoApRatesSupported);
    }
    rates.sort_by_key(|r| r.rate());
    // An AP listing the same rate twice keeps it basic if either entry was basic.
    rates.dedup_by(|later, earlier| {
        if later.rate() == earlier.rate() {
            earlier.set_basic(earlier.basic() || later.basic());
            true
        } else {
            false
        }
    });
    Ok(rates)
}

fn intersect_ht_cap_info(ap: HtCapabilityInfo, client: HtCapabilityInfo) -> HtCapabilityInfo {
    let mut info = HtCapabilityInfo(0);
    info.set_ldpc_coding_cap(ap.ldpc_coding_cap() && client.ldpc_coding_cap());
    info.set_chan_width_set(ap.chan_width_set() & client.chan_width_set());

    let sm_power_save = if ap.sm_power_save() == SmPowerSave::DISABLED.0
        || client.sm_power_save() == SmPowerSave::DISABLED.0
    {
        SmPowerSave::DISABLED.0
    } else {
        min(ap.sm_power_save(), client.sm_power_save())
    };
    info.set_sm_power_save(sm_power_save);

    info.set_greenfield(ap.greenfield() && client.greenfield());
    info.set_short_gi_20(ap.short_gi_20() && client.short_gi_20());
    info.set_short_gi_40(ap.short_gi_40() && client.short_gi_40());

    // The AP governs STBC: a station may only transmit STBC the AP can receive, and only needs
    // to receive STBC if the AP can transmit it.
    info.set_tx_stbc(client.tx_stbc() && ap.rx_stbc() != 0);
    info.set_rx_stbc(if ap.tx_stbc() { client.rx_stbc() } else { 0 });

    info.set_delayed_block_ack(ap.delayed_block_ack() && client.delayed_block_ack());
    info.set_max_amsdu_len(ap.max_amsdu_len() & client.max_amsdu_len());
    info.set_dsss_in_40(ap.dsss_in_40() && client.dsss_in_40());
    info.set_intolerant_40(ap.intolerant_40() && client.intolerant_40());
    info.set_lsig_txop_protect(ap.lsig_txop_protect() && client.lsig_txop_protect());
    info
}

fn intersect_ampdu_params(ap: AmpduParams, client: AmpduParams) -> AmpduParams {
    let mut params = AmpduParams(0);
    params.set_exponent(min(ap.exponent(), client.exponent()));
    params.set_min_start_spacing(max(ap.min_start_spacing(), client.min_start_spacing()));
    params
}

fn intersect_mcs_set(ap: SupportedMcsSet, client: SupportedMcsSet) -> SupportedMcsSet {
    let mut mcs_set = SupportedMcsSet(0);
    mcs_set.set_rx_mcs(ap.rx_mcs() & client.rx_mcs());
    mcs_set.set_rx_highest_rate(min(ap.rx_highest_rate(), client.rx_highest_rate()));
    mcs_set.set_tx_set_defined(ap.tx_set_defined() && client.tx_set_defined());
    mcs_set.set_tx_rx_diff(ap.tx_rx_diff() && client.tx_rx_diff());
    mcs_set.set_tx_max_ss(min(ap.tx_max_ss(), client.tx_max_ss()));
    mcs_set.set_tx_ueqm(ap.tx_ueqm() && client.tx_ueqm());
    mcs_set
}

fn intersect_ht_ext_cap(ap: HtExtCapabilities, client: HtExtCapabilities) -> HtExtCapabilities {
    let mut ext_cap = HtExtCapabilities(0);
    ext_cap.set_pco(ap.pco() && client.pco());
    let pco_transition = if ap.pco_transition() == PcoTransitionTime::PCO_RESERVED.0
        || client.pco_transition() == PcoTransitionTime::PCO_RESERVED.0
    {
        PcoTransitionTime::PCO_RESERVED.0
    } else {
        max(ap.pco_transition(), client.pco_transition())
    };
    ext_cap.set_pco_transition(pco_transition);
    ext_cap.set_mcs_feedback(min(ap.mcs_feedback(), client.mcs_feedback()));
    ext_cap.set_htc_ht_support(ap.htc_ht_support() && client.htc_ht_support());
    ext_cap.set_rd_responder(ap.rd_responder() && client.rd_responder());
    ext_cap
}

fn intersect_txbf_cap(ap: TxBfCapability, client: TxBfCapability) -> TxBfCapability {
    let mut txbf = TxBfCapability(0);
    txbf.set_implicit_rx(ap.implicit_rx() && client.implicit_rx());
    txbf.set_rx_stag_sounding(ap.rx_stag_sounding() && client.rx_stag_sounding());
    txbf.set_tx_stag_sounding(ap.tx_stag_sounding() && client.tx_stag_sounding());
    txbf.set_rx_ndp(ap.rx_ndp() && client.rx_ndp());
    txbf.set_tx_ndp(ap.tx_ndp() && client.tx_ndp());
    txbf.set_implicit(ap.implicit() && client.implicit());
    txbf.set_calibration(min(ap.calibration(), client.calibration()));
    txbf.set_csi(ap.csi() && client.csi());
    txbf.set_noncomp_steering(ap.noncomp_steering() && client.noncomp_steering());
    txbf.set_comp_steering(ap.comp_steering() && client.comp_steering());
    txbf.set_csi_feedback(ap.csi_feedback() & client.csi_feedback());
    txbf.set_noncomp_feedback(ap.noncomp_feedback() & client.noncomp_feedback());
    txbf.set_comp_feedback(ap.comp_feedback() & client.comp_feedback());
    txbf.set_min_grouping(min(ap.min_grouping(), client.min_grouping()));
    txbf.set_csi_antennas(min(ap.csi_antennas(), client.csi_antennas()));
    txbf.set_noncomp_steering_ants(min(ap.noncomp_steering_ants(), client.noncomp_steering_ants()));
    txbf.set_comp_steering_ants(min(ap.comp_steering_ants(), client.comp_steering_ants()));
    txbf.set_csi_rows(min(ap.csi_rows(), client.csi_rows()));
    txbf.set_chan_estimation(min(ap.chan_estimation(), client.chan_estimation()));
    txbf
}

/// Intersects the HT capabilities advertised by an AP with the client's own. Boolean
/// capabilities are AND'ed, numeric limits take the more restrictive value.
pub fn intersect_ht_capabilities(ap: &HtCapabilities, client: &HtCapabilities) -> HtCapabilities {
    HtCapabilities {
        ht_cap_info: intersect_ht_cap_info({ ap.ht_cap_info }, { client.ht_cap_info }),
        ampdu_params: intersect_ampdu_params(ap.ampdu_params, client.ampdu_params),
        mcs_set: intersect_mcs_set({ ap.mcs_set }, { client.mcs_set }),
        ht_ext_cap: intersect_ht_ext_cap({ ap.ht_ext_cap }, { client.ht_ext_cap }),
        txbf_cap: intersect_txbf_cap({ ap.txbf_cap }, { client.txbf_cap }),
        asel_cap: AselCapability(ap.asel_cap.0 & client.asel_cap.0),
    }
}

fn intersect_vht_cap_info(
    ap: VhtCapabilitiesInfo,
    client: VhtCapabilitiesInfo,
) -> VhtCapabilitiesInfo {
    let mut info = VhtCapabilitiesInfo(0);
    info.set_max_mpdu_len(min(ap.max_mpdu_len(), client.max_mpdu_len()));
    info.set_supported_cbw_set(min(ap.supported_cbw_set(), client.supported_cbw_set()));
    info.set_rx_ldpc(ap.rx_ldpc() && client.rx_ldpc());
    info.set_sgi_cbw80(ap.sgi_cbw80() && client.sgi_cbw80());
    info.set_sgi_cbw160(ap.sgi_cbw160() && client.sgi_cbw160());
    info.set_tx_stbc(ap.tx_stbc() && client.tx_stbc());
    info.set_rx_stbc(min(ap.rx_stbc(), client.rx_stbc()));
    info.set_su_bfer(ap.su_bfer() && client.su_bfer());
    info.set_su_bfee(ap.su_bfee() && client.su_bfee());
    info.set_bfee_sts(min(ap.bfee_sts(), client.bfee_sts()));
    info.set_num_sounding(min(ap.num_sounding(), client.num_sounding()));
    info.set_mu_bfer(ap.mu_bfer() && client.mu_bfer());
    info.set_mu_bfee(ap.mu_bfee() && client.mu_bfee());
    info.set_txop_ps(ap.txop_ps() && client.txop_ps());
    info.set_htc_vht(ap.htc_vht() && client.htc_vht());
    info.set_max_ampdu_exp(min(ap.max_ampdu_exp(), client.max_ampdu_exp()));
    info.set_link_adapt(min(ap.link_adapt(), client.link_adapt()));
    info.set_rx_ant_pattern(ap.rx_ant_pattern() && client.rx_ant_pattern());
    info.set_tx_ant_pattern(ap.tx_ant_pattern() && client.tx_ant_pattern());
    info.set_ext_nss_bw(min(ap.ext_nss_bw(), client.ext_nss_bw()));
    info
}

/// Takes the smaller two-bit MCS value for each of the eight spatial streams.
fn min_mcs_map(ap: u16, client: u16) -> u16 {
    (0..8).fold(0u16, |map, ss| {
        let shift = ss * 2;
        let mcs = min((ap >> shift) & 0b11, (client >> shift) & 0b11);
        map | (mcs << shift)
    })
}

fn intersect_vht_mcs_nss(ap: VhtMcsNssSet, client: VhtMcsNssSet) -> VhtMcsNssSet {
    let mut mcs_nss = VhtMcsNssSet(0);
    mcs_nss.set_rx_max_mcs(min_mcs_map(ap.rx_max_mcs(), client.rx_max_mcs()));
    mcs_nss.set_rx_max_data_rate(min(ap.rx_max_data_rate(), client.rx_max_data_rate()));
    mcs_nss.set_max_nsts(min(ap.max_nsts(), client.max_nsts()));
    mcs_nss.set_tx_max_mcs(min_mcs_map(ap.tx_max_mcs(), client.tx_max_mcs()));
    mcs_nss.set_tx_max_data_rate(min(ap.tx_max_data_rate(), client.tx_max_data_rate()));
    mcs_nss.set_ext_nss_bw(ap.ext_nss_bw() && client.ext_nss_bw());
    mcs_nss
}

pub fn intersect_vht_capabilities(
    ap: &VhtCapabilities,
    client: &VhtCapabilities,
) -> VhtCapabilities {
    VhtCapabilities {
        vht_cap_info: intersect_vht_cap_info({ ap.vht_cap_info }, { client.vht_cap_info }),
        vht_mcs_nss: intersect_vht_mcs_nss({ ap.vht_mcs_nss }, { client.vht_mcs_nss }),
    }
}
