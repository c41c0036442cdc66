// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Client station. A `Station` joins a single BSS on behalf of the SME: it authenticates and
//! associates with the AP, bridges the data plane between the air and the host and keeps track of
//! the AP's liveness.

mod capabilities;
pub mod frame_writer;
mod lost_bss;
mod ps_queue;

use {
    crate::{
        block_ack::{BlockAckState, BlockAckTx},
        device::{AssocContext, DeviceOps, LinkStatus, RxInfo, TxFlags},
        error::{Error, Status},
        key::KeyConfig,
        service::{
            AssociateRequest, AssociateResultCode, AuthenticateRequest, AuthenticateResultCode,
            AuthenticationType, BssDescription, DeauthenticateRequest, EapolRequest,
            EapolResultCode, MlmeEvent, MlmeRequest, SetKeysRequest,
        },
        timer::{EventId, Scheduler, Timer},
    },
    capabilities::{
        assoc_req_capability_info, build_assoc_context, is_cbw40_rx_possible,
        negotiate_assoc_req_rates, override_ht_capabilities,
    },
    frame_writer::{write_frame_with_fixed_buf, AssocReqBody, DataFrameParams},
    log::{debug, error, info, warn},
    lost_bss::LostBssCounter,
    ps_queue::PowerSaveQueue,
    std::time::Duration,
    wlan_common::{
        energy::DecibelMilliWatt,
        error::FrameParseError,
        ewma_signal::EwmaSignalStrength,
        frame_len, ie,
        mac::{self, MacAddr},
        sequence::SequenceManager,
        TimeUnit,
    },
    zerocopy::ByteSlice,
};

/// Tunables of a client station. Timeouts are expressed in beacon periods of the joined BSS.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub signal_report_beacon_count: u32,
    pub assoc_timeout_beacon_count: u32,
    /// Time without a beacon after which the BSS is considered lost.
    pub auto_deauth_beacon_count: u32,
    pub ps_queue_capacity: usize,
    /// Number of samples the RSSI average is weighted over.
    pub rssi_ewma_window: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signal_report_beacon_count: 10,
            assoc_timeout_beacon_count: 20,
            auto_deauth_beacon_count: 100,
            ps_queue_capacity: 30,
            rssi_ewma_window: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WlanState {
    Idle,
    Authenticating,
    Authenticated,
    Associated,
}

/// IEEE Std 802.1X controlled port. Only EAPOL frames pass while the port is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlledPort {
    Blocked,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    Authenticating,
    Associating,
    SignalReport,
    AutoDeauth,
}

#[derive(Debug)]
struct JoinContext {
    bss: BssDescription,
    auth_type: AuthenticationType,
}

/// Sends BlockAck frames to the AP of the joined BSS.
struct BoundBlockAckTx<'a, D> {
    device: &'a mut D,
    seq_mgr: &'a mut SequenceManager,
    bssid: MacAddr,
    client_addr: MacAddr,
}

impl<'a, D: DeviceOps> BlockAckTx for BoundBlockAckTx<'a, D> {
    fn send_block_ack_frame(&mut self, n: usize, body: &[u8]) -> Result<(), Error> {
        let frame = write_frame_with_fixed_buf(n, |w| {
            frame_writer::write_action_frame(w, self.bssid, self.client_addr, body, self.seq_mgr)
        })?;
        self.device
            .send_wlan_frame(frame, TxFlags::NONE)
            .map_err(|s| Error::Status("error sending BlockAck frame".to_string(), s))
    }
}

pub struct Station<D> {
    config: ClientConfig,
    device: D,
    iface_mac: MacAddr,
    timer: Timer<TimedEvent>,
    seq_mgr: SequenceManager,
    state: WlanState,
    join_ctx: Option<JoinContext>,
    assoc_ctx: Option<AssocContext>,
    controlled_port: ControlledPort,
    ps_queue: PowerSaveQueue,
    on_channel: bool,
    lost_bss: Option<LostBssCounter>,
    block_ack: BlockAckState,
    rssi: Option<EwmaSignalStrength>,
    auth_timeout: Option<EventId>,
    assoc_timeout: Option<EventId>,
    signal_report_timeout: Option<EventId>,
    auto_deauth_timeout: Option<EventId>,
    events: Vec<MlmeEvent>,
}

impl<D: DeviceOps> Station<D> {
    pub fn new(config: ClientConfig, device: D, scheduler: Box<dyn Scheduler>) -> Self {
        let iface_mac = device.wlan_info().mac_addr;
        let ps_queue = PowerSaveQueue::new(config.ps_queue_capacity);
        Self {
            config,
            device,
            iface_mac,
            timer: Timer::new(scheduler),
            seq_mgr: SequenceManager::new(),
            state: WlanState::Idle,
            join_ctx: None,
            assoc_ctx: None,
            controlled_port: ControlledPort::Blocked,
            ps_queue,
            on_channel: true,
            lost_bss: None,
            block_ack: BlockAckState::Closed,
            rssi: None,
            auth_timeout: None,
            assoc_timeout: None,
            signal_report_timeout: None,
            auto_deauth_timeout: None,
            events: vec![],
        }
    }

    pub fn state(&self) -> WlanState {
        self.state
    }

    pub fn controlled_port(&self) -> ControlledPort {
        self.controlled_port
    }

    pub fn assoc_ctx(&self) -> Option<&AssocContext> {
        self.assoc_ctx.as_ref()
    }

    /// Takes every message for the SME produced so far, oldest first.
    pub fn drain_events(&mut self) -> Vec<MlmeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the station to its initial state. Pending timeouts are canceled and queued frames
    /// are dropped; messages for the SME are kept.
    pub fn reset(&mut self) {
        self.timer.cancel_all();
        self.auth_timeout = None;
        self.assoc_timeout = None;
        self.signal_report_timeout = None;
        self.auto_deauth_timeout = None;

        self.state = WlanState::Idle;
        self.join_ctx = None;
        self.assoc_ctx = None;
        self.controlled_port = ControlledPort::Blocked;
        self.ps_queue.clear();
        self.on_channel = true;
        self.lost_bss = None;
        self.block_ack = BlockAckState::Closed;
        self.rssi = None;
        self.seq_mgr = SequenceManager::new();
    }

    pub fn handle_mlme_request(&mut self, req: MlmeRequest) -> Result<(), Error> {
        match req {
            MlmeRequest::Authenticate(req) => self.authenticate(req),
            MlmeRequest::Deauthenticate(req) => self.deauthenticate(req),
            MlmeRequest::Associate(req) => self.associate(req),
            MlmeRequest::Eapol(req) => self.send_eapol(req),
            MlmeRequest::SetKeys(req) => self.set_keys(req),
        }
    }

    fn bssid(&self) -> Option<MacAddr> {
        self.join_ctx.as_ref().map(|join_ctx| join_ctx.bss.bssid)
    }

    fn is_rsn(&self) -> bool {
        self.join_ctx.as_ref().map_or(false, |join_ctx| join_ctx.bss.rsne.is_some())
    }

    fn beacon_periods(&self, count: u32) -> Duration {
        let beacon_period = self.join_ctx.as_ref().map_or(
            TimeUnit::DEFAULT_BEACON_INTERVAL,
            |join_ctx| TimeUnit(join_ctx.bss.beacon_period),
        );
        Duration::from(beacon_period) * count
    }

    fn send_wlan_frame(&mut self, frame: Vec<u8>, flags: TxFlags) -> Result<(), Error> {
        self.device
            .send_wlan_frame(frame, flags)
            .map_err(|s| Error::Status("error sending frame".to_string(), s))
    }

    fn send_auth_conf(
        &mut self,
        peer_sta_address: MacAddr,
        auth_type: AuthenticationType,
        result_code: AuthenticateResultCode,
    ) {
        self.events.push(MlmeEvent::AuthenticateConf { peer_sta_address, auth_type, result_code });
    }

    fn send_assoc_conf(&mut self, result_code: AssociateResultCode, association_id: u16) {
        self.events.push(MlmeEvent::AssociateConf { result_code, association_id });
    }

    fn authenticate(&mut self, req: AuthenticateRequest) -> Result<(), Error> {
        let bssid = req.bss.bssid;
        if self.state != WlanState::Idle {
            self.send_auth_conf(bssid, req.auth_type, AuthenticateResultCode::RefusedState);
            return Err(Error::Status(
                format!("cannot authenticate in state {:?}", self.state),
                Status::BAD_STATE,
            ));
        }
        if req.auth_type != AuthenticationType::OpenSystem {
            self.send_auth_conf(bssid, req.auth_type, AuthenticateResultCode::RefusedUnsupported);
            return Err(Error::Status(
                format!("unsupported authentication type {:?}", req.auth_type),
                Status::NOT_SUPPORTED,
            ));
        }

        let frame = write_frame_with_fixed_buf(frame_len!(mac::MgmtHdr, mac::AuthHdr), |w| {
            frame_writer::write_open_auth_frame(w, bssid, self.iface_mac, &mut self.seq_mgr)
        })?;
        if let Err(e) = self.send_wlan_frame(frame, TxFlags::NONE) {
            self.send_auth_conf(bssid, req.auth_type, AuthenticateResultCode::Refused);
            return Err(e);
        }

        let timeout =
            Duration::from(TimeUnit(req.bss.beacon_period)) * req.auth_failure_timeout;
        self.join_ctx = Some(JoinContext { bss: req.bss, auth_type: req.auth_type });
        self.auth_timeout = Some(self.timer.schedule_after(timeout, TimedEvent::Authenticating));
        self.state = WlanState::Authenticating;
        Ok(())
    }

    fn on_auth_frame(&mut self, auth_hdr: &mac::AuthHdr) {
        if self.state != WlanState::Authenticating {
            debug!("ignoring authentication frame in state {:?}", self.state);
            return;
        }
        let (bssid, auth_type) = match self.join_ctx.as_ref() {
            Some(join_ctx) => (join_ctx.bss.bssid, join_ctx.auth_type),
            None => return,
        };
        cancel_timeout(&mut self.timer, &mut self.auth_timeout);

        if { auth_hdr.auth_alg_num } != mac::AuthAlgorithmNumber::OPEN
            || { auth_hdr.auth_txn_seq_num } != 2
            || { auth_hdr.status_code } != mac::StatusCode::SUCCESS
        {
            warn!(
                "authentication rejected; algorithm: {:?}, sequence: {}, status: {:?}",
                { auth_hdr.auth_alg_num },
                { auth_hdr.auth_txn_seq_num },
                { auth_hdr.status_code }
            );
            self.state = WlanState::Idle;
            self.send_auth_conf(bssid, auth_type, AuthenticateResultCode::AuthenticationRejected);
            return;
        }

        info!("authenticated with {:02x?}", bssid);
        self.state = WlanState::Authenticated;
        self.send_auth_conf(bssid, auth_type, AuthenticateResultCode::Success);
    }

    fn deauthenticate(&mut self, req: DeauthenticateRequest) -> Result<(), Error> {
        if self.state != WlanState::Authenticated && self.state != WlanState::Associated {
            return Err(Error::Status(
                format!("cannot deauthenticate in state {:?}", self.state),
                Status::BAD_STATE,
            ));
        }
        let bssid = match self.bssid() {
            Some(bssid) if bssid == req.peer_sta_address => bssid,
            _ => {
                return Err(Error::Status(
                    format!("unknown peer {:02x?}", req.peer_sta_address),
                    Status::INVALID_ARGS,
                ))
            }
        };

        if let Err(e) = self.send_deauth_frame(bssid, req.reason_code) {
            error!("could not send deauthentication frame: {}", e);
        }
        self.leave_bss(bssid);
        self.events.push(MlmeEvent::DeauthenticateConf { peer_sta_address: bssid });
        Ok(())
    }

    fn send_deauth_frame(
        &mut self,
        bssid: MacAddr,
        reason_code: mac::ReasonCode,
    ) -> Result<(), Error> {
        let frame = write_frame_with_fixed_buf(frame_len!(mac::MgmtHdr, mac::DeauthHdr), |w| {
            frame_writer::write_deauth_frame(
                w,
                bssid,
                self.iface_mac,
                reason_code,
                &mut self.seq_mgr,
            )
        })?;
        self.send_wlan_frame(frame, TxFlags::NONE)
    }

    fn on_deauth_frame(&mut self, deauth_hdr: &mac::DeauthHdr) {
        if self.state != WlanState::Authenticated && self.state != WlanState::Associated {
            debug!("ignoring deauthentication frame in state {:?}", self.state);
            return;
        }
        let bssid = match self.bssid() {
            Some(bssid) => bssid,
            None => return,
        };
        let reason_code = { deauth_hdr.reason_code };
        info!("deauthenticated by {:02x?}, reason: {:?}", bssid, reason_code);
        self.leave_bss(bssid);
        self.events.push(MlmeEvent::DeauthenticateInd { peer_sta_address: bssid, reason_code });
    }

    /// Tears down the link to the BSS and returns to the initial state.
    fn leave_bss(&mut self, bssid: MacAddr) {
        if self.assoc_ctx.is_some() {
            if let Err(status) = self.device.clear_assoc(&bssid) {
                error!("could not clear association: {}", status);
            }
        }
        if let Err(status) = self.device.set_eth_link(LinkStatus::DOWN) {
            error!("could not set link status: {}", status);
        }
        self.reset();
    }

    fn associate(&mut self, req: AssociateRequest) -> Result<(), Error> {
        match self.state {
            WlanState::Authenticated => (),
            WlanState::Associated => warn!("already associated; associating again"),
            state => {
                self.send_assoc_conf(AssociateResultCode::RefusedNotAuthenticated, 0);
                return Err(Error::Status(
                    format!("cannot associate in state {:?}", state),
                    Status::BAD_STATE,
                ));
            }
        }

        let frame = match self.write_assoc_req_frame(req.rsne.as_ref().map(|rsne| &rsne[..])) {
            Ok(frame) => frame,
            Err(e) => {
                self.send_assoc_conf(AssociateResultCode::RefusedCapabilitiesMismatch, 0);
                return Err(e);
            }
        };
        if let Err(e) = self.send_wlan_frame(frame, TxFlags::NONE) {
            self.send_assoc_conf(AssociateResultCode::RefusedReasonUnspecified, 0);
            return Err(e);
        }

        cancel_timeout(&mut self.timer, &mut self.assoc_timeout);
        let timeout = self.beacon_periods(self.config.assoc_timeout_beacon_count);
        self.assoc_timeout = Some(self.timer.schedule_after(timeout, TimedEvent::Associating));
        Ok(())
    }

    fn write_assoc_req_frame(&mut self, rsne: Option<&[u8]>) -> Result<Vec<u8>, Error> {
        let bss = match self.join_ctx.as_ref() {
            Some(join_ctx) => &join_ctx.bss,
            None => {
                return Err(Error::Status("no BSS to associate with".to_string(), Status::BAD_STATE))
            }
        };
        let wlan_info = self.device.wlan_info();
        let band = wlan_info.band_info(bss.chan.band()).ok_or_else(|| {
            Error::Status(
                format!("no client capabilities for band {:?}", bss.chan.band()),
                Status::NOT_SUPPORTED,
            )
        })?;
        let rates = negotiate_assoc_req_rates(bss, band).map_err(|e| {
            Error::Status(format!("could not negotiate rates: {}", e), Status::NOT_SUPPORTED)
        })?;
        let ht_cap = match (band.ht_cap, bss.ht_cap.as_ref()) {
            (Some(client_ht_cap), Some(bss_ht_cap)) => {
                let cbw40_rx = is_cbw40_rx_possible(&bss.chan, Some(bss_ht_cap), band);
                Some(override_ht_capabilities(client_ht_cap, cbw40_rx))
            }
            _ => None,
        };

        let body = AssocReqBody {
            capabilities: assoc_req_capability_info(wlan_info.caps),
            ssid: &bss.ssid[..],
            rates: &rates[..],
            rsne,
            ht_cap,
        };
        let iface_mac = self.iface_mac;
        let seq_mgr = &mut self.seq_mgr;
        write_frame_with_fixed_buf(body.frame_len(), |w| {
            frame_writer::write_assoc_req_frame(w, bss.bssid, iface_mac, &body, seq_mgr)
        })
    }

    fn on_assoc_resp_frame<B: ByteSlice>(
        &mut self,
        assoc_resp_hdr: &mac::AssocRespHdr,
        elements: B,
    ) {
        // While associated, only a response to an outstanding re-association is accepted.
        let awaiting_resp = match self.state {
            WlanState::Authenticated => true,
            WlanState::Associated => self.assoc_timeout.is_some(),
            _ => false,
        };
        if !awaiting_resp {
            debug!("ignoring association response in state {:?}", self.state);
            return;
        }
        cancel_timeout(&mut self.timer, &mut self.assoc_timeout);

        let status_code = { assoc_resp_hdr.status_code };
        if status_code != mac::StatusCode::SUCCESS {
            warn!("association refused by AP: {:?}", status_code);
            let result_code = match status_code {
                mac::StatusCode::REFUSED_TEMPORARILY => AssociateResultCode::RefusedTemporarily,
                mac::StatusCode::REFUSED_CAPABILITIES_MISMATCH => {
                    AssociateResultCode::RefusedCapabilitiesMismatch
                }
                _ => AssociateResultCode::RefusedReasonUnspecified,
            };
            self.send_assoc_conf(result_code, 0);
            return;
        }

        let wlan_info = self.device.wlan_info();
        let negotiated = match self.join_ctx.as_ref() {
            Some(join_ctx) => {
                build_assoc_context(&join_ctx.bss, &wlan_info, assoc_resp_hdr, elements)
            }
            None => return,
        };
        let assoc_ctx = match negotiated {
            Ok(assoc_ctx) => assoc_ctx,
            Err(e) => {
                error!("could not negotiate association: {}", e);
                self.send_assoc_conf(AssociateResultCode::RefusedCapabilitiesMismatch, 0);
                return;
            }
        };

        let aid = assoc_ctx.aid;
        let bssid = assoc_ctx.bssid;
        let is_ht = assoc_ctx.is_ht();
        info!("associated with {:02x?}, aid: {}", bssid, aid);
        if let Err(status) = self.device.configure_assoc(assoc_ctx.clone()) {
            error!("could not configure association: {}", status);
        }
        self.assoc_ctx = Some(assoc_ctx);
        self.state = WlanState::Associated;

        cancel_timeout(&mut self.timer, &mut self.signal_report_timeout);
        let signal_report = self.beacon_periods(self.config.signal_report_beacon_count);
        self.signal_report_timeout =
            Some(self.timer.schedule_after(signal_report, TimedEvent::SignalReport));
        self.start_lost_bss_counter();

        self.send_assoc_conf(AssociateResultCode::Success, aid);
        self.report_signal();

        if !self.is_rsn() {
            self.open_controlled_port();
        }
        if is_ht {
            let mut tx = BoundBlockAckTx {
                device: &mut self.device,
                seq_mgr: &mut self.seq_mgr,
                bssid,
                client_addr: self.iface_mac,
            };
            self.block_ack = self.block_ack.establish(&mut tx);
        }
    }

    fn start_lost_bss_counter(&mut self) {
        let beacon_period = match self.join_ctx.as_ref() {
            Some(join_ctx) => join_ctx.bss.beacon_period,
            None => return,
        };
        let now = self.timer.now();
        let counter =
            LostBssCounter::start(beacon_period, self.config.auto_deauth_beacon_count, now);
        let timeout = counter.remaining();
        self.lost_bss = Some(counter);
        cancel_timeout(&mut self.timer, &mut self.auto_deauth_timeout);
        self.auto_deauth_timeout = Some(self.timer.schedule_after(timeout, TimedEvent::AutoDeauth));
    }

    fn open_controlled_port(&mut self) {
        self.controlled_port = ControlledPort::Open;
        if let Err(status) = self.device.set_eth_link(LinkStatus::UP) {
            error!("could not set link status: {}", status);
        }
    }

    fn on_disassoc_frame(&mut self, disassoc_hdr: &mac::DisassocHdr) {
        if self.state != WlanState::Associated {
            debug!("ignoring disassociation frame in state {:?}", self.state);
            return;
        }
        let bssid = match self.bssid() {
            Some(bssid) => bssid,
            None => return,
        };
        let reason_code = { disassoc_hdr.reason_code };
        info!("disassociated from {:02x?}, reason: {:?}", bssid, reason_code);

        if let Err(status) = self.device.clear_assoc(&bssid) {
            error!("could not clear association: {}", status);
        }
        if let Err(status) = self.device.set_eth_link(LinkStatus::DOWN) {
            error!("could not set link status: {}", status);
        }
        cancel_timeout(&mut self.timer, &mut self.signal_report_timeout);
        cancel_timeout(&mut self.timer, &mut self.auto_deauth_timeout);
        self.lost_bss = None;
        self.assoc_ctx = None;
        self.controlled_port = ControlledPort::Blocked;
        self.block_ack = BlockAckState::Closed;
        self.ps_queue.clear();
        self.state = WlanState::Authenticated;
        self.events.push(MlmeEvent::DisassociateInd { peer_sta_address: bssid, reason_code });
    }

    fn send_eapol(&mut self, req: EapolRequest) -> Result<(), Error> {
        if self.state != WlanState::Associated {
            self.events
                .push(MlmeEvent::EapolConf { result_code: EapolResultCode::TransmissionFailure });
            return Err(Error::Status(
                format!("cannot send EAPOL frame in state {:?}", self.state),
                Status::BAD_STATE,
            ));
        }

        let params = DataFrameParams {
            addr1: req.dst_addr,
            src: req.src_addr,
            dst: req.dst_addr,
            protected: self.is_rsn() && self.controlled_port == ControlledPort::Open,
            qos_ctrl: false,
        };
        let frame_len = frame_len!(mac::FixedDataHdrFields, mac::LlcHdr) + req.data.len();
        let flags = data_tx_flags(&params) | TxFlags::FAVOR_RELIABILITY;
        let result = write_frame_with_fixed_buf(frame_len, |w| {
            frame_writer::write_data_frame(
                w,
                &params,
                mac::ETHER_TYPE_EAPOL,
                &req.data[..],
                &mut self.seq_mgr,
            )
        })
        .and_then(|frame| self.send_wlan_frame(frame, flags));

        let result_code = match result {
            Ok(()) => EapolResultCode::Success,
            Err(_) => EapolResultCode::TransmissionFailure,
        };
        self.events.push(MlmeEvent::EapolConf { result_code });
        result
    }

    fn set_keys(&mut self, req: SetKeysRequest) -> Result<(), Error> {
        if self.state != WlanState::Associated {
            return Err(Error::Status(
                format!("cannot set keys in state {:?}", self.state),
                Status::BAD_STATE,
            ));
        }
        for key_desc in req.keylist.iter() {
            let key = KeyConfig::from_key_descriptor(key_desc)?;
            self.device.set_key(key).map_err(|s| {
                Error::Status(format!("failed to set key {}", key_desc.key_id), s)
            })?;
        }
        self.open_controlled_port();
        Ok(())
    }

    /// Handles a frame received from the air.
    pub fn handle_mac_frame_rx(&mut self, bytes: &[u8], rx_info: RxInfo) -> Result<(), Error> {
        match mac::MacFrame::parse(bytes, rx_info.body_aligned).ok_or(Error::BufferTooSmall)? {
            mac::MacFrame::Mgmt { mgmt_hdr, body, .. } => {
                self.handle_mgmt_frame(&mgmt_hdr, body, rx_info)
            }
            mac::MacFrame::Data { fixed_fields, addr4, qos_ctrl, body, .. } => {
                self.handle_data_frame(&fixed_fields, addr4.map(|a| *a), qos_ctrl, body, rx_info);
                Ok(())
            }
            mac::MacFrame::Ctrl { frame_ctrl, .. } => {
                debug!("ignoring control frame: {:?}", frame_ctrl.ctrl_subtype());
                Ok(())
            }
            mac::MacFrame::Unsupported { frame_ctrl } => {
                debug!("ignoring frame of type {:?}", frame_ctrl.typ());
                Ok(())
            }
        }
    }

    fn handle_mgmt_frame<B: ByteSlice>(
        &mut self,
        mgmt_hdr: &mac::MgmtHdr,
        body: B,
        rx_info: RxInfo,
    ) -> Result<(), Error> {
        match self.bssid() {
            Some(bssid) if bssid == { mgmt_hdr.addr3 } => (),
            _ => return Ok(()),
        }
        let subtype = { mgmt_hdr.frame_ctrl }.mgmt_subtype();
        match mac::MgmtBody::parse(subtype, body).ok_or(Error::BufferTooSmall)? {
            mac::MgmtBody::Beacon { elements, .. } => self.on_beacon_frame(elements, rx_info),
            mac::MgmtBody::Authentication { auth_hdr, .. } => self.on_auth_frame(&auth_hdr),
            mac::MgmtBody::AssociationResp { assoc_resp_hdr, elements } => {
                self.update_rssi(rx_info.rssi_dbm);
                self.on_assoc_resp_frame(&assoc_resp_hdr, elements)
            }
            mac::MgmtBody::Deauthentication { deauth_hdr, .. } => {
                self.on_deauth_frame(&deauth_hdr)
            }
            mac::MgmtBody::Disassociation { disassoc_hdr, .. } => {
                self.on_disassoc_frame(&disassoc_hdr)
            }
            mac::MgmtBody::Action { action_hdr, elements } => {
                self.on_action_frame(&action_hdr, elements)
            }
            _ => debug!("ignoring management frame: {:?}", subtype),
        }
        Ok(())
    }

    fn update_rssi(&mut self, rssi_dbm: i8) {
        match self.rssi.as_mut() {
            Some(rssi) => rssi.update_average(DecibelMilliWatt(rssi_dbm)),
            None => {
                self.rssi = Some(EwmaSignalStrength::new(
                    self.config.rssi_ewma_window,
                    DecibelMilliWatt(rssi_dbm),
                ))
            }
        }
    }

    fn report_signal(&mut self) {
        match self.rssi.as_ref() {
            Some(rssi) => self.events.push(MlmeEvent::SignalReport { rssi_dbm: rssi.dbm().0 }),
            None => debug!("no signal strength to report"),
        }
    }

    fn on_beacon_frame<B: ByteSlice>(&mut self, elements: B, rx_info: RxInfo) {
        self.update_rssi(rx_info.rssi_dbm);
        if self.state != WlanState::Associated {
            return;
        }
        let now = self.timer.now();
        if let Some(lost_bss) = self.lost_bss.as_mut() {
            lost_bss.reset(now);
        }

        let aid = match self.assoc_ctx.as_ref() {
            Some(assoc_ctx) => assoc_ctx.aid,
            None => return,
        };
        for (id, body) in ie::Reader::new(elements) {
            if id != ie::Id::TIM {
                continue;
            }
            match ie::parse_tim(body) {
                Ok(tim) if tim.is_traffic_buffered(aid) => {
                    if let Err(e) = self.send_ps_poll() {
                        error!("could not send PS-Poll frame: {}", e);
                    }
                }
                Ok(_) => (),
                Err(e) => warn!("invalid TIM in beacon: {}", e),
            }
        }
    }

    fn send_ps_poll(&mut self) -> Result<(), Error> {
        let (aid, bssid) = match self.assoc_ctx.as_ref() {
            Some(assoc_ctx) => (assoc_ctx.aid, assoc_ctx.bssid),
            None => {
                return Err(Error::Status("PS-Poll requires an AID".to_string(), Status::BAD_STATE))
            }
        };
        let iface_mac = self.iface_mac;
        let frame = write_frame_with_fixed_buf(frame_len!(mac::FrameControl, mac::PsPoll), |w| {
            frame_writer::write_ps_poll_frame(w, aid, bssid, iface_mac)
        })?;
        self.send_wlan_frame(frame, TxFlags::NONE)
    }

    fn on_action_frame<B: ByteSlice>(&mut self, action_hdr: &mac::ActionHdr, body: B) {
        if self.state != WlanState::Associated {
            debug!("ignoring action frame in state {:?}", self.state);
            return;
        }
        let category = { action_hdr.action };
        if category != mac::ActionCategory::BLOCK_ACK {
            debug!("ignoring action frame of category {:?}", category);
            return;
        }
        let bssid = match self.bssid() {
            Some(bssid) => bssid,
            None => return,
        };
        let mut tx = BoundBlockAckTx {
            device: &mut self.device,
            seq_mgr: &mut self.seq_mgr,
            bssid,
            client_addr: self.iface_mac,
        };
        self.block_ack = self.block_ack.on_block_ack_frame(&mut tx, body);
    }

    fn handle_data_frame<B: ByteSlice>(
        &mut self,
        fixed_fields: &mac::FixedDataHdrFields,
        addr4: Option<MacAddr>,
        qos_ctrl: Option<mac::QosControl>,
        body: B,
        rx_info: RxInfo,
    ) {
        if self.state != WlanState::Associated {
            debug!("dropping data frame in state {:?}", self.state);
            return;
        }
        match self.bssid() {
            Some(bssid) if bssid == { fixed_fields.addr2 } => (),
            _ => {
                debug!("dropping data frame from {:02x?}", { fixed_fields.addr2 });
                return;
            }
        }
        self.update_rssi(rx_info.rssi_dbm);

        let frame_ctrl = { fixed_fields.frame_ctrl };
        if frame_ctrl.data_subtype().null() {
            if let Err(e) = self.send_keep_alive_resp() {
                error!("could not send keep-alive response: {}", e);
            }
            return;
        }

        if let Some(msdus) =
            mac::MsduIterator::from_data_frame_parts(fixed_fields, addr4, qos_ctrl, body)
        {
            for msdu in msdus {
                self.deliver_msdu(msdu);
            }
        }

        // Frames the AP buffered are only fetched once data can flow.
        if self.controlled_port == ControlledPort::Open
            && frame_ctrl.more_data()
            && mac::is_unicast(fixed_fields.addr1)
        {
            if let Err(e) = self.send_ps_poll() {
                error!("could not send PS-Poll frame: {}", e);
            }
        }
    }

    fn send_keep_alive_resp(&mut self) -> Result<(), Error> {
        let bssid = match self.bssid() {
            Some(bssid) => bssid,
            None => return Ok(()),
        };
        let frame = write_frame_with_fixed_buf(frame_len!(mac::FixedDataHdrFields), |w| {
            frame_writer::write_keep_alive_resp_frame(w, bssid, self.iface_mac, &mut self.seq_mgr)
        })?;
        self.send_wlan_frame(frame, TxFlags::NONE)
    }

    fn deliver_msdu<B: ByteSlice>(&mut self, msdu: mac::Msdu<B>) {
        let mac::Msdu { dst_addr, src_addr, llc_frame } = msdu;
        if llc_frame.body.is_empty() {
            debug!("dropping MSDU without payload");
            return;
        }
        let ether_type = { llc_frame.hdr.protocol_id }.to_native();
        if ether_type == mac::ETHER_TYPE_EAPOL {
            if !is_valid_eapol_frame(&llc_frame.body[..]) {
                error!("received invalid EAPOL frame");
                return;
            }
            self.events.push(MlmeEvent::EapolInd {
                src_addr,
                dst_addr,
                data: llc_frame.body.to_vec(),
            });
            return;
        }
        if self.controlled_port == ControlledPort::Blocked {
            debug!("controlled port blocked; dropping MSDU of type {:#06x}", ether_type);
            return;
        }

        let frame_len = frame_len!(mac::EthernetIIHdr) + llc_frame.body.len();
        let frame = match write_frame_with_fixed_buf(frame_len, |w| {
            mac::write_eth_frame(w, dst_addr, src_addr, ether_type, &llc_frame.body[..])
                .map_err(Error::from)
        }) {
            Ok(frame) => frame,
            Err(e) => {
                error!("could not write ethernet frame: {}", e);
                return;
            }
        };
        if let Err(status) = self.device.deliver_eth_frame(&frame[..]) {
            error!("could not deliver ethernet frame: {}", status);
        }
    }

    /// Handles an Ethernet II frame the host wants to send to the BSS.
    pub fn handle_eth_frame_tx(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.state != WlanState::Associated {
            return Err(Error::Status(
                format!("cannot send data frame in state {:?}", self.state),
                Status::BAD_STATE,
            ));
        }
        if bytes.len() > mac::MAX_ETH_FRAME_LEN {
            return Err(Error::Status(
                format!("ethernet frame too long: {} bytes", bytes.len()),
                Status::INVALID_ARGS,
            ));
        }
        if mac::EthernetFrame::parse(bytes).is_none() {
            return Err(Error::ParsingFrame(FrameParseError(format!(
                "ethernet frame too short: {} bytes",
                bytes.len()
            ))));
        }
        if !self.on_channel {
            self.ps_queue.enqueue(bytes.to_vec());
            return Ok(());
        }
        self.send_eth_frame(bytes)
    }

    fn send_eth_frame(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let eth_frame = mac::EthernetFrame::parse(bytes).ok_or_else(|| {
            Error::ParsingFrame(FrameParseError("invalid ethernet frame".to_string()))
        })?;
        let (bssid, qos_ctrl) = match self.assoc_ctx.as_ref() {
            Some(assoc_ctx) => (assoc_ctx.bssid, assoc_ctx.is_ht()),
            None => {
                return Err(Error::Status("not associated".to_string(), Status::BAD_STATE));
            }
        };
        let params = DataFrameParams {
            addr1: bssid,
            src: eth_frame.hdr.sa,
            dst: eth_frame.hdr.da,
            protected: self.is_rsn() && self.controlled_port == ControlledPort::Open,
            qos_ctrl,
        };
        let frame_len = frame_len!(mac::FixedDataHdrFields, mac::QosControl, mac::LlcHdr)
            + eth_frame.body.len();
        let frame = write_frame_with_fixed_buf(frame_len, |w| {
            frame_writer::write_data_frame(
                w,
                &params,
                { eth_frame.hdr.ether_type }.to_native(),
                &eth_frame.body[..],
                &mut self.seq_mgr,
            )
        })?;
        self.send_wlan_frame(frame, data_tx_flags(&params))
    }

    /// Handles a timeout scheduled earlier. Events which were canceled in the meantime are
    /// ignored.
    pub fn handle_timeout(&mut self, event_id: EventId) {
        let event = match self.timer.triggered(&event_id) {
            Some(event) => event,
            None => return,
        };
        match event {
            TimedEvent::Authenticating => {
                self.auth_timeout = None;
                if self.state != WlanState::Authenticating {
                    return;
                }
                info!("authentication timed out");
                self.state = WlanState::Idle;
                if let Some(join_ctx) = self.join_ctx.as_ref() {
                    let (bssid, auth_type) = (join_ctx.bss.bssid, join_ctx.auth_type);
                    let result_code = AuthenticateResultCode::AuthFailureTimeout;
                    self.send_auth_conf(bssid, auth_type, result_code);
                }
            }
            TimedEvent::Associating => {
                self.assoc_timeout = None;
                info!("association timed out");
                self.send_assoc_conf(AssociateResultCode::RefusedTemporarily, 0);
            }
            TimedEvent::SignalReport => {
                self.signal_report_timeout = None;
                if self.state == WlanState::Associated {
                    self.report_signal();
                    let timeout = self.beacon_periods(self.config.signal_report_beacon_count);
                    self.signal_report_timeout =
                        Some(self.timer.schedule_after(timeout, TimedEvent::SignalReport));
                }
            }
            TimedEvent::AutoDeauth => self.on_auto_deauth_timeout(),
        }
    }

    fn on_auto_deauth_timeout(&mut self) {
        self.auto_deauth_timeout = None;
        if !self.on_channel {
            error!("auto-deauth timeout fired while off channel");
            return;
        }
        let now = self.timer.now();
        let lost_bss = match self.lost_bss.as_mut() {
            Some(lost_bss) => lost_bss,
            None => return,
        };
        let remaining = lost_bss.account(now);
        if !lost_bss.should_deauthenticate() {
            self.auto_deauth_timeout =
                Some(self.timer.schedule_after(remaining, TimedEvent::AutoDeauth));
            return;
        }
        if self.state != WlanState::Associated {
            return;
        }
        let bssid = match self.bssid() {
            Some(bssid) => bssid,
            None => return,
        };

        info!("lost BSS {:02x?}; deauthenticating", bssid);
        let reason_code = mac::ReasonCode::LEAVING_NETWORK_DEAUTH;
        self.events.push(MlmeEvent::DeauthenticateInd { peer_sta_address: bssid, reason_code });
        if let Err(e) = self.send_deauth_frame(bssid, reason_code) {
            error!("could not send deauthentication frame: {}", e);
        }
        self.leave_bss(bssid);
    }

    /// The radio is about to leave the BSS channel. The AP is asked to buffer frames for this
    /// client and the lost BSS countdown pauses.
    pub fn pre_switch_off_channel(&mut self) {
        self.on_channel = false;
        if self.state != WlanState::Associated {
            return;
        }
        if let Err(e) = self.send_power_mgmt_frame(true) {
            error!("could not enter power save mode: {}", e);
        }
        cancel_timeout(&mut self.timer, &mut self.auto_deauth_timeout);
        let now = self.timer.now();
        if let Some(lost_bss) = self.lost_bss.as_mut() {
            lost_bss.account(now);
        }
    }

    /// The radio returned to the BSS channel. Frames queued in the meantime are sent in order.
    pub fn back_to_main_channel(&mut self) {
        self.on_channel = true;
        if self.state != WlanState::Associated {
            return;
        }
        if let Err(e) = self.send_power_mgmt_frame(false) {
            error!("could not leave power save mode: {}", e);
        }
        let now = self.timer.now();
        if let Some(timeout) = self.lost_bss.as_mut().map(|lost_bss| lost_bss.resume(now)) {
            cancel_timeout(&mut self.timer, &mut self.auto_deauth_timeout);
            self.auto_deauth_timeout =
                Some(self.timer.schedule_after(timeout, TimedEvent::AutoDeauth));
        }

        let queued = self.ps_queue.drain().collect::<Vec<_>>();
        for frame in queued {
            if let Err(e) = self.send_eth_frame(&frame[..]) {
                error!("could not send queued frame: {}", e);
            }
        }
    }

    fn send_power_mgmt_frame(&mut self, pwr_mgmt: bool) -> Result<(), Error> {
        let bssid = match self.bssid() {
            Some(bssid) => bssid,
            None => return Ok(()),
        };
        let frame = write_frame_with_fixed_buf(frame_len!(mac::FixedDataHdrFields), |w| {
            frame_writer::write_null_data_frame(
                w,
                bssid,
                self.iface_mac,
                pwr_mgmt,
                &mut self.seq_mgr,
            )
        })?;
        self.send_wlan_frame(frame, TxFlags::NONE)
    }
}

/// An EAPOL frame is valid if its header's body length matches the bytes which follow it.
fn is_valid_eapol_frame(bytes: &[u8]) -> bool {
    const EAPOL_HDR_LEN: usize = 4;
    if bytes.len() < EAPOL_HDR_LEN {
        return false;
    }
    let body_len = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    body_len == bytes.len() - EAPOL_HDR_LEN
}

fn cancel_timeout(timer: &mut Timer<TimedEvent>, event_id: &mut Option<EventId>) {
    if let Some(event_id) = event_id.take() {
        timer.cancel_event(event_id);
    }
}

fn data_tx_flags(params: &DataFrameParams) -> TxFlags {
    let mut flags = TxFlags::NONE;
    if params.protected {
        flags = flags | TxFlags::PROTECTED;
    }
    if params.qos_ctrl {
        flags = flags | TxFlags::QOS;
    }
    flags
}
