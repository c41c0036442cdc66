// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        error::{Error, Status},
        service,
    },
    wlan_common::mac::{MacAddr, BCAST_ADDR},
};

pub const MAX_KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protection(u8);
impl Protection {
    pub const NONE: Self = Self(0);
    pub const RX: Self = Self(1);
    pub const TX: Self = Self(2);
    pub const RX_TX: Self = Self(3);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyType(u8);
impl KeyType {
    pub const PAIRWISE: Self = Self(1);
    pub const GROUP: Self = Self(2);
    pub const IGTK: Self = Self(3);
    pub const PEER: Self = Self(4);
}

impl From<service::KeyType> for KeyType {
    fn from(key_type: service::KeyType) -> Self {
        match key_type {
            service::KeyType::Pairwise => KeyType::PAIRWISE,
            service::KeyType::Group => KeyType::GROUP,
            service::KeyType::PeerKey => KeyType::PEER,
            service::KeyType::Igtk => KeyType::IGTK,
        }
    }
}

/// A key as installed on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConfig {
    pub bssid: u8,
    pub protection: Protection,
    pub cipher_oui: [u8; 3],
    pub cipher_type: u8,
    pub key_type: KeyType,
    pub peer_addr: MacAddr,
    pub key_idx: u8,
    pub key_len: u8,
    pub key: [u8; MAX_KEY_LEN],
    pub rsc: u64,
}

impl KeyConfig {
    /// Converts a key handed down by the SME. Group keys protect traffic to every peer and are
    /// therefore bound to the broadcast address.
    pub fn from_key_descriptor(desc: &service::KeyDescriptor) -> Result<Self, Error> {
        if desc.key_id > u8::max_value() as u16 {
            return Err(Error::Status(
                format!("invalid key id: {}", desc.key_id),
                Status::NOT_SUPPORTED,
            ));
        }
        if desc.key.len() > MAX_KEY_LEN {
            return Err(Error::Status(
                format!("key too long: {} bytes", desc.key.len()),
                Status::NOT_SUPPORTED,
            ));
        }
        let mut key = [0u8; MAX_KEY_LEN];
        key[..desc.key.len()].copy_from_slice(&desc.key[..]);

        let key_type = KeyType::from(desc.key_type);
        let peer_addr = if key_type == KeyType::GROUP { BCAST_ADDR } else { desc.address };
        Ok(Self {
            bssid: 0,
            protection: Protection::RX_TX,
            cipher_oui: desc.cipher_suite_oui,
            cipher_type: desc.cipher_suite_type,
            key_type,
            peer_addr,
            key_idx: desc.key_id as u8,
            key_len: desc.key.len() as u8,
            key,
            rsc: desc.rsc,
        })
    }

    pub fn key_bytes(&self) -> &[u8] {
        &self.key[..self.key_len as usize]
    }
}
