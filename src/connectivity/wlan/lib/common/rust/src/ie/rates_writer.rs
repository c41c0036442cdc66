// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::{
    appendable::Appendable,
    error::FrameWriteError,
    ie::{
        write_ext_supported_rates, write_supported_rates, SupportedRate,
        EXT_SUPPORTED_RATES_MAX_LEN, SUPPORTED_RATES_MAX_LEN,
    },
};

/// Splits a list of rates across the Supported Rates element and, once that is full, the
/// Extended Supported Rates element.
pub struct RatesWriter<'a>(&'a [SupportedRate]);

impl<'a> RatesWriter<'a> {
    pub fn try_new(rates: &'a [SupportedRate]) -> Result<RatesWriter<'a>, FrameWriteError> {
        if rates.is_empty() {
            Err(FrameWriteError::new_invalid_data("no rates to write"))
        } else if rates.len() > SUPPORTED_RATES_MAX_LEN + EXT_SUPPORTED_RATES_MAX_LEN {
            Err(FrameWriteError::new_invalid_data("rates will not fit in elements"))
        } else {
            Ok(RatesWriter(rates))
        }
    }

    pub fn write_supported_rates<B: Appendable>(&self, buf: &mut B) -> Result<(), FrameWriteError> {
        let num_rates = std::cmp::min(self.0.len(), SUPPORTED_RATES_MAX_LEN);
        write_supported_rates(buf, &self.0[..num_rates])
    }

    /// Writes nothing if all rates fit into the Supported Rates element.
    pub fn write_ext_supported_rates<B: Appendable>(
        &self,
        buf: &mut B,
    ) -> Result<(), FrameWriteError> {
        if self.0.len() > SUPPORTED_RATES_MAX_LEN {
            write_ext_supported_rates(buf, &self.0[SUPPORTED_RATES_MAX_LEN..])?;
        }
        Ok(())
    }
}
