// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Crate wlan-common hosts common libraries
//! to be used for WLAN SME, MLME, and binaries written in Rust.

pub mod appendable;
pub mod big_endian;
pub mod buffer_reader;
pub mod buffer_writer;
pub mod channel;
pub mod data_writer;
pub mod energy;
pub mod error;
pub mod ewma_signal;
pub mod ie;
pub mod mac;
pub mod mgmt_writer;
pub mod sequence;
pub mod test_utils;
pub mod time;

pub use time::TimeUnit;

/// Asserts that an expression matches a pattern, optionally binding and returning the matched
/// value.
///
/// Panics with the given message, or a default one, if the pattern does not match.
#[macro_export]
macro_rules! assert_variant {
    // Use custom formatting when panicing.
    ($test:expr, $variant:pat => $e:expr, $fmt:expr $(, $args:tt)* $(,)?) => {
        match $test {
            $variant => $e,
            other => panic!("unexpected variant: {:?}, {}", other, format!($fmt $(, $args)*)),
        }
    };
    // Use default message when panicing.
    ($test:expr, $variant:pat => $e:expr $(,)?) => {
        match $test {
            $variant => $e,
            other => panic!("unexpected variant: {:?}", other),
        }
    };
    // Custom error message.
    ($test:expr, $variant:pat , $fmt:expr $(, $args:tt)* $(,)?) => {
        $crate::assert_variant!($test, $variant => {}, $fmt $(, $args)*)
    };
    // Default error message.
    ($test:expr, $variant:pat $(,)?) => {
        $crate::assert_variant!($test, $variant => {})
    };
}

/// Sums the sizes of the given types. Used to reserve buffers for frames made of fixed headers.
#[macro_export]
macro_rules! frame_len {
    () => { 0 };
    ($only:ty) => { std::mem::size_of::<$only>() };
    ($first:ty, $($tail:ty),*) => {
        std::mem::size_of::<$first>() + $crate::frame_len!($($tail),*)
    };
}
