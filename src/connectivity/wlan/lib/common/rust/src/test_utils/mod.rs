// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Byte-level builders for frames and elements used by tests of this crate and of the MLME.

pub mod fake_frames;
