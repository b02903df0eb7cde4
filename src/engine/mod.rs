// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period-based financial analytics over an immutable snapshot of records.
//! Everything here is a pure function of its inputs: records flow in from the
//! store once per command, derived views flow out, nothing is mutated and
//! nothing is cached across calls.

pub mod aggregate;
pub mod classify;
pub mod goal;
pub mod installment;
pub mod period;
pub mod recurring;
