// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FinDeus service assembly.
//!
//! Wires configuration into provider adapters, the query router, the market
//! quote source and the HTTP gateway. The `findeus` binary is a thin CLI over
//! [`serve::run_serve`].

pub mod app;
pub mod serve;
pub mod shutdown;

pub use app::{build_app, build_providers, App};
