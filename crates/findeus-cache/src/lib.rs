// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, time-expiring cache shared by the query router and the market
//! data source.
//!
//! [`TtlCache`] is an LRU map (the `lru` crate) with an explicit capacity
//! and TTL. Expired entries are dropped on read, on insert, and by
//! [`TtlCache::purge_expired`], which the server runs on an interval. Time
//! comes from a [`Clock`] so tests can step it with [`ManualClock`].

pub mod clock;
pub mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ttl::TtlCache;
