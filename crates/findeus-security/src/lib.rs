// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for FinDeus.
//!
//! Provider errors and upstream response bodies are logged server-side and
//! may echo credentials back. Everything that reaches a log line goes through
//! [`redact`] or a [`RedactingWriter`] first.

pub mod redact;

pub use redact::{redact, RedactingWriter, SecretList};
