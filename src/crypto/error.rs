// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cryptographic error types.

use std::fmt;

/// Cryptography-related errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The named digest or signature algorithm is not supported.
    AlgorithmUnavailable(String),

    /// A key could not be parsed or used with the selected scheme.
    InvalidKey(String),

    /// The signing primitive itself failed.
    SignatureFailure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlgorithmUnavailable(name) => write!(f, "Algorithm unavailable: {}", name),
            Self::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            Self::SignatureFailure(msg) => write!(f, "Signature failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}
