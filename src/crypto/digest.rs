// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Streaming digest accumulator selected by algorithm name.

use crate::crypto::{ByteSink, CryptoError};
use ring::digest::{Algorithm, Context, SHA256, SHA384, SHA512, SHA512_256};

/// A single-use digest accumulator.
pub struct DigestContext {
    ctx: Context,
}

impl DigestContext {
    /// Create an accumulator for the named algorithm.
    ///
    /// Supported names: `"SHA-256"`, `"SHA-384"`, `"SHA-512"`,
    /// `"SHA-512/256"`.
    pub fn new(algorithm: &str) -> Result<Self, CryptoError> {
        let alg: &'static Algorithm = match algorithm {
            "SHA-256" => &SHA256,
            "SHA-384" => &SHA384,
            "SHA-512" => &SHA512,
            "SHA-512/256" => &SHA512_256,
            other => return Err(CryptoError::AlgorithmUnavailable(other.to_string())),
        };
        Ok(Self {
            ctx: Context::new(alg),
        })
    }

    /// Absorb a chunk.
    pub fn update(&mut self, bytes: &[u8]) {
        self.ctx.update(bytes);
    }

    /// Finalize and return the digest bytes.
    pub fn finish(self) -> Vec<u8> {
        self.ctx.finish().as_ref().to_vec()
    }
}

impl ByteSink for DigestContext {
    fn update(&mut self, bytes: &[u8]) {
        self.ctx.update(bytes);
    }
}
