// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Streaming sign/verify accumulators selected by scheme name.

use crate::crypto::error::CryptoError;
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::crypto::ByteSink;
use ring::rand::SystemRandom;
use ring::signature::{self, Ed25519KeyPair, EcdsaKeyPair};

/// Supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignatureScheme {
    Ed25519,
    EcdsaP256Sha256,
}

impl SignatureScheme {
    pub(crate) fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name {
            "Ed25519" => Ok(Self::Ed25519),
            "ECDSA_P256_SHA256" => Ok(Self::EcdsaP256Sha256),
            other => Err(CryptoError::AlgorithmUnavailable(other.to_string())),
        }
    }
}

/// A single-use signing accumulator.
pub struct SigningContext {
    scheme: SignatureScheme,
    message: Vec<u8>,
}

impl SigningContext {
    /// Create an accumulator for the named scheme.
    ///
    /// Supported names: `"Ed25519"`, `"ECDSA_P256_SHA256"`.
    pub fn new(algorithm: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            scheme: SignatureScheme::from_name(algorithm)?,
            message: Vec::new(),
        })
    }

    /// Absorb a chunk.
    pub fn update(&mut self, bytes: &[u8]) {
        self.message.extend_from_slice(bytes);
    }

    /// Sign the accumulated bytes with `key`.
    pub fn finish(self, key: &PrivateKey) -> Result<Vec<u8>, CryptoError> {
        match self.scheme {
            SignatureScheme::Ed25519 => {
                let pair = Ed25519KeyPair::from_pkcs8(key.der())
                    .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
                Ok(pair.sign(&self.message).as_ref().to_vec())
            }
            SignatureScheme::EcdsaP256Sha256 => {
                let rng = SystemRandom::new();
                let pair = EcdsaKeyPair::from_pkcs8(
                    &signature::ECDSA_P256_SHA256_ASN1_SIGNING,
                    key.der(),
                    &rng,
                )
                .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
                let sig = pair.sign(&rng, &self.message).map_err(|_| {
                    CryptoError::SignatureFailure("ECDSA P-256 signing failed".to_string())
                })?;
                Ok(sig.as_ref().to_vec())
            }
        }
    }
}

impl ByteSink for SigningContext {
    fn update(&mut self, bytes: &[u8]) {
        self.message.extend_from_slice(bytes);
    }
}

/// A single-use verifying accumulator.
///
/// Must absorb exactly the same byte stream as the [`SigningContext`] that
/// produced the signature.
pub struct VerifyContext {
    scheme: SignatureScheme,
    message: Vec<u8>,
}

impl VerifyContext {
    /// Create an accumulator for the named scheme.
    pub fn new(algorithm: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            scheme: SignatureScheme::from_name(algorithm)?,
            message: Vec::new(),
        })
    }

    /// Absorb a chunk.
    pub fn update(&mut self, bytes: &[u8]) {
        self.message.extend_from_slice(bytes);
    }

    /// Verify `signature` over the accumulated bytes. A mismatch (wrong
    /// key, tampered message or signature) is `Ok(false)`.
    pub fn finish(self, signature_bytes: &[u8], key: &PublicKey) -> Result<bool, CryptoError> {
        let alg: &'static dyn signature::VerificationAlgorithm = match self.scheme {
            SignatureScheme::Ed25519 => &signature::ED25519,
            SignatureScheme::EcdsaP256Sha256 => &signature::ECDSA_P256_SHA256_ASN1,
        };
        let public_key = signature::UnparsedPublicKey::new(alg, key.as_bytes());
        Ok(public_key.verify(&self.message, signature_bytes).is_ok())
    }
}

impl ByteSink for VerifyContext {
    fn update(&mut self, bytes: &[u8]) {
        self.message.extend_from_slice(bytes);
    }
}
