// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque signing keys.
//!
//! Keys are carried as bytes and bound to a scheme only at sign/verify
//! time, so the record algorithms can stay parameterized by algorithm name.
//! Private key material is zeroized on drop.

use crate::crypto::error::CryptoError;
use crate::crypto::sign::SignatureScheme;
use ring::rand::SystemRandom;
use ring::signature::{self, Ed25519KeyPair, EcdsaKeyPair, KeyPair};
use zeroize::Zeroize;

/// An asymmetric private key in PKCS#8 (v1/v2) DER form.
pub struct PrivateKey {
    pkcs8: Vec<u8>,
}

impl PrivateKey {
    /// Wrap an existing PKCS#8 DER document.
    pub fn from_pkcs8(der: &[u8]) -> Self {
        Self {
            pkcs8: der.to_vec(),
        }
    }

    pub(crate) fn der(&self) -> &[u8] {
        &self.pkcs8
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.pkcs8.zeroize();
    }
}

/// An asymmetric public key in the scheme's raw byte encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Wrap existing public key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw public key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Generate a fresh keypair for the named signature scheme.
pub fn generate_keypair(algorithm: &str) -> Result<(PrivateKey, PublicKey), CryptoError> {
    let scheme = SignatureScheme::from_name(algorithm)?;
    let rng = SystemRandom::new();
    match scheme {
        SignatureScheme::Ed25519 => {
            let doc = Ed25519KeyPair::generate_pkcs8(&rng).map_err(|_| {
                CryptoError::SignatureFailure("Ed25519 keypair generation failed".to_string())
            })?;
            let pair = Ed25519KeyPair::from_pkcs8(doc.as_ref())
                .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
            Ok((
                PrivateKey {
                    pkcs8: doc.as_ref().to_vec(),
                },
                PublicKey {
                    bytes: pair.public_key().as_ref().to_vec(),
                },
            ))
        }
        SignatureScheme::EcdsaP256Sha256 => {
            let alg = &signature::ECDSA_P256_SHA256_ASN1_SIGNING;
            let doc = EcdsaKeyPair::generate_pkcs8(alg, &rng).map_err(|_| {
                CryptoError::SignatureFailure("ECDSA P-256 keypair generation failed".to_string())
            })?;
            let pair = EcdsaKeyPair::from_pkcs8(alg, doc.as_ref(), &rng)
                .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
            Ok((
                PrivateKey {
                    pkcs8: doc.as_ref().to_vec(),
                },
                PublicKey {
                    bytes: pair.public_key().as_ref().to_vec(),
                },
            ))
        }
    }
}
