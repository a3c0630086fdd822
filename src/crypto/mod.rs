// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cryptographic primitives for record hashing and signing.
//!
//! Thin streaming accumulators over `ring`, selected by algorithm name so
//! the record algorithms stay free of scheme knowledge. Digest, signing,
//! and verifying contexts all consume byte chunks through [`ByteSink`];
//! each context is scoped to a single hash/sign/verify call.
//!
//! # Example
//!
//! ```rust
//! use metarec::crypto::{generate_keypair, SigningContext, VerifyContext};
//!
//! let (private_key, public_key) = generate_keypair("Ed25519").unwrap();
//!
//! let mut signer = SigningContext::new("Ed25519").unwrap();
//! signer.update(b"payload");
//! let signature = signer.finish(&private_key).unwrap();
//!
//! let mut verifier = VerifyContext::new("Ed25519").unwrap();
//! verifier.update(b"payload");
//! assert!(verifier.finish(&signature, &public_key).unwrap());
//! ```

mod digest;
mod error;
mod keys;
mod sign;

pub use digest::DigestContext;
pub use error::CryptoError;
pub use keys::{generate_keypair, PrivateKey, PublicKey};
pub use sign::{SigningContext, VerifyContext};

/// Streaming byte-chunk consumer shared by digest, signing, and verifying
/// accumulators.
pub trait ByteSink {
    fn update(&mut self, bytes: &[u8]);
}
