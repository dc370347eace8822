// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Identity Registration: Core Library
//!
//! Before an identity can take part in the payments network it has to be
//! registered with the payments contract. Registration is self-authorised:
//! the identity signs a digest of its own public key, and anyone holding that
//! signature can submit it. This crate answers the question a client asks
//! first, "is this identity registered, and if not, what do I submit?"
//!
//! ## Architecture
//!
//! - **config**: Protocol constants. Byte widths, prefixes, default ports.
//! - **network**: Network presets (testnet, localnet) and their endpoints.
//! - **crypto**: Keccak-256 and secp256k1 signing/recovery. Don't roll your own.
//! - **identity**: 20-byte identity addresses, keypairs, and the keystore.
//! - **registration**: Key/signature parts, their hex wire encoding, and the
//!   status resolver that ties registry and signer together.
//!
//! ## Design Philosophy
//!
//! 1. The resolver owns no policy. Retries, timeouts and caching belong to
//!    whoever calls it or whoever it calls.
//! 2. Fixed-width bytes are fixed-width types. A 31-byte "part" does not
//!    type-check.
//! 3. Secrets are zeroized when dropped.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod network;
pub mod registration;
