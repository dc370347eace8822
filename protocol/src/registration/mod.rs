//! # Registration Module
//!
//! Everything between "here is an identity address" and "here is what a
//! client submits to register it":
//!
//! - **types**: raw fixed-width key and signature parts.
//! - **encoding**: the canonical `0x`-hex wire form and response shape.
//! - **resolver**: the status check / provisioning pipeline and the
//!   collaborator traits it is built on.
//! - **message**: the registration digest and its off-chain verification.
//! - **provider**, **registry**: concrete collaborators for local use.

pub mod encoding;
pub mod error;
pub mod message;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod types;

pub use encoding::{
    decode_hex, encode_hex, EncodingError, PublicKeyPartsDto, RegistrationStatusDto,
    RegistrationStatusResult, SignatureDto,
};
pub use error::ResolveError;
pub use message::{registration_digest, verify_registration, VerificationError};
pub use provider::{KeystoreDataProvider, ProviderError};
pub use registry::InMemoryRegistry;
pub use resolver::{IdentityRegistry, RegistrationDataProvider, RegistrationStatusResolver};
pub use types::{PartsError, PublicKeyParts, RegistrationData, SignatureParts};
