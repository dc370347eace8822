//! # Identity Module
//!
//! Identities are secp256k1 keypairs addressed by a 20-byte Keccak-derived
//! address, the same scheme EVM accounts use, so the payments contract can
//! check a registration with `ecrecover`.
//!
//! 1. **Address**: the 20-byte [`IdentityAddress`] and its canonical hex form.
//! 2. **Keypair**: key material that signs on behalf of an identity.
//! 3. **Keystore**: the set of identities this process can sign for.

pub mod address;
pub mod keypair;
pub mod keystore;

pub use address::{AddressError, IdentityAddress};
pub use keypair::IdentityKeypair;
pub use keystore::IdentityKeystore;
