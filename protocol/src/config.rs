//! # Protocol Configuration & Constants
//!
//! Every fixed width and magic value the registration flow depends on lives
//! here. The payments contract consumes these byte layouts verbatim, so a
//! change to any of them is a change to the on-chain interface.

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Version of the registration wire format served by the node.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Identity Layout
// ---------------------------------------------------------------------------

/// Identity addresses are the last 20 bytes of a Keccak-256 digest.
pub const ADDRESS_LENGTH: usize = 20;

/// secp256k1 uncompressed SEC1 encoding: `0x04 || X || Y`.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Leading format byte of an uncompressed SEC1 point. Stripped before the
/// key is split into parts.
pub const UNCOMPRESSED_PUBLIC_KEY_PREFIX: u8 = 0x04;

/// Length of the key body after the format byte is stripped.
pub const PUBLIC_KEY_BODY_LENGTH: usize = 64;

/// Each public key part (X and Y coordinates) is 32 bytes.
pub const PUBLIC_KEY_PART_LENGTH: usize = 32;

/// Secret scalar length for secp256k1 keys.
pub const SECRET_KEY_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Signature Layout
// ---------------------------------------------------------------------------

/// R and S are 256-bit scalars.
pub const SIGNATURE_SCALAR_LENGTH: usize = 32;

/// Offset added to the raw recovery id (0 or 1) to get the V value that
/// `ecrecover` expects.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// V for recovery id 0.
pub const RECOVERY_ID_EVEN: u8 = RECOVERY_ID_OFFSET;

/// V for recovery id 1.
pub const RECOVERY_ID_ODD: u8 = RECOVERY_ID_OFFSET + 1;

/// Prefix mixed into the registration digest so a registration signature can
/// never be replayed as a signature over some other message.
pub const REGISTRATION_MESSAGE_PREFIX: &[u8] = b"Register prefix:";

// ---------------------------------------------------------------------------
// Wire Encoding
// ---------------------------------------------------------------------------

/// Every hex field on the wire carries this prefix.
pub const HEX_PREFIX: &str = "0x";

// ---------------------------------------------------------------------------
// Node Defaults
// ---------------------------------------------------------------------------

/// Default port for the HTTP API.
pub const DEFAULT_RPC_PORT: u16 = 4050;

/// Default port for the Prometheus metrics endpoint.
pub const DEFAULT_METRICS_PORT: u16 = 4051;
