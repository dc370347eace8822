//! # Canonical Wire Encoding
//!
//! Byte fields travel as `0x`-prefixed lowercase hex with exactly two digits
//! per byte. Leading zero bytes are never trimmed: a client rebuilds the
//! exact byte arrays from these strings to assemble a registration
//! transaction, and a shortened field would produce a payload the contract
//! rejects. `V` travels as a plain integer.
//!
//! ```json
//! {
//!   "Registered": false,
//!   "PublicKey": { "Part1": "0x…", "Part2": "0x…" },
//!   "Signature": { "R": "0x…", "S": "0x…", "V": 27 }
//! }
//! ```
//!
//! `PublicKey` and `Signature` are omitted entirely (not `null`) for a
//! registered identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{PartsError, PublicKeyParts, SignatureParts};
use crate::config::HEX_PREFIX;

/// Errors raised while decoding the wire form back into raw parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("hex field is missing the 0x prefix: {0:?}")]
    MissingPrefix(String),

    #[error("hex field has {got} digits, expected exactly {expected}")]
    InvalidLength { expected: usize, got: usize },

    #[error("hex field contains invalid characters: {0}")]
    InvalidHex(String),

    #[error(transparent)]
    Parts(#[from] PartsError),

    /// A registered result must not carry registration data.
    #[error("registered identity carries registration data")]
    UnexpectedRegistrationData,

    /// An unregistered result must carry both parts.
    #[error("unregistered identity is missing {0}")]
    MissingRegistrationData(&'static str),
}

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

/// `0x` + two lowercase hex digits per byte.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(HEX_PREFIX.len() + 2 * bytes.len());
    out.push_str(HEX_PREFIX);
    out.push_str(&hex::encode(bytes));
    out
}

/// Inverse of [`encode_hex`] for a fixed width. Requires the prefix and
/// exactly `2 * N` digits; either case is accepted.
pub fn decode_hex<const N: usize>(s: &str) -> Result<[u8; N], EncodingError> {
    let digits = s
        .strip_prefix(HEX_PREFIX)
        .ok_or_else(|| EncodingError::MissingPrefix(s.to_string()))?;
    if digits.len() != 2 * N {
        return Err(EncodingError::InvalidLength {
            expected: 2 * N,
            got: digits.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| EncodingError::InvalidHex(e.to_string()))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Public key with the 0x04 byte stripped, as two 32-byte hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicKeyPartsDto {
    /// First 32 bytes of the public key.
    pub part1: String,
    /// Last 32 bytes of the public key.
    pub part2: String,
}

impl PublicKeyPartsDto {
    pub fn decode(&self) -> Result<PublicKeyParts, EncodingError> {
        Ok(PublicKeyParts::new(
            decode_hex(&self.part1)?,
            decode_hex(&self.part2)?,
        ))
    }
}

impl From<&PublicKeyParts> for PublicKeyPartsDto {
    fn from(parts: &PublicKeyParts) -> Self {
        Self {
            part1: encode_hex(parts.part1()),
            part2: encode_hex(parts.part2()),
        }
    }
}

/// Decomposed ECDSA signature. V is 27 or 28, as `ecrecover` expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDto {
    #[serde(rename = "R")]
    pub r: String,
    #[serde(rename = "S")]
    pub s: String,
    #[serde(rename = "V")]
    pub v: u8,
}

impl SignatureDto {
    pub fn decode(&self) -> Result<SignatureParts, EncodingError> {
        Ok(SignatureParts::new(
            decode_hex(&self.r)?,
            decode_hex(&self.s)?,
            self.v,
        )?)
    }
}

impl From<&SignatureParts> for SignatureDto {
    fn from(sig: &SignatureParts) -> Self {
        Self {
            r: encode_hex(sig.r()),
            s: encode_hex(sig.s()),
            v: sig.v(),
        }
    }
}

/// The flat wire shape of a registration status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegistrationStatusDto {
    /// True if the identity is registered with the payments contract.
    pub registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKeyPartsDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureDto>,
}

// ---------------------------------------------------------------------------
// RegistrationStatusResult
// ---------------------------------------------------------------------------

/// Outcome of resolving one identity, already in wire encoding.
///
/// Registration data exists only on the `Unregistered` arm, so a registered
/// result with data, or an unregistered one with half the data, cannot be
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RegistrationStatusDto", try_from = "RegistrationStatusDto")]
pub enum RegistrationStatusResult {
    Registered,
    Unregistered {
        public_key: PublicKeyPartsDto,
        signature: SignatureDto,
    },
}

impl RegistrationStatusResult {
    /// Encode raw parts for an unregistered identity.
    pub fn unregistered(public_key: &PublicKeyParts, signature: &SignatureParts) -> Self {
        RegistrationStatusResult::Unregistered {
            public_key: public_key.into(),
            signature: signature.into(),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationStatusResult::Registered)
    }

    /// Decode back into raw parts. `Ok(None)` for a registered identity.
    pub fn decode(&self) -> Result<Option<(PublicKeyParts, SignatureParts)>, EncodingError> {
        match self {
            RegistrationStatusResult::Registered => Ok(None),
            RegistrationStatusResult::Unregistered {
                public_key,
                signature,
            } => Ok(Some((public_key.decode()?, signature.decode()?))),
        }
    }
}

impl From<RegistrationStatusResult> for RegistrationStatusDto {
    fn from(result: RegistrationStatusResult) -> Self {
        match result {
            RegistrationStatusResult::Registered => RegistrationStatusDto {
                registered: true,
                public_key: None,
                signature: None,
            },
            RegistrationStatusResult::Unregistered {
                public_key,
                signature,
            } => RegistrationStatusDto {
                registered: false,
                public_key: Some(public_key),
                signature: Some(signature),
            },
        }
    }
}

impl TryFrom<RegistrationStatusDto> for RegistrationStatusResult {
    type Error = EncodingError;

    fn try_from(dto: RegistrationStatusDto) -> Result<Self, Self::Error> {
        match (dto.registered, dto.public_key, dto.signature) {
            (true, None, None) => Ok(RegistrationStatusResult::Registered),
            (true, _, _) => Err(EncodingError::UnexpectedRegistrationData),
            (false, Some(public_key), Some(signature)) => {
                Ok(RegistrationStatusResult::Unregistered {
                    public_key,
                    signature,
                })
            }
            (false, None, _) => Err(EncodingError::MissingRegistrationData("PublicKey")),
            (false, Some(_), None) => Err(EncodingError::MissingRegistrationData("Signature")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes_are_not_trimmed() {
        assert_eq!(encode_hex(&[0u8; 4]), "0x00000000");
        assert_eq!(encode_hex(&[0x00, 0x01]), "0x0001");
        assert_eq!(encode_hex(&[]), "0x");
    }

    #[test]
    fn encoding_is_lowercase() {
        assert_eq!(encode_hex(&[0xAB, 0xCD]), "0xabcd");
    }

    #[test]
    fn fixed_width_roundtrip_edge_values() {
        for fill in [0x00u8, 0x01, 0x7F, 0x80, 0xFF] {
            let bytes = [fill; 32];
            let encoded = encode_hex(&bytes);
            assert_eq!(encoded.len(), 66);
            assert_eq!(decode_hex::<32>(&encoded).unwrap(), bytes);
        }

        let mut leading_zeros = [0u8; 32];
        leading_zeros[31] = 1;
        assert_eq!(
            decode_hex::<32>(&encode_hex(&leading_zeros)).unwrap(),
            leading_zeros
        );
    }

    #[test]
    fn decode_accepts_uppercase_digits() {
        assert_eq!(decode_hex::<2>("0xABcd").unwrap(), [0xAB, 0xCD]);
    }

    #[test]
    fn decode_rejects_malformed_fields() {
        assert_eq!(
            decode_hex::<2>("abcd"),
            Err(EncodingError::MissingPrefix("abcd".into()))
        );
        assert_eq!(
            decode_hex::<32>("0x01"),
            Err(EncodingError::InvalidLength { expected: 64, got: 2 })
        );
        assert!(matches!(
            decode_hex::<2>("0xzzzz"),
            Err(EncodingError::InvalidHex(_))
        ));
    }

    #[test]
    fn signature_dto_rejects_out_of_domain_v() {
        let dto = SignatureDto {
            r: encode_hex(&[1u8; 32]),
            s: encode_hex(&[2u8; 32]),
            v: 1,
        };
        assert_eq!(
            dto.decode(),
            Err(EncodingError::Parts(PartsError::InvalidRecoveryId(1)))
        );
    }

    #[test]
    fn registered_result_omits_data_fields() {
        let json = serde_json::to_value(RegistrationStatusResult::Registered).unwrap();
        assert_eq!(json, serde_json::json!({ "Registered": true }));
    }

    #[test]
    fn unregistered_result_wire_shape() {
        let pk = PublicKeyParts::new([0u8; 32], [1u8; 32]);
        let sig = SignatureParts::new([0xAA; 32], [0xBB; 32], 27).unwrap();
        let json = serde_json::to_value(RegistrationStatusResult::unregistered(&pk, &sig)).unwrap();

        assert_eq!(json["Registered"], false);
        assert_eq!(json["PublicKey"]["Part1"], format!("0x{}", "00".repeat(32)));
        assert_eq!(json["PublicKey"]["Part2"], format!("0x{}", "01".repeat(32)));
        assert_eq!(json["Signature"]["R"], format!("0x{}", "aa".repeat(32)));
        assert_eq!(json["Signature"]["S"], format!("0x{}", "bb".repeat(32)));
        assert_eq!(json["Signature"]["V"], 27);
    }

    #[test]
    fn result_decodes_to_original_parts() {
        let pk = PublicKeyParts::new([0u8; 32], [0xFF; 32]);
        let sig = SignatureParts::new([0x10; 32], [0x20; 32], 28).unwrap();
        let result = RegistrationStatusResult::unregistered(&pk, &sig);
        assert_eq!(result.decode().unwrap(), Some((pk, sig)));
        assert_eq!(RegistrationStatusResult::Registered.decode().unwrap(), None);
    }

    #[test]
    fn partial_wire_responses_rejected() {
        let only_key = serde_json::json!({
            "Registered": false,
            "PublicKey": { "Part1": "0x00", "Part2": "0x00" }
        });
        let err = serde_json::from_value::<RegistrationStatusResult>(only_key).unwrap_err();
        assert!(err.to_string().contains("Signature"));

        let registered_with_sig = serde_json::json!({
            "Registered": true,
            "Signature": { "R": "0x00", "S": "0x00", "V": 27 }
        });
        assert!(serde_json::from_value::<RegistrationStatusResult>(registered_with_sig).is_err());

        let bare_unregistered = serde_json::json!({ "Registered": false });
        assert!(serde_json::from_value::<RegistrationStatusResult>(bare_unregistered).is_err());
    }

    #[test]
    fn wire_roundtrip_through_json() {
        let pk = PublicKeyParts::new([3u8; 32], [4u8; 32]);
        let sig = SignatureParts::new([5u8; 32], [6u8; 32], 28).unwrap();
        let result = RegistrationStatusResult::unregistered(&pk, &sig);
        let json = serde_json::to_string(&result).unwrap();
        let back: RegistrationStatusResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
