//! Protocol data types: key pairs and proofs.

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::group::{Element, Scalar, Secp256k1};
use crate::Result;

/// Private scalar and the public point derived from it.
///
/// Owned exclusively by the proving party; the server only ever holds the
/// public point. The secret scalar is zeroized when the pair is dropped.
#[derive(Clone, Debug)]
pub struct KeyPair {
    secret: Scalar,
    public: Element,
}

impl KeyPair {
    /// Generates a fresh key pair from a cryptographically secure RNG.
    pub fn generate<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self::from_secret(Secp256k1::random_scalar(rng))
    }

    /// Builds the pair from an existing secret scalar, deriving `P = x*G`.
    pub fn from_secret(secret: Scalar) -> Self {
        let public = Secp256k1::scalar_mul(&Secp256k1::generator(), &secret);
        Self { secret, public }
    }

    /// Returns the public point `P = x*G`.
    pub fn public(&self) -> &Element {
        &self.public
    }

    pub(crate) fn secret(&self) -> &Scalar {
        &self.secret
    }
}

/// Non-interactive proof of knowledge.
///
/// Holds the commitment point `R`, the Fiat-Shamir challenge `c`, and the
/// response scalar `s`. A proof is transient: produced per attempt, bound
/// to exactly one message, never reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    commitment: Element,
    challenge: Scalar,
    response: Scalar,
}

impl Proof {
    /// Assembles a proof from its components.
    pub fn new(commitment: Element, challenge: Scalar, response: Scalar) -> Self {
        Self {
            commitment,
            challenge,
            response,
        }
    }

    /// Returns the commitment point `R = k*G`.
    pub fn commitment(&self) -> &Element {
        &self.commitment
    }

    /// Returns the challenge scalar `c`.
    pub fn challenge(&self) -> &Scalar {
        &self.challenge
    }

    /// Returns the response scalar `s = k + c*x`.
    pub fn response(&self) -> &Scalar {
        &self.response
    }

    /// Encodes the proof as the hex triple that travels on the wire.
    pub fn to_hex(&self) -> ProofHex {
        ProofHex {
            commitment_r: Secp256k1::element_to_hex(&self.commitment),
            challenge: Secp256k1::scalar_to_hex(&self.challenge),
            response: Secp256k1::scalar_to_hex(&self.response),
        }
    }

    /// Decodes a wire proof, validating every component.
    ///
    /// The commitment must decode to a non-identity curve point and both
    /// scalars must be in canonical range.
    pub fn from_hex(wire: &ProofHex) -> Result<Self> {
        Ok(Self {
            commitment: Secp256k1::element_from_hex(&wire.commitment_r)?,
            challenge: Secp256k1::scalar_from_hex(&wire.challenge)?,
            response: Secp256k1::scalar_from_hex(&wire.response)?,
        })
    }
}

/// Wire form of a proof: hex-encoded components under the field names
/// clients send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofHex {
    /// Commitment point `R`, SEC1 compressed hex.
    pub commitment_r: String,
    /// Challenge scalar `c`, big-endian hex.
    pub challenge: String,
    /// Response scalar `s`, big-endian hex.
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecureRng;

    #[test]
    fn keypair_public_matches_secret() {
        let mut rng = SecureRng::new();
        let pair = KeyPair::generate(&mut rng);

        let expected = Secp256k1::scalar_mul(&Secp256k1::generator(), pair.secret());
        assert_eq!(pair.public(), &expected);
    }

    #[test]
    fn proof_hex_roundtrip() {
        let mut rng = SecureRng::new();
        let commitment =
            Secp256k1::scalar_mul(&Secp256k1::generator(), &Secp256k1::random_scalar(&mut rng));
        let proof = Proof::new(
            commitment,
            Secp256k1::random_scalar(&mut rng),
            Secp256k1::random_scalar(&mut rng),
        );

        let wire = proof.to_hex();
        assert_eq!(Proof::from_hex(&wire).unwrap(), proof);
    }

    #[test]
    fn proof_from_hex_rejects_identity_commitment() {
        let mut rng = SecureRng::new();
        let wire = ProofHex {
            commitment_r: Secp256k1::element_to_hex(&Secp256k1::identity()),
            challenge: Secp256k1::scalar_to_hex(&Secp256k1::random_scalar(&mut rng)),
            response: Secp256k1::scalar_to_hex(&Secp256k1::random_scalar(&mut rng)),
        };

        assert!(Proof::from_hex(&wire).is_err());
    }

    #[test]
    fn proof_hex_serde_field_names() {
        let wire = ProofHex {
            commitment_r: "aa".to_string(),
            challenge: "bb".to_string(),
            response: "cc".to_string(),
        };

        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("commitmentR").is_some());
        assert!(json.get("challenge").is_some());
        assert!(json.get("response").is_some());
    }
}
