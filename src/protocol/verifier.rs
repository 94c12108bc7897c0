use subtle::ConstantTimeEq;

use super::{challenge, Proof};
use crate::group::{Element, Secp256k1};
use crate::{Error, Result};

/// Verifies a proof of knowledge against a public point and message.
///
/// Accepts iff the proof's challenge equals the recomputed Fiat-Shamir
/// challenge and `s*G == R + c*P`. Pure function with no side effects.
///
/// Both checks are evaluated unconditionally and combined without
/// short-circuiting, so rejection time does not depend on which check
/// failed.
pub fn verify_proof(public: &Element, proof: &Proof, message: &[u8]) -> Result<()> {
    Secp256k1::validate_element(public)?;
    Secp256k1::validate_element(proof.commitment())?;

    let expected = challenge(proof.commitment(), public, message);

    let lhs = Secp256k1::scalar_mul(&Secp256k1::generator(), proof.response());
    let cp = Secp256k1::scalar_mul(public, &expected);
    let rhs = Secp256k1::point_add(proof.commitment(), &cp);

    let challenge_ok: bool = proof.challenge().ct_eq(&expected).into();
    let equation_ok = lhs == rhs;

    if !(challenge_ok & equation_ok) {
        return Err(Error::InvalidProof);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{KeyPair, Prover};
    use crate::SecureRng;

    #[test]
    fn accepts_valid_proof() {
        let mut rng = SecureRng::new();
        let prover = Prover::new(KeyPair::generate(&mut rng));

        let proof = prover.prove(&mut rng, b"login");
        assert!(verify_proof(prover.public(), &proof, b"login").is_ok());
    }

    #[test]
    fn rejects_different_message() {
        let mut rng = SecureRng::new();
        let prover = Prover::new(KeyPair::generate(&mut rng));

        let proof = prover.prove(&mut rng, b"login");
        assert!(matches!(
            verify_proof(prover.public(), &proof, b"logout"),
            Err(Error::InvalidProof)
        ));
    }

    #[test]
    fn rejects_wrong_public_point() {
        let mut rng = SecureRng::new();
        let prover = Prover::new(KeyPair::generate(&mut rng));
        let other = KeyPair::generate(&mut rng);

        let proof = prover.prove(&mut rng, b"login");
        assert!(verify_proof(other.public(), &proof, b"login").is_err());
    }

    #[test]
    fn rejects_tampered_challenge() {
        let mut rng = SecureRng::new();
        let prover = Prover::new(KeyPair::generate(&mut rng));

        let proof = prover.prove(&mut rng, b"login");
        let forged = Proof::new(
            proof.commitment().clone(),
            Secp256k1::random_scalar(&mut rng),
            proof.response().clone(),
        );

        assert!(verify_proof(prover.public(), &forged, b"login").is_err());
    }

    #[test]
    fn rejects_tampered_response() {
        let mut rng = SecureRng::new();
        let prover = Prover::new(KeyPair::generate(&mut rng));

        let proof = prover.prove(&mut rng, b"login");
        let forged = Proof::new(
            proof.commitment().clone(),
            proof.challenge().clone(),
            Secp256k1::random_scalar(&mut rng),
        );

        assert!(verify_proof(prover.public(), &forged, b"login").is_err());
    }

    #[test]
    fn rejects_identity_public_point() {
        let mut rng = SecureRng::new();
        let prover = Prover::new(KeyPair::generate(&mut rng));

        let proof = prover.prove(&mut rng, b"login");
        assert!(matches!(
            verify_proof(&Secp256k1::identity(), &proof, b"login"),
            Err(Error::InvalidEncoding(_))
        ));
    }
}
