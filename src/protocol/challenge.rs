use k256::elliptic_curve::ops::Reduce;
use k256::{Scalar as K256Scalar, U256};
use sha2::{Digest, Sha256};

use crate::group::{Element, Scalar, Secp256k1};

/// Derives the Fiat-Shamir challenge scalar.
///
/// Hashes `SEC1(R) || SEC1(P) || message` with SHA-256 and reduces the
/// digest modulo the group order. This replaces the interactive challenge
/// and is what makes the proof non-interactive and publicly verifiable.
///
/// The verifier always recomputes this value; a challenge arriving on the
/// wire is never trusted directly.
pub fn challenge(commitment: &Element, public: &Element, message: &[u8]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(Secp256k1::element_to_bytes(commitment));
    hasher.update(Secp256k1::element_to_bytes(public));
    hasher.update(message);
    let digest = hasher.finalize();

    Scalar::new(<K256Scalar as Reduce<U256>>::reduce_bytes(&digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecureRng;

    fn random_point(rng: &mut SecureRng) -> Element {
        Secp256k1::scalar_mul(&Secp256k1::generator(), &Secp256k1::random_scalar(rng))
    }

    #[test]
    fn challenge_is_deterministic() {
        let mut rng = SecureRng::new();
        let r = random_point(&mut rng);
        let p = random_point(&mut rng);

        let c1 = challenge(&r, &p, b"context");
        let c2 = challenge(&r, &p, b"context");
        assert_eq!(c1, c2);
    }

    #[test]
    fn challenge_depends_on_every_input() {
        let mut rng = SecureRng::new();
        let r = random_point(&mut rng);
        let p = random_point(&mut rng);
        let other = random_point(&mut rng);

        let base = challenge(&r, &p, b"context");
        assert_ne!(base, challenge(&other, &p, b"context"));
        assert_ne!(base, challenge(&r, &other, b"context"));
        assert_ne!(base, challenge(&r, &p, b"different"));
    }
}
