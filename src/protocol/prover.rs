use rand_core::CryptoRngCore;

use super::{challenge, KeyPair, Proof};
use crate::group::{Element, Secp256k1};

/// Prover for the Schnorr proof-of-knowledge protocol.
///
/// Runs on the enrolling or authenticating party, outside the trust
/// boundary. Produces non-interactive proofs that the party knows the
/// secret scalar behind its public point, bound to a specific message.
///
/// # Security
///
/// The per-proof nonce `k` must be fresh and unpredictable on every call:
/// reusing a nonce across two messages under the same key reveals the
/// secret scalar. [`prove`](Prover::prove) draws `k` from the supplied RNG
/// each time; always pass [`SecureRng`](crate::SecureRng) or an equivalent
/// OS-backed generator.
pub struct Prover {
    keypair: KeyPair,
}

impl Prover {
    /// Creates a prover holding the party's key pair.
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// Returns the public point the verifier will check against.
    pub fn public(&self) -> &Element {
        self.keypair.public()
    }

    /// Generates a proof bound to `message`.
    ///
    /// Draws `k` fresh, computes `R = k*G`, `c = H(R, P, message)`, and
    /// `s = k + c*x (mod n)`. The nonce scalar is zeroized when it drops at
    /// the end of this call.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R, message: &[u8]) -> Proof {
        let k = Secp256k1::random_scalar(rng);
        let commitment = Secp256k1::scalar_mul(&Secp256k1::generator(), &k);

        let c = challenge(&commitment, self.keypair.public(), message);
        let cx = Secp256k1::scalar_mul_scalar(&c, self.keypair.secret());
        let s = Secp256k1::scalar_add(&k, &cx);

        Proof::new(commitment, c, s)
    }
}
