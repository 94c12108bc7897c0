//! secp256k1 group arithmetic.
//!
//! Scalars and points are newtypes over the `k256` arithmetic backend. The
//! stable wire representation is hex: 33-byte SEC1 compressed points and
//! 32-byte big-endian scalars. Every deserialization path validates its
//! input; a point that is off-curve or the identity element never enters
//! the rest of the crate.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, Group as _, PrimeField};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar as K256Scalar};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Result};

/// Number of bytes in a secp256k1 scalar (32 bytes).
pub const SCALAR_BYTES: usize = 32;

/// Number of bytes in a compressed secp256k1 point (1 byte tag + 32 byte x-coordinate).
pub const POINT_BYTES: usize = 33;

/// secp256k1 group operations.
#[derive(Clone, Debug)]
pub struct Secp256k1;

/// Integer in `[0, n)` where `n` is the secp256k1 group order.
///
/// Zeroized when dropped; equality is constant-time.
#[derive(Clone, Debug)]
pub struct Scalar(K256Scalar);

/// Point on the secp256k1 curve, including the distinguished identity.
///
/// Stored in projective coordinates for efficient arithmetic, serialized in
/// SEC1 compressed form.
#[derive(Clone, Debug)]
pub struct Element(ProjectivePoint);

impl Scalar {
    /// Creates a new scalar from a k256 Scalar.
    pub fn new(value: K256Scalar) -> Self {
        Self(value)
    }

    /// Creates a scalar from a small integer. Intended for tests and fixed
    /// protocol constants.
    pub fn from_u64(value: u64) -> Self {
        Self(K256Scalar::from(value))
    }

    /// Returns a reference to the inner k256 Scalar.
    pub fn inner(&self) -> &K256Scalar {
        &self.0
    }
}

impl Element {
    /// Creates a new element from a ProjectivePoint.
    pub fn new(value: ProjectivePoint) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner ProjectivePoint.
    pub fn inner(&self) -> &ProjectivePoint {
        &self.0
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        // K256Scalar does not expose mutable internals, so overwrite with zero
        self.0 = K256Scalar::ZERO;
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_affine().eq(&other.0.to_affine())
    }
}

impl Eq for Element {}

impl Secp256k1 {
    /// Returns the fixed base point `G`.
    pub fn generator() -> Element {
        Element(ProjectivePoint::GENERATOR)
    }

    /// Returns the identity element.
    pub fn identity() -> Element {
        Element(ProjectivePoint::IDENTITY)
    }

    /// Whether the element is the identity.
    pub fn is_identity(element: &Element) -> bool {
        element.0.is_identity().into()
    }

    /// Draws a scalar uniformly from `[1, n)`.
    ///
    /// `Field::random` is uniform over `[0, n)`; zero draws are rejected
    /// because a zero nonce or secret key is never acceptable here.
    pub fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Scalar {
        loop {
            let candidate = K256Scalar::random(&mut *rng);
            if !bool::from(candidate.is_zero()) {
                return Scalar(candidate);
            }
        }
    }

    /// Computes `scalar * element`.
    pub fn scalar_mul(element: &Element, scalar: &Scalar) -> Element {
        Element(element.0 * scalar.0)
    }

    /// Computes `a + b` in the curve group.
    pub fn point_add(a: &Element, b: &Element) -> Element {
        Element(a.0 + b.0)
    }

    /// Computes `a + b (mod n)`.
    pub fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
        Scalar(a.0 + b.0)
    }

    /// Computes `a * b (mod n)`.
    pub fn scalar_mul_scalar(a: &Scalar, b: &Scalar) -> Scalar {
        Scalar(a.0 * b.0)
    }

    /// Whether the scalar is zero.
    pub fn scalar_is_zero(scalar: &Scalar) -> bool {
        scalar.0.is_zero().into()
    }

    /// Decodes a scalar from its canonical 32-byte big-endian form.
    pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar> {
        if bytes.len() != SCALAR_BYTES {
            return Err(Error::InvalidEncoding(format!(
                "Expected {} scalar bytes, got {}",
                SCALAR_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; SCALAR_BYTES];
        arr.copy_from_slice(bytes);

        match Option::<K256Scalar>::from(K256Scalar::from_repr(arr.into())) {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::InvalidEncoding(
                "Scalar is not in canonical range".to_string(),
            )),
        }
    }

    /// Encodes a scalar as 32 big-endian bytes.
    pub fn scalar_to_bytes(scalar: &Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    /// Decodes a point from its SEC1 compressed form.
    ///
    /// Rejects off-curve bytes and the identity element.
    pub fn element_from_bytes(bytes: &[u8]) -> Result<Element> {
        if bytes.len() != POINT_BYTES {
            return Err(Error::InvalidEncoding(format!(
                "Expected {} point bytes, got {}",
                POINT_BYTES,
                bytes.len()
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidEncoding("Failed to parse SEC1 point".to_string()))?;

        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| {
                Error::InvalidEncoding("Bytes are not a valid curve point".to_string())
            })?;

        let point = ProjectivePoint::from(affine);
        if bool::from(point.is_identity()) {
            return Err(Error::InvalidEncoding(
                "Point is the identity element".to_string(),
            ));
        }

        Ok(Element(point))
    }

    /// Encodes a point in SEC1 compressed form (33 bytes).
    pub fn element_to_bytes(element: &Element) -> Vec<u8> {
        element.0.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }

    /// Decodes a scalar from its 64-character hex wire form.
    pub fn scalar_from_hex(hex_str: &str) -> Result<Scalar> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidEncoding(format!("Scalar hex: {e}")))?;
        Self::scalar_from_bytes(&bytes)
    }

    /// Encodes a scalar as 64 hex characters.
    pub fn scalar_to_hex(scalar: &Scalar) -> String {
        hex::encode(Self::scalar_to_bytes(scalar))
    }

    /// Decodes a point from its 66-character hex wire form.
    pub fn element_from_hex(hex_str: &str) -> Result<Element> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidEncoding(format!("Point hex: {e}")))?;
        Self::element_from_bytes(&bytes)
    }

    /// Encodes a point as 66 hex characters.
    pub fn element_to_hex(element: &Element) -> String {
        hex::encode(Self::element_to_bytes(element))
    }

    /// Rejects the identity element.
    ///
    /// Points that arrived through deserialization are already validated;
    /// this guards values constructed in-process before they are used in a
    /// verification equation.
    pub fn validate_element(element: &Element) -> Result<()> {
        if Self::is_identity(element) {
            return Err(Error::InvalidEncoding(
                "Point is the identity element".to_string(),
            ));
        }
        Ok(())
    }
}
