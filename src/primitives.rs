//! Arithmetic building blocks shared by the R1 and one-out-of-many proofs:
//! pedersen commitments, multi-exponentiation, sampling, the Fiat-Shamir
//! challenge, n-ary index encodings and the linear-factor polynomial
//! recurrence.
use crate::errors::{ProofError, ProofResult};
use crate::transcript::TranscriptProtocol;
use alloc::vec::Vec;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{IsIdentity, MultiscalarMul};
use merlin::Transcript;
use rand::{CryptoRng, RngCore};

/// Label of the transcript used by [`generate_challenge`].
pub const CHALLENGE_LABEL: &[u8] = b"one-out-of-many challenge";

/// Upper bound on rejection sampling rounds in [`random_group_element`].
/// Roughly half of all candidates decode, so this is never reached by an
/// honest RNG.
pub const MAX_SAMPLING_ATTEMPTS: usize = 256;

/// Pedersen commitment `m*g + r*h`.
pub fn commit(g: &RistrettoPoint, m: &Scalar, h: &RistrettoPoint, r: &Scalar) -> RistrettoPoint {
    m * g + r * h
}

/// Inner product of a generator vector with a scalar vector.
pub fn multi_exponents(h: &[RistrettoPoint], exp: &[Scalar]) -> ProofResult<RistrettoPoint> {
    if h.len() != exp.len() {
        return Err(ProofError::LengthMismatch {
            expected: h.len(),
            found: exp.len(),
        });
    }
    Ok(RistrettoPoint::multiscalar_mul(exp, h))
}

/// Vector commitment `r*g + <exp, h>`.
pub fn commit_bits(
    g: &RistrettoPoint,
    h: &[RistrettoPoint],
    exp: &[Scalar],
    r: &Scalar,
) -> ProofResult<RistrettoPoint> {
    Ok(r * g + multi_exponents(h, exp)?)
}

pub fn random_exponent<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// Sample a uniformly random, non-identity group element by drawing candidate
/// encodings until one decodes.
///
/// Every point has exactly one canonical encoding, so accepting the first
/// decodable candidate is uniform. The sign bit and the top bit are cleared
/// up front since no canonical encoding sets them.
pub fn random_group_element<R: RngCore + CryptoRng>(rng: &mut R) -> ProofResult<RistrettoPoint> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        bytes[0] &= 0xfe;
        bytes[31] &= 0x7f;
        if let Some(p) = CompressedRistretto(bytes).decompress() {
            if !p.is_identity() {
                return Ok(p);
            }
        }
    }
    Err(ProofError::SamplingFailed)
}

/// Standalone Fiat-Shamir challenge over an ordered list of group elements,
/// computed on a fresh transcript labelled [`CHALLENGE_LABEL`].
///
/// This is not the challenge a proof uses. Proofs draw theirs from the
/// caller's transcript after a domain separator binding `n` and `m`, so the
/// same points yield a different value there.
pub fn generate_challenge(elements: &[RistrettoPoint]) -> Scalar {
    let mut t = Transcript::new(CHALLENGE_LABEL);
    t.challenge_over(elements)
}

/// Encode `num` as `m` one-hot rows of width `n`, least significant digit
/// first.
pub fn convert_to_sigma(num: usize, n: usize, m: usize) -> Vec<Scalar> {
    let mut out = vec![Scalar::zero(); n * m];
    let mut num = num;
    for j in 0..m {
        out[j * n + num % n] = Scalar::one();
        num /= n;
    }
    out
}

/// The `m` least significant base `n` digits of `num`, least significant
/// first. Digits beyond `m` are dropped; missing digits are zero.
pub fn convert_to_nal(num: usize, n: usize, m: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(m);
    let mut num = num;
    for _ in 0..m {
        out.push(num % n);
        num /= n;
    }
    out
}

/// Multiply the polynomial with `coefficients` (constant term first) by the
/// linear factor `a + x*t`, returning coefficients one degree higher.
///
/// Coefficients are produced from the highest index down, each reading only
/// the input slice.
pub fn new_factor(x: &Scalar, a: &Scalar, coefficients: &[Scalar]) -> Vec<Scalar> {
    let degree = coefficients.len();
    let mut out = vec![Scalar::zero(); degree + 1];
    if degree == 0 {
        return out;
    }
    out[degree] = x * coefficients[degree - 1];
    for k in (1..degree).rev() {
        out[k] = a * coefficients[k] + x * coefficients[k - 1];
    }
    out[0] = a * coefficients[0];
    out
}

pub(crate) fn scalar_exp(base: Scalar, exp: usize) -> Scalar {
    let mut res = Scalar::one();
    for _ in 0..exp {
        res *= base;
    }
    res
}
