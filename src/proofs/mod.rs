//! Proof generators, and the R1 and one-out-of-many proof protocols.
#![allow(non_snake_case)]
use crate::errors::{ProofError, ProofResult};
use crate::primitives;
use alloc::vec::Vec;
use core::convert::TryFrom;
use curve25519_dalek::constants;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sha3::Sha3_512;

pub mod r1;
pub mod sigma;

pub use r1::{reconstruct_f, R1Commitments, R1Proof, R1Prover, R1Verifier};
pub use sigma::{OneOfManyProofs, SigmaProof, SigmaProver, SigmaVerifier};

/// Largest supported set, `2^32` members.
const MAX_SET_SIZE: u64 = 1 << 32;

/// The public parameters of a proof: the base `n`, the number of digits `m`,
/// the blinding generator `g` and `n * m` vector generators `h`. Proofs over
/// one set of generators only verify against the same generators.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawProofGens"))]
pub struct ProofGens {
    n: usize,
    m: usize,
    g: RistrettoPoint,
    h: Vec<RistrettoPoint>,
}

/// Unchecked wire form of [`ProofGens`]. Decoded generators go through
/// [`ProofGens::from_generators`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawProofGens {
    n: usize,
    m: usize,
    g: RistrettoPoint,
    h: Vec<RistrettoPoint>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProofGens> for ProofGens {
    type Error = ProofError;

    fn try_from(raw: RawProofGens) -> ProofResult<ProofGens> {
        ProofGens::from_generators(raw.g, raw.h, raw.n, raw.m)
    }
}

impl ProofGens {
    /// Create a new instance of [`ProofGens`] supporting sets of up to `n^m`
    /// members.
    ///
    /// ```
    /// # use one_out_of_many::proofs::ProofGens;
    /// // Base 4, 3 digits: sets of up to 64 members
    /// let gens = ProofGens::new(4, 3).unwrap();
    /// assert_eq!(gens.max_set_size(), 64);
    /// ```
    pub fn new(n: usize, m: usize) -> ProofResult<ProofGens> {
        check_dimensions(n, m)?;

        // Compute enough generator points for vector commitments of length
        // n*m: r*G + v[0]*H[0] + ... + v[nm-1]*H[nm-1]
        //
        // G        = Ristretto Base Point
        // H[0]     = hash(G)
        // H[1]     = hash(H[0])
        //  .           .
        // H[nm-1]  = hash(H[nm-2])
        let g = constants::RISTRETTO_BASEPOINT_POINT;
        let mut h = Vec::with_capacity(n * m);
        h.push(RistrettoPoint::hash_from_bytes::<Sha3_512>(
            g.compress().as_bytes(),
        ));
        for i in 1..(n * m) {
            h.push(RistrettoPoint::hash_from_bytes::<Sha3_512>(
                h[i - 1].compress().as_bytes(),
            ));
        }
        Ok(ProofGens { n, m, g, h })
    }

    /// Build [`ProofGens`] from generators chosen by a trusted setup. `h` must
    /// hold exactly `n * m` generators.
    pub fn from_generators(
        g: RistrettoPoint,
        h: Vec<RistrettoPoint>,
        n: usize,
        m: usize,
    ) -> ProofResult<ProofGens> {
        check_dimensions(n, m)?;
        if h.len() != n * m {
            return Err(ProofError::LengthMismatch {
                expected: n * m,
                found: h.len(),
            });
        }
        Ok(ProofGens { n, m, g, h })
    }

    /// Returns the maximum set size, `n^m`, that can be processed in a proof
    /// or verification.
    pub fn max_set_size(&self) -> usize {
        // Bounded by `check_dimensions`
        self.n.pow(self.m as u32)
    }

    /// The base of the index decomposition.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The number of base `n` digits in an index.
    pub fn m(&self) -> usize {
        self.m
    }

    pub fn g(&self) -> &RistrettoPoint {
        &self.g
    }

    pub fn h(&self) -> &[RistrettoPoint] {
        &self.h
    }

    /// Create a pedersen commitment, with value `v` and blinding factor `r`,
    /// as `v*G + r*H[0]`. Members of a proof set opening to zero are
    /// commitments of this form with `v = 0`.
    pub fn commit(&self, v: &Scalar, r: &Scalar) -> RistrettoPoint {
        primitives::commit(&self.g, v, &self.h[0], r)
    }

    /// Commit to a length `n*m` vector, blinded by `r*G`.
    pub fn commit_bits(&self, exp: &[Scalar], r: &Scalar) -> ProofResult<RistrettoPoint> {
        primitives::commit_bits(&self.g, &self.h, exp, r)
    }
}

pub(crate) fn check_dimensions(n: usize, m: usize) -> ProofResult<()> {
    if n < 2 || m < 1 {
        return Err(ProofError::SetIsTooSmall);
    }
    match u32::try_from(m).ok().and_then(|m| n.checked_pow(m)) {
        Some(size) if size as u64 <= MAX_SET_SIZE => Ok(()),
        _ => Err(ProofError::SetIsTooLarge),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::random_group_element;
    use rand::rngs::OsRng;

    #[test]
    fn new_generators() {
        assert!(ProofGens::new(4, 2).is_ok());
        assert!(ProofGens::new(2, 32).is_ok());
        assert_eq!(ProofGens::new(0, 2).unwrap_err(), ProofError::SetIsTooSmall);
        assert_eq!(ProofGens::new(1, 8).unwrap_err(), ProofError::SetIsTooSmall);
        assert_eq!(ProofGens::new(4, 0).unwrap_err(), ProofError::SetIsTooSmall);
        assert_eq!(ProofGens::new(2, 33).unwrap_err(), ProofError::SetIsTooLarge);
        assert_eq!(ProofGens::new(16, 9).unwrap_err(), ProofError::SetIsTooLarge);
        assert_eq!(
            ProofGens::new(4, 0xffffffff).unwrap_err(),
            ProofError::SetIsTooLarge
        );

        let gens = ProofGens::new(4, 3).unwrap();
        assert_eq!(gens.h().len(), 12);
        assert_eq!(gens.g(), &constants::RISTRETTO_BASEPOINT_POINT);
        for (i, h) in gens.h().iter().enumerate() {
            assert_ne!(h, gens.g());
            for other in &gens.h()[i + 1..] {
                assert_ne!(h, other);
            }
        }
    }

    #[test]
    fn generators_are_deterministic() {
        let a = ProofGens::new(3, 3).unwrap();
        let b = ProofGens::new(3, 3).unwrap();
        assert_eq!(a.h(), b.h());
        // A larger configuration extends the same hash chain
        let c = ProofGens::new(3, 4).unwrap();
        assert_eq!(a.h(), &c.h()[..9]);
    }

    #[test]
    fn gens_set_size() {
        assert_eq!(ProofGens::new(2, 7).unwrap().max_set_size(), 128);
        assert_eq!(ProofGens::new(4, 2).unwrap().max_set_size(), 16);
        assert_eq!(ProofGens::new(3, 3).unwrap().max_set_size(), 27);
        assert_eq!(ProofGens::new(16, 8).unwrap().max_set_size(), 4294967296);
    }

    #[test]
    fn from_generators() {
        let g = random_group_element(&mut OsRng).unwrap();
        let h = (0..8)
            .map(|_| random_group_element(&mut OsRng).unwrap())
            .collect::<Vec<RistrettoPoint>>();
        let gens = ProofGens::from_generators(g, h.clone(), 4, 2).unwrap();
        assert_eq!(gens.g(), &g);
        assert_eq!(gens.h(), &h[..]);

        assert_eq!(
            ProofGens::from_generators(g, h[..7].to_vec(), 4, 2).unwrap_err(),
            ProofError::LengthMismatch {
                expected: 8,
                found: 7
            }
        );
        assert_eq!(
            ProofGens::from_generators(g, h, 1, 8).unwrap_err(),
            ProofError::SetIsTooSmall
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_checks_generators() {
        let gens = ProofGens::new(3, 2).unwrap();
        let serialized = serde_cbor::to_vec(&gens).unwrap();
        let decoded: ProofGens = serde_cbor::from_slice(&serialized[..]).unwrap();
        assert_eq!((decoded.n(), decoded.m()), (3, 2));
        assert_eq!(decoded.h(), gens.h());

        // Too few generators for the claimed dimensions
        let short = ProofGens {
            n: 2,
            m: 1,
            g: *gens.g(),
            h: vec![],
        };
        let serialized = serde_cbor::to_vec(&short).unwrap();
        assert!(serde_cbor::from_slice::<ProofGens>(&serialized[..]).is_err());

        // Dimensions no generators could be built for
        let bad_base = ProofGens {
            n: 1,
            m: 2,
            g: *gens.g(),
            h: gens.h()[..2].to_vec(),
        };
        let serialized = serde_cbor::to_vec(&bad_base).unwrap();
        assert!(serde_cbor::from_slice::<ProofGens>(&serialized[..]).is_err());
    }

    #[test]
    fn commit_to_zero_uses_first_generator() {
        let gens = ProofGens::new(4, 2).unwrap();
        let r = Scalar::random(&mut OsRng);
        assert_eq!(gens.commit(&Scalar::zero(), &r), r * gens.h()[0]);
    }
}
