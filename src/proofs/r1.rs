//! The R1 proof: a zero knowledge proof that a committed `m` by `n` matrix
//! holds only zeros and ones, with exactly one 1 in each row.
//!
//! The prover runs in two phases. [`R1Prover::commit_masks`] samples the
//! masks and commits to them, yielding an [`R1Commitments`]. Once a challenge
//! is known, [`R1Prover::generate_final_response`] turns those commitments
//! into an [`R1Proof`]. [`R1Prover::prove`] runs both phases with its own
//! challenge; the one-out-of-many proof instead derives a joint challenge
//! between the two phases.
#![allow(non_snake_case)]
use super::ProofGens;
use crate::errors::{ProofError, ProofResult};
use crate::primitives::random_exponent;
use crate::transcript::TranscriptProtocol;
use alloc::vec::Vec;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use zeroize::{Zeroize, Zeroizing};

const LOG_TARGET: &str = "one_out_of_many::r1";

/// An R1 proof for a bit matrix commitment `B`. Only the columns `1..n` of
/// the response matrix are sent; column 0 is recovered by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct R1Proof {
    pub(crate) A: RistrettoPoint,
    pub(crate) C: RistrettoPoint,
    pub(crate) D: RistrettoPoint,
    pub(crate) f: Vec<Scalar>,
    pub(crate) z_A: Scalar,
    pub(crate) z_C: Scalar,
}

impl R1Proof {
    pub fn A(&self) -> &RistrettoPoint {
        &self.A
    }

    pub fn C(&self) -> &RistrettoPoint {
        &self.C
    }

    pub fn D(&self) -> &RistrettoPoint {
        &self.D
    }

    /// The transmitted responses, row by row, `n - 1` per row.
    pub fn f(&self) -> &[Scalar] {
        &self.f
    }
}

/// Output of the commit phase of an [`R1Prover`]: the commitments `A`, `C`
/// and `D`, plus the secret masks and blindings needed to answer a challenge.
pub struct R1Commitments {
    A: RistrettoPoint,
    C: RistrettoPoint,
    D: RistrettoPoint,
    a: Vec<Scalar>,
    r_A: Scalar,
    r_C: Scalar,
    r_D: Scalar,
}

impl R1Commitments {
    pub fn A(&self) -> &RistrettoPoint {
        &self.A
    }

    pub fn C(&self) -> &RistrettoPoint {
        &self.C
    }

    pub fn D(&self) -> &RistrettoPoint {
        &self.D
    }

    /// The mask matrix `a`, row by row. Each row sums to zero.
    pub fn masks(&self) -> &[Scalar] {
        &self.a
    }
}

impl Drop for R1Commitments {
    fn drop(&mut self) {
        self.a.zeroize();
        self.r_A.zeroize();
        self.r_C.zeroize();
        self.r_D.zeroize();
    }
}

/// Proves an `m` by `n` matrix `b`, committed with blinding `r`, is a one-hot
/// selection in every row.
pub struct R1Prover<'g> {
    gens: &'g ProofGens,
    b: Zeroizing<Vec<Scalar>>,
    r: Zeroizing<Scalar>,
    B: RistrettoPoint,
}

impl<'g> R1Prover<'g> {
    /// Commit to the matrix `b`, given row by row, with blinding factor `r`.
    ///
    /// Only the dimensions of `b` are checked. A matrix that is not one-hot
    /// in every row yields a proof that fails verification.
    pub fn new(gens: &'g ProofGens, b: Vec<Scalar>, r: Scalar) -> ProofResult<R1Prover<'g>> {
        let B = gens.commit_bits(&b, &r)?;
        Ok(R1Prover {
            gens,
            b: Zeroizing::new(b),
            r: Zeroizing::new(r),
            B,
        })
    }

    /// The commitment `B` to the bit matrix.
    pub fn commitment(&self) -> &RistrettoPoint {
        &self.B
    }

    /// Compute a standalone R1 proof, with the challenge drawn from
    /// `transcript` over `[A, B, C, D]`.
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(n = self.gens.n, m = self.gens.m))]
    pub fn prove(&self, transcript: &mut Transcript) -> ProofResult<R1Proof> {
        transcript.r1_proof_domain_sep(self.gens.n as u64, self.gens.m as u64);

        // Create a `TranscriptRng` from the high-level witness data
        //
        // The prover wants to rekey the RNG with its witness data (`b` and `r`).
        let mut rng = {
            let mut builder = transcript.build_rng();

            // Commit to witness data
            for b in self.b.iter() {
                builder = builder.rekey_with_witness_bytes(b"b", b.as_bytes());
            }
            builder = builder.rekey_with_witness_bytes(b"r", self.r.as_bytes());

            use rand::thread_rng;
            builder.finalize(&mut thread_rng())
        };

        let commitments = self.commit_masks(&mut rng)?;
        let x = transcript.challenge_over(&[
            commitments.A,
            self.B,
            commitments.C,
            commitments.D,
        ]);
        let proof = self.generate_final_response(&commitments, &x);
        append_responses(transcript, &proof);
        Ok(proof)
    }

    /// Sample the row masks and commit to `A`, `C` and `D`, deferring the
    /// final response until a challenge is known.
    pub fn commit_masks<R: RngCore + CryptoRng>(&self, rng: &mut R) -> ProofResult<R1Commitments> {
        let (n, m) = (self.gens.n, self.gens.m);

        // Column 0 of each row cancels the rest of the row
        let mut a = vec![Scalar::zero(); n * m];
        for j in 0..m {
            for i in 1..n {
                let a_ji = random_exponent(rng);
                a[j * n + i] = a_ji;
                a[j * n] -= a_ji;
            }
        }

        let r_A = random_exponent(rng);
        let r_C = random_exponent(rng);
        let r_D = random_exponent(rng);

        let A = self.gens.commit_bits(&a, &r_A)?;
        let c = Zeroizing::new(
            a.iter()
                .zip(self.b.iter())
                .map(|(a, b)| a * (Scalar::one() - Scalar::from(2u32) * b))
                .collect::<Vec<Scalar>>(),
        );
        let C = self.gens.commit_bits(&c, &r_C)?;
        let d = Zeroizing::new(a.iter().map(|a| -(a * a)).collect::<Vec<Scalar>>());
        let D = self.gens.commit_bits(&d, &r_D)?;
        debug!(target: LOG_TARGET, "committed to A, C and D");

        Ok(R1Commitments {
            A,
            C,
            D,
            a,
            r_A,
            r_C,
            r_D,
        })
    }

    /// Answer the challenge `x` for previously computed `commitments`.
    pub fn generate_final_response(&self, commitments: &R1Commitments, x: &Scalar) -> R1Proof {
        let (n, m) = (self.gens.n, self.gens.m);
        let a = &commitments.a;

        let mut f = Vec::with_capacity(m * (n - 1));
        for j in 0..m {
            for i in 1..n {
                f.push(self.b[j * n + i] * x + a[j * n + i]);
            }
        }

        R1Proof {
            A: commitments.A,
            C: commitments.C,
            D: commitments.D,
            f,
            z_A: *self.r * x + commitments.r_A,
            z_C: commitments.r_C * x + commitments.r_D,
        }
    }
}

/// Verifies R1 proofs against the bit matrix commitment `B`.
pub struct R1Verifier<'g> {
    gens: &'g ProofGens,
    B: RistrettoPoint,
}

impl<'g> R1Verifier<'g> {
    pub fn new(gens: &'g ProofGens, B: RistrettoPoint) -> R1Verifier<'g> {
        R1Verifier { gens, B }
    }

    /// Verify a standalone R1 proof produced by [`R1Prover::prove`] on an
    /// identical transcript.
    ///
    /// ```
    /// # use one_out_of_many::proofs::{ProofGens, R1Prover, R1Verifier};
    /// # use one_out_of_many::primitives::convert_to_sigma;
    /// # use curve25519_dalek::scalar::Scalar;
    /// # use merlin::Transcript;
    /// # use rand::rngs::OsRng;
    /// let gens = ProofGens::new(4, 2).unwrap();
    ///
    /// // One-hot rows for the digits of 9 in base 4
    /// let b = convert_to_sigma(9, 4, 2);
    /// let prover = R1Prover::new(&gens, b, Scalar::random(&mut OsRng)).unwrap();
    /// let proof = prover.prove(&mut Transcript::new(b"doctest example")).unwrap();
    ///
    /// let verifier = R1Verifier::new(&gens, *prover.commitment());
    /// assert!(verifier
    ///     .verify(&mut Transcript::new(b"doctest example"), &proof)
    ///     .is_ok());
    /// ```
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(n = self.gens.n, m = self.gens.m))]
    pub fn verify(&self, transcript: &mut Transcript, proof: &R1Proof) -> ProofResult<()> {
        self.verify_structure(proof)?;

        transcript.r1_proof_domain_sep(self.gens.n as u64, self.gens.m as u64);
        let x = transcript.challenge_over(&[proof.A, self.B, proof.C, proof.D]);
        append_responses(transcript, proof);

        self.verify_final_response(proof, &x).map(|_| ())
    }

    /// Checks that need no challenge: proof size, canonical scalars, and no
    /// identity points or zero responses.
    pub fn verify_structure(&self, proof: &R1Proof) -> ProofResult<()> {
        let (n, m) = (self.gens.n, self.gens.m);

        // Verify proof size
        if proof.f.len() != m * (n - 1) {
            return Err(ProofError::InvalidProofSize);
        }

        // Verify all scalars are canonical
        for f in &proof.f {
            if !f.is_canonical() {
                return Err(ProofError::InvalidScalar(*f));
            }
        }
        if !proof.z_A.is_canonical() {
            return Err(ProofError::InvalidScalar(proof.z_A));
        }
        if !proof.z_C.is_canonical() {
            return Err(ProofError::InvalidScalar(proof.z_C));
        }

        if proof.A.is_identity()
            || proof.C.is_identity()
            || proof.D.is_identity()
            || self.B.is_identity()
        {
            debug!(target: LOG_TARGET, "identity commitment");
            return Err(ProofError::VerificationError);
        }
        let zero = Scalar::zero();
        if proof.f.iter().any(|f| *f == zero) || proof.z_A == zero || proof.z_C == zero {
            debug!(target: LOG_TARGET, "zero response");
            return Err(ProofError::VerificationError);
        }
        Ok(())
    }

    /// Check the responses against the challenge `x`. On success, returns
    /// the full `m * n` response matrix, column 0 included.
    pub fn verify_final_response(&self, proof: &R1Proof, x: &Scalar) -> ProofResult<Vec<Scalar>> {
        let (n, m) = (self.gens.n, self.gens.m);
        if proof.f.len() != m * (n - 1) {
            return Err(ProofError::InvalidProofSize);
        }
        if proof.f.iter().any(|f| f == x) {
            debug!(target: LOG_TARGET, "response equals challenge");
            return Err(ProofError::VerificationFailed);
        }

        let f = reconstruct_f(&proof.f, x, n, m);

        // Verify relation R1
        if x * self.B + proof.A != self.gens.commit_bits(&f, &proof.z_A)? {
            debug!(target: LOG_TARGET, check = "B", "relation does not hold");
            return Err(ProofError::VerificationFailed);
        }
        let f_prime = f.iter().map(|f| f * (x - f)).collect::<Vec<Scalar>>();
        if x * proof.C + proof.D != self.gens.commit_bits(&f_prime, &proof.z_C)? {
            debug!(target: LOG_TARGET, check = "C", "relation does not hold");
            return Err(ProofError::VerificationFailed);
        }
        Ok(f)
    }
}

/// Inflate the transmitted responses `f` (`n - 1` per row) to the full `m`
/// by `n` matrix, with `f[j][0] = x - (f[j][1] + ... + f[j][n-1])`.
pub fn reconstruct_f(f: &[Scalar], x: &Scalar, n: usize, m: usize) -> Vec<Scalar> {
    debug_assert_eq!(f.len(), m * (n - 1));
    let mut out = Vec::with_capacity(n * m);
    for row in f.chunks(n - 1).take(m) {
        out.push(x - row.iter().sum::<Scalar>());
        out.extend_from_slice(row);
    }
    out
}

fn append_responses(transcript: &mut Transcript, proof: &R1Proof) {
    for f in &proof.f {
        transcript.append_scalar(b"f", f);
    }
    transcript.append_scalar(b"z_A", &proof.z_A);
    transcript.append_scalar(b"z_C", &proof.z_C);
}
