//! The one-out-of-many proof. A prover who knows the index `l` and the
//! blinding `r` of a commitment to zero within a set of commitments convinces
//! a verifier of this, without revealing `l` or `r`.
//!
//! The index is written as `m` digits in base `n` and committed as a one-hot
//! matrix, proven well formed with an [`R1Proof`]. The R1 responses `f` then
//! select, for every set member `i`, a degree `m` polynomial in the challenge
//! whose leading coefficient is one for `i = l` and zero otherwise. The lower
//! coefficients are cancelled by the masking commitments `G_k`.
#![allow(non_snake_case)]
use super::r1::{R1Proof, R1Prover, R1Verifier};
use super::ProofGens;
use crate::errors::{ProofError, ProofResult};
use crate::primitives::{
    commit, convert_to_nal, convert_to_sigma, multi_exponents, new_factor, random_exponent,
    scalar_exp,
};
use crate::transcript::TranscriptProtocol;
use alloc::vec::Vec;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, IsIdentity};
use merlin::Transcript;
use polynomials::Polynomial;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, instrument};
use zeroize::Zeroizing;

const LOG_TARGET: &str = "one_out_of_many::sigma";

/// A zero knowledge proof of membership in a set. A prover can convince a
/// verifier that they know the index of a commitment to zero within a set of
/// commitments, and its blinding factor, without revealing any information
/// about the commitment or its location within the set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SigmaProof {
    pub(crate) n: usize,
    pub(crate) m: usize,
    pub(crate) B: RistrettoPoint,
    pub(crate) r1_proof: R1Proof,
    pub(crate) G_k: Vec<RistrettoPoint>,
    pub(crate) z: Scalar,
}

impl SigmaProof {
    /// The base of the index decomposition this proof was computed for.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The number of index digits this proof was computed for.
    pub fn m(&self) -> usize {
        self.m
    }

    pub fn B(&self) -> &RistrettoPoint {
        &self.B
    }

    pub fn r1_proof(&self) -> &R1Proof {
        &self.r1_proof
    }

    pub fn G_k(&self) -> &[RistrettoPoint] {
        &self.G_k
    }

    pub fn z(&self) -> &Scalar {
        &self.z
    }
}

pub struct SigmaProver<'g> {
    gens: &'g ProofGens,
}

impl<'g> SigmaProver<'g> {
    pub fn new(gens: &'g ProofGens) -> SigmaProver<'g> {
        SigmaProver { gens }
    }

    /// Prove knowledge of `r` such that `commits[l]` is a commitment to zero
    /// blinded by `r`. The set may hold anywhere from 1 to `n^m` members; a
    /// shorter set is padded with copies of its last member.
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(n = self.gens.n, m = self.gens.m, set_size = commits.len()))]
    pub fn prove(
        &self,
        transcript: &mut Transcript,
        commits: &[RistrettoPoint],
        l: usize,
        r: &Scalar,
    ) -> ProofResult<SigmaProof> {
        let set_size = commits.len();
        let gens = self.gens;
        let (n, m) = (gens.n, gens.m);
        let commits = &padded_set(gens, commits)?;
        if l >= set_size {
            return Err(ProofError::IndexOutOfBounds);
        }

        transcript.one_of_many_proof_domain_sep(n as u64, m as u64);

        // Create a `TranscriptRng` from the high-level witness data
        //
        // The prover wants to rekey the RNG with its witness data (`l` and `r`).
        let mut rng = {
            let mut builder = transcript.build_rng();

            // Commit to witness data
            builder = builder.rekey_with_witness_bytes(b"l", Scalar::from(l as u64).as_bytes());
            builder = builder.rekey_with_witness_bytes(b"r", r.as_bytes());

            use rand::thread_rng;
            builder.finalize(&mut thread_rng())
        };

        let sigma = Zeroizing::new(convert_to_sigma(l, n, m));
        let r_B = random_exponent(&mut rng);
        let rho_k = Zeroizing::new(
            (0..m)
                .map(|_| random_exponent(&mut rng))
                .collect::<Vec<Scalar>>(),
        );

        let r1_prover = R1Prover::new(gens, sigma.to_vec(), r_B)?;
        let B = *r1_prover.commitment();
        let r1_commitments = r1_prover.commit_masks(&mut rng)?;
        let a = r1_commitments.masks();

        let p_i_k = debug_span!(target: LOG_TARGET, "index_polynomials").in_scope(|| {
            (0..commits.len())
                .map(|i| Zeroizing::new(index_polynomial(i, &sigma, a, n, m)))
                .collect::<Vec<_>>()
        });

        let mut G_k = Vec::with_capacity(m);
        for k in 0..m {
            let p_k = p_i_k.iter().map(|p_i| p_i[k]).collect::<Vec<Scalar>>();
            G_k.push(
                multi_exponents(commits, &p_k)?
                    + commit(gens.g(), &Scalar::zero(), &gens.h()[0], &rho_k[k]),
            );
        }
        debug!(target: LOG_TARGET, "committed to G_k");

        let x = transcript.challenge_over(&challenge_points(
            r1_commitments.A(),
            &B,
            r1_commitments.C(),
            r1_commitments.D(),
            &G_k,
        ));

        let r1_proof = r1_prover.generate_final_response(&r1_commitments, &x);
        let z = r * scalar_exp(x, m)
            - Polynomial::from(rho_k.to_vec())
                .eval(x)
                .unwrap_or_else(Scalar::zero);
        append_response(transcript, &r1_proof, &z);

        Ok(SigmaProof {
            n,
            m,
            B,
            r1_proof,
            G_k,
            z,
        })
    }
}

pub struct SigmaVerifier<'g> {
    gens: &'g ProofGens,
}

impl<'g> SigmaVerifier<'g> {
    pub fn new(gens: &'g ProofGens) -> SigmaVerifier<'g> {
        SigmaVerifier { gens }
    }

    /// Verify a proof that some member of `commits` is a commitment to zero
    /// known to the prover. `transcript` must be in the same state the
    /// prover's transcript was in.
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(n = self.gens.n, m = self.gens.m, set_size = commits.len()))]
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        commits: &[RistrettoPoint],
        proof: &SigmaProof,
    ) -> ProofResult<()> {
        let gens = self.gens;
        let (n, m) = (gens.n, gens.m);
        let commits = &padded_set(gens, commits)?;

        // Verify proof size
        if proof.n != n || proof.m != m || proof.G_k.len() != m {
            return Err(ProofError::InvalidProofSize);
        }
        if !proof.z.is_canonical() {
            return Err(ProofError::InvalidScalar(proof.z));
        }

        let r1_verifier = R1Verifier::new(gens, proof.B);
        r1_verifier.verify_structure(&proof.r1_proof)?;
        if proof.B.is_identity() || proof.G_k.iter().any(|G| G.is_identity()) {
            debug!(target: LOG_TARGET, "identity commitment");
            return Err(ProofError::VerificationError);
        }
        if proof.z == Scalar::zero() {
            debug!(target: LOG_TARGET, "zero response");
            return Err(ProofError::VerificationError);
        }

        transcript.one_of_many_proof_domain_sep(n as u64, m as u64);
        let r1 = &proof.r1_proof;
        let x = transcript.challenge_over(&challenge_points(
            &r1.A, &proof.B, &r1.C, &r1.D, &proof.G_k,
        ));
        append_response(transcript, r1, &proof.z);

        let f = r1_verifier.verify_final_response(r1, &x)?;

        let f_i = debug_span!(target: LOG_TARGET, "set_coefficients").in_scope(|| {
            (0..commits.len())
                .map(|i| {
                    convert_to_nal(i, n, m)
                        .iter()
                        .enumerate()
                        .map(|(j, &i_j)| f[j * n + i_j])
                        .product::<Scalar>()
                })
                .collect::<Vec<Scalar>>()
        });

        let t1 = multi_exponents(commits, &f_i)?;
        let t2 = -Polynomial::from(proof.G_k.clone())
            .eval(x)
            .unwrap_or_else(RistrettoPoint::identity);
        if t1 + t2 != commit(gens.g(), &Scalar::zero(), &gens.h()[0], &proof.z) {
            debug!(target: LOG_TARGET, "membership relation does not hold");
            return Err(ProofError::VerificationFailed);
        }
        Ok(())
    }
}

/// Coefficients, lowest degree first, of the polynomial
/// `prod_j (sigma[j][i_j] * t + a[j][i_j])` over the base `n` digits `i_j`
/// of `i`. The coefficient of `t^m` is one when the digits of `i` match the
/// one-hot rows of `sigma` and zero otherwise.
pub fn index_polynomial(
    i: usize,
    sigma: &[Scalar],
    a: &[Scalar],
    n: usize,
    m: usize,
) -> Vec<Scalar> {
    let I = convert_to_nal(i, n, m);
    let mut coefficients = vec![a[I[0]], sigma[I[0]]];
    for j in 1..m {
        coefficients = new_factor(&sigma[j * n + I[j]], &a[j * n + I[j]], &coefficients);
    }
    coefficients
}

/// Extend `commits` to exactly `n^m` members by repeating its last member.
/// Both the prover and the verifier sum over the padded set.
fn padded_set(gens: &ProofGens, commits: &[RistrettoPoint]) -> ProofResult<Vec<RistrettoPoint>> {
    let N = gens.max_set_size();
    let last = *commits.last().ok_or(ProofError::SetIsTooSmall)?;
    if commits.len() > N {
        return Err(ProofError::SetIsTooLarge);
    }
    let mut set = Vec::with_capacity(N);
    set.extend_from_slice(commits);
    set.resize(N, last);
    Ok(set)
}

// Order of the points hashed into the joint challenge: A, B, C, D, G_0..G_{m-1}
fn challenge_points(
    A: &RistrettoPoint,
    B: &RistrettoPoint,
    C: &RistrettoPoint,
    D: &RistrettoPoint,
    G_k: &[RistrettoPoint],
) -> Vec<RistrettoPoint> {
    let mut points = Vec::with_capacity(4 + G_k.len());
    points.extend_from_slice(&[*A, *B, *C, *D]);
    points.extend_from_slice(G_k);
    points
}

fn append_response(transcript: &mut Transcript, r1_proof: &R1Proof, z: &Scalar) {
    for f in &r1_proof.f {
        transcript.append_scalar(b"f", f);
    }
    transcript.append_scalar(b"z_A", &r1_proof.z_A);
    transcript.append_scalar(b"z_C", &r1_proof.z_C);
    transcript.append_scalar(b"z", z);
}

pub trait OneOfManyProofs {
    //! Trait for computing and verifying one-out-of-many membership proofs
    //! over a set of points. Each method iterates over a set of
    //! [`RistrettoPoint`]s representing pedersen commitments. A prover should
    //! know the index of a commitment to zero in the set, and its blinding
    //! factor.
    //!
    //! ```
    //! # use rand::rngs::OsRng; // You should use a more secure RNG
    //! # use one_out_of_many::proofs::{ProofGens, OneOfManyProofs};
    //! # use curve25519_dalek::scalar::Scalar;
    //! # use curve25519_dalek::ristretto::RistrettoPoint;
    //! # use merlin::Transcript;
    //! #
    //! // Set up proof generators for sets of up to 4^3 = 64 members
    //! let gens = ProofGens::new(4, 3).unwrap();
    //!
    //! // Create the prover's commitment to zero
    //! let l: usize = 3; // The prover's commitment will be third in the set
    //! let r = Scalar::random(&mut OsRng); // You should use a more secure RNG
    //! let C_l = gens.commit(&Scalar::zero(), &r);
    //!
    //! // Build a random set containing the prover's commitment at index `l`
    //! let mut set = (1..gens.max_set_size())
    //!     .map(|_| RistrettoPoint::random(&mut OsRng))
    //!     .collect::<Vec<RistrettoPoint>>();
    //! set.insert(l, C_l);
    //!
    //! // Compute a membership proof for this commitment
    //! let t = Transcript::new(b"OneOfMany-Test");
    //! let proof = set.iter().prove(&gens, &mut t.clone(), l, &r).unwrap();
    //!
    //! // Verify this membership proof, without any knowledge of `l` or `r`.
    //! assert!(set.iter().verify(&gens, &mut t.clone(), &proof).is_ok());
    //! ```

    /// Prove knowledge of a commitment opening to zero. The prover must
    /// provide the index `l` of a commitment within the set that opens to
    /// zero, and also its blinding factor, `r`.
    fn prove(
        &self,
        gens: &ProofGens,
        transcript: &mut Transcript,
        l: usize,
        r: &Scalar,
    ) -> ProofResult<SigmaProof>;

    /// Verify a proof of knowledge of a commitment opening to zero.
    fn verify(
        &self,
        gens: &ProofGens,
        transcript: &mut Transcript,
        proof: &SigmaProof,
    ) -> ProofResult<()>;
}

impl<'a, I> OneOfManyProofs for I
where
    I: Iterator<Item = &'a RistrettoPoint> + Clone,
{
    fn prove(
        &self,
        gens: &ProofGens,
        transcript: &mut Transcript,
        l: usize,
        r: &Scalar,
    ) -> ProofResult<SigmaProof> {
        let commits = self.clone().copied().collect::<Vec<RistrettoPoint>>();
        SigmaProver::new(gens).prove(transcript, &commits, l, r)
    }

    fn verify(
        &self,
        gens: &ProofGens,
        transcript: &mut Transcript,
        proof: &SigmaProof,
    ) -> ProofResult<()> {
        let commits = self.clone().copied().collect::<Vec<RistrettoPoint>>();
        SigmaVerifier::new(gens).verify(transcript, &commits, proof)
    }
}
