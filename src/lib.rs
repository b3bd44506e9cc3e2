//! Zero knowledge membership proofs based on the
//! [One-out-of-Many](https://eprint.iacr.org/2014/764) proof scheme.
//!
//! These membership proofs allow you to prove knowledge of the opening of a
//! pedersen commitment to zero, within a set of pedersen commitments, without
//! revealing anything about the commitment or its position within the set.
//!
//! Proofs are parameterized by a base `n` and a number of digits `m`. The
//! prover's index is written as `m` base-`n` digits, so a proof covers sets of
//! up to `n^m` members, with a proof size logarithmic in the set size.
//!
//! # Examples
//! Prove you know a commitment to zero, `C_l`, within a set of commitments:
//! ```
//! # use rand::rngs::OsRng; // You should use a more secure RNG
//! # use one_out_of_many::proofs::{ProofGens, OneOfManyProofs};
//! # use curve25519_dalek::scalar::Scalar;
//! # use curve25519_dalek::ristretto::RistrettoPoint;
//! # use merlin::Transcript;
//! #
//! // Set up proof generators for sets of up to 2^5 = 32 members
//! let gens = ProofGens::new(2, 5).unwrap();
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
//! // Compute a `OneOfMany` membership proof for this commitment
//! let t = Transcript::new(b"OneOfMany-Test");
//! let proof = set.iter().prove(&gens, &mut t.clone(), l, &r).unwrap();
//!
//! // Verify this membership proof, without any knowledge of `l` or `r`.
//! assert!(set
//!     .iter()
//!     .verify(&gens, &mut t.clone(), &proof)
//!     .is_ok());
//! ```
//!
//! Sets do not need to be full. A set of 1 to `n^m` members is padded to
//! `n^m` members with copies of its last member, by the prover and the
//! verifier alike. Proofs travel as bytes through the [`serialize`] module:
//! ```
//! # use rand::rngs::OsRng;
//! # use one_out_of_many::proofs::{ProofGens, SigmaProof, SigmaProver, SigmaVerifier};
//! # use curve25519_dalek::scalar::Scalar;
//! # use curve25519_dalek::ristretto::RistrettoPoint;
//! # use merlin::Transcript;
//! #
//! let gens = ProofGens::new(4, 2).unwrap();
//! let r = Scalar::random(&mut OsRng);
//! let mut set = (0..10)
//!     .map(|_| RistrettoPoint::random(&mut OsRng))
//!     .collect::<Vec<RistrettoPoint>>();
//! set[7] = gens.commit(&Scalar::zero(), &r);
//!
//! let t = Transcript::new(b"OneOfMany-Test");
//! let proof = SigmaProver::new(&gens)
//!     .prove(&mut t.clone(), &set, 7, &r)
//!     .unwrap();
//! let bytes = proof.to_bytes().unwrap();
//!
//! let decoded = SigmaProof::from_bytes(&bytes).unwrap();
//! assert!(SigmaVerifier::new(&gens)
//!     .verify(&mut t.clone(), &set, &decoded)
//!     .is_ok());
//! ```
//!
//! # Ring Signatures
//! One particularly useful application of membership proofs is ring signatures. This can easily be
//! accomplished by committing to some message before computing or verifying a proof. Consider the
//! below example, signing and verifying a message from an anonymous member of the set:
//! ```
//! # use rand::rngs::OsRng; // You should use a more secure RNG
//! # use one_out_of_many::proofs::{ProofGens, OneOfManyProofs};
//! # use curve25519_dalek::scalar::Scalar;
//! # use curve25519_dalek::ristretto::RistrettoPoint;
//! # use merlin::Transcript;
//! #
//! let gens = ProofGens::new(2, 5).unwrap();
//!
//! let l: usize = 3; // The signer's commitment will be third in the set
//! let r = Scalar::random(&mut OsRng); // You should use a more secure RNG
//! let C_l = gens.commit(&Scalar::zero(), &r);
//!
//! let mut set = (1..gens.max_set_size())
//!     .map(|_| RistrettoPoint::random(&mut OsRng))
//!     .collect::<Vec<RistrettoPoint>>();
//! set.insert(l, C_l);
//!
//! // Commit to a message to be signed, and sign it anonymously
//! let mut t = Transcript::new(b"OneOfMany-Test");
//! t.append_message(b"msg", b"Hello, World!");
//! let proof = set.iter().prove(&gens, &mut t.clone(), l, &r).unwrap();
//!
//! // Verification will fail, because this transcript doesn't commit to the same message
//! let mut t = Transcript::new(b"OneOfMany-Test");
//! assert!(set.iter().verify(&gens, &mut t.clone(), &proof).is_err());
//!
//! // Verification will now succeed, because this transcript commits to the signed message
//! t.append_message(b"msg", b"Hello, World!");
//! assert!(set.iter().verify(&gens, &mut t.clone(), &proof).is_ok());
//! ```
//!
//! # Logging
//! Proving and verifying emit [`tracing`](https://docs.rs/tracing) spans and
//! events at `DEBUG` level under the `one_out_of_many::r1` and
//! `one_out_of_many::sigma` targets. Install any subscriber to see them.
//!
//! # Features
//! * `std` (default): enables `std` support in the dependencies.
//! * `serde` (default): `Serialize`/`Deserialize` for proofs and generators.
//!
//! The crate root is `no_std` with `alloc`, but proving seeds its transcript
//! RNG from `rand::thread_rng`, so building without `std` is not supported.
//!
//! # Perfomance
//! The proof(s) provided by this crate depend heavily on the
//! [curve25519-dalek](https://docs.rs/curve25519-dalek) for elliptic curve operations on the
//! ristretto255 curve group. These operations can be optimized by compiling to use the SIMD
//! backend. To do set this compile option, set the following environment variable:
//! ```bash
//! export RUSTFLAGS="-C target_cpu=native"
//! ```
//!
//! Benchmarks are run using [criterion.rs](https://docs.rs/criterion):
//! ```bash
//! cargo bench
//! ```
//!
//! # References
//! * [One-out-of-Many Proofs: Or How to Leak a Secret and Spend a Coin](https://eprint.iacr.org/2014/764)
//! * [Short Accountable Ring Signatures Based on DDH](https://eprint.iacr.org/2015/643)

#![no_std]

//-----------------------------------------------------------------------------
// External dependencies:
//-----------------------------------------------------------------------------
extern crate curve25519_dalek;
extern crate polynomials;

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

//-----------------------------------------------------------------------------
// Public modules
//-----------------------------------------------------------------------------
pub mod errors;
pub mod primitives;
pub mod proofs;
pub mod serialize;

//-----------------------------------------------------------------------------
// Internal modules
//-----------------------------------------------------------------------------
pub(crate) mod transcript;
