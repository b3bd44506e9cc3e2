//! Defines a `TranscriptProtocol` trait for using a Merlin transcript.
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

use merlin::Transcript;

pub trait TranscriptProtocol {
    /// Append a domain separator for a one-out-of-many proof with base `n`
    /// and `m` digits.
    fn one_of_many_proof_domain_sep(&mut self, n: u64, m: u64);

    /// Append a domain separator for a standalone R1 proof over an `m` by `n`
    /// bit matrix.
    fn r1_proof_domain_sep(&mut self, n: u64, m: u64);

    /// Append a `scalar` with the given `label`.
    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar);

    /// Append a `point` with the given `label`.
    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto);

    /// Compute a `label`ed challenge variable.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;

    /// Append every point of `points`, in order, and derive the challenge
    /// bound to all of them.
    fn challenge_over(&mut self, points: &[RistrettoPoint]) -> Scalar;
}

impl TranscriptProtocol for Transcript {
    fn one_of_many_proof_domain_sep(&mut self, n: u64, m: u64) {
        self.append_message(b"dom-sep", b"oom-proof v2");
        self.append_u64(b"n", n);
        self.append_u64(b"m", m);
    }

    fn r1_proof_domain_sep(&mut self, n: u64, m: u64) {
        self.append_message(b"dom-sep", b"r1-proof v1");
        self.append_u64(b"n", n);
        self.append_u64(b"m", m);
    }

    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, scalar.as_bytes());
    }

    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto) {
        self.append_message(label, point.as_bytes());
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut buf = [0u8; 64];
        self.challenge_bytes(label, &mut buf);

        Scalar::from_bytes_mod_order_wide(&buf)
    }

    fn challenge_over(&mut self, points: &[RistrettoPoint]) -> Scalar {
        self.append_u64(b"len", points.len() as u64);
        for p in points {
            self.append_point(b"P", &p.compress());
        }
        self.challenge_scalar(b"x")
    }
}
