//! Canonical binary encoding of scalars, points and proofs.
//!
//! Scalars are their 32 byte canonical encoding and points are 32 byte
//! compressed ristretto encodings; the identity encodes as 32 zero bytes.
//! A [`SigmaProof`] is laid out as
//!
//! ```text
//! n (u32 LE) | m (u32 LE) | B | A | C | D | f[m*(n-1)] | z_A | z_C | G_k[m] | z
//! ```
//!
//! and an [`R1Proof`] as the `A` through `z_C` portion of it.
#![allow(non_snake_case)]
use crate::errors::{ProofError, ProofResult};
use crate::proofs::{check_dimensions, R1Proof, SigmaProof};
use alloc::vec::Vec;
use core::convert::TryFrom;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

pub const SCALAR_SIZE: usize = 32;
pub const POINT_SIZE: usize = 32;

pub fn scalar_to_bytes(s: &Scalar) -> [u8; SCALAR_SIZE] {
    s.to_bytes()
}

/// Decode a scalar, rejecting non-canonical encodings.
pub fn scalar_from_bytes(bytes: &[u8]) -> ProofResult<Scalar> {
    let bytes = <[u8; SCALAR_SIZE]>::try_from(bytes).map_err(|_| ProofError::InvalidEncoding)?;
    Scalar::from_canonical_bytes(bytes).ok_or(ProofError::InvalidEncoding)
}

pub fn point_to_bytes(p: &RistrettoPoint) -> [u8; POINT_SIZE] {
    p.compress().to_bytes()
}

pub fn point_from_bytes(bytes: &[u8]) -> ProofResult<RistrettoPoint> {
    let bytes = <[u8; POINT_SIZE]>::try_from(bytes).map_err(|_| ProofError::InvalidEncoding)?;
    CompressedRistretto(bytes)
        .decompress()
        .ok_or(ProofError::InvalidEncoding)
}

impl R1Proof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 * POINT_SIZE + (self.f.len() + 2) * SCALAR_SIZE);
        self.write_to(&mut out);
        out
    }

    /// Decode an R1 proof for an `m` by `n` bit matrix.
    pub fn from_bytes(bytes: &[u8], n: usize, m: usize) -> ProofResult<R1Proof> {
        let mut reader = Reader::new(bytes);
        let proof = R1Proof::read_from(&mut reader, n, m)?;
        reader.finish()?;
        Ok(proof)
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&point_to_bytes(&self.A));
        out.extend_from_slice(&point_to_bytes(&self.C));
        out.extend_from_slice(&point_to_bytes(&self.D));
        for f in &self.f {
            out.extend_from_slice(&scalar_to_bytes(f));
        }
        out.extend_from_slice(&scalar_to_bytes(&self.z_A));
        out.extend_from_slice(&scalar_to_bytes(&self.z_C));
    }

    fn read_from(reader: &mut Reader, n: usize, m: usize) -> ProofResult<R1Proof> {
        // Dimensions no `ProofGens` could be built for are rejected outright
        check_dimensions(n, m).map_err(|_| ProofError::InvalidParameters)?;
        let A = reader.point()?;
        let C = reader.point()?;
        let D = reader.point()?;
        let f = (0..m * (n - 1))
            .map(|_| reader.scalar())
            .collect::<ProofResult<Vec<Scalar>>>()?;
        let z_A = reader.scalar()?;
        let z_C = reader.scalar()?;
        Ok(R1Proof {
            A,
            C,
            D,
            f,
            z_A,
            z_C,
        })
    }
}

impl SigmaProof {
    /// Encode the proof. Fails with `InvalidParameters` if `n` or `m` does
    /// not fit the 32 bit header.
    pub fn to_bytes(&self) -> ProofResult<Vec<u8>> {
        let n = u32::try_from(self.n).map_err(|_| ProofError::InvalidParameters)?;
        let m = u32::try_from(self.m).map_err(|_| ProofError::InvalidParameters)?;
        let mut out = Vec::with_capacity(
            8 + (4 + self.G_k.len()) * POINT_SIZE + (self.r1_proof.f.len() + 3) * SCALAR_SIZE,
        );
        out.extend_from_slice(&n.to_le_bytes());
        out.extend_from_slice(&m.to_le_bytes());
        out.extend_from_slice(&point_to_bytes(&self.B));
        self.r1_proof.write_to(&mut out);
        for G in &self.G_k {
            out.extend_from_slice(&point_to_bytes(G));
        }
        out.extend_from_slice(&scalar_to_bytes(&self.z));
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> ProofResult<SigmaProof> {
        let mut reader = Reader::new(bytes);
        let n = reader.u32()? as usize;
        let m = reader.u32()? as usize;
        let B = reader.point()?;
        let r1_proof = R1Proof::read_from(&mut reader, n, m)?;
        let G_k = (0..m)
            .map(|_| reader.point())
            .collect::<ProofResult<Vec<RistrettoPoint>>>()?;
        let z = reader.scalar()?;
        reader.finish()?;
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

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Reader<'a> {
        Reader { bytes }
    }

    fn take(&mut self, len: usize) -> ProofResult<&'a [u8]> {
        if self.bytes.len() < len {
            return Err(ProofError::InvalidEncoding);
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn u32(&mut self) -> ProofResult<u32> {
        let bytes = self.take(4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(buf))
    }

    fn scalar(&mut self) -> ProofResult<Scalar> {
        scalar_from_bytes(self.take(SCALAR_SIZE)?)
    }

    fn point(&mut self) -> ProofResult<RistrettoPoint> {
        point_from_bytes(self.take(POINT_SIZE)?)
    }

    fn finish(self) -> ProofResult<()> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(ProofError::InvalidEncoding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proofs::{OneOfManyProofs, ProofGens, R1Prover, R1Verifier};
    use crate::primitives::convert_to_sigma;
    use curve25519_dalek::constants;
    use merlin::Transcript;
    use rand::rngs::OsRng;

    fn sigma_proof(gens: &ProofGens, l: usize) -> (Vec<RistrettoPoint>, SigmaProof) {
        let r = Scalar::random(&mut OsRng);
        let mut set = (1..gens.max_set_size())
            .map(|_| RistrettoPoint::random(&mut OsRng))
            .collect::<Vec<RistrettoPoint>>();
        set.insert(l, gens.commit(&Scalar::zero(), &r));
        let t = Transcript::new(b"OneOfMany-Test");
        let proof = set.iter().prove(gens, &mut t.clone(), l, &r).unwrap();
        (set, proof)
    }

    #[test]
    fn scalar_encoding() {
        let bytes = scalar_to_bytes(&Scalar::from(10u32));
        assert_eq!(bytes[0], 10);
        assert!(bytes[1..].iter().all(|&b| b == 0));
        assert_eq!(scalar_from_bytes(&bytes).unwrap(), Scalar::from(10u32));

        // Not reduced modulo the group order
        assert_eq!(
            scalar_from_bytes(&[0xff; 32]).unwrap_err(),
            ProofError::InvalidEncoding
        );
        assert_eq!(
            scalar_from_bytes(&bytes[..31]).unwrap_err(),
            ProofError::InvalidEncoding
        );
    }

    #[test]
    fn point_encoding() {
        let g = constants::RISTRETTO_BASEPOINT_POINT;
        assert_eq!(
            point_to_bytes(&g),
            constants::RISTRETTO_BASEPOINT_COMPRESSED.to_bytes()
        );
        assert_eq!(point_from_bytes(&point_to_bytes(&g)).unwrap(), g);

        let identity = RistrettoPoint::default();
        assert_eq!(point_to_bytes(&identity), [0u8; 32]);
        assert_eq!(point_from_bytes(&[0u8; 32]).unwrap(), identity);

        assert_eq!(
            point_from_bytes(&[0xff; 32]).unwrap_err(),
            ProofError::InvalidEncoding
        );
    }

    #[test]
    fn sigma_proof_bytes() {
        let gens = ProofGens::new(4, 3).unwrap();
        let (set, proof) = sigma_proof(&gens, 42);
        let bytes = proof.to_bytes().unwrap();
        // B, A, C, D and three G_k; nine f, z_A, z_C and z
        assert_eq!(bytes.len(), 8 + (4 + 3) * 32 + (9 + 3) * 32);

        let decoded = SigmaProof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, proof);
        assert_eq!(decoded.n(), 4);
        assert_eq!(decoded.m(), 3);
        let t = Transcript::new(b"OneOfMany-Test");
        assert!(set.iter().verify(&gens, &mut t.clone(), &decoded).is_ok());
    }

    #[test]
    fn sigma_proof_bad_bytes() {
        let gens = ProofGens::new(3, 2).unwrap();
        let (_, proof) = sigma_proof(&gens, 1);
        let bytes = proof.to_bytes().unwrap();

        assert_eq!(
            SigmaProof::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err(),
            ProofError::InvalidEncoding
        );

        let mut long = bytes.clone();
        long.push(0);
        assert_eq!(
            SigmaProof::from_bytes(&long).unwrap_err(),
            ProofError::InvalidEncoding
        );

        let mut bad_header = bytes.clone();
        bad_header[0] = 1;
        assert_eq!(
            SigmaProof::from_bytes(&bad_header).unwrap_err(),
            ProofError::InvalidParameters
        );

        // Overwrite `z` with a non-canonical scalar
        let mut bad_scalar = bytes.clone();
        let len = bad_scalar.len();
        for b in &mut bad_scalar[len - 32..] {
            *b = 0xff;
        }
        assert_eq!(
            SigmaProof::from_bytes(&bad_scalar).unwrap_err(),
            ProofError::InvalidEncoding
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn sigma_proof_header_overflow() {
        let gens = ProofGens::new(2, 2).unwrap();
        let (_, proof) = sigma_proof(&gens, 0);

        let mut wide = proof.clone();
        wide.n = u32::MAX as usize + 2;
        assert_eq!(wide.to_bytes().unwrap_err(), ProofError::InvalidParameters);

        let mut deep = proof;
        deep.m = u32::MAX as usize + 1;
        assert_eq!(deep.to_bytes().unwrap_err(), ProofError::InvalidParameters);
    }

    #[test]
    fn r1_proof_bytes() {
        let (n, m) = (5, 2);
        let gens = ProofGens::new(n, m).unwrap();
        let prover =
            R1Prover::new(&gens, convert_to_sigma(13, n, m), Scalar::random(&mut OsRng)).unwrap();
        let t = Transcript::new(b"R1-Test");
        let proof = prover.prove(&mut t.clone()).unwrap();

        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), 3 * 32 + (8 + 2) * 32);
        let decoded = R1Proof::from_bytes(&bytes, n, m).unwrap();
        assert_eq!(decoded, proof);
        assert!(R1Verifier::new(&gens, *prover.commitment())
            .verify(&mut t.clone(), &decoded)
            .is_ok());

        // Decoding for other dimensions consumes the wrong number of responses
        assert!(R1Proof::from_bytes(&bytes, n, m + 1).is_err());
        assert!(R1Proof::from_bytes(&bytes, n - 1, m).is_err());
    }
}
