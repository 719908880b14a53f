//! Versioned persistence of [`ImfreqOps2d`]
//!
//! The operator is stored field by field so that it can be rebuilt without
//! repeating node selection or factorization. Matrices are flattened in
//! column-major order and complex numbers are written as `[re, im]`.
//!
//! Reading is two-staged: the `format` and `version` header is decoded and
//! checked before any other field is looked at.

use mdarray::DTensor;
use num_complex::Complex64;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::basis2d::BasisFn;
use crate::error::{Dlr2dError, Result};
use crate::freq::FreqPair;
use crate::imfreq::ImfreqOps2d;

/// Conversion between an object and its storage-neutral record
pub trait Persist: Sized {
    type Record: Serialize + DeserializeOwned;

    /// Format tag written into every record
    const FORMAT: &'static str;

    /// Newest record version this library writes and reads
    const VERSION: u32;

    fn to_record(&self) -> Self::Record;

    fn from_record(record: Self::Record) -> Result<Self>;
}

/// Leading fields shared by every record
#[derive(Debug, Deserialize)]
struct RecordHeader {
    format: String,
    version: u32,
}

fn check_header<P: Persist>(header: &RecordHeader) -> Result<()> {
    if header.format != P::FORMAT {
        return Err(Dlr2dError::FormatMismatch {
            expected: P::FORMAT.to_string(),
            found: header.format.clone(),
        });
    }
    if header.version > P::VERSION {
        return Err(Dlr2dError::UnsupportedVersion {
            found: header.version,
            max: P::VERSION,
        });
    }
    Ok(())
}

/// Stored form of [`ImfreqOps2d`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImfreqOps2dRecord {
    pub format: String,
    pub version: u32,
    pub lambda: f64,
    pub eps: f64,
    /// 1D real-frequency nodes
    pub rf: Vec<f64>,
    /// 2D basis functions as `(channel, k, l)`
    pub basis: Vec<BasisFn>,
    /// 2D Matsubara nodes as `[n, m]`
    #[serde(rename = "if")]
    pub ifnodes: Vec<[i64; 2]>,
    pub rank: usize,
    /// `cf2if`, column-major
    pub cf2if: Vec<Complex64>,
    /// Packed LU factors of `cf2if`, column-major
    pub if2cf_lu: Vec<Complex64>,
    /// 1-based LU pivots
    pub if2cf_piv: Vec<i32>,
}

fn flatten_col_major(a: &DTensor<Complex64, 2>) -> Vec<Complex64> {
    let (m, n) = *a.shape();
    let mut out = Vec::with_capacity(m * n);
    for j in 0..n {
        for i in 0..m {
            out.push(a[[i, j]]);
        }
    }
    out
}

fn unflatten_col_major(v: &[Complex64], r: usize, name: &str) -> Result<DTensor<Complex64, 2>> {
    if v.len() != r * r {
        return Err(Dlr2dError::InvalidRecord(format!(
            "{} holds {} entries, expected {}",
            name,
            v.len(),
            r * r
        )));
    }
    Ok(DTensor::<Complex64, 2>::from_fn([r, r], |idx| {
        v[idx[0] + idx[1] * r]
    }))
}

impl Persist for ImfreqOps2d {
    type Record = ImfreqOps2dRecord;

    const FORMAT: &'static str = "dlr2d::imfreq_ops_2d";
    const VERSION: u32 = 1;

    fn to_record(&self) -> ImfreqOps2dRecord {
        ImfreqOps2dRecord {
            format: Self::FORMAT.to_string(),
            version: Self::VERSION,
            lambda: self.lambda(),
            eps: self.eps(),
            rf: self.rfnodes().to_vec(),
            basis: self.basis().to_vec(),
            ifnodes: self.ifnodes().iter().map(|p| [p.n, p.m]).collect(),
            rank: self.rank(),
            cf2if: flatten_col_major(self.cf2if()),
            if2cf_lu: flatten_col_major(self.if2cf_lu()),
            if2cf_piv: self.if2cf_piv().to_vec(),
        }
    }

    fn from_record(record: ImfreqOps2dRecord) -> Result<Self> {
        check_header::<Self>(&RecordHeader {
            format: record.format.clone(),
            version: record.version,
        })?;

        let r = record.rank;
        if record.ifnodes.len() != r {
            return Err(Dlr2dError::InvalidRecord(format!(
                "rank {} but {} nodes",
                r,
                record.ifnodes.len()
            )));
        }
        let cf2if = unflatten_col_major(&record.cf2if, r, "cf2if")?;
        let lu = unflatten_col_major(&record.if2cf_lu, r, "if2cf_lu")?;
        let ifnodes = record
            .ifnodes
            .iter()
            .map(|&[n, m]| FreqPair::new(n, m))
            .collect();

        ImfreqOps2d::from_parts(
            record.lambda,
            record.eps,
            record.rf,
            record.basis,
            ifnodes,
            cf2if,
            lu,
            record.if2cf_piv,
        )
    }
}

/// Serialize `obj` as JSON
pub fn write_json<P: Persist, W: Write>(obj: &P, writer: W) -> Result<()> {
    serde_json::to_writer(writer, &obj.to_record())?;
    Ok(())
}

/// Deserialize an object from JSON, checking the header first
pub fn read_json<P: Persist, R: Read>(reader: R) -> Result<P> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    let header = RecordHeader::deserialize(&value)?;
    check_header::<P>(&header)?;
    let record: P::Record = serde_json::from_value(value)?;
    P::from_record(record)
}

pub fn save_json<P: Persist>(obj: &P, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(obj, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_json<P: Persist>(path: impl AsRef<Path>) -> Result<P> {
    read_json(BufReader::new(File::open(path)?))
}

impl ImfreqOps2d {
    /// Write the operator to a JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json(self, path)
    }

    /// Read an operator from a JSON file without recomputation
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path)
    }
}
