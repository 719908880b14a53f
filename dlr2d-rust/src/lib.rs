//! # dlr2d-rust: two-dimensional discrete Lehmann representation
//!
//! Compact representation of two-frequency objects (three-point correlators,
//! vertex functions) in imaginary frequency. [`ImfreqOps2d`] selects a
//! near-minimal set of Matsubara index pairs `(n, m)` for cutoff Λ and
//! tolerance ε, and converts between values on those nodes and 2D DLR
//! coefficients for batches of arbitrary rank.

pub mod basis2d; // Three-channel 2D basis functions
pub mod batch; // N-D arrays ↔ r × batch matrices
pub mod config;
pub mod dlr; // 1D DLR real-frequency and Matsubara grids
pub mod error;
pub mod freq;
pub mod gemm; // Matrix multiplication utilities (Faer backend)
pub mod imfreq;
pub mod kernel;
pub mod lu;
pub mod nodes; // 2D node selection
pub mod persist;
pub mod qr; // Pivoted Gram-Schmidt
pub mod scalar;
pub mod traits;

// Re-export commonly used types and traits
pub use basis2d::{BasisFn, Channel, build_cf2if};
pub use config::{CandidateGrid, Dlr2dConfig};
pub use dlr::{build_dlr_if, build_dlr_rf, fine_nmax};
pub use error::{Dlr2dError, Result};
pub use freq::{BosonicFreq, FermionicFreq, FreqPair, MAX_PAIR_INDEX, MatsubaraFreq};
pub use imfreq::ImfreqOps2d;
pub use kernel::{LogisticKernel, bosonic_kernel, fermionic_kernel};
pub use lu::LuFactors;
pub use nodes::{NodeSelection, select_nodes};
pub use persist::{ImfreqOps2dRecord, Persist, load_json, read_json, save_json, write_json};
pub use scalar::Dlr2dScalar;
pub use traits::{Bosonic, Fermionic, Statistics, StatisticsType};

// Re-export external dependencies for convenience
pub use mdarray::{DTensor, DynRank, Tensor};
