//! The list upload and distribution engine.
//!
//! An upload flows through three stages, each pure with respect to storage:
//!
//! 1. [`parser`] decodes the spreadsheet into ordered raw records
//! 2. [`validator`] enforces the required columns and produces typed leads
//! 3. [`distribution`] partitions the leads across exactly five agents
//!
//! Persistence of the resulting plan is the upload handler's job.

pub mod distribution;
pub mod parser;
pub mod validator;

pub use distribution::{AGENTS_PER_BATCH, Assignment, DistributionPlan, distribute};
pub use parser::{FileKind, RawRecord, parse_file};
pub use validator::{LeadRecord, validate_records};
