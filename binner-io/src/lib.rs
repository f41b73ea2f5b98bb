//! Utility functions to facilitate I/O operations for the binner crates.
//!
//! A few code fragments that are frequently needed across the workspace's crates are
//! refactored into utility functions and gathered here. While the set of these functions will
//! most likely keep growing, currently the crate allows for:
//!
//! # Opening an input stream, which might be gzip'ed
//!
//! The [open_file()] function opens a file of a given name. If that file name
//! has ``.gz`` suffix, the returned ``BufRead`` is automatically uncompressed:
//!
//! ```
//! use binner_io::open_file;
//! # use std::io;
//! # fn main() -> Result<(), io::Error> {
//! let reader = open_file("tests/test_files/f64.csv")?;
//! let reader_gzipped = open_file("tests/test_files/f64.csv.gz")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Unified opening an output stream.
//!
//! [out_writer()] opens a file for writing. If the given file name is ``"stdout"`` or ``"stderr"``, writes to the appropriate
//! stream rather than to a file:
//!
//! ```
//! use std::fs;
//! use binner_io::out_writer;
//! // This will print on stdout
//! let mut to_stream = out_writer("", true);
//! // This will also print on stdout
//! to_stream = out_writer("stdout", true);
//! // "stdout" file should not exist
//! assert!(fs::metadata("stdout").is_err());
//! // now let's open a regular file for writing
//! let mut to_file = out_writer("file.out", false);
//! assert!(fs::metadata("file.out").is_ok());
//! # fs::remove_file("file.out").expect("Can't remove a test file: file.out");
//! ```
//!
//! # Reading ``.csv`` and ``.tsv`` files
//!
//! These functions lean on the ``csv`` crate to read ``.csv`` and ``.tsv`` files. The extra job
//! that [read_tsv()] and [read_csv()] functions do is automated parsing to a statically defined type, e.g. ``f64``:
//!
//! ```
//! # use std::io;
//! # fn main() -> Result<(), io::Error> {
//! use binner_io::{open_file, read_csv};
//! let reader = open_file("tests/test_files/f64.csv")?;
//! let data_f64: Vec<Vec<f64>> = read_csv(reader)?;
//! # assert_eq!(data_f64.len(), 2);
//! # assert_eq!(data_f64[1].len(), 3);
//! # Ok(())
//! # }
//! ```
//!
#![allow(clippy::needless_return)]
mod utils;
pub use utils::*;

mod errors;
pub use errors::IoError;
