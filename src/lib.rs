//! # Data Refinery
//!
//! Load CSV and Excel files, inspect them, clean them, keep the columns you need,
//! chart their numbers and convert them to the other format.
//!
//! ## Features
//!
//! - **Two formats**: CSV text (UTF-8 or with a byte order mark) and Excel `.xlsx`
//!   workbooks are read into the same typed [`Table`]
//! - **Type detection**: every column gets the most specific type that fits all of
//!   its non-missing cells (Boolean, BigInt, Double, Varchar, Timestamp, Date, Time)
//! - **Cleaning**: duplicate rows removal and mean imputation of missing numbers,
//!   both idempotent
//! - **Projection**: keep a subset of columns in any order
//! - **Charts**: bar chart data for the first two numeric columns
//! - **Conversion**: serialize to CSV or a single-sheet `.xlsx` workbook with the
//!   matching download name and MIME type
//! - **Per-file errors**: an unsupported or malformed upload is skipped, the rest
//!   of the session carries on
//!
//! ## Example
//!
//! ```no_run
//! use data_refinery::pipeline::{process_all, SessionOptions};
//! use data_refinery::spreadsheet::Format;
//! use data_refinery::upload::UploadedFile;
//!
//! let files = vec![UploadedFile::open("people.csv")?];
//! let options = SessionOptions {
//!     deduplicate: true,
//!     impute: true,
//!     target: Some(Format::Xlsx),
//!     ..Default::default()
//! };
//! for report in process_all(&files, &options).into_iter().flatten() {
//!     if let Some(export) = report.export {
//!         export.save(".")?;
//!     }
//! }
//! # Ok::<(), data_refinery::error::RefineryError>(())
//! ```

pub mod error;
pub(crate) mod helpers;
pub mod pipeline;
pub mod spreadsheet;
pub mod table;
pub mod upload;

pub use error::RefineryError;
pub use error::Warning;
pub use pipeline::process;
pub use pipeline::process_all;
pub use pipeline::FileReport;
pub use pipeline::SessionOptions;
pub use spreadsheet::Format;
pub use table::Table;
pub use upload::UploadedFile;
