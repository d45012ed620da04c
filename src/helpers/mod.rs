//! Low-level readers and writers shared by the spreadsheet formats

pub(crate) mod xml;
pub(crate) mod zip;
