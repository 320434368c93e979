//! Append-only log of raw gateway exchanges.
//!
//! Each send appends at most one error block followed by exactly one
//! response block:
//!
//! ```text
//! ----CURL ERROR----
//! <message>
//!
//! ----Response----
//! <body>
//!
//! ```

use crate::constants::{LOG_ERROR_HEADER, LOG_RESPONSE_HEADER};
use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLog {
    path: PathBuf,
}

impl ResponseLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_error(&self, message: &str) -> Result<()> {
        self.append(&error_block(message))
    }

    pub fn append_response(&self, body: &str) -> Result<()> {
        self.append(&response_block(body))
    }

    // One write per block so concurrent appenders never split a block.
    fn append(&self, block: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(block.as_bytes())?;
        Ok(())
    }
}

pub fn error_block(message: &str) -> String {
    format!("{LOG_ERROR_HEADER}\n{message}\n\n")
}

pub fn response_block(body: &str) -> String {
    format!("{LOG_RESPONSE_HEADER}\n{body}\n\n")
}
