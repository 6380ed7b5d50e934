//! In-memory stand-in for the Drive API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use async_trait::async_trait;
use drive_fetch::client::{ContentReader, DriveApi};
use drive_fetch::{DriveError, FileRecord, Result};
use tokio::io::{AsyncRead, ReadBuf};

/// Returns every stored record for any query, the way a broad server-side
/// filter would, and records the queries it was asked.
#[derive(Default)]
pub struct FakeDrive {
    pub listing: Vec<FileRecord>,
    pub records: HashMap<String, FileRecord>,
    pub contents: HashMap<String, Vec<u8>>,
    pub broken_streams: Vec<String>,
    pub fail_with: Option<u16>,
    pub queries: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<String>>,
}

impl FakeDrive {
    pub fn with_listing(names: &[&str]) -> Self {
        let listing = names
            .iter()
            .enumerate()
            .map(|(i, name)| FileRecord::new(format!("id{}", i), *name).with_parent("F1"))
            .collect();
        Self {
            listing,
            ..Self::default()
        }
    }

    pub fn with_content(mut self, id: &str, content: &[u8]) -> Self {
        self.contents.insert(id.to_string(), content.to_vec());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    fn failure(&self) -> Option<DriveError> {
        self.fail_with.map(|status| DriveError::ApiError {
            status,
            message: "backend unavailable".to_string(),
        })
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn list_files(&self, query: &str) -> Result<Vec<FileRecord>> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.failure() {
            Some(err) => Err(err),
            None => Ok(self.listing.clone()),
        }
    }

    async fn get_file(&self, file_id: &str) -> Result<FileRecord> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.records
            .get(file_id)
            .cloned()
            .ok_or_else(|| DriveError::FileNotFound(file_id.to_string()))
    }

    async fn open_content(&self, file_id: &str) -> Result<ContentReader> {
        self.opened.lock().unwrap().push(file_id.to_string());
        if self.broken_streams.iter().any(|id| id == file_id) {
            return Ok(Box::new(BrokenReader));
        }
        match self.contents.get(file_id) {
            Some(bytes) => Ok(Box::new(io::Cursor::new(bytes.clone()))),
            None => Err(DriveError::FileNotFound(file_id.to_string())),
        }
    }
}

/// A content stream that fails on first read.
pub struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset",
        )))
    }
}
