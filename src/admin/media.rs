//! Chunked media download
//!
//! Objects are pulled in fixed-size ranged requests and assembled in
//! memory. The total size comes from the first `Content-Range` header; a
//! response without one is taken to be the whole object.

use crate::error::{AdminError, Result};
use crate::gcp::client::ServiceClient;
use crate::gcp::http::RangeResponse;
use async_trait::async_trait;

/// Bytes requested per chunk
pub const CHUNK_SIZE: u64 = 1024 * 1024;

/// Something that can serve inclusive byte ranges of one object
#[async_trait]
pub trait ChunkSource: Send {
    async fn fetch_range(&mut self, start: u64, end: u64) -> Result<RangeResponse>;
}

/// Media of a Cloud Storage object (`alt=media`)
pub struct StorageMedia<'a> {
    client: &'a ServiceClient,
    path: String,
}

impl<'a> StorageMedia<'a> {
    pub fn new(client: &'a ServiceClient, bucket: &str, object: &str) -> Self {
        Self {
            client,
            path: format!(
                "b/{}/o/{}?alt=media",
                urlencoding::encode(bucket),
                urlencoding::encode(object)
            ),
        }
    }
}

#[async_trait]
impl<'a> ChunkSource for StorageMedia<'a> {
    async fn fetch_range(&mut self, start: u64, end: u64) -> Result<RangeResponse> {
        self.client.get_range(&self.path, start, end).await
    }
}

/// Total object size from `bytes <first>-<last>/<total>`; `None` for `*`
fn parse_total_size(content_range: &str) -> Option<u64> {
    content_range
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
}

/// Progress reported after each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub received: u64,
    pub total_size: Option<u64>,
}

/// Drains a [`ChunkSource`] chunk by chunk
pub struct MediaDownload<S> {
    source: S,
    chunk_size: u64,
    progress: u64,
    total_size: Option<u64>,
    done: bool,
}

impl<S: ChunkSource> MediaDownload<S> {
    pub fn new(source: S) -> Self {
        Self::with_chunk_size(source, CHUNK_SIZE)
    }

    pub fn with_chunk_size(source: S, chunk_size: u64) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
            progress: 0,
            total_size: None,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Fetch the next chunk into `buffer`
    pub async fn next_chunk(&mut self, buffer: &mut Vec<u8>) -> Result<DownloadProgress> {
        if !self.done {
            let end = self.progress.saturating_add(self.chunk_size - 1);
            let chunk = self.source.fetch_range(self.progress, end).await?;
            self.absorb(chunk, buffer)?;
        }

        Ok(DownloadProgress {
            received: self.progress,
            total_size: self.total_size,
        })
    }

    fn absorb(&mut self, chunk: RangeResponse, buffer: &mut Vec<u8>) -> Result<()> {
        // 416: nothing at or past this offset
        if chunk.status == 416 {
            self.total_size = Some(self.progress);
            self.done = true;
            return Ok(());
        }

        let received = chunk.body.len() as u64;
        buffer.extend_from_slice(&chunk.body);
        self.progress += received;

        match chunk.content_range.as_deref() {
            Some(range) => {
                if let Some(total) = parse_total_size(range) {
                    self.total_size = Some(total);
                }
            },
            None if self.total_size.is_none() => self.total_size = Some(self.progress),
            None => {},
        }

        match self.total_size {
            Some(total) if self.progress >= total => self.done = true,
            Some(total) if received == 0 => {
                return Err(AdminError::IncompleteDownload {
                    received: self.progress,
                    expected: total,
                });
            },
            Some(_) => {},
            // Unknown length: a short chunk is the last one
            None => self.done = received < self.chunk_size,
        }

        Ok(())
    }

    /// Drain every remaining chunk and return the assembled bytes
    pub async fn download_all(mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut chunks = 0usize;
        while !self.done {
            self.next_chunk(&mut buffer).await?;
            chunks += 1;
        }
        tracing::debug!("Downloaded {} bytes in {} chunk(s)", buffer.len(), chunks);
        Ok(buffer)
    }
}
