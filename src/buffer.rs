//! Full-size output arrays assembled at the coordinator.
//!
//! Each slot starts empty and is filled exactly once by the chunk that owns
//! it, either from the coordinator's own compute phase or from a gathered
//! worker payload. A second write or a missing write is a protocol violation.

use crate::core::error::{BatchError, Result};
use crate::partition::Chunk;

/// Output array of `len` records indexed by dataset position.
#[derive(Debug, Clone)]
pub struct MergedOutput<O> {
    slots: Vec<Option<O>>,
    written: usize,
}

impl<O> MergedOutput<O> {
    /// Allocate `len` empty slots.
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        MergedOutput { slots, written: 0 }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the array has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// True once every slot holds a record.
    pub fn is_complete(&self) -> bool {
        self.written == self.slots.len()
    }

    /// Write one chunk's records at the chunk's offset.
    ///
    /// `records` must have exactly the chunk's length, the chunk must lie
    /// inside the array, and none of its slots may already be written. On
    /// error nothing is written.
    pub fn write_chunk(&mut self, chunk: Chunk, records: Vec<O>) -> Result<()> {
        if chunk.end() > self.slots.len() {
            return Err(BatchError::internal(format!(
                "chunk {:?} exceeds output length {}",
                chunk.range(),
                self.slots.len()
            )));
        }
        if records.len() != chunk.len() {
            return Err(BatchError::internal(format!(
                "chunk {:?} expects {} records, got {}",
                chunk.range(),
                chunk.len(),
                records.len()
            )));
        }
        if let Some(index) = chunk.range().find(|&i| self.slots[i].is_some()) {
            return Err(BatchError::DuplicateWrite { index });
        }

        for (slot, record) in self.slots[chunk.range()].iter_mut().zip(records) {
            *slot = Some(record);
        }
        self.written += chunk.len();
        Ok(())
    }

    /// Unwrap into a dense vector; fails if any slot was never written.
    pub fn into_complete(self) -> Result<Vec<O>> {
        let missing = self.slots.len() - self.written;
        if missing != 0 {
            return Err(BatchError::IncompleteOutput { missing });
        }
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| BatchError::internal(format!("slot {} unexpectedly empty", index)))
            })
            .collect()
    }
}
