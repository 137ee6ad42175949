//! The set of established streams for one connection.
//!
//! Keyed by `StreamType`, unique keys. The connection layer inserts and
//! removes entries; policies only see a `StreamSetView`, which lends out the
//! streams but cannot change which streams exist.

use std::collections::BTreeMap;

use crate::error::{Result, StrandPolicyError};
use crate::stream::{Stream, StreamType};

/// Streams currently established for one connection.
pub struct StreamSet<S> {
    /// Ordered by stream type so iteration is deterministic.
    streams: BTreeMap<StreamType, S>,
}

impl<S: Stream> StreamSet<S> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            streams: BTreeMap::new(),
        }
    }

    /// Add a stream. Each stream type may appear at most once.
    pub fn insert(&mut self, stream_type: StreamType, stream: S) -> Result<()> {
        if !stream_type.is_specified() {
            return Err(StrandPolicyError::InvalidStreamType(stream_type.to_string()));
        }
        if self.streams.contains_key(&stream_type) {
            return Err(StrandPolicyError::StreamAlreadyExists(stream_type));
        }
        self.streams.insert(stream_type, stream);
        Ok(())
    }

    /// Remove and return a stream.
    pub fn remove(&mut self, stream_type: StreamType) -> Result<S> {
        self.streams
            .remove(&stream_type)
            .ok_or(StrandPolicyError::StreamNotFound(stream_type))
    }

    /// Returns a reference to a stream by type.
    pub fn get(&self, stream_type: StreamType) -> Option<&S> {
        self.streams.get(&stream_type)
    }

    /// Returns a mutable reference to a stream by type.
    pub fn get_mut(&mut self, stream_type: StreamType) -> Option<&mut S> {
        self.streams.get_mut(&stream_type)
    }

    /// Whether a stream of this type is established.
    pub fn contains(&self, stream_type: StreamType) -> bool {
        self.streams.contains_key(&stream_type)
    }

    /// Returns the number of streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether no stream is established.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Stream types present, in ascending order.
    pub fn types(&self) -> Vec<StreamType> {
        self.streams.keys().copied().collect()
    }

    /// Iterate over the streams in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (StreamType, &S)> {
        self.streams.iter().map(|(t, s)| (*t, s))
    }

    /// Mutably iterate over the streams in ascending type order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StreamType, &mut S)> {
        self.streams.iter_mut().map(|(t, s)| (*t, s))
    }

    /// Borrow the streams for a policy call.
    pub fn view_mut(&mut self) -> StreamSetView<'_, S> {
        StreamSetView { set: self }
    }

    /// Drop every stream (connection teardown).
    pub fn clear(&mut self) {
        self.streams.clear();
    }
}

impl<S: Stream> Default for StreamSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to the streams of a set for the duration of one policy call.
///
/// Streams can be driven but never added, removed or cleared.
pub struct StreamSetView<'a, S> {
    set: &'a mut StreamSet<S>,
}

impl<S: Stream> StreamSetView<'_, S> {
    /// Returns a mutable reference to a stream by type.
    pub fn get_mut(&mut self, stream_type: StreamType) -> Option<&mut S> {
        self.set.get_mut(stream_type)
    }

    /// Whether a stream of this type is established.
    pub fn contains(&self, stream_type: StreamType) -> bool {
        self.set.contains(stream_type)
    }

    /// Whether no stream is established.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Mutably iterate over the streams in ascending type order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StreamType, &mut S)> {
        self.set.iter_mut()
    }
}
