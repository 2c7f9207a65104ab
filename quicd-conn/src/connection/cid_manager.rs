//! # Connection ID Management (RFC 9000 Section 5.1)
//!
//! Tracks the connection IDs the peer issued for us to use as destination
//! connection ID, and decides when outgoing packets switch to a new one.
//!
//! ## Lifecycle
//!
//! ```text
//! NEW_CONNECTION_ID ──► pending (sorted by sequence) ──► active ──► retired
//!                             │                                      ▲
//!                             └── over capacity / retire_prior_to ───┘
//! ```
//!
//! Every retirement is reported once to the [`RetirementSink`], which the
//! connection turns into a RETIRE_CONNECTION_ID frame. Retired entries are
//! remembered for a while (`RETIRED_HISTORY_FACTOR` times the queue limit)
//! so that retransmitted NEW_CONNECTION_ID frames for them stay no-ops.
//!
//! ## Rotation
//!
//! The first connection ID is adopted as soon as one is available. After
//! that, rotation waits until more than `packets_per_connection_id` packets
//! went out on the current one, which limits how often observers see the
//! destination connection ID change. The connection ID being replaced is
//! retired.

#![forbid(unsafe_code)]

extern crate alloc;
use crate::config::ConnectionIdConfig;
use crate::error::{Error, Result};
use crate::frames::{NewConnectionIdFrame, RetireConnectionIdFrame};
use crate::types::{ConnectionId, StatelessResetToken};
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

/// Retired entries remembered per allowed active connection ID
pub const RETIRED_HISTORY_FACTOR: usize = 4;

/// Receiver of connection ID retirements.
///
/// Called synchronously, once per retired sequence number, in ascending
/// order within a single [`ConnectionIdManager::add`] call.
pub trait RetirementSink {
    fn retire_connection_id(&mut self, sequence_number: u64);
}

/// Collects RETIRE_CONNECTION_ID frames for the connection to send.
impl RetirementSink for Vec<RetireConnectionIdFrame> {
    fn retire_connection_id(&mut self, sequence_number: u64) {
        self.push(RetireConnectionIdFrame { sequence_number });
    }
}

/// A peer-issued connection ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdEntry {
    pub sequence_number: u64,
    pub connection_id: ConnectionId,
    pub stateless_reset_token: Option<StatelessResetToken>,
}

impl From<&NewConnectionIdFrame> for ConnectionIdEntry {
    fn from(frame: &NewConnectionIdFrame) -> Self {
        Self {
            sequence_number: frame.sequence_number,
            connection_id: frame.connection_id.clone(),
            stateless_reset_token: frame.stateless_reset_token,
        }
    }
}

impl ConnectionIdEntry {
    fn check_duplicate(&self, frame: &NewConnectionIdFrame) -> Result<()> {
        if self.connection_id != frame.connection_id {
            return Err(Error::ConflictingConnectionId(frame.sequence_number));
        }
        if self.stateless_reset_token != frame.stateless_reset_token {
            return Err(Error::ConflictingResetToken(frame.sequence_number));
        }
        Ok(())
    }
}

/// Connection ID Manager
///
/// Manages the peer-issued connection IDs of a single connection:
/// - Queues NEW_CONNECTION_ID entries in ascending sequence order
/// - Bounds the queue at `max_active_connection_ids`
/// - Honors `retire_prior_to`, reporting retirements to the sink
/// - Rotates the active connection ID, gated by packets sent, and retires
///   the one it replaces
///
/// Not synchronized; the owning connection serializes all calls.
#[derive(Debug)]
pub struct ConnectionIdManager<S: RetirementSink> {
    config: ConnectionIdConfig,

    /// Unused connection IDs, strictly ascending by sequence number
    queue: VecDeque<ConnectionIdEntry>,

    /// Connection ID used for outgoing packets (None until first rotation)
    active: Option<ConnectionIdEntry>,

    /// Highest retire_prior_to received so far
    highest_retired: u64,

    /// Recently retired entries by sequence number, oldest dropped first
    retired: BTreeMap<u64, ConnectionIdEntry>,

    packets_since_last_change: u64,

    sink: S,
}

impl<S: RetirementSink> ConnectionIdManager<S> {
    pub fn new(config: ConnectionIdConfig, sink: S) -> Self {
        Self {
            queue: VecDeque::with_capacity(config.max_active_connection_ids + 1),
            config,
            active: None,
            highest_retired: 0,
            retired: BTreeMap::new(),
            packets_since_last_change: 0,
            sink,
        }
    }

    /// Handle a NEW_CONNECTION_ID frame.
    ///
    /// Retransmitted frames are accepted as no-ops, including those for
    /// recently retired connection IDs. A frame that reuses a sequence
    /// number with different contents is a protocol violation.
    pub fn add(&mut self, frame: &NewConnectionIdFrame) -> Result<()> {
        let seq = frame.sequence_number;

        if frame.connection_id.is_empty() && !self.config.accept_zero_length_ids {
            tracing::warn!(sequence_number = seq, "zero-length connection ID rejected");
            return Err(Error::ZeroLengthConnectionId(seq));
        }

        if let Some(existing) = self.lookup(seq) {
            return existing.check_duplicate(frame).map_err(|e| {
                tracing::warn!(sequence_number = seq, error = %e, "NEW_CONNECTION_ID conflict");
                e
            });
        }

        let mut retired = Vec::new();

        if seq < self.highest_retired {
            // Reordered behind a retire_prior_to that already covers it.
            retired.push(ConnectionIdEntry::from(frame));
        } else {
            self.insert_sorted(ConnectionIdEntry::from(frame));

            while self.queue.len() > self.config.max_active_connection_ids {
                if let Some(evicted) = self.queue.pop_front() {
                    tracing::debug!(
                        sequence_number = evicted.sequence_number,
                        limit = self.config.max_active_connection_ids,
                        "connection ID queue full, retiring oldest"
                    );
                    retired.push(evicted);
                }
            }
        }

        if frame.retire_prior_to > self.highest_retired {
            let retire_prior_to = frame.retire_prior_to;
            self.highest_retired = retire_prior_to;

            // The entry introduced by this frame stays, even below the watermark.
            let (stale, kept): (VecDeque<_>, VecDeque<_>) = core::mem::take(&mut self.queue)
                .into_iter()
                .partition(|entry| {
                    entry.sequence_number < retire_prior_to && entry.sequence_number != seq
                });
            self.queue = kept;
            retired.extend(stale);

            if self
                .active
                .as_ref()
                .is_some_and(|active| active.sequence_number < retire_prior_to)
            {
                retired.extend(self.active.take());
            }
        }

        retired.sort_unstable_by_key(|entry| entry.sequence_number);
        retired.dedup_by_key(|entry| entry.sequence_number);
        for entry in retired {
            self.retire(entry);
        }

        Ok(())
    }

    /// Switch to a new connection ID if one is due.
    ///
    /// Returns the new connection ID and its reset token when the active
    /// connection ID changed, `None` otherwise.
    pub fn maybe_get_new_conn_id(
        &mut self,
    ) -> Option<(ConnectionId, Option<StatelessResetToken>)> {
        if self.queue.is_empty() {
            return None;
        }

        if self.active.is_some()
            && self.packets_since_last_change <= self.config.packets_per_connection_id
        {
            return None;
        }

        let next = self.queue.pop_front()?;
        tracing::debug!(
            sequence_number = next.sequence_number,
            packets_sent = self.packets_since_last_change,
            "switching destination connection ID"
        );

        let result = (next.connection_id.clone(), next.stateless_reset_token);
        if let Some(previous) = self.active.replace(next) {
            self.retire(previous);
        }
        self.packets_since_last_change = 0;
        Some(result)
    }

    /// Record a packet sent on the active connection ID.
    #[inline]
    pub fn sent_packet(&mut self) {
        self.packets_since_last_change += 1;
    }

    pub fn active_connection_id(&self) -> Option<&ConnectionId> {
        self.active.as_ref().map(|entry| &entry.connection_id)
    }

    pub fn active_sequence_number(&self) -> Option<u64> {
        self.active.as_ref().map(|entry| entry.sequence_number)
    }

    pub fn active_stateless_reset_token(&self) -> Option<&StatelessResetToken> {
        self.active
            .as_ref()
            .and_then(|entry| entry.stateless_reset_token.as_ref())
    }

    /// Whether `token` belongs to the connection ID currently in use
    ///
    /// **RFC 9000 Section 10.3.1**: a datagram ending in this token is a
    /// stateless reset.
    pub fn is_active_stateless_reset_token(&self, token: &StatelessResetToken) -> bool {
        self.active_stateless_reset_token() == Some(token)
    }

    /// Unused connection IDs, lowest sequence number first
    pub fn pending(&self) -> impl Iterator<Item = &ConnectionIdEntry> {
        self.queue.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Highest retire_prior_to seen from the peer
    pub fn highest_retired(&self) -> u64 {
        self.highest_retired
    }

    /// Whether a retirement for `sequence_number` was reported and is still remembered
    pub fn is_retired(&self, sequence_number: u64) -> bool {
        self.retired.contains_key(&sequence_number)
    }

    pub fn packets_since_last_change(&self) -> u64 {
        self.packets_since_last_change
    }

    pub fn config(&self) -> &ConnectionIdConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn lookup(&self, sequence_number: u64) -> Option<&ConnectionIdEntry> {
        if let Some(active) = &self.active {
            if active.sequence_number == sequence_number {
                return Some(active);
            }
        }
        self.queue
            .binary_search_by_key(&sequence_number, |entry| entry.sequence_number)
            .ok()
            .map(|idx| &self.queue[idx])
            .or_else(|| self.retired.get(&sequence_number))
    }

    /// Report `entry` to the sink and remember it.
    fn retire(&mut self, entry: ConnectionIdEntry) {
        let sequence_number = entry.sequence_number;
        tracing::trace!(sequence_number, "retiring connection ID");
        self.sink.retire_connection_id(sequence_number);
        self.retired.insert(sequence_number, entry);

        let limit = self.config.max_active_connection_ids * RETIRED_HISTORY_FACTOR;
        while self.retired.len() > limit {
            self.retired.pop_first();
        }
    }

    fn insert_sorted(&mut self, entry: ConnectionIdEntry) {
        let idx = self
            .queue
            .partition_point(|queued| queued.sequence_number < entry.sequence_number);
        tracing::trace!(
            sequence_number = entry.sequence_number,
            cid = %entry.connection_id,
            "queued peer connection ID"
        );
        self.queue.insert(idx, entry);
    }
}
