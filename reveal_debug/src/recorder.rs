// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records: a one-byte tag followed by
//! the event fields. [`decode`] reads them back as an iterator of
//! [`RecordedEvent`].

use reveal_core::element::ElementId;
use reveal_core::time::{HostTime, Millis};
use reveal_core::trace::{
    BatchEvent, ClassChange, ClassChangedEvent, ReceiverRegisteredEvent, ReceiverScheduledEvent,
    TraceSink, TransitionSignalEvent, TriggerRegisteredEvent, VisibleEvent,
    VisibleScheduledEvent,
};
use reveal_core::transition::TransitionSignal;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TRIGGER_REGISTERED: u8 = 1;
const TAG_RECEIVER_REGISTERED: u8 = 2;
const TAG_BATCH: u8 = 3;
const TAG_VISIBLE_SCHEDULED: u8 = 4;
const TAG_VISIBLE: u8 = 5;
const TAG_RECEIVER_SCHEDULED: u8 = 6;
const TAG_CLASS_CHANGED: u8 = 7;
const TAG_TRANSITION_SIGNAL: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_time(&mut self, t: HostTime) {
        self.write_u64(t.micros());
    }

    fn write_element(&mut self, el: ElementId) {
        self.write_u32(el.index());
    }

    fn write_millis(&mut self, ms: Millis) {
        self.write_u32(ms.get());
    }

    fn write_change(&mut self, c: ClassChange) {
        self.write_u8(match c {
            ClassChange::MarkerAdded => 0,
            ClassChange::VisibleAdded => 1,
            ClassChange::MarkerRemoved => 2,
        });
    }

    fn write_signal(&mut self, s: TransitionSignal) {
        self.write_u8(match s {
            TransitionSignal::Start => 0,
            TransitionSignal::End => 1,
            TransitionSignal::Cancel => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_trigger_registered(&mut self, e: &TriggerRegisteredEvent) {
        self.write_u8(TAG_TRIGGER_REGISTERED);
        self.write_element(e.trigger);
        self.write_millis(e.stagger);
        self.write_u8(u8::from(e.named));
    }

    fn on_receiver_registered(&mut self, e: &ReceiverRegisteredEvent) {
        self.write_u8(TAG_RECEIVER_REGISTERED);
        self.write_element(e.receiver);
        self.write_u8(u8::from(e.named));
        self.write_millis(e.delay);
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        self.write_u8(TAG_BATCH);
        self.write_time(e.at);
        self.write_u32(e.entries);
        self.write_u32(e.qualified);
        self.write_millis(e.cumulative);
    }

    fn on_visible_scheduled(&mut self, e: &VisibleScheduledEvent) {
        self.write_u8(TAG_VISIBLE_SCHEDULED);
        self.write_time(e.at);
        self.write_element(e.trigger);
        self.write_millis(e.delay);
    }

    fn on_visible(&mut self, e: &VisibleEvent) {
        self.write_u8(TAG_VISIBLE);
        self.write_time(e.at);
        self.write_element(e.trigger);
        self.write_u32(e.receivers);
    }

    fn on_receiver_scheduled(&mut self, e: &ReceiverScheduledEvent) {
        self.write_u8(TAG_RECEIVER_SCHEDULED);
        self.write_time(e.at);
        self.write_element(e.trigger);
        self.write_element(e.receiver);
        self.write_millis(e.delay);
    }

    fn on_class_changed(&mut self, e: &ClassChangedEvent) {
        self.write_u8(TAG_CLASS_CHANGED);
        self.write_time(e.at);
        self.write_element(e.element);
        self.write_change(e.change);
    }

    fn on_transition_signal(&mut self, e: &TransitionSignalEvent) {
        self.write_u8(TAG_TRANSITION_SIGNAL);
        self.write_time(e.at);
        self.write_element(e.element);
        self.write_signal(e.signal);
        self.write_u32(e.running);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`TriggerRegisteredEvent`].
    TriggerRegistered(TriggerRegisteredEvent),
    /// A [`ReceiverRegisteredEvent`].
    ReceiverRegistered(ReceiverRegisteredEvent),
    /// A [`BatchEvent`].
    Batch(BatchEvent),
    /// A [`VisibleScheduledEvent`].
    VisibleScheduled(VisibleScheduledEvent),
    /// A [`VisibleEvent`].
    Visible(VisibleEvent),
    /// A [`ReceiverScheduledEvent`].
    ReceiverScheduled(ReceiverScheduledEvent),
    /// A [`ClassChangedEvent`].
    ClassChanged(ClassChangedEvent),
    /// A [`TransitionSignalEvent`].
    TransitionSignal(TransitionSignalEvent),
}

impl RecordedEvent {
    /// Returns the host time of the event, or `None` for registration
    /// events, which are not timestamped.
    #[must_use]
    pub fn at(&self) -> Option<HostTime> {
        match self {
            Self::TriggerRegistered(_) | Self::ReceiverRegistered(_) => None,
            Self::Batch(e) => Some(e.at),
            Self::VisibleScheduled(e) => Some(e.at),
            Self::Visible(e) => Some(e.at),
            Self::ReceiverScheduled(e) => Some(e.at),
            Self::ClassChanged(e) => Some(e.at),
            Self::TransitionSignal(e) => Some(e.at),
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_element(&mut self) -> Option<ElementId> {
        self.read_u32().map(ElementId)
    }

    fn read_millis(&mut self) -> Option<Millis> {
        self.read_u32().map(Millis)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_change(&mut self) -> Option<ClassChange> {
        Some(match self.read_u8()? {
            0 => ClassChange::MarkerAdded,
            1 => ClassChange::VisibleAdded,
            _ => ClassChange::MarkerRemoved,
        })
    }

    fn read_signal(&mut self) -> Option<TransitionSignal> {
        Some(match self.read_u8()? {
            0 => TransitionSignal::Start,
            1 => TransitionSignal::End,
            _ => TransitionSignal::Cancel,
        })
    }

    fn decode_trigger_registered(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TriggerRegistered(TriggerRegisteredEvent {
            trigger: self.read_element()?,
            stagger: self.read_millis()?,
            named: self.read_bool()?,
        }))
    }

    fn decode_receiver_registered(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReceiverRegistered(ReceiverRegisteredEvent {
            receiver: self.read_element()?,
            named: self.read_bool()?,
            delay: self.read_millis()?,
        }))
    }

    fn decode_batch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Batch(BatchEvent {
            at: self.read_time()?,
            entries: self.read_u32()?,
            qualified: self.read_u32()?,
            cumulative: self.read_millis()?,
        }))
    }

    fn decode_visible_scheduled(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::VisibleScheduled(VisibleScheduledEvent {
            at: self.read_time()?,
            trigger: self.read_element()?,
            delay: self.read_millis()?,
        }))
    }

    fn decode_visible(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Visible(VisibleEvent {
            at: self.read_time()?,
            trigger: self.read_element()?,
            receivers: self.read_u32()?,
        }))
    }

    fn decode_receiver_scheduled(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReceiverScheduled(ReceiverScheduledEvent {
            at: self.read_time()?,
            trigger: self.read_element()?,
            receiver: self.read_element()?,
            delay: self.read_millis()?,
        }))
    }

    fn decode_class_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ClassChanged(ClassChangedEvent {
            at: self.read_time()?,
            element: self.read_element()?,
            change: self.read_change()?,
        }))
    }

    fn decode_transition_signal(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionSignal(TransitionSignalEvent {
            at: self.read_time()?,
            element: self.read_element()?,
            signal: self.read_signal()?,
            running: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TRIGGER_REGISTERED => self.decode_trigger_registered(),
            TAG_RECEIVER_REGISTERED => self.decode_receiver_registered(),
            TAG_BATCH => self.decode_batch(),
            TAG_VISIBLE_SCHEDULED => self.decode_visible_scheduled(),
            TAG_VISIBLE => self.decode_visible(),
            TAG_RECEIVER_SCHEDULED => self.decode_receiver_scheduled(),
            TAG_CLASS_CHANGED => self.decode_class_changed(),
            TAG_TRANSITION_SIGNAL => self.decode_transition_signal(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signal() -> TransitionSignalEvent {
        TransitionSignalEvent {
            at: HostTime(2_500),
            element: ElementId(4),
            signal: TransitionSignal::Cancel,
            running: 1,
        }
    }

    #[test]
    fn decodes_a_mixed_recording_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_trigger_registered(&TriggerRegisteredEvent {
            trigger: ElementId(1),
            stagger: Millis(100),
            named: true,
        });
        rec.on_batch(&BatchEvent {
            at: HostTime(1_000),
            entries: 2,
            qualified: 1,
            cumulative: Millis(100),
        });
        rec.on_class_changed(&ClassChangedEvent {
            at: HostTime(2_000),
            element: ElementId(1),
            change: ClassChange::VisibleAdded,
        });
        rec.on_transition_signal(&sample_signal());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordedEvent::TriggerRegistered(e) if e.named));
        assert!(matches!(events[1], RecordedEvent::Batch(e) if e.qualified == 1));
        assert_eq!(events[3], RecordedEvent::TransitionSignal(sample_signal()));
        assert_eq!(events[0].at(), None);
        assert_eq!(events[2].at(), Some(HostTime(2_000)));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_visible(&VisibleEvent {
            at: HostTime(10),
            trigger: ElementId(2),
            receivers: 3,
        });
        rec.on_transition_signal(&sample_signal());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 2]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RecordedEvent::Visible(e) if e.receivers == 3));
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let events: Vec<_> = decode(&[0xff, 1, 2, 3]).collect();
        assert!(events.is_empty());
    }
}
