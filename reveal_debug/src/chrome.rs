// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each element gets its own track (`tid` is the element index). The
//! transitioning marker is drawn as a duration slice from `+marker` to
//! `-marker`, and the in-flight transition count as a counter.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use reveal_core::time::HostTime;
use reveal_core::trace::ClassChange;
use reveal_core::transition::TransitionSignal;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Registration events carry no host time and are placed at `ts = 0`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::TriggerRegistered(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "TriggerRegistered",
                    "cat": "Registry",
                    "ts": 0,
                    "pid": 0,
                    "tid": e.trigger.index(),
                    "s": "t",
                    "args": {
                        "stagger_ms": e.stagger.get(),
                        "named": e.named,
                    }
                }));
            }
            RecordedEvent::ReceiverRegistered(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ReceiverRegistered",
                    "cat": "Registry",
                    "ts": 0,
                    "pid": 0,
                    "tid": e.receiver.index(),
                    "s": "t",
                    "args": {
                        "delay_ms": e.delay.get(),
                        "named": e.named,
                    }
                }));
            }
            RecordedEvent::Batch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Batch",
                    "cat": "Watcher",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "entries": e.entries,
                        "qualified": e.qualified,
                        "cumulative_ms": e.cumulative.get(),
                    }
                }));
            }
            RecordedEvent::VisibleScheduled(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "VisibleScheduled",
                    "cat": "Watcher",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": e.trigger.index(),
                    "s": "t",
                    "args": {
                        "delay_ms": e.delay.get(),
                    }
                }));
            }
            RecordedEvent::Visible(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Visible",
                    "cat": "Dispatch",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": e.trigger.index(),
                    "s": "t",
                    "args": {
                        "receivers": e.receivers,
                    }
                }));
            }
            RecordedEvent::ReceiverScheduled(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ReceiverScheduled",
                    "cat": "Dispatch",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": e.receiver.index(),
                    "s": "t",
                    "args": {
                        "trigger": e.trigger.index(),
                        "delay_ms": e.delay.get(),
                    }
                }));
            }
            RecordedEvent::ClassChanged(e) => {
                let (ph, name) = match e.change {
                    ClassChange::MarkerAdded => ("B", "Transitioning"),
                    ClassChange::MarkerRemoved => ("E", "Transitioning"),
                    ClassChange::VisibleAdded => ("i", "VisibleClass"),
                };
                let mut event = json!({
                    "ph": ph,
                    "name": name,
                    "cat": "Class",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": e.element.index(),
                });
                if ph == "i" {
                    event["s"] = json!("t");
                }
                events.push(event);
            }
            RecordedEvent::TransitionSignal(e) => {
                let signal = match e.signal {
                    TransitionSignal::Start => "start",
                    TransitionSignal::End => "end",
                    TransitionSignal::Cancel => "cancel",
                };
                events.push(json!({
                    "ph": "C",
                    "name": format!("running el={}", e.element.index()),
                    "cat": "Transition",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": e.element.index(),
                    "args": {
                        "running": e.running,
                    }
                }));
                events.push(json!({
                    "ph": "i",
                    "name": signal,
                    "cat": "Transition",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": e.element.index(),
                    "s": "t",
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(t: HostTime) -> u64 {
    t.micros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use reveal_core::element::ElementId;
    use reveal_core::time::Millis;
    use reveal_core::trace::{
        BatchEvent, ClassChangedEvent, TraceSink, TransitionSignalEvent, TriggerRegisteredEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let el = ElementId(3);
        let mut rec = RecorderSink::new();
        rec.on_trigger_registered(&TriggerRegisteredEvent {
            trigger: el,
            stagger: Millis(0),
            named: false,
        });
        rec.on_batch(&BatchEvent {
            at: HostTime(1_000),
            entries: 1,
            qualified: 1,
            cumulative: Millis(0),
        });
        rec.on_class_changed(&ClassChangedEvent {
            at: HostTime(17_000),
            element: el,
            change: ClassChange::MarkerAdded,
        });
        rec.on_class_changed(&ClassChangedEvent {
            at: HostTime(33_000),
            element: el,
            change: ClassChange::VisibleAdded,
        });
        rec.on_class_changed(&ClassChangedEvent {
            at: HostTime(400_000),
            element: el,
            change: ClassChange::MarkerRemoved,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 5);

        assert_eq!(parsed[0]["name"], "TriggerRegistered");
        assert_eq!(parsed[0]["ts"], 0);
        assert_eq!(parsed[1]["ts"], 1_000);

        // The marker is a duration slice on the element's track.
        assert_eq!(parsed[2]["ph"], "B");
        assert_eq!(parsed[2]["tid"], 3);
        assert_eq!(parsed[3]["ph"], "i");
        assert_eq!(parsed[3]["s"], "t");
        assert_eq!(parsed[4]["ph"], "E");
        assert_eq!(parsed[4]["name"], "Transitioning");
    }

    #[test]
    fn transition_signal_emits_counter_and_instant() {
        let mut rec = RecorderSink::new();
        rec.on_transition_signal(&TransitionSignalEvent {
            at: HostTime(5),
            element: ElementId(1),
            signal: TransitionSignal::Start,
            running: 2,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["ph"], "C");
        assert_eq!(parsed[0]["args"]["running"], 2);
        assert_eq!(parsed[1]["name"], "start");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
