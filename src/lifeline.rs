/// Arena of life-lines used while tracking
///
pub mod store;

use crate::event::{EventKind, TemporalEvent};
use crate::shape::ShapeRef;
use std::collections::BTreeMap;

/// Reconstructed temporal identity of one tracked object.
///
/// Events are stored sparsely by time index. `birth`, `death`, `length` and `identifier`
/// are only meaningful once the line is finalized by the tracker.
///
#[derive(Debug, Clone)]
pub struct LifeLine {
    events: BTreeMap<usize, TemporalEvent>,
    /// split branches stitched into the line at de-touch times
    detouched: BTreeMap<usize, ShapeRef>,
    identifier: u64,
    birth: usize,
    death: usize,
    length: usize,
    related: Option<u64>,
    keep: bool,
}

impl Default for LifeLine {
    fn default() -> Self {
        Self {
            events: BTreeMap::default(),
            detouched: BTreeMap::default(),
            identifier: 0,
            birth: 0,
            death: 0,
            length: 0,
            related: None,
            keep: true,
        }
    }
}

impl LifeLine {
    pub(crate) fn new(time: usize, event: TemporalEvent) -> Self {
        let mut line = Self::default();
        line.insert(time, event);
        line
    }

    pub fn events(&self) -> &BTreeMap<usize, TemporalEvent> {
        &self.events
    }

    pub fn event(&self, time: usize) -> Option<&TemporalEvent> {
        self.events.get(&time)
    }

    pub fn first_event(&self) -> Option<(usize, &TemporalEvent)> {
        self.events.iter().next().map(|(t, e)| (*t, e))
    }

    pub fn last_event(&self) -> Option<(usize, &TemporalEvent)> {
        self.events.iter().next_back().map(|(t, e)| (*t, e))
    }

    /// Kinds of the events in time order
    ///
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.values().map(TemporalEvent::kind).collect()
    }

    pub fn contains(&self, shape: ShapeRef) -> bool {
        self.events.values().any(|e| e.contains(shape))
    }

    /// The shape the line occupies at `time`, if the line holds exactly one shape then
    ///
    pub fn shape_at(&self, time: usize) -> Option<ShapeRef> {
        match self.events.get(&time)? {
            TemporalEvent::DeTouch { .. } => self.detouched.get(&time).copied(),
            e => e.held_shape(),
        }
    }

    pub fn identifier(&self) -> u64 {
        self.identifier
    }

    pub fn birth(&self) -> usize {
        self.birth
    }

    pub fn death(&self) -> usize {
        self.death
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Identifier of the line this one fused into or split from, if that line survived
    ///
    pub fn related(&self) -> Option<u64> {
        self.related
    }

    pub fn keep(&self) -> bool {
        self.keep
    }

    pub fn set_keep(&mut self, keep: bool) {
        self.keep = keep;
    }

    /// Checks the length of the line against optional bounds (both inclusive)
    ///
    pub fn filter(&self, min_length: Option<usize>, max_length: Option<usize>) -> bool {
        min_length.map_or(true, |min| self.length >= min)
            && max_length.map_or(true, |max| self.length <= max)
    }

    pub(crate) fn insert(&mut self, time: usize, event: TemporalEvent) {
        self.events.insert(time, event);
    }

    pub(crate) fn set_related(&mut self, related: Option<u64>) {
        self.related = related;
    }

    pub(crate) fn mark_detouched(&mut self, time: usize, shape: ShapeRef) {
        self.detouched.insert(time, shape);
    }

    /// Rewrites a trailing alive into end and computes the derived attributes
    ///
    pub(crate) fn finalize(&mut self, identifier: u64) {
        if let Some(mut last) = self.events.last_entry() {
            if last.get().kind() == EventKind::Alive {
                let end = last.get().clone().into_end();
                last.insert(end);
            }
        }
        self.birth = self.events.keys().next().copied().unwrap_or(0);
        self.death = self.events.keys().next_back().copied().unwrap_or(self.birth);
        self.length = self.death - self.birth + 1;
        self.identifier = identifier;
    }
}

/// Sets the keep flag of every line from its length
///
pub fn filter_lifelines(
    lines: &mut [LifeLine],
    min_length: Option<usize>,
    max_length: Option<usize>,
) {
    for line in lines {
        let keep = line.filter(min_length, max_length);
        line.set_keep(keep);
    }
}
