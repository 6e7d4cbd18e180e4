use crate::event::TemporalEvent;
use crate::lifeline::LifeLine;
use crate::shape::ShapeRef;
use std::collections::HashMap;

/// Stable index of a life-line inside [`LifeLineStore`]
///
pub type LineId = usize;

/// Arena that owns every life-line created while tracking.
///
/// Lines are never deleted while the tracker works on them; a line folded into another one
/// is only marked removed and left out when the store is finalized.
///
#[derive(Debug, Default)]
pub struct LifeLineStore {
    lines: Vec<LifeLine>,
    removed: Vec<bool>,
    related: Vec<Option<LineId>>,
    started_by: HashMap<ShapeRef, LineId>,
}

impl LifeLineStore {
    /// Creates a line starting with `event` at `time`
    ///
    pub fn create(&mut self, time: usize, event: TemporalEvent) -> LineId {
        let id = self.lines.len();
        if let TemporalEvent::Start { source } = &event {
            self.started_by.insert(*source, id);
        }
        self.lines.push(LifeLine::new(time, event));
        self.removed.push(false);
        self.related.push(None);
        id
    }

    pub fn get(&self, id: LineId) -> &LifeLine {
        &self.lines[id]
    }

    pub fn get_mut(&mut self, id: LineId) -> &mut LifeLine {
        &mut self.lines[id]
    }

    pub fn append(&mut self, id: LineId, time: usize, event: TemporalEvent) {
        self.lines[id].insert(time, event);
    }

    /// Line `id` fused into or split from while tracking
    ///
    pub fn related(&self, id: LineId) -> Option<LineId> {
        self.related[id]
    }

    pub fn set_related(&mut self, id: LineId, related: Option<LineId>) {
        self.related[id] = related;
    }

    /// Line whose first event is `Start` on `shape`
    ///
    pub fn line_started_by(&self, shape: ShapeRef) -> Option<LineId> {
        self.started_by.get(&shape).copied()
    }

    pub fn remove(&mut self, id: LineId) {
        self.removed[id] = true;
    }

    pub fn is_removed(&self, id: LineId) -> bool {
        self.removed[id]
    }

    /// Number of lines ever created, removed ones included
    ///
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Ids of lines that are not removed
    ///
    pub fn alive_ids(&self) -> Vec<LineId> {
        (0..self.lines.len()).filter(|id| !self.removed[*id]).collect()
    }

    /// Consumes the store and returns surviving lines with sequential identifiers.
    ///
    /// `related` links are remapped to the identifiers of surviving lines and dropped when
    /// the related line did not survive.
    ///
    pub fn finalize(self) -> Vec<LifeLine> {
        let mut identifiers: HashMap<LineId, u64> = HashMap::new();
        for (id, removed) in self.removed.iter().enumerate() {
            if !removed {
                let next = identifiers.len() as u64;
                identifiers.insert(id, next);
            }
        }

        let related = self.related;
        self.lines
            .into_iter()
            .zip(self.removed)
            .enumerate()
            .filter(|(_, (_, removed))| !removed)
            .map(|(id, (mut line, _))| {
                line.set_related(related[id].and_then(|r| identifiers.get(&r).copied()));
                line.finalize(identifiers[&id]);
                line
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{EventKind, TemporalEvent};
    use crate::lifeline::store::LifeLineStore;
    use crate::shape::ShapeRef;

    fn s(frame: usize, index: usize) -> ShapeRef {
        ShapeRef::new(frame, index)
    }

    #[test]
    fn arena() {
        let mut store = LifeLineStore::default();
        assert!(store.is_empty());
        let a = store.create(0, TemporalEvent::Start { source: s(0, 0) });
        let b = store.create(0, TemporalEvent::Start { source: s(0, 1) });
        let c = store.create(1, TemporalEvent::Start { source: s(1, 0) });
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(store.line_started_by(s(0, 1)), Some(b));
        assert_eq!(store.line_started_by(s(1, 1)), None);

        for id in [a, b] {
            store.append(
                id,
                1,
                TemporalEvent::Fusion {
                    sources: vec![s(0, 0), s(0, 1)],
                    target: s(1, 0),
                },
            );
            store.set_related(id, Some(c));
        }

        assert_eq!(store.related(a), Some(c));
        assert_eq!(store.related(c), None);

        store.remove(a);
        assert!(store.is_removed(a));
        assert_eq!(store.alive_ids(), vec![b, c]);
        assert_eq!(store.len(), 3);

        let lines = store.finalize();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].identifier(), 0);
        assert_eq!(lines[0].related(), Some(1));
        assert_eq!(lines[0].kinds(), vec![EventKind::Start, EventKind::Fusion]);
        assert_eq!(lines[1].identifier(), 1);
        assert_eq!(lines[1].related(), None);
        assert_eq!(lines[1].birth(), 1);
    }

    #[test]
    fn related_to_removed_line_is_dropped() {
        let mut store = LifeLineStore::default();
        let a = store.create(0, TemporalEvent::Start { source: s(0, 0) });
        let b = store.create(0, TemporalEvent::Start { source: s(0, 1) });
        store.set_related(b, Some(a));
        store.remove(a);
        let lines = store.finalize();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].related(), None);
    }
}
