/// Maximum-score disjoint pairing of shapes
///
pub mod assignment;

use crate::event::TemporalEvent;
use crate::lifeline::store::{LifeLineStore, LineId};
use crate::reconcile::assignment::best_assignment;
use crate::shape::ShapeRef;
use log::debug;
use std::collections::HashMap;

/// Stitch performed for one fused line
///
#[derive(Debug, Clone, PartialEq, Eq)]
struct Stitch {
    fused_into: LineId,
    participants: usize,
}

/// Repairs fusions that are undone by a split of the fused line.
///
/// Two objects that touch for a few frames are classified as a fusion into a new line that
/// later splits again. When the shapes before the fusion pair up with the shapes after the
/// split, the fusion becomes a touch, the split a de-touch, and the merged line together with
/// the matching split branch is spliced into the line of every touching object.
///
pub struct Reconciler<F>
where
    F: Fn(ShapeRef, ShapeRef) -> f64,
{
    score: F,
}

impl<F> Reconciler<F>
where
    F: Fn(ShapeRef, ShapeRef) -> f64,
{
    /// # Parameters
    /// * `score` - overlap score of two shapes from arbitrary frames
    ///
    pub fn new(score: F) -> Self {
        Self { score }
    }

    /// Reconciles every line of the store, returns the amount of touches found
    ///
    pub fn reconcile(&self, store: &mut LifeLineStore) -> usize {
        let mut reconciled: HashMap<LineId, usize> = HashMap::new();
        let mut touches = 0;

        for id in 0..store.len() {
            // a stitched line may end in the next fusion, so repeat until it does not
            while !store.is_removed(id) {
                let Some(stitch) = self.reconcile_line(id, store) else {
                    break;
                };
                touches += 1;
                let count = reconciled.entry(stitch.fused_into).or_insert(0);
                *count += 1;
                if *count == stitch.participants {
                    debug!(
                        "Line {} is folded into all {} touching lines",
                        stitch.fused_into, stitch.participants
                    );
                    store.remove(stitch.fused_into);
                }
            }
        }
        touches
    }

    fn reconcile_line(&self, id: LineId, store: &mut LifeLineStore) -> Option<Stitch> {
        let line = store.get(id);
        let (tf, fusion) = line.last_event()?;
        let TemporalEvent::Fusion { sources, target } = fusion else {
            return None;
        };
        let fusion = fusion.clone();
        let (sources, target) = (sources.clone(), *target);

        let fused_into = store.related(id)?;
        let held = line.shape_at(tf.checked_sub(1)?)?;

        let merged = store.get(fused_into);
        if merged.first_event() != Some((tf, &TemporalEvent::Start { source: target })) {
            return None;
        }
        let (tr, TemporalEvent::Split { targets, .. }) = merged.last_event()? else {
            debug!("Line {} fused into {} for good", id, fused_into);
            return None;
        };

        let assignment = best_assignment(&sources, targets, &self.score);
        let Some(matched) = assignment.target_of(held) else {
            debug!(
                "Line {}: {} has no positive match among {:?}, fusion is kept",
                id, held, targets
            );
            return None;
        };

        let detouched = store.line_started_by(matched)?;
        if detouched == id
            || store.is_removed(detouched)
            || store.get(detouched).first_event()
                != Some((tr, &TemporalEvent::Start { source: matched }))
        {
            return None;
        }

        let merged_events = merged
            .events()
            .range(tf + 1..)
            .map(|(t, e)| (*t, e.clone().into_detouch()))
            .collect::<Vec<_>>();

        let branch = store.get(detouched);
        let branch_events = branch
            .events()
            .range(tr + 1..)
            .map(|(t, e)| (*t, e.clone()))
            .collect::<Vec<_>>();
        let pending = match branch.last_event() {
            Some((_, TemporalEvent::Fusion { .. })) => store.related(detouched),
            _ => None,
        };

        debug!(
            "Line {}: touch at {}, de-touch at {} continues with {} (line {})",
            id, tf, tr, matched, detouched
        );

        let line = store.get_mut(id);
        line.insert(tf, fusion.into_touch());
        for (t, e) in merged_events.into_iter().chain(branch_events) {
            line.insert(t, e);
        }
        line.mark_detouched(tr, matched);

        store.set_related(id, pending);
        store.set_related(detouched, None);
        store.remove(detouched);
        for other in store.alive_ids() {
            if store.related(other) == Some(detouched) {
                store.set_related(other, Some(id));
            }
        }

        Some(Stitch {
            fused_into,
            participants: sources.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::classifier::EventClassifier;
    use crate::event::{EventKind, TemporalEvent};
    use crate::lifeline::store::LifeLineStore;
    use crate::matching::MatchingMap;
    use crate::reconcile::Reconciler;
    use crate::shape::ShapeRef;
    use crate::tracker::options::ConsistencyMode;
    use std::collections::HashMap;

    fn s(frame: usize, index: usize) -> ShapeRef {
        ShapeRef::new(frame, index)
    }

    const MERGED: usize = usize::MAX;

    /// `objects` objects touch at `touch` for `frames` frames, scores are given by
    /// object identity only.
    ///
    fn touching(
        objects: usize,
        total: usize,
        touch: usize,
        frames: usize,
    ) -> (Vec<usize>, HashMap<ShapeRef, usize>) {
        let mut sizes = Vec::new();
        let mut owners = HashMap::new();
        for t in 0..total {
            if t >= touch && t < touch + frames {
                sizes.push(1);
                owners.insert(s(t, 0), MERGED);
            } else {
                sizes.push(objects);
                for i in 0..objects {
                    owners.insert(s(t, i), i);
                }
            }
        }
        (sizes, owners)
    }

    fn classify(sizes: &[usize], objects: &HashMap<ShapeRef, usize>) -> LifeLineStore {
        let map = MatchingMap::new(1);
        for t in 1..sizes.len() {
            for i in 0..sizes[t - 1] {
                for j in 0..sizes[t] {
                    let (a, b) = (objects[&s(t - 1, i)], objects[&s(t, j)]);
                    let score = if a == b || a == MERGED || b == MERGED {
                        0.8
                    } else {
                        0.0
                    };
                    map.insert((s(t - 1, i), s(t, j)), score);
                }
            }
        }
        let mut store = LifeLineStore::default();
        EventClassifier::new(&map, sizes.to_vec(), 0.1, ConsistencyMode::Strict)
            .classify(&mut store)
            .unwrap();
        store
    }

    fn same_object(
        objects: &HashMap<ShapeRef, usize>,
    ) -> impl Fn(ShapeRef, ShapeRef) -> f64 + '_ {
        move |a, b| if objects[&a] == objects[&b] { 0.9 } else { 0.0 }
    }

    #[test]
    fn single_frame_touch() {
        let (sizes, objects) = touching(2, 5, 2, 1);
        let mut store = classify(&sizes, &objects);
        assert_eq!(store.len(), 5);

        let touches = Reconciler::new(same_object(&objects)).reconcile(&mut store);
        assert_eq!(touches, 2);

        let lines = store.finalize();
        assert_eq!(lines.len(), 2);
        for (object, line) in lines.iter().enumerate() {
            assert_eq!(line.birth(), 0);
            assert_eq!(line.death(), 4);
            assert_eq!(
                line.kinds(),
                vec![
                    EventKind::Start,
                    EventKind::Alive,
                    EventKind::Touch,
                    EventKind::DeTouch,
                    EventKind::End
                ]
            );
            assert_eq!(line.shape_at(3), Some(s(3, object)));
            assert_eq!(line.event(4), Some(&TemporalEvent::End { source: s(4, object) }));
            assert_eq!(line.related(), None);
        }
    }

    #[test]
    fn long_touch() {
        let (sizes, objects) = touching(2, 7, 2, 3);
        let mut store = classify(&sizes, &objects);
        Reconciler::new(same_object(&objects)).reconcile(&mut store);
        let lines = store.finalize();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1].kinds(),
            vec![
                EventKind::Start,
                EventKind::Alive,
                EventKind::Touch,
                EventKind::Alive,
                EventKind::Alive,
                EventKind::DeTouch,
                EventKind::End
            ]
        );
    }

    #[test]
    fn repeated_touches() {
        // touch at 2, separate at 3, touch again at 4, separate at 5
        let mut objects = HashMap::new();
        let sizes = vec![2, 2, 1, 2, 1, 2, 2];
        for (t, size) in sizes.iter().enumerate() {
            for i in 0..*size {
                objects.insert(s(t, i), if *size == 1 { MERGED } else { i });
            }
        }
        let mut store = classify(&sizes, &objects);
        let touches = Reconciler::new(same_object(&objects)).reconcile(&mut store);
        assert_eq!(touches, 4);

        let lines = store.finalize();
        assert_eq!(lines.len(), 2);
        for (object, line) in lines.iter().enumerate() {
            assert_eq!(line.length(), 7);
            assert_eq!(
                line.kinds(),
                vec![
                    EventKind::Start,
                    EventKind::Alive,
                    EventKind::Touch,
                    EventKind::DeTouch,
                    EventKind::Touch,
                    EventKind::DeTouch,
                    EventKind::End
                ]
            );
            assert_eq!(line.shape_at(5), Some(s(5, object)));
        }
    }

    #[test]
    fn unmatched_split_is_genuine() {
        let (sizes, objects) = touching(2, 5, 2, 1);
        let mut store = classify(&sizes, &objects);
        let touches = Reconciler::new(|_: ShapeRef, _: ShapeRef| 0.0).reconcile(&mut store);
        assert_eq!(touches, 0);

        let lines = store.finalize();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].kinds(), vec![EventKind::Start, EventKind::Alive, EventKind::Fusion]);
        assert_eq!(lines[2].kinds(), vec![EventKind::Start, EventKind::Split]);
        assert_eq!(lines[0].related(), Some(2));
        assert_eq!(lines[3].related(), Some(2));
    }

    #[test]
    fn partially_matched_touch() {
        let (sizes, objects) = touching(2, 5, 2, 1);
        let mut store = classify(&sizes, &objects);
        // only object 0 is found again after the split
        let score = |a: ShapeRef, b: ShapeRef| {
            if objects[&a] == 0 && objects[&b] == 0 {
                0.9
            } else {
                0.0
            }
        };
        let touches = Reconciler::new(score).reconcile(&mut store);
        assert_eq!(touches, 1);

        let lines = store.finalize();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0].kinds(),
            vec![
                EventKind::Start,
                EventKind::Alive,
                EventKind::Touch,
                EventKind::DeTouch,
                EventKind::End
            ]
        );
        assert_eq!(lines[0].related(), None);
        assert_eq!(
            lines[1].kinds(),
            vec![EventKind::Start, EventKind::Alive, EventKind::Fusion]
        );
        assert_eq!(lines[1].related(), Some(2));
        // the merged line keeps its split for the unmatched participant
        assert_eq!(lines[2].kinds(), vec![EventKind::Start, EventKind::Split]);
        assert_eq!(lines[3].kinds(), vec![EventKind::Start, EventKind::End]);
        assert_eq!(lines[3].shape_at(4), Some(s(4, 1)));
        assert_eq!(lines[3].related(), Some(2));
    }

    #[test]
    fn three_way_touch() {
        let (sizes, objects) = touching(3, 5, 2, 1);
        let mut store = classify(&sizes, &objects);
        assert_eq!(store.len(), 7);

        let touches = Reconciler::new(same_object(&objects)).reconcile(&mut store);
        assert_eq!(touches, 3);

        let lines = store.finalize();
        assert_eq!(lines.len(), 3);
        for (object, line) in lines.iter().enumerate() {
            assert_eq!((line.birth(), line.death()), (0, 4));
            assert_eq!(
                line.kinds(),
                vec![
                    EventKind::Start,
                    EventKind::Alive,
                    EventKind::Touch,
                    EventKind::DeTouch,
                    EventKind::End
                ]
            );
            assert_eq!(line.shape_at(3), Some(s(3, object)));
            assert_eq!(line.related(), None);
        }
    }
}
