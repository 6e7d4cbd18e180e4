use crate::event::TemporalEvent;
use crate::lifeline::store::{LifeLineStore, LineId};
use crate::matching::MatchingMap;
use crate::shape::ShapeRef;
use crate::tracker::options::ConsistencyMode;
use crate::Errors;
use anyhow::Result;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Shapes of the previous frame mapped to the life-lines that currently hold them
///
pub type OpenLines = HashMap<ShapeRef, LineId>;

/// Turns the matching map into life-lines, one time step after another.
///
/// Every step depends on the lines produced by all previous steps, so classification is
/// strictly sequential.
///
pub struct EventClassifier<'a> {
    map: &'a MatchingMap,
    frame_sizes: Vec<usize>,
    tolerance: f64,
    consistency: ConsistencyMode,
}

impl<'a> EventClassifier<'a> {
    /// # Parameters
    /// * `map` - pairwise scores of consecutive frames
    /// * `frame_sizes` - amount of shapes in every frame
    /// * `tolerance` - scores strictly above are matches
    /// * `consistency` - reaction on predecessors without an open line
    ///
    pub fn new(
        map: &'a MatchingMap,
        frame_sizes: Vec<usize>,
        tolerance: f64,
        consistency: ConsistencyMode,
    ) -> Self {
        Self {
            map,
            frame_sizes,
            tolerance,
            consistency,
        }
    }

    fn frame(&self, t: usize) -> impl Iterator<Item = ShapeRef> {
        (0..self.frame_sizes[t]).map(move |i| ShapeRef::new(t, i))
    }

    /// Classifies all frames into `store`
    ///
    pub fn classify(&self, store: &mut LifeLineStore) -> Result<()> {
        if self.frame_sizes.is_empty() {
            return Ok(());
        }

        let mut open = OpenLines::new();
        for source in self.frame(0) {
            open.insert(source, store.create(0, TemporalEvent::Start { source }));
        }

        for t in 1..self.frame_sizes.len() {
            open = self.classify_step(t, &open, store)?;
        }
        Ok(())
    }

    /// Matching predecessors at `t - 1` of every shape at `t`, both in frame order
    ///
    fn predecessors(&self, t: usize) -> BTreeMap<ShapeRef, Vec<ShapeRef>> {
        self.frame(t)
            .map(|target| {
                let preds = self
                    .frame(t - 1)
                    .filter(|p| self.map.score(*p, target) > self.tolerance)
                    .collect::<Vec<_>>();
                (target, preds)
            })
            .collect()
    }

    fn resolve(&self, predecessor: ShapeRef, open: &OpenLines) -> Result<Option<LineId>> {
        if let Some(line) = open.get(&predecessor) {
            return Ok(Some(*line));
        }
        match self.consistency {
            ConsistencyMode::Strict => Err(Errors::TrackingInconsistency {
                frame: predecessor.frame,
                shape: predecessor.index,
            }
            .into()),
            ConsistencyMode::Tolerant => {
                warn!(
                    "Predecessor {} has no open life-line, the association is dropped",
                    predecessor
                );
                Ok(None)
            }
        }
    }

    pub(crate) fn classify_step(
        &self,
        t: usize,
        open: &OpenLines,
        store: &mut LifeLineStore,
    ) -> Result<OpenLines> {
        let predecessors = self.predecessors(t);
        let mut claimed = HashSet::new();
        let mut next_open = OpenLines::new();

        // splits are detected before single targets are classified
        for p in self.frame(t - 1) {
            let targets = predecessors
                .iter()
                .filter(|(target, preds)| !claimed.contains(*target) && preds.contains(&p))
                .map(|(target, _)| *target)
                .collect::<Vec<_>>();
            if targets.len() < 2 {
                continue;
            }
            let Some(line) = self.resolve(p, open)? else {
                continue;
            };
            debug!("t={}: {} splits into {:?}", t, p, targets);
            store.append(
                line,
                t,
                TemporalEvent::Split {
                    source: p,
                    targets: targets.clone(),
                },
            );
            for target in targets {
                let id = store.create(t, TemporalEvent::Start { source: target });
                store.set_related(id, Some(line));
                claimed.insert(target);
                next_open.insert(target, id);
            }
        }

        for (target, preds) in predecessors {
            if claimed.contains(&target) {
                continue;
            }

            let mut sources = Vec::with_capacity(preds.len());
            let mut lines = Vec::with_capacity(preds.len());
            for p in preds {
                if let Some(line) = self.resolve(p, open)? {
                    sources.push(p);
                    lines.push(line);
                }
            }

            match lines.len() {
                0 => {
                    let id = store.create(t, TemporalEvent::Start { source: target });
                    next_open.insert(target, id);
                }
                1 => {
                    store.append(
                        lines[0],
                        t,
                        TemporalEvent::Alive {
                            predecessor: sources[0],
                            target,
                        },
                    );
                    next_open.insert(target, lines[0]);
                }
                _ => {
                    debug!("t={}: {:?} fuse into {}", t, sources, target);
                    let id = store.create(t, TemporalEvent::Start { source: target });
                    for line in lines {
                        store.append(
                            line,
                            t,
                            TemporalEvent::Fusion {
                                sources: sources.clone(),
                                target,
                            },
                        );
                        store.set_related(line, Some(id));
                    }
                    next_open.insert(target, id);
                }
            }
        }

        Ok(next_open)
    }
}
