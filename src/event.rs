use crate::shape::ShapeRef;
use std::fmt;

/// Participation of a life-line in one time step.
///
/// Every (life-line, time) cell holds exactly one event.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalEvent {
    /// The shape appears without a matching predecessor.
    Start { source: ShapeRef },
    /// The line terminates on the shape. Only ever the last event of a finalized line.
    End { source: ShapeRef },
    /// Exactly one predecessor matched the target.
    Alive {
        predecessor: ShapeRef,
        target: ShapeRef,
    },
    /// Two or more predecessors matched the same target.
    Fusion {
        sources: Vec<ShapeRef>,
        target: ShapeRef,
    },
    /// One predecessor matched two or more targets.
    Split {
        source: ShapeRef,
        targets: Vec<ShapeRef>,
    },
    /// A fusion that was undone by a matching split later on.
    Touch {
        sources: Vec<ShapeRef>,
        target: ShapeRef,
    },
    /// The split that undid a touch.
    DeTouch {
        source: ShapeRef,
        targets: Vec<ShapeRef>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Start,
    End,
    Alive,
    Fusion,
    Split,
    Touch,
    DeTouch,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Start => "start",
            EventKind::End => "end",
            EventKind::Alive => "alive",
            EventKind::Fusion => "fusion",
            EventKind::Split => "split",
            EventKind::Touch => "touch",
            EventKind::DeTouch => "detouch",
        };
        f.write_str(name)
    }
}

impl TemporalEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TemporalEvent::Start { .. } => EventKind::Start,
            TemporalEvent::End { .. } => EventKind::End,
            TemporalEvent::Alive { .. } => EventKind::Alive,
            TemporalEvent::Fusion { .. } => EventKind::Fusion,
            TemporalEvent::Split { .. } => EventKind::Split,
            TemporalEvent::Touch { .. } => EventKind::Touch,
            TemporalEvent::DeTouch { .. } => EventKind::DeTouch,
        }
    }

    /// All shapes the event refers to, sources first
    ///
    pub fn shapes(&self) -> Vec<ShapeRef> {
        match self {
            TemporalEvent::Start { source } | TemporalEvent::End { source } => vec![*source],
            TemporalEvent::Alive {
                predecessor,
                target,
            } => vec![*predecessor, *target],
            TemporalEvent::Fusion { sources, target }
            | TemporalEvent::Touch { sources, target } => {
                let mut shapes = sources.clone();
                shapes.push(*target);
                shapes
            }
            TemporalEvent::Split { source, targets }
            | TemporalEvent::DeTouch { source, targets } => {
                let mut shapes = vec![*source];
                shapes.extend(targets.iter().copied());
                shapes
            }
        }
    }

    pub fn contains(&self, shape: ShapeRef) -> bool {
        match self {
            TemporalEvent::Start { source } | TemporalEvent::End { source } => *source == shape,
            TemporalEvent::Alive {
                predecessor,
                target,
            } => *predecessor == shape || *target == shape,
            TemporalEvent::Fusion { sources, target }
            | TemporalEvent::Touch { sources, target } => {
                *target == shape || sources.contains(&shape)
            }
            TemporalEvent::Split { source, targets }
            | TemporalEvent::DeTouch { source, targets } => {
                *source == shape || targets.contains(&shape)
            }
        }
    }

    /// The shape a line holds after this event when the event itself determines it.
    ///
    /// Fusion and split terminate a line, a de-touch holds one of several targets, so
    /// they return `None`.
    ///
    pub fn held_shape(&self) -> Option<ShapeRef> {
        match self {
            TemporalEvent::Start { source } | TemporalEvent::End { source } => Some(*source),
            TemporalEvent::Alive { target, .. } | TemporalEvent::Touch { target, .. } => {
                Some(*target)
            }
            TemporalEvent::Fusion { .. }
            | TemporalEvent::Split { .. }
            | TemporalEvent::DeTouch { .. } => None,
        }
    }

    /// Fusion turned into touch, other events are returned as is
    ///
    pub fn into_touch(self) -> Self {
        match self {
            TemporalEvent::Fusion { sources, target } => TemporalEvent::Touch { sources, target },
            other => other,
        }
    }

    /// Split turned into de-touch, other events are returned as is
    ///
    pub fn into_detouch(self) -> Self {
        match self {
            TemporalEvent::Split { source, targets } => TemporalEvent::DeTouch { source, targets },
            other => other,
        }
    }

    /// Trailing alive turned into end on the same target, other events are returned as is
    ///
    pub fn into_end(self) -> Self {
        match self {
            TemporalEvent::Alive { target, .. } => TemporalEvent::End { source: target },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{EventKind, TemporalEvent};
    use crate::shape::ShapeRef;

    fn s(frame: usize, index: usize) -> ShapeRef {
        ShapeRef::new(frame, index)
    }

    #[test]
    fn contains_every_variant() {
        let events = [
            TemporalEvent::Start { source: s(0, 0) },
            TemporalEvent::End { source: s(0, 0) },
            TemporalEvent::Alive {
                predecessor: s(0, 0),
                target: s(1, 0),
            },
            TemporalEvent::Fusion {
                sources: vec![s(0, 0), s(0, 1)],
                target: s(1, 0),
            },
            TemporalEvent::Split {
                source: s(0, 0),
                targets: vec![s(1, 0), s(1, 1)],
            },
            TemporalEvent::Touch {
                sources: vec![s(0, 0), s(0, 1)],
                target: s(1, 0),
            },
            TemporalEvent::DeTouch {
                source: s(0, 0),
                targets: vec![s(1, 0), s(1, 1)],
            },
        ];
        for e in &events {
            assert!(e.contains(s(0, 0)), "{:?}", e);
            assert!(!e.contains(s(5, 5)), "{:?}", e);
            for shape in e.shapes() {
                assert!(e.contains(shape));
            }
        }
        assert!(events[3].contains(s(0, 1)));
        assert!(events[4].contains(s(1, 1)));
        assert_eq!(events[3].shapes(), vec![s(0, 0), s(0, 1), s(1, 0)]);
    }

    #[test]
    fn conversions() {
        let fusion = TemporalEvent::Fusion {
            sources: vec![s(0, 0), s(0, 1)],
            target: s(1, 0),
        };
        assert_eq!(fusion.clone().into_touch().kind(), EventKind::Touch);
        assert_eq!(fusion.clone().into_detouch(), fusion);

        let split = TemporalEvent::Split {
            source: s(1, 0),
            targets: vec![s(2, 0), s(2, 1)],
        };
        assert_eq!(
            split.into_detouch(),
            TemporalEvent::DeTouch {
                source: s(1, 0),
                targets: vec![s(2, 0), s(2, 1)],
            }
        );

        let alive = TemporalEvent::Alive {
            predecessor: s(3, 0),
            target: s(4, 2),
        };
        assert_eq!(alive.into_end(), TemporalEvent::End { source: s(4, 2) });
        assert_eq!(EventKind::DeTouch.to_string(), "detouch");
    }

    #[test]
    fn held_shapes() {
        assert_eq!(
            TemporalEvent::Start { source: s(2, 1) }.held_shape(),
            Some(s(2, 1))
        );
        assert_eq!(
            TemporalEvent::Split {
                source: s(1, 0),
                targets: vec![s(2, 0), s(2, 1)],
            }
            .held_shape(),
            None
        );
    }
}
