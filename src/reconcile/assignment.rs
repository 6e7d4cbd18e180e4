use crate::shape::ShapeRef;
use itertools::Itertools;
use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

/// Instances with at most this many shapes on each side are solved by exhaustive enumeration
pub const EXHAUSTIVE_LIMIT: usize = 6;

const F64_I64_MULT: f64 = 1_000_000.0;

/// Disjoint pairing of sources and targets
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pairs: Vec<(ShapeRef, ShapeRef, f64)>,
}

impl Assignment {
    /// `(source, target, score)` pairs, every shape used at most once
    ///
    pub fn pairs(&self) -> &[(ShapeRef, ShapeRef, f64)] {
        &self.pairs
    }

    pub fn total(&self) -> f64 {
        self.pairs.iter().map(|(_, _, s)| s).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn target_of(&self, source: ShapeRef) -> Option<ShapeRef> {
        self.pairs
            .iter()
            .find(|(s, _, _)| *s == source)
            .map(|(_, t, _)| *t)
    }
}

/// Finds the disjoint pairing of `sources` and `targets` with the highest total score.
///
/// Only pairs with a positive score take part in the result. Small instances are enumerated
/// exhaustively and the first best pairing in enumeration order wins a tie, so earlier
/// shapes in the lists are paired with earlier partners. Larger instances are solved with
/// the Kuhn–Munkres algorithm.
///
pub fn best_assignment<F>(sources: &[ShapeRef], targets: &[ShapeRef], score: F) -> Assignment
where
    F: Fn(ShapeRef, ShapeRef) -> f64,
{
    let scores = sources
        .iter()
        .map(|s| targets.iter().map(|t| score(*s, *t).max(0.0)).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let pairing = if sources.len().max(targets.len()) <= EXHAUSTIVE_LIMIT {
        exhaustive(&scores, sources.len(), targets.len())
    } else {
        hungarian(&scores, sources.len(), targets.len())
    };

    Assignment {
        pairs: pairing
            .into_iter()
            .filter(|(i, j)| scores[*i][*j] > 0.0)
            .map(|(i, j)| (sources[i], targets[j], scores[i][j]))
            .collect(),
    }
}

fn exhaustive(scores: &[Vec<f64>], rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut best: Option<(f64, Vec<(usize, usize)>)> = None;

    let candidates: Box<dyn Iterator<Item = Vec<(usize, usize)>>> = if rows <= cols {
        Box::new(
            (0..cols)
                .permutations(rows)
                .map(|perm| perm.into_iter().enumerate().collect::<Vec<_>>()),
        )
    } else {
        Box::new((0..rows).permutations(cols).map(|perm| {
            perm.into_iter()
                .enumerate()
                .map(|(j, i)| (i, j))
                .sorted()
                .collect::<Vec<_>>()
        }))
    };

    for pairing in candidates {
        let total: f64 = pairing.iter().map(|(i, j)| scores[*i][*j]).sum();
        if best.as_ref().map_or(true, |(b, _)| total > *b) {
            best = Some((total, pairing));
        }
    }

    best.map(|(_, p)| p).unwrap_or_default()
}

fn hungarian(scores: &[Vec<f64>], rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let transposed = rows > cols;
    let (r, c) = if transposed { (cols, rows) } else { (rows, cols) };

    let mut weights = Matrix::new(r, c, 0i64);
    for i in 0..r {
        for j in 0..c {
            let s = if transposed { scores[j][i] } else { scores[i][j] };
            weights[(i, j)] = (s * F64_I64_MULT) as i64;
        }
    }

    let (_, solution) = kuhn_munkres(&weights);
    solution
        .into_iter()
        .enumerate()
        .map(|(i, j)| if transposed { (j, i) } else { (i, j) })
        .sorted()
        .collect()
}
