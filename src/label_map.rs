// Stranded interval index from genomic ranges to labels
use std::collections::{BTreeSet, HashMap};

use coitrees::{BasicCOITree, Interval as CoiInterval, IntervalTree as CoitreeIntervalTree};

use crate::interval::{Interval, Strand};

type TrackKey = (String, Strand);

/// One interval tree per (chromosome, strand), each node carrying one label.
/// Call `index` after inserting; queries on an unindexed track find nothing.
#[derive(Default)]
pub struct LabelMap {
    intervals: HashMap<TrackKey, Vec<CoiInterval<String>>>,
    trees: HashMap<TrackKey, BasicCOITree<String, u32>>,
}

impl LabelMap {
    pub fn new() -> Self {
        LabelMap::default()
    }

    /// Adds `label` over `iv` on its chromosome and strand.
    pub fn insert(&mut self, iv: &Interval, label: &str) {
        // COITree intervals are end-inclusive; convert [start, end) -> [start, end-1].
        let first = iv.start() as i32;
        let last = (iv.end() - 1) as i32;
        self.intervals
            .entry((iv.chrom().to_string(), iv.strand()))
            .or_default()
            .push(CoiInterval::new(first, last, label.to_string()));
    }

    pub fn index(&mut self) {
        self.trees = self
            .intervals
            .iter()
            .map(|(key, intervals)| (key.clone(), BasicCOITree::new(intervals)))
            .collect();
    }

    fn tree(&self, chrom: &str, strand: Strand) -> Option<&BasicCOITree<String, u32>> {
        self.trees.get(&(chrom.to_string(), strand))
    }

    pub fn labels_at(&self, chrom: &str, strand: Strand, pos: u64) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();
        if let Some(tree) = self.tree(chrom, strand) {
            tree.query(pos as i32, pos as i32, |node| {
                labels.insert(node.metadata.to_string());
            });
        }
        labels
    }

    /// Number of bases of `iv` carrying `label` on the same chromosome and strand.
    /// Bases under several overlapping `label` intervals count once.
    pub fn covered_len(&self, iv: &Interval, label: &str) -> u64 {
        let tree = match self.tree(iv.chrom(), iv.strand()) {
            Some(tree) => tree,
            None => return 0,
        };
        let mut hits: Vec<(u64, u64)> = Vec::new();
        tree.query(iv.start() as i32, (iv.end() - 1) as i32, |node| {
            if node.metadata.as_str() == label {
                let start = (node.first.max(0) as u64).max(iv.start());
                let end = ((node.last + 1).max(0) as u64).min(iv.end());
                if end > start {
                    hits.push((start, end));
                }
            }
        });
        hits.sort_unstable();

        let mut covered = 0;
        let mut open: Option<(u64, u64)> = None;
        for (start, end) in hits {
            open = match open {
                Some((s, e)) if start <= e => Some((s, e.max(end))),
                Some((s, e)) => {
                    covered += e - s;
                    Some((start, end))
                }
                None => Some((start, end)),
            };
        }
        if let Some((s, e)) = open {
            covered += e - s;
        }
        covered
    }
}

impl Clone for LabelMap {
    fn clone(&self) -> Self {
        let mut map = LabelMap {
            intervals: self.intervals.clone(),
            trees: HashMap::new(),
        };
        if !self.trees.is_empty() {
            map.index();
        }
        map
    }
}

impl std::fmt::Debug for LabelMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelMap")
            .field("tracks", &self.intervals.len())
            .field("indexed", &self.trees.len())
            .finish()
    }
}
