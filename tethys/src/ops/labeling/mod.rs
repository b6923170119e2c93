//! Connected component labeling using union-find over run-length encoded rows.
//!
//! Labels are assigned in raster order of each component's first pixel, so
//! the same mask always yields the same numbering.


use crate::config::Connectivity;
use crate::grid::Grid2;

// ============================================================================
// Run-Length Encoding
// ============================================================================

/// A horizontal run of foreground pixels.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32, // first column (inclusive)
    end: u32,   // last column (exclusive)
    label: u32, // provisional label
}

impl Run {
    /// Search window for overlapping runs in the previous row, end exclusive.
    #[inline]
    fn search_window(&self, connectivity: Connectivity) -> (u32, u32) {
        match connectivity {
            Connectivity::Four => (self.start, self.end),
            Connectivity::Eight => (self.start.saturating_sub(1), self.end + 1),
        }
    }
}

#[inline]
fn runs_connected(prev: &Run, curr: &Run, connectivity: Connectivity) -> bool {
    match connectivity {
        Connectivity::Four => prev.start < curr.end && prev.end > curr.start,
        Connectivity::Eight => prev.start < curr.end + 1 && prev.end + 1 > curr.start,
    }
}

fn extract_runs_from_row(row: &[bool], runs: &mut Vec<Run>) {
    let mut col = 0;
    while col < row.len() {
        if !row[col] {
            col += 1;
            continue;
        }
        let start = col;
        while col < row.len() && row[col] {
            col += 1;
        }
        runs.push(Run {
            start: start as u32,
            end: col as u32,
            label: 0,
        });
    }
}

/// Merge the current row's runs with the previous row's runs.
///
/// Runs without an overlapping predecessor get a fresh label.
fn merge_runs_with_prev(
    curr_runs: &mut [Run],
    prev_runs: &[Run],
    connectivity: Connectivity,
    uf: &mut UnionFind,
) {
    let mut prev_idx = 0;
    for run in curr_runs.iter_mut() {
        let (search_start, search_end) = run.search_window(connectivity);

        while prev_idx < prev_runs.len() && prev_runs[prev_idx].end <= search_start {
            prev_idx += 1;
        }

        let mut assigned_label = None;
        let mut check_idx = prev_idx;
        while check_idx < prev_runs.len() && prev_runs[check_idx].start < search_end {
            let prev_run = &prev_runs[check_idx];
            if runs_connected(prev_run, run, connectivity) {
                match assigned_label {
                    Some(label) if label != prev_run.label => uf.union(label, prev_run.label),
                    None => assigned_label = Some(prev_run.label),
                    _ => {}
                }
            }
            check_idx += 1;
        }

        run.label = assigned_label.unwrap_or_else(|| uf.make_set());
    }
}

// ============================================================================
// LabelMap
// ============================================================================

/// Per-pixel component labels; 0 is background, components are `1..=n`.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Grid2<u32>,
    num_labels: usize,
}

/// Pixel statistics of one labeled component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub label: u32,
    /// Pixel count.
    pub area: usize,
    row_sum: f64,
    col_sum: f64,
}

impl Region {
    /// Mean `(row, col)` of the component's pixels.
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.area as f64;
        (self.row_sum / n, self.col_sum / n)
    }
}

impl LabelMap {
    pub fn from_mask(mask: &Grid2<bool>, connectivity: Connectivity) -> Self {
        let mut labels = Grid2::new_filled(mask.rows(), mask.cols(), 0u32);
        if mask.is_empty() {
            return Self {
                labels,
                num_labels: 0,
            };
        }

        let mut uf = UnionFind::new();
        let mut prev_runs: Vec<Run> = Vec::with_capacity(mask.cols() / 4);
        let mut curr_runs: Vec<Run> = Vec::with_capacity(mask.cols() / 4);

        for row in 0..mask.rows() {
            curr_runs.clear();
            extract_runs_from_row(mask.row(row), &mut curr_runs);

            if curr_runs.is_empty() {
                prev_runs.clear();
                continue;
            }

            merge_runs_with_prev(&mut curr_runs, &prev_runs, connectivity, &mut uf);

            for run in &curr_runs {
                for col in run.start..run.end {
                    labels[(row, col as usize)] = run.label;
                }
            }

            std::mem::swap(&mut prev_runs, &mut curr_runs);
        }

        let num_labels = uf.flatten_labels(labels.cells_mut());
        Self { labels, num_labels }
    }

    /// Number of components, excluding background.
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn labels(&self) -> &Grid2<u32> {
        &self.labels
    }

    /// Area and centroid of every component, ordered by label.
    pub fn regions(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = (1..=self.num_labels as u32)
            .map(|label| Region {
                label,
                area: 0,
                row_sum: 0.0,
                col_sum: 0.0,
            })
            .collect();

        for row in 0..self.labels.rows() {
            for (col, &label) in self.labels.row(row).iter().enumerate() {
                if label == 0 {
                    continue;
                }
                let region = &mut regions[(label - 1) as usize];
                region.area += 1;
                region.row_sum += row as f64;
                region.col_sum += col as f64;
            }
        }
        regions
    }

    /// Mean of `values` over each component, indexed by `label - 1`.
    /// Non-finite samples are skipped; a component without finite samples
    /// gets NaN.
    pub fn mean_by_label(&self, values: &Grid2<f64>) -> Vec<f64> {
        assert_eq!(self.labels.rows(), values.rows());
        assert_eq!(self.labels.cols(), values.cols());

        let mut sums = vec![(0.0, 0usize); self.num_labels];
        for (&label, &v) in self.labels.iter().zip(values.iter()) {
            if label != 0 && v.is_finite() {
                let entry = &mut sums[(label - 1) as usize];
                entry.0 += v;
                entry.1 += 1;
            }
        }
        sums.into_iter()
            .map(|(sum, n)| if n > 0 { sum / n as f64 } else { f64::NAN })
            .collect()
    }
}

/// Drop connected components of `mask` with fewer than `min_size` pixels.
pub fn remove_small_components(
    mask: &Grid2<bool>,
    min_size: usize,
    connectivity: Connectivity,
) -> Grid2<bool> {
    if min_size <= 1 {
        return mask.clone();
    }
    let label_map = LabelMap::from_mask(mask, connectivity);
    let keep: Vec<bool> = label_map
        .regions()
        .iter()
        .map(|region| region.area >= min_size)
        .collect();
    label_map
        .labels()
        .map(|&label| label != 0 && keep[(label - 1) as usize])
}

// ============================================================================
// Union-Find
// ============================================================================

#[derive(Debug)]
struct UnionFind {
    parent: Vec<u32>,
    next_label: u32,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::with_capacity(256),
            next_label: 1,
        }
    }

    #[inline]
    fn make_set(&mut self) -> u32 {
        let label = self.next_label;
        self.parent.push(label);
        self.next_label += 1;
        label
    }

    /// Find root with two-pass path compression.
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        loop {
            let parent = self.parent[(root - 1) as usize];
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = label;
        while current != root {
            let idx = (current - 1) as usize;
            let parent = self.parent[idx];
            self.parent[idx] = root;
            current = parent;
        }

        root
    }

    /// Union keeps the smaller label as root, so a component's root is the
    /// first label created for it.
    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[(larger - 1) as usize] = smaller;
        }
    }

    /// Rewrite provisional labels to sequential `1..=n`.
    fn flatten_labels(&mut self, labels: &mut [u32]) -> usize {
        if self.parent.is_empty() {
            return 0;
        }

        let len = self.parent.len();
        let mut label_map = vec![0u32; len + 1];
        let mut num_labels = 0u32;

        for i in 1..=len as u32 {
            let root = self.find(i);
            if label_map[root as usize] == 0 {
                num_labels += 1;
                label_map[root as usize] = num_labels;
            }
            label_map[i as usize] = label_map[root as usize];
        }

        for l in labels.iter_mut() {
            if *l != 0 {
                *l = label_map[*l as usize];
            }
        }

        num_labels as usize
    }
}
