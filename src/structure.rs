//! Structure analyzer (spec.md §4.2).
//!
//! A two-pass walk over a file's lines: the first pass tallies a
//! column count per non-empty line, the second groups contiguous runs
//! of the same count into header/data [`ColumnGroup`]s. Also derives
//! the narrow range-column heuristic (spec.md §3, §9) that suppresses
//! TL-based thresholds on column 0.

/// A contiguous run of lines sharing one column count.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub start_line: usize,
    pub end_line: usize,
    pub column_count: usize,
    pub is_header: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FileStructure {
    pub groups: Vec<ColumnGroup>,
    pub mode_column_count: usize,
    pub column1_is_range_data: bool,
}

impl FileStructure {
    /// The `(column_count, is_header)` signature used for cross-file
    /// structure compatibility checks (spec.md §4.2).
    pub fn signature(&self) -> Vec<(usize, bool)> {
        self.groups
            .iter()
            .map(|g| (g.column_count, g.is_header))
            .collect()
    }
}

/// Counts the logical columns on one line: whitespace tokens, with a
/// parenthesized `(re, im)` span collapsed into a single column (it is
/// one source field even though it later expands into two elements).
pub fn count_columns(line: &str) -> usize {
    let raw: Vec<&str> = line.split_whitespace().collect();
    let mut count = 0;
    let mut i = 0;
    while i < raw.len() {
        count += 1;
        if raw[i].starts_with('(') {
            while i < raw.len() && !raw[i].ends_with(')') {
                i += 1;
            }
        }
        i += 1;
    }
    count
}

/// Analyzes a file's lines (1-indexed in the returned groups, matching
/// the rest of the crate's line-number convention).
pub fn analyze_structure(lines: &[&str]) -> FileStructure {
    let non_empty: Vec<(usize, usize)> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(idx, l)| (idx + 1, count_columns(l)))
        .collect();

    if non_empty.is_empty() {
        return FileStructure::default();
    }

    let mode_column_count = mode_with_last_occurrence_tiebreak(&non_empty);

    let mut groups = Vec::new();
    let mut iter = non_empty.iter().peekable();
    while let Some(&(start, count)) = iter.next() {
        let mut end = start;
        while let Some(&&(next_line, next_count)) = iter.peek() {
            if next_count == count {
                end = next_line;
                iter.next();
            } else {
                break;
            }
        }
        groups.push(ColumnGroup {
            start_line: start,
            end_line: end,
            column_count: count,
            is_header: count != mode_column_count,
        });
    }

    FileStructure {
        groups,
        mode_column_count,
        column1_is_range_data: false,
    }
}

/// Picks the most frequent column count. Ties break toward the count
/// whose last occurrence is later in the file — matches observed
/// behavior per spec.md §4.2.
fn mode_with_last_occurrence_tiebreak(non_empty: &[(usize, usize)]) -> usize {
    use std::collections::HashMap;
    let mut freq: HashMap<usize, usize> = HashMap::new();
    let mut last_seen: HashMap<usize, usize> = HashMap::new();
    for &(line, count) in non_empty {
        *freq.entry(count).or_insert(0) += 1;
        last_seen.insert(count, line);
    }
    freq.into_iter()
        .max_by(|(count_a, freq_a), (count_b, freq_b)| {
            freq_a
                .cmp(freq_b)
                .then_with(|| last_seen[count_a].cmp(&last_seen[count_b]))
        })
        .map(|(count, _)| count)
        .unwrap_or(0)
}

/// Range-column detection over the ordered column-0 values of the
/// data group(s): strictly non-decreasing, a fixed first difference
/// within 1% relative tolerance (and `>= 1e-10` absolute), starting
/// value below 100 (spec.md §3, §4.2).
pub fn detect_range_column(data_column0: &[f64]) -> bool {
    if data_column0.len() < 3 {
        return false;
    }
    if data_column0[0] >= 100.0 {
        return false;
    }
    if !data_column0.windows(2).all(|w| w[1] >= w[0]) {
        return false;
    }
    let delta = data_column0[1] - data_column0[0];
    if delta < 1e-10 {
        return false;
    }
    data_column0.windows(2).skip(1).all(|w| {
        let d = w[1] - w[0];
        ((d - delta) / delta).abs() <= 0.01
    })
}

/// Structure compatibility between two files: their group signatures
/// must match exactly. Mismatch does not halt analysis (spec.md
/// §4.2) — the comparator proceeds element-wise and records it.
pub fn structures_compatible(a: &FileStructure, b: &FileStructure) -> bool {
    a.signature() == b.signature()
}
