use super::WalkTimeRecord;

/// Concatenates per-partition records.
///
/// Partitions hold disjoint origins, so no deduplication is needed. The
/// order of the result carries no meaning.
pub fn merge_partitions(partitions: Vec<Vec<WalkTimeRecord>>) -> Vec<WalkTimeRecord> {
    let total = partitions.iter().map(Vec::len).sum();
    let mut records = Vec::with_capacity(total);
    for partition in partitions {
        records.extend(partition);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_every_record() {
        let merged = merge_partitions(vec![
            vec![
                WalkTimeRecord::new(1, 10, 5.0),
                WalkTimeRecord::new(1, 11, 10.0),
            ],
            vec![],
            vec![WalkTimeRecord::new(2, 10, 5.0)],
        ]);

        assert_eq!(merged.len(), 3);
        assert!(merged.contains(&WalkTimeRecord::new(2, 10, 5.0)));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(merge_partitions(Vec::new()).is_empty());
    }
}
