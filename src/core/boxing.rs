use crate::core::card::format_card_number;
use crate::domain::model::{BoxRecord, CardRow};
use crate::domain::ports::ProgressSink;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// A box together with the fraction of rows covered once it is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxEvent {
    pub record: BoxRecord,
    pub progress: f64,
}

/// Groups rows by branch name in first-seen order, keeping row order inside each group.
pub fn group_by_branch(rows: &[CardRow]) -> Vec<(&str, Vec<&CardRow>)> {
    let mut groups: Vec<(&str, Vec<&CardRow>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let branch = row.branch_name.as_str();
        let idx = *positions.entry(branch).or_insert_with(|| {
            groups.push((branch, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(row);
    }

    groups
}

/// Lazily cuts each branch into windows of at most `unit` rows.
///
/// Windows never cross a branch boundary. Box numbers follow emission
/// order across the whole input, starting at 1.
pub struct Boxes<'a> {
    groups: Vec<(&'a str, Vec<&'a CardRow>)>,
    unit: usize,
    total_rows: usize,
    group_idx: usize,
    offset: usize,
    processed: usize,
    emitted: usize,
}

impl<'a> Boxes<'a> {
    pub fn new(rows: &'a [CardRow], unit: NonZeroUsize) -> Self {
        Self {
            groups: group_by_branch(rows),
            unit: unit.get(),
            total_rows: rows.len(),
            group_idx: 0,
            offset: 0,
            processed: 0,
            emitted: 0,
        }
    }
}

impl Iterator for Boxes<'_> {
    type Item = BoxEvent;

    fn next(&mut self) -> Option<BoxEvent> {
        loop {
            let (branch, members) = self.groups.get(self.group_idx)?;
            if self.offset >= members.len() {
                self.group_idx += 1;
                self.offset = 0;
                continue;
            }

            let end = (self.offset + self.unit).min(members.len());
            let window = &members[self.offset..end];
            let (first, last) = (window[0], window[window.len() - 1]);

            self.offset = end;
            self.processed += window.len();
            self.emitted += 1;

            let record = BoxRecord {
                sequence_number: self.emitted,
                box_number: self.emitted,
                front_card: format_card_number(&first.card_number),
                back_card: format_card_number(&last.card_number),
                count: window.len(),
                branch_name: branch.to_string(),
                denomination: first.face_amount.clone(),
            };
            // total_rows > 0 whenever a window exists
            let progress = (self.processed as f64 / self.total_rows as f64).min(1.0);

            return Some(BoxEvent { record, progress });
        }
    }
}

/// Boxes every row, reporting progress after each emitted box.
///
/// An error from `progress` stops boxing at once and is returned as-is;
/// boxes produced so far are dropped. Empty input returns an empty list
/// without calling `progress`.
pub fn box_rows<P>(rows: &[CardRow], unit: NonZeroUsize, progress: &mut P) -> Result<Vec<BoxRecord>>
where
    P: ProgressSink + ?Sized,
{
    let mut records = Vec::new();
    for event in Boxes::new(rows, unit) {
        records.push(event.record);
        progress.report(event.progress)?;
    }

    tracing::debug!(
        "Boxed {} rows into {} boxes (unit {})",
        rows.len(),
        records.len(),
        unit
    );
    Ok(records)
}
