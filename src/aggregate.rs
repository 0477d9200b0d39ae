//
// aggregate.rs
// Dicom-Preprocessor-rs
//
// Groups image records into series and studies and fixes their final order once all input is in.
//
// Thales Matheus Mendonça Santos - November 2025

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{SeriesInfo, StudyInfo};
use crate::record::ImageRecord;

/// Records of one series in final order.
///
/// Only [`Aggregator::finalize`] builds these, so `records` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    pub uid: String,
    records: Vec<ImageRecord>,
}

impl SeriesGroup {
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Series attributes as reported by the first record in final order.
    pub fn info(&self) -> &SeriesInfo {
        &self.records[0].metadata.series
    }

    pub fn first(&self) -> &ImageRecord {
        &self.records[0]
    }
}

/// Series of one study in final order, plus the study attributes of its first-seen record.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyGroup {
    pub uid: String,
    pub info: StudyInfo,
    pub series: Vec<SeriesGroup>,
}

impl StudyGroup {
    pub fn image_count(&self) -> usize {
        self.series.iter().map(|s| s.records.len()).sum()
    }
}

#[derive(Debug)]
struct PendingSeries {
    uid: String,
    // Series number of the first record to arrive; the series sort key.
    number: i64,
    records: Vec<ImageRecord>,
}

#[derive(Debug)]
struct PendingStudy {
    uid: String,
    representative: StudyInfo,
    series: Vec<PendingSeries>,
    series_index: HashMap<String, usize>,
}

/// Two-level study -> series -> records index, filled incrementally and
/// ordered only in [`Aggregator::finalize`].
#[derive(Debug, Default)]
pub struct Aggregator {
    studies: Vec<PendingStudy>,
    study_index: HashMap<String, usize>,
    records: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Add a record under its `(study UID, series UID)` key.
    pub fn push(&mut self, record: ImageRecord) {
        let study_uid = record.metadata.study.uid.clone();
        let series_uid = record.metadata.series.uid.clone();

        let study_pos = match self.study_index.get(&study_uid) {
            Some(&pos) => pos,
            None => {
                self.studies.push(PendingStudy {
                    uid: study_uid.clone(),
                    representative: record.metadata.study.clone(),
                    series: Vec::new(),
                    series_index: HashMap::new(),
                });
                self.study_index.insert(study_uid, self.studies.len() - 1);
                self.studies.len() - 1
            }
        };
        let study = &mut self.studies[study_pos];

        let series_pos = match study.series_index.get(&series_uid) {
            Some(&pos) => pos,
            None => {
                study.series.push(PendingSeries {
                    uid: series_uid.clone(),
                    number: record.metadata.series.number,
                    records: Vec::new(),
                });
                study.series_index.insert(series_uid, study.series.len() - 1);
                study.series.len() - 1
            }
        };

        study.series[series_pos].records.push(record);
        self.records += 1;
    }

    /// Order everything and hand out the immutable study list.
    ///
    /// Slices: `(instance number, slice location)` ascending. Series: series
    /// number of the first record seen; equal numbers keep arrival order.
    /// Studies: raw `(date, time)` strings compared lexicographically, then UID.
    pub fn finalize(self) -> Vec<StudyGroup> {
        let mut studies: Vec<StudyGroup> = self
            .studies
            .into_iter()
            .map(|pending| {
                let mut series = pending.series;
                series.sort_by_key(|s| s.number);
                StudyGroup {
                    uid: pending.uid,
                    info: pending.representative,
                    series: series
                        .into_iter()
                        .map(|mut s| {
                            s.records.sort_by(compare_slices);
                            SeriesGroup {
                                uid: s.uid,
                                records: s.records,
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        studies.sort_by(|a, b| {
            (&a.info.date, &a.info.time, &a.uid).cmp(&(&b.info.date, &b.info.time, &b.uid))
        });
        studies
    }
}

fn compare_slices(a: &ImageRecord, b: &ImageRecord) -> Ordering {
    a.metadata
        .instance_number
        .cmp(&b.metadata.instance_number)
        .then_with(|| {
            a.metadata
                .slice_location
                .total_cmp(&b.metadata.slice_location)
        })
}
