//! Run-length counting over pre-sorted position records.
//!
//! The bar charts need one `(group, category, count)` bucket per maximal
//! contiguous run of identical category values. Callers sort so that equal
//! categories are contiguous; on unsorted input the same category simply
//! yields one bucket per run, which is the documented behavior rather than
//! an error.

use crate::domain::model::{CountBucket, GroupField, PositionRecord};

enum RunState {
    NotStarted,
    InRun {
        group: String,
        category: String,
        count: usize,
    },
}

/// Counts maximal runs of identical `category` values, in input order.
///
/// A bucket's group is the group value of the run's *last* record. Group
/// homogeneity within a run is a precondition on the caller's sort order and
/// is not validated here. Empty input produces no buckets.
pub fn count_runs<T, G, C>(records: &[T], group: G, category: C) -> Vec<CountBucket>
where
    G: Fn(&T) -> &str,
    C: Fn(&T) -> &str,
{
    let mut buckets = Vec::new();
    let mut state = RunState::NotStarted;

    for record in records {
        state = match state {
            RunState::NotStarted => RunState::InRun {
                group: group(record).to_string(),
                category: category(record).to_string(),
                count: 1,
            },
            RunState::InRun {
                group: run_group,
                category: run_category,
                count,
            } => {
                if category(record) != run_category {
                    buckets.push(CountBucket {
                        group: run_group,
                        category: run_category,
                        count,
                    });
                    RunState::InRun {
                        group: group(record).to_string(),
                        category: category(record).to_string(),
                        count: 1,
                    }
                } else {
                    // the run's group tracks its most recent record
                    RunState::InRun {
                        group: group(record).to_string(),
                        category: run_category,
                        count: count + 1,
                    }
                }
            }
        };
    }

    if let RunState::InRun {
        group,
        category,
        count,
    } = state
    {
        buckets.push(CountBucket {
            group,
            category,
            count,
        });
    }

    buckets
}

/// Survey-status counts per group attribute, the way the bar charts consume
/// them: sort by `(group, SURVEY_STATUS)`, then count runs of equal status.
pub fn stopped_position_counts(
    records: &[PositionRecord],
    group: GroupField,
) -> Vec<CountBucket> {
    let mut sorted: Vec<&PositionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.field(group)
            .cmp(b.field(group))
            .then_with(|| a.survey_status.cmp(&b.survey_status))
    });

    count_runs(&sorted, |r| r.field(group), |r| r.survey_status.as_str())
}
