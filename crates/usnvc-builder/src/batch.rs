//! Sequential batch traversal

use tracing::{info, warn};
use usnvc_core::{ChangeObserver, UnitDocument, UnitId};
use usnvc_source::SourceReader;

use crate::builder::UnitBuilder;
use crate::config::BuildConfig;
use crate::error::BuildError;

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents handed to the sink
    pub built: usize,
    /// Ids with no row in the `Unit` table
    pub missing: Vec<UnitId>,
}

impl BatchReport {
    /// Fold another report into this one
    pub fn merge(&mut self, other: BatchReport) {
        self.built += other.built;
        self.missing.extend(other.missing);
    }
}

/// Build every id in turn and hand each document to `sink`
///
/// A missing unit is recorded and skipped; any other error ends the run.
pub fn build_each<I, F>(
    reader: &SourceReader,
    config: &BuildConfig,
    ids: I,
    observer: &dyn ChangeObserver,
    mut sink: F,
) -> Result<BatchReport, BuildError>
where
    I: IntoIterator<Item = UnitId>,
    F: FnMut(UnitDocument),
{
    let builder = UnitBuilder::new(reader, config).with_observer(observer);
    let mut report = BatchReport::default();

    for id in ids {
        match builder.build(id) {
            Ok(doc) => {
                sink(doc);
                report.built += 1;
            }
            Err(BuildError::UnitNotFound(missing)) => {
                warn!(unit_id = %missing, "Unit not found, skipping");
                report.missing.push(missing);
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        built = report.built,
        missing = report.missing.len(),
        "Batch complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_reports() {
        let mut total = BatchReport {
            built: 2,
            missing: vec![UnitId::new(9)],
        };
        total.merge(BatchReport {
            built: 3,
            missing: vec![UnitId::new(11)],
        });
        assert_eq!(total.built, 5);
        assert_eq!(total.missing, vec![UnitId::new(9), UnitId::new(11)]);
    }
}
