//! Signal output port trait.

use crate::domain::error::CarrytrendError;
use crate::domain::signal::{PassReport, TargetSignal};

/// Port consumed by the order/execution layer.
pub trait SignalSink {
    fn write(&mut self, signals: &[TargetSignal]) -> Result<(), CarrytrendError>;

    /// Default implementation: writes the signals of every report in order.
    fn write_reports(&mut self, reports: &[PassReport]) -> Result<(), CarrytrendError> {
        for report in reports {
            self.write(&report.signals)?;
        }
        Ok(())
    }
}
