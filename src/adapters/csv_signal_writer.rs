//! CSV signal writer for the order/execution layer.

use crate::domain::error::CarrytrendError;
use crate::domain::signal::TargetSignal;
use crate::domain::sizing::Direction;
use crate::ports::signal_port::SignalSink;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SignalRow<'a> {
    date: String,
    instrument: &'a str,
    contract: &'a str,
    forecast: f64,
    quantity: f64,
    direction: &'static str,
    valid_until: String,
}

impl<'a> From<&'a TargetSignal> for SignalRow<'a> {
    fn from(signal: &'a TargetSignal) -> Self {
        SignalRow {
            date: signal.date.format("%Y-%m-%d").to_string(),
            instrument: &signal.symbol,
            contract: &signal.contract,
            forecast: signal.forecast,
            quantity: signal.quantity,
            direction: match signal.direction {
                Direction::Up => "up",
                Direction::Down => "down",
            },
            valid_until: signal.valid_until.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

pub struct CsvSignalWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSignalWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W, CarrytrendError> {
        self.writer
            .into_inner()
            .map_err(|e| CarrytrendError::Io(e.into_error()))
    }
}

impl<W: Write> SignalSink for CsvSignalWriter<W> {
    fn write(&mut self, signals: &[TargetSignal]) -> Result<(), CarrytrendError> {
        for signal in signals {
            self.writer
                .serialize(SignalRow::from(signal))
                .map_err(|e| CarrytrendError::Io(e.into()))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_signal(direction: Direction) -> TargetSignal {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        TargetSignal {
            date,
            symbol: "ES".into(),
            contract: "ESH24".into(),
            forecast: 12.5,
            quantity: 3.75,
            direction,
            valid_until: NaiveDate::from_ymd_opt(2024, 1, 16)
                .unwrap()
                .and_hms_opt(9, 29, 59)
                .unwrap(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut sink = CsvSignalWriter::new(Vec::new());
        sink.write(&[sample_signal(Direction::Up), sample_signal(Direction::Down)])
            .unwrap();
        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "date,instrument,contract,forecast,quantity,direction,valid_until"
        );
        assert_eq!(lines[1], "2024-01-15,ES,ESH24,12.5,3.75,up,2024-01-16T09:29:59");
        assert_eq!(lines[2], "2024-01-15,ES,ESH24,12.5,3.75,down,2024-01-16T09:29:59");
    }

    #[test]
    fn empty_write_produces_nothing() {
        let mut sink = CsvSignalWriter::new(Vec::new());
        sink.write(&[]).unwrap();
        assert!(sink.into_inner().unwrap().is_empty());
    }
}
