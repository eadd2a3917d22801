//! # Real-Time Status Decoding
//!
//! ESC/POS printers answer `DLE EOT n` with a single status byte. Each of the
//! four query classes labels the bits differently.
//!
//! | Class | Query | Interesting bits |
//! |-------|-------|------------------|
//! | Printer | 10 04 01 | 2 drawer pin, 3 offline, 5 waiting recovery, 6 feed button |
//! | Offline cause | 10 04 02 | 2 cover, 3 feed button, 5 paper end, 6 error |
//! | Error cause | 10 04 03 | 2 recoverable, 3 autocutter, 5 unrecoverable, 6 auto-recoverable |
//! | Roll paper sensor | 10 04 04 | 2+3 near-end, 5+6 paper end |
//!
//! Bits not listed are reported as `"Fixed"` with severity `ok`.
//!
//! ## Example
//!
//! ```
//! use tinta::status::{DeviceStatus, Severity, StatusClass};
//!
//! let status = DeviceStatus::decode(StatusClass::Printer, 0x08);
//! assert_eq!(status.bits, "00001000");
//! assert_eq!(status.statuses[3].label, "Offline");
//! assert_eq!(status.statuses[3].status, Severity::Error);
//! ```

use std::fmt;

use serde::Serialize;

use crate::protocol::commands;

/// Status query class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    #[serde(rename = "PrinterStatus")]
    Printer,
    #[serde(rename = "OfflineCauseStatus")]
    OfflineCause,
    #[serde(rename = "ErrorCauseStatus")]
    ErrorCause,
    #[serde(rename = "RollPaperSensorStatus")]
    RollPaperSensor,
}

impl StatusClass {
    /// Order in which [`crate::printer::Printer::get_statuses`] reports classes.
    pub const ALL: [StatusClass; 4] = [
        StatusClass::Printer,
        StatusClass::RollPaperSensor,
        StatusClass::OfflineCause,
        StatusClass::ErrorCause,
    ];

    /// The `n` in `DLE EOT n`.
    pub fn selector(self) -> u8 {
        match self {
            StatusClass::Printer => 1,
            StatusClass::OfflineCause => 2,
            StatusClass::ErrorCause => 3,
            StatusClass::RollPaperSensor => 4,
        }
    }

    /// # Transmit Real-Time Status (DLE EOT n)
    pub fn query(self) -> [u8; 3] {
        commands::status_query(self.selector())
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusClass::Printer => "PrinterStatus",
            StatusClass::OfflineCause => "OfflineCauseStatus",
            StatusClass::ErrorCause => "ErrorCauseStatus",
            StatusClass::RollPaperSensor => "RollPaperSensorStatus",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity of a decoded bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// Bit position: a single bit, or a sensor pair such as `"2,3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BitRef {
    Single(u8),
    Pair(String),
}

/// Bit value: `0`/`1`, or the pair's two digits such as `"11"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BitValue {
    Single(u8),
    Pair(String),
}

/// One labelled bit (or bit pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub bit: BitRef,
    pub value: BitValue,
    pub label: &'static str,
    pub status: Severity,
}

/// Decoded status byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub class_name: StatusClass,
    pub byte: u8,
    /// Bits, most significant first
    pub bits: String,
    /// Entries in ascending bit order
    pub statuses: Vec<StatusEntry>,
}

/// (set label, set severity, clear label) for bits 2, 3, 5, 6.
type BitLabels = [(&'static str, Severity, &'static str); 4];

const PRINTER: BitLabels = [
    (
        "Drawer kick-out connector pin 3 is HIGH",
        Severity::Ok,
        "Drawer kick-out connector pin 3 is LOW",
    ),
    ("Offline", Severity::Error, "Online"),
    ("Waiting for online recovery", Severity::Error, "Not waiting for online recovery"),
    ("Paper feed button is being pressed", Severity::Ok, "Paper feed button is not being pressed"),
];

const OFFLINE_CAUSE: BitLabels = [
    ("Cover is open", Severity::Error, "Cover is closed"),
    (
        "Paper is being fed by the paper feed button",
        Severity::Error,
        "Paper is not being fed by the paper feed button",
    ),
    ("Printing stops due to a paper-end", Severity::Error, "No paper-end stop"),
    ("Error occurred", Severity::Error, "No error"),
];

const ERROR_CAUSE: BitLabels = [
    ("Recoverable error occurred", Severity::Error, "No recoverable error"),
    ("Autocutter error occurred", Severity::Error, "No autocutter error"),
    ("Unrecoverable error occurred", Severity::Error, "No unrecoverable error"),
    ("Auto-recoverable error occurred", Severity::Error, "No auto-recoverable error"),
];

#[inline]
fn bit(byte: u8, i: u8) -> u8 {
    (byte >> i) & 1
}

fn fixed(byte: u8, i: u8) -> StatusEntry {
    StatusEntry {
        bit: BitRef::Single(i),
        value: BitValue::Single(bit(byte, i)),
        label: "Fixed",
        status: Severity::Ok,
    }
}

impl DeviceStatus {
    /// Decode one reply byte for `class`.
    pub fn decode(class: StatusClass, byte: u8) -> Self {
        let statuses = match class {
            StatusClass::Printer => decode_single(byte, &PRINTER),
            StatusClass::OfflineCause => decode_single(byte, &OFFLINE_CAUSE),
            StatusClass::ErrorCause => decode_single(byte, &ERROR_CAUSE),
            StatusClass::RollPaperSensor => decode_paper_sensor(byte),
        };
        Self {
            class_name: class,
            byte,
            bits: format!("{:08b}", byte),
            statuses,
        }
    }

    /// Highest severity among the entries.
    pub fn severity(&self) -> Severity {
        self.statuses
            .iter()
            .map(|entry| entry.status)
            .max()
            .unwrap_or(Severity::Ok)
    }

    pub fn is_ok(&self) -> bool {
        self.severity() == Severity::Ok
    }
}

fn decode_single(byte: u8, labels: &BitLabels) -> Vec<StatusEntry> {
    (0..8u8)
        .map(|i| {
            let slot = match i {
                2 => 0,
                3 => 1,
                5 => 2,
                6 => 3,
                _ => return fixed(byte, i),
            };
            let (set_label, set_status, clear_label) = labels[slot];
            let value = bit(byte, i);
            let (label, status) = if value == 1 {
                (set_label, set_status)
            } else {
                (clear_label, Severity::Ok)
            };
            StatusEntry {
                bit: BitRef::Single(i),
                value: BitValue::Single(value),
                label,
                status,
            }
        })
        .collect()
}

fn sensor_pair(
    byte: u8,
    lo: u8,
    [both_set, both_clear, mixed]: [&'static str; 3],
    set_status: Severity,
) -> StatusEntry {
    let (a, b) = (bit(byte, lo), bit(byte, lo + 1));
    let (label, status) = match (a, b) {
        (1, 1) => (both_set, set_status),
        (0, 0) => (both_clear, Severity::Ok),
        _ => (mixed, Severity::Ok),
    };
    StatusEntry {
        bit: BitRef::Pair(format!("{},{}", lo, lo + 1)),
        value: BitValue::Pair(format!("{}{}", a, b)),
        label,
        status,
    }
}

fn decode_paper_sensor(byte: u8) -> Vec<StatusEntry> {
    vec![
        fixed(byte, 0),
        fixed(byte, 1),
        sensor_pair(
            byte,
            2,
            [
                "Roll paper near-end sensor: paper near-end",
                "Roll paper near-end sensor: paper adequate",
                "Roll paper near-end sensor: indeterminate",
            ],
            Severity::Warning,
        ),
        fixed(byte, 4),
        sensor_pair(
            byte,
            5,
            [
                "Roll paper end sensor: paper not present",
                "Roll paper end sensor: paper present",
                "Roll paper end sensor: indeterminate",
            ],
            Severity::Error,
        ),
        fixed(byte, 7),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        assert_eq!(StatusClass::Printer.query(), [0x10, 0x04, 0x01]);
        assert_eq!(StatusClass::OfflineCause.query(), [0x10, 0x04, 0x02]);
        assert_eq!(StatusClass::ErrorCause.query(), [0x10, 0x04, 0x03]);
        assert_eq!(StatusClass::RollPaperSensor.query(), [0x10, 0x04, 0x04]);
    }

    #[test]
    fn test_printer_offline_bit() {
        let status = DeviceStatus::decode(StatusClass::Printer, 0x08);
        let entry = &status.statuses[3];
        assert_eq!(entry.bit, BitRef::Single(3));
        assert_eq!(entry.value, BitValue::Single(1));
        assert_eq!(entry.label, "Offline");
        assert_eq!(entry.status, Severity::Error);

        let status = DeviceStatus::decode(StatusClass::Printer, 0x00);
        assert_eq!(status.statuses[3].label, "Online");
        assert_eq!(status.statuses[3].status, Severity::Ok);
        assert!(status.is_ok());
    }

    #[test]
    fn test_printer_all_entries() {
        // bits 2 and 6 set: drawer HIGH, button pressed, both ok
        let status = DeviceStatus::decode(StatusClass::Printer, 0b0100_0100);
        assert_eq!(status.bits, "01000100");
        assert_eq!(status.statuses.len(), 8);
        let labels: Vec<_> = status.statuses.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Fixed",
                "Fixed",
                "Drawer kick-out connector pin 3 is HIGH",
                "Online",
                "Fixed",
                "Not waiting for online recovery",
                "Paper feed button is being pressed",
                "Fixed",
            ]
        );
        assert!(status.is_ok());
    }

    #[test]
    fn test_offline_cause_clear_is_ok() {
        let status = DeviceStatus::decode(StatusClass::OfflineCause, 0x00);
        assert_eq!(status.severity(), Severity::Ok);
        assert_eq!(status.statuses[2].label, "Cover is closed");

        let status = DeviceStatus::decode(StatusClass::OfflineCause, 0x04);
        assert_eq!(status.statuses[2].label, "Cover is open");
        assert_eq!(status.severity(), Severity::Error);
    }

    #[test]
    fn test_error_cause() {
        let status = DeviceStatus::decode(StatusClass::ErrorCause, 0x08);
        assert_eq!(status.statuses[3].label, "Autocutter error occurred");
        assert_eq!(status.statuses[5].label, "No unrecoverable error");
    }

    #[test]
    fn test_paper_sensor_pairs() {
        let status = DeviceStatus::decode(StatusClass::RollPaperSensor, 0b0000_1100);
        assert_eq!(status.statuses.len(), 6);
        let near_end = &status.statuses[2];
        assert_eq!(near_end.bit, BitRef::Pair("2,3".into()));
        assert_eq!(near_end.value, BitValue::Pair("11".into()));
        assert_eq!(near_end.label, "Roll paper near-end sensor: paper near-end");
        assert_eq!(near_end.status, Severity::Warning);
        assert_eq!(status.statuses[4].label, "Roll paper end sensor: paper present");
        assert_eq!(status.severity(), Severity::Warning);

        let status = DeviceStatus::decode(StatusClass::RollPaperSensor, 0b0110_0000);
        assert_eq!(status.statuses[4].label, "Roll paper end sensor: paper not present");
        assert_eq!(status.severity(), Severity::Error);

        let status = DeviceStatus::decode(StatusClass::RollPaperSensor, 0b0000_0100);
        assert_eq!(status.statuses[2].value, BitValue::Pair("10".into()));
        assert_eq!(status.statuses[2].label, "Roll paper near-end sensor: indeterminate");
    }

    #[test]
    fn test_json_shape() {
        let status = DeviceStatus::decode(StatusClass::RollPaperSensor, 0x0C);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["className"], "RollPaperSensorStatus");
        assert_eq!(json["byte"], 12);
        assert_eq!(json["bits"], "00001100");
        assert_eq!(json["statuses"][0]["bit"], 0);
        assert_eq!(json["statuses"][2]["bit"], "2,3");
        assert_eq!(json["statuses"][2]["value"], "11");
        assert_eq!(json["statuses"][2]["status"], "warning");
    }

    #[test]
    fn test_decode_is_pure() {
        for byte in 0..=255u8 {
            for class in StatusClass::ALL {
                assert_eq!(DeviceStatus::decode(class, byte), DeviceStatus::decode(class, byte));
            }
        }
    }
}
