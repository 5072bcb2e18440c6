//! Fills the card-level advisory channels once images have been chosen.
//!
//! The misconfiguration channel is filled during label assignment; the
//! channels here only need the device usage of the whole document.

use std::collections::BTreeSet;

use refcard_core::{Advisory, DeviceCatalog, DeviceUsage, DocumentParseError, Warnings};
use tracing::warn;
use uuid::Uuid;

/// Devices that are commonly bound but never drawn (mice, head trackers,
/// virtual joysticks).  They produce no unhandled-device advisory.
pub const DEFAULT_BENIGN_DEVICES: [&str; 5] = ["Mouse::0", "ArduinoLeonardo::0", "vJoy::0", "vJoy::1", "16D00AEA::0"];

pub fn default_benign_devices() -> Vec<String> {
    DEFAULT_BENIGN_DEVICES.iter().map(|d| d.to_string()).collect()
}

pub const NO_BINDINGS_MESSAGE: &str =
    "The file supplied does not have any bindings for a supported controller or keyboard.";

/// Appends every used device no catalog record handles.
///
/// Devices listed in `benign` as `Device::Index` are skipped.
pub fn report_unhandled_devices(usage: &DeviceUsage, benign: &[String], run_id: Uuid, advisory: &mut Advisory) {
    for (spec, supported) in usage.iter() {
        if supported.is_some() || benign.iter().any(|b| b == spec) {
            continue;
        }
        warn!(%run_id, device = spec, "found unsupported device");
        advisory.append(spec, |first| {
            format!(
                "Unknown controller detected. You have a device that is not supported at this time; \
                 please report it with the reference \"{run_id}\". Unsupported devices: {first}"
            )
        });
    }
}

/// Names each distinct mapping software behind a used, supported device.
pub fn report_device_software(usage: &DeviceUsage, devices: &DeviceCatalog, advisory: &mut Advisory) {
    let software: BTreeSet<&str> = usage
        .iter()
        .filter_map(|(_, supported)| supported)
        .filter_map(|name| devices.record(name))
        .filter_map(|record| record.mapping_software.as_deref())
        .collect();
    for name in software {
        advisory.append(name, |first| {
            format!(
                "Mapping software detected. Controls remapped outside the game may not show up; \
                 if some are missing, remove the mapping and bind them in the game instead. Software in use: {first}"
            )
        });
    }
}

/// Message for a document that could not be read at all.
pub fn parse_error_message(err: &DocumentParseError) -> String {
    format!("The bindings file could not be read: {err}")
}

/// Sets the errors channel when the card would otherwise be silently empty.
pub fn report_no_bindings(image_count: usize, warnings: &mut Warnings) {
    if image_count == 0
        && warnings.errors.is_empty()
        && warnings.misconfiguration.is_empty()
        && warnings.unhandled_devices.is_empty()
    {
        warnings.errors.set(NO_BINDINGS_MESSAGE);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
