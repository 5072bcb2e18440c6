//! Decides which device images a bindings document produces.
//!
//! # Why de-duplicate? (for beginners)
//!
//! Several catalog records can share physical devices.  A throttle-and-stick
//! combo, for example, is listed both as its own record and as part of a
//! "combined" record.  Records are visited in catalog order; once an image
//! has been produced for a record, every device it handles is marked as
//! covered, and a later record whose key devices are all covered produces
//! no second image.

use std::collections::HashSet;

use refcard_core::domain::model::device_spec;
use refcard_core::domain::modifier::KEYBOARD_DEVICE;
use refcard_core::{DeviceCatalog, DeviceUsage};

/// One device image the card will contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelection {
    /// `SupportedDevice::index`, unique within one card.
    pub id: String,
    /// Catalog record name.
    pub supported_device: String,
    /// Output file stem: the template for index 0, `template-index` otherwise.
    pub name: String,
    pub template: String,
    pub handled_devices: Vec<String>,
    pub device_index: u32,
}

/// Selects one image per (record, device index) with new bindings.
///
/// The keyboard is never selected here; it gets the summary sheet instead
/// (see [`wants_keyboard_sheet`]).
pub fn select_device_images(
    devices: &DeviceCatalog,
    usage: &DeviceUsage,
    device_indices: &[u32],
) -> Vec<ImageSelection> {
    let mut already_handled: HashSet<String> = HashSet::new();
    let mut images = Vec::new();

    for (name, record) in devices.supported() {
        if name == KEYBOARD_DEVICE {
            continue;
        }
        for &device_index in device_indices {
            let used = record
                .key_devices()
                .iter()
                .any(|device| usage.is_supported(device, device_index));
            if !used {
                continue;
            }
            let has_new_bindings = record
                .key_devices()
                .iter()
                .any(|device| !already_handled.contains(&device_spec(device, device_index)));
            if !has_new_bindings {
                continue;
            }

            images.push(ImageSelection {
                id: device_spec(name, device_index),
                supported_device: name.to_string(),
                name: image_name(&record.template, device_index),
                template: record.template.clone(),
                handled_devices: record.handled_devices.clone(),
                device_index,
            });
            already_handled.extend(
                record
                    .handled_devices
                    .iter()
                    .map(|device| device_spec(device, device_index)),
            );
        }
    }
    images
}

/// `true` when the document binds anything on the first keyboard.
pub fn wants_keyboard_sheet(usage: &DeviceUsage) -> bool {
    usage.is_supported(KEYBOARD_DEVICE, 0)
}

fn image_name(template: &str, device_index: u32) -> String {
    if device_index == 0 {
        template.to_string()
    } else {
        format!("{template}-{device_index}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
