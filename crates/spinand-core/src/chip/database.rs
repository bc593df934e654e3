//! Static descriptor table and READ_ID resolution
//!
//! Vendors do not agree on where the manufacturer byte sits in the READ_ID
//! response. Toshiba sends a dummy byte first and reports the manufacturer
//! one byte late, GigaDevice reports it immediately. The table is therefore
//! matched in two tiers: each vendor entry names the response offset of its
//! manufacturer byte, and the device byte follows it.

use crate::error::{Error, Result};

use super::types::{DeviceGeometry, NandChip};

/// Number of bytes clocked in after the READ_ID opcode
pub const ID_RESPONSE_LEN: usize = 3;

/// Toshiba manufacturer byte (TC58CVx family)
pub const MFR_TOSHIBA: u8 = 0x98;
/// GigaDevice manufacturer byte (GD5FxGQ4x family)
pub const MFR_GIGADEVICE: u8 = 0xC8;

/// Tier one of the table: one vendor and its devices
#[derive(Debug)]
pub struct VendorEntry {
    /// Vendor name
    pub vendor: &'static str,
    /// Manufacturer byte
    pub manufacturer_id: u8,
    /// Offset of the manufacturer byte in the READ_ID response
    pub id_offset: usize,
    /// Tier two: devices of this vendor
    pub chips: &'static [NandChip],
}

const TOSHIBA_CHIPS: &[NandChip] = &[NandChip {
    vendor: "Toshiba",
    name: "TC58CVG2S0HxAIx",
    manufacturer_id: MFR_TOSHIBA,
    device_id: 0xCD,
    geometry: DeviceGeometry::new(4096, 64, 2048),
}];

const GIGADEVICE_CHIPS: &[NandChip] = &[
    NandChip {
        vendor: "GigaDevice",
        name: "GD5F1GQ4R",
        manufacturer_id: MFR_GIGADEVICE,
        device_id: 0xA1,
        geometry: DeviceGeometry::new(2048, 64, 1024),
    },
    NandChip {
        vendor: "GigaDevice",
        name: "GD5F2GQ4R",
        manufacturer_id: MFR_GIGADEVICE,
        device_id: 0xA2,
        geometry: DeviceGeometry::new(2048, 64, 2048),
    },
    NandChip {
        vendor: "GigaDevice",
        name: "GD5F1GQ4U",
        manufacturer_id: MFR_GIGADEVICE,
        device_id: 0xB1,
        geometry: DeviceGeometry::new(2048, 64, 1024),
    },
    NandChip {
        vendor: "GigaDevice",
        name: "GD5F2GQ4U",
        manufacturer_id: MFR_GIGADEVICE,
        device_id: 0xB2,
        geometry: DeviceGeometry::new(2048, 64, 2048),
    },
];

/// Known vendors, in match order
pub static VENDORS: &[VendorEntry] = &[
    VendorEntry {
        vendor: "Toshiba",
        manufacturer_id: MFR_TOSHIBA,
        id_offset: 1,
        chips: TOSHIBA_CHIPS,
    },
    VendorEntry {
        vendor: "GigaDevice",
        manufacturer_id: MFR_GIGADEVICE,
        id_offset: 0,
        chips: GIGADEVICE_CHIPS,
    },
];

/// Resolve a READ_ID response to a known chip
///
/// The first vendor whose manufacturer byte matches at its offset decides
/// the outcome: an unknown device byte under a matched vendor is
/// `UnknownDevice`, later vendors are not tried.
pub fn identify(id: &[u8; ID_RESPONSE_LEN]) -> Result<&'static NandChip> {
    for entry in VENDORS {
        if id[entry.id_offset] != entry.manufacturer_id {
            continue;
        }
        let device = id[entry.id_offset + 1];
        return entry
            .chips
            .iter()
            .find(|chip| chip.device_id == device)
            .ok_or(Error::UnknownDevice {
                manufacturer: entry.manufacturer_id,
                device,
            });
    }

    Err(Error::UnknownDevice {
        manufacturer: id[0],
        device: id[1],
    })
}

/// Iterate over all known chips
pub fn all_chips() -> impl Iterator<Item = &'static NandChip> {
    VENDORS.iter().flat_map(|entry| entry.chips.iter())
}

/// Find a chip by part name (case-insensitive)
pub fn find_by_name(name: &str) -> Option<&'static NandChip> {
    all_chips().find(|chip| chip.name.eq_ignore_ascii_case(name))
}

/// Build the READ_ID response a chip produces
///
/// Bytes outside the vendor's manufacturer/device window are zero.
pub fn id_response(chip: &NandChip) -> [u8; ID_RESPONSE_LEN] {
    let mut id = [0u8; ID_RESPONSE_LEN];
    let offset = VENDORS
        .iter()
        .find(|entry| entry.manufacturer_id == chip.manufacturer_id)
        .map(|entry| entry.id_offset)
        .unwrap_or(0);
    id[offset] = chip.manufacturer_id;
    id[offset + 1] = chip.device_id;
    id
}
