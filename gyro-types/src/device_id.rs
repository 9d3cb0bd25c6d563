use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Packed sensor device identifier.
///
/// Layout, least significant bit first:
///  - bits 0..3: bus type
///  - bits 3..8: bus index
///  - bits 8..16: address on the bus
///  - bits 16..24: device type
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Display, Serialize, Deserialize,
)]
#[display(fmt = "{:#08x}", _0)]
#[serde(transparent)]
pub struct DeviceId(u32);

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum DeviceBusType {
    Unknown,
    I2c,
    Spi,
    Uavcan,
    Simulation,
    Serial,
    Mavlink,
}

impl From<u8> for DeviceBusType {
    fn from(v: u8) -> Self {
        use DeviceBusType::*;
        match v {
            1 => I2c,
            2 => Spi,
            3 => Uavcan,
            4 => Simulation,
            5 => Serial,
            6 => Mavlink,
            _ => Unknown,
        }
    }
}

impl From<DeviceBusType> for u8 {
    fn from(v: DeviceBusType) -> Self {
        use DeviceBusType::*;
        match v {
            Unknown => 0,
            I2c => 1,
            Spi => 2,
            Uavcan => 3,
            Simulation => 4,
            Serial => 5,
            Mavlink => 6,
        }
    }
}

const BUS_TYPE_MASK: u32 = 0x07;
const BUS_SHIFT: u32 = 3;
const BUS_MASK: u32 = 0x1f;
const ADDRESS_SHIFT: u32 = 8;
const DEVTYPE_SHIFT: u32 = 16;

impl DeviceId {
    pub const fn from_raw(raw: u32) -> Self {
        DeviceId(raw)
    }

    pub fn new(bus_type: DeviceBusType, bus: u8, address: u8, devtype: u8) -> Self {
        let raw = (u32::from(u8::from(bus_type)) & BUS_TYPE_MASK)
            | ((u32::from(bus) & BUS_MASK) << BUS_SHIFT)
            | (u32::from(address) << ADDRESS_SHIFT)
            | (u32::from(devtype) << DEVTYPE_SHIFT);
        DeviceId(raw)
    }

    pub fn as_raw(&self) -> u32 {
        self.0
    }

    pub fn bus_type(&self) -> DeviceBusType {
        DeviceBusType::from((self.0 & BUS_TYPE_MASK) as u8)
    }

    pub fn bus(&self) -> u8 {
        ((self.0 >> BUS_SHIFT) & BUS_MASK) as u8
    }

    pub fn address(&self) -> u8 {
        (self.0 >> ADDRESS_SHIFT) as u8
    }

    pub fn devtype(&self) -> u8 {
        (self.0 >> DEVTYPE_SHIFT) as u8
    }

    /// Replaces the device type, leaving bus and address untouched.
    /// The top byte is not part of the layout and is preserved.
    pub fn with_devtype(self, devtype: u8) -> Self {
        let cleared = self.0 & !(0xff << DEVTYPE_SHIFT);
        DeviceId(cleared | (u32::from(devtype) << DEVTYPE_SHIFT))
    }
}

impl From<u32> for DeviceId {
    fn from(raw: u32) -> Self {
        DeviceId(raw)
    }
}

impl From<DeviceId> for u32 {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack() {
        let id = DeviceId::new(DeviceBusType::Spi, 1, 0x68, 0x26);
        assert_eq!(id.bus_type(), DeviceBusType::Spi);
        assert_eq!(id.bus(), 1);
        assert_eq!(id.address(), 0x68);
        assert_eq!(id.devtype(), 0x26);
        assert_eq!(id.as_raw(), 0x0026_680a);
    }

    #[test]
    fn set_devtype_keeps_bus_fields() {
        let id = DeviceId::from_raw(0xab12_3456).with_devtype(0x42);
        assert_eq!(id.as_raw(), 0xab42_3456);
        assert_eq!(id.address(), 0x34);
    }

    #[test]
    fn display_hex() {
        assert_eq!(DeviceId::from_raw(0x26680a).to_string(), "0x26680a");
    }
}
