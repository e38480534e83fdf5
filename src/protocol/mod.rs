//! USB to CAN bridge protocol: control requests, device-side endpoint
//! multiplexer, host-side transfer engine, and the shared transport types.

pub mod control;
pub mod device;
pub mod host;
pub mod transport;

/// USB vendor id of the bridge (enumeration itself is out of scope here;
/// the id is part of the interface contract with the device firmware).
pub const VENDOR_ID: u16 = 0xCAFE;
/// USB product id of the bridge.
pub const PRODUCT_ID: u16 = 0xCAFE;
