pub use crate::device_id::{DeviceBusType, DeviceId};
pub use crate::rotation::{Rotation, UnknownRotation};
pub use crate::sample::{FifoSample, RawSample, SampleError, MAX_BURST};
pub use crate::time::Microseconds;
