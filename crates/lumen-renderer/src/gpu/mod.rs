//! GPU setup: device, surface, limits, buffers and read-back

pub mod buffers;
pub mod device;
pub mod limits;
pub mod readback;
pub mod surface;

pub use buffers::GeometryBuffers;
pub use device::{DeviceManager, DeviceOptions, GpuReport};
pub use limits::GeometryLimits;
pub use readback::{map_read, read_buffer};
pub use surface::SurfaceManager;
