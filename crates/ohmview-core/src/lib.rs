//! Hardware-monitor domain adapter over [`ohmview_wmi`].
//!
//! This crate registers the concrete classes exposed by an
//! OpenHardwareMonitor-style namespace and puts a typed surface on top of
//! the generic wrapper layer:
//!
//! - **[`HardwareMonitor`]** — session facade: connects the
//!   `root/OpenHardwareMonitor` namespace, enumerates hardware in the
//!   known-type order, and exposes first-of-type lookups, the flat sensor
//!   list, and refresh.
//!
//! - **[`Hardware`] / [`Sensor`]** — typed wrappers: static identity
//!   attributes read from the cache, sensor value/min/max read live on
//!   every access. [`SensorType::unit`] maps each sensor type to its
//!   display unit; formatting itself is the caller's job — this crate
//!   only ever returns values.
//!
//! - **[`win32`]** — the `root/cimv2` classes this project touches
//!   (operating system, process), deliberately not fully mapped.
//!
//! - **[`ProcessWatch`]** — process-discovery boundary: "is the monitored
//!   process running" and a bounded wait that returns a sentinel on
//!   expiry instead of blocking forever.
//!
//! Like the layer below, everything here is single-threaded and blocking;
//! the polling loop that drives a display lives outside this crate.

pub mod hardware;
pub mod monitor;
pub mod process;
pub mod sensor;
pub mod win32;

pub use hardware::{HARDWARE, Hardware, HardwareType};
pub use monitor::{HardwareMonitor, NAMESPACE_PATH, PROCESS_NAME};
pub use process::ProcessWatch;
pub use sensor::{SENSOR, Sensor, SensorMap, SensorType, group_sensors};

// The domain adapter shares the wrapper layer's error type; nothing here
// adds failure modes of its own.
pub use ohmview_wmi::{Error, Result};
