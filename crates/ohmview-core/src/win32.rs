// ── Win32 classes ──
//
// The couple of `root/cimv2` classes this project touches. Deliberately
// not fully mapped — the remote classes carry far more attributes than a
// monitoring display will ever read.

use std::rc::Rc;

use ohmview_wmi::{
    ClassDescriptor, ConnectionOverrides, Instance, Namespace, Result, Selector, Transport,
};

/// Default namespace for the Win32 classes.
pub const CIMV2_NAMESPACE: &str = "root/cimv2";

/// Adapter defaults for a cimv2 namespace.
pub fn cimv2_overrides() -> ConnectionOverrides {
    ConnectionOverrides::new().namespace_path(CIMV2_NAMESPACE)
}

/// `Win32_OperatingSystem`, registered locally as `OperatingSystem`.
pub const OPERATING_SYSTEM: ClassDescriptor = ClassDescriptor::new(
    "OperatingSystem",
    "Name",
    &[
        "Name",
        "Caption",
        "CSName",
        "Version",
        "SystemDrive",
        "TotalVisibleMemorySize",
        "LastBootUpTime",
    ],
    &[
        "FreePhysicalMemory",
        "FreeVirtualMemory",
        "NumberOfProcesses",
        "Status",
    ],
)
.remote("Win32_OperatingSystem");

/// `Win32_Process`, registered locally as `Process` (the natural name is
/// reserved for the wrapper's own vocabulary).
pub const PROCESS: ClassDescriptor = ClassDescriptor::new(
    "Process",
    "ProcessId",
    &["Name", "ProcessId", "ExecutablePath"],
    &["WorkingSetSize"],
)
.remote("Win32_Process");

/// Typed wrapper over the (single) operating-system instance.
#[derive(Debug)]
pub struct OperatingSystem<T: Transport> {
    instance: Rc<Instance<T>>,
}

impl<T: Transport> OperatingSystem<T> {
    /// Find the installed operating system in `namespace` (which must
    /// have [`OPERATING_SYSTEM`] registered).
    pub fn find(namespace: &Namespace<T>) -> Result<Self> {
        let instance = namespace.instance_of("OperatingSystem", &Selector::new())?;
        Ok(Self { instance })
    }

    pub fn name(&self) -> Result<String> {
        self.instance.static_str("Name")
    }

    pub fn caption(&self) -> Result<String> {
        self.instance.static_str("Caption")
    }

    pub fn computer_name(&self) -> Result<String> {
        self.instance.static_str("CSName")
    }

    pub fn version(&self) -> Result<String> {
        self.instance.static_str("Version")
    }

    pub fn system_drive(&self) -> Result<String> {
        self.instance.static_str("SystemDrive")
    }

    /// Total visible physical memory, in kilobytes.
    pub fn total_visible_memory_kb(&self) -> Result<i64> {
        self.instance.static_i64("TotalVisibleMemorySize")
    }

    /// Boot time as the transport's native datetime string.
    pub fn last_boot_up_time(&self) -> Result<String> {
        self.instance.static_str("LastBootUpTime")
    }

    // Live counters, one query per read.

    pub fn free_physical_memory_kb(&self) -> Result<i64> {
        self.instance.dynamic_i64("FreePhysicalMemory")
    }

    pub fn free_virtual_memory_kb(&self) -> Result<i64> {
        self.instance.dynamic_i64("FreeVirtualMemory")
    }

    pub fn number_of_processes(&self) -> Result<i64> {
        self.instance.dynamic_i64("NumberOfProcesses")
    }

    pub fn status(&self) -> Result<String> {
        self.instance.dynamic_str("Status")
    }

    pub fn instance(&self) -> &Rc<Instance<T>> {
        &self.instance
    }
}
