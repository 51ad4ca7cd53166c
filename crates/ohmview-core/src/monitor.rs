// ── Hardware-monitor session facade ──
//
// Connects the OpenHardwareMonitor namespace, enumerates hardware in the
// known-type order, and keeps a type index plus a flat sensor list for
// cheap lookups. Instances come out of the namespace cache, so a
// refresh() updates exactly the objects held here.

use indexmap::IndexMap;
use strum::IntoEnumIterator;
use tracing::debug;

use ohmview_wmi::{
    ConnectionOverrides, ConnectionState, Connector, Namespace, Result, Selector, Transport,
};

use crate::hardware::{HARDWARE, Hardware, HardwareType};
use crate::sensor::{SENSOR, Sensor};

/// Namespace the remote monitor publishes its classes under.
pub const NAMESPACE_PATH: &str = "root/OpenHardwareMonitor";

/// Executable name of the remote monitor process.
pub const PROCESS_NAME: &str = "OpenHardwareMonitor.exe";

/// One monitoring session against a hardware-monitor namespace.
pub struct HardwareMonitor<T: Transport> {
    namespace: Namespace<T>,
    hardware: Vec<Hardware<T>>,
    by_type: IndexMap<HardwareType, Vec<usize>>,
    sensors: Vec<Sensor<T>>,
}

impl<T: Transport> HardwareMonitor<T> {
    /// Connect and run the initial hardware scan.
    ///
    /// `overrides` land on top of the adapter defaults (namespace path);
    /// connection failures propagate — the polling loop owns retries.
    pub fn connect<C>(connector: &C, overrides: ConnectionOverrides) -> Result<Self>
    where
        C: Connector<Transport = T>,
    {
        let namespace = Namespace::<T>::builder()
            .defaults(ConnectionOverrides::new().namespace_path(NAMESPACE_PATH))
            .options(overrides)
            .register(HARDWARE)
            .register(SENSOR)
            .connect(connector)?;

        let mut monitor = Self {
            namespace,
            hardware: Vec::new(),
            by_type: IndexMap::new(),
            sensors: Vec::new(),
        };
        monitor.scan()?;
        Ok(monitor)
    }

    /// Enumerate hardware type by type, pulling cached instances for each
    /// device and its sensors.
    fn scan(&mut self) -> Result<()> {
        self.hardware.clear();
        self.by_type.clear();
        self.sensors.clear();

        for hardware_type in HardwareType::iter() {
            let mut indices = Vec::new();
            let selector = Selector::new().with("HardwareType", hardware_type.to_string());
            let enumerated = match self.namespace.instances_of("Hardware", &selector) {
                Ok(enumerated) => enumerated,
                Err(error) if error.is_not_found() => {
                    self.by_type.insert(hardware_type, indices);
                    continue;
                }
                Err(error) => return Err(error),
            };

            for found in enumerated {
                // Re-find by InstanceId so the wrapper lands in the
                // namespace cache and survives refresh with its identity.
                let instance_id = found.static_value("InstanceId")?;
                let instance = self
                    .namespace
                    .instance_of("Hardware", &Selector::new().with("InstanceId", instance_id))?;

                let identifier = instance.static_str("Identifier")?;
                let sensors = self.sensors_parented_to(&identifier)?;

                indices.push(self.hardware.len());
                self.sensors.extend(sensors.iter().cloned());
                self.hardware.push(Hardware::new(instance, sensors));
            }
            self.by_type.insert(hardware_type, indices);
        }

        debug!(
            hardware = self.hardware.len(),
            sensors = self.sensors.len(),
            "hardware scan complete"
        );
        Ok(())
    }

    fn sensors_parented_to(&self, identifier: &str) -> Result<Vec<Sensor<T>>> {
        let enumerated = match self
            .namespace
            .instances_of("Sensor", &Selector::new().with("Parent", identifier))
        {
            Ok(enumerated) => enumerated,
            Err(error) if error.is_not_found() => return Ok(Vec::new()),
            Err(error) => return Err(error),
        };

        let mut sensors = Vec::new();
        for found in enumerated {
            let sensor_id = found.static_value("Identifier")?;
            let instance = self
                .namespace
                .instance_of("Sensor", &Selector::new().with("Identifier", sensor_id))?;
            sensors.push(Sensor::new(instance));
        }
        Ok(sensors)
    }

    // ── Lookups ─────────────────────────────────────────────────────

    /// Every discovered device, in known-type order then transport order.
    pub fn hardware(&self) -> &[Hardware<T>] {
        &self.hardware
    }

    /// Every discovered sensor, flattened in hardware order.
    pub fn sensors(&self) -> &[Sensor<T>] {
        &self.sensors
    }

    /// First device of `hardware_type`, or `None` when absent.
    pub fn first_of(&self, hardware_type: HardwareType) -> Option<&Hardware<T>> {
        self.by_type
            .get(&hardware_type)?
            .first()
            .map(|&index| &self.hardware[index])
    }

    /// First GPU, preferring ATI over NVIDIA.
    pub fn first_gpu(&self) -> Option<&Hardware<T>> {
        self.first_of(HardwareType::GpuAti)
            .or_else(|| self.first_of(HardwareType::GpuNvidia))
    }

    pub fn namespace(&self) -> &Namespace<T> {
        &self.namespace
    }

    pub fn state(&self) -> ConnectionState {
        self.namespace.state()
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Re-validate the connection and refresh every cached instance in
    /// place; held [`Hardware`]/[`Sensor`] wrappers keep working.
    pub fn refresh(&self) -> Result<()> {
        self.namespace.refresh()
    }

    /// Refresh and then re-enumerate, picking up devices that appeared
    /// since the last scan. Existing wrappers keep their identity; the
    /// lists and indices are rebuilt.
    pub fn rescan(&mut self) -> Result<()> {
        self.namespace.refresh()?;
        self.scan()
    }

    /// Record an externally detected discontinuity, e.g. the monitored
    /// process exited.
    pub fn mark_stale(&self) {
        self.namespace.mark_stale();
    }

    pub fn close(&self) {
        self.namespace.close();
    }
}
