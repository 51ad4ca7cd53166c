// ── Hardware class ──
//
// Typed wrapper over the OpenHardwareMonitor `Hardware` class. All of its
// attributes are identity-like and static; the interesting live data
// hangs off the sensors parented to it.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use ohmview_wmi::{ClassDescriptor, Error, Instance, Result, Transport};

use crate::sensor::{Sensor, SensorMap, SensorType, group_sensors};

/// Descriptor for the `Hardware` class.
pub const HARDWARE: ClassDescriptor = ClassDescriptor::new(
    "Hardware",
    "InstanceId",
    &["HardwareType", "Parent", "InstanceId", "Identifier", "Name"],
    &[],
);

/// Known hardware types, in the enumeration order the monitor scans them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum HardwareType {
    Mainboard,
    #[strum(serialize = "SuperIO")]
    SuperIo,
    #[strum(serialize = "CPU")]
    Cpu,
    GpuNvidia,
    GpuAti,
    TBalancer,
    Heatmaster,
    #[strum(serialize = "HDD")]
    Hdd,
    #[strum(serialize = "RAM")]
    Ram,
}

/// One piece of hardware together with its sensors.
#[derive(Debug)]
pub struct Hardware<T: Transport> {
    instance: Rc<Instance<T>>,
    sensors: Vec<Sensor<T>>,
    sensor_map: SensorMap<T>,
}

// Not derived: cloning shares the instance Rcs and needs no bound on `T`.
impl<T: Transport> Clone for Hardware<T> {
    fn clone(&self) -> Self {
        Self {
            instance: Rc::clone(&self.instance),
            sensors: self.sensors.clone(),
            sensor_map: self.sensor_map.clone(),
        }
    }
}

impl<T: Transport> Hardware<T> {
    pub(crate) fn new(instance: Rc<Instance<T>>, sensors: Vec<Sensor<T>>) -> Self {
        let sensor_map = group_sensors(&sensors);
        Self {
            instance,
            sensors,
            sensor_map,
        }
    }

    pub fn hardware_type(&self) -> Result<HardwareType> {
        let raw = self.instance.static_str("HardwareType")?;
        raw.parse().map_err(|_| Error::TypeMismatch {
            class: "Hardware",
            attribute: "HardwareType".to_owned(),
            expected: "known hardware type",
            value: Value::String(raw),
        })
    }

    pub fn parent(&self) -> Result<String> {
        self.instance.static_str("Parent")
    }

    pub fn instance_id(&self) -> Result<String> {
        self.instance.static_str("InstanceId")
    }

    pub fn identifier(&self) -> Result<String> {
        self.instance.static_str("Identifier")
    }

    pub fn name(&self) -> Result<String> {
        self.instance.static_str("Name")
    }

    /// Every sensor parented to this hardware, in transport order.
    pub fn sensors(&self) -> &[Sensor<T>] {
        &self.sensors
    }

    /// First sensor of `sensor_type` (lowest index), if any.
    pub fn sensor(&self, sensor_type: SensorType) -> Option<&Sensor<T>> {
        self.sensor_map
            .get(&sensor_type)?
            .values()
            .next()
    }

    /// All sensors of `sensor_type`, keyed and ordered by index.
    pub fn sensors_of(&self, sensor_type: SensorType) -> Option<&BTreeMap<i64, Sensor<T>>> {
        self.sensor_map.get(&sensor_type)
    }

    pub fn instance(&self) -> &Rc<Instance<T>> {
        &self.instance
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn hardware_type_strings_match_the_remote_names() {
        let names: Vec<String> = HardwareType::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Mainboard",
                "SuperIO",
                "CPU",
                "GpuNvidia",
                "GpuAti",
                "TBalancer",
                "Heatmaster",
                "HDD",
                "RAM",
            ]
        );
    }

    #[test]
    fn hardware_type_parses_remote_spelling() {
        assert_eq!("CPU".parse::<HardwareType>().unwrap(), HardwareType::Cpu);
        assert_eq!(
            "SuperIO".parse::<HardwareType>().unwrap(),
            HardwareType::SuperIo
        );
        assert!("cpu".parse::<HardwareType>().is_err());
    }

    #[test]
    fn descriptor_matches_the_remote_class() {
        assert_eq!(
            HARDWARE.static_attributes(),
            &["HardwareType", "Parent", "InstanceId", "Identifier", "Name"]
        );
        assert!(HARDWARE.dynamic_attributes().is_empty());
        assert_eq!(HARDWARE.key_attribute(), "InstanceId");
    }
}
