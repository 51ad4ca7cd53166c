// ── Sensor class ──
//
// Typed wrapper over the OpenHardwareMonitor `Sensor` class. Identity
// attributes are static (cached); Value/Min/Max are dynamic and hit the
// transport on every read.

use std::collections::BTreeMap;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use ohmview_wmi::{ClassDescriptor, Error, Instance, Result, Transport};

/// Descriptor for the `Sensor` class.
pub const SENSOR: ClassDescriptor = ClassDescriptor::new(
    "Sensor",
    "Identifier",
    &["SensorType", "Name", "Identifier", "Parent", "Index"],
    &["Value", "Min", "Max"],
);

/// Known sensor types and their display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum SensorType {
    Voltage,
    Clock,
    Temperature,
    Load,
    Fan,
    Flow,
    Control,
    Level,
    Data,
}

impl SensorType {
    /// Display unit suffix for this sensor type, presentation-ready
    /// (leading space where the convention wants one).
    pub fn unit(self) -> &'static str {
        match self {
            Self::Voltage => " V",
            Self::Clock => " MHz",
            Self::Temperature => " °C",
            Self::Load | Self::Control | Self::Level => "%",
            Self::Fan => " RPM",
            Self::Flow => " L/h",
            Self::Data => " GB",
        }
    }
}

/// One sensor of one piece of hardware.
#[derive(Debug)]
pub struct Sensor<T: Transport> {
    instance: Rc<Instance<T>>,
}

// Not derived: cloning shares the Rc and needs no bound on `T`.
impl<T: Transport> Clone for Sensor<T> {
    fn clone(&self) -> Self {
        Self {
            instance: Rc::clone(&self.instance),
        }
    }
}

impl<T: Transport> Sensor<T> {
    pub fn new(instance: Rc<Instance<T>>) -> Self {
        Self { instance }
    }

    // ── Static identity (cached) ────────────────────────────────────

    pub fn sensor_type(&self) -> Result<SensorType> {
        let raw = self.instance.static_str("SensorType")?;
        raw.parse().map_err(|_| Error::TypeMismatch {
            class: "Sensor",
            attribute: "SensorType".to_owned(),
            expected: "known sensor type",
            value: Value::String(raw),
        })
    }

    pub fn name(&self) -> Result<String> {
        self.instance.static_str("Name")
    }

    pub fn identifier(&self) -> Result<String> {
        self.instance.static_str("Identifier")
    }

    pub fn parent(&self) -> Result<String> {
        self.instance.static_str("Parent")
    }

    pub fn index(&self) -> Result<i64> {
        self.instance.static_i64("Index")
    }

    /// Display unit for this sensor's type.
    pub fn unit(&self) -> Result<&'static str> {
        Ok(self.sensor_type()?.unit())
    }

    // ── Live values (re-queried per read) ───────────────────────────

    pub fn value(&self) -> Result<f64> {
        self.instance.dynamic_f64("Value")
    }

    /// Minimum seen by the remote monitor since it started.
    pub fn min(&self) -> Result<f64> {
        self.instance.dynamic_f64("Min")
    }

    /// Maximum seen by the remote monitor since it started.
    pub fn max(&self) -> Result<f64> {
        self.instance.dynamic_f64("Max")
    }

    pub fn instance(&self) -> &Rc<Instance<T>> {
        &self.instance
    }
}

/// Two-level grouping: sensor type → index → sensor.
///
/// The inner map is ordered by index, so "first of type" is the lowest
/// index, deterministically.
pub type SensorMap<T> = IndexMap<SensorType, BTreeMap<i64, Sensor<T>>>;

/// Partition `sensors` by type and index.
///
/// Sensors whose type or index cannot be read (unknown type string, or a
/// parked refresh fault) are skipped with a warning rather than failing
/// the whole grouping.
pub fn group_sensors<T: Transport>(sensors: &[Sensor<T>]) -> SensorMap<T> {
    let mut map: SensorMap<T> = IndexMap::new();
    for sensor in sensors {
        let (sensor_type, index) = match (sensor.sensor_type(), sensor.index()) {
            (Ok(t), Ok(i)) => (t, i),
            (Err(error), _) | (_, Err(error)) => {
                warn!(%error, "skipping ungroupable sensor");
                continue;
            }
        };
        map.entry(sensor_type).or_default().insert(index, sensor.clone());
    }
    map
}
