#![allow(clippy::unwrap_used)]
// Integration tests for the hardware-monitor adapter against the
// in-memory transport.

use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use ohmview_core::win32::{self, OperatingSystem};
use ohmview_core::{
    HardwareMonitor, HardwareType, PROCESS_NAME, ProcessWatch, SensorType, group_sensors,
};
use ohmview_wmi::transport::memory::MemoryTransport;
use ohmview_wmi::{ConnectionOverrides, Namespace, Record, Selector};

// ── Fixtures ────────────────────────────────────────────────────────

fn hardware_record(hw_type: &str, id: &str, identifier: &str, name: &str) -> Record {
    Record::new()
        .with("HardwareType", hw_type)
        .with("Parent", "")
        .with("InstanceId", id)
        .with("Identifier", identifier)
        .with("Name", name)
}

fn sensor_record(
    sensor_type: &str,
    name: &str,
    identifier: &str,
    parent: &str,
    index: i64,
    value: f64,
) -> Record {
    Record::new()
        .with("SensorType", sensor_type)
        .with("Name", name)
        .with("Identifier", identifier)
        .with("Parent", parent)
        .with("Index", index)
        .with("Value", value)
        .with("Min", value)
        .with("Max", value)
}

/// A CPU with two Load sensors and one Temperature sensor, an NVIDIA GPU
/// with one Temperature sensor, and a RAM device with no sensors.
fn ohm_transport() -> MemoryTransport {
    let t = MemoryTransport::new();
    t.insert(
        "Hardware",
        hardware_record("CPU", "1", "/intelcpu/0", "Intel Core i7"),
    );
    t.insert(
        "Hardware",
        hardware_record("GpuNvidia", "2", "/nvidiagpu/0", "GeForce GTX"),
    );
    t.insert(
        "Hardware",
        hardware_record("RAM", "3", "/ram", "Generic Memory"),
    );

    t.insert(
        "Sensor",
        sensor_record("Load", "CPU Total", "/intelcpu/0/load/0", "/intelcpu/0", 0, 42.5),
    );
    t.insert(
        "Sensor",
        sensor_record("Load", "CPU Core #1", "/intelcpu/0/load/1", "/intelcpu/0", 1, 30.0),
    );
    t.insert(
        "Sensor",
        sensor_record(
            "Temperature",
            "CPU Package",
            "/intelcpu/0/temperature/0",
            "/intelcpu/0",
            0,
            55.0,
        ),
    );
    t.insert(
        "Sensor",
        sensor_record(
            "Temperature",
            "GPU Core",
            "/nvidiagpu/0/temperature/0",
            "/nvidiagpu/0",
            0,
            61.0,
        ),
    );
    t
}

fn monitor(t: &MemoryTransport) -> HardwareMonitor<MemoryTransport> {
    HardwareMonitor::connect(t, ConnectionOverrides::new()).unwrap()
}

// ── Scan and lookups ────────────────────────────────────────────────

#[test]
fn scan_orders_hardware_by_known_type_then_transport_order() {
    let t = ohm_transport();
    let m = monitor(&t);

    let names: Vec<String> = m.hardware().iter().map(|h| h.name().unwrap()).collect();
    assert_eq!(names, vec!["Intel Core i7", "GeForce GTX", "Generic Memory"]);
    assert_eq!(m.sensors().len(), 4);
}

#[test]
fn first_of_type_returns_first_or_none() {
    let t = ohm_transport();
    let m = monitor(&t);

    let cpu = m.first_of(HardwareType::Cpu).unwrap();
    assert_eq!(cpu.name().unwrap(), "Intel Core i7");
    assert_eq!(cpu.hardware_type().unwrap(), HardwareType::Cpu);
    assert!(m.first_of(HardwareType::Mainboard).is_none());
}

#[test]
fn first_gpu_prefers_ati_over_nvidia() {
    let t = ohm_transport();
    let m = monitor(&t);
    assert_eq!(m.first_gpu().unwrap().name().unwrap(), "GeForce GTX");

    t.insert(
        "Hardware",
        hardware_record("GpuAti", "4", "/atigpu/0", "Radeon"),
    );
    let mut m = m;
    m.rescan().unwrap();
    assert_eq!(m.first_gpu().unwrap().name().unwrap(), "Radeon");
}

// ── Grouping ────────────────────────────────────────────────────────

#[test]
fn grouping_partitions_by_type_then_index() {
    let t = ohm_transport();
    let m = monitor(&t);
    let cpu = m.first_of(HardwareType::Cpu).unwrap();

    // [(Load,0), (Load,1), (Temperature,0)]
    let grouped = group_sensors(cpu.sensors());
    assert_eq!(grouped.len(), 2);

    let loads = &grouped[&SensorType::Load];
    assert_eq!(loads.len(), 2);
    assert_eq!(loads[&0].name().unwrap(), "CPU Total");
    assert_eq!(loads[&1].name().unwrap(), "CPU Core #1");

    let temps = &grouped[&SensorType::Temperature];
    assert_eq!(temps.len(), 1);
    assert_eq!(temps[&0].name().unwrap(), "CPU Package");
}

#[test]
fn first_sensor_of_type_is_the_lowest_index() {
    let t = ohm_transport();
    let m = monitor(&t);
    let cpu = m.first_of(HardwareType::Cpu).unwrap();

    let first_load = cpu.sensor(SensorType::Load).unwrap();
    assert_eq!(first_load.index().unwrap(), 0);
    assert_eq!(first_load.name().unwrap(), "CPU Total");
    assert!(cpu.sensor(SensorType::Fan).is_none());
}

// ── Live values ─────────────────────────────────────────────────────

#[test]
fn sensor_values_are_live_identity_is_cached() {
    let t = ohm_transport();
    let m = monitor(&t);
    let cpu = m.first_of(HardwareType::Cpu).unwrap();
    let load = cpu.sensor(SensorType::Load).unwrap();

    assert_eq!(load.value().unwrap(), 42.5);
    assert_eq!(load.unit().unwrap(), "%");

    t.update("Sensor", 0, "Value", 55.0);
    t.update("Sensor", 0, "Name", "renamed");
    assert_eq!(load.value().unwrap(), 55.0);
    assert_eq!(load.name().unwrap(), "CPU Total");
}

#[test]
fn refresh_updates_held_wrappers_in_place() {
    let t = ohm_transport();
    let m = monitor(&t);
    let cpu = m.first_of(HardwareType::Cpu).unwrap();
    let held = Rc::clone(cpu.sensor(SensorType::Load).unwrap().instance());

    t.update("Sensor", 0, "Name", "CPU Total (renamed)");
    m.refresh().unwrap();

    let refetched = m.first_of(HardwareType::Cpu).unwrap().sensor(SensorType::Load).unwrap();
    assert!(Rc::ptr_eq(&held, refetched.instance()));
    assert_eq!(refetched.name().unwrap(), "CPU Total (renamed)");
}

// ── Process discovery ───────────────────────────────────────────────

fn process_transport(running: bool) -> MemoryTransport {
    let t = MemoryTransport::new();
    if running {
        t.insert(
            "Win32_Process",
            Record::new()
                .with("Name", PROCESS_NAME)
                .with("ProcessId", 4242)
                .with("ExecutablePath", "C:\\Tools\\OpenHardwareMonitor.exe")
                .with("WorkingSetSize", 10_485_760),
        );
    }
    t
}

#[test]
fn is_running_reflects_the_process_table() {
    let t = process_transport(true);
    let watch = ProcessWatch::connect(&t, ConnectionOverrides::new()).unwrap();
    assert!(watch.is_running(PROCESS_NAME).unwrap());
    assert!(!watch.is_running("notepad.exe").unwrap());
}

#[test]
fn wait_for_returns_immediately_when_running() {
    let t = process_transport(true);
    let watch = ProcessWatch::connect(&t, ConnectionOverrides::new()).unwrap();
    let seen = watch
        .wait_for(PROCESS_NAME, Duration::from_secs(5), Duration::from_millis(10))
        .unwrap();
    assert!(seen);
}

#[test]
fn wait_for_expiry_is_a_sentinel_not_an_error() {
    let t = process_transport(false);
    let watch = ProcessWatch::connect(&t, ConnectionOverrides::new()).unwrap();
    let seen = watch
        .wait_for(PROCESS_NAME, Duration::from_millis(30), Duration::from_millis(10))
        .unwrap();
    assert!(!seen);
}

// ── Win32 operating system ──────────────────────────────────────────

#[test]
fn operating_system_statics_and_live_counters() {
    let t = MemoryTransport::new();
    t.insert(
        "Win32_OperatingSystem",
        Record::new()
            .with("Name", "Microsoft Windows 10 Pro|C:\\WINDOWS")
            .with("Caption", "Microsoft Windows 10 Pro")
            .with("CSName", "DESKTOP-1")
            .with("Version", "10.0.19045")
            .with("SystemDrive", "C:")
            .with("TotalVisibleMemorySize", 16_777_216)
            .with("LastBootUpTime", "20260827093000.000000+000")
            .with("FreePhysicalMemory", 8_000_000)
            .with("FreeVirtualMemory", 12_000_000)
            .with("NumberOfProcesses", 180)
            .with("Status", "OK"),
    );

    let ns: Namespace<MemoryTransport> = Namespace::<MemoryTransport>::builder()
        .defaults(win32::cimv2_overrides())
        .register(win32::OPERATING_SYSTEM)
        .connect(&t)
        .unwrap();
    assert_eq!(ns.options().namespace_path, "root/cimv2");

    let os = OperatingSystem::find(&ns).unwrap();
    assert_eq!(os.caption().unwrap(), "Microsoft Windows 10 Pro");
    assert_eq!(os.computer_name().unwrap(), "DESKTOP-1");
    assert_eq!(os.total_visible_memory_kb().unwrap(), 16_777_216);

    assert_eq!(os.free_physical_memory_kb().unwrap(), 8_000_000);
    t.update("Win32_OperatingSystem", 0, "FreePhysicalMemory", 7_500_000);
    assert_eq!(os.free_physical_memory_kb().unwrap(), 7_500_000);
    assert_eq!(os.status().unwrap(), "OK");
}

// ── Scan against an empty namespace ─────────────────────────────────

#[test]
fn empty_namespace_yields_an_empty_monitor() {
    let t = MemoryTransport::new();
    let m = monitor(&t);
    assert!(m.hardware().is_empty());
    assert!(m.sensors().is_empty());
    assert!(m.first_gpu().is_none());
}

// ── Selector-level check through the full stack ─────────────────────

#[test]
fn adapter_selectors_filter_unknown_keys() {
    let t = ohm_transport();
    let m = monitor(&t);

    // Same instance whether or not a bogus key rides along.
    let plain = m
        .namespace()
        .instance_of("Sensor", &Selector::new().with("Identifier", "/intelcpu/0/load/0"))
        .unwrap();
    let noisy = m
        .namespace()
        .instance_of(
            "Sensor",
            &Selector::new()
                .with("Identifier", "/intelcpu/0/load/0")
                .with("Wattage", 9000),
        )
        .unwrap();
    assert!(Rc::ptr_eq(&plain, &noisy));
}
