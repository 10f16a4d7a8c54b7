//! Compute device specifiers and accelerator detection

use super::error::ValidationError;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Accepted device specifier syntax
static DEVICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(cpu|cuda|cuda:[0-9]+)$").expect("Invalid device regex"));

const NVIDIA_GPUS_DIR: &str = "/proc/driver/nvidia/gpus";

/// Parsed `--device` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceSpec {
    /// `cpu`
    Cpu,
    /// `cuda`, the current accelerator
    Cuda,
    /// `cuda:<index>`
    CudaIndex(usize),
}

impl DeviceSpec {
    /// Parse a specifier, `None` when the syntax is not accepted or the
    /// index does not fit a `usize`
    pub fn parse(value: &str) -> Option<Self> {
        if !DEVICE_REGEX.is_match(value) {
            return None;
        }
        match value {
            "cpu" => Some(Self::Cpu),
            "cuda" => Some(Self::Cuda),
            _ => value
                .strip_prefix("cuda:")
                .and_then(|index| index.parse().ok())
                .map(Self::CudaIndex),
        }
    }

    pub const fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }

    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::CudaIndex(index) => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda => write!(f, "cuda"),
            Self::CudaIndex(index) => write!(f, "cuda:{index}"),
        }
    }
}

/// Source of the number of usable accelerators
pub trait AcceleratorProbe {
    fn device_count(&self) -> usize;

    fn is_available(&self) -> bool {
        self.device_count() > 0
    }
}

/// Probe backed by the running machine
///
/// GPUs registered by the NVIDIA driver under `/proc` are counted.
/// `CUDA_VISIBLE_DEVICES` can only narrow that count.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAccelerators;

impl AcceleratorProbe for SystemAccelerators {
    fn device_count(&self) -> usize {
        let visible = std::env::var("CUDA_VISIBLE_DEVICES").ok();
        count_devices(visible.as_deref(), Path::new(NVIDIA_GPUS_DIR))
    }
}

/// Accelerators usable given a `CUDA_VISIBLE_DEVICES` value and the
/// driver's GPU directory. An unreadable directory means no driver.
fn count_devices(visible: Option<&str>, gpus_dir: &Path) -> usize {
    let installed = match std::fs::read_dir(gpus_dir) {
        Ok(entries) => entries.flatten().count(),
        Err(_) => return 0,
    };
    match visible {
        Some(visible) => count_visible_devices(visible).min(installed),
        None => installed,
    }
}

/// Probe reporting a fixed number of accelerators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAccelerators(usize);

impl FixedAccelerators {
    pub const fn new(count: usize) -> Self {
        Self(count)
    }
}

impl AcceleratorProbe for FixedAccelerators {
    fn device_count(&self) -> usize {
        self.0
    }
}

/// Count ids in a `CUDA_VISIBLE_DEVICES` value. The runtime ignores
/// everything from the first empty or negative id onwards.
fn count_visible_devices(value: &str) -> usize {
    value
        .split(',')
        .map(str::trim)
        .take_while(|id| !id.is_empty() && !id.starts_with('-'))
        .count()
}

/// Default device list when `--device` was accepted but not given
pub fn default_devices(accelerators: &dyn AcceleratorProbe) -> Vec<String> {
    let device = if accelerators.is_available() {
        DeviceSpec::Cuda
    } else {
        DeviceSpec::Cpu
    };
    vec![device.to_string()]
}

/// Validate a sorted device list against the available accelerators
///
/// Checks run in this order: syntax, duplicates, CPU/GPU mixing, GPU count,
/// then per-index availability.
pub fn validate_devices(
    devices: &[String],
    accelerators: &dyn AcceleratorProbe,
) -> Result<Vec<DeviceSpec>, ValidationError> {
    let mut specs = Vec::with_capacity(devices.len());
    for device in devices {
        if !DEVICE_REGEX.is_match(device) {
            return Err(ValidationError::InvalidDevice(device.clone()));
        }
        specs.push(DeviceSpec::parse(device));
    }

    let mut seen = HashSet::with_capacity(devices.len());
    if let Some(duplicate) = devices.iter().find(|device| !seen.insert(device.as_str())) {
        return Err(ValidationError::DuplicateDevice(duplicate.clone()));
    }

    let has_cpu = devices.iter().any(|device| device == "cpu");
    if has_cpu && devices.len() > 1 {
        return Err(ValidationError::MixedDevice);
    }

    let available = accelerators.device_count();
    if !has_cpu && devices.len() > available {
        return Err(ValidationError::InsufficientDevices {
            requested: devices.len(),
            available,
        });
    }

    // NOTE: an index equal to `available - 1` is rejected, so the last
    // accelerator can never be addressed explicitly. Kept as-is pending a
    // decision on whether the bound should be `index >= available`.
    let mut validated = Vec::with_capacity(specs.len());
    for (device, spec) in devices.iter().zip(specs) {
        let spec = match spec {
            Some(DeviceSpec::CudaIndex(index)) if index < available.saturating_sub(1) => {
                DeviceSpec::CudaIndex(index)
            }
            Some(DeviceSpec::CudaIndex(_)) | None => {
                return Err(ValidationError::UnavailableDevice {
                    device: device.clone(),
                    available,
                });
            }
            Some(spec) => spec,
        };
        validated.push(spec);
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(DeviceSpec::parse("cpu"), Some(DeviceSpec::Cpu));
        assert_eq!(DeviceSpec::parse("cuda"), Some(DeviceSpec::Cuda));
        assert_eq!(DeviceSpec::parse("cuda:3"), Some(DeviceSpec::CudaIndex(3)));
        assert_eq!(DeviceSpec::parse("cuda:007"), Some(DeviceSpec::CudaIndex(7)));
    }

    #[test]
    fn test_parse_rejected_forms() {
        for value in ["gpu", "cuda:-1", "cuda:", "CPU", " cpu", "cuda:1:2", "cuda0", "mps", ""] {
            assert_eq!(DeviceSpec::parse(value), None, "{value} should be rejected");
        }
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(DeviceSpec::Cpu.to_string(), "cpu");
        assert_eq!(DeviceSpec::Cuda.to_string(), "cuda");
        assert_eq!(DeviceSpec::CudaIndex(2).to_string(), "cuda:2");
    }

    #[test]
    fn test_count_visible_devices() {
        assert_eq!(count_visible_devices("0,1,2"), 3);
        assert_eq!(count_visible_devices("0, 1"), 2);
        assert_eq!(count_visible_devices(""), 0);
        assert_eq!(count_visible_devices("-1"), 0);
        assert_eq!(count_visible_devices("0,-1,2"), 1);
    }

    fn driver_dir(gpus: usize) -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        for bus in 0..gpus {
            std::fs::create_dir(dir.path().join(format!("0000:0{bus}:00.0"))).unwrap();
        }
        dir
    }

    #[test]
    fn test_count_devices_without_driver() {
        let missing = Path::new("/nonexistent/driver/nvidia/gpus");
        assert_eq!(count_devices(None, missing), 0);
        assert_eq!(count_devices(Some("0,1,2,3"), missing), 0);
    }

    #[test]
    fn test_count_devices_from_driver() {
        let driver = driver_dir(2);
        assert_eq!(count_devices(None, driver.path()), 2);
        assert_eq!(count_devices(Some("1"), driver.path()), 1);
        assert_eq!(count_devices(Some("-1"), driver.path()), 0);
    }

    #[test]
    fn test_visible_devices_capped_by_driver() {
        let driver = driver_dir(2);
        assert_eq!(count_devices(Some("0,1,2,3"), driver.path()), 2);
    }

    #[test]
    fn test_default_devices() {
        assert_eq!(default_devices(&FixedAccelerators::new(0)), devices(&["cpu"]));
        assert_eq!(default_devices(&FixedAccelerators::new(2)), devices(&["cuda"]));
    }

    #[test]
    fn test_single_cpu_is_valid() {
        let specs = validate_devices(&devices(&["cpu"]), &FixedAccelerators::new(0)).unwrap();
        assert_eq!(specs, vec![DeviceSpec::Cpu]);
    }

    #[test]
    fn test_invalid_pattern() {
        for bad in ["gpu", "cuda:-1"] {
            let err = validate_devices(&devices(&[bad]), &FixedAccelerators::new(4)).unwrap_err();
            assert_eq!(err, ValidationError::InvalidDevice(bad.to_string()));
        }
    }

    #[test]
    fn test_duplicate_cpu() {
        let err = validate_devices(&devices(&["cpu", "cpu"]), &FixedAccelerators::new(0)).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateDevice("cpu".to_string()));
    }

    #[test]
    fn test_duplicate_cuda() {
        let err = validate_devices(&devices(&["cuda", "cuda"]), &FixedAccelerators::new(4)).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateDevice("cuda".to_string()));
    }

    #[test]
    fn test_mixed_devices() {
        let err = validate_devices(&devices(&["cpu", "cuda:0"]), &FixedAccelerators::new(4)).unwrap_err();
        assert_eq!(err, ValidationError::MixedDevice);
    }

    #[test]
    fn test_insufficient_devices_with_one_accelerator() {
        let err =
            validate_devices(&devices(&["cuda:0", "cuda:1"]), &FixedAccelerators::new(1)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientDevices {
                requested: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_cuda_without_accelerators() {
        let err = validate_devices(&devices(&["cuda"]), &FixedAccelerators::new(0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientDevices {
                requested: 1,
                available: 0
            }
        );
    }

    // Pins the index bound: with N accelerators only indices < N - 1 pass.
    #[test]
    fn test_index_boundary_excludes_last_accelerator() {
        let one = FixedAccelerators::new(1);
        let err = validate_devices(&devices(&["cuda:0"]), &one).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnavailableDevice {
                device: "cuda:0".to_string(),
                available: 1
            }
        );

        let three = FixedAccelerators::new(3);
        assert!(validate_devices(&devices(&["cuda:0"]), &three).is_ok());
        assert!(validate_devices(&devices(&["cuda:1"]), &three).is_ok());
        assert!(matches!(
            validate_devices(&devices(&["cuda:2"]), &three),
            Err(ValidationError::UnavailableDevice { .. })
        ));
    }

    #[test]
    fn test_oversized_index_is_unavailable() {
        let huge = "cuda:99999999999999999999999999";
        let err = validate_devices(&devices(&[huge]), &FixedAccelerators::new(2)).unwrap_err();
        assert!(matches!(err, ValidationError::UnavailableDevice { .. }));
    }

    #[test]
    fn test_bare_cuda_skips_index_check() {
        let specs = validate_devices(&devices(&["cuda"]), &FixedAccelerators::new(1)).unwrap();
        assert_eq!(specs, vec![DeviceSpec::Cuda]);
    }

    #[test]
    fn test_multi_gpu_selection() {
        let specs =
            validate_devices(&devices(&["cuda:0", "cuda:1"]), &FixedAccelerators::new(4)).unwrap();
        assert_eq!(specs, vec![DeviceSpec::CudaIndex(0), DeviceSpec::CudaIndex(1)]);
    }
}
