//! Linux host environment
//!
//! Reads memory accounting from cgroup v2 when the process runs inside one,
//! falling back to /proc for the resident set and system totals. Display,
//! viewport, and startup-timing capabilities are absent on a plain system
//! host; the embedding shell provides those when it has them.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use metrics_types::{DisplayInfo, HeapMemory, NavigationTiming, ProcessMemory, ViewportInfo};

use crate::environment::HostEnvironment;

const CGROUP_ROOT: &str = "/sys/fs/cgroup";
const MEMINFO_PATH: &str = "/proc/meminfo";
const SELF_STATUS_PATH: &str = "/proc/self/status";
const VERSION_PATH: &str = "/proc/version";

/// Host environment backed by Linux kernel interfaces.
pub struct SystemHost {
    cgroup: Option<CgroupPaths>,
    // Scratch buffer reused across sampling reads so periodic probes do not
    // allocate per tick.
    scratch: Mutex<Vec<u8>>,
}

struct CgroupPaths {
    current: PathBuf,
    max: PathBuf,
}

impl SystemHost {
    /// Detect available kernel interfaces and build the host.
    pub fn new() -> Self {
        let cgroup = discover_cgroup_v2();
        match &cgroup {
            Some(paths) => debug!(
                "cgroup v2 memory accounting detected at {}",
                paths.current.display()
            ),
            None => debug!("cgroup v2 memory accounting not available"),
        }
        Self {
            cgroup,
            scratch: Mutex::new(Vec::with_capacity(4096)),
        }
    }

    fn read_and_parse<T>(&self, path: &Path, parse: impl FnOnce(&[u8]) -> Option<T>) -> Option<T> {
        let mut buffer = self.scratch.lock();
        buffer.clear();
        let mut file = File::open(path).ok()?;
        file.read_to_end(&mut buffer).ok()?;
        parse(&buffer)
    }

    fn meminfo_total_bytes(&self) -> Option<u64> {
        self.read_and_parse(Path::new(MEMINFO_PATH), |bytes| {
            parse_meminfo_field(bytes, b"MemTotal:")
        })
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for SystemHost {
    fn heap_memory(&self) -> Option<HeapMemory> {
        let cgroup = self.cgroup.as_ref()?;
        let used = self.read_and_parse(&cgroup.current, parse_first_u64)?;
        let total = self.meminfo_total_bytes()?;
        let limit = self.read_and_parse(&cgroup.max, parse_first_u64);
        Some(HeapMemory {
            used_bytes: used,
            total_bytes: total,
            limit_bytes: limit,
        })
    }

    fn process_memory(&self) -> Option<ProcessMemory> {
        let rss = self.read_and_parse(Path::new(SELF_STATUS_PATH), |bytes| {
            parse_status_field(bytes, b"VmRSS:")
        })?;
        let total = self.meminfo_total_bytes()?;
        Some(ProcessMemory {
            used_bytes: rss,
            total_bytes: total,
        })
    }

    fn device_memory_gb(&self) -> Option<f64> {
        self.meminfo_total_bytes().map(quantize_device_gb)
    }

    fn logical_cores(&self) -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }

    fn user_agent(&self) -> Option<String> {
        self.read_and_parse(Path::new(VERSION_PATH), |bytes| {
            let text = std::str::from_utf8(bytes).ok()?;
            Some(kernel_identity(text))
        })
    }

    fn platform(&self) -> Option<String> {
        Some(format!(
            "{}-{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        None
    }

    fn display_info(&self) -> Option<DisplayInfo> {
        None
    }

    fn viewport(&self) -> Option<ViewportInfo> {
        None
    }
}

fn discover_cgroup_v2() -> Option<CgroupPaths> {
    let listing = std::fs::read_to_string("/proc/self/cgroup").ok()?;
    let line = listing.lines().find(|line| line.starts_with("0::"))?;
    let relative = line.trim_start_matches("0::").trim();
    let base = if relative.is_empty() || relative == "/" {
        PathBuf::from(CGROUP_ROOT)
    } else {
        Path::new(CGROUP_ROOT).join(relative.trim_start_matches('/'))
    };
    let current = base.join("memory.current");
    if !current.exists() {
        return None;
    }
    Some(CgroupPaths {
        current,
        max: base.join("memory.max"),
    })
}

/// Parse the leading unsigned integer of a kernel value file.
///
/// Returns `None` for non-numeric content such as the literal `max` in
/// `memory.max`.
fn parse_first_u64(bytes: &[u8]) -> Option<u64> {
    let mut value: u64 = 0;
    let mut saw_digit = false;
    for byte in bytes.iter().copied() {
        if byte.is_ascii_digit() {
            saw_digit = true;
            value = value
                .saturating_mul(10)
                .saturating_add(u64::from(byte - b'0'));
        } else if saw_digit {
            break;
        } else if !byte.is_ascii_whitespace() {
            return None;
        }
    }
    saw_digit.then_some(value)
}

/// Extract a `kB`-denominated field from /proc/meminfo content, in bytes.
fn parse_meminfo_field(bytes: &[u8], field: &[u8]) -> Option<u64> {
    parse_kb_line(bytes, field)
}

/// Extract a `kB`-denominated field from /proc/self/status content, in bytes.
fn parse_status_field(bytes: &[u8], field: &[u8]) -> Option<u64> {
    parse_kb_line(bytes, field)
}

fn parse_kb_line(bytes: &[u8], field: &[u8]) -> Option<u64> {
    for line in bytes.split(|b| *b == b'\n') {
        if line.starts_with(field) {
            let kb = parse_first_u64(&line[field.len()..])?;
            return Some(kb.saturating_mul(1024));
        }
    }
    None
}

/// Quantize total memory to the coarse hint ladder: the nearest power of two
/// gigabytes, clamped to [0.25, 8].
fn quantize_device_gb(total_bytes: u64) -> f64 {
    let gb = (total_bytes as f64) / (1u64 << 30) as f64;
    let clamped = gb.clamp(0.25, 8.0);
    let exponent = clamped.log2().round();
    2f64.powf(exponent).clamp(0.25, 8.0)
}

/// Shorten a /proc/version line to its identity prefix.
fn kernel_identity(text: &str) -> String {
    let line = text.lines().next().unwrap_or(text).trim();
    match line.find(" (") {
        Some(end) => line[..end].to_string(),
        None => line.to_string(),
    }
}
