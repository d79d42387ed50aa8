//! Progress tracking for downloads

use std::time::{Duration, Instant};

/// Reported before the request is sent
pub const PROGRESS_PREPARING: f64 = 10.0;
/// Reported once the response has been accepted
pub const PROGRESS_CONNECTED: f64 = 30.0;
/// Upper bound of the streaming range
pub const PROGRESS_RECEIVED: f64 = 90.0;
/// Reported after every byte has been accumulated
pub const PROGRESS_ASSEMBLED: f64 = 95.0;
/// Terminal value for a saved file
pub const PROGRESS_DONE: f64 = 100.0;

/// Progress snapshot for a download
#[derive(Debug, Clone)]
pub struct Progress {
    /// Stage percentage, or [`Progress::FAILED`]
    pub percent: f64,
    /// Declared size of the body in bytes (0 when unknown)
    pub total_size: u64,
    /// Number of bytes received
    pub downloaded_size: u64,
    /// Current download speed in bytes per second
    pub speed: Option<f64>,
    /// Estimated time remaining
    pub eta: Option<Duration>,
    /// Time when download started
    pub start_time: Instant,
}

impl Progress {
    /// Sentinel percent meaning the download failed
    pub const FAILED: f64 = -1.0;

    /// Create a new progress tracker
    pub fn new(total_size: u64) -> Self {
        Self {
            percent: 0.0,
            total_size,
            downloaded_size: 0,
            speed: None,
            eta: None,
            start_time: Instant::now(),
        }
    }

    /// Move to a fixed stage value
    pub fn set_stage(&mut self, percent: f64) {
        self.percent = percent;
    }

    /// Mark as failed
    pub fn fail(&mut self) {
        self.percent = Self::FAILED;
    }

    /// Update with the number of bytes received so far.
    ///
    /// With a known total the percent is mapped into the 30..=90 streaming
    /// range; otherwise only byte counters move.
    pub fn update(&mut self, downloaded_size: u64) {
        self.downloaded_size = downloaded_size;

        if self.total_size > 0 {
            let ratio = (downloaded_size as f64 / self.total_size as f64).min(1.0);
            self.percent = PROGRESS_CONNECTED + ratio * (PROGRESS_RECEIVED - PROGRESS_CONNECTED);
        }

        let elapsed = self.start_time.elapsed();
        if elapsed.as_millis() > 0 {
            let speed = downloaded_size as f64 / elapsed.as_secs_f64();
            self.speed = Some(speed);

            if speed > 0.0 && self.total_size > downloaded_size {
                let remaining_bytes = self.total_size - downloaded_size;
                self.eta = Some(Duration::from_secs((remaining_bytes as f64 / speed) as u64));
            }
        }
    }

    /// Check if the download failed
    pub fn is_failed(&self) -> bool {
        self.percent < 0.0
    }

    /// Get human-readable speed string
    pub fn speed_string(&self) -> String {
        if let Some(speed) = self.speed {
            format_bytes_per_second(speed)
        } else {
            "Unknown".to_string()
        }
    }

    /// Get human-readable ETA string
    pub fn eta_string(&self) -> String {
        if let Some(eta) = self.eta {
            format_duration(eta)
        } else {
            "Unknown".to_string()
        }
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}

/// Format bytes per second as human-readable string
pub fn format_bytes_per_second(bytes_per_second: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_second as u64))
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else if total_seconds < 3600 {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m {}s", minutes, seconds)
        }
    } else {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, minutes)
        }
    }
}
