//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::progress::{format_bytes, format_duration, Progress};
use crate::core::queue::{DownloadQueue, DownloadStatus, QueueEntry};
use crate::core::state::FetchError;
use crate::core::thumbnail::{Availability, ThumbnailSet, ThumbnailTier};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

/// Output formatter for cyberthum
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    show_progress: bool,
    multi: MultiProgress,
    bars: HashMap<String, ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_progress: true,
            multi: MultiProgress::new(),
            bars: HashMap::new(),
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        if !show_progress {
            self.multi.set_draw_target(ProgressDrawTarget::hidden());
        }
        self
    }

    fn quiet(&self) -> bool {
        self.verbosity == VerbosityLevel::Quiet
    }

    /// Add a progress bar for a queued download
    pub fn start_download(&mut self, entry: &QueueEntry, file_name: &str) {
        if self.quiet() || !self.show_progress {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(style);
        bar.set_prefix(file_name.to_string());
        bar.set_message(format!("[{}]", entry.id));
        bar.enable_steady_tick(Duration::from_millis(120));

        self.bars.insert(entry.id.clone(), bar);
    }

    /// Update the bar of a download
    pub fn update_download(&self, id: &str, progress: &Progress) {
        let Some(bar) = self.bars.get(id) else {
            return;
        };
        if progress.is_failed() {
            return;
        }

        bar.set_position(progress.percent.clamp(0.0, 100.0) as u64);
        if progress.downloaded_size == 0 {
            return;
        }

        let mut message = if progress.total_size > 0 {
            format!(
                "{}/{}",
                format_bytes(progress.downloaded_size),
                format_bytes(progress.total_size)
            )
        } else {
            format_bytes(progress.downloaded_size)
        };
        if progress.speed.is_some() {
            message.push_str(&format!(" @ {}", progress.speed_string()));
        }
        if progress.eta.is_some() {
            message.push_str(&format!(" ETA {}", progress.eta_string()));
        }
        bar.set_message(message);
    }

    /// Finish the bar of a download with its final status
    pub fn finish_download(&mut self, id: &str, status: DownloadStatus, detail: &str) {
        match (self.bars.remove(id), status) {
            (Some(bar), DownloadStatus::Completed) => bar.finish_with_message(format!("✅ {}", detail)),
            (Some(bar), _) => bar.abandon_with_message(format!("❌ {}", detail)),
            (None, DownloadStatus::Completed) => self.success(detail),
            (None, _) => self.error(detail),
        }
    }

    /// Show an indeterminate spinner while tiers are probed
    pub fn verifying(&self, video_id: &str) -> ProgressBar {
        if self.quiet() || !self.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_message(format!("Verifying thumbnails for {}...", video_id));
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if !self.quiet() {
            self.println(format!("✅ {}", message));
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet() {
            eprintln!("⚠️  {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    /// Print a rejected input with its code
    pub fn print_fetch_error(&self, input: &str, error: &FetchError) {
        eprintln!(
            "❌ {} {}\n   {}",
            format!("[{}]", error.code).red().bold(),
            error.message,
            input.dimmed()
        );
    }

    /// Print the four thumbnail URLs
    pub fn print_urls(&self, set: &ThumbnailSet) {
        for (tier, url) in set.iter() {
            println!("{:<7} {}", tier.key(), url);
        }
    }

    /// Print the tier table of a verified set
    pub fn print_thumbnail_table(
        &self,
        set: &ThumbnailSet,
        availability: Option<&Availability>,
        selected: Option<ThumbnailTier>,
    ) {
        if self.quiet() {
            return;
        }

        self.println(format!("📹 {}", set.video_id().bold()));
        for (tier, url) in set.iter() {
            let marker = if selected == Some(tier) { "▶" } else { " " };
            let state = match availability {
                Some(a) if a.is_available(tier) => "available".green(),
                Some(_) => "missing".red(),
                None => "unverified".yellow(),
            };
            self.println(format!(
                " {} {:<20} {:<10} {:<7} {:<10} {}",
                marker,
                tier.label(),
                tier.dimensions(),
                tier.approx_size(),
                state,
                url.dimmed()
            ));
        }
    }

    /// Print the queue summary
    pub fn print_queue(&self, queue: &DownloadQueue) {
        if self.quiet() || queue.is_empty() {
            return;
        }

        self.println(String::new());
        self.println("📋 Download queue".to_string());
        for entry in queue.iter() {
            let status = match entry.status {
                DownloadStatus::Pending => "pending".normal(),
                DownloadStatus::Downloading => "downloading".yellow(),
                DownloadStatus::Completed => "completed".green(),
                DownloadStatus::Failed => "failed".red(),
            };
            self.println(format!(
                "  [{}] {} {:<6} {:>3}% {}",
                entry.id, entry.video_id, entry.tier.key(), entry.progress, status
            ));
        }
    }

    /// Print run summary
    pub fn print_summary(&self, completed: usize, failed: usize, duration: Duration) {
        if self.quiet() {
            return;
        }

        self.println(format!(
            "⏱️  {} saved, {} failed in {}",
            completed,
            failed,
            format_duration(duration)
        ));
    }

    fn println(&self, line: String) {
        if self.bars.is_empty() {
            println!("{}", line);
        } else {
            let _ = self.multi.println(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(verbosity: VerbosityLevel) -> OutputFormatter {
        OutputFormatter::new(verbosity).with_progress(false)
    }

    #[test]
    fn test_output_formatter_creation() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        assert_eq!(formatter.verbosity, VerbosityLevel::Normal);
        assert!(formatter.bars.is_empty());
    }

    #[test]
    fn test_start_download_quiet_mode() {
        let mut formatter = formatter(VerbosityLevel::Quiet);
        let entry = QueueEntry::new("dQw4w9WgXcQ", ThumbnailTier::MaxRes);
        formatter.start_download(&entry, "cyberthum-dQw4w9WgXcQ-maxRes.jpg");
        assert!(formatter.bars.is_empty());
    }

    #[test]
    fn test_download_bar_lifecycle() {
        let mut formatter = OutputFormatter::new(VerbosityLevel::Normal);
        formatter.multi.set_draw_target(ProgressDrawTarget::hidden());

        let entry = QueueEntry::new("dQw4w9WgXcQ", ThumbnailTier::High);
        formatter.start_download(&entry, "cyberthum-dQw4w9WgXcQ-hq.jpg");
        assert_eq!(formatter.bars.len(), 1);

        let mut progress = Progress::new(1000);
        progress.update(500);
        formatter.update_download(&entry.id, &progress);
        assert_eq!(formatter.bars[&entry.id].position(), 60);
        assert!(formatter.bars[&entry.id].message().starts_with("500 B/1000 B"));

        progress.speed = Some(2048.0);
        progress.eta = Some(Duration::from_secs(3));
        formatter.update_download(&entry.id, &progress);
        assert_eq!(
            formatter.bars[&entry.id].message(),
            "500 B/1000 B @ 2.0 KB/s ETA 3s"
        );

        formatter.finish_download(&entry.id, DownloadStatus::Completed, "saved");
        assert!(formatter.bars.is_empty());
    }

    #[test]
    fn test_update_unknown_download_is_ignored() {
        let mut formatter = formatter(VerbosityLevel::Normal);
        formatter.update_download("missing", &Progress::new(10));
        formatter.finish_download("missing", DownloadStatus::Failed, "gone");
    }

    #[test]
    fn test_verifying_spinner_hidden_when_quiet() {
        let formatter = formatter(VerbosityLevel::Quiet);
        assert!(formatter.verifying("dQw4w9WgXcQ").is_hidden());
    }

    #[test]
    fn test_print_helpers_do_not_panic() {
        let formatter = formatter(VerbosityLevel::Normal);
        let set = ThumbnailSet::new("dQw4w9WgXcQ");
        let availability = Availability::from_results([false, true, true, true]);

        formatter.print_urls(&set);
        formatter.print_thumbnail_table(&set, Some(&availability), Some(ThumbnailTier::High));
        formatter.print_thumbnail_table(&set, None, None);
        formatter.print_fetch_error(
            "",
            &FetchError {
                code: "EMPTY_SIGNAL",
                message: "Input buffer is empty.".to_string(),
            },
        );

        let mut queue = DownloadQueue::new();
        queue.push(QueueEntry::new("dQw4w9WgXcQ", ThumbnailTier::High));
        formatter.print_queue(&queue);
        formatter.print_summary(1, 0, Duration::from_secs(2));
    }
}
