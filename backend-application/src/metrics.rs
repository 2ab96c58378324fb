use std::sync::atomic::{AtomicU64, Ordering};

use backend_domain::ScanResult;

#[derive(Debug, Default)]
pub struct Metrics {
    scans: AtomicU64,
    scan_failures: AtomicU64,
    partial_scans: AtomicU64,
    skipped_records: AtomicU64,
    alerts_created: AtomicU64,
    alerts_updated: AtomicU64,
    status_changes: AtomicU64,
}

impl Metrics {
    pub fn record_scan(&self, result: &ScanResult) {
        self.scans.fetch_add(1, Ordering::Relaxed);
        if result.partial {
            self.partial_scans.fetch_add(1, Ordering::Relaxed);
        }
        self.skipped_records
            .fetch_add(result.skipped_records as u64, Ordering::Relaxed);
        self.alerts_created
            .fetch_add(result.alerts_created as u64, Ordering::Relaxed);
        self.alerts_updated
            .fetch_add(result.alerts_updated as u64, Ordering::Relaxed);
    }

    pub fn record_scan_failure(&self) {
        self.scan_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_status_change(&self) {
        self.status_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scans(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    pub fn scan_failures(&self) -> u64 {
        self.scan_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("doorguard_scans_total", self.scans.load(Ordering::Relaxed)),
            (
                "doorguard_scan_failures_total",
                self.scan_failures.load(Ordering::Relaxed),
            ),
            (
                "doorguard_partial_scans_total",
                self.partial_scans.load(Ordering::Relaxed),
            ),
            (
                "doorguard_skipped_records_total",
                self.skipped_records.load(Ordering::Relaxed),
            ),
            (
                "doorguard_alerts_created_total",
                self.alerts_created.load(Ordering::Relaxed),
            ),
            (
                "doorguard_alerts_updated_total",
                self.alerts_updated.load(Ordering::Relaxed),
            ),
            (
                "doorguard_alert_status_changes_total",
                self.status_changes.load(Ordering::Relaxed),
            ),
        ];
        let mut out = String::new();
        for (name, value) in counters {
            out.push_str(&format!("# TYPE {} counter\n{} {}\n", name, name, value));
        }
        out
    }
}
