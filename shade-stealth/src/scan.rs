//! Batch scanning with statistics.
//!
//! Works with any [`PaymentDetector`], so the receiver and an auditor scan
//! the same way.

use std::time::Instant;

use tracing::{debug, info};

use shade_core::traits::PaymentDetector;
use shade_core::types::StealthPayment;

/// Outcome of checking one payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// Not addressed to the watched receiver
    NotForUs,
    /// Addressed to the watched receiver
    Detected,
    /// Ephemeral key or derived values did not decode
    Failed,
}

/// Statistics for a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Total payments scanned
    pub total_scanned: u64,
    /// Payments detected as ours
    pub detected: u64,
    /// Payments that failed to decode
    pub errors: u64,
    /// Duration of the scan in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan result.
    pub fn record(&mut self, result: ScanResult) {
        self.total_scanned += 1;
        match result {
            ScanResult::Detected => self.detected += 1,
            ScanResult::Failed => self.errors += 1,
            ScanResult::NotForUs => {}
        }
    }

    /// Returns the scan rate (payments per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.total_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }
}

/// Matching indices plus statistics.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Indices of detected payments, in input order
    pub matches: Vec<usize>,
    /// Counters for the run
    pub stats: ScanStats,
}

/// Checks one payment.
pub fn scan_payment<D: PaymentDetector + ?Sized>(
    detector: &D,
    payment: &StealthPayment,
) -> ScanResult {
    match detector.detect(payment) {
        Ok(true) => ScanResult::Detected,
        Ok(false) => ScanResult::NotForUs,
        Err(e) => {
            debug!(ephemeral_pk = %payment.ephemeral_pk, error = %e, "Scan failed for payment");
            ScanResult::Failed
        }
    }
}

/// Scans a batch, recording statistics.
pub fn scan_payments<D: PaymentDetector + ?Sized>(
    detector: &D,
    payments: &[StealthPayment],
) -> ScanReport {
    let start = Instant::now();
    let mut report = ScanReport::default();

    for (idx, payment) in payments.iter().enumerate() {
        let result = scan_payment(detector, payment);
        if result == ScanResult::Detected {
            report.matches.push(idx);
        }
        report.stats.record(result);
    }

    report.stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        scanned = report.stats.total_scanned,
        detected = report.stats.detected,
        errors = report.stats.errors,
        duration_ms = report.stats.duration_ms,
        "Scan complete"
    );
    report
}
