use std::sync::atomic::{AtomicU64, Ordering};

use backend_domain::ImportReport;

#[derive(Debug, Default)]
pub struct Metrics {
    imports: AtomicU64,
    import_failures: AtomicU64,
    rows_created: AtomicU64,
    rows_updated: AtomicU64,
    rows_skipped: AtomicU64,
    rows_failed: AtomicU64,
    matches_logged: AtomicU64,
}

impl Metrics {
    pub fn record_import(&self, report: &ImportReport) {
        self.imports.fetch_add(1, Ordering::Relaxed);
        self.rows_created
            .fetch_add(report.created as u64, Ordering::Relaxed);
        self.rows_updated
            .fetch_add(report.updated as u64, Ordering::Relaxed);
        self.rows_skipped
            .fetch_add(report.skipped as u64, Ordering::Relaxed);
        self.rows_failed
            .fetch_add(report.errors as u64, Ordering::Relaxed);
    }

    pub fn record_import_failure(&self) {
        self.import_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_match_logged(&self) {
        self.matches_logged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("beyleague_imports_total", &self.imports),
            ("beyleague_import_failures_total", &self.import_failures),
            ("beyleague_import_rows_created_total", &self.rows_created),
            ("beyleague_import_rows_updated_total", &self.rows_updated),
            ("beyleague_import_rows_skipped_total", &self.rows_skipped),
            ("beyleague_import_rows_failed_total", &self.rows_failed),
            ("beyleague_matches_logged_total", &self.matches_logged),
        ];
        counters
            .iter()
            .map(|(name, value)| {
                format!(
                    "# TYPE {} counter\n{} {}\n",
                    name,
                    name,
                    value.load(Ordering::Relaxed)
                )
            })
            .collect()
    }
}
