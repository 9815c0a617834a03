use std::fmt::Write as _;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub insert_models_total: AtomicU64,
    pub update_models_total: AtomicU64,
    pub delete_models_total: AtomicU64,
    pub empty_updates_total: AtomicU64,
    pub tokens_generated_total: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            insert_models_total: AtomicU64::new(0),
            update_models_total: AtomicU64::new(0),
            delete_models_total: AtomicU64::new(0),
            empty_updates_total: AtomicU64::new(0),
            tokens_generated_total: AtomicU64::new(0),
        }
    }
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

pub fn metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::default)
}

pub(crate) fn record_insert_model() {
    metrics().insert_models_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_update_model() {
    metrics().update_models_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_delete_model() {
    metrics().delete_models_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_empty_update() {
    metrics().empty_updates_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_token_generated() {
    metrics()
        .tokens_generated_total
        .fetch_add(1, Ordering::Relaxed);
}

pub fn render_prometheus() -> String {
    let m = metrics();
    let mut s = String::new();
    let _ = writeln!(
        s,
        "# TYPE insert_models_total counter\ninsert_models_total {}",
        m.insert_models_total.load(Ordering::Relaxed)
    );
    let _ = writeln!(
        s,
        "# TYPE update_models_total counter\nupdate_models_total {}",
        m.update_models_total.load(Ordering::Relaxed)
    );
    let _ = writeln!(
        s,
        "# TYPE delete_models_total counter\ndelete_models_total {}",
        m.delete_models_total.load(Ordering::Relaxed)
    );
    let _ = writeln!(
        s,
        "# TYPE empty_updates_total counter\nempty_updates_total {}",
        m.empty_updates_total.load(Ordering::Relaxed)
    );
    let _ = writeln!(
        s,
        "# TYPE tokens_generated_total counter\ntokens_generated_total {}",
        m.tokens_generated_total.load(Ordering::Relaxed)
    );
    s
}
