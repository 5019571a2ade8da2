// core/src/metrics.rs
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::models::Severity;
use crate::timing::TriggerDecision;

static REGISTRY: Lazy<Registry> =
    Lazy::new(|| Registry::new_custom(Some("curvecall".into()), None).expect("registry"));

fn register<C: prometheus::core::Collector + Clone + 'static>(c: C) -> C {
    // duplicate registration only happens if the same name is declared twice
    let _ = REGISTRY.register(Box::new(c.clone()));
    c
}

pub static ROUTES_ANALYZED: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new("routes_analyzed_total", "Routes run through the analyzer").expect("metric"))
});

pub static CURVES_DETECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    register(
        IntCounterVec::new(Opts::new("curves_detected_total", "Curves detected, by severity"), &["severity"])
            .expect("metric"),
    )
});

pub static MAP_MATCH_FULL_SCANS: Lazy<IntCounter> = Lazy::new(|| {
    register(
        IntCounter::new("map_match_full_scans_total", "Window misses that fell back to a full route scan")
            .expect("metric"),
    )
});

pub static OFF_ROUTE_FIXES: Lazy<IntCounter> = Lazy::new(|| {
    register(IntCounter::new("off_route_fixes_total", "Fixes matched farther than the off-route threshold").expect("metric"))
});

pub static TRIGGER_DECISIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register(
        IntCounterVec::new(Opts::new("trigger_decisions_total", "Timing decisions, by kind"), &["decision"])
            .expect("metric"),
    )
});

pub fn record_curve(severity: Severity) {
    CURVES_DETECTED.with_label_values(&[severity.as_str()]).inc();
}

pub fn record_decision(decision: TriggerDecision) {
    TRIGGER_DECISIONS.with_label_values(&[decision.as_str()]).inc();
}

/// Current values in the Prometheus text exposition format.
pub fn gather_text() -> String {
    // metrics register on first touch
    Lazy::force(&ROUTES_ANALYZED);
    Lazy::force(&CURVES_DETECTED);
    Lazy::force(&MAP_MATCH_FULL_SCANS);
    Lazy::force(&OFF_ROUTE_FIXES);
    Lazy::force(&TRIGGER_DECISIONS);

    let mut buf = Vec::new();
    if TextEncoder::new().encode(&REGISTRY.gather(), &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
