//! Observability hooks, zero-cost when the `tracing` feature is off.
//!
//! Mirrors the span-per-event shape of `kaos::insights`: each hook is a
//! `tracing` span under the `tracing` feature and an inlined no-op
//! otherwise, so the instrumented call sites never branch on a feature
//! flag themselves.

#[cfg(feature = "tracing")]
#[inline]
pub fn record_write_wait(seq: i64) {
    let _span = tracing::trace_span!("ringq_write_wait", seq).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_write_wait(_seq: i64) {}

#[cfg(feature = "tracing")]
#[inline]
pub fn record_read_wait(seq: i64) {
    let _span = tracing::trace_span!("ringq_read_wait", seq).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_read_wait(_seq: i64) {}

#[cfg(feature = "tracing")]
#[inline]
pub fn record_arc_destroy() {
    let _span = tracing::debug_span!("atomic_arc_destroy").entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_arc_destroy() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hooks_compile_and_run_with_tracing_disabled() {
        record_write_wait(0);
        record_read_wait(0);
        record_arc_destroy();
    }
}
