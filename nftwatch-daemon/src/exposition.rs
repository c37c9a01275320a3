//! Prometheus exposition of a collection pass.
//!
//! Every scrape builds its own, non-global `PrometheusRecorder`, so nothing
//! observed in one scrape leaks into the next. Only the exclusion and failure
//! counters held by [`CollectionStats`](nftwatch_collector::CollectionStats)
//! survive between scrapes, and they are replayed as absolute values.

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

use nftwatch_collector::{Collector, KernelStateProvider, MetricKind, MetricSink, Sample};

/// Content type of the Prometheus text format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Forwards samples to whichever recorder is installed for the current scope.
///
/// Samples sharing a label set (rules with the same comment) collapse onto one
/// series: a gauge keeps the last value, a counter keeps the largest, since
/// `Counter::absolute` never moves a counter backwards.
struct RecorderSink;

impl MetricSink for RecorderSink {
    fn emit(&mut self, sample: Sample) {
        let labels: Vec<Label> = sample
            .labels()
            .map(|(key, value)| Label::new(key, value.to_owned()))
            .collect();
        let name = sample.metric.name();

        match sample.metric.kind() {
            MetricKind::Gauge => {
                #[allow(clippy::cast_precision_loss)]
                metrics::gauge!(name, labels).set(sample.value as f64);
            }
            MetricKind::Counter => {
                metrics::counter!(name, labels).absolute(sample.value);
            }
        }
    }
}

/// Run one collection pass and render it in the Prometheus text format.
///
/// Blocking: the provider may spawn processes. Call from a blocking context.
pub fn render<P: KernelStateProvider>(collector: &Collector<P>) -> String {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        nftwatch_core::metrics::describe_all();
        collector.collect(&mut RecorderSink);
        collector.stats().emit(&mut RecorderSink);
    });

    handle.render()
}
