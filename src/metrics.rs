#[cfg(feature = "metrics")]
pub use registry::gather_metrics;
pub(crate) use registry::{record_chunk, record_failure, record_query, set_buffer_size};

#[cfg(feature = "metrics")]
mod registry {
    use lazy_static::lazy_static;
    use prometheus::{
        register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
    };

    lazy_static! {
        static ref QUERY_COUNT: IntCounter = register_int_counter!(
            "player_queries_total",
            "Total number of player queries dispatched"
        ).expect("player_queries_total registers once");
        static ref FAILURE_COUNT: IntCounter = register_int_counter!(
            "player_query_failures_total",
            "Player queries that ended in the error state"
        ).expect("player_query_failures_total registers once");
        static ref CHUNK_COUNT: IntCounter = register_int_counter!(
            "stream_chunks_total",
            "Response chunks received"
        ).expect("stream_chunks_total registers once");
        static ref BYTE_COUNT: IntCounter = register_int_counter!(
            "stream_bytes_total",
            "Response bytes received"
        ).expect("stream_bytes_total registers once");
        static ref BUFFER_SIZE_GAUGE: IntGauge = register_int_gauge!(
            "stream_buffer_bytes",
            "Size of the last completed stream buffer in bytes"
        ).expect("stream_buffer_bytes registers once");
    }

    pub(crate) fn record_query() {
        QUERY_COUNT.inc();
    }

    pub(crate) fn record_failure() {
        FAILURE_COUNT.inc();
    }

    pub(crate) fn record_chunk(bytes: usize) {
        CHUNK_COUNT.inc();
        BYTE_COUNT.inc_by(bytes as u64);
    }

    pub(crate) fn set_buffer_size(bytes: usize) {
        BUFFER_SIZE_GAUGE.set(bytes as i64);
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn gather_metrics() -> Result<String, prometheus::Error> {
        // touch the lazies so the families exist before the first query
        lazy_static::initialize(&QUERY_COUNT);
        lazy_static::initialize(&FAILURE_COUNT);
        lazy_static::initialize(&CHUNK_COUNT);
        lazy_static::initialize(&BYTE_COUNT);
        lazy_static::initialize(&BUFFER_SIZE_GAUGE);

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(not(feature = "metrics"))]
mod registry {
    pub(crate) fn record_query() {}
    pub(crate) fn record_failure() {}
    pub(crate) fn record_chunk(_bytes: usize) {}
    pub(crate) fn set_buffer_size(_bytes: usize) {}
}
