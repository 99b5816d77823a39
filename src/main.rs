use anyhow::{Result, bail};
use movement_ingest::{
    Config, CsvRecordSink, FsContentSource, LineFailure, Location, TriggerEvent, ingest,
    setup_logging,
};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    setup_logging(config.log_format)?;

    let event = get_event()?;
    let source = FsContentSource::default();
    let sink = CsvRecordSink::new(std::io::stdout());

    let reports = ingest(&source, &sink, &event, &config, handle_line_error);
    sink.into_inner()?;

    let failed = reports
        .iter()
        .filter(|report| report.outcome.is_source_failure())
        .count();
    if failed > 0 {
        bail!("{failed} of {} files could not be read", reports.len());
    }
    Ok(())
}

fn get_event() -> Result<TriggerEvent> {
    let locations: Vec<String> = std::env::args().skip(1).collect();
    if locations.is_empty() {
        bail!("Usage: movement-ingest <file>...");
    }
    Ok(TriggerEvent::new(locations))
}

// Just logs errors here, but can be changed to do more sophisticated error handling, e.g., quarantining bad lines
fn handle_line_error(location: &Location, failure: LineFailure) {
    tracing::warn!(%location, ordinal = failure.ordinal, "{}", failure.error)
}
