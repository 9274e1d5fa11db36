use std::io;

use super::domain::Report;

/// Failures surfaced while streaming a report export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode report row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] io::Error),
}

/// Write a header row plus one row per report. Absent optionals become
/// empty cells rather than sentinel values.
pub fn write_csv<W: io::Write>(reports: &[Report], writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "id",
        "title",
        "category",
        "status",
        "severity",
        "region",
        "location",
        "submitted_at",
        "assigned_to",
        "response_time_hours",
    ])?;

    for report in reports {
        out.write_record(&[
            report.id.0.clone(),
            report.title.clone(),
            report.category.label().to_string(),
            report.status.label().to_string(),
            report.severity.get().to_string(),
            report.region.clone(),
            report.location.clone(),
            report.submitted_at.to_rfc3339(),
            report.assigned_to.clone().unwrap_or_default(),
            report
                .response_time_hours
                .map(|hours| hours.to_string())
                .unwrap_or_default(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

pub fn csv_bytes(reports: &[Report]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(reports, &mut buffer)?;
    Ok(buffer)
}
