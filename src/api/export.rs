//! CSV rendering of forecast steps

use anyhow::{Context, Result};

use crate::models::{ForecastStep, Variable};

/// Render `timestamp,step,<variable codes>` followed by one row per step
pub fn forecast_to_csv(forecast: &[ForecastStep]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["timestamp", "step"];
    header.extend(Variable::ALL.map(Variable::code));
    writer.write_record(&header)?;

    for step in forecast {
        let mut record = vec![step.iso_timestamp(), step.step.to_string()];
        record.extend(
            Variable::ALL.map(|variable| step.predictions.get(variable).to_string()),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).with_context(|| "CSV output is not UTF-8")
}
