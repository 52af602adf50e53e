use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use super::Dataset;
use crate::error::{Error, Result};

/// Parse a CSV dataset.
///
/// The first line is a header and is skipped. Every following record holds
/// `input_dimension` input values followed by `output_dimension` target values.
pub fn parse_dataset(
    path: impl AsRef<Path>,
    input_dimension: usize,
    output_dimension: usize,
) -> Result<Dataset> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let dataset = read_records(reader, input_dimension, output_dimension)?;
    debug!(path = %path.display(), examples = dataset.len(), "parsed dataset");

    Ok(dataset)
}

fn read_records<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    input_dimension: usize,
    output_dimension: usize,
) -> Result<Dataset> {
    let line_size = input_dimension + output_dimension;
    let mut dataset = Dataset::default();

    for (idx, record) in reader.deserialize::<Vec<f64>>().enumerate() {
        let record = record?;
        if record.len() != line_size {
            // +2: one for the header, one because lines count from 1
            return Err(Error::shape(format!(
                "line {} has {} values, expected {} inputs and {} targets",
                idx + 2,
                record.len(),
                input_dimension,
                output_dimension
            )));
        }

        let (input, target) = record.split_at(input_dimension);
        dataset.inputs.push(input.to_vec());
        dataset.targets.push(target.to_vec());
    }

    Ok(dataset)
}
