use crate::error::Result;
use crate::model::check_counts;

pub mod csv_data;

/// Examples paired with their targets, one `Vec` per example
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        let dataset = Dataset { inputs, targets };
        dataset.validate()?;
        Ok(dataset)
    }

    /// The XOR truth table
    pub fn xor() -> Dataset {
        Dataset {
            inputs: vec![
                vec![0f64, 0f64],
                vec![0f64, 1f64],
                vec![1f64, 0f64],
                vec![1f64, 1f64],
            ],
            targets: vec![vec![0f64], vec![1f64], vec![1f64], vec![0f64]],
        }
    }

    /// Check that there is exactly one target per input
    pub fn validate(&self) -> Result<()> {
        check_counts(self.inputs.len(), self.targets.len())
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
