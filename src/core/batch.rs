use crate::core::calculator::PipetteCalculator;
use crate::core::parser::{parse_samples, validate_samples};
use crate::domain::model::{BatchResult, SampleInput, SimulationConfig};
use crate::utils::error::Result;

/// Parse, validate and compute a whole sheet.
///
/// Nothing is computed unless every sample passes validation; the error then
/// carries the full list of problems.
pub fn run_batch(raw: &str, config: SimulationConfig) -> Result<BatchResult> {
    let samples = parse_samples(raw)?;
    validate_samples(&samples).into_result()?;
    Ok(compute_validated(&samples, config))
}

/// Computation step for samples that already passed [`validate_samples`].
pub fn compute_validated(samples: &[SampleInput], config: SimulationConfig) -> BatchResult {
    let calculator = PipetteCalculator::new(config);
    BatchResult {
        config,
        results: calculator.compute_batch(samples),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::template;
    use crate::domain::model::DilutionOutcome;
    use crate::utils::error::PipetteError;

    #[test]
    fn test_run_batch_on_template() {
        let batch = run_batch(template(), SimulationConfig::default()).unwrap();

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.results[0].sample_id, "Sample01");
        assert_eq!(batch.results[1].outcome, DilutionOutcome::TooDilute);

        let summary = batch.summary();
        assert_eq!(summary.processed, 5);
        assert_eq!(summary.diluted, 3);
        assert_eq!(summary.too_dilute, 2);
    }

    #[test]
    fn test_run_batch_csv_export() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,40\nA2,10\nA3,20";
        let batch = run_batch(raw, SimulationConfig::default()).unwrap();

        assert_eq!(
            batch.to_csv(),
            "SampleID,Volume Sample (µL),Volume Water (µL)\nA1,25,25\nA2,50,0\nA3,1,49"
        );
    }

    #[test]
    fn test_run_batch_stops_on_validation_errors() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,40\n,12\nA3,abc";
        let err = run_batch(raw, SimulationConfig::default()).unwrap_err();

        match err {
            PipetteError::ValidationError { errors } => assert_eq!(
                errors,
                vec![
                    "Sample 2: Missing SampleID",
                    "Sample A3: Concentration must be greater than 0",
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_batch_empty_sheet() {
        let err = run_batch("SampleID,Concentration (ng/µL)", SimulationConfig::default())
            .unwrap_err();

        assert_eq!(err.user_friendly_message(), "No samples found in CSV file");
    }

    #[test]
    fn test_run_batch_surfaces_parse_errors() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,40,1";
        let err = run_batch(raw, SimulationConfig::default()).unwrap_err();

        assert!(matches!(err, PipetteError::ParseError { .. }));
    }
}
