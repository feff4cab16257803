//! Sample sheet parsing and validation.
//!
//! The sheet is comma-delimited with a header row naming a `SampleID` column
//! and a `Concentration (ng/µL)` column. Other columns are ignored.

use crate::domain::model::{SampleInput, ValidationReport};
use crate::utils::error::{PipetteError, Result};
use csv::{ReaderBuilder, StringRecord};

const TEMPLATE: &str = "SampleID,Concentration (ng/µL)
Sample01,48.7
Sample02,12.3
Sample03,35.2
Sample04,8.9
Sample05,42.1";

/// Example sheet handed to users as a starting point.
pub fn template() -> &'static str {
    TEMPLATE
}

/// Parse raw sheet text into samples, one per non-empty data row.
///
/// Concentrations that are empty or not numbers become `0.0` and are left for
/// [`validate_samples`] to report. Only a malformed grammar (rows whose column
/// count disagrees with the header, invalid UTF-8) fails here, with every
/// offending row listed in a single message.
pub fn parse_samples(raw: &str) -> Result<Vec<SampleInput>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| parse_failure(vec![e.to_string()]))?
        .clone();
    let columns = SheetColumns::locate(&headers);

    let mut samples = Vec::new();
    let mut errors = Vec::new();

    for record in reader.records() {
        match record {
            Ok(record) => samples.push(columns.sample_from(&record)),
            Err(e) => errors.push(e.to_string()),
        }
    }

    if !errors.is_empty() {
        tracing::debug!("Sheet has {} malformed rows", errors.len());
        return Err(parse_failure(errors));
    }

    tracing::debug!("Parsed {} samples", samples.len());
    Ok(samples)
}

/// Check every sample without dropping any; the caller decides whether to abort.
pub fn validate_samples(samples: &[SampleInput]) -> ValidationReport {
    let mut errors = Vec::new();

    if samples.is_empty() {
        errors.push("No samples found in CSV file".to_string());
    }

    for (index, sample) in samples.iter().enumerate() {
        if sample.sample_id.is_empty() {
            errors.push(format!("Sample {}: Missing SampleID", index + 1));
        }

        if sample.concentration.is_nan() || sample.concentration <= 0.0 {
            errors.push(format!(
                "Sample {}: Concentration must be greater than 0",
                sample.sample_id
            ));
        }
    }

    ValidationReport::from_errors(errors)
}

fn parse_failure(messages: Vec<String>) -> PipetteError {
    PipetteError::ParseError {
        message: format!("CSV parsing errors: {}", messages.join(", ")),
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct SheetColumns {
    sample_id: Option<usize>,
    concentration: Option<usize>,
}

impl SheetColumns {
    fn locate(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let columns = Self {
            sample_id: normalized.iter().position(|h| h == "sampleid"),
            concentration: normalized
                .iter()
                .position(|h| h.starts_with("concentration")),
        };

        if columns.sample_id.is_none() {
            tracing::warn!("No SampleID column in header: {:?}", headers);
        }
        if columns.concentration.is_none() {
            tracing::warn!("No concentration column in header: {:?}", headers);
        }

        columns
    }

    fn sample_from(&self, record: &StringRecord) -> SampleInput {
        let sample_id = self
            .sample_id
            .and_then(|i| record.get(i))
            .unwrap_or_default()
            .to_string();

        SampleInput {
            sample_id,
            concentration: coerce_concentration(self.concentration.and_then(|i| record.get(i))),
        }
    }
}

fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Leading number of the field, so `"48.7 ng/uL"` reads as `48.7`.
/// Anything without a numeric prefix, or non-finite, becomes `0.0`.
fn coerce_concentration(field: Option<&str>) -> f64 {
    field
        .map(str::trim_start)
        .and_then(|value| value[..numeric_prefix_len(value)].parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Byte length of the longest `[+-]digits[.digits][(e|E)[+-]digits]` prefix.
fn numeric_prefix_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_digits = digits_from(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_from(end + 1);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let samples = parse_samples(template()).unwrap();

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], SampleInput::new("Sample01", 48.7));
        assert_eq!(samples[3], SampleInput::new("Sample04", 8.9));
        assert_eq!(samples[4], SampleInput::new("Sample05", 42.1));
    }

    #[test]
    fn test_template_is_header_plus_five_rows() {
        let lines: Vec<&str> = template().split('\n').collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "SampleID,Concentration (ng/µL)");
        assert!(!template().ends_with('\n'));
    }

    #[test]
    fn test_parse_skips_empty_lines() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,40\n\nA2,10\n\n";
        let samples = parse_samples(raw).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].sample_id, "A2");
    }

    #[test]
    fn test_parse_coerces_bad_concentrations_to_zero() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,\nA2,n/a\nA3, 12.5 \nA4,NaN";
        let samples = parse_samples(raw).unwrap();

        assert_eq!(samples[0].concentration, 0.0);
        assert_eq!(samples[1].concentration, 0.0);
        assert_eq!(samples[2].concentration, 12.5);
        assert_eq!(samples[3].concentration, 0.0);
    }

    #[test]
    fn test_parse_reads_leading_number_of_unit_suffixed_values() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,48.7 ng/uL\nA2,12abc\nA3,1e2\nA4,.5x\nA5,-3e-1 units\nA6,e5";
        let samples = parse_samples(raw).unwrap();

        let concentrations: Vec<f64> = samples.iter().map(|s| s.concentration).collect();
        assert_eq!(concentrations, vec![48.7, 12.0, 100.0, 0.5, -0.3, 0.0]);

        let report = validate_samples(&samples[..3]);
        assert!(report.is_valid, "{:?}", report.errors);
    }

    #[test]
    fn test_numeric_prefix_len() {
        assert_eq!(numeric_prefix_len("48.7 ng/uL"), 4);
        assert_eq!(numeric_prefix_len("1."), 2);
        assert_eq!(numeric_prefix_len("2e"), 1);
        assert_eq!(numeric_prefix_len("2E+3mL"), 4);
        assert_eq!(numeric_prefix_len("-"), 0);
        assert_eq!(numeric_prefix_len("."), 0);
        assert_eq!(numeric_prefix_len("abc"), 0);
    }

    #[test]
    fn test_parse_finds_columns_by_name() {
        let raw = "Well,Concentration (ng/µL),SampleID\nA1,33.3,DNA-7";
        let samples = parse_samples(raw).unwrap();

        assert_eq!(samples, vec![SampleInput::new("DNA-7", 33.3)]);
    }

    #[test]
    fn test_parse_header_only_yields_no_samples() {
        let samples = parse_samples("SampleID,Concentration (ng/µL)\n").unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_parse_missing_columns_default_to_empty() {
        let raw = "Name,Value\nA1,40";
        let samples = parse_samples(raw).unwrap();

        assert_eq!(samples, vec![SampleInput::new("", 0.0)]);
    }

    #[test]
    fn test_parse_rejects_inconsistent_columns() {
        let raw = "SampleID,Concentration (ng/µL)\nA1,40,extra\nA2,10\nA3";
        let err = parse_samples(raw).unwrap_err();

        match err {
            PipetteError::ParseError { message } => {
                assert!(message.starts_with("CSV parsing errors: "));
                // two bad rows, joined into one message
                assert_eq!(message.matches("fields").count(), 4);
                assert!(message.contains(", "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_quoted_identifier() {
        let raw = "SampleID,Concentration (ng/µL)\n\"Plate 1, A1\",40";
        let samples = parse_samples(raw).unwrap();

        assert_eq!(samples[0].sample_id, "Plate 1, A1");
    }

    #[test]
    fn test_validate_empty_batch() {
        let report = validate_samples(&[]);

        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["No samples found in CSV file"]);
    }

    #[test]
    fn test_validate_reports_every_violation_in_order() {
        let samples = vec![
            SampleInput::new("A1", 40.0),
            SampleInput::new("", 10.0),
            SampleInput::new("A3", 0.0),
            SampleInput::new("", -2.0),
        ];

        let report = validate_samples(&samples);

        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Sample 2: Missing SampleID",
                "Sample A3: Concentration must be greater than 0",
                "Sample 4: Missing SampleID",
                "Sample : Concentration must be greater than 0",
            ]
        );
        assert_eq!(samples.len(), 4);
    }

    #[test]
    fn test_validate_accepts_good_samples() {
        let samples = parse_samples(template()).unwrap();
        let report = validate_samples(&samples);

        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }
}
