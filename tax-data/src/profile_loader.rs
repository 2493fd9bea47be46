//! Salary profile loader.
//!
//! A profile is one person's salary slip plus their claimed deductions. Two
//! file formats are accepted, both using the same snake_case keys:
//!
//! - CSV, one row per profile, headers matched by name.
//! - TOML, one `[[profile]]` table per profile.
//!
//! Every key is optional. A missing column, an empty cell or a cell that is
//! not a number reads as zero (see [`crate::parse_amount`]), and so does an
//! amount larger than [`crate::amount::MAX_AMOUNT_RUPEES`].
//!
//! | Key | Maps to |
//! |---------------------------|-------------------------------------------|
//! | `label` | profile name, defaults to `profile N` |
//! | `basic_salary` | [`CompensationInputs::basic_salary`] |
//! | `pf_contribution` | [`CompensationInputs::pf_contribution`] |
//! | `house_rent_allowance` | [`CompensationInputs::house_rent_allowance`] |
//! | `conveyance_allowance` | [`CompensationInputs::conveyance_allowance`] |
//! | `leave_travel_allowance` | [`CompensationInputs::leave_travel_allowance`] |
//! | `food_card_reimbursement` | [`CompensationInputs::food_card_reimbursement`] |
//! | `superannuation_fund` | [`CompensationInputs::superannuation_fund`] |
//! | `national_pension_scheme` | [`CompensationInputs::national_pension_scheme`] |
//! | `car_running_expenses` | [`CompensationInputs::car_running_expenses`] |
//! | `driver_salary` | [`CompensationInputs::driver_salary`] |
//! | `special_allowance` | [`CompensationInputs::special_allowance`] |
//! | `gift_cards` | [`CompensationInputs::gift_cards`] |
//! | `other_income` | [`CompensationInputs::other_income`] |
//! | `professional_tax` | [`CompensationInputs::professional_tax`] |
//! | `actual_rent_paid` | [`HousingDetails::actual_rent_paid`] |
//! | `metro_city` | [`HousingDetails::metro_city`] (`yes`/`true`/`1`) |
//! | `section_80c` .. `section_80tta` | [`DeductionInputs`] sections |
//! | `standard_deduction` | [`DeductionInputs::standard_deduction`] |
//!
//! ### Example
//!
//! ```csv
//! label,basic_salary,house_rent_allowance,professional_tax,section_80c
//! Asha,600000,300000,2400,150000
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{CompensationInputs, DeductionInputs, HousingDetails};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading salary profiles.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("profile row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported profile format '{}' (expected .csv or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("no salary profiles found")]
    NoProfiles,
}

/// A named set of inputs ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryProfile {
    pub label: String,
    pub compensation: CompensationInputs,
    pub deductions: DeductionInputs,
}

/// One row or table exactly as it appears in the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalaryRecord {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub basic_salary: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub pf_contribution: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub house_rent_allowance: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub conveyance_allowance: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub leave_travel_allowance: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub food_card_reimbursement: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub superannuation_fund: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub national_pension_scheme: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub car_running_expenses: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub driver_salary: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub special_allowance: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub gift_cards: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub other_income: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub professional_tax: Decimal,

    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub actual_rent_paid: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient_flag")]
    pub metro_city: bool,

    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub section_80c: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub section_80d: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub section_80e: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub section_80g: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub section_80tta: Decimal,
    #[serde(default, deserialize_with = "crate::amount::lenient")]
    pub standard_deduction: Decimal,
}

impl SalaryRecord {
    /// Splits the flat record into engine inputs. `row_number` is 1-based and
    /// only used for the fallback label.
    pub fn into_profile(
        self,
        row_number: usize,
    ) -> SalaryProfile {
        let label = self
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| format!("profile {row_number}"));

        SalaryProfile {
            label,
            compensation: CompensationInputs {
                basic_salary: self.basic_salary,
                pf_contribution: self.pf_contribution,
                house_rent_allowance: self.house_rent_allowance,
                conveyance_allowance: self.conveyance_allowance,
                leave_travel_allowance: self.leave_travel_allowance,
                food_card_reimbursement: self.food_card_reimbursement,
                superannuation_fund: self.superannuation_fund,
                national_pension_scheme: self.national_pension_scheme,
                car_running_expenses: self.car_running_expenses,
                driver_salary: self.driver_salary,
                special_allowance: self.special_allowance,
                gift_cards: self.gift_cards,
                other_income: self.other_income,
                professional_tax: self.professional_tax,
                housing: HousingDetails {
                    actual_rent_paid: self.actual_rent_paid,
                    metro_city: self.metro_city,
                },
            },
            deductions: DeductionInputs {
                section_80c: self.section_80c,
                section_80d: self.section_80d,
                section_80e: self.section_80e,
                section_80g: self.section_80g,
                section_80tta: self.section_80tta,
                standard_deduction: self.standard_deduction,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profile: Vec<SalaryRecord>,
}

/// Loader for salary profiles from CSV or TOML.
pub struct SalaryProfileLoader;

impl SalaryProfileLoader {
    /// Parses CSV text into profiles, in file order.
    ///
    /// # Errors
    ///
    /// * [`ProfileLoadError::Csv`] if the CSV is structurally invalid (for
    ///   example a row with the wrong number of cells).
    /// * [`ProfileLoadError::NoProfiles`] if there are no data rows.
    pub fn load_csv_str(input: &str) -> Result<Vec<SalaryProfile>, ProfileLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(input.as_bytes());

        let headers = reader.headers()?.clone();
        let mut profiles = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let record = Self::record_from_cells(&headers, &row?)
                .map_err(|source| ProfileLoadError::Row { row: idx + 1, source })?;
            profiles.push(record.into_profile(idx + 1));
        }

        Self::non_empty(profiles)
    }

    /// Builds a record from one CSV row with every cell kept as text, so
    /// amounts go through [`crate::parse_amount`] digit for digit instead of
    /// via a float. Empty cells are left out and fall back to their defaults.
    fn record_from_cells(
        headers: &csv::StringRecord,
        row: &csv::StringRecord,
    ) -> Result<SalaryRecord, toml::de::Error> {
        let cells: toml::Table = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(key, cell)| (key.to_string(), toml::Value::String(cell.to_string())))
            .collect();

        SalaryRecord::deserialize(toml::Value::Table(cells))
    }

    /// Parses a TOML document of `[[profile]]` tables.
    ///
    /// # Errors
    ///
    /// * [`ProfileLoadError::Toml`] if the document is not valid TOML.
    /// * [`ProfileLoadError::NoProfiles`] if it has no `[[profile]]` tables.
    pub fn load_toml_str(input: &str) -> Result<Vec<SalaryProfile>, ProfileLoadError> {
        let file: ProfileFile = toml::from_str(input)?;

        let profiles = file
            .profile
            .into_iter()
            .enumerate()
            .map(|(idx, record)| record.into_profile(idx + 1))
            .collect();

        Self::non_empty(profiles)
    }

    /// Reads `path` and parses it according to its extension (`.csv` or
    /// `.toml`, case-insensitive).
    pub fn load_from_file(path: &Path) -> Result<Vec<SalaryProfile>, ProfileLoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Vec<SalaryProfile>, ProfileLoadError> =
            match extension.as_deref() {
                Some("csv") => Self::load_csv_str,
                Some("toml") => Self::load_toml_str,
                _ => return Err(ProfileLoadError::UnsupportedFormat(path.to_path_buf())),
            };

        let contents = std::fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let profiles = parse(&contents)?;
        debug!(path = %path.display(), count = profiles.len(), "loaded salary profiles");
        Ok(profiles)
    }

    fn non_empty(profiles: Vec<SalaryProfile>) -> Result<Vec<SalaryProfile>, ProfileLoadError> {
        if profiles.is_empty() {
            Err(ProfileLoadError::NoProfiles)
        } else {
            Ok(profiles)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SLIP_CSV: &str = "\
label,basic_salary,pf_contribution,house_rent_allowance,conveyance_allowance,leave_travel_allowance,food_card_reimbursement,national_pension_scheme,special_allowance,professional_tax,section_80c,section_80d,section_80tta,standard_deduction
Asha,600000,72000,300000,19200,50000,26400,50000,100000,2400,150000,25000,10000,50000
";

    const SLIP_TOML: &str = r#"
[[profile]]
label = "Asha"
basic_salary = 600000
pf_contribution = 72000
house_rent_allowance = "3,00,000"
conveyance_allowance = 19200.0
leave_travel_allowance = 50000
food_card_reimbursement = 26400
national_pension_scheme = 50000
special_allowance = 100000
professional_tax = 2400
section_80c = 150000
section_80d = 25000
section_80tta = 10000
standard_deduction = 50000

[[profile]]
basic_salary = 900000
actual_rent_paid = 240000
metro_city = true
"#;

    // =========================================================================
    // CSV tests
    // =========================================================================

    #[test]
    fn csv_salary_slip_maps_every_column() {
        let profiles = SalaryProfileLoader::load_csv_str(SLIP_CSV).expect("should parse");

        assert_eq!(profiles.len(), 1);
        let p = &profiles[0];
        assert_eq!(p.label, "Asha");
        assert_eq!(p.compensation.basic_salary, dec!(600000));
        assert_eq!(p.compensation.pf_contribution, dec!(72000));
        assert_eq!(p.compensation.house_rent_allowance, dec!(300000));
        assert_eq!(p.compensation.food_card_reimbursement, dec!(26400));
        assert_eq!(p.compensation.professional_tax, dec!(2400));
        assert_eq!(p.deductions.section_80c, dec!(150000));
        assert_eq!(p.deductions.itemized_total(), dec!(185000));
        assert_eq!(p.deductions.standard_deduction, dec!(50000));
    }

    #[test]
    fn csv_missing_columns_read_as_zero() {
        let csv = "basic_salary\n750000\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");

        let p = &profiles[0];
        assert_eq!(p.compensation.basic_salary, dec!(750000));
        assert_eq!(p.compensation.house_rent_allowance, dec!(0));
        assert_eq!(p.compensation.housing, HousingDetails::default());
        assert_eq!(p.deductions, DeductionInputs::default());
    }

    #[test]
    fn csv_blank_and_non_numeric_cells_read_as_zero() {
        let csv = "label,basic_salary,special_allowance,gift_cards\nRavi,abc,,5000 approx\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");

        let p = &profiles[0];
        assert_eq!(p.compensation.basic_salary, dec!(0));
        assert_eq!(p.compensation.special_allowance, dec!(0));
        assert_eq!(p.compensation.gift_cards, dec!(5000));
    }

    #[test]
    fn csv_tolerates_quoted_thousands_separators_and_whitespace() {
        let csv = "basic_salary , other_income\n\"15,00,000\",  2400.50 \n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");

        assert_eq!(profiles[0].compensation.basic_salary, dec!(1500000));
        assert_eq!(profiles[0].compensation.other_income, dec!(2400.50));
    }

    #[test]
    fn csv_missing_label_uses_row_number() {
        let csv = "label,basic_salary\n,100\nNamed,200\n,300\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");
        let labels: Vec<&str> = profiles.iter().map(|p| p.label.as_str()).collect();

        assert_eq!(labels, vec!["profile 1", "Named", "profile 3"]);
    }

    #[test]
    fn csv_metro_flag_accepts_words() {
        let csv = "label,metro_city,actual_rent_paid\na,yes,1\nb,no,1\nc,true,1\nd,,1\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");
        let metro: Vec<bool> = profiles
            .iter()
            .map(|p| p.compensation.housing.metro_city)
            .collect();

        assert_eq!(metro, vec![true, false, true, false]);
    }

    #[test]
    fn csv_ragged_row_is_an_error() {
        let csv = "label,basic_salary\nAsha,600000,extra\n";

        let err = SalaryProfileLoader::load_csv_str(csv).expect_err("should reject ragged row");

        assert!(matches!(err, ProfileLoadError::Csv(_)), "got {err:?}");
    }

    #[test]
    fn csv_integer_wider_than_u64_reads_as_zero() {
        let csv = "label,basic_salary,gift_cards\nBig,20000000000000000000,5000\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");

        assert_eq!(profiles[0].compensation.basic_salary, dec!(0));
        assert_eq!(profiles[0].compensation.gift_cards, dec!(5000));
    }

    #[test]
    fn csv_amount_past_ceiling_reads_as_zero() {
        let csv = "basic_salary\n50000000000000000000000000000.0\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");

        assert_eq!(profiles[0].compensation.basic_salary, dec!(0));
    }

    #[test]
    fn csv_amount_keeps_digits_beyond_float_precision() {
        let csv = "other_income\n123456789012345.67\n";

        let profiles = SalaryProfileLoader::load_csv_str(csv).expect("should parse");

        assert_eq!(profiles[0].compensation.other_income, dec!(123456789012345.67));
    }

    #[test]
    fn csv_header_only_has_no_profiles() {
        let err = SalaryProfileLoader::load_csv_str("label,basic_salary\n")
            .expect_err("should report no profiles");

        assert!(matches!(err, ProfileLoadError::NoProfiles), "got {err:?}");
    }

    // =========================================================================
    // TOML tests
    // =========================================================================

    #[test]
    fn toml_profiles_match_csv_profiles() {
        let from_csv = SalaryProfileLoader::load_csv_str(SLIP_CSV).expect("csv");
        let from_toml = SalaryProfileLoader::load_toml_str(SLIP_TOML).expect("toml");

        assert_eq!(from_toml.len(), 2);
        assert_eq!(from_toml[0], from_csv[0]);
    }

    #[test]
    fn toml_second_profile_carries_housing_details() {
        let profiles = SalaryProfileLoader::load_toml_str(SLIP_TOML).expect("toml");

        let p = &profiles[1];
        assert_eq!(p.label, "profile 2");
        assert_eq!(
            p.compensation.housing,
            HousingDetails {
                actual_rent_paid: dec!(240000),
                metro_city: true,
            }
        );
    }

    #[test]
    fn toml_without_profiles_is_an_error() {
        let err = SalaryProfileLoader::load_toml_str("title = \"nothing here\"\n")
            .expect_err("should report no profiles");

        assert!(matches!(err, ProfileLoadError::NoProfiles), "got {err:?}");
    }

    #[test]
    fn toml_amount_past_ceiling_reads_as_zero() {
        let toml = "[[profile]]\nbasic_salary = 5e28\nspecial_allowance = 9223372036854775807\n";

        let profiles = SalaryProfileLoader::load_toml_str(toml).expect("toml");

        assert_eq!(profiles[0].compensation.basic_salary, dec!(0));
        assert_eq!(profiles[0].compensation.special_allowance, dec!(0));
    }

    #[test]
    fn toml_syntax_error_is_reported() {
        let err = SalaryProfileLoader::load_toml_str("[[profile]\nbasic_salary = 1")
            .expect_err("should reject bad toml");

        assert!(matches!(err, ProfileLoadError::Toml(_)), "got {err:?}");
    }

    // =========================================================================
    // load_from_file tests
    // =========================================================================

    #[test]
    fn load_from_file_rejects_unknown_extension() {
        let err = SalaryProfileLoader::load_from_file(Path::new("profiles.xlsx"))
            .expect_err("should reject xlsx");

        assert!(
            matches!(err, ProfileLoadError::UnsupportedFormat(ref p) if p == Path::new("profiles.xlsx")),
            "got {err:?}"
        );
    }

    #[test]
    fn load_from_file_reports_missing_file() {
        let err = SalaryProfileLoader::load_from_file(Path::new("does/not/exist.csv"))
            .expect_err("should fail to read");

        assert!(matches!(err, ProfileLoadError::Io { .. }), "got {err:?}");
    }
}
