use std::collections::BTreeMap;
use std::io::Read;

use notary_core::{
    AmountRule, Bracket, BracketTable, BracketTableError, ForgivenessSchedule,
    ForgivenessScheduleError, ForgivenessTier, OperationType, RateSchedule,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading rate-table or forgiveness data.
#[derive(Debug, Error)]
pub enum RateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown rate table '{table}' on row {row}")]
    UnknownTable { table: String, row: usize },

    #[error("unknown operation type '{operation_type}' on row {row}")]
    UnknownOperationType { operation_type: String, row: usize },

    #[error("invalid {table} table: {source}")]
    InvalidTable {
        table: &'static str,
        #[source]
        source: BracketTableError,
    },

    #[error("invalid forgiveness schedule: {0}")]
    InvalidSchedule(#[from] ForgivenessScheduleError),
}

impl From<csv::Error> for RateLoaderError {
    fn from(err: csv::Error) -> Self {
        RateLoaderError::CsvParse(err.to_string())
    }
}

/// The three bracket tables a rate file can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TableKind {
    AcquisitionTax,
    RegistryFee,
    NotaryFee,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcquisitionTax => "acquisition_tax",
            Self::RegistryFee => "registry_fee",
            Self::NotaryFee => "notary_fee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "acquisition_tax" => Some(Self::AcquisitionTax),
            "registry_fee" => Some(Self::RegistryFee),
            "notary_fee" => Some(Self::NotaryFee),
            _ => None,
        }
    }

    /// Registry fees are flat per bracket; the others are marginal.
    pub fn rule(&self) -> AmountRule {
        match self {
            Self::RegistryFee => AmountRule::Flat,
            Self::AcquisitionTax | Self::NotaryFee => AmountRule::Marginal,
        }
    }
}

/// A single record from a rate-table CSV file.
///
/// - `table`: one of `acquisition_tax`, `registry_fee`, `notary_fee`
/// - `lower_bound`: first value covered by the bracket
/// - `upper_bound`: last value covered (empty for the open-ended bracket)
/// - `base_amount`: fixed amount ("cuota fija")
/// - `marginal_rate`: rate applied over the lower bound (ignored for
///   registry fees)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateTableRecord {
    pub table: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub base_amount: Decimal,
    pub marginal_rate: Decimal,
}

/// A single record from a forgiveness CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ForgivenessRecord {
    pub operation_type: String,
    pub ceiling: Decimal,
    pub fraction: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn read_records<R, T>(reader: R) -> Result<Vec<T>, RateLoaderError>
where
    R: Read,
    T: serde::de::DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }
    Ok(records)
}

/// Loader for bracket tables stored as CSV.
///
/// A file may carry any subset of the three tables; tables it omits keep the
/// values of the schedule they are applied to.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse rate-table records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateTableRecord>, RateLoaderError> {
        read_records(reader)
    }

    /// Groups records by table and validates each table.
    ///
    /// Records are kept in file order within a table.
    pub fn build_tables(
        edition: &str,
        records: &[RateTableRecord],
    ) -> Result<BTreeMap<TableKind, BracketTable>, RateLoaderError> {
        let mut grouped: BTreeMap<TableKind, Vec<Bracket>> = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            let kind = TableKind::parse(&record.table).ok_or_else(|| {
                RateLoaderError::UnknownTable {
                    table: record.table.clone(),
                    row: idx + 1,
                }
            })?;
            grouped.entry(kind).or_default().push(Bracket::new(
                record.lower_bound,
                record.upper_bound,
                record.base_amount,
                record.marginal_rate,
            ));
        }

        grouped
            .into_iter()
            .map(|(kind, brackets)| {
                debug!(table = kind.as_str(), brackets = brackets.len(), edition, "loaded rate table");
                BracketTable::new(edition, kind.rule(), brackets)
                    .map(|table| (kind, table))
                    .map_err(|source| RateLoaderError::InvalidTable {
                        table: kind.as_str(),
                        source,
                    })
            })
            .collect()
    }

    /// Replaces the tables present in `records` on top of `base`.
    pub fn apply(
        edition: &str,
        records: &[RateTableRecord],
        mut base: RateSchedule,
    ) -> Result<RateSchedule, RateLoaderError> {
        for (kind, table) in Self::build_tables(edition, records)? {
            match kind {
                TableKind::AcquisitionTax => base.acquisition_tax = table,
                TableKind::RegistryFee => base.registry_fee = table,
                TableKind::NotaryFee => base.notary_fee = table,
            }
        }
        base.edition = edition.to_string();
        Ok(base)
    }
}

/// Loader for forgiveness tiers stored as CSV (`operation_type,ceiling,fraction`).
pub struct ForgivenessLoader;

impl ForgivenessLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ForgivenessRecord>, RateLoaderError> {
        read_records(reader)
    }

    /// Builds a schedule. Unlike a calculation request, a data file with an
    /// unknown operation type is an error.
    pub fn build(records: &[ForgivenessRecord]) -> Result<ForgivenessSchedule, RateLoaderError> {
        let mut acquisition = Vec::new();
        let mut inheritance = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let tier = ForgivenessTier::new(record.ceiling, record.fraction);
            match OperationType::parse(&record.operation_type) {
                Some(OperationType::Acquisition) => acquisition.push(tier),
                Some(OperationType::Inheritance) => inheritance.push(tier),
                None => {
                    return Err(RateLoaderError::UnknownOperationType {
                        operation_type: record.operation_type.clone(),
                        row: idx + 1,
                    });
                }
            }
        }

        debug!(
            acquisition = acquisition.len(),
            inheritance = inheritance.len(),
            "loaded forgiveness tiers"
        );
        Ok(ForgivenessSchedule::new(acquisition, inheritance)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"table,lower_bound,upper_bound,base_amount,marginal_rate
acquisition_tax,0.12,1000.00,10.00,0.01
acquisition_tax,1000.01,,25.00,0.02
registry_fee,0.01,,500.00,0
"#;

    const FORGIVENESS_CSV: &str = "\
operation_type,ceiling,fraction
acquisition,1000,0.50
herencia,5000,0.80
";

    #[test]
    fn parse_reads_records_in_order() {
        let records = RateTableLoader::parse(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].table, "acquisition_tax");
        assert_eq!(records[0].upper_bound, Some(dec!(1000.00)));
        assert_eq!(records[1].upper_bound, None);
    }

    #[test]
    fn parse_rejects_bad_decimal() {
        let csv = "table,lower_bound,upper_bound,base_amount,marginal_rate\nnotary_fee,abc,,0,0\n";

        let result = RateTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(RateLoaderError::CsvParse(_))));
    }

    #[test]
    fn build_tables_groups_by_table_and_sets_rule() {
        let records = RateTableLoader::parse(TEST_CSV.as_bytes()).unwrap();

        let tables = RateTableLoader::build_tables("test", &records).unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[&TableKind::AcquisitionTax].len(), 2);
        assert_eq!(tables[&TableKind::RegistryFee].rule(), AmountRule::Flat);
        assert_eq!(tables[&TableKind::RegistryFee].edition(), "test");
    }

    #[test]
    fn build_tables_rejects_unknown_table_name() {
        let csv = "table,lower_bound,upper_bound,base_amount,marginal_rate\nstamp_duty,0,,1,0\n";
        let records = RateTableLoader::parse(csv.as_bytes()).unwrap();

        let result = RateTableLoader::build_tables("test", &records);

        assert!(matches!(
            result,
            Err(RateLoaderError::UnknownTable { ref table, row: 1 }) if table == "stamp_duty"
        ));
    }

    #[test]
    fn build_tables_rejects_overlapping_brackets() {
        let csv = "\
table,lower_bound,upper_bound,base_amount,marginal_rate
notary_fee,0,100,1,0
notary_fee,50,,2,0
";
        let records = RateTableLoader::parse(csv.as_bytes()).unwrap();

        let result = RateTableLoader::build_tables("test", &records);

        assert!(matches!(
            result,
            Err(RateLoaderError::InvalidTable {
                table: "notary_fee",
                source: BracketTableError::Overlapping { index: 1, .. },
            })
        ));
    }

    #[test]
    fn apply_replaces_only_present_tables() {
        let records = RateTableLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let base = RateSchedule::canonical().clone();

        let schedule = RateTableLoader::apply("test", &records, base.clone()).unwrap();

        assert_eq!(schedule.edition, "test");
        assert_eq!(schedule.acquisition_tax.len(), 2);
        assert_eq!(schedule.registry_fee.amount(dec!(2000000)), dec!(500.00));
        assert_eq!(schedule.notary_fee, base.notary_fee);
    }

    #[test]
    fn forgiveness_build_accepts_spanish_codes() {
        let records = ForgivenessLoader::parse(FORGIVENESS_CSV.as_bytes()).unwrap();

        let schedule = ForgivenessLoader::build(&records).unwrap();

        assert_eq!(schedule.fraction(dec!(900), OperationType::Acquisition), dec!(0.50));
        assert_eq!(schedule.fraction(dec!(4000), OperationType::Inheritance), dec!(0.80));
    }

    #[test]
    fn forgiveness_build_rejects_unknown_operation_type() {
        let csv = "operation_type,ceiling,fraction\ndonacion,1000,0.5\n";
        let records = ForgivenessLoader::parse(csv.as_bytes()).unwrap();

        let result = ForgivenessLoader::build(&records);

        assert!(matches!(
            result,
            Err(RateLoaderError::UnknownOperationType { row: 1, .. })
        ));
    }

    #[test]
    fn forgiveness_build_rejects_fraction_above_one() {
        let csv = "operation_type,ceiling,fraction\nacquisition,1000,1.5\n";
        let records = ForgivenessLoader::parse(csv.as_bytes()).unwrap();

        let result = ForgivenessLoader::build(&records);

        assert!(matches!(result, Err(RateLoaderError::InvalidSchedule(_))));
    }
}
