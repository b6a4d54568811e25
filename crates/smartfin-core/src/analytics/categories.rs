//! Category grouping with per-group totals and contributing records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{parse_amount, LedgerRecord};

use super::format_amount;

/// Group label for records with no usable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One category's slice of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Sum of parsed amounts, formatted to two decimals.
    pub total: String,
    pub count: usize,
    /// The records that produced the total, in input order.
    pub transactions: Vec<LedgerRecord>,
}

/// Deterministically ordered map from category label to its group.
pub type CategoryBreakdown = BTreeMap<String, CategoryGroup>;

/// Group records by category label.
///
/// Blank and missing categories fall under [`UNCATEGORIZED`]. Every record
/// with a parseable amount lands in exactly one group regardless of kind or
/// sign; zero and negative amounts are not filtered. Records whose amount
/// fails to parse are skipped entirely and never inflate a count.
pub fn group_by_category(records: &[LedgerRecord]) -> CategoryBreakdown {
    let mut groups: BTreeMap<String, (f64, Vec<LedgerRecord>)> = BTreeMap::new();

    for record in records {
        let Some(amount) = parse_amount(&record.amount) else {
            continue;
        };
        let label = record
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        let entry = groups.entry(label).or_insert_with(|| (0.0, Vec::new()));
        entry.0 += amount;
        entry.1.push(record.clone());
    }

    groups
        .into_iter()
        .map(|(label, (total, transactions))| {
            (
                label,
                CategoryGroup {
                    total: format_amount(total),
                    count: transactions.len(),
                    transactions,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RawAmount;

    fn record(category: Option<&str>, amount: RawAmount) -> LedgerRecord {
        LedgerRecord {
            amount,
            category: category.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_gives_empty_breakdown() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_groups_accumulate_totals_and_counts() {
        let records = vec![
            record(Some("Rent"), RawAmount::Number(800.0)),
            record(Some("Rent"), "200.50".into()),
            record(Some("Supplies"), RawAmount::Number(35.0)),
        ];
        let groups = group_by_category(&records);
        assert_eq!(groups.len(), 2);

        let rent = &groups["Rent"];
        assert_eq!(rent.total, "1000.50");
        assert_eq!(rent.count, 2);
        assert_eq!(rent.transactions.len(), 2);

        let supplies = &groups["Supplies"];
        assert_eq!(supplies.total, "35.00");
        assert_eq!(supplies.count, 1);
    }

    #[test]
    fn test_missing_and_blank_categories_default() {
        let records = vec![
            record(None, RawAmount::Number(10.0)),
            record(Some("  "), RawAmount::Number(5.0)),
        ];
        let groups = group_by_category(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[UNCATEGORIZED].total, "15.00");
        assert_eq!(groups[UNCATEGORIZED].count, 2);
    }

    #[test]
    fn test_negative_and_zero_amounts_are_kept() {
        let records = vec![
            record(Some("Refunds"), RawAmount::Number(-25.0)),
            record(Some("Refunds"), RawAmount::Number(0.0)),
        ];
        let groups = group_by_category(&records);
        assert_eq!(groups["Refunds"].total, "-25.00");
        assert_eq!(groups["Refunds"].count, 2);
    }

    #[test]
    fn test_unparseable_amounts_never_counted() {
        let records = vec![
            record(Some("Rent"), "800".into()),
            record(Some("Rent"), "???".into()),
        ];
        let groups = group_by_category(&records);
        assert_eq!(groups["Rent"].total, "800.00");
        assert_eq!(groups["Rent"].count, 1);
        assert_eq!(groups["Rent"].transactions.len(), 1);
    }

    #[test]
    fn test_group_totals_cover_every_parsed_amount() {
        let records = vec![
            record(Some("A"), RawAmount::Number(1.25)),
            record(Some("B"), RawAmount::Number(2.75)),
            record(None, RawAmount::Number(6.0)),
        ];
        let groups = group_by_category(&records);
        let total: f64 = groups
            .values()
            .map(|g| g.total.parse::<f64>().unwrap())
            .sum();
        assert_eq!(total, 10.0);
    }
}
