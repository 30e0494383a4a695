use std::collections::HashMap;

use api_types::expense::{CategoryRef, ExpenseRecord};

use crate::MoneyCents;

/// Bucket for records without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Grouping key of a record's category.
///
/// - expanded category: its name
/// - unexpanded reference: the raw id, as the service sent it
/// - missing (or blank): [`UNCATEGORIZED`]
#[must_use]
pub fn category_key(category: Option<&CategoryRef>) -> &str {
    let key = match category {
        Some(CategoryRef::Expanded(category)) => category.name.as_str(),
        Some(CategoryRef::Reference(id)) => id.as_str(),
        None => "",
    };
    if key.trim().is_empty() {
        UNCATEGORIZED
    } else {
        key
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub count: u64,
    pub amount: MoneyCents,
}

/// Per-category totals in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    entries: Vec<CategoryTotal>,
    index: HashMap<String, usize>,
}

impl CategoryBreakdown {
    fn add(&mut self, name: &str, amount: MoneyCents) {
        let position = match self.index.get(name).copied() {
            Some(position) => position,
            None => {
                self.entries.push(CategoryTotal {
                    name: name.to_string(),
                    count: 0,
                    amount: MoneyCents::ZERO,
                });
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[position];
        entry.count += 1;
        entry.amount += amount;
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CategoryTotal> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Aggregate over the loaded record set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_count: usize,
    pub total_amount: MoneyCents,
    pub breakdown: CategoryBreakdown,
}

impl Summary {
    /// Single pass over `records`. Total for any input, including empty.
    #[must_use]
    pub fn compute(records: &[ExpenseRecord]) -> Self {
        let mut summary = Summary {
            total_count: records.len(),
            ..Summary::default()
        };

        for record in records {
            let amount = MoneyCents::from_major(record.amount);
            summary.total_amount += amount;
            summary
                .breakdown
                .add(category_key(record.category.as_ref()), amount);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::expense::Category;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, amount: f64, category: Option<CategoryRef>) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            title: format!("expense {id}"),
            amount,
            date: Utc.with_ymd_and_hms(2026, 4, 3, 12, 0, 0).unwrap(),
            category,
            description: None,
        }
    }

    fn named(name: &str) -> Option<CategoryRef> {
        Some(CategoryRef::Expanded(Category {
            id: format!("id-{name}"),
            name: name.to_string(),
        }))
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        let summary = Summary::compute(&[]);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.total_amount, MoneyCents::ZERO);
        assert!(summary.breakdown.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn totals_and_groups_in_first_appearance_order() {
        let records = vec![
            record("1", 10.0, named("Travel")),
            record("2", 2.5, named("Food")),
            record("3", 7.25, named("Travel")),
            record("4", 1.0, None),
        ];
        let summary = Summary::compute(&records);

        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.total_amount, MoneyCents::new(20_75));

        let names: Vec<&str> = summary.breakdown.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Travel", "Food", UNCATEGORIZED]);

        let travel = summary.breakdown.get("Travel").unwrap();
        assert_eq!(travel.count, 2);
        assert_eq!(travel.amount, MoneyCents::new(17_25));
    }

    #[test]
    fn missing_and_literal_uncategorized_share_bucket() {
        let records = vec![
            record("1", 1.0, None),
            record("2", 2.0, named("Uncategorized")),
            record("3", 3.0, named("")),
            record(
                "4",
                4.0,
                Some(CategoryRef::Reference("Uncategorized".to_string())),
            ),
        ];
        let summary = Summary::compute(&records);
        assert_eq!(summary.breakdown.len(), 1);
        let bucket = summary.breakdown.get(UNCATEGORIZED).unwrap();
        assert_eq!(bucket.count, 4);
        assert_eq!(bucket.amount, MoneyCents::new(10_00));
    }

    #[test]
    fn unexpanded_category_keeps_raw_id() {
        let records = vec![
            record("1", 4.0, Some(CategoryRef::Reference("65ff00aa".to_string()))),
            record("2", 1.0, None),
        ];
        let summary = Summary::compute(&records);
        assert_eq!(summary.breakdown.get("65ff00aa").map(|c| c.count), Some(1));
        assert_eq!(summary.breakdown.get(UNCATEGORIZED).map(|c| c.count), Some(1));
    }

    #[test]
    fn total_is_independent_of_order() {
        let mut records: Vec<ExpenseRecord> = (0..50)
            .map(|i| record(&i.to_string(), 0.1 + f64::from(i) * 0.01, named("x")))
            .collect();
        let forward = Summary::compute(&records).total_amount;
        records.reverse();
        assert_eq!(Summary::compute(&records).total_amount, forward);
    }
}
