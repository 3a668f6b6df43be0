//! Association-rule mining across a basket of tickers
//!
//! Daily closes are aligned on their common dates, turned into binary
//! "price went up" transactions, and mined with apriori. A rule
//! `{A} => {B}` with high lift says the tickers tend to rise on the same
//! days.

use crate::error::{AnalyticsError, Result};
use market_data::DailyClose;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Mining thresholds
#[derive(Debug, Clone, Copy)]
pub struct AssociationConfig {
    /// Minimum fraction of days an itemset must appear in
    pub min_support: f64,
    /// Minimum lift a rule must reach to be reported
    pub min_lift: f64,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            min_support: 0.2,
            min_lift: 1.0,
        }
    }
}

impl AssociationConfig {
    fn validate(&self) -> Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(AnalyticsError::ValidationError(format!(
                "min_support must be in (0, 1], got {}",
                self.min_support
            )));
        }
        if !(self.min_lift >= 0.0) {
            return Err(AnalyticsError::ValidationError(format!(
                "min_lift must be non-negative, got {}",
                self.min_lift
            )));
        }
        Ok(())
    }
}

/// Daily close history for one ticker
#[derive(Debug, Clone)]
pub struct TickerHistory {
    pub symbol: String,
    pub closes: Vec<DailyClose>,
}

/// One mined rule with its standard metrics
#[derive(Debug, Clone, Serialize)]
pub struct AssociationRule {
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Mine association rules over the aligned up/down movements of `histories`
pub fn mine_rules(
    histories: &[TickerHistory],
    config: AssociationConfig,
) -> Result<Vec<AssociationRule>> {
    config.validate()?;

    if histories.len() < 2 {
        return Err(AnalyticsError::ValidationError(
            "association mining needs at least two tickers".to_string(),
        ));
    }

    let transactions = up_day_transactions(histories)?;
    let frequent = frequent_itemsets(&transactions, histories.len(), config.min_support);

    let n = transactions.len() as f64;
    let mut rules = Vec::new();

    // Sorted iteration keeps the output order stable across runs
    let mut itemsets: Vec<&Vec<usize>> = frequent.keys().filter(|s| s.len() >= 2).collect();
    itemsets.sort();

    for itemset in itemsets {
        let itemset_support = frequent[itemset] as f64 / n;

        // Every non-empty proper subset forms a candidate antecedent
        for mask in 1..(1u32 << itemset.len()) - 1 {
            let mut antecedent = Vec::new();
            let mut consequent = Vec::new();
            for (bit, &item) in itemset.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    antecedent.push(item);
                } else {
                    consequent.push(item);
                }
            }

            // Subsets of a frequent itemset are always frequent, so both
            // supports are present in the map
            let antecedent_support = frequent[&antecedent] as f64 / n;
            let consequent_support = frequent[&consequent] as f64 / n;

            let confidence = itemset_support / antecedent_support;
            let lift = confidence / consequent_support;

            if lift >= config.min_lift {
                rules.push(AssociationRule {
                    antecedents: antecedent
                        .iter()
                        .map(|&i| histories[i].symbol.clone())
                        .collect(),
                    consequents: consequent
                        .iter()
                        .map(|&i| histories[i].symbol.clone())
                        .collect(),
                    support: itemset_support,
                    confidence,
                    lift,
                });
            }
        }
    }

    Ok(rules)
}

/// Align histories on shared dates and binarize day-over-day moves.
///
/// Transaction `t` holds the indices of every ticker whose close rose from
/// shared date `t` to shared date `t + 1`.
fn up_day_transactions(histories: &[TickerHistory]) -> Result<Vec<Vec<usize>>> {
    let mut common_dates: Option<BTreeSet<chrono::NaiveDate>> = None;
    for history in histories {
        let dates: BTreeSet<_> = history.closes.iter().map(|c| c.date).collect();
        common_dates = Some(match common_dates {
            Some(common) => common.intersection(&dates).copied().collect(),
            None => dates,
        });
    }

    let common_dates = common_dates.unwrap_or_default();
    if common_dates.len() < 2 {
        return Err(AnalyticsError::DataError(
            "tickers share fewer than two trading days; cannot compute returns".to_string(),
        ));
    }

    let mut aligned: Vec<Vec<f64>> = Vec::with_capacity(histories.len());
    for history in histories {
        let by_date: HashMap<_, _> = history.closes.iter().map(|c| (c.date, c.close)).collect();
        aligned.push(common_dates.iter().map(|d| by_date[d]).collect());
    }

    let days = common_dates.len();
    let mut transactions = Vec::with_capacity(days - 1);
    for t in 1..days {
        let mut ups = Vec::new();
        for (idx, closes) in aligned.iter().enumerate() {
            // Percent change > 0 means the ticker rose that day
            if closes[t] > closes[t - 1] {
                ups.push(idx);
            }
        }
        transactions.push(ups);
    }

    Ok(transactions)
}

/// Levelwise apriori: keep itemsets appearing in at least `min_support` of
/// the transactions, growing candidates one item at a time
fn frequent_itemsets(
    transactions: &[Vec<usize>],
    item_count: usize,
    min_support: f64,
) -> HashMap<Vec<usize>, usize> {
    let n = transactions.len() as f64;
    let min_count = (min_support * n).ceil() as usize;
    let mut frequent: HashMap<Vec<usize>, usize> = HashMap::new();

    // Level 1
    let mut level: Vec<Vec<usize>> = Vec::new();
    for item in 0..item_count {
        let count = transactions.iter().filter(|tx| tx.contains(&item)).count();
        if count >= min_count.max(1) {
            frequent.insert(vec![item], count);
            level.push(vec![item]);
        }
    }

    // Grow levels until no candidate survives
    while !level.is_empty() {
        let mut next_level = Vec::new();

        for (a, first) in level.iter().enumerate() {
            for second in level.iter().skip(a + 1) {
                // Join itemsets sharing all but their last item
                if first[..first.len() - 1] != second[..second.len() - 1] {
                    continue;
                }

                let mut candidate = first.clone();
                candidate.push(second[second.len() - 1]);
                candidate.sort_unstable();

                if frequent.contains_key(&candidate) {
                    continue;
                }
                // Prune: every (k-1)-subset must already be frequent
                if !all_subsets_frequent(&candidate, &frequent) {
                    continue;
                }

                let count = transactions
                    .iter()
                    .filter(|tx| candidate.iter().all(|item| tx.contains(item)))
                    .count();
                if count >= min_count.max(1) {
                    frequent.insert(candidate.clone(), count);
                    next_level.push(candidate);
                }
            }
        }

        next_level.sort_unstable();
        level = next_level;
    }

    frequent
}

fn all_subsets_frequent(candidate: &[usize], frequent: &HashMap<Vec<usize>, usize>) -> bool {
    (0..candidate.len()).all(|skip| {
        let subset: Vec<usize> = candidate
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, &item)| item)
            .collect();
        frequent.contains_key(&subset)
    })
}
