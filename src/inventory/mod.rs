//! Client-side inventory view: filter, sort and classify fetched stock.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::api::{BloodInventoryItem, BloodType, ComponentKind};
use crate::config::InventoryConfig;

/// Stock level of one inventory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
}

impl StockStatus {
    pub fn classify(units: u32, thresholds: &InventoryConfig) -> Self {
        if units < thresholds.critical_units {
            StockStatus::Critical
        } else if units < thresholds.low_units {
            StockStatus::Low
        } else {
            StockStatus::Adequate
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "CRITICAL",
            StockStatus::Low => "LOW",
            StockStatus::Adequate => "OK",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Fewest units first.
    #[default]
    UnitsAsc,
    UnitsDesc,
    /// Soonest expiry first; lines without a date go last.
    Expiry,
    Group,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFilter {
    pub group: Option<BloodType>,
    pub component: Option<ComponentKind>,
}

impl InventoryFilter {
    pub fn matches(&self, item: &BloodInventoryItem) -> bool {
        let group_ok = self.group.map_or(true, |wanted| {
            BloodType::from_str(&item.blood_group_name).map_or(false, |g| g == wanted)
        });
        let component_ok = self.component.map_or(true, |wanted| {
            ComponentKind::from_str(&item.component_type_name).map_or(false, |c| c == wanted)
        });
        group_ok && component_ok
    }
}

/// One classified inventory line.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLine {
    pub item: BloodInventoryItem,
    pub status: StockStatus,
    /// Units relative to a full vial, clamped to `0.0..=1.0`.
    pub fill_level: f64,
}

pub fn fill_level(units: u32, thresholds: &InventoryConfig) -> f64 {
    if thresholds.full_units == 0 {
        return 0.0;
    }
    (f64::from(units) / f64::from(thresholds.full_units)).clamp(0.0, 1.0)
}

/// Filter, classify and sort `items`.
pub fn build_view(
    items: &[BloodInventoryItem],
    filter: &InventoryFilter,
    sort: SortKey,
    thresholds: &InventoryConfig,
) -> Vec<StockLine> {
    let mut lines: Vec<StockLine> = items
        .iter()
        .filter(|item| filter.matches(item))
        .map(|item| StockLine {
            item: item.clone(),
            status: StockStatus::classify(item.quantity, thresholds),
            fill_level: fill_level(item.quantity, thresholds),
        })
        .collect();

    lines.sort_by(|a, b| compare(&a.item, &b.item, sort));
    lines
}

fn compare(a: &BloodInventoryItem, b: &BloodInventoryItem, sort: SortKey) -> Ordering {
    match sort {
        SortKey::UnitsAsc => a.quantity.cmp(&b.quantity),
        SortKey::UnitsDesc => b.quantity.cmp(&a.quantity),
        SortKey::Expiry => match (a.expiry_date, b.expiry_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Group => group_rank(a)
            .cmp(&group_rank(b))
            .then_with(|| a.component_type_name.cmp(&b.component_type_name)),
    }
}

// Unrecognized group names sort after the eight known ones.
fn group_rank(item: &BloodInventoryItem) -> usize {
    BloodType::from_str(&item.blood_group_name)
        .ok()
        .and_then(|g| BloodType::ALL.iter().position(|t| *t == g))
        .unwrap_or(usize::MAX)
}

/// Counts per status, for the summary line.
pub fn summarize(lines: &[StockLine]) -> [(StockStatus, usize); 3] {
    let count = |s: StockStatus| lines.iter().filter(|l| l.status == s).count();
    [
        (StockStatus::Critical, count(StockStatus::Critical)),
        (StockStatus::Low, count(StockStatus::Low)),
        (StockStatus::Adequate, count(StockStatus::Adequate)),
    ]
}
