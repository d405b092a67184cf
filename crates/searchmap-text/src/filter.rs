//! In-memory evaluation of primitive filters, ordering and projection over
//! decoded records.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use searchmap_core::{Direction, Filter, Record, Value, ID_ATTRIBUTE};

/// True when `record` passes every filter. A missing attribute fails.
pub fn accepts(record: &Record, filters: &BTreeMap<String, Filter>) -> bool {
	filters.iter().all(|(attr, filter)| record.get(attr).is_some_and(|value| passes(value, filter)))
}

pub fn passes(value: &Value, filter: &Filter) -> bool {
	match filter {
		Filter::Equal(v) => value.matches(v),
		Filter::NotEqual(v) => !value.matches(v),
		Filter::LessThan(v) => value.compare(v) == Some(Ordering::Less),
		Filter::LessOrEqual(v) => matches!(value.compare(v), Some(Ordering::Less | Ordering::Equal)),
		Filter::GreaterThan(v) => value.compare(v) == Some(Ordering::Greater),
		Filter::GreaterOrEqual(v) => matches!(value.compare(v), Some(Ordering::Greater | Ordering::Equal)),
		Filter::Between(lo, hi) => within(value, lo, hi),
		Filter::NotBetween(lo, hi) => !within(value, lo, hi),
		Filter::In(set) => set.iter().any(|v| value.matches(v)),
		Filter::NotIn(set) => !set.iter().any(|v| value.matches(v)),
	}
}

fn within(value: &Value, lo: &Value, hi: &Value) -> bool {
	matches!(value.compare(lo), Some(Ordering::Greater | Ordering::Equal))
		&& matches!(value.compare(hi), Some(Ordering::Less | Ordering::Equal))
}

/// Sorts scored hits by `order`, or by score (highest first) when no order
/// is given. Ties fall back to ascending id. Missing attributes sort lowest.
pub fn sort(hits: &mut [(f32, Record)], order: &[(String, Direction)]) {
	hits.sort_by(|(score_a, a), (score_b, b)| {
		let ordered = order.iter().fold(Ordering::Equal, |acc, (attr, direction)| {
			acc.then_with(|| match direction {
				Direction::Asc => compare_attr(a, b, attr),
				Direction::Desc => compare_attr(b, a, attr),
			})
		});
		let by_score = if order.is_empty() { score_b.total_cmp(score_a) } else { Ordering::Equal };
		ordered.then(by_score).then_with(|| compare_attr(a, b, ID_ATTRIBUTE))
	});
}

fn compare_attr(a: &Record, b: &Record, attr: &str) -> Ordering {
	match (a.get(attr), b.get(attr)) {
		(Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
		(Some(_), None) => Ordering::Greater,
		(None, Some(_)) => Ordering::Less,
		(None, None) => Ordering::Equal,
	}
}

/// Keeps the selected attributes (and the id). Empty or `*` keeps all.
pub fn project(record: Record, attrs: &[String]) -> Record {
	if attrs.is_empty() || attrs.iter().any(|a| a == "*") { return record; }
	record.into_iter().filter(|(k, _)| k == ID_ATTRIBUTE || attrs.contains(k)).collect()
}
