//! Condition and order translation into backend primitives.

use searchmap_core::{Direction, Error, Filter, Result, SearchQuery, Value};

use crate::args::SearchArgs;
use crate::condition::{Key, Operand, Operator, OrderTerm};

/// Translates conditions, order and pass-through options.
///
/// Facets and paging are left alone; see [`crate::facets::expand`] and
/// [`crate::pagination::resolve`].
pub fn translate(args: &SearchArgs) -> Result<SearchQuery> {
    let mut query = SearchQuery {
        fulltext: args.fulltext.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string),
        attrs: args.attrs.clone(),
        limit: args.limit,
        offset: args.offset,
        ..SearchQuery::default()
    };
    for (key, operand) in &args.conditions {
        let (attr, filter) = translate_condition(key, operand)?;
        query.filters.insert(attr, filter);
    }
    query.order = translate_order(&args.order)?;
    Ok(query)
}

pub fn translate_condition(key: &Key, operand: &Operand) -> Result<(String, Filter)> {
    let filter = match key {
        Key::Attr(_) => match operand {
            Operand::Value(v) => Filter::Equal(v.clone()),
            Operand::Range(lo, hi) => Filter::Between(lo.clone(), hi.clone()),
            Operand::List(vs) => Filter::In(vs.clone()),
        },
        Key::Op { operator: Operator::Not, .. } => match operand {
            Operand::Value(v) => Filter::NotEqual(v.clone()),
            Operand::Range(lo, hi) => Filter::NotBetween(lo.clone(), hi.clone()),
            Operand::List(vs) => Filter::NotIn(vs.clone()),
        },
        Key::Op { target, operator } => {
            let build: fn(Value) -> Filter = match operator {
                Operator::Lt => Filter::LessThan,
                Operator::Lte => Filter::LessOrEqual,
                Operator::Gt => Filter::GreaterThan,
                Operator::Gte => Filter::GreaterOrEqual,
                other => return Err(Error::unsupported_filter(other.as_str())),
            };
            let Operand::Value(v) = operand else {
                return Err(Error::ArgumentType(format!(
                    "'{operator}' on '{target}' expects a single value"
                )));
            };
            build(v.clone())
        }
    };
    Ok((key.target().to_string(), filter))
}

/// Normalizes order terms, keeping their sequence.
///
/// A repeated attribute keeps its first position and takes the last
/// direction given for it.
pub fn translate_order(terms: &[OrderTerm]) -> Result<Vec<(String, Direction)>> {
    let mut out: Vec<(String, Direction)> = Vec::with_capacity(terms.len());
    for term in terms {
        let (attr, direction) = match &term.key {
            Key::Attr(attr) => (attr, term.direction.unwrap_or_default()),
            Key::Op { target, operator: Operator::Asc } => (target, Direction::Asc),
            Key::Op { target, operator: Operator::Desc } => (target, Direction::Desc),
            Key::Op { operator, .. } => return Err(Error::unsupported_order(operator.as_str())),
        };
        match out.iter_mut().find(|(existing, _)| existing == attr) {
            Some(entry) => entry.1 = direction,
            None => out.push((attr.clone(), direction)),
        }
    }
    Ok(out)
}
