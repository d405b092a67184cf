//! Builds [`SearchArgs`] from loosely-typed JSON arguments.
//!
//! Accepted shapes:
//! - `"badgers"`: fulltext only
//! - `{"views.gt": 7, "order": "id"}`: options only
//! - `["badgers", {"limit": 2}]`: positional fulltext then options
//!
//! Recognized option keys are `limit`, `offset`, `attrs`, `order`, `facets`
//! and `pager`. Any other key is a condition; `attr.op` qualifies the
//! attribute with an operator (`views.gte`, `user_id.not`). A scalar is
//! compared directly, an array is a set, `{"from": a, "to": b}` is an
//! inclusive range.
//!
//! JSON objects do not keep key order, so multi-attribute ordering should be
//! given as an array: `"order": ["views.desc", "id"]`.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use searchmap_core::{Direction, Error, Result, Value};

use crate::args::SearchArgs;
use crate::condition::{Key, Operand, Operator, OrderTerm};
use crate::pagination::PagerParams;

/// Separates fulltext from options and parses both.
pub fn extract_query_data(args: &Json) -> Result<SearchArgs> {
    match args {
        Json::Null => Ok(SearchArgs::new()),
        Json::String(text) => Ok(SearchArgs::fulltext(text.as_str())),
        Json::Object(options) => apply_options(SearchArgs::new(), options),
        Json::Array(positional) => {
            let mut rest = positional.iter().peekable();
            let mut out = SearchArgs::new();
            if let Some(Json::String(text)) = rest.peek() {
                out.fulltext = Some(text.clone());
                rest.next();
            }
            match rest.next() {
                Some(Json::Object(options)) => out = apply_options(out, options)?,
                Some(other) => return Err(argument(format!("expected an options object, got {other}"))),
                None => {}
            }
            if rest.next().is_some() {
                return Err(argument("too many positional arguments"));
            }
            Ok(out)
        }
        other => Err(argument(format!("cannot search with {other}"))),
    }
}

/// Parses a `name => arguments` object for a multi-search.
pub fn extract_multi(searches: &Json) -> Result<BTreeMap<String, SearchArgs>> {
    let Json::Object(searches) = searches else {
        return Err(argument("multi-search expects a map of name => arguments"));
    };
    searches
        .iter()
        .map(|(name, args)| Ok((name.clone(), extract_query_data(args)?)))
        .collect()
}

fn apply_options(mut args: SearchArgs, options: &Map<String, Json>) -> Result<SearchArgs> {
    for (key, value) in options {
        match key.as_str() {
            "limit" => args.limit = Some(as_usize(key, value)?),
            "offset" => args.offset = Some(as_usize(key, value)?),
            "attrs" => args.attrs = as_strings(key, value)?,
            "order" => args.order = order_terms(value)?,
            "facets" => {
                let Json::Object(facets) = value else {
                    return Err(argument("facets expects a map of name => arguments"));
                };
                for (name, facet) in facets {
                    args.facets.insert(name.clone(), extract_query_data(facet)?);
                }
            }
            "pager" => args.pager = Some(pager_params(value)?),
            _ => args.conditions.push((parse_key(key), operand(key, value)?)),
        }
    }
    Ok(args)
}

/// `views.gt` becomes a qualified key; names whose suffix is not an
/// operator (`author.name`) stay plain attributes.
pub fn parse_key(raw: &str) -> Key {
    if let Some((target, op)) = raw.rsplit_once('.') {
        if let Ok(operator) = op.parse::<Operator>() {
            return Key::Op { target: target.to_string(), operator };
        }
    }
    Key::Attr(raw.to_string())
}

fn operand(key: &str, value: &Json) -> Result<Operand> {
    match value {
        Json::Array(items) => items
            .iter()
            .map(|item| scalar(key, item))
            .collect::<Result<Vec<_>>>()
            .map(Operand::List),
        Json::Object(bounds) => match (bounds.get("from"), bounds.get("to")) {
            (Some(lo), Some(hi)) if bounds.len() == 2 => {
                Ok(Operand::Range(scalar(key, lo)?, scalar(key, hi)?))
            }
            _ => Err(argument(format!("'{key}' range expects exactly \"from\" and \"to\""))),
        },
        other => scalar(key, other).map(Operand::Value),
    }
}

fn scalar(key: &str, value: &Json) -> Result<Value> {
    Value::from_json(value).ok_or_else(|| argument(format!("'{key}' cannot compare against {value}")))
}

fn order_terms(value: &Json) -> Result<Vec<OrderTerm>> {
    match value {
        Json::String(raw) => Ok(vec![parse_key(raw).into()]),
        Json::Array(items) => {
            let mut terms = Vec::new();
            for item in items {
                terms.extend(order_terms(item)?);
            }
            Ok(terms)
        }
        Json::Object(pairs) => pairs
            .iter()
            .map(|(raw, direction)| {
                let direction = match direction {
                    Json::Null => None,
                    Json::String(d) => Some(d.parse::<Direction>().map_err(Error::unsupported_order)?),
                    other => return Err(Error::unsupported_order(other.to_string())),
                };
                Ok(OrderTerm { key: parse_key(raw), direction })
            })
            .collect(),
        other => Err(argument(format!("cannot order by {other}"))),
    }
}

fn pager_params(value: &Json) -> Result<PagerParams> {
    let Json::Object(fields) = value else {
        return Err(argument("pager expects an object"));
    };
    let page = match fields.get("page") {
        None | Some(Json::Null) => None,
        // fractional pages truncate toward zero
        Some(Json::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        // page numbers often arrive as query-string text
        Some(Json::String(s)) => Some(s.trim().parse().map_err(|_| argument(format!("invalid page '{s}'")))?),
        Some(other) => return Err(argument(format!("invalid page {other}"))),
    };
    let per_page = fields.get("per_page").map(|v| as_usize("per_page", v)).transpose()?;
    let page_param = match fields.get("page_param") {
        None => None,
        Some(Json::String(s)) => Some(s.clone()),
        Some(other) => return Err(argument(format!("invalid page_param {other}"))),
    };
    Ok(PagerParams { page, per_page, page_param })
}

fn as_usize(key: &str, value: &Json) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| argument(format!("'{key}' expects a non-negative integer, got {value}")))
}

fn as_strings(key: &str, value: &Json) -> Result<Vec<String>> {
    match value {
        Json::String(s) => Ok(vec![s.clone()]),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| argument(format!("'{key}' expects strings, got {item}")))
            })
            .collect(),
        other => Err(argument(format!("'{key}' expects strings, got {other}"))),
    }
}

fn argument(message: impl Into<String>) -> Error { Error::ArgumentType(message.into()) }
