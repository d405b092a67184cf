//! Recursive facet expansion.
//!
//! Each facet is translated like a top-level search and may carry facets of
//! its own, producing a tree of sub-queries. Arguments are owned trees, so
//! expansion always terminates; depth is bounded only by what the caller
//! built. Pager parameters on facets are ignored: only the top-level search
//! paginates.

use std::collections::BTreeMap;

use searchmap_core::{Result, SearchQuery};

use crate::args::SearchArgs;
use crate::translate::translate;

pub fn expand(facets: &BTreeMap<String, SearchArgs>) -> Result<BTreeMap<String, SearchQuery>> {
    facets
        .iter()
        .map(|(name, args)| {
            let mut query = translate(args)?;
            query.facets = expand(&args.facets)?;
            Ok((name.clone(), query))
        })
        .collect()
}

/// Translates `args` together with its facet tree.
pub fn compile(args: &SearchArgs) -> Result<SearchQuery> {
    let mut query = translate(args)?;
    query.facets = expand(&args.facets)?;
    Ok(query)
}

/// Depth of the facet tree below `query` (0 when it has no facets).
pub fn depth(query: &SearchQuery) -> usize {
    query.facets.values().map(|facet| 1 + depth(facet)).max().unwrap_or(0)
}
