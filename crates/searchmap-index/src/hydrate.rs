//! Turns raw transport results into model collections.

use std::collections::BTreeMap;

use searchmap_core::{Model, RawResult, Record, Result, ID_ATTRIBUTE};
use searchmap_query::{PageEcho, Pager};

use crate::collection::Collection;
use crate::mapping::MappingTable;

/// Builds one object from `record`.
///
/// Every attribute present in both the record and the table is set through
/// its mapping; the object is then marked clean and each populated property
/// marked loaded. Attributes without a mapping are ignored.
pub fn load_resource<M: Model>(table: &MappingTable<M>, record: &Record) -> Result<(M, Vec<String>)> {
    let mut resource = M::new_instance();
    let mut loaded = Vec::new();
    for (attribute, value) in record {
        let Some(mapping) = table.mapping(attribute) else {
            continue;
        };
        mapping.set(&mut resource, value.clone())?;
        loaded.push(mapping.property().to_string());
    }
    resource.mark_clean();
    for property in &loaded {
        resource.mark_loaded(property);
    }
    Ok((resource, loaded))
}

/// Hydrates `raw` and its facets. Only a top-level result gets a pager.
pub fn collection<M: Model>(
    table: &MappingTable<M>,
    raw: RawResult,
    echo: Option<&PageEcho>,
) -> Result<Collection<M>> {
    let RawResult { records, total_found, time, keywords, facets } = raw;

    let mut resources = Vec::with_capacity(records.len());
    let mut ids = Vec::with_capacity(records.len());
    let mut fields: Option<Vec<String>> = None;
    for record in &records {
        let (resource, loaded) = load_resource(table, record)?;
        if let Some(id) = record.get(ID_ATTRIBUTE) {
            ids.push(id.clone());
        }
        let loaded: Vec<String> =
            loaded.into_iter().filter(|p| M::properties().contains(&p.as_str())).collect();
        fields = Some(match fields {
            None => loaded,
            Some(common) => common.into_iter().filter(|p| loaded.contains(p)).collect(),
        });
        resources.push(resource);
    }

    let facets = facets
        .into_iter()
        .map(|(name, facet)| Ok((name, collection(table, facet, None)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    tracing::trace!(count = resources.len(), total_found, facets = facets.len(), "hydrated");

    Ok(Collection {
        resources,
        total_found,
        facets,
        pager: echo.map(|echo| Pager::new(echo, total_found)),
        time,
        keywords,
        fields: fields.unwrap_or_default(),
        ids,
    })
}
