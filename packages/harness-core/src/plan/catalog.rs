//! Fixed suite catalogs, in plan order.

use crate::config::Capabilities;

/// Synchronous suites.
pub const SYNC_SUITES: &[&str] = &[
    // key operations
    "key_basics",
    "key_apply",
    "key_apply2",
    "key_operate",
    // collection data types
    "list_basics",
    "map_basics",
    "map_udf",
    "map_index",
    // info
    "info_basics",
    // user-defined functions
    "udf_basics",
    "udf_types",
    "udf_record",
    // secondary indexes
    "index_basics",
    // queries
    "query_foreach",
    "query_background",
    "query_geospatial",
    // scans
    "scan_basics",
    // batch
    "batch_get",
    // policies
    "policy_read",
    "policy_scan",
    // large collections
    "ldt_lmap",
];

/// Asynchronous variants, planned after every synchronous suite.
pub const ASYNC_SUITES: &[&str] = &[
    "key_basics_async",
    "list_basics_async",
    "map_basics_async",
    "key_apply_async",
    "key_pipeline",
    "batch_async",
    "scan_async",
    "query_async",
];

/// Suite names planned for a client with the given capabilities.
pub fn suites(capabilities: Capabilities) -> impl Iterator<Item = &'static str> {
    let async_suites: &'static [&'static str] = if capabilities.async_networking {
        ASYNC_SUITES
    } else {
        &[]
    };
    SYNC_SUITES.iter().chain(async_suites.iter()).copied()
}

/// Returns true if `name` appears in either catalog.
pub fn is_known(name: &str) -> bool {
    SYNC_SUITES.contains(&name) || ASYNC_SUITES.contains(&name)
}
