/// Data acquisition from laghi.net.
///
/// - `laghi`   — session-scoped HTTP exchange (FetchClient)
/// - `extract` — payload -> `LakeRecord` normalization (RecordExtractor)
pub mod extract;
pub mod laghi;

#[cfg(test)]
pub(crate) mod fixtures;
