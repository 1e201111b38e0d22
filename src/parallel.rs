//! Parallel mapping of many MODS files using Rayon.
//!
//! Documents are independent and the mapper holds no state, so each file is
//! read, parsed and mapped as its own task on Rayon's work-stealing pool.
//! Results come back in input order.
//!
//! # Examples
//!
//! ```no_run
//! use modsmap::parallel::map_paths_parallel;
//! use modsmap::ModsMapper;
//!
//! let mapper = ModsMapper::default();
//! let paths = vec!["a.xml", "b.xml"];
//! for (path, outcome) in paths.iter().zip(map_paths_parallel(&mapper, &paths)) {
//!     println!("{path}: {} record(s)", outcome?.records.len());
//! }
//! # Ok::<(), modsmap::ModsError>(())
//! ```

use std::path::Path;

use rayon::prelude::*;

use crate::collection::{CollectionOutcome, ModsMapper};
use crate::error::Result;
use crate::record::RecordDictionary;

/// Map a batch of XML strings in parallel, one `mods` record per string.
///
/// Each entry of the returned vector corresponds to the input at the same
/// index. One failing document does not affect the others.
pub fn map_batch_parallel<S: AsRef<str> + Sync>(
    mapper: &ModsMapper,
    documents: &[S],
) -> Vec<Result<RecordDictionary>> {
    documents
        .par_iter()
        .map(|xml| mapper.map_str(xml.as_ref()))
        .collect()
}

/// Read and map a batch of files in parallel.
///
/// Each entry of the returned vector corresponds to the path at the same
/// index and holds every record of that file.
pub fn map_paths_parallel<P: AsRef<Path> + Sync>(
    mapper: &ModsMapper,
    paths: &[P],
) -> Vec<Result<CollectionOutcome>> {
    paths
        .par_iter()
        .map(|path| mapper.map_path(path))
        .collect()
}
