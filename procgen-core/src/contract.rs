use std::path::Path;

use crate::error::ContractLoadError;

/// Reads the contract document verbatim. Its content is opaque to the pipeline.
pub fn load_contract(path: impl AsRef<Path>) -> Result<String, ContractLoadError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ContractLoadError {
        path: path.to_path_buf(),
        source,
    })
}
