//! Resolution of record paths against the project folder.
//!
//! Build tools print paths relative to whatever directory they ran in. A uri
//! is kept when it is absolute or already reachable from the working
//! directory; otherwise it is joined onto the project folder, but only when
//! the joined path exists.

use std::path::Path;

use extractor::ErrorRecord;

pub fn resolve_uri(folder: &Path, uri: &str) -> String {
    let path = Path::new(uri);
    if path.is_absolute() || path.exists() {
        return uri.to_string();
    }

    let joined = folder.join(path);
    if joined.exists() {
        joined.to_string_lossy().into_owned()
    } else {
        tracing::trace!(uri, folder = %folder.display(), "Uri not found under folder");
        uri.to_string()
    }
}

pub fn resolve_records(folder: &Path, records: Vec<ErrorRecord>) -> Vec<ErrorRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.uri = resolve_uri(folder, &record.uri);
            record
        })
        .collect()
}
