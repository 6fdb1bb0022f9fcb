use thiserror::Error;

use super::store::RemoteFile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Found {count} matches for '{name}', expected at most one")]
    Ambiguous { name: String, count: usize },
}

/// Resolves an exact-name lookup.
///
/// No match is `Ok(None)`, a single match is its id, and anything more is an
/// error rather than an arbitrary pick.
pub fn exact_match(name: &str, files: &[RemoteFile]) -> Result<Option<String>, LookupError> {
    let mut matches = files.iter().filter(|file| file.name == name);
    let first = match matches.next() {
        Some(file) => file,
        None => return Ok(None),
    };

    let extra = matches.count();
    if extra > 0 {
        return Err(LookupError::Ambiguous {
            name: name.to_string(),
            count: extra + 1,
        });
    }

    Ok(Some(first.id.clone()))
}
