/// Error types shared across the Calma crates.
///
/// These errors represent failures in the persistence layer and payload
/// decoding that are common to the tool bridge and the view endpoints.
/// Application-specific errors are defined in the companion crate and wrap
/// `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("storage error for key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("decode error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
