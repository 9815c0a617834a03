use crate::entry::EntityState;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("no entity descriptor registered for `{0}`")]
    UnmappedType(String),
    #[error("missing key value at `{path}` for `{entity_type}`")]
    MissingKeyValue { entity_type: String, path: String },
    #[error("entry in state {state:?} cannot be translated")]
    UnsupportedState { state: EntityState },
    #[error("concurrency token generation failed at `{path}`: {source}")]
    TokenGeneration {
        path: String,
        #[source]
        source: Box<Error>,
    },
    #[error("generator for `{path}` requires async generation")]
    GeneratorRequiresAsync { path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
