use thiserror::Error;

use takeforge_curve::CurveError;
use takeforge_events::{AnimKey, GraphError, LibraryError, ResolveError, TemplateError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("animation {owner}: {source}")]
    Curve {
        owner: AnimKey,
        #[source]
        source: CurveError,
    },

    #[error("invalid template on {owner}: {source}")]
    Template {
        owner: AnimKey,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("unknown animation {0}")]
    UnknownAnimation(AnimKey),

    #[error("animation {0} is defined more than once")]
    DuplicateAnimation(AnimKey),
}

impl From<LibraryError> for SessionError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Template { owner, source } => SessionError::Template { owner, source },
            LibraryError::Graph(g) => SessionError::Graph(g),
        }
    }
}
