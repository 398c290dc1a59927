use serde::Deserialize;

/// List payloads arrive either wrapped as `{"data": [...]}` or as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListPayload<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}
