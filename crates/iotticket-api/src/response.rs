// Response mapping
//
// A 2xx body decodes into the operation's result type or fails with
// `Error::Deserialization`; any other status goes through the error
// translator. Missing optional fields are the model's concern (serde
// defaults), not an error here.

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::constraints::truncate;
use crate::error::{Error, translate_error};
use crate::transport::RawResponse;

const BODY_PREVIEW_CHARS: usize = 200;

/// Map a raw response into `T` or a typed error.
pub fn map_response<T: DeserializeOwned>(response: &RawResponse) -> Result<T, Error> {
    if response.is_success() {
        decode(&response.body)
    } else {
        Err(translate_error(response.status, &response.body))
    }
}

/// Decode a success body.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| {
        let body = String::from_utf8_lossy(body).into_owned();
        trace!(%body, "undecodable response body");
        let preview = truncate(&body, BODY_PREVIEW_CHARS);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
