//! Request body extraction shared by the JSON routes

use axum::{extract::rejection::JsonRejection, Json};

use crate::rest_api::ApiResult;

/// Unwrap a JSON body. A body sent without a JSON content type is read as
/// empty, so validation reports the missing fields instead of the media type.
pub(crate) fn json_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}
