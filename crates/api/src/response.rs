//! The `{ "data": ... }` envelope used by every resource endpoint.
//! Auth token endpoints and errors are not wrapped.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
