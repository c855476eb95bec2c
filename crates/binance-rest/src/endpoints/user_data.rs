//! Listen key endpoints for user data streams
//!
//! API key only; never signed. The session state machine built on these
//! lives in [`crate::user_stream`].

use super::{EndpointSpec, HttpMethod};
use crate::request::Classification;

const SPOT_PATH: &str = "/api/v3/userDataStream";
const MARGIN_PATH: &str = "/sapi/v1/userDataStream";
const ISOLATED_PATH: &str = "/sapi/v1/userDataStream/isolated";

pub const SPOT_START: EndpointSpec = EndpointSpec::new(
    "user_stream_start",
    HttpMethod::Post,
    SPOT_PATH,
    Classification::ApiKeyOnly,
);
pub const SPOT_KEEPALIVE: EndpointSpec = EndpointSpec::new(
    "user_stream_keepalive",
    HttpMethod::Put,
    SPOT_PATH,
    Classification::ApiKeyOnly,
);
pub const SPOT_CLOSE: EndpointSpec = EndpointSpec::new(
    "user_stream_close",
    HttpMethod::Delete,
    SPOT_PATH,
    Classification::ApiKeyOnly,
);

pub const MARGIN_START: EndpointSpec = EndpointSpec::new(
    "margin_user_stream_start",
    HttpMethod::Post,
    MARGIN_PATH,
    Classification::ApiKeyOnly,
);
pub const MARGIN_KEEPALIVE: EndpointSpec = EndpointSpec::new(
    "margin_user_stream_keepalive",
    HttpMethod::Put,
    MARGIN_PATH,
    Classification::ApiKeyOnly,
);
pub const MARGIN_CLOSE: EndpointSpec = EndpointSpec::new(
    "margin_user_stream_close",
    HttpMethod::Delete,
    MARGIN_PATH,
    Classification::ApiKeyOnly,
);

pub const ISOLATED_START: EndpointSpec = EndpointSpec::new(
    "isolated_user_stream_start",
    HttpMethod::Post,
    ISOLATED_PATH,
    Classification::ApiKeyOnly,
);
pub const ISOLATED_KEEPALIVE: EndpointSpec = EndpointSpec::new(
    "isolated_user_stream_keepalive",
    HttpMethod::Put,
    ISOLATED_PATH,
    Classification::ApiKeyOnly,
);
pub const ISOLATED_CLOSE: EndpointSpec = EndpointSpec::new(
    "isolated_user_stream_close",
    HttpMethod::Delete,
    ISOLATED_PATH,
    Classification::ApiKeyOnly,
);
