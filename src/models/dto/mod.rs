pub mod quiz_payload;
pub mod request;
pub mod response;
