pub mod chat_metadata_route;
pub mod chat_request;
pub mod chat_route;
