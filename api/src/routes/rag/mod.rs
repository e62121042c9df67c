pub mod add_documents_route;
pub mod categories_route;
pub mod delete_documents_route;
pub mod initialize_route;
pub mod rag_requests;
pub mod search_documents_route;
