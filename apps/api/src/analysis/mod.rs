pub mod document;
pub mod extract;
pub mod handlers;
pub mod payload;
pub mod proxy;
