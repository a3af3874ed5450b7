pub mod admin;
pub mod auth;
pub mod category;
pub mod page;
pub mod site;
