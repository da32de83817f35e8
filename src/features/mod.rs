pub mod accounts;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod pages;
pub mod sitemap;
pub mod software;
