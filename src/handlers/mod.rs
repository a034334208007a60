pub mod account;
pub mod admins;
pub mod auth;
pub mod menus;
pub mod usuarios;
