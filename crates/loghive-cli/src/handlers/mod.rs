pub mod compact;
pub mod import;
pub mod init;
pub mod projects;
pub mod search;
pub mod sessions;
pub mod show;
