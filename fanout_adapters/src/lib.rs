pub mod collaborators;
pub mod init;
pub mod logger;
