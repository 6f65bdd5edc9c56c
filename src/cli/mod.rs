//! CLI command implementations

pub mod doctor;
pub mod extract;
pub mod gold;
pub mod init;
pub mod saves;
