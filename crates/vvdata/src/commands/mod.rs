pub mod init;
pub mod update;
pub mod watch;
