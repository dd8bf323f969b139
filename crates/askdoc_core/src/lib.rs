pub mod db;
pub mod error;
pub mod extract;
pub mod storage;
pub mod users;
