pub mod posts;
pub mod recovery;
pub mod session;
