// Library for tests to access modules

pub mod config;
pub mod derive;
pub mod models;
pub mod routes;
pub mod sysinfo_repo;
pub mod topology;
pub mod version;
pub mod worker;
