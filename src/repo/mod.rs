mod photos_repo;

pub use photos_repo::*;
