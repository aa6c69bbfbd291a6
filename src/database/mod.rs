pub mod pool;
pub mod users;

pub use pool::DatabaseError;
