pub mod connection;
pub mod schema;
pub mod users;

pub use connection::*;
pub use schema::*;
pub use users::*;
