pub mod postgres;

pub use postgres::{PostgresSource, PostgresSourceError};
