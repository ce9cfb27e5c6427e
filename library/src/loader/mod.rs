pub mod fixture;

pub use fixture::{GraphFixture, LoadedGraph};
