//! CPE colonization risk scoring over a pre-trained binary classifier.

pub mod artifact;
pub mod cli;
pub mod ctx;
pub mod features;
pub mod io;
pub mod model;
pub mod schema;
pub mod scores;
pub mod server;
