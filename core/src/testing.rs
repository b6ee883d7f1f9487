pub mod error;
pub mod harness;
pub mod record;
pub mod result;
pub mod runner;
pub mod testcase;
pub mod verifier;

pub use error::*;
pub use harness::*;
pub use record::*;
pub use result::*;
pub use runner::*;
pub use testcase::*;
pub use verifier::*;
