//! Top-level facade crate for flowwire.
//!
//! Re-exports the protocol core and the consumer library so users can depend on a single crate.

pub mod core {
    pub use flowwire_core::*;
}

pub mod consumer {
    pub use flowwire_consumer::*;
}
