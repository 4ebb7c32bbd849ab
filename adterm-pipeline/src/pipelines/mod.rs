pub mod optimization_digest;
