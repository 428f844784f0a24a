// PDF to TEI structuring through an external GROBID service

pub mod grobid;

pub use grobid::*;
