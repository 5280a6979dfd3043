//! Core math modules.

pub mod stable;
pub mod beta;
pub mod posterior;
pub mod root;
pub mod hdr;
pub mod mass;
pub mod effic;
