//! Foreign function interface

pub mod exports;
