//! C Backend - Generate C code from an analyzed stop program
//!
//! The output is a single `main` function that can be compiled with any C
//! compiler.

mod c_codegen;

pub use c_codegen::CCodeGen;
