// I/O adapter tests
mod compression;
mod csv;
mod json;
mod source;
mod xml;
