pub mod compression;
pub mod decode;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg_attr(docsrs, doc(cfg(feature = "io-json")))]
#[cfg(feature = "io-json")]
pub mod json;

#[cfg_attr(docsrs, doc(cfg(feature = "io-xml")))]
#[cfg(feature = "io-xml")]
pub mod xml;
