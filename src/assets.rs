pub(crate) mod decode;
pub(crate) mod preload;
pub(crate) mod source;
