pub(crate) mod downsampler;
pub(crate) mod mip;
pub(crate) mod request;
