pub(crate) mod image_display;
pub(crate) mod options;
