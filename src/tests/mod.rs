mod properties;
pub(crate) mod support;
