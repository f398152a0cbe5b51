#[allow(clippy::module_inception)]
mod helpers;

pub(crate) use self::helpers::*;
