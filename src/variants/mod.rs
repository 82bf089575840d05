mod lloyd;
mod restarts;

pub(crate) use lloyd::Lloyd;
pub(crate) use restarts::Restarts;
