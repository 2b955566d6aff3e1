pub(crate) mod block;
pub(crate) mod fit;
pub(crate) mod shape;
