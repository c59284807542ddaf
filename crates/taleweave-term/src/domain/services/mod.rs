mod wizard;

pub use wizard::*;
