pub mod error;

pub use error::{
    Cancelled, ErrorKind, ErrorNode, Found, LayoutErrorKind, LexErrorKind, OperatorAmbiguity,
};
