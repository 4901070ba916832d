//! Defines the `Error` type for the ambrose library

use std::error;
use std::fmt;
use std::result;

pub type Result<T> = result::Result<T, AmbroseError>;

#[derive(Clone, Debug)]
pub enum AmbroseError {

    /// A map-backed assignment was queried for a `Variable` it never registered
    VariableNotBound,

    /// A second `Marginal` was inserted for a `Variable` already present in a summary
    DuplicateMarginal,

    /// The requested operation is not defined for the receiver. The value in the
    /// tuple describes the operation
    UnsupportedOperation(String),

    /// Assignment enumeration was requested over more than four variables.
    /// The value in the tuple is the offending arity
    ArityExceeded(usize),

    /// An attempt was made to write a value to a `Variable` that does not support
    /// being set
    UnsetVariable,

    /// A value was rejected by a `Variable`'s domain. The value in the tuple
    /// describes the violation
    InvalidValue(String),

    /// A general error with the given description
    General(String)

}

impl error::Error for AmbroseError {}

impl fmt::Display for AmbroseError {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AmbroseError::VariableNotBound => {
                write!(f, "The assignment does not bind the requested variable")
            },
            AmbroseError::DuplicateMarginal => {
                write!(f, "A marginal is already registered for the variable")
            },
            AmbroseError::UnsupportedOperation(ref op) => {
                write!(f, "Unsupported operation: {}", op)
            },
            AmbroseError::ArityExceeded(n) => {
                write!(f, "Cannot enumerate assignments over {} variables (maximum is 4)", n)
            },
            AmbroseError::UnsetVariable => {
                write!(f, "The variable does not support being set")
            },
            AmbroseError::InvalidValue(ref desc) => {
                write!(f, "Invalid value: {}", desc)
            },
            AmbroseError::General(ref err) => write!(f, "{}", err)
        }
    }

}
