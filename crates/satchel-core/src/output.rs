//! Handler return shapes and response strategies.
//!
//! A handler's return type is described by a [`ReturnShape`]: how many values
//! it returns and which capabilities the single value has. The plan builder
//! resolves the shape into a [`ReturnStrategy`] once; at request time the
//! returned value is lowered into a [`Returned`] and matched against it.

use crate::{BasicResponder, BindingError, Responder};
use std::fmt;

/// Capabilities of a single return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The value may carry error text.
    pub error: bool,
    /// The value may describe a complete response.
    pub responder: bool,
}

impl Capabilities {
    /// No capability.
    pub const NONE: Self = Self {
        error: false,
        responder: false,
    };

    /// Error-like only.
    pub const ERROR: Self = Self {
        error: true,
        responder: false,
    };

    /// Responder-like. A responder also exposes error text.
    pub const RESPONDER: Self = Self {
        error: true,
        responder: true,
    };
}

/// Declared shape of a handler's return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnShape {
    /// Number of returned values.
    pub arity: usize,
    /// Capabilities of the value, meaningful when `arity == 1`.
    pub capabilities: Capabilities,
}

impl ReturnShape {
    /// A handler returning nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            arity: 0,
            capabilities: Capabilities::NONE,
        }
    }

    /// A handler returning one value with the given capabilities.
    #[must_use]
    pub const fn single(capabilities: Capabilities) -> Self {
        Self {
            arity: 1,
            capabilities,
        }
    }

    /// A handler returning `arity` values.
    #[must_use]
    pub const fn multiple(arity: usize) -> Self {
        Self {
            arity,
            capabilities: Capabilities::NONE,
        }
    }
}

/// How a handler's result is turned into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnStrategy {
    /// The handler writes the response itself.
    NoResponse,
    /// The handler returns optional error text.
    ErrorResponse,
    /// The handler returns an optional responder.
    StructuredResponse,
}

impl ReturnStrategy {
    /// Resolves a return shape into a strategy.
    ///
    /// The responder capability is checked before the error capability.
    pub fn resolve(shape: ReturnShape) -> Result<Self, BindingError> {
        match shape.arity {
            0 => Ok(Self::NoResponse),
            1 if shape.capabilities.responder => Ok(Self::StructuredResponse),
            1 if shape.capabilities.error => Ok(Self::ErrorResponse),
            1 => Err(BindingError::invalid_signature(
                "return value is neither error-like nor a responder",
            )),
            n => Err(BindingError::invalid_signature(format!(
                "handler returns {n} values, expected at most one"
            ))),
        }
    }

    /// Returns `true` if the handler owns the response writer.
    #[must_use]
    pub const fn passes_writer(&self) -> bool {
        matches!(self, Self::NoResponse)
    }
}

impl fmt::Display for ReturnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no-response"),
            Self::ErrorResponse => write!(f, "error-response"),
            Self::StructuredResponse => write!(f, "structured-response"),
        }
    }
}

/// A handler result lowered for dispatch.
pub enum Returned {
    /// Nothing was returned.
    Unit,
    /// Error text, `None` when the handler succeeded.
    Error(Option<String>),
    /// A responder, `None` when the handler returned none.
    Responder(Option<Box<dyn Responder>>),
    /// Several values. Never produced by a bindable handler.
    Multiple(usize),
}

impl fmt::Debug for Returned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "Unit"),
            Self::Error(text) => f.debug_tuple("Error").field(text).finish(),
            Self::Responder(Some(r)) => write!(f, "Responder(Some(status = {}))", r.status()),
            Self::Responder(None) => write!(f, "Responder(None)"),
            Self::Multiple(n) => f.debug_tuple("Multiple").field(n).finish(),
        }
    }
}

/// A type a handler may return.
///
/// # Implementations
///
/// | Type | Shape | Strategy |
/// |------|-------|----------|
/// | `()` | no value | [`ReturnStrategy::NoResponse`] |
/// | `Result<(), E>` | error-like | [`ReturnStrategy::ErrorResponse`] |
/// | [`BasicResponder`], `Box<dyn Responder>`, `Option<R>` | responder | [`ReturnStrategy::StructuredResponse`] |
/// | `(A, B)`, `(A, B, C)` | several values | rejected |
pub trait HandlerOutput {
    /// Declared shape of this type.
    fn shape() -> ReturnShape;

    /// Lowers the value for dispatch.
    fn into_returned(self) -> Returned;
}

impl HandlerOutput for () {
    fn shape() -> ReturnShape {
        ReturnShape::none()
    }

    fn into_returned(self) -> Returned {
        Returned::Unit
    }
}

impl<E> HandlerOutput for Result<(), E>
where
    E: fmt::Display,
{
    fn shape() -> ReturnShape {
        ReturnShape::single(Capabilities::ERROR)
    }

    fn into_returned(self) -> Returned {
        Returned::Error(self.err().map(|e| e.to_string()))
    }
}

impl HandlerOutput for BasicResponder {
    fn shape() -> ReturnShape {
        ReturnShape::single(Capabilities::RESPONDER)
    }

    fn into_returned(self) -> Returned {
        Returned::Responder(Some(Box::new(self)))
    }
}

impl HandlerOutput for Box<dyn Responder> {
    fn shape() -> ReturnShape {
        ReturnShape::single(Capabilities::RESPONDER)
    }

    fn into_returned(self) -> Returned {
        Returned::Responder(Some(self))
    }
}

impl<R> HandlerOutput for Option<R>
where
    R: Responder + 'static,
{
    fn shape() -> ReturnShape {
        ReturnShape::single(Capabilities::RESPONDER)
    }

    fn into_returned(self) -> Returned {
        Returned::Responder(self.map(|r| Box::new(r) as Box<dyn Responder>))
    }
}

impl<A, B> HandlerOutput for (A, B)
where
    A: HandlerOutput,
    B: HandlerOutput,
{
    fn shape() -> ReturnShape {
        ReturnShape::multiple(2)
    }

    fn into_returned(self) -> Returned {
        Returned::Multiple(2)
    }
}

impl<A, B, C> HandlerOutput for (A, B, C)
where
    A: HandlerOutput,
    B: HandlerOutput,
    C: HandlerOutput,
{
    fn shape() -> ReturnShape {
        ReturnShape::multiple(3)
    }

    fn into_returned(self) -> Returned {
        Returned::Multiple(3)
    }
}
