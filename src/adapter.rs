//! Value kinds, dynamically typed values, and the adapter table that converts
//! between raw argument text and values.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::AdapterError;

/// Tag for the type of a command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `bool`
    Boolean,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `char`
    Char,
    /// `String`
    String,
    /// An engine-specific kind registered by the embedding code.
    Custom(&'static str),
}

impl ValueKind {
    /// The built-in kinds registered by [`AdapterRegistry::basic`].
    pub const BASIC: [ValueKind; 7] = [
        ValueKind::Boolean,
        ValueKind::Int,
        ValueKind::Long,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::Char,
        ValueKind::String,
    ];

    /// Returns the name used in usage strings and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::String => "string",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of a custom kind. Equality is identity of the shared payload.
#[derive(Clone)]
pub struct CustomValue {
    kind: &'static str,
    payload: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    /// Wraps `payload` as a value of the custom kind `kind`.
    pub fn new<T: Any + Send + Sync>(kind: &'static str, payload: T) -> Self {
        Self {
            kind,
            payload: Arc::new(payload),
        }
    }

    /// Name of the custom kind.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the payload if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

/// A parsed command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Custom(CustomValue),
}

impl Value {
    /// Returns the runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Char(_) => ValueKind::Char,
            Self::String(_) => ValueKind::String,
            Self::Custom(custom) => ValueKind::Custom(custom.kind()),
        }
    }

    /// Try to get as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Boolean,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
    CustomValue => Custom,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Bidirectional converter between argument text and a [`Value`].
pub trait ParameterAdapter: Send + Sync {
    /// Parses raw argument text.
    fn parse(&self, text: &str) -> Result<Value, AdapterError>;

    /// Renders a value back to argument text.
    fn compose(&self, value: &Value) -> Result<String, AdapterError>;
}

/// Adapter for the built-in kinds.
#[derive(Debug, Clone, Copy)]
pub struct BasicAdapter {
    kind: ValueKind,
}

impl BasicAdapter {
    /// Creates the adapter for one of [`ValueKind::BASIC`].
    pub fn new(kind: ValueKind) -> Self {
        Self { kind }
    }
}

impl ParameterAdapter for BasicAdapter {
    fn parse(&self, text: &str) -> Result<Value, AdapterError> {
        let kind = self.kind;
        let trimmed = text.trim();
        let value = match kind {
            ValueKind::Boolean => match trimmed.to_lowercase().as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => return Err(AdapterError::parse(text, kind, "expected 'true' or 'false'")),
            },
            ValueKind::Int => trimmed
                .parse()
                .map(Value::Int)
                .map_err(|e| AdapterError::parse(text, kind, e))?,
            ValueKind::Long => trimmed
                .parse()
                .map(Value::Long)
                .map_err(|e| AdapterError::parse(text, kind, e))?,
            ValueKind::Float => trimmed
                .parse()
                .map(Value::Float)
                .map_err(|e| AdapterError::parse(text, kind, e))?,
            ValueKind::Double => trimmed
                .parse()
                .map(Value::Double)
                .map_err(|e| AdapterError::parse(text, kind, e))?,
            ValueKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => {
                        return Err(AdapterError::parse(
                            text,
                            kind,
                            "expected exactly one character",
                        ))
                    }
                }
            }
            ValueKind::String => Value::String(text.to_string()),
            ValueKind::Custom(_) => return Err(AdapterError::NoAdapter(kind)),
        };
        Ok(value)
    }

    fn compose(&self, value: &Value) -> Result<String, AdapterError> {
        let text = match (self.kind, value) {
            (ValueKind::Boolean, Value::Boolean(v)) => v.to_string(),
            (ValueKind::Int, Value::Int(v)) => v.to_string(),
            (ValueKind::Long, Value::Long(v)) => v.to_string(),
            (ValueKind::Float, Value::Float(v)) => v.to_string(),
            (ValueKind::Double, Value::Double(v)) => v.to_string(),
            (ValueKind::Char, Value::Char(v)) => v.to_string(),
            (ValueKind::String, Value::String(v)) => v.clone(),
            (expected, other) => {
                return Err(AdapterError::KindMismatch {
                    expected,
                    found: other.kind(),
                })
            }
        };
        Ok(text)
    }
}

type ParseFn = dyn Fn(&str) -> Result<Value, AdapterError> + Send + Sync;
type ComposeFn = dyn Fn(&Value) -> Result<String, AdapterError> + Send + Sync;

/// Adapter assembled from a pair of closures, for custom kinds.
pub struct FnAdapter {
    parse: Box<ParseFn>,
    compose: Box<ComposeFn>,
}

impl FnAdapter {
    /// Creates an adapter from a parse and a compose function.
    pub fn new<P, C>(parse: P, compose: C) -> Self
    where
        P: Fn(&str) -> Result<Value, AdapterError> + Send + Sync + 'static,
        C: Fn(&Value) -> Result<String, AdapterError> + Send + Sync + 'static,
    {
        Self {
            parse: Box::new(parse),
            compose: Box::new(compose),
        }
    }
}

impl ParameterAdapter for FnAdapter {
    fn parse(&self, text: &str) -> Result<Value, AdapterError> {
        (self.parse)(text)
    }

    fn compose(&self, value: &Value) -> Result<String, AdapterError> {
        (self.compose)(value)
    }
}

/// Table of adapters keyed by value kind.
///
/// Populated once at startup and extended only through explicit
/// [`register_adapter`](Self::register_adapter) calls.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<ValueKind, Arc<dyn ParameterAdapter>>,
}

impl AdapterRegistry {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with adapters for all [`ValueKind::BASIC`] kinds.
    pub fn basic() -> Self {
        let mut registry = Self::new();
        for kind in ValueKind::BASIC {
            registry.register_adapter(kind, BasicAdapter::new(kind));
        }
        registry
    }

    /// Registers `adapter` for `kind`.
    ///
    /// Returns `false` if an adapter for `kind` was already present. The previous
    /// adapter is replaced either way.
    pub fn register_adapter<A>(&mut self, kind: ValueKind, adapter: A) -> bool
    where
        A: ParameterAdapter + 'static,
    {
        let replaced = self.adapters.insert(kind, Arc::new(adapter)).is_some();
        if replaced {
            warn!(%kind, "Replaced previously registered parameter adapter");
        } else {
            debug!(%kind, "Registered parameter adapter");
        }
        !replaced
    }

    /// Returns true if an adapter for `kind` is registered.
    pub fn is_registered(&self, kind: ValueKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    /// Returns the adapter for `kind`.
    pub fn adapter(&self, kind: ValueKind) -> Option<Arc<dyn ParameterAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// Parses `text` as a value of `kind`.
    pub fn parse(&self, kind: ValueKind, text: &str) -> Result<Value, AdapterError> {
        self.lookup(kind)?.parse(text)
    }

    /// Composes `value` with the adapter registered for `kind`.
    pub fn compose_as(&self, value: &Value, kind: ValueKind) -> Result<String, AdapterError> {
        self.lookup(kind)?.compose(value)
    }

    /// Composes `value` with the adapter for its own runtime kind.
    pub fn compose(&self, value: &Value) -> Result<String, AdapterError> {
        self.compose_as(value, value.kind())
    }

    fn lookup(&self, kind: ValueKind) -> Result<&Arc<dyn ParameterAdapter>, AdapterError> {
        self.adapters
            .get(&kind)
            .ok_or(AdapterError::NoAdapter(kind))
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("kinds", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
