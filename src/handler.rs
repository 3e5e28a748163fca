//! Typed command handlers.
//!
//! A handler is a plain function or closure whose parameters are argument
//! values, `Option`s of them, or [`Caller<C>`]. The handler's formal parameter
//! list is derived from its type so that [`CommandBuilder::build`] can reconcile
//! it against the declared schema.
//!
//! [`CommandBuilder::build`]: crate::command::CommandBuilder::build

use anyhow::anyhow;

use crate::adapter::{Value, ValueKind};
use crate::parameter::ParameterDescriptor;

/// One position of a command's method view.
pub enum Slot<C> {
    /// A user-supplied argument.
    Argument(ParameterDescriptor<C>),
    /// The caller context, filled in by the dispatcher.
    Context,
}

impl<C> Slot<C> {
    /// Returns the descriptor for argument slots.
    pub fn descriptor(&self) -> Option<&ParameterDescriptor<C>> {
        match self {
            Self::Argument(descriptor) => Some(descriptor),
            Self::Context => None,
        }
    }
}

/// What a handler expects at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormalParameter {
    /// An argument value. `optional` is true when received as `Option<_>`.
    Value { kind: ValueKind, optional: bool },
    /// The caller context.
    Context,
}

/// A fully processed slot, handed to the handler.
pub enum Argument<'a, C> {
    /// Parsed argument, `None` when an optional argument was omitted.
    Value(Option<Value>),
    /// The caller context.
    Context(&'a C),
}

/// Caller context received by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller<C>(pub C);

/// A Rust type that can be received as a command argument.
pub trait ParameterValue: Sized {
    /// Kind of the values this type is built from.
    const KIND: ValueKind;

    /// Converts a parsed value. Returns `None` on a kind mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_parameter_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ParameterValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_parameter_value! {
    bool => Boolean,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
}

/// Helper for custom kinds: downcasts a [`Value::Custom`] payload of `kind`.
pub fn custom_from_value<T: Clone + 'static>(kind: &'static str, value: Value) -> Option<T> {
    match value {
        Value::Custom(custom) if custom.kind() == kind => custom.downcast_ref::<T>().cloned(),
        _ => None,
    }
}

/// Extraction of one handler parameter from a processed slot.
pub trait FromArgument<C>: Sized {
    /// Formal parameter this type stands for.
    fn formal_parameter() -> FormalParameter;

    fn from_argument(argument: Argument<'_, C>) -> anyhow::Result<Self>;
}

impl<C, T: ParameterValue> FromArgument<C> for T {
    fn formal_parameter() -> FormalParameter {
        FormalParameter::Value {
            kind: T::KIND,
            optional: false,
        }
    }

    fn from_argument(argument: Argument<'_, C>) -> anyhow::Result<Self> {
        match argument {
            Argument::Value(Some(value)) => {
                let found = value.kind();
                T::from_value(value)
                    .ok_or_else(|| anyhow!("expected a {} argument, got {}", T::KIND, found))
            }
            Argument::Value(None) => Err(anyhow!("missing required {} argument", T::KIND)),
            Argument::Context(_) => Err(anyhow!("expected a {} argument, got the caller", T::KIND)),
        }
    }
}

impl<C, T: ParameterValue> FromArgument<C> for Option<T> {
    fn formal_parameter() -> FormalParameter {
        FormalParameter::Value {
            kind: T::KIND,
            optional: true,
        }
    }

    fn from_argument(argument: Argument<'_, C>) -> anyhow::Result<Self> {
        match argument {
            Argument::Value(None) => Ok(None),
            other => <T as FromArgument<C>>::from_argument(other).map(Some),
        }
    }
}

impl<C: Clone> FromArgument<C> for Caller<C> {
    fn formal_parameter() -> FormalParameter {
        FormalParameter::Context
    }

    fn from_argument(argument: Argument<'_, C>) -> anyhow::Result<Self> {
        match argument {
            Argument::Context(caller) => Ok(Caller(caller.clone())),
            Argument::Value(_) => Err(anyhow!("expected the caller, got an argument value")),
        }
    }
}

/// Conversion of a handler's return value into console output.
pub trait CommandReturn {
    fn into_output(self) -> anyhow::Result<Option<String>>;
}

impl CommandReturn for () {
    fn into_output(self) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

impl CommandReturn for String {
    fn into_output(self) -> anyhow::Result<Option<String>> {
        Ok(Some(self))
    }
}

impl CommandReturn for &'static str {
    fn into_output(self) -> anyhow::Result<Option<String>> {
        Ok(Some(self.to_string()))
    }
}

impl CommandReturn for Option<String> {
    fn into_output(self) -> anyhow::Result<Option<String>> {
        Ok(self)
    }
}

impl<T, E> CommandReturn for Result<T, E>
where
    T: CommandReturn,
    E: Into<anyhow::Error>,
{
    fn into_output(self) -> anyhow::Result<Option<String>> {
        self.map_err(Into::into)?.into_output()
    }
}

/// A function usable as a command handler.
///
/// Implemented for `Fn` closures of up to eight parameters; `Args` is the tuple
/// of parameter types and only serves to keep the impls apart.
pub trait Handler<C, Args>: Send + Sync + 'static {
    /// The formal parameter list, in declaration order.
    fn formal_parameters(&self) -> Vec<FormalParameter>;

    /// Invokes the handler with one processed argument per formal parameter.
    fn call(&self, arguments: Vec<Argument<'_, C>>) -> anyhow::Result<Option<String>>;
}

macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<C, F, R, $($ty,)*> Handler<C, ($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: CommandReturn,
            $($ty: FromArgument<C>,)*
        {
            fn formal_parameters(&self) -> Vec<FormalParameter> {
                vec![$(<$ty as FromArgument<C>>::formal_parameter()),*]
            }

            fn call(&self, arguments: Vec<Argument<'_, C>>) -> anyhow::Result<Option<String>> {
                let mut arguments = arguments.into_iter();
                $(
                    let $ty = <$ty as FromArgument<C>>::from_argument(
                        arguments
                            .next()
                            .ok_or_else(|| anyhow!("handler received too few arguments"))?,
                    )?;
                )*
                (self)($($ty),*).into_output()
            }
        }
    };
}

impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);

/// Object-safe form of [`Handler`] with the `Args` parameter erased.
pub(crate) trait ErasedHandler<C>: Send + Sync {
    fn formal_parameters(&self) -> Vec<FormalParameter>;

    fn call(&self, arguments: Vec<Argument<'_, C>>) -> anyhow::Result<Option<String>>;
}

pub(crate) struct BoxedHandler<H, Args> {
    handler: H,
    _args: std::marker::PhantomData<fn() -> Args>,
}

impl<H, Args> BoxedHandler<H, Args> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _args: std::marker::PhantomData,
        }
    }
}

impl<C, H, Args> ErasedHandler<C> for BoxedHandler<H, Args>
where
    H: Handler<C, Args>,
    Args: 'static,
{
    fn formal_parameters(&self) -> Vec<FormalParameter> {
        self.handler.formal_parameters()
    }

    fn call(&self, arguments: Vec<Argument<'_, C>>) -> anyhow::Result<Option<String>> {
        self.handler.call(arguments)
    }
}
