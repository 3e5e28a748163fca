//! Registration-time validation of command declarations.

use devconsole::adapter::{CustomValue, FnAdapter};
use devconsole::error::AdapterError;
use devconsole::handler::{custom_from_value, ParameterValue};
use devconsole::{
    AdapterRegistry, Caller, CommandDefinition, ConsoleError, ParameterDescriptor, Value,
    ValueKind,
};

use super::common::Admin;

type Def = CommandDefinition<Admin>;

fn build(builder: devconsole::CommandBuilder<Admin>) -> Result<Def, ConsoleError> {
    builder.build(&AdapterRegistry::basic())
}

fn initialization_message(result: Result<Def, ConsoleError>) -> String {
    match result {
        Err(ConsoleError::Initialization { message, .. }) => message,
        other => panic!("expected an initialization error, got {other:?}"),
    }
}

#[test]
fn test_handler_with_too_few_parameters_is_rejected() {
    let result = build(
        Def::builder("give")
            .parameter(ParameterDescriptor::new("item", ValueKind::String))
            .parameter(ParameterDescriptor::new("amount", ValueKind::Int))
            .handler(|_: String| ()),
    );
    assert!(initialization_message(result).starts_with("Missing 1 parameters in handler"));
}

#[test]
fn test_handler_with_too_many_parameters_is_rejected() {
    let result = build(
        Def::builder("give")
            .parameter(ParameterDescriptor::new("item", ValueKind::String))
            .handler(|_: String, _: i32, _: i32| ()),
    );
    assert!(initialization_message(result).starts_with("Too many (2) parameters in handler"));
}

#[test]
fn test_required_after_optional_is_rejected() {
    let result = build(
        Def::builder("spawn")
            .parameter(ParameterDescriptor::new("prefab", ValueKind::String).optional())
            .parameter(ParameterDescriptor::new("count", ValueKind::Int))
            .handler(|_: Option<String>, _: i32| ()),
    );
    assert!(initialization_message(result).contains("must not follow an optional parameter"));
}

#[test]
fn test_variadic_must_be_last() {
    let result = build(
        Def::builder("whisper")
            .parameter(ParameterDescriptor::new("message", ValueKind::String).variadic())
            .parameter(ParameterDescriptor::new("target", ValueKind::String))
            .handler(|_: String, _: String| ()),
    );
    assert!(initialization_message(result).starts_with("A variadic parameter must be the last one"));
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let result = build(
        Def::builder("setSpeed")
            .parameter(ParameterDescriptor::new("amount", ValueKind::Float))
            .handler(|_: f64| ()),
    );
    assert_eq!(
        initialization_message(result),
        "Cannot assign command argument from float to double; handler parameter index: 0"
    );
}

#[test]
fn test_caller_slot_must_line_up() {
    let result = build(
        Def::builder("whoami")
            .context()
            .handler(|_: String| ()),
    );
    assert!(initialization_message(result).contains("the caller is declared there"));

    let result = build(
        Def::builder("whoami")
            .context()
            .handler(|Caller(admin): Caller<Admin>| format!("{admin:?}")),
    );
    assert!(result.is_ok());
}

#[derive(Debug, Clone, PartialEq)]
struct Block(String);

impl ParameterValue for Block {
    const KIND: ValueKind = ValueKind::Custom("block");

    fn from_value(value: Value) -> Option<Self> {
        custom_from_value("block", value)
    }
}

fn place() -> devconsole::CommandBuilder<Admin> {
    Def::builder("place")
        .parameter(ParameterDescriptor::new("block", ValueKind::Custom("block")))
        .handler(|block: Block| format!("Placed {}", block.0))
}

#[test]
fn test_custom_kind_needs_an_adapter() {
    let mut adapters = AdapterRegistry::basic();
    let err = place().build(&adapters).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot register command 'place': No adapter registered for block (parameter 'block')"
    );

    let fresh = adapters.register_adapter(
        ValueKind::Custom("block"),
        FnAdapter::new(
            |text| {
                Ok(Value::Custom(CustomValue::new(
                    "block",
                    Block(text.to_lowercase()),
                )))
            },
            |value| match value {
                Value::Custom(custom) => custom
                    .downcast_ref::<Block>()
                    .map(|block| block.0.clone())
                    .ok_or(AdapterError::KindMismatch {
                        expected: ValueKind::Custom("block"),
                        found: value.kind(),
                    }),
                other => Err(AdapterError::KindMismatch {
                    expected: ValueKind::Custom("block"),
                    found: other.kind(),
                }),
            },
        ),
    );
    assert!(fresh);

    let place = place().build(&adapters).unwrap();
    let output = place.execute_raw(&["Granite"], &super::common::admin()).unwrap();
    assert_eq!(output.as_deref(), Some("Placed granite"));
}

#[test]
fn test_builtin_kinds_round_trip() {
    let adapters = AdapterRegistry::basic();
    let samples = [
        (ValueKind::Boolean, "true"),
        (ValueKind::Int, "-42"),
        (ValueKind::Long, "9000000000"),
        (ValueKind::Float, "2.5"),
        (ValueKind::Double, "0.125"),
        (ValueKind::Char, "x"),
        (ValueKind::String, "hello world"),
    ];

    for (kind, text) in samples {
        let value = adapters.parse(kind, text).unwrap();
        assert_eq!(value.kind(), kind);
        assert_eq!(adapters.compose(&value).unwrap(), text, "kind {kind}");
    }
}
