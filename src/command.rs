//! Command definitions: schema validation at registration and the
//! `execute_raw` / `suggest_raw` pipeline.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::adapter::{AdapterRegistry, Value};
use crate::error::{ConsoleError, Result};
use crate::handler::{Argument, BoxedHandler, ErasedHandler, FormalParameter, Handler, Slot};
use crate::parameter::{ParameterDescriptor, VARARGS_DELIMITER};

/// Permission required by commands that do not declare one.
pub const OPERATOR_PERMISSION: &str = "op";

/// One registered command. Immutable once built.
pub struct CommandDefinition<C> {
    name: String,
    required_permission: String,
    run_on_server: bool,
    description: String,
    help_text: String,
    slots: Vec<Slot<C>>,
    required_parameter_count: usize,
    usage: String,
    handler: Box<dyn ErasedHandler<C>>,
}

/// Builder for [`CommandDefinition`].
pub struct CommandBuilder<C> {
    name: String,
    permission: Option<String>,
    run_on_server: bool,
    description: String,
    help_text: String,
    slots: Vec<Slot<C>>,
    handlers: Vec<Box<dyn ErasedHandler<C>>>,
}

impl<C: 'static> CommandDefinition<C> {
    /// Starts declaring a command called `name`.
    pub fn builder(name: impl Into<String>) -> CommandBuilder<C> {
        CommandBuilder {
            name: name.into(),
            permission: None,
            run_on_server: false,
            description: String::new(),
            help_text: String::new(),
            slots: Vec::new(),
            handlers: Vec::new(),
        }
    }
}

impl<C: 'static> CommandBuilder<C> {
    /// Short description shown in the command listing.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Longer help text shown by `help <command>`.
    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Permission the caller must hold. Empty means no permission is needed.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Whether the command must execute on the authoritative side.
    pub fn run_on_server(mut self, run_on_server: bool) -> Self {
        self.run_on_server = run_on_server;
        self
    }

    /// Appends an argument slot.
    pub fn parameter(mut self, parameter: ParameterDescriptor<C>) -> Self {
        self.slots.push(Slot::Argument(parameter));
        self
    }

    /// Appends a caller-context slot.
    pub fn context(mut self) -> Self {
        self.slots.push(Slot::Context);
        self
    }

    /// Binds the handler. Exactly one handler must be bound.
    pub fn handler<Args, H>(mut self, handler: H) -> Self
    where
        Args: 'static,
        H: Handler<C, Args>,
    {
        self.handlers.push(Box::new(BoxedHandler::<H, Args>::new(handler)));
        self
    }

    /// Validates the declaration and produces the definition.
    pub fn build(self, adapters: &AdapterRegistry) -> Result<CommandDefinition<C>> {
        let CommandBuilder {
            name,
            permission,
            run_on_server,
            description,
            help_text,
            mut slots,
            mut handlers,
        } = self;

        let fail = |message: String| ConsoleError::initialization(&name, message);

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(fail(
                "Command names must be non-empty and contain no whitespace".to_string(),
            ));
        }

        let required_parameter_count = check_parameter_order(&slots).map_err(&fail)?;

        let handler = match handlers.len() {
            0 => return Err(fail("No handler bound".to_string())),
            1 => handlers.remove(0),
            n => return Err(fail(format!("More than one handler bound ({n})"))),
        };

        check_handler_compatibility(&slots, &handler.formal_parameters()).map_err(&fail)?;

        for slot in &mut slots {
            if let Slot::Argument(parameter) = slot {
                if !parameter.resolve_adapter(adapters) {
                    return Err(fail(format!(
                        "No adapter registered for {} (parameter '{}')",
                        parameter.kind(),
                        parameter.name()
                    )));
                }
            }
        }

        let usage = std::iter::once(name.clone())
            .chain(
                slots
                    .iter()
                    .filter_map(Slot::descriptor)
                    .map(ParameterDescriptor::usage),
            )
            .collect::<Vec<_>>()
            .join(" ");

        debug!(command = %name, %usage, "Command definition built");

        Ok(CommandDefinition {
            name,
            required_permission: permission.unwrap_or_else(|| OPERATOR_PERMISSION.to_string()),
            run_on_server,
            description,
            help_text,
            slots,
            required_parameter_count,
            usage,
            handler,
        })
    }
}

/// Enforces variadic-last and no-required-after-optional. Returns the number
/// of required parameters.
fn check_parameter_order<C>(slots: &[Slot<C>]) -> std::result::Result<usize, String> {
    let parameters: Vec<_> = slots.iter().filter_map(Slot::descriptor).collect();
    let mut required = 0;
    let mut optional_found = false;

    for (i, parameter) in parameters.iter().enumerate() {
        if parameter.is_variadic() && i + 1 < parameters.len() {
            return Err(format!(
                "A variadic parameter must be the last one. Invalid: {}; {}",
                i,
                parameter.name()
            ));
        }

        if parameter.is_required() {
            if optional_found {
                return Err(format!(
                    "A required parameter ({}; {}) must not follow an optional parameter",
                    i,
                    parameter.name()
                ));
            }
            required += 1;
        } else {
            optional_found = true;
        }
    }

    Ok(required)
}

/// Reconciles the declared slots with the handler's formal parameters, position
/// by position.
fn check_handler_compatibility<C>(
    slots: &[Slot<C>],
    formal: &[FormalParameter],
) -> std::result::Result<(), String> {
    for (i, (slot, formal)) in slots.iter().zip(formal).enumerate() {
        match (slot, formal) {
            (Slot::Context, FormalParameter::Context) => {}
            (Slot::Argument(parameter), FormalParameter::Value { kind, optional }) => {
                if parameter.kind() != *kind {
                    return Err(format!(
                        "Cannot assign command argument from {} to {}; handler parameter index: {}",
                        parameter.kind(),
                        kind,
                        i
                    ));
                }
                if !parameter.is_required() && !optional {
                    return Err(format!(
                        "Optional parameter '{}' must be received as an Option; handler parameter index: {}",
                        parameter.name(),
                        i
                    ));
                }
            }
            (Slot::Argument(parameter), FormalParameter::Context) => {
                return Err(format!(
                    "Handler parameter {} receives the caller, but argument '{}' is declared there",
                    i,
                    parameter.name()
                ));
            }
            (Slot::Context, FormalParameter::Value { kind, .. }) => {
                return Err(format!(
                    "Handler parameter {} expects a {} argument, but the caller is declared there",
                    i, kind
                ));
            }
        }
    }

    if formal.len() < slots.len() {
        return Err(format!(
            "Missing {} parameters in handler, follow the declared parameter list",
            slots.len() - formal.len()
        ));
    }
    if formal.len() > slots.len() {
        return Err(format!(
            "Too many ({}) parameters in handler, follow the declared parameter list",
            formal.len() - slots.len()
        ));
    }

    Ok(())
}

impl<C> CommandDefinition<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_permission(&self) -> &str {
        &self.required_permission
    }

    pub fn is_run_on_server(&self) -> bool {
        self.run_on_server
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn has_help_text(&self) -> bool {
        !self.help_text.is_empty()
    }

    /// Name followed by the usage token of every parameter.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn required_parameter_count(&self) -> usize {
        self.required_parameter_count
    }

    /// The argument view of the schema.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDescriptor<C>> {
        self.slots.iter().filter_map(Slot::descriptor)
    }

    /// The method view of the schema, including context slots.
    pub fn slots(&self) -> &[Slot<C>] {
        &self.slots
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters().count()
    }

    pub fn ends_with_varargs(&self) -> bool {
        self.parameters().last().is_some_and(|p| p.is_variadic())
    }

    /// Joins raw tokens into one token per argument slot: tokens beyond the
    /// last single parameter are folded into the variadic one.
    pub fn join_varargs<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        let parameter_count = self.parameter_count();
        let varargs = self.ends_with_varargs();
        let single_count = if varargs {
            parameter_count - 1
        } else {
            parameter_count
        };

        let mut joined: Vec<String> = raw
            .iter()
            .take(single_count)
            .map(|token| token.as_ref().to_string())
            .collect();

        if varargs && raw.len() > single_count {
            joined.push(
                raw[single_count..]
                    .iter()
                    .map(|token| token.as_ref())
                    .collect::<Vec<&str>>()
                    .join(VARARGS_DELIMITER),
            );
        }

        joined
    }

    /// Parses the tokens that are present over the argument view.
    fn parse_arguments<S: AsRef<str>>(&self, raw: &[S]) -> Result<Vec<Option<Value>>> {
        let joined = self.join_varargs(raw);
        let mut tokens = joined.iter();
        self.parameters()
            .map(|parameter| {
                tokens
                    .next()
                    .map(|token| parameter.get_value(token))
                    .transpose()
            })
            .collect()
    }

    /// Parses the tokens over the method view, substituting the caller for
    /// context slots.
    fn process_arguments<'c, S: AsRef<str>>(
        &self,
        raw: &[S],
        caller: &'c C,
    ) -> Result<Vec<Argument<'c, C>>> {
        let mut parsed = self.parse_arguments(raw)?.into_iter();
        Ok(self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Argument(_) => Argument::Value(parsed.next().flatten()),
                Slot::Context => Argument::Context(caller),
            })
            .collect())
    }

    /// Parses `raw` and invokes the handler.
    ///
    /// A token that fails to parse is reported as `Ok(Some(warning))` and the
    /// handler is not invoked. A failing handler yields
    /// [`ConsoleError::Execution`] carrying the handler's own error.
    pub fn execute_raw<S: AsRef<str>>(&self, raw: &[S], caller: &C) -> Result<Option<String>> {
        let arguments = match self.process_arguments(raw, caller) {
            Ok(arguments) => arguments,
            Err(err @ ConsoleError::ParameterParse { .. }) => {
                debug!(command = %self.name, error = %err, "Rejected command arguments");
                return Ok(Some(err.to_string()));
            }
            Err(err) => return Err(err),
        };

        self.handler
            .call(arguments)
            .map_err(|source| ConsoleError::Execution {
                command: self.name.clone(),
                source,
            })
    }

    /// Suggests values for the first argument not yet supplied in `raw`,
    /// keeping those that start with `current`.
    pub fn suggest_raw<S: AsRef<str>>(
        &self,
        current: Option<&str>,
        raw: &[S],
        caller: &C,
    ) -> Result<HashSet<String>> {
        let parsed = self
            .parse_arguments(raw)
            .map_err(|err| ConsoleError::suggestion(&self.name, err.to_string()))?;

        let Some(index) = parsed.iter().position(Option::is_none) else {
            return Ok(HashSet::new());
        };
        let Some(parameter) = self.parameters().nth(index) else {
            return Ok(HashSet::new());
        };

        let candidates =
            parameter
                .suggest(caller, &parsed)
                .map_err(|source| ConsoleError::Suggestion {
                    command: self.name.clone(),
                    source,
                })?;

        if let Some(invalid) = candidates.iter().find(|c| c.kind() != parameter.kind()) {
            return Err(ConsoleError::suggestion(
                &self.name,
                format!(
                    "The suggester of parameter '{}' returned an invalid value. Required: {}; provided: {}",
                    parameter.name(),
                    parameter.kind(),
                    invalid.kind()
                ),
            ));
        }

        let mut composed = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            let text = parameter
                .compose_single(candidate)
                .map_err(|e| ConsoleError::Suggestion {
                    command: self.name.clone(),
                    source: e.into(),
                })?;
            composed.insert(text);
        }

        Ok(composed
            .into_iter()
            .filter(|text| current.map_or(true, |prefix| text.starts_with(prefix)))
            .collect())
    }
}

impl<C> fmt::Debug for CommandDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("required_permission", &self.required_permission)
            .field("run_on_server", &self.run_on_server)
            .finish_non_exhaustive()
    }
}
