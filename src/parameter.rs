//! Parameter descriptors: the schema element for one command argument.

use std::fmt;
use std::sync::Arc;

use crate::adapter::{AdapterRegistry, ParameterAdapter, Value, ValueKind};
use crate::error::{AdapterError, ConsoleError, Result};

/// Delimiter placed between raw tokens absorbed by a variadic parameter.
pub const VARARGS_DELIMITER: &str = " ";

/// Produces candidate values for a parameter.
///
/// Receives the caller context and the arguments parsed so far (one entry per
/// argument of the command, `None` where nothing was parsed yet).
pub type Suggester<C> =
    Arc<dyn Fn(&C, &[Option<Value>]) -> anyhow::Result<Vec<Value>> + Send + Sync>;

/// Metadata for one command argument.
pub struct ParameterDescriptor<C> {
    name: String,
    kind: ValueKind,
    required: bool,
    variadic: bool,
    adapter: Option<Arc<dyn ParameterAdapter>>,
    suggester: Option<Suggester<C>>,
}

impl<C> ParameterDescriptor<C> {
    /// Creates a required, non-variadic parameter.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            variadic: false,
            adapter: None,
            suggester: None,
        }
    }

    /// Marks the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the parameter as variadic: it absorbs every remaining token.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Uses `adapter` instead of the one registered for the parameter's kind.
    pub fn with_adapter<A: ParameterAdapter + 'static>(mut self, adapter: A) -> Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    /// Attaches a suggester used for autocompletion.
    pub fn with_suggester<F>(mut self, suggester: F) -> Self
    where
        F: Fn(&C, &[Option<Value>]) -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.suggester = Some(Arc::new(suggester));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn has_suggester(&self) -> bool {
        self.suggester.is_some()
    }

    /// Renders the parameter for usage strings: `<float amount>`, `(int port)`,
    /// `<string... message>`.
    pub fn usage(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        let inner = format!("{}{} {}", self.kind, dots, self.name);
        if self.required {
            format!("<{inner}>")
        } else {
            format!("({inner})")
        }
    }

    /// Binds the parameter's adapter: the explicit override, else the one
    /// registered for its kind.
    pub(crate) fn resolve_adapter(&mut self, registry: &AdapterRegistry) -> bool {
        if self.adapter.is_none() {
            self.adapter = registry.adapter(self.kind);
        }
        self.adapter.is_some()
    }

    fn bound_adapter(&self) -> std::result::Result<&Arc<dyn ParameterAdapter>, AdapterError> {
        self.adapter
            .as_ref()
            .ok_or(AdapterError::NoAdapter(self.kind))
    }

    /// Parses one raw (already joined) token.
    ///
    /// Adapter failures are wrapped with the parameter name.
    pub fn get_value(&self, raw: &str) -> Result<Value> {
        let parsed = self
            .bound_adapter()
            .and_then(|adapter| adapter.parse(raw))
            .map_err(|e| ConsoleError::parameter_parse(&self.name, Some(e.cause())))?;

        if parsed.kind() != self.kind {
            return Err(ConsoleError::parameter_parse(
                &self.name,
                Some(format!(
                    "adapter produced a {} value, expected {}",
                    parsed.kind(),
                    self.kind
                )),
            ));
        }
        Ok(parsed)
    }

    /// Runs the suggester. A parameter without one suggests nothing.
    pub fn suggest(&self, caller: &C, parsed: &[Option<Value>]) -> anyhow::Result<Vec<Value>> {
        match &self.suggester {
            Some(suggester) => suggester(caller, parsed),
            None => Ok(Vec::new()),
        }
    }

    /// Renders one value back to argument text.
    pub fn compose_single(&self, value: &Value) -> std::result::Result<String, AdapterError> {
        self.bound_adapter()?.compose(value)
    }
}

impl<C> Clone for ParameterDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            required: self.required,
            variadic: self.variadic,
            adapter: self.adapter.clone(),
            suggester: self.suggester.clone(),
        }
    }
}

impl<C> fmt::Debug for ParameterDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("variadic", &self.variadic)
            .field("suggester", &self.suggester.is_some())
            .finish()
    }
}
