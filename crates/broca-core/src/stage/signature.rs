//! Firma de un stage: módulo + nombre + argumentos de construcción.
//!
//! La firma cambia sii cambia la configuración observable del stage, de modo
//! que la cache distinga instancias del mismo stage configuradas distinto.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    module: String,
    name: String,
    args: Vec<Value>,
    kwargs: IndexMap<String, Value>, // orden de inserción
    rendered: String,
}

impl Signature {
    /// `module` suele ser `module_path!()` del crate que define el stage.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        let mut sig = Self {
            module: module.into(),
            name: name.into(),
            args: Vec::new(),
            kwargs: IndexMap::new(),
            rendered: String::new(),
        };
        sig.render();
        sig
    }

    /// Añade un argumento posicional.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self.render();
        self
    }

    /// Añade un argumento nombrado. Repetir una clave reemplaza su valor en
    /// su posición original.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self.render();
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &IndexMap<String, Value> {
        &self.kwargs
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    fn render(&mut self) {
        let positional = self.args.iter().map(render_value);
        let named = self.kwargs.iter().map(|(k, v)| format!("{k}={}", render_value(v)));
        let parts: Vec<String> = positional.chain(named).collect();
        self.rendered = format!("{}({})", self.name, parts.join(", "));
    }
}

// Strings sin comillas para que `Pipeline(A(), B())` se lea como Python-like.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_positional_then_keyword() {
        let sig = Signature::new("m", "Cleaner")
            .arg(3)
            .kwarg("lowercase", false)
            .kwarg("lang", "en");
        assert_eq!(sig.as_str(), "Cleaner(3, lowercase=false, lang=en)");
        assert_eq!(sig.to_string(), sig.as_str());
    }

    #[test]
    fn empty_signature() {
        assert_eq!(Signature::new("m", "Overkill").as_str(), "Overkill()");
    }

    #[test]
    fn configuration_changes_signature() {
        let a = Signature::new("m", "Cleaner").kwarg("lowercase", true);
        let b = Signature::new("m", "Cleaner").kwarg("lowercase", false);
        let c = Signature::new("m", "Cleaner").kwarg("lowercase", true);
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn repeated_kwarg_keeps_position() {
        let sig = Signature::new("m", "S").kwarg("a", 1).kwarg("b", 2).kwarg("a", 3);
        assert_eq!(sig.as_str(), "S(a=3, b=2)");
    }
}
