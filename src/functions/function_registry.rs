use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;

use crate::functions::{builtin_functions, Arity, FunctionDef, Notation, RegistryError};

// A bad built-in row is a defect of this crate, not of the caller's input.
static BUILTIN: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| match FunctionRegistry::with_builtins() {
    Ok(registry) => Arc::new(registry),
    Err(err) => panic!("inconsistent built-in function table: {}", err),
});

/// Case-insensitive, read-only table of function and operator signatures.
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    by_name: HashMap<String, Arc<FunctionDef>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self { by_name: HashMap::new() }
    }

    /// Process-wide registry holding the built-in functions.
    pub fn builtin() -> Arc<FunctionRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Fresh registry with every built-in, validated. Extend it with `register`.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for def in builtin_functions() {
            registry.register(def)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, def: FunctionDef) -> Result<(), RegistryError> {
        validate(&def)?;
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::Duplicate(def.name));
        }
        self.insert(def);
        Ok(())
    }

    fn insert(&mut self, def: FunctionDef) {
        self.by_name.insert(def.name.clone(), Arc::new(def));
    }

    pub fn get(&self, name: &str) -> Option<Arc<FunctionDef>> {
        self.by_name.get(&name.to_ascii_uppercase()).cloned()
    }

    /// Names callable with `NAME(..)` syntax, sorted. Operators are left out.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .values()
            .filter(|def| def.notation == Notation::Call)
            .map(|def| def.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Fields accepted by `EXTRACT(<field> FROM ..)`, sorted.
    pub fn datetime_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .values()
            .filter(|def| def.datetime_extract)
            .map(|def| def.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn validate(def: &FunctionDef) -> Result<(), RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidSignature { name: def.name.clone(), reason };

    if def.name.is_empty() {
        return Err(invalid("empty name".into()));
    }
    let params = def.params.len();
    match def.arity {
        Arity::Fixed(n) if params != n => {
            return Err(invalid(format!("{} parameter categories for arity {}", params, n)));
        }
        Arity::Range(min, max) if min > max || params != max => {
            return Err(invalid(format!("{} parameter categories for arity {} to {}", params, min, max)));
        }
        Arity::AtLeast(_) if params == 0 => {
            return Err(invalid("variadic function without parameter categories".into()));
        }
        _ => {}
    }
    if let Some(max) = def.arity.max() {
        let out_of_range = def.column_args.iter().chain(&def.constant_args).find(|p| **p >= max);
        if let Some(position) = out_of_range {
            return Err(invalid(format!("argument position {} is out of range", position)));
        }
    }
    if def.datetime_extract && def.arity != Arity::Fixed(1) {
        return Err(invalid("datetime extraction functions take exactly one argument".into()));
    }
    Ok(())
}
