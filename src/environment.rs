use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{LoxError, Result};
use crate::value::Value;

/// A lexical scope frame: bindings plus an optional parent.
///
/// Frames are shared behind `Rc<RefCell<_>>` because closures keep their
/// defining frame alive after the block that created it has exited.
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("Defining '{}' in current scope", name);
        self.values.insert(name.to_string(), value);
    }

    /// Read `name`, walking outward through enclosing frames.
    pub fn get(&self, name: &str, line: usize) -> Result<Value> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name, line)
        } else {
            Err(LoxError::runtime(
                line,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    /// Overwrite an existing binding, walking outward.  Assignment never
    /// creates a binding; only `var` does.
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<()> {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value, line)
        } else {
            Err(LoxError::runtime(
                line,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    /// Read `name` from the frame exactly `distance` hops out.
    ///
    /// The resolver has already proven the binding exists at that depth, so
    /// a miss here indicates a scope bug; it surfaces as an undefined
    /// variable rather than a panic.
    pub fn get_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<Value> {
        let target = Environment::ancestor(env, distance);
        let found = target.borrow().values.get(name).cloned();

        found.ok_or_else(|| LoxError::runtime(line, format!("Undefined variable '{}'.", name)))
    }

    /// Overwrite `name` in the frame exactly `distance` hops out.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<()> {
        let target = Environment::ancestor(env, distance);
        let mut frame = target.borrow_mut();

        if frame.values.contains_key(name) {
            frame.values.insert(name.to_string(), value);
            Ok(())
        } else {
            Err(LoxError::runtime(
                line,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current = env.clone();

        for _ in 0..distance {
            let next = current.borrow().enclosing.clone();

            match next {
                Some(enclosing) => current = enclosing,
                // Chain shorter than the recorded distance; stop and let the
                // lookup in the outermost frame report the miss.
                None => break,
            }
        }

        current
    }
}
